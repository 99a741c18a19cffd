use super::{CodepointSource, TextUnits};

/// чтение текста как есть, без проверки FCD
pub struct PlainSource<'a, T: ?Sized>
{
    text: &'a T,
    pos: usize,
}

impl<'a, T: TextUnits + ?Sized> PlainSource<'a, T>
{
    #[inline(always)]
    pub fn new(text: &'a T) -> Self
    {
        Self { text, pos: 0 }
    }
}

impl<'a, T: TextUnits + ?Sized> CodepointSource for PlainSource<'a, T>
{
    #[inline(always)]
    fn next_code_point(&mut self) -> Option<char>
    {
        let (c, next) = self.text.char_at(self.pos)?;
        self.pos = next;

        Some(c)
    }

    #[inline(always)]
    fn previous_code_point(&mut self) -> Option<char>
    {
        let (c, previous) = self.text.char_before(self.pos)?;
        self.pos = previous;

        Some(c)
    }

    #[inline(always)]
    fn offset(&self) -> usize
    {
        self.pos
    }

    #[inline(always)]
    fn reset_to_offset(&mut self, offset: usize)
    {
        self.pos = offset;
    }

    #[inline(always)]
    fn len(&self) -> usize
    {
        self.text.len()
    }
}
