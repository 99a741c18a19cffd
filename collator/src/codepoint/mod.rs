pub mod fcd;
mod iter;

pub use fcd::FcdSource;
pub use iter::PlainSource;

/// текст в UTF-8 (смещения в байтах) или UTF-16 (смещения в кодовых единицах)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text<'a>
{
    Utf8(&'a str),
    Utf16(&'a [u16]),
}

impl<'a> Text<'a>
{
    #[inline(always)]
    pub fn len(&self) -> usize
    {
        match self {
            Text::Utf8(s) => s.len(),
            Text::Utf16(s) => s.len(),
        }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool
    {
        self.len() == 0
    }

    /// ближайшая граница символа не правее позиции
    #[inline(always)]
    pub fn floor_boundary(&self, pos: usize) -> usize
    {
        match self {
            Text::Utf8(s) => s.floor_boundary(pos),
            Text::Utf16(s) => s.floor_boundary(pos),
        }
    }

    /// символ, заканчивающийся в позиции, и его начало
    #[inline(always)]
    pub fn char_before(&self, pos: usize) -> Option<(char, usize)>
    {
        match self {
            Text::Utf8(s) => s.char_before(pos),
            Text::Utf16(s) => s.char_before(pos),
        }
    }

    /// символ, начинающийся в позиции, и позиция следующего
    #[inline(always)]
    pub fn char_at(&self, pos: usize) -> Option<(char, usize)>
    {
        match self {
            Text::Utf8(s) => s.char_at(pos),
            Text::Utf16(s) => s.char_at(pos),
        }
    }

    /// символы начиная с позиции
    pub fn chars_from(self, pos: usize) -> impl Iterator<Item = char> + 'a
    {
        let mut pos = pos;

        core::iter::from_fn(move || {
            let (c, next) = self.char_at(pos)?;
            pos = next;
            Some(c)
        })
    }
}

/// кодовые единицы текста: чтение символов в обе стороны по смещению
pub trait TextUnits
{
    fn len(&self) -> usize;

    fn char_at(&self, pos: usize) -> Option<(char, usize)>;

    fn char_before(&self, pos: usize) -> Option<(char, usize)>;

    fn floor_boundary(&self, pos: usize) -> usize;
}

impl TextUnits for str
{
    #[inline(always)]
    fn len(&self) -> usize
    {
        str::len(self)
    }

    #[inline(always)]
    fn char_at(&self, pos: usize) -> Option<(char, usize)>
    {
        let c = self.get(pos ..)?.chars().next()?;

        Some((c, pos + c.len_utf8()))
    }

    #[inline(always)]
    fn char_before(&self, pos: usize) -> Option<(char, usize)>
    {
        let c = self.get(.. pos)?.chars().next_back()?;

        Some((c, pos - c.len_utf8()))
    }

    #[inline(always)]
    fn floor_boundary(&self, pos: usize) -> usize
    {
        let mut pos = pos.min(str::len(self));

        while !self.is_char_boundary(pos) {
            pos -= 1;
        }

        pos
    }
}

#[inline(always)]
fn is_lead_surrogate(unit: u16) -> bool
{
    (0xD800 .. 0xDC00).contains(&unit)
}

#[inline(always)]
fn is_trail_surrogate(unit: u16) -> bool
{
    (0xDC00 .. 0xE000).contains(&unit)
}

#[inline(always)]
fn surrogate_pair(lead: u16, trail: u16) -> char
{
    let code = 0x10000 + (((lead as u32) - 0xD800) << 10) + ((trail as u32) - 0xDC00);

    char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
}

impl TextUnits for [u16]
{
    #[inline(always)]
    fn len(&self) -> usize
    {
        <[u16]>::len(self)
    }

    /// непарные суррогаты читаются как U+FFFD
    #[inline(always)]
    fn char_at(&self, pos: usize) -> Option<(char, usize)>
    {
        let unit = *self.get(pos)?;

        if is_lead_surrogate(unit) {
            if let Some(&trail) = self.get(pos + 1).filter(|&&t| is_trail_surrogate(t)) {
                return Some((surrogate_pair(unit, trail), pos + 2));
            }
        }

        let c = char::from_u32(unit as u32).unwrap_or(char::REPLACEMENT_CHARACTER);

        Some((c, pos + 1))
    }

    #[inline(always)]
    fn char_before(&self, pos: usize) -> Option<(char, usize)>
    {
        let unit = *self.get(pos.checked_sub(1)?)?;

        if is_trail_surrogate(unit) && pos >= 2 && is_lead_surrogate(self[pos - 2]) {
            return Some((surrogate_pair(self[pos - 2], unit), pos - 2));
        }

        let c = char::from_u32(unit as u32).unwrap_or(char::REPLACEMENT_CHARACTER);

        Some((c, pos - 1))
    }

    #[inline(always)]
    fn floor_boundary(&self, pos: usize) -> usize
    {
        let pos = pos.min(<[u16]>::len(self));

        match pos > 0
            && pos < <[u16]>::len(self)
            && is_trail_surrogate(self[pos])
            && is_lead_surrogate(self[pos - 1])
        {
            true => pos - 1,
            false => pos,
        }
    }
}

/// источник кодпоинтов для сканера CE
pub trait CodepointSource
{
    fn next_code_point(&mut self) -> Option<char>;

    fn previous_code_point(&mut self) -> Option<char>;

    /// смещение в исходном тексте
    fn offset(&self) -> usize;

    fn reset_to_offset(&mut self, offset: usize);

    fn len(&self) -> usize;

    #[inline]
    fn forward_num_code_points(&mut self, count: usize)
    {
        for _ in 0 .. count {
            if self.next_code_point().is_none() {
                break;
            }
        }
    }

    #[inline]
    fn backward_num_code_points(&mut self, count: usize)
    {
        for _ in 0 .. count {
            if self.previous_code_point().is_none() {
                break;
            }
        }
    }
}
