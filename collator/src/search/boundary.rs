use unicode_segmentation::UnicodeSegmentation;

/// границы текста (символов, слов ...), смещения - в байтах UTF-8
pub trait BreakIterator
{
    /// новый текст; границы пересчитываются
    fn set_text(&mut self, text: &str);

    /// первая граница строго правее offset; None - правее границ нет
    fn following(&self, offset: usize) -> Option<usize>;

    fn is_boundary(&self, offset: usize) -> bool;
}

/// отсортированный список границ, включая 0 и конец текста
#[derive(Debug, Clone, Default)]
struct Boundaries(Vec<usize>);

impl Boundaries
{
    fn new(starts: impl Iterator<Item = usize>, len: usize) -> Self
    {
        let mut boundaries: Vec<usize> = starts.collect();

        if boundaries.last() != Some(&len) {
            boundaries.push(len);
        }

        if boundaries.first() != Some(&0) {
            boundaries.insert(0, 0);
        }

        Self(boundaries)
    }

    #[inline(always)]
    fn following(&self, offset: usize) -> Option<usize>
    {
        let i = self.0.partition_point(|&b| b <= offset);

        self.0.get(i).copied()
    }

    #[inline(always)]
    fn contains(&self, offset: usize) -> bool
    {
        self.0.binary_search(&offset).is_ok()
    }
}

/// расширенные кластеры графем (UAX #29)
#[derive(Debug, Clone, Default)]
pub struct GraphemeBreaker
{
    boundaries: Boundaries,
}

impl GraphemeBreaker
{
    pub fn new(text: &str) -> Self
    {
        let mut breaker = Self::default();
        breaker.set_text(text);

        breaker
    }
}

impl BreakIterator for GraphemeBreaker
{
    fn set_text(&mut self, text: &str)
    {
        self.boundaries = Boundaries::new(text.grapheme_indices(true).map(|(i, _)| i), text.len());
    }

    fn following(&self, offset: usize) -> Option<usize>
    {
        self.boundaries.following(offset)
    }

    fn is_boundary(&self, offset: usize) -> bool
    {
        self.boundaries.contains(offset)
    }
}

/// границы слов (UAX #29); поиск находит только совпадения, выровненные по словам
#[derive(Debug, Clone, Default)]
pub struct WordBreaker
{
    boundaries: Boundaries,
}

impl WordBreaker
{
    pub fn new(text: &str) -> Self
    {
        let mut breaker = Self::default();
        breaker.set_text(text);

        breaker
    }
}

impl BreakIterator for WordBreaker
{
    fn set_text(&mut self, text: &str)
    {
        self.boundaries =
            Boundaries::new(text.split_word_bound_indices().map(|(i, _)| i), text.len());
    }

    fn following(&self, offset: usize) -> Option<usize>
    {
        self.boundaries.following(offset)
    }

    fn is_boundary(&self, offset: usize) -> bool
    {
        self.boundaries.contains(offset)
    }
}
