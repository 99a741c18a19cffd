use super::pce::{CollationPce, ProcessedCe};
use crate::error::{CollationError, Result};

/// запас буфера сверх длины образца
const EXTRA: usize = 32;
/// игнорируемых CE текста на символ образца при сравнении с подстановкой
const MAX_IGNORABLES_PER_JAMO_L: usize = 8;
const MAX_IGNORABLES_PER_OTHER: usize = 3;

/// кольцевой буфер обработанных CE текста
///
/// допустимы повторное чтение индекса из буфера и чтение ровно следующего индекса; при
/// заполнении вытесняется самый старый
#[derive(Debug)]
pub struct CeRing
{
    buffer: Vec<Option<ProcessedCe>>,
    first: usize,
    limit: usize,
}

impl CeRing
{
    /// размер по количеству CE образца; при сравнении с подстановкой - с запасом на игнорируемые
    /// CE текста для каждого символа образца
    pub fn new(pattern_ces: usize, pattern: &str, wildcards: bool) -> Self
    {
        let mut size = pattern_ces + EXTRA;

        if wildcards {
            size += pattern
                .chars()
                .map(|c| match might_be_jamo_l(c) {
                    true => MAX_IGNORABLES_PER_JAMO_L,
                    false => MAX_IGNORABLES_PER_OTHER,
                })
                .sum::<usize>();
        }

        Self {
            buffer: vec![None; size],
            first: 0,
            limit: 0,
        }
    }

    /// сколько последних CE остаются доступными для повторного чтения
    #[inline(always)]
    pub fn capacity(&self) -> usize
    {
        self.buffer.len() - 1
    }

    /// CE с индексом index при движении вперед
    #[inline(always)]
    pub fn get(&mut self, index: usize, source: &mut CollationPce) -> Result<ProcessedCe>
    {
        self.fetch(index, || source.next_processed())
    }

    /// CE с индексом index при движении назад (индексы растут к началу текста)
    #[inline(always)]
    pub fn get_previous(&mut self, index: usize, source: &mut CollationPce) -> Result<ProcessedCe>
    {
        self.fetch(index, || source.previous_processed())
    }

    fn fetch(
        &mut self,
        index: usize,
        next: impl FnOnce() -> Result<ProcessedCe>,
    ) -> Result<ProcessedCe>
    {
        let size = self.buffer.len();
        let i = index % size;

        if index >= self.first && index < self.limit {
            if let Some(ce) = self.buffer[i] {
                return Ok(ce);
            }
        }

        if index != self.limit {
            return Err(CollationError::BufferSequence {
                index,
                limit: self.limit,
            });
        }

        self.limit += 1;

        if self.limit - self.first >= size {
            self.first += 1;
        }

        let ce = next()?;
        self.buffer[i] = Some(ce);

        Ok(ce)
    }
}

/// ведущая согласная хангыль (или её совместимый вариант)
#[inline(always)]
fn might_be_jamo_l(c: char) -> bool
{
    matches!(c, '\u{1100}' ..= '\u{115E}' | '\u{3131}' ..= '\u{314E}' | '\u{3165}' ..= '\u{3186}')
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::Tailoring;

    #[test]
    fn sequential_access()
    {
        let tailoring = Tailoring::root();
        let mut source = CollationPce::new(tailoring.element_iter("abcdef"));
        let mut ring = CeRing::new(1, "a", false);

        let a = ring.get(0, &mut source).unwrap();
        let b = ring.get(1, &mut source).unwrap();

        assert_eq!(ring.get(0, &mut source).unwrap(), a);
        assert_eq!(ring.get(1, &mut source).unwrap(), b);
        assert_eq!((b.low, b.high), (1, 2));

        assert_eq!(
            ring.get(5, &mut source),
            Err(CollationError::BufferSequence { index: 5, limit: 2 })
        );
    }

    #[test]
    fn capacity_is_retained_window()
    {
        let tailoring = Tailoring::root();
        let text = "a".repeat(100);
        let mut source = CollationPce::new(tailoring.element_iter(&text));
        let mut ring = CeRing::new(1, "a", false);
        let capacity = ring.capacity();

        assert_eq!(capacity, 32);

        for i in 0 ..= capacity {
            ring.get(i, &mut source).unwrap();
        }

        assert!(ring.get(1, &mut source).is_ok());
        assert!(ring.get(0, &mut source).is_err());
    }

    #[test]
    fn oldest_is_evicted()
    {
        let tailoring = Tailoring::root();
        let text = "a".repeat(100);
        let mut source = CollationPce::new(tailoring.element_iter(&text));
        let mut ring = CeRing::new(1, "a", false);

        for i in 0 .. 60 {
            ring.get(i, &mut source).unwrap();
        }

        assert!(matches!(ring.get(0, &mut source), Err(CollationError::BufferSequence { .. })));
        assert!(ring.get(59, &mut source).is_ok());
    }

    #[test]
    fn wildcards_reserve_room()
    {
        assert_eq!(CeRing::new(2, "ab", false).buffer.len(), 34);
        assert_eq!(CeRing::new(2, "ab", true).buffer.len(), 40);
        assert_eq!(CeRing::new(1, "\u{1100}", true).buffer.len(), 41);
    }
}
