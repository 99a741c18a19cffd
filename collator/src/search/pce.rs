use smallvec::SmallVec;

use crate::collation_element::*;
use crate::elements::CollationElementIterator;
use crate::error::Result;
use crate::options::Strength;

/// конец текста для обработанных CE; не совпадает с игнорируемым (0)
pub const PROCESSED_NULLORDER: u64 = u64::MAX;

/// обработанный CE и диапазон текста, из которого он получен
///
/// после расширения low == high: CE не начинает символ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessedCe
{
    pub ce: u64,
    pub low: usize,
    pub high: usize,
}

impl ProcessedCe
{
    #[inline(always)]
    pub fn is_end(&self) -> bool
    {
        self.ce == PROCESSED_NULLORDER
    }

    /// первичный вес (16 бит)
    #[inline(always)]
    pub fn primary(&self) -> u64
    {
        self.ce >> 48
    }
}

/// сырой legacy CE, прочитанный назад
#[derive(Debug, Clone, Copy)]
struct RawCe
{
    ce: u32,
    low: usize,
    high: usize,
}

/// итератор обработанных CE: 64-битные значения вида
///
/// ```text
/// pppp pppp  pppp pppp | ssss ssss  ssss ssss | tttt tttt  tttt tttt | qqqq qqqq  qqqq qqqq
/// ```
///
/// веса уровней ниже уровня сравнения обнулены, переменные веса при shifted перенесены
/// в четвертичный
pub struct CollationPce<'a>
{
    iter: CollationElementIterator<'a>,
    /// готовые CE при движении назад, выдаются с конца
    processed: SmallVec<[ProcessedCe; 16]>,
    strength: Strength,
    to_shift: bool,
    /// предыдущий CE был переменным
    is_shifted: bool,
    variable_top: u32,
}

impl<'a> CollationPce<'a>
{
    pub fn new(iter: CollationElementIterator<'a>) -> Self
    {
        let settings = iter.tailoring().settings();

        Self {
            strength: settings.strength(),
            to_shift: settings.is_shifted(),
            variable_top: settings.variable_top(),
            is_shifted: false,
            processed: SmallVec::new(),
            iter,
        }
    }

    #[inline(always)]
    pub fn iter(&self) -> &CollationElementIterator<'a>
    {
        &self.iter
    }

    #[inline(always)]
    pub fn iter_mut(&mut self) -> &mut CollationElementIterator<'a>
    {
        &mut self.iter
    }

    /// сбросить состояние перед новым проходом по тексту
    pub fn restart(&mut self)
    {
        self.processed.clear();
        self.is_shifted = false;
    }

    fn process_ce(&mut self, ce: u32) -> u64
    {
        let mut primary = primary_order(ce) as u64;

        let mut secondary = match self.strength >= Strength::Secondary {
            true => secondary_order(ce) as u64,
            false => 0,
        };

        let mut tertiary = match self.strength >= Strength::Tertiary {
            true => tertiary_order(ce) as u64,
            false => 0,
        };

        let mut quaternary = 0;

        // продолжение наследует признак переменного веса от первой половины
        let variable = match is_continuation(ce) {
            true => self.is_shifted && primary != 0,
            false => self.to_shift && primary != 0 && ce <= self.variable_top,
        };

        if variable || (self.is_shifted && primary == 0) {
            if primary == 0 {
                return IGNORABLE as u64;
            }

            if self.strength >= Strength::Quaternary {
                quaternary = primary;
            }

            primary = 0;
            secondary = 0;
            tertiary = 0;
            self.is_shifted = true;
        } else {
            if self.strength >= Strength::Quaternary {
                quaternary = 0xFFFF;
            }

            self.is_shifted = false;
        }

        primary << 48 | secondary << 32 | tertiary << 16 | quaternary
    }

    /// следующий неигнорируемый обработанный CE или PROCESSED_NULLORDER
    pub fn next_processed(&mut self) -> Result<ProcessedCe>
    {
        self.processed.clear();

        loop {
            let low = self.iter.offset();
            let ce = self.iter.next()?;
            let high = self.iter.offset();

            if ce == NULLORDER {
                return Ok(ProcessedCe {
                    ce: PROCESSED_NULLORDER,
                    low,
                    high,
                });
            }

            match self.process_ce(ce) {
                0 => continue,
                ce => return Ok(ProcessedCe { ce, low, high }),
            }
        }
    }

    /// предыдущий неигнорируемый обработанный CE или PROCESSED_NULLORDER
    ///
    /// сырые CE читаются назад до CE с ненулевым первичным весом, затем обрабатываются в прямом
    /// порядке: результат обработки зависит от предыдущего CE
    pub fn previous_processed(&mut self) -> Result<ProcessedCe>
    {
        while self.processed.is_empty() {
            let mut raw: SmallVec<[RawCe; 16]> = SmallVec::new();

            loop {
                let high = self.iter.offset();
                let ce = self.iter.previous()?;
                let low = self.iter.offset();

                if ce == NULLORDER {
                    break;
                }

                raw.push(RawCe { ce, low, high });

                if ce & 0xFFFF_0000 != 0 && !is_continuation(ce) {
                    break;
                }
            }

            if raw.is_empty() {
                break;
            }

            while let Some(RawCe { ce, low, high }) = raw.pop() {
                match self.process_ce(ce) {
                    0 => (),
                    ce => self.processed.push(ProcessedCe { ce, low, high }),
                }
            }
        }

        Ok(self.processed.pop().unwrap_or(ProcessedCe {
            ce: PROCESSED_NULLORDER,
            low: 0,
            high: 0,
        }))
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::codepoint::Text;
    use crate::options::{AlternateHandling, CollatorOptions};
    use crate::Tailoring;

    fn forward(pce: &mut CollationPce) -> Vec<ProcessedCe>
    {
        let mut result = vec![];

        loop {
            let ce = pce.next_processed().unwrap();

            if ce.is_end() {
                return result;
            }

            result.push(ce);
        }
    }

    fn backward(pce: &mut CollationPce) -> Vec<ProcessedCe>
    {
        let mut result = vec![];

        loop {
            let ce = pce.previous_processed().unwrap();

            if ce.is_end() {
                return result;
            }

            result.push(ce);
        }
    }

    #[test]
    fn levels_are_packed()
    {
        let tailoring = Tailoring::root();
        let mut pce = CollationPce::new(tailoring.element_iter("a"));

        let a = pce.next_processed().unwrap();

        assert_eq!((a.low, a.high), (0, 1));
        assert_ne!(a.primary(), 0);
        assert_eq!((a.ce >> 32) & 0xFFFF, COMMON_BYTE as u64);
        assert_eq!((a.ce >> 16) & 0xFFFF, COMMON_BYTE as u64);
        assert_eq!(a.ce & 0xFFFF, 0);
        assert!(pce.next_processed().unwrap().is_end());
    }

    #[test]
    fn backward_mirrors_forward()
    {
        let tailoring = Tailoring::root();

        for text in ["abc", "a\u{300}b", "x-y z", "中文", "æb"] {
            let mut pce = CollationPce::new(tailoring.element_iter(text));
            let mut expected = forward(&mut pce);
            expected.reverse();

            let mut pce = CollationPce::new(tailoring.element_iter(text));
            let actual = backward(&mut pce);

            assert_eq!(
                actual.iter().map(|ce| ce.ce).collect::<Vec<_>>(),
                expected.iter().map(|ce| ce.ce).collect::<Vec<_>>(),
                "{:?}",
                text
            );
        }
    }

    #[test]
    fn shifted_punctuation_is_dropped()
    {
        let mut tailoring = Tailoring::root();
        tailoring.set_options(CollatorOptions {
            alternate: AlternateHandling::Shifted,
            ..Default::default()
        });

        let mut pce = CollationPce::new(CollationElementIterator::new(&tailoring, Text::Utf8("a-b")));

        assert_eq!(forward(&mut pce).len(), 2);

        tailoring.set_options(CollatorOptions {
            alternate: AlternateHandling::Shifted,
            strength: Strength::Quaternary,
            ..Default::default()
        });

        let mut pce = CollationPce::new(CollationElementIterator::new(&tailoring, Text::Utf8("a-b")));
        let ces = forward(&mut pce);

        assert_eq!(ces.len(), 3);
        assert_eq!(ces[1].ce >> 16, 0);
        assert_ne!(ces[1].ce & 0xFFFF, 0);
        assert_eq!(ces[0].ce & 0xFFFF, 0xFFFF);
    }
}
