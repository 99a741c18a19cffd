use std::collections::HashMap;

use crate::codepoint::Text;
use crate::collation_element::*;
use crate::data::CollationData;
use crate::error::{CollationError, Result};
use crate::hangul;
use crate::options::Strength;
use crate::scanner::{ScanBuffers, Scanner};
use crate::Tailoring;

/// диапазоны составных символов, CE которых проверяются при поиске максимальных расширений
const PRECOMPOSED_RANGES: &[(u32, u32)] = &[
    (0x00C0, 0x024F),
    (0x0370, 0x04FF),
    (0x1E00, 0x1FFF),
    (0xFB00, 0xFB06),
];

/// итератор legacy CE (32 бита) по тексту в обе стороны
///
/// 64-битный CE, которому нужны две половины, отдается двумя вызовами: вторая половина хранится
/// в other_half до следующего вызова в том же направлении
pub struct CollationElementIterator<'a>
{
    tailoring: &'a Tailoring,
    text: Text<'a>,
    scanner: Scanner<'a>,
    /// смещения CE, найденных при движении назад
    offsets: Vec<usize>,
    other_half: u32,
    /// <0 - назад, 0 - после reset, 1 - после set_offset, >1 - вперед
    dir: i8,
}

impl<'a> CollationElementIterator<'a>
{
    pub fn new(tailoring: &'a Tailoring, text: Text<'a>) -> Self
    {
        Self {
            tailoring,
            text,
            scanner: Scanner::new(
                tailoring.data(),
                tailoring.settings(),
                text,
                ScanBuffers::default(),
            ),
            offsets: vec![],
            other_half: 0,
            dir: 0,
        }
    }

    /// следующий CE или NULLORDER в конце текста
    pub fn next(&mut self) -> Result<u32>
    {
        match self.dir {
            dir if dir > 1 => {
                if self.other_half != 0 {
                    return Ok(core::mem::take(&mut self.other_half));
                }
            }
            0 | 1 => self.dir = 2,
            _ => return Err(CollationError::IllegalDirectionChange),
        }

        self.scanner.clear_ces_if_none_remaining();

        let ce = self.scanner.next_ce();

        if ce == NO_CE {
            return Ok(NULLORDER);
        }

        let (first, second) = legacy_halves(ce);

        if second != 0 {
            self.other_half = second | CONTINUATION_MARKER;
        }

        Ok(first)
    }

    /// предыдущий CE или NULLORDER в начале текста
    pub fn previous(&mut self) -> Result<u32>
    {
        match self.dir {
            dir if dir < 0 => {
                if self.other_half != 0 {
                    return Ok(core::mem::take(&mut self.other_half));
                }
            }
            0 => {
                self.scanner.reset_to_offset(self.text.len());
                self.dir = -1;
            }
            1 => self.dir = -1,
            _ => return Err(CollationError::IllegalDirectionChange),
        }

        // если в буфере уже есть CE расширения, то есть и смещения; иначе запоминаем конец
        // на случай искусственного расширения из двух половин
        let limit_offset = match self.scanner.ces_len() {
            0 => self.scanner.offset(),
            _ => 0,
        };

        let ce = self.scanner.previous_ce(&mut self.offsets);

        if ce == NO_CE {
            return Ok(NULLORDER);
        }

        let (first, second) = legacy_halves(ce);

        if second != 0 {
            if self.offsets.is_empty() {
                self.offsets.push(self.scanner.offset());
                self.offsets.push(limit_offset);
            }

            self.other_half = first;
            return Ok(second | CONTINUATION_MARKER);
        }

        Ok(first)
    }

    /// смещение в тексте, согласованное с движением вперед
    pub fn offset(&self) -> usize
    {
        if self.dir < 0 && !self.offsets.is_empty() {
            let mut i = self.scanner.ces_len();

            // посередине 64-битного CE - смещение его конца
            if self.other_half != 0 {
                i += 1;
            }

            if let Some(&offset) = self.offsets.get(i) {
                return offset;
            }
        }

        self.scanner.offset()
    }

    /// перейти к ближайшей безопасной позиции не правее offset
    pub fn set_offset(&mut self, offset: usize) -> Result<()>
    {
        let len = self.text.len();

        if offset > len {
            return Err(CollationError::OffsetOutOfRange { offset, len });
        }

        let mut new_offset = self.text.floor_boundary(offset);

        if 0 < new_offset && new_offset < len {
            let settings = self.tailoring.settings();
            let data = self.tailoring.data();
            let mut offset = new_offset;

            // назад из середины сокращения или комбинируемой последовательности
            while let Some((c, _)) = self.text.char_at(offset) {
                if !data.is_unsafe_backward(c, settings.is_numeric()) {
                    break;
                }

                match self.text.char_before(offset) {
                    Some((_, previous)) if previous > 0 => offset = previous,
                    _ => {
                        offset = 0;
                        break;
                    }
                }
            }

            // могли отступить больше, чем нужно: последнее безопасное смещение не правее new_offset
            if offset < new_offset {
                let mut last_safe = offset;

                loop {
                    self.scanner.reset_to_offset(last_safe);

                    loop {
                        self.scanner.next_ce();
                        offset = self.scanner.offset();

                        if offset != last_safe || offset == len {
                            break;
                        }
                    }

                    if offset <= new_offset {
                        last_safe = offset;
                    }

                    if offset >= new_offset {
                        break;
                    }
                }

                new_offset = last_safe;
            }
        }

        self.scanner.reset_to_offset(new_offset);
        self.other_half = 0;
        self.dir = 1;

        Ok(())
    }

    /// в начало текста
    pub fn reset(&mut self)
    {
        self.scanner.reset_to_offset(0);
        self.offsets.clear();
        self.other_half = 0;
        self.dir = 0;
    }

    /// новый текст; вариант сканера выбирается заново
    pub fn set_text(&mut self, text: Text<'a>)
    {
        let scanner = core::mem::replace(
            &mut self.scanner,
            Scanner::new(
                self.tailoring.data(),
                self.tailoring.settings(),
                Text::Utf8(""),
                ScanBuffers::default(),
            ),
        );

        self.scanner = Scanner::new(
            self.tailoring.data(),
            self.tailoring.settings(),
            text,
            scanner.into_buffers(),
        );
        self.text = text;
        self.offsets.clear();
        self.other_half = 0;
        self.dir = 0;
    }

    #[inline(always)]
    pub fn text(&self) -> Text<'a>
    {
        self.text
    }

    #[inline(always)]
    pub fn tailoring(&self) -> &'a Tailoring
    {
        self.tailoring
    }

    /// максимальное количество legacy CE расширения, заканчивающегося на order
    pub fn max_expansion(&self, order: u32) -> u32
    {
        max_expansion(self.tailoring.data(), order)
    }

    /// legacy CE без весов уровней выше уровня сравнения
    pub fn strength_order(&self, order: u32) -> u32
    {
        match self.tailoring.settings().strength() {
            Strength::Primary => order & 0xFFFF_0000,
            Strength::Secondary => order & 0xFFFF_FF00,
            _ => order,
        }
    }

    /// направление без различия "после reset" и "после set_offset"
    #[inline(always)]
    fn normalized_dir(&self) -> i8
    {
        match self.dir {
            1 => 0,
            dir => dir,
        }
    }
}

impl<'a> PartialEq for CollationElementIterator<'a>
{
    fn eq(&self, other: &Self) -> bool
    {
        self.tailoring == other.tailoring
            && self.text == other.text
            && self.other_half == other.other_half
            && self.normalized_dir() == other.normalized_dir()
            && self.offset() == other.offset()
    }
}

/// максимальная длина расширения по последней половине; по умолчанию 2 для продолжения, иначе 1
pub fn max_expansion(data: &CollationData, order: u32) -> u32
{
    if order == 0 {
        return 1;
    }

    let map = data
        .max_expansions_cell()
        .get_or_init(|| compute_max_expansions(data));

    match map.get(&order) {
        Some(&max) => max,
        None => match order & CONTINUATION_MARKER == CONTINUATION_MARKER {
            true => 2,
            false => 1,
        },
    }
}

/// обход всех расширений таблицы
fn compute_max_expansions(data: &CollationData) -> HashMap<u32, u32>
{
    let mut map = HashMap::new();

    let mut handle = |ces: &[u64]| {
        let last = match ces {
            [] | [_] => return,
            [.., last] => *last,
        };

        let count: u32 = ces
            .iter()
            .map(|&ce| match needs_two_parts(ce) {
                true => 2,
                false => 1,
            })
            .sum();

        let last_half = match legacy_halves(last) {
            (first, 0) => first,
            (_, second) => second | CONTINUATION_MARKER,
        };

        let max = map.entry(last_half).or_insert(0);
        *max = count.max(*max);
    };

    data.mappings().for_each(|(_, ces)| handle(ces));
    data.all_contractions().for_each(|contraction| handle(&contraction.ces));

    let precomposed = PRECOMPOSED_RANGES
        .iter()
        .flat_map(|&(first, last)| (first ..= last).filter_map(char::from_u32))
        .chain(hangul::syllables());

    for c in precomposed {
        handle(&data.ces_of(c));
    }

    map
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn continuation_defaults()
    {
        let tailoring = Tailoring::root();

        // вычисляемый вес хань - 4-байтный первичный, две половины
        let mut iter = CollationElementIterator::new(&tailoring, Text::Utf8("中"));
        let first = iter.next().unwrap();
        let second = iter.next().unwrap();

        assert!(!is_continuation(first));
        assert!(is_continuation(second));
        assert_eq!(iter.next().unwrap(), NULLORDER);
        assert_eq!(iter.max_expansion(second), 2);
        assert_eq!(iter.max_expansion(0), 1);
    }

    #[test]
    fn previous_after_next_fails()
    {
        let tailoring = Tailoring::root();
        let mut iter = CollationElementIterator::new(&tailoring, Text::Utf8("abc"));

        iter.next().unwrap();
        assert_eq!(iter.previous(), Err(CollationError::IllegalDirectionChange));

        iter.reset();
        assert!(iter.previous().is_ok());
        assert_eq!(iter.next(), Err(CollationError::IllegalDirectionChange));
    }
}
