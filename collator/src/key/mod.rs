mod bocu;
mod level;

use core::fmt;

use unicode_normalization::UnicodeNormalization;

pub use level::SortKeyLevel;

use crate::buffer::CollationBuffer;
use crate::codepoint::Text;
use crate::collation_element::*;
use crate::data::CollationData;
use crate::options::{CaseFirst, CollationSettings, Strength};
use crate::scanner::Scanner;

// сжатие общих весов: серия из n общих весов записывается одним байтом, выше или ниже
// общего в зависимости от следующего веса

const SEC_COMMON_LOW: u32 = COMMON_BYTE as u32;
const SEC_COMMON_MIDDLE: u32 = SEC_COMMON_LOW + 0x20;
const SEC_COMMON_HIGH: u32 = SEC_COMMON_LOW + 0x40;
const SEC_COMMON_MAX_COUNT: u32 = 0x21;

const CASE_LOWER_FIRST_COMMON_LOW: u32 = 1;
const CASE_LOWER_FIRST_COMMON_MIDDLE: u32 = 7;
const CASE_LOWER_FIRST_COMMON_HIGH: u32 = 13;
const CASE_LOWER_FIRST_COMMON_MAX_COUNT: u32 = 7;

const CASE_UPPER_FIRST_COMMON_LOW: u32 = 3;
const CASE_UPPER_FIRST_COMMON_HIGH: u32 = 15;
const CASE_UPPER_FIRST_COMMON_MAX_COUNT: u32 = 13;

const TER_ONLY_COMMON_LOW: u32 = COMMON_BYTE as u32;
const TER_ONLY_COMMON_MIDDLE: u32 = TER_ONLY_COMMON_LOW + 0x60;
const TER_ONLY_COMMON_HIGH: u32 = TER_ONLY_COMMON_LOW + 0xC0;
const TER_ONLY_COMMON_MAX_COUNT: u32 = 0x61;

const TER_LOWER_FIRST_COMMON_LOW: u32 = COMMON_BYTE as u32;
const TER_LOWER_FIRST_COMMON_MIDDLE: u32 = TER_LOWER_FIRST_COMMON_LOW + 0x20;
const TER_LOWER_FIRST_COMMON_HIGH: u32 = TER_LOWER_FIRST_COMMON_LOW + 0x40;
const TER_LOWER_FIRST_COMMON_MAX_COUNT: u32 = 0x21;

const TER_UPPER_FIRST_COMMON_LOW: u32 = COMMON_BYTE as u32 + 0x80;
const TER_UPPER_FIRST_COMMON_MIDDLE: u32 = TER_UPPER_FIRST_COMMON_LOW + 0x20;
const TER_UPPER_FIRST_COMMON_HIGH: u32 = TER_UPPER_FIRST_COMMON_LOW + 0x40;
const TER_UPPER_FIRST_COMMON_MAX_COUNT: u32 = 0x21;

const QUAT_COMMON_LOW: u32 = 0x1C;
const QUAT_COMMON_MIDDLE: u32 = QUAT_COMMON_LOW + 0x70;
const QUAT_COMMON_HIGH: u32 = QUAT_COMMON_LOW + 0xE0;
const QUAT_COMMON_MAX_COUNT: u32 = 0x71;
/// сдвинутые первичные веса начинаются ниже диапазона сжатия
const QUAT_SHIFTED_LIMIT_BYTE: u32 = QUAT_COMMON_LOW - 1;

const PRIMARY_LEVEL: u8 = 1 << 1;
const SECONDARY_LEVEL: u8 = 1 << 2;
const CASE_LEVEL: u8 = 1 << 3;
const TERTIARY_LEVEL: u8 = 1 << 4;
const QUATERNARY_LEVEL: u8 = 1 << 5;

/// ключ сопоставления: побайтовое сравнение ключей совпадает со сравнением строк
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortKey(Box<[u8]>);

impl SortKey
{
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8]
    {
        &self.0
    }

    #[inline(always)]
    pub fn len(&self) -> usize
    {
        self.0.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool
    {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Box<[u8]>
    {
        self.0
    }
}

impl AsRef<[u8]> for SortKey
{
    fn as_ref(&self) -> &[u8]
    {
        &self.0
    }
}

impl fmt::Debug for SortKey
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str("[")?;

        for (i, byte) in self.0.iter().enumerate() {
            match i {
                0 => write!(f, "{byte:02X}")?,
                _ => write!(f, " {byte:02X}")?,
            }
        }

        f.write_str("]")
    }
}

/// уровни, записываемые при заданных настройках
#[inline(always)]
fn levels(settings: &CollationSettings) -> u8
{
    let levels = match settings.strength() {
        Strength::Primary => PRIMARY_LEVEL,
        Strength::Secondary => PRIMARY_LEVEL | SECONDARY_LEVEL,
        Strength::Tertiary => PRIMARY_LEVEL | SECONDARY_LEVEL | TERTIARY_LEVEL,
        Strength::Quaternary | Strength::Identical => {
            PRIMARY_LEVEL | SECONDARY_LEVEL | TERTIARY_LEVEL | QUATERNARY_LEVEL
        }
    };

    match settings.case_level() {
        true => levels | CASE_LEVEL,
        false => levels,
    }
}

/// ключ сопоставления строки
pub fn sort_key(
    data: &CollationData,
    settings: &CollationSettings,
    text: Text,
    buffer: &mut CollationBuffer,
) -> SortKey
{
    let mut scanner = Scanner::new(data, settings, text, core::mem::take(&mut buffer.left));
    let mut sink = SortKeyLevel::new();

    write_sort_key_up_to_quaternary(&mut scanner, data, settings, &mut sink);

    buffer.left = scanner.into_buffers();

    if settings.strength() == Strength::Identical {
        sink.append_byte(LEVEL_SEPARATOR_BYTE);

        let mut identical = vec![];
        bocu::write_identical_level(0, text.chars_from(0).nfd(), &mut identical);
        sink.append_bytes(&identical);
    }

    sink.append_byte(TERMINATOR_BYTE);

    SortKey(sink.into_vec().into_boxed_slice())
}

/// общая серия весов перед весом ниже общего (low) или выше (high)
#[inline(always)]
fn flush_common(
    level: &mut SortKeyLevel,
    count: &mut u32,
    middle: u32,
    max: u32,
    byte: impl FnOnce(u32) -> u32,
)
{
    if *count == 0 {
        return;
    }

    *count -= 1;

    while *count >= max {
        level.append_byte(middle as u8);
        *count -= max;
    }

    level.append_byte(byte(*count) as u8);
    *count = 0;
}

/// уровни с первичного по четвертичный, разделенные LEVEL_SEPARATOR_BYTE, без завершающего байта
fn write_sort_key_up_to_quaternary(
    scanner: &mut Scanner,
    data: &CollationData,
    settings: &CollationSettings,
    sink: &mut SortKeyLevel,
)
{
    let levels = levels(settings);
    let backward_secondary = settings.backward_secondary();
    let upper_first = settings.case_first() == CaseFirst::UpperFirst;
    let shifted = settings.is_shifted();

    let variable_top = match shifted {
        true => settings.variable_top().saturating_add(1),
        false => 0,
    };

    let tertiary_mask = settings.tertiary_mask();
    let reorder = |lead: u32| settings.reorder(lead << 24) >> 24;

    let mut cases = SortKeyLevel::new();
    let mut secondaries = SortKeyLevel::new();
    let mut tertiaries = SortKeyLevel::new();
    let mut quaternaries = SortKeyLevel::new();

    // 0 - без сжатия, иначе переставленный ведущий байт сжимаемого первичного веса
    let mut compressed_p1 = 0;
    let mut common_cases = 0;
    let mut common_secondaries = 0;
    let mut common_tertiaries = 0;
    let mut common_quaternaries = 0;

    let mut prev_secondary = 0;
    let mut any_merge_separators = false;

    let is_variable = |p: u32| p < variable_top && p > MERGE_SEPARATOR_PRIMARY;

    loop {
        scanner.clear_ces_if_none_remaining();

        let mut ce = scanner.next_ce();
        let mut p = primary(ce);

        if is_variable(p) {
            // переменный CE сдвигается на четвертичный уровень, следующие игнорируемые по
            // первичному весу CE отбрасываются
            flush_common(
                &mut quaternaries,
                &mut common_quaternaries,
                QUAT_COMMON_MIDDLE,
                QUAT_COMMON_MAX_COUNT,
                |count| QUAT_COMMON_LOW + count,
            );

            loop {
                if levels & QUATERNARY_LEVEL != 0 {
                    let p1 = reorder(p >> 24);

                    if p1 >= QUAT_SHIFTED_LIMIT_BYTE {
                        quaternaries.append_byte(QUAT_SHIFTED_LIMIT_BYTE as u8);
                    }

                    quaternaries.append_weight32((p1 << 24) | (p & 0x00FF_FFFF));
                }

                loop {
                    scanner.clear_ces_if_none_remaining();
                    ce = scanner.next_ce();
                    p = primary(ce);

                    if p != 0 {
                        break;
                    }
                }

                if !is_variable(p) {
                    break;
                }
            }
        }

        // ce - игнорируемый по первичному весу, NO_CE, разделитель или обычный CE
        if p > NO_CE_PRIMARY && levels & PRIMARY_LEVEL != 0 {
            let p1 = reorder(p >> 24);

            if p1 != compressed_p1 {
                if compressed_p1 != 0 {
                    if p1 < compressed_p1 {
                        // в конце уровня или сегмента завершающий байт сжатия не нужен
                        if p1 > MERGE_SEPARATOR_BYTE as u32 {
                            sink.append_byte(PRIMARY_COMPRESSION_LOW_BYTE);
                        }
                    } else {
                        sink.append_byte(PRIMARY_COMPRESSION_HIGH_BYTE);
                    }
                }

                sink.append_byte(p1 as u8);

                // сжимаемость проверяется по исходному ведущему байту
                compressed_p1 = match data.is_compressible((p >> 24) as u8) {
                    true => p1,
                    false => 0,
                };
            }

            let rest = [(p >> 16) as u8, (p >> 8) as u8, p as u8];

            let length = match rest {
                [0, _, _] => 0,
                [_, 0, _] => 1,
                [_, _, 0] => 2,
                _ => 3,
            };

            sink.append_bytes(&rest[.. length]);
        }

        let lower32 = lower32(ce);

        if levels & SECONDARY_LEVEL != 0 {
            let s = lower32 >> 16;

            if s == 0 {
                // игнорируемый по вторичному весу
            } else if s == COMMON_WEIGHT16 {
                common_secondaries += 1;
            } else if !backward_secondary {
                flush_common(
                    &mut secondaries,
                    &mut common_secondaries,
                    SEC_COMMON_MIDDLE,
                    SEC_COMMON_MAX_COUNT,
                    |count| match s < COMMON_WEIGHT16 {
                        true => SEC_COMMON_LOW + count,
                        false => SEC_COMMON_HIGH - count,
                    },
                );

                secondaries.append_weight16(s);
            } else {
                if common_secondaries != 0 {
                    common_secondaries -= 1;

                    // уровень будет развернут, поэтому сначала остаток, затем полные серии
                    let remainder = common_secondaries % SEC_COMMON_MAX_COUNT;

                    let byte = match prev_secondary < COMMON_WEIGHT16 {
                        true => SEC_COMMON_LOW + remainder,
                        false => SEC_COMMON_HIGH - remainder,
                    };

                    secondaries.append_byte(byte as u8);
                    common_secondaries -= remainder;

                    while common_secondaries > 0 {
                        secondaries.append_byte(SEC_COMMON_MIDDLE as u8);
                        common_secondaries -= SEC_COMMON_MAX_COUNT;
                    }
                }

                // разделители уменьшаются на 1, чтобы затем искать байты <= 1
                if s <= MERGE_SEPARATOR_WEIGHT16 {
                    if s == MERGE_SEPARATOR_WEIGHT16 {
                        any_merge_separators = true;
                    }

                    secondaries.append_byte(((s >> 8) - 1) as u8);
                } else {
                    secondaries.append_reverse_weight16(s);
                }

                prev_secondary = s;
            }
        }

        // полностью игнорируемый
        if lower32 == 0 {
            continue;
        }

        if levels & CASE_LEVEL != 0 {
            let ignored = match settings.strength() {
                Strength::Primary => p == 0,
                _ => lower32 <= 0xFFFF,
            };

            if !ignored {
                // биты регистра и старший байт третичного веса
                let mut c = (lower32 >> 8) & 0xFF;

                if c & 0xC0 == 0 && c > MERGE_SEPARATOR_BYTE as u32 {
                    common_cases += 1;
                } else {
                    match upper_first {
                        // строчные вперед: общие веса в полубайтах 1..7..13, смешанный 14, заглавные 15
                        false => {
                            flush_common(
                                &mut cases,
                                &mut common_cases,
                                CASE_LOWER_FIRST_COMMON_MIDDLE << 4,
                                CASE_LOWER_FIRST_COMMON_MAX_COUNT,
                                |count| match c <= MERGE_SEPARATOR_BYTE as u32 {
                                    true => (CASE_LOWER_FIRST_COMMON_LOW + count) << 4,
                                    false => (CASE_LOWER_FIRST_COMMON_HIGH - count) << 4,
                                },
                            );

                            if c > MERGE_SEPARATOR_BYTE as u32 {
                                c = (CASE_LOWER_FIRST_COMMON_HIGH + (c >> 6)) << 4;
                            }
                        }
                        // заглавные вперед: общие веса 3..15, смешанный 2, заглавные 1
                        true => {
                            flush_common(
                                &mut cases,
                                &mut common_cases,
                                CASE_UPPER_FIRST_COMMON_LOW << 4,
                                CASE_UPPER_FIRST_COMMON_MAX_COUNT,
                                |count| (CASE_UPPER_FIRST_COMMON_LOW + count) << 4,
                            );

                            if c > MERGE_SEPARATOR_BYTE as u32 {
                                c = (CASE_UPPER_FIRST_COMMON_LOW - (c >> 6)) << 4;
                            }
                        }
                    }

                    // разделитель 01 / 02 или полубайт 0x10 .. 0xF0
                    cases.append_byte(c as u8);
                }
            }
        }

        if levels & TERTIARY_LEVEL != 0 {
            let mut t = lower32 & tertiary_mask;

            if t == COMMON_WEIGHT16 {
                common_tertiaries += 1;
            } else if tertiary_mask & 0x8000 == 0 {
                // без регистра: ведущие байты 06..3F переносятся в C6..FF
                flush_common(
                    &mut tertiaries,
                    &mut common_tertiaries,
                    TER_ONLY_COMMON_MIDDLE,
                    TER_ONLY_COMMON_MAX_COUNT,
                    |count| match t < COMMON_WEIGHT16 {
                        true => TER_ONLY_COMMON_LOW + count,
                        false => TER_ONLY_COMMON_HIGH - count,
                    },
                );

                if t > COMMON_WEIGHT16 {
                    t += 0xC000;
                }

                tertiaries.append_weight16(t);
            } else if !upper_first {
                // строчные вперед: ведущие байты 06..BF переносятся в 46..FF
                flush_common(
                    &mut tertiaries,
                    &mut common_tertiaries,
                    TER_LOWER_FIRST_COMMON_MIDDLE,
                    TER_LOWER_FIRST_COMMON_MAX_COUNT,
                    |count| match t < COMMON_WEIGHT16 {
                        true => TER_LOWER_FIRST_COMMON_LOW + count,
                        false => TER_LOWER_FIRST_COMMON_HIGH - count,
                    },
                );

                if t > COMMON_WEIGHT16 {
                    t += 0x4000;
                }

                tertiaries.append_weight16(t);
            } else {
                // заглавные вперед: биты регистра CE с первичным или вторичным весом
                // инвертируются, третичные CE сохраняют заглавный регистр
                if t <= MERGE_SEPARATOR_WEIGHT16 {
                    // разделители без изменений
                } else if lower32 > 0xFFFF {
                    t ^= CASE_MASK;

                    if t < (TER_UPPER_FIRST_COMMON_HIGH << 8) {
                        t -= 0x4000;
                    }
                } else {
                    t += 0x4000;
                }

                flush_common(
                    &mut tertiaries,
                    &mut common_tertiaries,
                    TER_UPPER_FIRST_COMMON_MIDDLE,
                    TER_UPPER_FIRST_COMMON_MAX_COUNT,
                    |count| match t < (TER_UPPER_FIRST_COMMON_LOW << 8) {
                        true => TER_UPPER_FIRST_COMMON_LOW + count,
                        false => TER_UPPER_FIRST_COMMON_HIGH - count,
                    },
                );

                tertiaries.append_weight16(t);
            }
        }

        if levels & QUATERNARY_LEVEL != 0 {
            let mut q = lower32 & 0xFFFF;

            if q & QUATERNARY_MASK == 0 && q > MERGE_SEPARATOR_WEIGHT16 {
                common_quaternaries += 1;
            } else if q <= MERGE_SEPARATOR_WEIGHT16
                && !shifted
                && matches!(quaternaries.last(), None | Some(MERGE_SEPARATOR_BYTE))
            {
                // без сдвига между разделителями только общие веса - их можно не писать
                quaternaries.append_byte((q >> 8) as u8);
            } else {
                q = match q <= MERGE_SEPARATOR_WEIGHT16 {
                    true => q >> 8,
                    false => 0xFC + ((q >> 6) & 3),
                };

                flush_common(
                    &mut quaternaries,
                    &mut common_quaternaries,
                    QUAT_COMMON_MIDDLE,
                    QUAT_COMMON_MAX_COUNT,
                    |count| match q < QUAT_COMMON_LOW {
                        true => QUAT_COMMON_LOW + count,
                        false => QUAT_COMMON_HIGH - count,
                    },
                );

                quaternaries.append_byte(q as u8);
            }
        }

        // NO_CE
        if lower32 >> 24 == LEVEL_SEPARATOR_BYTE as u32 {
            break;
        }
    }

    if levels & SECONDARY_LEVEL != 0 {
        sink.append_byte(LEVEL_SEPARATOR_BYTE);

        let length = secondaries.len().saturating_sub(1);

        if backward_secondary {
            reverse_segments(secondaries.as_mut_slice(), length, any_merge_separators);
        }

        sink.append_bytes(&secondaries.as_slice()[.. length]);
    }

    if levels & CASE_LEVEL != 0 {
        sink.append_byte(LEVEL_SEPARATOR_BYTE);

        // пары полубайт - байтами, разделители - как есть
        let mut pending = 0u8;

        for &c in cases.without_terminator() {
            if c <= MERGE_SEPARATOR_BYTE {
                if pending != 0 {
                    sink.append_byte(pending);
                    pending = 0;
                }

                sink.append_byte(c);
            } else if pending == 0 {
                pending = c;
            } else {
                sink.append_byte(pending | (c >> 4));
                pending = 0;
            }
        }

        if pending != 0 {
            sink.append_byte(pending);
        }
    }

    if levels & TERTIARY_LEVEL != 0 {
        sink.append_byte(LEVEL_SEPARATOR_BYTE);
        sink.append_bytes(tertiaries.without_terminator());
    }

    if levels & QUATERNARY_LEVEL != 0 {
        sink.append_byte(LEVEL_SEPARATOR_BYTE);
        sink.append_bytes(quaternaries.without_terminator());
    }
}

/// обратный вторичный уровень: развернуть сегменты между разделителями слияния
///
/// разделители записаны как 00 (конец) и 01 (U+FFFE), после разворота 01 восстанавливается в 02
fn reverse_segments(secondaries: &mut [u8], length: usize, any_merge_separators: bool)
{
    let mut start = 0;

    loop {
        let limit = match any_merge_separators {
            true => {
                let mut limit = start;

                while secondaries[limit] > 1 {
                    limit += 1;
                }

                limit
            }
            false => length,
        };

        secondaries[start .. limit].reverse();

        if secondaries[limit] == 0 {
            break;
        }

        secondaries[limit] = MERGE_SEPARATOR_BYTE;
        start = limit + 1;
    }
}
