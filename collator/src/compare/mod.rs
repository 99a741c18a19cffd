pub mod fast_latin;
mod identical;

use core::cmp::Ordering;

pub use identical::compare_nfd;

use crate::buffer::CollationBuffer;
use crate::codepoint::Text;
use crate::collation_element::*;
use crate::data::CollationData;
use crate::options::{CaseFirst, CollationSettings, Strength};
use crate::scanner::Scanner;

/// сравнение строк с учетом настроек
pub fn compare(
    data: &CollationData,
    settings: &CollationSettings,
    left: Text,
    right: Text,
    buffer: &mut CollationBuffer,
) -> Ordering
{
    if same_text(left, right) {
        return Ordering::Equal;
    }

    let prefix = match equal_prefix(left, right) {
        Some(prefix) => safe_prefix(data, settings, left, right, prefix),
        None => return Ordering::Equal,
    };

    let order = match starts_latin(left, prefix) && starts_latin(right, prefix) {
        true => fast_latin::compare(data, settings, left, right, prefix),
        false => fast_latin::BAIL_OUT,
    };

    let order = match order {
        Some(order) => order,
        None => {
            let mut left_scanner = Scanner::at_offset(
                data,
                settings,
                left,
                core::mem::take(&mut buffer.left),
                prefix,
            );
            let mut right_scanner = Scanner::at_offset(
                data,
                settings,
                right,
                core::mem::take(&mut buffer.right),
                prefix,
            );

            let order = compare_up_to_quaternary(&mut left_scanner, &mut right_scanner, settings);

            buffer.left = left_scanner.into_buffers();
            buffer.right = right_scanner.into_buffers();

            order
        }
    };

    if order != Ordering::Equal || settings.strength() < Strength::Identical {
        return order;
    }

    compare_nfd(left.chars_from(prefix), right.chars_from(prefix))
}

/// одна и та же строка (тот же адрес и длина)
#[inline(always)]
fn same_text(left: Text, right: Text) -> bool
{
    match (left, right) {
        (Text::Utf8(a), Text::Utf8(b)) => core::ptr::eq(a, b),
        (Text::Utf16(a), Text::Utf16(b)) => core::ptr::eq(a, b),
        _ => false,
    }
}

/// длина общего префикса по границам символов; None - строки совпадают
fn equal_prefix(left: Text, right: Text) -> Option<usize>
{
    let length = match (left, right) {
        (Text::Utf8(a), Text::Utf8(b)) => common_prefix(a.as_bytes(), b.as_bytes()),
        (Text::Utf16(a), Text::Utf16(b)) => common_prefix(a, b),
        // разные кодировки: общий префикс не ищется
        _ => return Some(0),
    };

    if length == left.len() && length == right.len() {
        return None;
    }

    Some(left.floor_boundary(length).min(right.floor_boundary(length)))
}

#[inline(always)]
fn common_prefix<T: PartialEq>(a: &[T], b: &[T]) -> usize
{
    a.iter().zip(b).take_while(|(a, b)| a == b).count()
}

/// отступить назад, если сравнение не может начаться с позиции prefix
fn safe_prefix(
    data: &CollationData,
    settings: &CollationSettings,
    left: Text,
    right: Text,
    mut prefix: usize,
) -> usize
{
    if prefix == 0 {
        return 0;
    }

    let numeric = settings.is_numeric();
    let is_unsafe = |text: Text, pos: usize| match text.char_at(pos) {
        Some((c, _)) => data.is_unsafe_backward(c, numeric),
        None => false,
    };

    if is_unsafe(left, prefix) || is_unsafe(right, prefix) {
        // назад к началу сокращения или комбинируемой последовательности
        loop {
            prefix = left.char_before(prefix).map_or(0, |(_, previous)| previous);

            if prefix == 0 || !is_unsafe(left, prefix) {
                break;
            }
        }
    }

    prefix
}

#[inline(always)]
fn starts_latin(text: Text, pos: usize) -> bool
{
    match text.char_at(pos) {
        Some((c, _)) => c as u32 <= fast_latin::LATIN_MAX,
        None => true,
    }
}

/// первичный вес следующего значимого CE; переменные CE сдвигаются на четвертичный уровень
#[inline(always)]
fn next_primary(scanner: &mut Scanner, variable_top: u32, any_variable: &mut bool) -> u32
{
    loop {
        let mut ce = scanner.next_ce();
        let mut p = primary(ce);

        if p < variable_top && p > MERGE_SEPARATOR_PRIMARY {
            *any_variable = true;

            // от переменного CE остается только первичный вес, следующие за ним
            // игнорируемые по первичному весу CE отбрасываются
            loop {
                scanner.set_current_ce(ce & 0xFFFF_FFFF_0000_0000);

                loop {
                    ce = scanner.next_ce();
                    p = primary(ce);

                    match p {
                        0 => scanner.set_current_ce(0),
                        _ => break,
                    }
                }

                if !(p < variable_top && p > MERGE_SEPARATOR_PRIMARY) {
                    break;
                }
            }
        }

        if p != 0 {
            return p;
        }
    }
}

/// сравнение по CE до четвертичного уровня включительно
pub fn compare_up_to_quaternary(
    left: &mut Scanner,
    right: &mut Scanner,
    settings: &CollationSettings,
) -> Ordering
{
    let strength = settings.strength();

    // +1: сравнение через "<", игнорируемые по первичному весу отсекаются раньше
    let variable_top = match settings.is_shifted() {
        true => settings.variable_top().saturating_add(1),
        false => 0,
    };

    let mut any_variable = false;

    // первичный уровень, CE сохраняются в буферах сканеров
    loop {
        let mut left_primary = next_primary(left, variable_top, &mut any_variable);
        let mut right_primary = next_primary(right, variable_top, &mut any_variable);

        if left_primary != right_primary {
            if settings.has_reordering() {
                left_primary = settings.reorder(left_primary);
                right_primary = settings.reorder(right_primary);
            }

            return left_primary.cmp(&right_primary);
        }

        if left_primary == NO_CE_PRIMARY {
            break;
        }
    }

    if strength >= Strength::Secondary {
        let order = match settings.backward_secondary() {
            false => compare_secondary(left, right),
            true => compare_secondary_backward(left, right),
        };

        if order != Ordering::Equal {
            return order;
        }
    }

    if settings.case_level() {
        let order = compare_case_level(left, right, strength);

        if order != Ordering::Equal {
            return match settings.case_first() == CaseFirst::UpperFirst {
                true => order.reverse(),
                false => order,
            };
        }
    }

    if strength <= Strength::Secondary {
        return Ordering::Equal;
    }

    let (order, any_quaternaries) = compare_tertiary(left, right, settings);

    if order != Ordering::Equal || strength <= Strength::Tertiary {
        return order;
    }

    // без переменных CE и четвертичных весов различий на четвертичном уровне нет
    if !any_variable && any_quaternaries & QUATERNARY_MASK == 0 {
        return Ordering::Equal;
    }

    compare_quaternary(left, right, settings)
}

fn compare_secondary(left: &Scanner, right: &Scanner) -> Ordering
{
    let (mut left_index, mut right_index) = (0, 0);

    let next = |scanner: &Scanner, index: &mut usize| loop {
        let secondary = lower32(scanner.ce_at(*index)) >> 16;
        *index += 1;

        if secondary != 0 {
            return secondary;
        }
    };

    loop {
        let left_secondary = next(left, &mut left_index);
        let right_secondary = next(right, &mut right_index);

        if left_secondary != right_secondary {
            return left_secondary.cmp(&right_secondary);
        }

        if left_secondary == NO_CE_WEIGHT16 {
            return Ordering::Equal;
        }
    }
}

/// французский вторичный уровень: в обратном порядке внутри сегментов между разделителями слияния
fn compare_secondary_backward(left: &Scanner, right: &Scanner) -> Ordering
{
    let (mut left_start, mut right_start) = (0, 0);

    let segment_limit = |scanner: &Scanner, start: usize| {
        let mut limit = start;

        loop {
            let p = primary(scanner.ce_at(limit));

            if p != 0 && p <= MERGE_SEPARATOR_PRIMARY {
                return (limit, p);
            }

            limit += 1;
        }
    };

    let previous = |scanner: &Scanner, index: &mut usize, start: usize| {
        while *index > start {
            *index -= 1;

            let secondary = lower32(scanner.ce_at(*index)) >> 16;

            if secondary != 0 {
                return secondary;
            }
        }

        0
    };

    loop {
        let (left_limit, p) = segment_limit(left, left_start);
        let (right_limit, _) = segment_limit(right, right_start);

        let (mut left_index, mut right_index) = (left_limit, right_limit);

        loop {
            let left_secondary = previous(left, &mut left_index, left_start);
            let right_secondary = previous(right, &mut right_index, right_start);

            if left_secondary != right_secondary {
                return left_secondary.cmp(&right_secondary);
            }

            if left_secondary == 0 {
                break;
            }
        }

        // разделителей поровну, иначе было бы различие на первичном уровне
        if p == NO_CE_PRIMARY {
            return Ordering::Equal;
        }

        left_start = left_limit + 1;
        right_start = right_limit + 1;
    }
}

/// уровень регистра: веса регистра игнорируемых по первичному (или вторичному) уровню CE
/// не учитываются
fn compare_case_level(left: &Scanner, right: &Scanner, strength: Strength) -> Ordering
{
    let (mut left_index, mut right_index) = (0, 0);

    let next = |scanner: &Scanner, index: &mut usize| loop {
        let ce = scanner.ce_at(*index);
        *index += 1;

        let skip = match strength {
            Strength::Primary => primary(ce) == 0 || lower32(ce) == 0,
            _ => lower32(ce) & 0xFFFF_0000 == 0,
        };

        if !skip {
            return lower32(ce);
        }
    };

    loop {
        let left_lower32 = next(left, &mut left_index);
        let right_lower32 = next(right, &mut right_index);

        let (left_case, right_case) = (left_lower32 & CASE_MASK, right_lower32 & CASE_MASK);

        if left_case != right_case {
            return left_case.cmp(&right_case);
        }

        if left_lower32 >> 16 == NO_CE_WEIGHT16 {
            return Ordering::Equal;
        }
    }
}

/// третичный уровень; вторым значением - объединение младших слов для проверки четвертичных весов
fn compare_tertiary(left: &Scanner, right: &Scanner, settings: &CollationSettings) -> (Ordering, u32)
{
    let mask = settings.tertiary_mask();
    let upper_first = settings.sorts_tertiary_upper_case_first();

    let (mut left_index, mut right_index) = (0, 0);
    let mut any_quaternaries = 0;

    let mut next = |scanner: &Scanner, index: &mut usize| loop {
        let lower32 = lower32(scanner.ce_at(*index));
        *index += 1;
        any_quaternaries |= lower32;

        let tertiary = lower32 & mask;

        if tertiary != 0 {
            return (lower32, tertiary);
        }
    };

    // заглавные вперед: инверсия битов регистра, NO_CE остается наименьшим
    let upper_first_weight = |lower32: u32, tertiary: u32| {
        if tertiary <= NO_CE_WEIGHT16 {
            return tertiary;
        }

        match lower32 & 0xFFFF_0000 != 0 {
            true => tertiary ^ CASE_MASK,
            false => tertiary + 0x4000,
        }
    };

    loop {
        let (left_lower32, mut left_tertiary) = next(left, &mut left_index);
        let (right_lower32, mut right_tertiary) = next(right, &mut right_index);

        if left_tertiary != right_tertiary {
            if upper_first {
                left_tertiary = upper_first_weight(left_lower32, left_tertiary);
                right_tertiary = upper_first_weight(right_lower32, right_tertiary);
            }

            return (left_tertiary.cmp(&right_tertiary), any_quaternaries);
        }

        if left_tertiary == NO_CE_WEIGHT16 {
            return (Ordering::Equal, any_quaternaries);
        }
    }
}

fn compare_quaternary(left: &Scanner, right: &Scanner, settings: &CollationSettings) -> Ordering
{
    let (mut left_index, mut right_index) = (0, 0);

    let next = |scanner: &Scanner, index: &mut usize| loop {
        let ce = scanner.ce_at(*index);
        *index += 1;

        // переменный, полностью игнорируемый или NO_CE - первичный вес, иначе четвертичный
        // вес в битах 7..6
        let quaternary = match ce as u32 & 0xFFFF {
            low if low <= NO_CE_WEIGHT16 => primary(ce),
            low => low | 0xFFFF_FF3F,
        };

        if quaternary != 0 {
            return quaternary;
        }
    };

    loop {
        let mut left_quaternary = next(left, &mut left_index);
        let mut right_quaternary = next(right, &mut right_index);

        if left_quaternary != right_quaternary {
            if settings.has_reordering() {
                left_quaternary = settings.reorder(left_quaternary);
                right_quaternary = settings.reorder(right_quaternary);
            }

            return left_quaternary.cmp(&right_quaternary);
        }

        if left_quaternary == NO_CE_PRIMARY {
            return Ordering::Equal;
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::data::root;
    use crate::options::{AlternateHandling, CollatorOptions};

    fn cmp(settings: &CollationSettings, left: &str, right: &str) -> Ordering
    {
        compare(
            &root(),
            settings,
            Text::Utf8(left),
            Text::Utf8(right),
            &mut CollationBuffer::default(),
        )
    }

    #[test]
    fn levels()
    {
        let settings = CollationSettings::default();

        assert_eq!(cmp(&settings, "a", "b"), Ordering::Less);
        assert_eq!(cmp(&settings, "a", "á"), Ordering::Less);
        assert_eq!(cmp(&settings, "a", "A"), Ordering::Less);
        assert_eq!(cmp(&settings, "ab", "ab"), Ordering::Equal);
    }

    #[test]
    fn prefix_backs_up_before_marks()
    {
        let settings = CollationSettings::default();

        // общий префикс "xa", различие в порядке знаков после него
        assert_eq!(cmp(&settings, "xa\u{301}b", "xa\u{301}c"), Ordering::Less);
        assert_eq!(cmp(&settings, "xa\u{325}", "xa\u{301}"), cmp(&settings, "\u{325}", "\u{301}"));
    }

    #[test]
    fn shifted_ignores_punctuation()
    {
        let settings = CollationSettings::new(CollatorOptions {
            alternate: AlternateHandling::Shifted,
            ..Default::default()
        });

        assert_eq!(cmp(&settings, "a-b", "ab"), Ordering::Equal);

        let quaternary = CollationSettings::new(CollatorOptions {
            alternate: AlternateHandling::Shifted,
            strength: Strength::Quaternary,
            ..Default::default()
        });

        assert_eq!(cmp(&quaternary, "ab", "a-b"), Ordering::Greater);
    }
}
