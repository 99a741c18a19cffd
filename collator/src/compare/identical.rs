use core::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;

/// сравнение NFD-форм по кодпоинтам
///
/// U+FFFE (разделитель слияния) меньше любого символа, но больше конца строки
pub fn compare_nfd(left: impl Iterator<Item = char>, right: impl Iterator<Item = char>) -> Ordering
{
    let mut left = left.nfd();
    let mut right = right.nfd();

    loop {
        let (l, r) = (left.next(), right.next());

        if l == r {
            match l {
                Some(_) => continue,
                None => return Ordering::Equal,
            }
        }

        return weight(l).cmp(&weight(r));
    }
}

#[inline(always)]
fn weight(c: Option<char>) -> i64
{
    match c {
        None => -2,
        Some('\u{FFFE}') => -1,
        Some(c) => c as i64,
    }
}
