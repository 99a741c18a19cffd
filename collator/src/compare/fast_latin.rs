use core::cmp::Ordering;

use smallvec::SmallVec;

use crate::codepoint::Text;
use crate::collation_element::{lower32, primary, ONLY_TERTIARY_MASK};
use crate::data::CollationData;
use crate::options::{CollationSettings, Strength};

/// последний символ, для которого строится таблица
pub const LATIN_MAX: u32 = 0x017F;

/// таблица не может решить сравнение - нужен общий путь
pub const BAIL_OUT: Option<Ordering> = None;

/// CE латиницы и Latin-1: символы с одним или двумя CE, не участвующие в сокращениях
#[derive(Debug)]
pub struct FastLatinTable
{
    ces: Box<[Option<SmallVec<[u64; 2]>>]>,
}

impl FastLatinTable
{
    pub fn build(data: &CollationData) -> Self
    {
        let ces = (0 ..= LATIN_MAX)
            .map(|code| {
                let c = char::from_u32(code)?;

                if data.is_contraction_starter(c) || data.is_unsafe_backward(c, false) {
                    return None;
                }

                let ces = data.ces_of(c);

                match ces.len() <= 2 {
                    true => Some(ces.into_iter().collect()),
                    false => None,
                }
            })
            .collect();

        Self { ces }
    }

    /// таблица для данных, строится при первом обращении
    #[inline]
    pub fn of(data: &CollationData) -> &Self
    {
        data.fast_latin_cell().get_or_init(|| Self::build(data))
    }

    #[inline(always)]
    fn get(&self, c: char) -> Option<&[u64]>
    {
        self.ces.get(c as usize)?.as_deref()
    }

    /// все символы текста после start есть в таблице?
    fn covers(&self, text: Text, start: usize) -> bool
    {
        text.chars_from(start).all(|c| self.get(c).is_some())
    }

    /// веса уровня по тексту: ненулевые значения функции от CE
    fn weights<'t>(
        &'t self,
        text: Text<'t>,
        start: usize,
        weight: impl Fn(u64) -> u32 + 't,
    ) -> impl Iterator<Item = u32> + 't
    {
        text.chars_from(start)
            .flat_map(move |c| self.get(c).unwrap_or_default().iter().copied())
            .map(weight)
            .filter(|&w| w != 0)
    }
}

/// сравнение по таблице начиная с общей позиции start; BAIL_OUT - таблица не подходит
pub fn compare(
    data: &CollationData,
    settings: &CollationSettings,
    left: Text,
    right: Text,
    start: usize,
) -> Option<Ordering>
{
    if !settings.fast_latin_allowed() {
        return BAIL_OUT;
    }

    let strength = settings.strength();

    // четвертичный и идентичный уровни - только общим путем
    if strength >= Strength::Quaternary {
        return BAIL_OUT;
    }

    let table = FastLatinTable::of(data);

    if !table.covers(left, start) || !table.covers(right, start) {
        return BAIL_OUT;
    }

    let levels: [fn(u64) -> u32; 3] = [
        primary,
        |ce| lower32(ce) >> 16,
        |ce| lower32(ce) & ONLY_TERTIARY_MASK,
    ];

    let count = match strength {
        Strength::Primary => 1,
        Strength::Secondary => 2,
        _ => 3,
    };

    for weight in levels.into_iter().take(count) {
        let order = table
            .weights(left, start, weight)
            .cmp(table.weights(right, start, weight));

        if order != Ordering::Equal {
            return Some(order);
        }
    }

    Some(Ordering::Equal)
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::data::root;

    #[test]
    fn latin_is_covered()
    {
        let data = root();
        let table = FastLatinTable::of(&data);

        assert!(table.get('a').is_some());
        assert!(table.get('æ').is_some());
        assert!(table.get('\u{3B1}').is_none());
    }

    #[test]
    fn bails_out_on_greek()
    {
        let data = root();
        let settings = CollationSettings::default();

        assert_eq!(
            compare(&data, &settings, Text::Utf8("a\u{3B1}"), Text::Utf8("b"), 0),
            BAIL_OUT
        );
        assert_eq!(
            compare(&data, &settings, Text::Utf8("ab"), Text::Utf8("aB"), 0),
            Some(Ordering::Less)
        );
    }
}
