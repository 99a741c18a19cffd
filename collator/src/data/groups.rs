use crate::error::{CollationError, Result};
use crate::options::MaxVariable;

// ведущие байты первичных весов. 0 - игнорируемые, 1 - NO_CE / разделитель уровней,
// 2 - разделитель слияния (U+FFFE), 3 - младший байт сжатия

pub const LEAD_SPACE: u8 = 0x04;
pub const LEAD_PUNCTUATION: u8 = 0x05;
pub const LEAD_SYMBOL: u8 = 0x06;
pub const LEAD_CURRENCY: u8 = 0x07;
pub const LEAD_DIGIT: u8 = 0x08;
/// числа при numeric = true
pub const LEAD_NUMERIC: u8 = 0x09;
pub const LEAD_LATIN: u8 = 0x10;
pub const LEAD_GREEK: u8 = 0x20;
pub const LEAD_CYRILLIC: u8 = 0x21;
pub const LEAD_HEBREW: u8 = 0x22;
pub const LEAD_ARABIC: u8 = 0x23;
pub const LEAD_HANGUL: u8 = 0x30;

pub const LEAD_TANGUT: u8 = 0xE0;
pub const LEAD_NUSHU: u8 = 0xE1;
pub const LEAD_KHITAN: u8 = 0xE2;
pub const LEAD_HAN_CORE: u8 = 0xE4;
pub const LEAD_HAN_OTHER: u8 = 0xE5;
pub const LEAD_UNASSIGNED: u8 = 0xE8;

/// группы, которые можно переставить в начало порядка первичных весов
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReorderCode
{
    /// порядок по умолчанию (только как единственный элемент)
    Default,
    /// без перестановки (только как единственный элемент)
    None,
    Space,
    Punctuation,
    Symbol,
    Currency,
    Digit,
    Latin,
    Greek,
    Cyrillic,
    Hebrew,
    Arabic,
    Hangul,
    Han,
    Others,
}

/// группы в порядке по умолчанию
const DEFAULT_ORDER: [ReorderCode; 13] = [
    ReorderCode::Space,
    ReorderCode::Punctuation,
    ReorderCode::Symbol,
    ReorderCode::Currency,
    ReorderCode::Digit,
    ReorderCode::Latin,
    ReorderCode::Greek,
    ReorderCode::Cyrillic,
    ReorderCode::Hebrew,
    ReorderCode::Arabic,
    ReorderCode::Hangul,
    ReorderCode::Han,
    ReorderCode::Others,
];

impl ReorderCode
{
    /// ведущие байты, занимаемые группой
    pub fn lead_bytes(self) -> &'static [u8]
    {
        match self {
            Self::Default | Self::None => &[],
            Self::Space => &[LEAD_SPACE],
            Self::Punctuation => &[LEAD_PUNCTUATION],
            Self::Symbol => &[LEAD_SYMBOL],
            Self::Currency => &[LEAD_CURRENCY],
            Self::Digit => &[LEAD_DIGIT, LEAD_NUMERIC],
            Self::Latin => &[LEAD_LATIN, LEAD_LATIN + 1, LEAD_LATIN + 2, LEAD_LATIN + 3],
            Self::Greek => &[LEAD_GREEK],
            Self::Cyrillic => &[LEAD_CYRILLIC],
            Self::Hebrew => &[LEAD_HEBREW],
            Self::Arabic => &[LEAD_ARABIC],
            Self::Hangul => &[LEAD_HANGUL],
            Self::Han => &[LEAD_HAN_CORE, LEAD_HAN_OTHER],
            Self::Others => &[LEAD_TANGUT, LEAD_NUSHU, LEAD_KHITAN, LEAD_UNASSIGNED],
        }
    }
}

/// граница переменных весов: последний первичный вес группы max variable
pub fn variable_top_for(max_variable: MaxVariable) -> u32
{
    let lead = match max_variable {
        MaxVariable::Space => LEAD_SPACE,
        MaxVariable::Punctuation => LEAD_PUNCTUATION,
        MaxVariable::Symbol => LEAD_SYMBOL,
        MaxVariable::Currency => LEAD_CURRENCY,
    };

    ((lead as u32) << 24) | 0x00FF_FFFF
}

/// группа, в которую попадает первичный вес: граница переменных весов поднимается до её конца
pub fn max_variable_for(primary: u32) -> Result<MaxVariable>
{
    if primary >> 24 < LEAD_SPACE as u32 {
        return Err(CollationError::InvalidVariableTop(primary));
    }

    [
        MaxVariable::Space,
        MaxVariable::Punctuation,
        MaxVariable::Symbol,
        MaxVariable::Currency,
    ]
    .into_iter()
    .find(|&group| primary <= variable_top_for(group))
    .ok_or(CollationError::InvalidVariableTop(primary))
}

/// таблица перестановки ведущих байт. перечисленные группы идут первыми в указанном порядке,
/// остальные - следом в порядке по умолчанию; ведущие байты назначаются подряд начиная с 0x04
pub fn build_reorder_table(codes: &[ReorderCode]) -> Result<Option<Box<[u8; 256]>>>
{
    match codes {
        [] | [ReorderCode::Default] | [ReorderCode::None] => return Ok(None),
        _ => (),
    }

    let invalid = || CollationError::InvalidReorder(codes.to_vec());

    for (i, code) in codes.iter().enumerate() {
        if matches!(code, ReorderCode::Default | ReorderCode::None) || codes[.. i].contains(code) {
            return Err(invalid());
        }
    }

    let mut table = Box::new([0u8; 256]);

    for (byte, entry) in table.iter_mut().enumerate() {
        *entry = byte as u8;
    }

    let order = codes
        .iter()
        .chain(DEFAULT_ORDER.iter().filter(|code| !codes.contains(code)));

    let mut next = LEAD_SPACE;

    for code in order {
        for &lead in code.lead_bytes() {
            table[lead as usize] = next;
            next += 1;
        }
    }

    Ok(Some(table))
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn duplicates_are_rejected()
    {
        let codes = [ReorderCode::Greek, ReorderCode::Latin, ReorderCode::Greek];

        assert_eq!(
            build_reorder_table(&codes),
            Err(CollationError::InvalidReorder(codes.to_vec()))
        );
    }

    #[test]
    fn listed_groups_come_first()
    {
        let table = build_reorder_table(&[ReorderCode::Greek]).unwrap().unwrap();

        assert_eq!(table[LEAD_GREEK as usize], LEAD_SPACE);
        assert!(table[LEAD_SPACE as usize] > table[LEAD_GREEK as usize]);
        assert!(table[LEAD_LATIN as usize] > table[LEAD_DIGIT as usize]);
        assert!(table[LEAD_CYRILLIC as usize] > table[LEAD_LATIN as usize + 3]);
        // служебные байты не переставляются
        assert_eq!(table[0x02], 0x02);
    }

    #[test]
    fn variable_top_rounds_up_to_group()
    {
        assert_eq!(max_variable_for(0x0405_0000), Ok(MaxVariable::Space));
        assert_eq!(max_variable_for(0x0500_0000), Ok(MaxVariable::Punctuation));
        assert_eq!(max_variable_for(0x06FF_FFFF), Ok(MaxVariable::Symbol));
        assert_eq!(max_variable_for(0x0712_3456), Ok(MaxVariable::Currency));

        for primary in [0, 0x0300_0000, 0x0800_0000, 0x1005_0000] {
            assert_eq!(max_variable_for(primary), Err(CollationError::InvalidVariableTop(primary)));
        }
    }
}
