// все опции - см. UTS #35, https://www.unicode.org/reports/tr35/tr35-collation.html

mod compressed;
mod settings;

pub use compressed::CollatorOptionsValue;
pub use settings::CollationSettings;

use crate::error::CollationError;

/// уровень сравнения
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Strength
{
    Primary = 1,   // базовые символы
    Secondary = 2, // диакритические знаки
    #[default]
    Tertiary = 3, // регистр / варианты
    Quaternary = 4, // пунктуация
    Identical = 5, // кодпоинты (NFD)
}

impl TryFrom<u8> for Strength
{
    type Error = CollationError;

    fn try_from(value: u8) -> Result<Self, Self::Error>
    {
        Ok(match value {
            1 => Self::Primary,
            2 => Self::Secondary,
            3 => Self::Tertiary,
            4 => Self::Quaternary,
            5 => Self::Identical,
            _ => return Err(CollationError::InvalidStrength(value)),
        })
    }
}

/// тип сравнения переменных весов
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlternateHandling
{
    #[default]
    NonIgnorable = 0, // переменные веса не игнорируются
    Shifted = 1, // со сдвигом переменных весов
}

/// до какой группы включительно веса считаются переменными
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum MaxVariable
{
    Space = 0,
    #[default]
    Punctuation = 1,
    Symbol = 2,
    Currency = 3,
}

/// порядок строчных / заглавных букв на третичном уровне
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaseFirst
{
    #[default]
    Off = 0,
    LowerFirst = 1,
    UpperFirst = 2,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct CollatorOptions
{
    /// уровень сравнения
    pub strength: Strength,
    /// тип сравнения
    pub alternate: AlternateHandling,
    /// граница переменных весов
    pub max_variable: MaxVariable,
    pub case_first: CaseFirst,
    /// отдельный уровень регистра между вторичным и третичным
    pub case_level: bool,
    /// вторичные веса сравниваются с конца (французская сортировка)
    pub backward_secondary: bool,
    /// последовательности цифр сравниваются по числовому значению
    pub numeric: bool,
    /// проверка FCD и нормализация входных строк
    pub normalization: bool,
}
