use super::*;

/// числовое значение опций - для сохранения, битовых операций
///
/// биты: 0 - проверка FCD, 1 - numeric, 2 - shifted, 4..5 - max variable, 8 - upper first,
/// 9 - case first, 10 - case level, 11 - backward secondary, 12..15 - strength
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CollatorOptionsValue(u16);

pub const CHECK_FCD: u16 = 1;
pub const NUMERIC: u16 = 2;
pub const SHIFTED: u16 = 4;
pub const MAX_VARIABLE_SHIFT: u16 = 4;
pub const MAX_VARIABLE_MASK: u16 = 0x30;
pub const UPPER_FIRST: u16 = 0x100;
pub const CASE_FIRST: u16 = 0x200;
pub const CASE_FIRST_AND_UPPER_MASK: u16 = CASE_FIRST | UPPER_FIRST;
pub const CASE_LEVEL: u16 = 0x400;
pub const BACKWARD_SECONDARY: u16 = 0x800;
pub const STRENGTH_SHIFT: u16 = 12;

impl CollatorOptionsValue
{
    #[inline(always)]
    pub fn bits(self) -> u16
    {
        self.0
    }

    #[inline(always)]
    pub fn has(self, flag: u16) -> bool
    {
        self.0 & flag != 0
    }

    #[inline(always)]
    pub fn strength(self) -> Strength
    {
        match self.0 >> STRENGTH_SHIFT {
            1 => Strength::Primary,
            2 => Strength::Secondary,
            4 => Strength::Quaternary,
            5 => Strength::Identical,
            _ => Strength::Tertiary,
        }
    }

    #[inline(always)]
    pub fn max_variable(self) -> MaxVariable
    {
        match (self.0 & MAX_VARIABLE_MASK) >> MAX_VARIABLE_SHIFT {
            0 => MaxVariable::Space,
            2 => MaxVariable::Symbol,
            3 => MaxVariable::Currency,
            _ => MaxVariable::Punctuation,
        }
    }

    #[inline(always)]
    pub fn case_first(self) -> CaseFirst
    {
        match self.0 & CASE_FIRST_AND_UPPER_MASK {
            CASE_FIRST => CaseFirst::LowerFirst,
            CASE_FIRST_AND_UPPER_MASK => CaseFirst::UpperFirst,
            _ => CaseFirst::Off,
        }
    }
}

impl From<CollatorOptionsValue> for u16
{
    fn from(value: CollatorOptionsValue) -> Self
    {
        value.0
    }
}

impl From<CollatorOptions> for CollatorOptionsValue
{
    fn from(options: CollatorOptions) -> Self
    {
        let flag = |on: bool, bit: u16| match on {
            true => bit,
            false => 0,
        };

        let case_first = match options.case_first {
            CaseFirst::Off => 0,
            CaseFirst::LowerFirst => CASE_FIRST,
            CaseFirst::UpperFirst => CASE_FIRST | UPPER_FIRST,
        };

        Self(
            flag(options.normalization, CHECK_FCD)
                | flag(options.numeric, NUMERIC)
                | flag(options.alternate == AlternateHandling::Shifted, SHIFTED)
                | ((options.max_variable as u16) << MAX_VARIABLE_SHIFT)
                | case_first
                | flag(options.case_level, CASE_LEVEL)
                | flag(options.backward_secondary, BACKWARD_SECONDARY)
                | ((options.strength as u16) << STRENGTH_SHIFT),
        )
    }
}

impl From<CollatorOptionsValue> for CollatorOptions
{
    fn from(value: CollatorOptionsValue) -> Self
    {
        Self {
            strength: value.strength(),
            alternate: match value.has(SHIFTED) {
                true => AlternateHandling::Shifted,
                false => AlternateHandling::NonIgnorable,
            },
            max_variable: value.max_variable(),
            case_first: value.case_first(),
            case_level: value.has(CASE_LEVEL),
            backward_secondary: value.has(BACKWARD_SECONDARY),
            numeric: value.has(NUMERIC),
            normalization: value.has(CHECK_FCD),
        }
    }
}

impl Default for CollatorOptionsValue
{
    fn default() -> Self
    {
        CollatorOptions::default().into()
    }
}
