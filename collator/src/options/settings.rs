use super::compressed::*;
use super::*;
use crate::collation_element::{CASE_AND_TERTIARY_MASK, ONLY_TERTIARY_MASK};
use crate::data::groups::{build_reorder_table, max_variable_for, variable_top_for, ReorderCode};
use crate::error::Result;

/// настройки сопоставления: упакованные опции, граница переменных весов, перестановка групп
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollationSettings
{
    options: CollatorOptionsValue,
    /// последний первичный вес, считающийся переменным
    variable_top: u32,
    reorder_codes: Vec<ReorderCode>,
    /// таблица перестановки ведущих байт первичных весов
    reorder_table: Option<Box<[u8; 256]>>,
}

impl Default for CollationSettings
{
    fn default() -> Self
    {
        Self::new(CollatorOptions::default())
    }
}

impl CollationSettings
{
    pub fn new(options: CollatorOptions) -> Self
    {
        Self {
            options: options.into(),
            variable_top: variable_top_for(options.max_variable),
            reorder_codes: vec![],
            reorder_table: None,
        }
    }

    #[inline(always)]
    pub fn options(&self) -> CollatorOptions
    {
        self.options.into()
    }

    #[inline(always)]
    pub fn options_value(&self) -> CollatorOptionsValue
    {
        self.options
    }

    pub fn set_options(&mut self, options: CollatorOptions)
    {
        self.options = options.into();
        self.variable_top = variable_top_for(options.max_variable);
    }

    /// граница переменных весов по первичному весу: max variable становится группой, в которую
    /// этот вес попадает
    pub fn set_variable_top(&mut self, primary: u32) -> Result<()>
    {
        let mut options = self.options();
        options.max_variable = max_variable_for(primary)?;

        self.set_options(options);

        Ok(())
    }

    /// установить перестановку групп; пустой список или [Default] / [None] сбрасывают её
    pub fn set_reorder_codes(&mut self, codes: &[ReorderCode]) -> Result<()>
    {
        let table = build_reorder_table(codes)?;

        if table.is_none() && self.reorder_table.is_some() {
            log::warn!("reorder codes {:?} reset to the default order", self.reorder_codes);
        }

        self.reorder_table = table;
        self.reorder_codes = match self.reorder_table.is_some() {
            true => codes.to_vec(),
            false => vec![],
        };

        Ok(())
    }

    #[inline(always)]
    pub fn reorder_codes(&self) -> &[ReorderCode]
    {
        &self.reorder_codes
    }

    #[inline(always)]
    pub fn variable_top(&self) -> u32
    {
        self.variable_top
    }

    #[inline(always)]
    pub fn strength(&self) -> Strength
    {
        self.options.strength()
    }

    #[inline(always)]
    pub fn is_shifted(&self) -> bool
    {
        self.options.has(SHIFTED)
    }

    #[inline(always)]
    pub fn is_numeric(&self) -> bool
    {
        self.options.has(NUMERIC)
    }

    #[inline(always)]
    pub fn check_fcd(&self) -> bool
    {
        self.options.has(CHECK_FCD)
    }

    #[inline(always)]
    pub fn case_level(&self) -> bool
    {
        self.options.has(CASE_LEVEL)
    }

    #[inline(always)]
    pub fn backward_secondary(&self) -> bool
    {
        self.options.has(BACKWARD_SECONDARY)
    }

    #[inline(always)]
    pub fn case_first(&self) -> CaseFirst
    {
        self.options.case_first()
    }

    /// маска третичного слова: регистр учитывается на третичном уровне только при case first без
    /// отдельного уровня регистра
    #[inline(always)]
    pub fn tertiary_mask(&self) -> u32
    {
        match self.options.bits() & (CASE_LEVEL | CASE_FIRST) == CASE_FIRST {
            true => CASE_AND_TERTIARY_MASK,
            false => ONLY_TERTIARY_MASK,
        }
    }

    #[inline(always)]
    pub fn sorts_tertiary_upper_case_first(&self) -> bool
    {
        self.options.bits() & (CASE_LEVEL | CASE_FIRST | UPPER_FIRST) == CASE_FIRST | UPPER_FIRST
    }

    #[inline(always)]
    pub fn has_reordering(&self) -> bool
    {
        self.reorder_table.is_some()
    }

    /// первичный вес с учетом перестановки групп
    #[inline(always)]
    pub fn reorder(&self, p: u32) -> u32
    {
        match &self.reorder_table {
            Some(table) => ((table[(p >> 24) as usize] as u32) << 24) | (p & 0x00FF_FFFF),
            None => p,
        }
    }

    /// быстрый путь для латиницы возможен только при опциях, близких к умолчанию
    #[inline(always)]
    pub fn fast_latin_allowed(&self) -> bool
    {
        self.options.bits()
            & (SHIFTED | CASE_LEVEL | CASE_FIRST | BACKWARD_SECONDARY | NUMERIC)
            == 0
            && !self.has_reordering()
    }
}
