use thiserror::Error;

use crate::data::ReorderCode;

/// ошибки использования API и некорректной конфигурации
///
/// конец последовательности и отсутствие совпадения ошибками не являются - для них есть
/// отдельные значения (NULLORDER, PROCESSED_NULLORDER, None)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollationError
{
    /// next() и previous() нельзя чередовать без reset / set_offset / set_text
    #[error("illegal change of iteration direction without reset")]
    IllegalDirectionChange,
    /// обращение к кольцевому буферу CE не по порядку
    #[error("out of sequence CE buffer access: index {index}, limit {limit}")]
    BufferSequence { index: usize, limit: usize },
    #[error("invalid strength value {0}")]
    InvalidStrength(u8),
    #[error("invalid reorder codes: {0:?}")]
    InvalidReorder(Vec<ReorderCode>),
    #[error("search pattern is empty")]
    EmptyPattern,
    #[error("search text is empty")]
    EmptyText,
    #[error("offset {offset} is out of range 0 ..= {len}")]
    OffsetOutOfRange { offset: usize, len: usize },
    #[error("unsupported: {0}")]
    Unsupported(&'static str),
    #[error("invalid tailoring: {0}")]
    InvalidTailoring(String),
    /// первичный вес вне групп пробелов, пунктуации, символов и валют
    #[error("variable top {0:#010x} is outside of the variable groups")]
    InvalidVariableTop(u32),
}

pub type Result<T> = core::result::Result<T, CollationError>;
