use crate::scanner::ScanBuffers;

/// рабочие буферы сравнения и построения ключей: по буферу сканера на каждую строку
#[derive(Debug, Default)]
pub struct CollationBuffer
{
    pub(crate) left: ScanBuffers,
    pub(crate) right: ScanBuffers,
}
