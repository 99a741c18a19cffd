use crate::collation_element::make_ce;
use crate::data::groups::*;

// вычисляемый вес - 4-байтный первичный: ведущий байт группы, затем номер кодпоинта внутри
// группы тремя "цифрами" по основанию 251, начиная с 0x04

const BYTE_RANGE: u32 = 251;
const BYTE_MIN: u32 = 0x04;

/// блок с вычисляемыми весами: диапазон, ведущий байт, кодпоинт с нулевым номером
struct ImplicitBlock
{
    first: u32,
    last: u32,
    lead: u8,
    base: u32,
}

const fn block(first: u32, last: u32, lead: u8, base: u32) -> ImplicitBlock
{
    ImplicitBlock {
        first,
        last,
        lead,
        base,
    }
}

/// хань из основного блока и блока совместимости идет раньше остальных иероглифов;
/// у прочих хань номер - сам кодпоинт, что сохраняет порядок между блоками расширений
const BLOCKS: &[ImplicitBlock] = &[
    block(0x4E00, 0x9FFF, LEAD_HAN_CORE, 0x4E00),
    block(0x3400, 0x4DBF, LEAD_HAN_OTHER, 0),
    block(0x20000, 0x2A6DF, LEAD_HAN_OTHER, 0),
    block(0x2A700, 0x2EE5D, LEAD_HAN_OTHER, 0),
    block(0x30000, 0x323AF, LEAD_HAN_OTHER, 0),
    // тангутское письмо с компонентами и дополнением
    block(0x17000, 0x18AFF, LEAD_TANGUT, 0x17000),
    block(0x18D00, 0x18D08, LEAD_TANGUT, 0x17000),
    block(0x1B170, 0x1B2FB, LEAD_NUSHU, 0x1B170),
    block(0x18B00, 0x18CD5, LEAD_KHITAN, 0x18B00),
];

/// вычисляемый CE для кодпоинта, отсутствующего в таблице
#[inline(never)]
pub fn implicit_ce(code: u32) -> u64
{
    make_ce(implicit_primary(code))
}

fn implicit_primary(code: u32) -> u32
{
    let (lead, value) = BLOCKS
        .iter()
        .find(|block| (block.first ..= block.last).contains(&code))
        .map_or((LEAD_UNASSIGNED, code), |block| (block.lead, code - block.base));

    ((lead as u32) << 24)
        | ((BYTE_MIN + value / (BYTE_RANGE * BYTE_RANGE)) << 16)
        | ((BYTE_MIN + (value / BYTE_RANGE) % BYTE_RANGE) << 8)
        | (BYTE_MIN + value % BYTE_RANGE)
}
