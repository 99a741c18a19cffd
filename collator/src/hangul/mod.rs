use crate::collation_element::make_ce;
use crate::data::groups::LEAD_HANGUL;

/// начало блока слогов хангыль
const HANGUL_S_BASE: u32 = 0xAC00;
/// количество слогов
const HANGUL_S_COUNT: u32 = 11172;
/// количество гласных * количество завершающих согласных
const HANGUL_N_COUNT: u32 = 588;
/// количество завершающих согласных
const HANGUL_T_COUNT: u32 = 27;
/// количество кодпоинтов на блок LV
const HANGUL_T_BLOCK_SIZE: u32 = HANGUL_T_COUNT + 1;

/// ведущие согласные, гласные и завершающие согласные чамо
const HANGUL_L_BASE: u32 = 0x1100;
const HANGUL_L_COUNT: u32 = 19;
const HANGUL_V_BASE: u32 = 0x1161;
const HANGUL_V_COUNT: u32 = 21;
/// первая завершающая согласная - U+11A8, U+11A7 означает её отсутствие
const HANGUL_T_BASE: u32 = 0x11A7;

/*
    первичные веса чамо идут последовательно в порядке L < V < T, второй байт веса - порядковый номер
    чамо начиная с 0x04. слог раскладывается алгоритмически на 2 или 3 CE, таблица для слогов не нужна.
*/

/// второй байт первичного веса первой ведущей согласной
const JAMO_SECOND_BYTE_BASE: u32 = 0x04;

/// слог хангыль?
#[inline(always)]
pub fn is_syllable(code: u32) -> bool
{
    code.wrapping_sub(HANGUL_S_BASE) < HANGUL_S_COUNT
}

/// все слоги хангыль
pub fn syllables() -> impl Iterator<Item = char>
{
    (HANGUL_S_BASE .. HANGUL_S_BASE + HANGUL_S_COUNT).filter_map(char::from_u32)
}

/// CE чамо (только ведущие, гласные, завершающие из основного блока)
#[inline]
pub fn jamo_ce(code: u32) -> Option<u64>
{
    let index = match code {
        c if (HANGUL_L_BASE .. HANGUL_L_BASE + HANGUL_L_COUNT).contains(&c) => c - HANGUL_L_BASE,
        c if (HANGUL_V_BASE .. HANGUL_V_BASE + HANGUL_V_COUNT).contains(&c) => {
            HANGUL_L_COUNT + c - HANGUL_V_BASE
        }
        c if (HANGUL_T_BASE + 1 ..= HANGUL_T_BASE + HANGUL_T_COUNT).contains(&c) => {
            HANGUL_L_COUNT + HANGUL_V_COUNT + c - HANGUL_T_BASE - 1
        }
        _ => return None,
    };

    Some(jamo_index_ce(index))
}

#[inline(always)]
fn jamo_index_ce(index: u32) -> u64
{
    make_ce(((LEAD_HANGUL as u32) << 24) | ((JAMO_SECOND_BYTE_BASE + index) << 16))
}

/// слог хангыль
#[inline(always)]
pub fn write_hangul_syllable(code: u32, result: &mut Vec<u64>)
{
    let lvt = code.wrapping_sub(HANGUL_S_BASE);

    let l = lvt / HANGUL_N_COUNT;
    let v = (lvt % HANGUL_N_COUNT) / HANGUL_T_BLOCK_SIZE;
    let t = lvt % HANGUL_T_BLOCK_SIZE;

    result.push(jamo_index_ce(l));
    result.push(jamo_index_ce(HANGUL_L_COUNT + v));

    if t != 0 {
        result.push(jamo_index_ce(HANGUL_L_COUNT + HANGUL_V_COUNT + t - 1));
    }
}
