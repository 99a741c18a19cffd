use smallvec::{smallvec, SmallVec};

// 64-битный CE:
//  pppp pppp  pppp pppp  pppp pppp  pppp pppp | ssss ssss  ssss ssss | cctt tttt  qqtt tttt
//  p - первичный вес, s - вторичный, c - регистр, t - третичный, q - четвертичный

/// CE конца входных данных, не совпадает ни с одним реальным весом
pub const NO_CE: u64 = 0x1_0100_0100;
pub const NO_CE_PRIMARY: u32 = 1;
pub const NO_CE_WEIGHT16: u32 = 0x0100;

/// разделитель уровней в ключе
pub const LEVEL_SEPARATOR_BYTE: u8 = 1;
/// U+FFFE
pub const MERGE_SEPARATOR_PRIMARY: u32 = 0x0200_0000;
pub const MERGE_SEPARATOR_LOWER32: u32 = 0x0200_0200;
pub const MERGE_SEPARATOR_WEIGHT16: u32 = 0x0200;
pub const MERGE_SEPARATOR_BYTE: u8 = 2;
/// завершающий байт ключа
pub const TERMINATOR_BYTE: u8 = 0;

pub const COMMON_WEIGHT16: u32 = 0x0500;
pub const COMMON_BYTE: u8 = 5;
pub const COMMON_SEC_AND_TER_CE: u32 = 0x0500_0500;

pub const PRIMARY_COMPRESSION_LOW_BYTE: u8 = 3;
pub const PRIMARY_COMPRESSION_HIGH_BYTE: u8 = 0xFF;

/// маски третичного веса: без регистра / с регистром
pub const ONLY_TERTIARY_MASK: u32 = 0x3F3F;
pub const CASE_AND_TERTIARY_MASK: u32 = 0xFF3F;
pub const CASE_MASK: u32 = 0xC000;
/// маска четвертичного веса внутри третичного слова
pub const QUATERNARY_MASK: u32 = 0xC0;

/// конец последовательности legacy CE
pub const NULLORDER: u32 = 0xFFFF_FFFF;
/// полностью игнорируемый legacy CE
pub const IGNORABLE: u32 = 0;

/// маркер второй половины (продолжения) legacy CE
pub const CONTINUATION_MARKER: u32 = 0xC0;

/// CE с заданным первичным весом и общими вторичным / третичным
#[inline(always)]
pub const fn make_ce(primary: u32) -> u64
{
    ((primary as u64) << 32) | COMMON_SEC_AND_TER_CE as u64
}

/// CE из отдельных весов
#[inline(always)]
pub const fn make_ce_weights(primary: u32, secondary: u32, tertiary: u32) -> u64
{
    ((primary as u64) << 32) | ((secondary as u64) << 16) | tertiary as u64
}

#[inline(always)]
pub const fn primary(ce: u64) -> u32
{
    (ce >> 32) as u32
}

#[inline(always)]
pub const fn lower32(ce: u64) -> u32
{
    ce as u32
}

/// CE требует двух legacy-половин?
#[inline(always)]
pub const fn needs_two_parts(ce: u64) -> bool
{
    (ce & 0xFFFF_00FF_003F) != 0
}

/// разбить 64-битный CE на legacy-половины: первая всегда присутствует, вторая (с маркером
/// продолжения) - только если в ней есть ненулевые биты
#[inline]
pub fn split_ce(ce: u64) -> SmallVec<[u32; 2]>
{
    let (first, second) = legacy_halves(ce);

    match second {
        0 => smallvec![first],
        second => smallvec![first, second | CONTINUATION_MARKER],
    }
}

/// первая и вторая половины без маркера продолжения
#[inline(always)]
pub(crate) fn legacy_halves(ce: u64) -> (u32, u32)
{
    let p = primary(ce);
    let lower32 = lower32(ce);

    let first = (p & 0xFFFF_0000) | ((lower32 >> 16) & 0xFF00) | ((lower32 >> 8) & 0xFF);
    let second = (p << 16) | ((lower32 >> 8) & 0xFF00) | (lower32 & 0x3F);

    (first, second)
}

/// первичный вес legacy CE
#[inline(always)]
pub const fn primary_order(order: u32) -> u32
{
    order >> 16
}

/// вторичный вес legacy CE
#[inline(always)]
pub const fn secondary_order(order: u32) -> u32
{
    (order >> 8) & 0xFF
}

/// третичный вес legacy CE
#[inline(always)]
pub const fn tertiary_order(order: u32) -> u32
{
    order & 0xFF
}

/// legacy CE является продолжением предыдущего?
#[inline(always)]
pub const fn is_continuation(order: u32) -> bool
{
    order != NULLORDER && (order & CONTINUATION_MARKER) == CONTINUATION_MARKER
}

#[inline(always)]
pub const fn is_ignorable(order: u32) -> bool
{
    order == IGNORABLE
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn common_ce_fits_one_half()
    {
        let ce = make_ce(0x2A04_0000);

        assert!(!needs_two_parts(ce));
        assert_eq!(split_ce(ce).as_slice(), &[0x2A04_0505]);
    }

    #[test]
    fn long_primary_gets_continuation()
    {
        let ce = make_ce(0xE4A1_B2C3);
        let halves = split_ce(ce);

        assert!(needs_two_parts(ce));
        assert_eq!(halves.len(), 2);
        assert_eq!(halves[0], 0xE4A1_0505);
        assert_eq!(halves[1], 0xB2C3_00C0);
        assert!(is_continuation(halves[1]));
        assert!(!is_continuation(halves[0]));
    }
}
