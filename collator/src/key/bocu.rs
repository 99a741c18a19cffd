// BOCU-1: разности кодпоинтов в байтах с сохранением порядка
// см. https://www.unicode.org/notes/tn6/

const SLOPE_MIN: i32 = 3;
const SLOPE_MAX: i32 = 0xFF;
const SLOPE_MIDDLE: i32 = 0x81;
const SLOPE_TAIL_COUNT: i32 = SLOPE_MAX - SLOPE_MIN + 1;

const SLOPE_SINGLE: i32 = 80;
const SLOPE_LEAD_2: i32 = 42;
const SLOPE_LEAD_3: i32 = 3;

const SLOPE_REACH_POS_1: i32 = SLOPE_SINGLE;
const SLOPE_REACH_NEG_1: i32 = -SLOPE_SINGLE;
const SLOPE_REACH_POS_2: i32 = SLOPE_LEAD_2 * SLOPE_TAIL_COUNT + (SLOPE_LEAD_2 - 1);
const SLOPE_REACH_NEG_2: i32 = -SLOPE_REACH_POS_2 - 1;
const SLOPE_REACH_POS_3: i32 = SLOPE_LEAD_3 * SLOPE_TAIL_COUNT * SLOPE_TAIL_COUNT
    + (SLOPE_LEAD_3 - 1) * SLOPE_TAIL_COUNT
    + (SLOPE_TAIL_COUNT - 1);
const SLOPE_REACH_NEG_3: i32 = -SLOPE_REACH_POS_3 - 1;

const SLOPE_START_POS_2: i32 = SLOPE_MIDDLE + SLOPE_SINGLE + 1;
const SLOPE_START_POS_3: i32 = SLOPE_START_POS_2 + SLOPE_LEAD_2;
const SLOPE_START_NEG_2: i32 = SLOPE_MIDDLE + SLOPE_REACH_NEG_1;
const SLOPE_START_NEG_3: i32 = SLOPE_START_NEG_2 - SLOPE_LEAD_2;

/// идентичный уровень: кодпоинты NFD-формы; возвращает последний кодпоинт для продолжения
pub fn write_identical_level(mut prev: i32, chars: impl Iterator<Item = char>, out: &mut Vec<u8>) -> i32
{
    for c in chars {
        // середина блока предыдущего символа; для унифицированных иероглифов - верх диапазона
        prev = match prev < 0x4E00 || prev >= 0xA000 {
            true => (prev & !0x7F) - SLOPE_REACH_NEG_1,
            false => 0x9FFF - SLOPE_REACH_POS_2,
        };

        match c {
            // разделитель слияния
            '\u{FFFE}' => {
                out.push(2);
                prev = 0;
            }
            c => {
                write_diff(c as i32 - prev, out);
                prev = c as i32;
            }
        }
    }

    prev
}

/// последний байт разности и остаток
#[inline(always)]
fn tail(diff: &mut i32) -> u8
{
    let m = diff.rem_euclid(SLOPE_TAIL_COUNT);
    *diff = diff.div_euclid(SLOPE_TAIL_COUNT);

    (SLOPE_MIN + m) as u8
}

/// разность кодпоинтов: 1 - 4 байта
fn write_diff(mut diff: i32, out: &mut Vec<u8>)
{
    let mut bytes = [0u8; 4];

    let length = match diff {
        d if (SLOPE_REACH_NEG_1 ..= SLOPE_REACH_POS_1).contains(&d) => {
            bytes[0] = (SLOPE_MIDDLE + d) as u8;
            1
        }
        d if d > 0 && d <= SLOPE_REACH_POS_2 => {
            bytes[1] = tail(&mut diff);
            bytes[0] = (SLOPE_START_POS_2 + diff) as u8;
            2
        }
        d if d > 0 && d <= SLOPE_REACH_POS_3 => {
            bytes[2] = tail(&mut diff);
            bytes[1] = tail(&mut diff);
            bytes[0] = (SLOPE_START_POS_3 + diff) as u8;
            3
        }
        d if d > 0 => {
            bytes[3] = tail(&mut diff);
            bytes[2] = tail(&mut diff);
            bytes[1] = tail(&mut diff);
            bytes[0] = SLOPE_MAX as u8;
            4
        }
        d if d >= SLOPE_REACH_NEG_2 => {
            bytes[1] = tail(&mut diff);
            bytes[0] = (SLOPE_START_NEG_2 + diff) as u8;
            2
        }
        d if d >= SLOPE_REACH_NEG_3 => {
            bytes[2] = tail(&mut diff);
            bytes[1] = tail(&mut diff);
            bytes[0] = (SLOPE_START_NEG_3 + diff) as u8;
            3
        }
        _ => {
            bytes[3] = tail(&mut diff);
            bytes[2] = tail(&mut diff);
            bytes[1] = tail(&mut diff);
            bytes[0] = SLOPE_MIN as u8;
            4
        }
    };

    out.extend_from_slice(&bytes[.. length]);
}
