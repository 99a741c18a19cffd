use std::collections::HashMap;

use super::groups::*;
use super::{tertiary_variant, CollationData};
use crate::collation_element::*;
use crate::hangul;

/// третичный вес заглавной буквы: биты регистра "upper" + третичный 0x1D
pub const UPPER_TERTIARY: u32 = 0x9D00;
/// вторичный вес "перечеркнутых" букв (ø, ł, đ ...)
const STROKE_SECONDARY: u32 = 0xD000;

/// полностью игнорируемые символы
const IGNORABLES: &[(u32, u32)] = &[
    (0x0000, 0x0008),
    (0x000E, 0x001F),
    (0x007F, 0x0084),
    (0x0086, 0x009F),
    (0x00AD, 0x00AD),
    (0x200B, 0x200F),
    (0x2060, 0x2064),
    (0xFEFF, 0xFEFF),
];

const SPACES: &str = "\t\n\u{B}\u{C}\r\u{85}\u{2028}\u{2029} ";
/// варианты пробела: третичное отличие от U+0020
const SPACE_VARIANTS: &str = "\u{A0}\u{2000}\u{2001}\u{2002}\u{2003}\u{2004}\u{2005}\u{2006}\u{2007}\u{2008}\u{2009}\u{200A}\u{202F}\u{205F}\u{3000}";

const PUNCTUATION: &str = "_‐‑‒–—―-,;:!¡?¿.…·'‘’‚‛\"“”„‟«»‹›()[]{}§¶@*/\\&#%‰†‡•";
const SYMBOLS: &str = "`´˜^¯˘˙¨˚˝¸˛°©®⁄+±÷×<=>¬|¦~";
const CURRENCY: &str = "¤¢$£¥₠₡₢₣₤₥₦₧₨₩₪₫€₭₮₯₰₱₲₳₴₵₶₷₸₹₺₻₼₽₾₿";

/// алфавиты: (ведущий байт, шаг второго байта, строчные, заглавные)
/// шаг оставляет место для букв, добавляемых языковыми правилами
const LATIN: &str = "abcdðefghiıjklmnŋopqrstuvwxyzþ";
const LATIN_UPPER: &str = "ABCDÐEFGHI\0JKLMNŊOPQRSTUVWXYZÞ";
const GREEK: &str = "αβγδεζηθικλμνξοπρστυφχψω";
const GREEK_UPPER: &str = "ΑΒΓΔΕΖΗΘΙΚΛΜΝΞΟΠΡΣΤΥΦΧΨΩ";
const CYRILLIC: &str = "абвгґдеєжзиіјклмнопрстуфхцчшщъыьэюя";
const CYRILLIC_UPPER: &str = "АБВГҐДЕЄЖЗИІЈКЛМНОПРСТУФХЦЧШЩЪЫЬЭЮЯ";
const HEBREW: &str = "אבגדהוזחטיךכלםמןנסעףפץצקרשת";
const ARABIC: &str = "ءآأؤإئابةتثجحخدذرزسشصضطظعغفقكلمنهوي";

/// шаг второго байта первичного веса букв
pub const LETTER_STEP: u32 = 8;
const CYRILLIC_STEP: u32 = 7;
const ARABIC_STEP: u32 = 6;
/// второй байт первого веса группы
const SECOND_BYTE_BASE: u32 = 0x08;

/// буквы с чертой: база + вторичный вес черты
const STROKES: &[(char, char)] = &[
    ('ø', 'o'),
    ('Ø', 'O'),
    ('ł', 'l'),
    ('Ł', 'L'),
    ('đ', 'd'),
    ('Đ', 'D'),
    ('ħ', 'h'),
    ('Ħ', 'H'),
    ('ŧ', 't'),
    ('Ŧ', 'T'),
    ('ƀ', 'b'),
];

/// лигатуры и особые буквы, раскладываемые на несколько букв
const EXPANSIONS: &[(char, &str)] = &[
    ('æ', "ae"),
    ('Æ', "AE"),
    ('œ', "oe"),
    ('Œ', "OE"),
    ('ß', "ss"),
    ('ẞ', "SS"),
];

/// ведущие байты, для которых первичные веса сжимаются в ключе
const COMPRESSIBLE: &[u8] = &[LEAD_LATIN, LEAD_GREEK, LEAD_CYRILLIC, LEAD_HEBREW, LEAD_ARABIC];

struct RootBuilder
{
    mappings: HashMap<char, Box<[u64]>>,
}

impl RootBuilder
{
    fn single(&mut self, c: char, ce: u64)
    {
        self.mappings.insert(c, Box::new([ce]));
    }

    /// символы группы с последовательными первичными весами
    fn sequence(&mut self, lead: u8, step: u32, chars: &str) -> u32
    {
        let mut second = SECOND_BYTE_BASE;

        for c in chars.chars() {
            self.single(c, make_ce(primary_of(lead, second)));
            second += step;
        }

        second
    }

    /// алфавит: строчные с общим третичным весом, заглавные - с весом заглавной буквы
    fn alphabet(&mut self, lead: u8, step: u32, lower: &str, upper: Option<&str>)
    {
        self.sequence(lead, step, lower);

        let upper = match upper {
            Some(upper) => upper,
            None => return,
        };

        for (l, u) in lower.chars().zip(upper.chars()) {
            // \0 - у буквы нет заглавной формы
            if u == '\0' {
                continue;
            }

            if let Some(ce) = self.mappings.get(&l).map(|ces| ces[0]) {
                self.single(u, with_tertiary(ce, UPPER_TERTIARY));
            }
        }
    }

    fn ces(&self, text: &str) -> Vec<u64>
    {
        text.chars()
            .filter_map(|c| self.mappings.get(&c))
            .flat_map(|ces| ces.iter().copied())
            .collect()
    }
}

/// первичный вес из ведущего и второго байта
#[inline(always)]
fn primary_of(lead: u8, second: u32) -> u32
{
    ((lead as u32) << 24) | (second << 16)
}

#[inline(always)]
pub(crate) fn with_tertiary(ce: u64, tertiary: u32) -> u64
{
    (ce & !0xFFFF) | tertiary as u64
}

/// корневая таблица
pub fn build() -> CollationData
{
    let mut root = RootBuilder {
        mappings: HashMap::new(),
    };

    for &(first, last) in IGNORABLES {
        for c in (first ..= last).filter_map(char::from_u32) {
            root.single(c, 0);
        }
    }

    root.sequence(LEAD_SPACE, 2, SPACES);

    let space = make_ce(primary_of(LEAD_SPACE, SECOND_BYTE_BASE + 2 * 8));

    for c in SPACE_VARIANTS.chars() {
        root.single(c, tertiary_variant(space));
    }

    root.sequence(LEAD_PUNCTUATION, 2, PUNCTUATION);
    root.sequence(LEAD_SYMBOL, 2, SYMBOLS);
    root.sequence(LEAD_CURRENCY, 2, CURRENCY);

    // цифры: ASCII и арабско-индийские (вариант третичного веса)
    root.sequence(LEAD_DIGIT, LETTER_STEP, "0123456789");

    for (i, c) in ('\u{660}' ..= '\u{669}').enumerate() {
        let ce = make_ce(primary_of(LEAD_DIGIT, SECOND_BYTE_BASE + i as u32 * LETTER_STEP));
        root.single(c, tertiary_variant(ce));
    }

    root.alphabet(LEAD_LATIN, LETTER_STEP, LATIN, Some(LATIN_UPPER));
    root.alphabet(LEAD_GREEK, LETTER_STEP, GREEK, Some(GREEK_UPPER));
    root.alphabet(LEAD_CYRILLIC, CYRILLIC_STEP, CYRILLIC, Some(CYRILLIC_UPPER));
    root.alphabet(LEAD_HEBREW, LETTER_STEP, HEBREW, None);
    root.alphabet(LEAD_ARABIC, ARABIC_STEP, ARABIC, None);

    // конечная сигма - вариант σ
    if let Some(sigma) = root.mappings.get(&'σ').map(|ces| ces[0]) {
        root.single('ς', tertiary_variant(sigma));
    }

    let stroke = make_ce_weights(0, STROKE_SECONDARY, COMMON_WEIGHT16);

    for &(c, base) in STROKES {
        let mut ces = root.ces(&base.to_string());
        ces.push(stroke);
        root.mappings.insert(c, ces.into_boxed_slice());
    }

    for &(c, letters) in EXPANSIONS {
        let ces: Vec<u64> = root.ces(letters).into_iter().map(tertiary_variant).collect();
        root.mappings.insert(c, ces.into_boxed_slice());
    }

    // чамо хангыль
    for code in 0x1100 ..= 0x11FF {
        if let (Some(c), Some(ce)) = (char::from_u32(code), hangul::jamo_ce(code)) {
            root.single(c, ce);
        }
    }

    root.single('\u{FFFE}', make_ce_weights(MERGE_SEPARATOR_PRIMARY, 0, 0) | MERGE_SEPARATOR_LOWER32 as u64);

    let mut compressible = [false; 256];
    COMPRESSIBLE
        .iter()
        .for_each(|&lead| compressible[lead as usize] = true);

    CollationData::new(String::from("root"), root.mappings, HashMap::new(), compressible)
}
