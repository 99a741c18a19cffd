use smallvec::SmallVec;

use super::CeScanner;
use crate::codepoint::CodepointSource;
use crate::collation_element::make_ce;
use crate::data::groups::LEAD_NUMERIC;

/// максимальная длина числа в одном сегменте
const MAX_SEGMENT_DIGITS: usize = 254;

/// ведущий байт первичных весов чисел
const NUMERIC_PRIMARY: u32 = (LEAD_NUMERIC as u32) << 24;

impl<'a, S: CodepointSource> CeScanner<'a, S>
{
    /// последовательность цифр как одно число
    pub(super) fn append_numeric(&mut self, first: char)
    {
        let mut digits = SmallVec::<[u8; 64]>::new();
        digits.push(digit_value(first));

        while let Some(c) = self.next_skipped_code_point() {
            if !c.is_ascii_digit() {
                self.backward_num_skipped(1);
                break;
            }

            digits.push(digit_value(c));
        }

        let mut pos = 0;

        loop {
            // без ведущих нулей
            while pos + 1 < digits.len() && digits[pos] == 0 {
                pos += 1;
            }

            let length = (digits.len() - pos).min(MAX_SEGMENT_DIGITS);
            self.append_numeric_segment(&digits[pos .. pos + length]);
            pos += length;

            if pos >= digits.len() {
                break;
            }
        }
    }

    /// CE сегмента числа: малые числа - плотной кодировкой, большие - парами цифр
    fn append_numeric_segment(&mut self, digits: &[u8])
    {
        let mut length = digits.len();

        if length <= 7 {
            let mut value = digits.iter().fold(0u32, |v, &d| v * 10 + d as u32);

            // 2 байта: 74 значения второго байта 2 ..= 75
            let mut first_byte = 2;
            let mut num_bytes = 74;

            if value < num_bytes {
                self.ces
                    .push(make_ce(NUMERIC_PRIMARY | ((first_byte + value) << 16)));
                return;
            }

            // 3 байта: 40 значений второго байта 76 ..= 115
            value -= num_bytes;
            first_byte += num_bytes;
            num_bytes = 40;

            if value < num_bytes * 254 {
                let primary = NUMERIC_PRIMARY
                    | ((first_byte + value / 254) << 16)
                    | ((2 + value % 254) << 8);
                self.ces.push(make_ce(primary));
                return;
            }

            // 4 байта: 16 значений второго байта 116 ..= 131
            value -= num_bytes * 254;
            first_byte += num_bytes;
            num_bytes = 16;

            if value < num_bytes * 254 * 254 {
                let mut primary = NUMERIC_PRIMARY | (2 + value % 254);
                value /= 254;
                primary |= (2 + value % 254) << 8;
                value /= 254;
                primary |= (first_byte + value % 254) << 16;
                self.ces.push(make_ce(primary));
                return;
            }
        }

        // второй байт 132 ..= 255 - количество пар цифр (4 ..= 127), далее пары по байту
        let num_pairs = (length as u32 + 1) / 2;
        let mut primary = NUMERIC_PRIMARY | ((132 - 4 + num_pairs) << 16);

        // без завершающих пар 00
        while digits[length - 1] == 0 && digits[length - 2] == 0 {
            length -= 2;
        }

        let (mut pair, mut pos) = match length & 1 {
            1 => (digits[0] as u32, 1),
            _ => (digits[0] as u32 * 10 + digits[1] as u32, 2),
        };
        pair = 11 + 2 * pair;

        let mut shift = 8;

        while pos < length {
            if shift == 0 {
                // каждые три пары - новый CE с ведущим байтом чисел
                primary |= pair;
                self.ces.push(make_ce(primary));
                primary = NUMERIC_PRIMARY;
                shift = 16;
            } else {
                primary |= pair << shift;
                shift -= 8;
            }

            pair = 11 + 2 * (digits[pos] as u32 * 10 + digits[pos + 1] as u32);
            pos += 2;
        }

        primary |= (pair - 1) << shift;
        self.ces.push(make_ce(primary));
    }
}

#[inline(always)]
fn digit_value(c: char) -> u8
{
    (c as u8).wrapping_sub(b'0')
}
