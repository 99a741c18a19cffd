mod numeric;

use crate::codepoint::{CodepointSource, FcdSource, PlainSource, Text};
use crate::collation_element::NO_CE;
use crate::data::{CollationData, Contraction};
use crate::options::CollationSettings;

/// буферы сканера, переиспользуемые между вызовами
#[derive(Debug, Default)]
pub struct ScanBuffers
{
    pub ces: Vec<u64>,
    pub normalized: Vec<char>,
}

/// сканер CE поверх источника кодпоинтов
///
/// вперед CE берутся из буфера по ces_index; назад буфер используется как стек, а смещения
/// промежуточных CE записываются в offsets
pub struct CeScanner<'a, S>
{
    data: &'a CollationData,
    numeric: bool,
    source: S,
    ces: Vec<u64>,
    ces_index: usize,
    /// сколько кодпоинтов можно прочитать вперед; -1 - без ограничения
    num_cp_fwd: i32,
}

impl<'a, S: CodepointSource> CeScanner<'a, S>
{
    pub fn new(data: &'a CollationData, numeric: bool, source: S, mut ces: Vec<u64>) -> Self
    {
        ces.clear();

        Self {
            data,
            numeric,
            source,
            ces,
            ces_index: 0,
            num_cp_fwd: -1,
        }
    }

    /// следующий CE; в конце текста - NO_CE (также попадает в буфер)
    pub fn next_ce(&mut self) -> u64
    {
        if let Some(&ce) = self.ces.get(self.ces_index) {
            self.ces_index += 1;
            return ce;
        }

        let start = self.ces.len();

        match self.source.next_code_point() {
            Some(c) => self.append_ces_for(c),
            None => self.ces.push(NO_CE),
        }

        self.ces_index = start + 1;
        self.ces[start]
    }

    /// предыдущий CE; в начале текста - NO_CE
    ///
    /// для расширений и небезопасных сегментов offsets получает смещение каждого CE из буфера и
    /// смещение конца сегмента
    pub fn previous_ce(&mut self, offsets: &mut Vec<usize>) -> u64
    {
        if let Some(ce) = self.ces.pop() {
            return ce;
        }

        offsets.clear();

        let limit_offset = self.source.offset();

        let c = match self.source.previous_code_point() {
            Some(c) => c,
            None => return NO_CE,
        };

        if self.data.is_unsafe_backward(c, self.numeric) {
            return self.previous_ce_unsafe(offsets);
        }

        // безопасный символ: без сокращений
        self.data.append_ces(c, &mut self.ces);

        if self.ces.len() > 1 {
            offsets.push(self.source.offset());

            // смещение каждого следующего CE расширения - конец символа, как при движении вперед
            while offsets.len() <= self.ces.len() {
                offsets.push(limit_offset);
            }
        }

        self.ces.pop().unwrap_or(NO_CE)
    }

    /// назад до безопасного символа, затем CE сегмента вперед
    fn previous_ce_unsafe(&mut self, offsets: &mut Vec<usize>) -> u64
    {
        let mut num_backward = 1;

        while let Some(c) = self.source.previous_code_point() {
            num_backward += 1;

            if !self.data.is_unsafe_backward(c, self.numeric) {
                break;
            }
        }

        self.num_cp_fwd = num_backward as i32;
        self.ces_index = 0;

        let mut offset = self.source.offset();

        while self.num_cp_fwd > 0 {
            // обычно читается один кодпоинт, сокращения и числа - больше, с учетом num_cp_fwd
            self.num_cp_fwd -= 1;
            self.next_ce();
            self.ces_index = self.ces.len();

            offsets.push(offset);
            offset = self.source.offset();

            while offsets.len() < self.ces.len() {
                offsets.push(offset);
            }
        }

        offsets.push(offset);

        self.num_cp_fwd = -1;
        self.source.backward_num_code_points(num_backward);
        self.ces_index = 0;

        self.ces.pop().unwrap_or(NO_CE)
    }

    /// CE символа: сокращение, число или CE из таблицы
    fn append_ces_for(&mut self, c: char)
    {
        let data = self.data;

        if let Some(contractions) = data.contractions(c) {
            if self.match_contraction(contractions) {
                return;
            }
        }

        if self.numeric && c.is_ascii_digit() {
            self.append_numeric(c);
            return;
        }

        data.append_ces(c, &mut self.ces);
    }

    /// самое длинное сокращение, продолжение которого следует в тексте
    fn match_contraction(&mut self, contractions: &[Contraction]) -> bool
    {
        let available = match self.num_cp_fwd {
            n if n < 0 => usize::MAX,
            n => n as usize,
        };

        for contraction in contractions {
            let length = contraction.suffix.len();

            if length > available {
                continue;
            }

            let mut read = 0;

            let matched = contraction.suffix.iter().all(|&expected| {
                match self.source.next_code_point() {
                    Some(c) => {
                        read += 1;
                        c == expected
                    }
                    None => false,
                }
            });

            if matched {
                self.ces.extend_from_slice(&contraction.ces);

                if self.num_cp_fwd >= 0 {
                    self.num_cp_fwd -= length as i32;
                }

                return true;
            }

            self.source.backward_num_code_points(read);
        }

        false
    }

    /// следующий кодпоинт с учетом ограничения num_cp_fwd
    fn next_skipped_code_point(&mut self) -> Option<char>
    {
        if self.num_cp_fwd == 0 {
            return None;
        }

        let c = self.source.next_code_point()?;

        if self.num_cp_fwd > 0 {
            self.num_cp_fwd -= 1;
        }

        Some(c)
    }

    fn backward_num_skipped(&mut self, count: usize)
    {
        self.source.backward_num_code_points(count);

        if self.num_cp_fwd >= 0 {
            self.num_cp_fwd += count as i32;
        }
    }

    /// очистить буфер, если все CE из него прочитаны
    #[inline(always)]
    pub fn clear_ces_if_none_remaining(&mut self)
    {
        if self.ces_index == self.ces.len() {
            self.ces.clear();
            self.ces_index = 0;
        }
    }

    /// CE из буфера (после чтения вперед)
    #[inline(always)]
    pub fn ce_at(&self, index: usize) -> u64
    {
        self.ces[index]
    }

    /// заменить последний прочитанный CE (сдвиг переменных весов при сравнении)
    #[inline(always)]
    pub fn set_current_ce(&mut self, ce: u64)
    {
        self.ces[self.ces_index - 1] = ce;
    }

    #[inline(always)]
    pub fn ces_len(&self) -> usize
    {
        self.ces.len()
    }

    #[inline(always)]
    pub fn offset(&self) -> usize
    {
        self.source.offset()
    }

    #[inline(always)]
    pub fn len(&self) -> usize
    {
        self.source.len()
    }

    pub fn reset_to_offset(&mut self, offset: usize)
    {
        self.source.reset_to_offset(offset);
        self.ces.clear();
        self.ces_index = 0;
        self.num_cp_fwd = -1;
    }
}

/// вариант сканера выбирается при установке текста: проверка FCD x кодировка
pub enum Scanner<'a>
{
    Utf8(CeScanner<'a, PlainSource<'a, str>>),
    FcdUtf8(CeScanner<'a, FcdSource<'a, str>>),
    Utf16(CeScanner<'a, PlainSource<'a, [u16]>>),
    FcdUtf16(CeScanner<'a, FcdSource<'a, [u16]>>),
}

macro_rules! dispatch {
    ($self: expr, $scanner: ident => $body: expr) => {
        match $self {
            Scanner::Utf8($scanner) => $body,
            Scanner::FcdUtf8($scanner) => $body,
            Scanner::Utf16($scanner) => $body,
            Scanner::FcdUtf16($scanner) => $body,
        }
    };
}

impl<'a> Scanner<'a>
{
    pub fn new(
        data: &'a CollationData,
        settings: &CollationSettings,
        text: Text<'a>,
        buffers: ScanBuffers,
    ) -> Self
    {
        let numeric = settings.is_numeric();
        let ScanBuffers { ces, normalized } = buffers;

        match (text, settings.check_fcd()) {
            (Text::Utf8(s), false) => {
                Scanner::Utf8(CeScanner::new(data, numeric, PlainSource::new(s), ces))
            }
            (Text::Utf8(s), true) => Scanner::FcdUtf8(CeScanner::new(
                data,
                numeric,
                FcdSource::new(s, normalized),
                ces,
            )),
            (Text::Utf16(s), false) => {
                Scanner::Utf16(CeScanner::new(data, numeric, PlainSource::new(s), ces))
            }
            (Text::Utf16(s), true) => Scanner::FcdUtf16(CeScanner::new(
                data,
                numeric,
                FcdSource::new(s, normalized),
                ces,
            )),
        }
    }

    /// сканер с начальной позицией
    pub fn at_offset(
        data: &'a CollationData,
        settings: &CollationSettings,
        text: Text<'a>,
        buffers: ScanBuffers,
        offset: usize,
    ) -> Self
    {
        let mut scanner = Self::new(data, settings, text, buffers);

        if offset != 0 {
            scanner.reset_to_offset(offset);
        }

        scanner
    }

    /// вернуть буферы для повторного использования
    pub fn into_buffers(self) -> ScanBuffers
    {
        match self {
            Scanner::Utf8(s) => ScanBuffers {
                ces: s.ces,
                normalized: vec![],
            },
            Scanner::Utf16(s) => ScanBuffers {
                ces: s.ces,
                normalized: vec![],
            },
            Scanner::FcdUtf8(s) => ScanBuffers {
                ces: s.ces,
                normalized: s.source.into_buffer(),
            },
            Scanner::FcdUtf16(s) => ScanBuffers {
                ces: s.ces,
                normalized: s.source.into_buffer(),
            },
        }
    }

    #[inline(always)]
    pub fn next_ce(&mut self) -> u64
    {
        dispatch!(self, s => s.next_ce())
    }

    #[inline(always)]
    pub fn previous_ce(&mut self, offsets: &mut Vec<usize>) -> u64
    {
        dispatch!(self, s => s.previous_ce(offsets))
    }

    #[inline(always)]
    pub fn clear_ces_if_none_remaining(&mut self)
    {
        dispatch!(self, s => s.clear_ces_if_none_remaining())
    }

    #[inline(always)]
    pub fn ce_at(&self, index: usize) -> u64
    {
        dispatch!(self, s => s.ce_at(index))
    }

    #[inline(always)]
    pub fn set_current_ce(&mut self, ce: u64)
    {
        dispatch!(self, s => s.set_current_ce(ce))
    }

    #[inline(always)]
    pub fn ces_len(&self) -> usize
    {
        dispatch!(self, s => s.ces_len())
    }

    #[inline(always)]
    pub fn offset(&self) -> usize
    {
        dispatch!(self, s => s.offset())
    }

    #[inline(always)]
    pub fn len(&self) -> usize
    {
        dispatch!(self, s => s.len())
    }

    #[inline(always)]
    pub fn reset_to_offset(&mut self, offset: usize)
    {
        dispatch!(self, s => s.reset_to_offset(offset))
    }

    /// все CE до конца текста (без NO_CE)
    pub fn fetch_all(&mut self) -> Vec<u64>
    {
        let mut result = vec![];

        loop {
            self.clear_ces_if_none_remaining();

            match self.next_ce() {
                NO_CE => return result,
                ce => result.push(ce),
            }
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::collation_element::primary;
    use crate::data::{root, TailoringBuilder};

    fn scanner<'a>(data: &'a CollationData, settings: &CollationSettings, text: &'a str) -> Scanner<'a>
    {
        Scanner::new(data, settings, Text::Utf8(text), ScanBuffers::default())
    }

    #[test]
    fn contraction_is_one_ce()
    {
        let data = TailoringBuilder::new("test")
            .letter_after('c', "ch", &[])
            .unwrap()
            .build();
        let settings = CollationSettings::default();

        let ces = scanner(&data, &settings, "cha").fetch_all();
        let c = data.ces_of('c')[0];

        assert_eq!(ces.len(), 2);
        assert!(primary(ces[0]) > primary(c));
    }

    #[test]
    fn backward_gives_reverse_ces()
    {
        let data = TailoringBuilder::new("test")
            .letter_after('c', "ch", &[])
            .unwrap()
            .build();
        let settings = CollationSettings::default();
        let text = "xchæ\u{301}";

        let forward = scanner(&data, &settings, text).fetch_all();

        let mut backward = vec![];
        let mut offsets = vec![];
        let mut s = scanner(&data, &settings, text);
        s.reset_to_offset(text.len());

        loop {
            match s.previous_ce(&mut offsets) {
                NO_CE => break,
                ce => backward.push(ce),
            }
        }

        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn root_expansion()
    {
        let data = root();
        let settings = CollationSettings::default();

        assert_eq!(scanner(&data, &settings, "æb").fetch_all().len(), 3);
    }
}
