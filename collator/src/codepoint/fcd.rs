use unicode_normalization::char::{canonical_combining_class, decompose_canonical};
use unicode_normalization::UnicodeNormalization;

use super::{CodepointSource, TextUnits};

/// CCC первого символа канонической декомпозиции
#[inline]
pub fn lccc(c: char) -> u8
{
    // ниже U+0300 нет символов, декомпозиция которых начинается с нестартера
    if (c as u32) < 0x300 {
        return 0;
    }

    let mut first = None;
    decompose_canonical(c, |d| {
        first.get_or_insert(d);
    });

    canonical_combining_class(first.unwrap_or(c))
}

/// CCC последнего символа канонической декомпозиции
#[inline]
pub fn tccc(c: char) -> u8
{
    if (c as u32) < 0xC0 {
        return 0;
    }

    let mut last = c;
    decompose_canonical(c, |d| last = d);

    canonical_combining_class(last)
}

/// строка в форме FCD: каноническая декомпозиция каждого символа уже упорядочена относительно соседей
pub fn is_fcd(chars: impl Iterator<Item = char>) -> bool
{
    let mut prev_cc = 0;

    for c in chars {
        let lead = lccc(c);

        if lead != 0 && prev_cc > lead {
            return false;
        }

        prev_cc = tccc(c);
    }

    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State
{
    /// чтение исходного текста в проверенном диапазоне
    Raw,
    /// чтение нормализованного сегмента [start, limit) исходного текста
    Normalized { start: usize, limit: usize, index: usize },
}

/// чтение текста с проверкой FCD: сегменты, не прошедшие проверку, нормализуются в NFD
pub struct FcdSource<'a, T: ?Sized>
{
    text: &'a T,
    pos: usize,
    /// диапазон, прошедший проверку FCD
    checked_start: usize,
    checked_limit: usize,
    normalized: Vec<char>,
    state: State,
}

impl<'a, T: TextUnits + ?Sized> FcdSource<'a, T>
{
    pub fn new(text: &'a T, mut normalized: Vec<char>) -> Self
    {
        normalized.clear();

        Self {
            text,
            pos: 0,
            checked_start: 0,
            checked_limit: 0,
            normalized,
            state: State::Raw,
        }
    }

    /// вернуть буфер нормализации для повторного использования
    pub fn into_buffer(self) -> Vec<char>
    {
        self.normalized
    }

    /// проверка следующего сегмента начиная с pos
    fn next_segment(&mut self)
    {
        let start = self.pos;
        let mut p = start;
        let mut prev_cc = 0;

        loop {
            let q = p;

            let c = match self.text.char_at(p) {
                Some((c, next)) => {
                    p = next;
                    c
                }
                None => {
                    self.checked_limit = q;
                    break;
                }
            };

            let lead = lccc(c);

            if lead == 0 && q != start {
                self.checked_limit = q;
                break;
            }

            if lead != 0 && prev_cc > lead {
                // до следующей границы FCD и нормализация
                let mut limit = p;

                while let Some((c, next)) = self.text.char_at(limit) {
                    if lccc(c) == 0 {
                        break;
                    }
                    limit = next;
                }

                self.normalize(start, limit);
                self.state = State::Normalized {
                    start,
                    limit,
                    index: 0,
                };
                return;
            }

            prev_cc = tccc(c);

            if p == self.text.len() || prev_cc == 0 {
                self.checked_limit = p;
                break;
            }
        }

        self.checked_start = start;
    }

    /// проверка предыдущего сегмента, заканчивающегося в pos
    fn previous_segment(&mut self)
    {
        let limit = self.pos;
        let mut p = limit;
        let mut next_cc = 0;

        loop {
            let q = p;

            let c = match self.text.char_before(p) {
                Some((c, previous)) => {
                    p = previous;
                    c
                }
                None => {
                    self.checked_start = q;
                    break;
                }
            };

            let trail = tccc(c);

            if trail == 0 && q != limit {
                self.checked_start = q;
                break;
            }

            if trail != 0 && next_cc != 0 && trail > next_cc {
                // назад до границы FCD, как ее находит next_segment: символ с lccc = 0 входит
                // в сегмент, символ с нулевыми lccc и tccc остается перед ним
                let mut start = p;
                let mut lead = lccc(c);

                while lead != 0 {
                    match self.text.char_before(start) {
                        Some((c, previous)) if lccc(c) != 0 || tccc(c) != 0 => {
                            start = previous;
                            lead = lccc(c);
                        }
                        _ => break,
                    }
                }

                self.normalize(start, limit);
                self.state = State::Normalized {
                    start,
                    limit,
                    index: self.normalized.len(),
                };
                return;
            }

            next_cc = lccc(c);

            if p == 0 || next_cc == 0 {
                self.checked_start = p;
                break;
            }
        }

        self.checked_limit = limit;
    }

    fn normalize(&mut self, start: usize, limit: usize)
    {
        let mut pos = start;
        let text = self.text;

        let chars = core::iter::from_fn(|| match pos < limit {
            true => {
                let (c, next) = text.char_at(pos)?;
                pos = next;
                Some(c)
            }
            false => None,
        });

        self.normalized.clear();
        self.normalized.extend(chars.nfd());
    }

    /// выход из нормализованного сегмента на его границу
    #[inline(always)]
    fn leave_segment(&mut self, pos: usize)
    {
        self.pos = pos;
        self.checked_start = pos;
        self.checked_limit = pos;
        self.state = State::Raw;
    }
}

impl<'a, T: TextUnits + ?Sized> CodepointSource for FcdSource<'a, T>
{
    fn next_code_point(&mut self) -> Option<char>
    {
        loop {
            match self.state {
                State::Normalized { limit, index, start } => {
                    if let Some(&c) = self.normalized.get(index) {
                        self.state = State::Normalized {
                            start,
                            limit,
                            index: index + 1,
                        };
                        return Some(c);
                    }

                    self.leave_segment(limit);
                }
                State::Raw => {
                    if self.pos < self.checked_limit {
                        let (c, next) = self.text.char_at(self.pos)?;
                        self.pos = next;

                        return Some(c);
                    }

                    if self.pos >= self.text.len() {
                        return None;
                    }

                    self.next_segment();
                }
            }
        }
    }

    fn previous_code_point(&mut self) -> Option<char>
    {
        loop {
            match self.state {
                State::Normalized { start, limit, index } => {
                    if index > 0 {
                        self.state = State::Normalized {
                            start,
                            limit,
                            index: index - 1,
                        };
                        return Some(self.normalized[index - 1]);
                    }

                    self.leave_segment(start);
                }
                State::Raw => {
                    if self.pos > self.checked_start {
                        let (c, previous) = self.text.char_before(self.pos)?;
                        self.pos = previous;

                        return Some(c);
                    }

                    if self.pos == 0 {
                        return None;
                    }

                    self.previous_segment();
                }
            }
        }
    }

    /// внутри нормализованного сегмента смещение - одна из его границ
    fn offset(&self) -> usize
    {
        match self.state {
            State::Raw => self.pos,
            State::Normalized { start, index: 0, .. } => start,
            State::Normalized { limit, .. } => limit,
        }
    }

    fn reset_to_offset(&mut self, offset: usize)
    {
        self.leave_segment(offset);
    }

    fn len(&self) -> usize
    {
        self.text.len()
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn read_forward(text: &str) -> (String, Vec<usize>)
    {
        let mut source = FcdSource::new(text, vec![]);
        let mut chars = String::new();
        let mut offsets = vec![];

        while let Some(c) = source.next_code_point() {
            chars.push(c);
            offsets.push(source.offset());
        }

        (chars, offsets)
    }

    #[test]
    fn fcd_text_is_read_as_is()
    {
        let (chars, _) = read_forward("a\u{325}\u{300}é");

        assert_eq!(chars, "a\u{325}\u{300}é");
        assert!(is_fcd("a\u{325}\u{300}é".chars()));
    }

    #[test]
    fn misordered_marks_are_normalized()
    {
        // é + кольцо снизу: tccc(é) = 230 > 220
        let text = "xé\u{325}y";
        let (chars, offsets) = read_forward(text);

        assert!(!is_fcd(text.chars()));
        assert_eq!(chars, "xe\u{325}\u{301}y");
        // внутри сегмента смещение - граница сегмента
        assert_eq!(offsets, [1, 5, 5, 5, 6]);
    }

    #[test]
    fn backward_matches_forward()
    {
        let text = "xé\u{325}y";
        let mut source = FcdSource::new(text, vec![]);
        source.reset_to_offset(text.len());

        let mut chars = vec![];

        while let Some(c) = source.previous_code_point() {
            chars.push(c);
        }

        chars.reverse();

        assert_eq!(chars.into_iter().collect::<String>(), "xe\u{325}\u{301}y");
    }

    fn read_backward(text: &str) -> (String, Vec<usize>)
    {
        let mut source = FcdSource::new(text, vec![]);
        source.reset_to_offset(text.len());

        let mut chars = vec![];
        let mut offsets = vec![];

        while let Some(c) = source.previous_code_point() {
            chars.push(c);
            offsets.push(source.offset());
        }

        chars.reverse();
        offsets.reverse();

        (chars.into_iter().collect(), offsets)
    }

    #[test]
    fn segment_stops_at_starter()
    {
        // ǘ: lccc = 0, tccc = 230; тибетская гласная U+0F73: lccc = 129, tccc = 130
        let text = "\u{f73}ǘ\u{f73}";
        let (forward, _) = read_forward(text);
        let (backward, offsets) = read_backward(text);

        assert_eq!(forward, backward);
        assert_eq!(backward, "\u{f73}u\u{f71}\u{f72}\u{308}\u{301}");
        // первая гласная остается вне сегмента
        assert_eq!(offsets[.. 2], [0, 3]);
    }

    #[test]
    fn segment_starts_after_plain_starter()
    {
        // x не имеет ни lccc, ни tccc: сегмент начинается со следующей метки в обе стороны
        let text = "x\u{301}\u{325}";
        let (forward, forward_offsets) = read_forward(text);
        let (backward, backward_offsets) = read_backward(text);

        assert_eq!(forward, "x\u{325}\u{301}");
        assert_eq!(backward, forward);
        assert_eq!(forward_offsets[0], 1);
        assert_eq!(backward_offsets, [0, 1, 5]);
    }
}
