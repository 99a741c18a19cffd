// поиск подстроки с учетом правил сопоставления: образец и текст сравниваются как
// последовательности обработанных CE, совпадение проверяется по границам символов / слов

mod boundary;
mod compare;
mod pce;
mod ring;

pub use boundary::{BreakIterator, GraphemeBreaker, WordBreaker};
pub use compare::{compare_ce64s, CeMatch, ElementComparison};
pub use pce::{CollationPce, ProcessedCe, PROCESSED_NULLORDER};

use log::trace;
use unicode_normalization::char::canonical_combining_class;
use unicode_normalization::UnicodeNormalization;

use crate::codepoint::Text;
use crate::elements::CollationElementIterator;
use crate::error::{CollationError, Result};
use crate::options::Strength;
use crate::Tailoring;
use ring::CeRing;

/// границы совпадения в байтах
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Match
{
    start: usize,
    limit: usize,
}

/// образец и его обработанные CE
#[derive(Debug)]
struct Pattern
{
    text: String,
    ces: Vec<ProcessedCe>,
}

impl Pattern
{
    fn new(text: &str, tailoring: &Tailoring) -> Result<Self>
    {
        if text.is_empty() {
            return Err(CollationError::EmptyPattern);
        }

        let mut source = CollationPce::new(CollationElementIterator::new(tailoring, Text::Utf8(text)));
        let mut ces = vec![];

        loop {
            match source.next_processed()? {
                ce if ce.is_end() => break,
                ce => ces.push(ce),
            }
        }

        trace!("search pattern {:?}: {} processed CEs", text, ces.len());

        Ok(Self {
            text: text.to_owned(),
            ces,
        })
    }
}

/// поиск образца в тексте вперед и назад
///
/// позиции - смещения в байтах UTF-8; None - совпадений больше нет
pub struct StringSearch<'a>
{
    tailoring: &'a Tailoring,
    text: &'a str,
    pattern: Pattern,
    source: CollationPce<'a>,
    /// внешние границы; если их нет - границы графем
    breaker: Option<Box<dyn BreakIterator + 'a>>,
    characters: GraphemeBreaker,
    overlapping: bool,
    canonical: bool,
    comparison: ElementComparison,
    matched: Option<usize>,
    matched_length: usize,
    forward: bool,
    /// после reset / set_text previous() начинает с конца текста
    reset_pending: bool,
}

impl<'a> StringSearch<'a>
{
    pub fn new(
        pattern: &str,
        text: &'a str,
        collator: &'a impl AsRef<Tailoring>,
        breaker: Option<Box<dyn BreakIterator + 'a>>,
    ) -> Result<Self>
    {
        let tailoring = collator.as_ref();
        check_collator(tailoring)?;

        if text.is_empty() {
            return Err(CollationError::EmptyText);
        }

        let mut breaker = breaker;

        if let Some(breaker) = breaker.as_mut() {
            breaker.set_text(text);
        }

        Ok(Self {
            tailoring,
            text,
            pattern: Pattern::new(pattern, tailoring)?,
            source: text_source(tailoring, text),
            breaker,
            characters: GraphemeBreaker::new(text),
            overlapping: false,
            canonical: false,
            comparison: ElementComparison::Standard,
            matched: None,
            matched_length: 0,
            forward: true,
            reset_pending: true,
        })
    }

    #[inline(always)]
    pub fn text(&self) -> &'a str
    {
        self.text
    }

    #[inline(always)]
    pub fn pattern(&self) -> &str
    {
        &self.pattern.text
    }

    #[inline(always)]
    pub fn tailoring(&self) -> &'a Tailoring
    {
        self.tailoring
    }

    /// следующее совпадение может начинаться внутри предыдущего
    pub fn set_overlapping(&mut self, overlapping: bool)
    {
        self.overlapping = overlapping;
    }

    #[inline(always)]
    pub fn is_overlapping(&self) -> bool
    {
        self.overlapping
    }

    /// канонически эквивалентные совпадения: знаки текста другого класса комбинирования,
    /// стоящие между знаками образца, пропускаются
    pub fn set_canonical(&mut self, canonical: bool)
    {
        self.canonical = canonical;
    }

    #[inline(always)]
    pub fn is_canonical(&self) -> bool
    {
        self.canonical
    }

    pub fn set_element_comparison(&mut self, comparison: ElementComparison)
    {
        self.comparison = comparison;
    }

    #[inline(always)]
    pub fn element_comparison(&self) -> ElementComparison
    {
        self.comparison
    }

    pub fn set_break_iterator(&mut self, breaker: Option<Box<dyn BreakIterator + 'a>>)
    {
        self.breaker = breaker;

        if let Some(breaker) = self.breaker.as_mut() {
            breaker.set_text(self.text);
        }
    }

    pub fn set_pattern(&mut self, pattern: &str) -> Result<()>
    {
        self.pattern = Pattern::new(pattern, self.tailoring)?;

        Ok(())
    }

    /// новый текст; поиск начинается заново
    pub fn set_text(&mut self, text: &'a str) -> Result<()>
    {
        if text.is_empty() {
            return Err(CollationError::EmptyText);
        }

        self.text = text;
        self.source = text_source(self.tailoring, text);
        self.characters.set_text(text);

        if let Some(breaker) = self.breaker.as_mut() {
            breaker.set_text(text);
        }

        self.matched = None;
        self.matched_length = 0;
        self.forward = true;
        self.reset_pending = true;

        Ok(())
    }

    /// другие правила сопоставления; CE образца пересчитываются
    pub fn set_collator(&mut self, collator: &'a impl AsRef<Tailoring>) -> Result<()>
    {
        let tailoring = collator.as_ref();
        check_collator(tailoring)?;

        self.pattern = Pattern::new(&self.pattern.text, tailoring)?;
        self.tailoring = tailoring;
        self.source = text_source(tailoring, self.text);

        Ok(())
    }

    /// текущая позиция итератора CE текста
    #[inline(always)]
    pub fn offset(&self) -> usize
    {
        self.source.iter().offset()
    }

    /// установить позицию; найденное совпадение сбрасывается
    pub fn set_offset(&mut self, position: usize) -> Result<()>
    {
        let len = self.text.len();

        if position > len {
            return Err(CollationError::OffsetOutOfRange {
                offset: position,
                len,
            });
        }

        self.reset_pending = false;
        self.matched = None;
        self.matched_length = 0;

        self.source.iter_mut().set_offset(position)
    }

    #[inline(always)]
    pub fn matched_start(&self) -> Option<usize>
    {
        self.matched
    }

    #[inline(always)]
    pub fn matched_length(&self) -> usize
    {
        self.matched_length
    }

    pub fn matched_text(&self) -> Option<&'a str>
    {
        let start = self.matched?;

        self.text.get(start .. start + self.matched_length)
    }

    /// начальные настройки поиска, позиция - начало текста
    pub fn reset(&mut self)
    {
        self.source = text_source(self.tailoring, self.text);
        self.matched = None;
        self.matched_length = 0;
        self.overlapping = false;
        self.canonical = false;
        self.comparison = ElementComparison::Standard;
        self.forward = true;
        self.reset_pending = true;
    }

    /// первое совпадение в тексте
    pub fn first(&mut self) -> Result<Option<usize>>
    {
        self.forward = true;
        self.set_offset(0)?;

        self.handle_next(0)
    }

    /// первое совпадение, начинающееся не левее position
    pub fn following(&mut self, position: usize) -> Result<Option<usize>>
    {
        self.forward = true;
        self.set_offset(position)?;

        self.handle_next(position)
    }

    /// последнее совпадение в тексте
    pub fn last(&mut self) -> Result<Option<usize>>
    {
        let end = self.text.len();

        self.forward = false;
        self.set_offset(end)?;

        self.handle_previous(end)
    }

    /// последнее совпадение, заканчивающееся не правее position
    pub fn preceding(&mut self, position: usize) -> Result<Option<usize>>
    {
        self.forward = false;
        self.set_offset(position)?;

        self.handle_previous(position)
    }

    /// следующее совпадение; при смене направления возвращается текущее
    pub fn next(&mut self) -> Result<Option<usize>>
    {
        let index = self.offset();
        let matched = self.matched;
        let length = self.matched_length;

        self.reset_pending = false;

        match self.forward {
            true => {
                let end = self.text.len();

                let exhausted = index == end
                    || matched.map_or(false, |start| start == end || start + length >= end);

                if exhausted {
                    self.set_match_not_found()?;
                    return Ok(None);
                }
            }
            false => {
                self.forward = true;

                if matched.is_some() {
                    return Ok(matched);
                }
            }
        }

        let position = match matched {
            Some(start) if length > 0 => match self.overlapping {
                true => self.next_char_boundary(start),
                false => start + length,
            },
            _ => index,
        };

        self.handle_next(position)
    }

    /// предыдущее совпадение; при смене направления возвращается текущее
    pub fn previous(&mut self) -> Result<Option<usize>>
    {
        let index = match self.reset_pending {
            true => {
                let end = self.text.len();

                self.forward = false;
                self.set_offset(end)?;

                end
            }
            false => self.offset(),
        };

        let matched = self.matched;

        match self.forward {
            true => {
                self.forward = false;

                if matched.is_some() {
                    return Ok(matched);
                }
            }
            false => {
                if index == 0 || matched == Some(0) {
                    self.set_match_not_found()?;
                    return Ok(None);
                }
            }
        }

        self.handle_previous(matched.unwrap_or(index))
    }

    fn handle_next(&mut self, position: usize) -> Result<Option<usize>>
    {
        if self.pattern.ces.is_empty() {
            self.set_match_not_found()?;
            return Ok(None);
        }

        self.source.iter_mut().set_offset(position)?;

        let start = self.offset();
        let found = self.search(start)?;

        self.accept(found)
    }

    fn handle_previous(&mut self, position: usize) -> Result<Option<usize>>
    {
        if self.pattern.ces.is_empty() {
            self.set_match_not_found()?;
            return Ok(None);
        }

        self.source.iter_mut().set_offset(position)?;

        let start = match (self.overlapping, self.matched) {
            // последний символ предыдущего совпадения
            (true, Some(matched)) => {
                let limit = matched + self.matched_length;

                match Text::Utf8(self.text).char_before(limit) {
                    Some((_, start)) => start,
                    None => limit,
                }
            }
            // начинаем с конца возможного совпадения
            (true, None) => {
                self.source.restart();

                for _ in 1 .. self.pattern.ces.len() {
                    if self.source.next_processed()?.is_end() {
                        break;
                    }
                }

                self.offset()
            }
            (false, _) => self.offset(),
        };

        let found = self.search_backwards(start)?;

        self.accept(found)
    }

    /// запомнить совпадение и встать на его начало
    fn accept(&mut self, found: Option<Match>) -> Result<Option<usize>>
    {
        match found {
            Some(Match { start, limit }) => {
                self.matched = Some(start);
                self.matched_length = limit - start;
                self.source.iter_mut().set_offset(start)?;
            }
            None => self.set_match_not_found()?,
        }

        Ok(self.matched)
    }

    fn set_match_not_found(&mut self) -> Result<()>
    {
        self.matched = None;
        self.matched_length = 0;

        let offset = match self.forward {
            true => self.text.len(),
            false => 0,
        };

        self.source.iter_mut().set_offset(offset)
    }

    #[inline(always)]
    fn next_char_boundary(&self, offset: usize) -> usize
    {
        match Text::Utf8(self.text).char_at(offset) {
            Some((_, next)) => next,
            None => self.text.len(),
        }
    }

    #[inline(always)]
    fn is_break_boundary(&self, offset: usize) -> bool
    {
        match &self.breaker {
            Some(breaker) => breaker.is_boundary(offset),
            None => self.characters.is_boundary(offset),
        }
    }

    #[inline(always)]
    fn next_boundary_after(&self, offset: usize) -> Option<usize>
    {
        match &self.breaker {
            Some(breaker) => breaker.following(offset),
            None => self.characters.following(offset),
        }
    }

    /// на уровне identical совпадение должно быть равно образцу после NFD
    fn check_identical(&self, start: usize, limit: usize) -> bool
    {
        if self.tailoring.settings().strength() != Strength::Identical {
            return true;
        }

        match self.text.get(start .. limit) {
            Some(matched) => matched.nfd().eq(self.pattern.text.nfd()),
            None => false,
        }
    }

    /// сравнение CE текста и образца с учетом канонической эквивалентности
    fn compare(&self, target: ProcessedCe, pattern: ProcessedCe) -> CeMatch
    {
        match compare_ce64s(target.ce, pattern.ce, self.comparison) {
            CeMatch::NoMatch if self.canonical && self.commutes(target, pattern) => {
                CeMatch::SkipTarget
            }
            result => result,
        }
    }

    /// знаки с разными ненулевыми классами комбинирования можно переставить
    fn commutes(&self, target: ProcessedCe, pattern: ProcessedCe) -> bool
    {
        if target.is_end() || target.primary() != 0 || pattern.primary() != 0 {
            return false;
        }

        let ccc = |text: &str, offset: usize| match Text::Utf8(text).char_at(offset) {
            Some((c, _)) => canonical_combining_class(c),
            None => 0,
        };

        let target_ccc = ccc(self.text, target.low);
        let pattern_ccc = ccc(&self.pattern.text, pattern.low);

        target_ccc != 0 && pattern_ccc != 0 && target_ccc != pattern_ccc
    }

    /// ширина кольцевого буфера зависит от правила сравнения
    fn ring(&self) -> CeRing
    {
        CeRing::new(
            self.pattern.ces.len(),
            &self.pattern.text,
            self.comparison != ElementComparison::Standard,
        )
    }

    /// поиск вперед от start
    fn search(&mut self, start: usize) -> Result<Option<Match>>
    {
        let len = self.text.len();

        if start > len {
            return Err(CollationError::OffsetOutOfRange { offset: start, len });
        }

        self.source.iter_mut().set_offset(start)?;
        self.source.restart();

        let mut ring = self.ring();
        let count = self.pattern.ces.len();
        // кандидат не может растянуться дальше буфера: его первый CE должен оставаться в нем
        let span = ring.capacity() - 1;

        // внешний цикл - кандидаты на начало совпадения в пространстве CE
        for target_ix in 0 .. {
            let mut found = true;

            let first = ring.get(target_ix, &mut self.source)?;
            let mut target = first;
            let mut pattern = self.pattern.ces[0];

            let mut cursor = target_ix;
            let mut pattern_ix = 0;

            while pattern_ix < count {
                if cursor - target_ix >= span {
                    found = false;
                    break;
                }

                pattern = self.pattern.ces[pattern_ix];
                target = ring.get(cursor, &mut self.source)?;

                match self.compare(target, pattern) {
                    CeMatch::NoMatch => {
                        found = false;
                        break;
                    }
                    CeMatch::Match => {
                        pattern_ix += 1;
                        cursor += 1;
                    }
                    CeMatch::SkipTarget => cursor += 1,
                    CeMatch::SkipPattern => pattern_ix += 1,
                }
            }

            // образец целиком из пропущенных CE
            if cursor == target_ix {
                found = false;
            }

            if !found {
                match target.is_end() {
                    true => break,
                    false => continue,
                }
            }

            // совпадение в пространстве CE, проверяем границы в тексте
            let last = ring.get(cursor - 1, &mut self.source)?;

            let match_start = first.low;
            let min_limit = last.low;

            let max_limit = match self.comparison {
                ElementComparison::Standard => {
                    let next = ring.get(cursor, &mut self.source)?;

                    // последний CE совпадения - часть расширения, продолжающегося дальше
                    if next.low == next.high && !next.is_end() {
                        found = false;
                    }

                    next.low
                }
                _ => {
                    let mut next_ix = cursor;

                    loop {
                        if next_ix - target_ix > span {
                            found = false;
                            break last.high;
                        }

                        let next = ring.get(next_ix, &mut self.source)?;

                        if next.is_end() {
                            break next.low;
                        }

                        // CE без первичного веса - часть последнего символа совпадения
                        if next.primary() == 0 {
                            if matches!(
                                self.compare(next, pattern),
                                CeMatch::NoMatch | CeMatch::SkipPattern
                            ) {
                                found = false;
                                break next.low;
                            }
                        } else {
                            if next.low == next.high {
                                found = false;
                            }

                            break next.low;
                        }

                        next_ix += 1;
                    }
                }
            };

            // совпадение начинается внутри комбинируемой последовательности
            if !self.is_break_boundary(match_start) {
                found = false;
            }

            // первый символ совпадения сопоставлен не полностью (середина расширения)
            if match_start == first.high {
                found = false;
            }

            // конец совпадения сдвигается за завершающие знаки
            let mut match_limit = max_limit;

            if min_limit < max_limit {
                if min_limit == last.high && self.is_break_boundary(min_limit) {
                    match_limit = min_limit;
                } else if let Some(boundary) = self.next_boundary_after(min_limit) {
                    if boundary >= last.high {
                        match_limit = boundary;
                    }
                }
            }

            if match_limit > max_limit || !self.is_break_boundary(match_limit) {
                found = false;
            }

            if found && !self.check_identical(match_start, match_limit) {
                found = false;
            }

            if found {
                trace!("search: match {} .. {}", match_start, match_limit);

                return Ok(Some(Match {
                    start: match_start,
                    limit: match_limit,
                }));
            }

            trace!("search: candidate at {} rejected by boundaries", match_start);
        }

        Ok(None)
    }

    /// поиск назад: совпадение заканчивается не правее start
    fn search_backwards(&mut self, start: usize) -> Result<Option<Match>>
    {
        let len = self.text.len();

        if start > len {
            return Err(CollationError::OffsetOutOfRange { offset: start, len });
        }

        self.source.restart();

        let mut ring = self.ring();
        let count = self.pattern.ces.len();
        // кандидат не может растянуться дальше буфера: его первый CE должен оставаться в нем
        let span = ring.capacity() - 1;

        // CE графемы после start заранее в буфере: CE после совпадения всегда доступен
        let mut limit_ix = 0;

        match start < len {
            true => {
                let next = self.characters.following(start).unwrap_or(len);
                self.source.iter_mut().set_offset(next)?;

                loop {
                    let ce = ring.get_previous(limit_ix, &mut self.source)?;

                    // low == high == start: хвост расширения символа, стоящего перед start
                    if ce.is_end() || ce.low < start || (ce.low == start && ce.high == start) {
                        break;
                    }

                    limit_ix += 1;
                }
            }
            false => self.source.iter_mut().set_offset(start)?,
        }

        // индексы в пространстве CE растут к началу текста, образец сравнивается с конца
        for target_ix in limit_ix .. {
            let mut found = true;

            let last = ring.get_previous(target_ix, &mut self.source)?;
            let mut target = last;

            let mut cursor = target_ix;
            let mut pattern_ix = count;

            while pattern_ix > 0 {
                if cursor - target_ix >= span {
                    found = false;
                    break;
                }

                let pattern = self.pattern.ces[pattern_ix - 1];
                target = ring.get_previous(cursor, &mut self.source)?;

                match self.compare(target, pattern) {
                    CeMatch::NoMatch => {
                        found = false;
                        break;
                    }
                    CeMatch::Match => {
                        pattern_ix -= 1;
                        cursor += 1;
                    }
                    CeMatch::SkipTarget => cursor += 1,
                    CeMatch::SkipPattern => pattern_ix -= 1,
                }
            }

            if cursor == target_ix {
                found = false;
            }

            if !found {
                match target.is_end() {
                    true => break,
                    false => continue,
                }
            }

            let first = ring.get_previous(cursor - 1, &mut self.source)?;
            let match_start = first.low;

            if !self.is_break_boundary(match_start) || match_start == first.high {
                found = false;
            }

            let min_limit = last.low;

            let match_limit = match target_ix > 0 {
                true => {
                    let next = ring.get_previous(target_ix - 1, &mut self.source)?;

                    if next.low == next.high && !next.is_end() {
                        found = false;
                    }

                    let max_limit = next.low;
                    let mut match_limit = max_limit;

                    if min_limit < max_limit {
                        if let Some(boundary) = self.next_boundary_after(min_limit) {
                            if boundary >= last.high {
                                match_limit = boundary;
                            }
                        }
                    }

                    if match_limit > max_limit || !self.is_break_boundary(match_limit) {
                        found = false;
                    }

                    match_limit
                }
                // после совпадения нет неигнорируемых CE: граница после последнего CE,
                // но не правее start
                false => match self.next_boundary_after(min_limit) {
                    Some(boundary) if boundary > 0 && start > boundary => boundary,
                    _ => start,
                },
            };

            if found && !self.check_identical(match_start, match_limit) {
                found = false;
            }

            if found {
                trace!("search backwards: match {} .. {}", match_start, match_limit);

                return Ok(Some(Match {
                    start: match_start,
                    limit: match_limit,
                }));
            }

            trace!("search backwards: candidate at {} rejected by boundaries", match_start);
        }

        Ok(None)
    }
}

/// поиск несовместим с числовым сравнением
fn check_collator(tailoring: &Tailoring) -> Result<()>
{
    match tailoring.settings().is_numeric() {
        true => Err(CollationError::Unsupported("numeric collation in string search")),
        false => Ok(()),
    }
}

#[inline(always)]
fn text_source<'a>(tailoring: &'a Tailoring, text: &'a str) -> CollationPce<'a>
{
    CollationPce::new(CollationElementIterator::new(tailoring, Text::Utf8(text)))
}
