pub mod groups;
mod root;
mod tailoring;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};
use smallvec::SmallVec;
use unicode_normalization::char::{
    canonical_combining_class, decompose_canonical, decompose_compatible,
};

pub use groups::ReorderCode;
pub use tailoring::{load_locale, TailoringBuilder};

use crate::collation_element::*;
use crate::compare::fast_latin::FastLatinTable;
use crate::codepoint::fcd::lccc;
use crate::hangul;
use crate::implicit::implicit_ce;

/// сокращение: продолжение после первого символа и его CE
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contraction
{
    pub suffix: Box<[char]>,
    pub ces: Box<[u64]>,
}

/// таблица весов: корневая или с учетом языковых правил
pub struct CollationData
{
    name: String,
    /// явно заданные CE
    mappings: HashMap<char, Box<[u64]>>,
    /// сокращения по первому символу, от длинных к коротким
    contractions: HashMap<char, Vec<Contraction>>,
    /// символы, встречающиеся в сокращениях не на первой позиции
    contraction_tails: HashSet<char>,
    /// ведущие байты первичных весов, допускающие сжатие в ключе
    compressible: [bool; 256],
    /// максимальная длина расширений по последней legacy-половине
    max_expansions: OnceCell<HashMap<u32, u32>>,
    fast_latin: OnceCell<FastLatinTable>,
}

static ROOT: Lazy<Arc<CollationData>> = Lazy::new(|| Arc::new(root::build()));

/// корневая таблица (CLDR root без языковых правил)
pub fn root() -> Arc<CollationData>
{
    Arc::clone(&ROOT)
}

impl fmt::Debug for CollationData
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("CollationData")
            .field("name", &self.name)
            .field("mappings", &self.mappings.len())
            .field("contractions", &self.contractions.len())
            .finish()
    }
}

impl CollationData
{
    pub(crate) fn new(
        name: String,
        mappings: HashMap<char, Box<[u64]>>,
        contractions: HashMap<char, Vec<Contraction>>,
        compressible: [bool; 256],
    ) -> Self
    {
        let contraction_tails = contractions
            .values()
            .flatten()
            .flat_map(|contraction| contraction.suffix.iter().copied())
            .collect();

        Self {
            name,
            mappings,
            contractions,
            contraction_tails,
            compressible,
            max_expansions: OnceCell::new(),
            fast_latin: OnceCell::new(),
        }
    }

    #[inline(always)]
    pub fn name(&self) -> &str
    {
        &self.name
    }

    /// сокращения, начинающиеся с символа
    #[inline(always)]
    pub fn contractions(&self, c: char) -> Option<&[Contraction]>
    {
        self.contractions.get(&c).map(Vec::as_slice)
    }

    #[inline(always)]
    pub fn is_contraction_starter(&self, c: char) -> bool
    {
        self.contractions.contains_key(&c)
    }

    /// с символа нельзя начинать разбор строки с середины: он может продолжать сокращение,
    /// комбинироваться с предыдущим символом или быть частью числа
    #[inline(always)]
    pub fn is_unsafe_backward(&self, c: char, numeric: bool) -> bool
    {
        (numeric && c.is_ascii_digit()) || lccc(c) != 0 || self.contraction_tails.contains(&c)
    }

    #[inline(always)]
    pub fn is_compressible(&self, lead_byte: u8) -> bool
    {
        self.compressible[lead_byte as usize]
    }

    /// CE символа без учета сокращений
    pub fn append_ces(&self, c: char, out: &mut Vec<u64>)
    {
        if let Some(ces) = self.mappings.get(&c) {
            out.extend_from_slice(ces);
            return;
        }

        let code = c as u32;

        if hangul::is_syllable(code) {
            hangul::write_hangul_syllable(code, out);
            return;
        }

        // каноническая декомпозиция: веса составляющих
        if let Some(decomposition) = decomposition(c, false) {
            decomposition.iter().for_each(|&d| self.append_ces(d, out));
            return;
        }

        // декомпозиция совместимости: веса составляющих с вариантом третичного веса
        if let Some(decomposition) = decomposition(c, true) {
            let start = out.len();
            decomposition.iter().for_each(|&d| self.append_ces(d, out));

            for ce in out[start ..].iter_mut() {
                *ce = tertiary_variant(*ce);
            }
            return;
        }

        let ccc = canonical_combining_class(c);

        if ccc != 0 {
            out.push(mark_ce(code));
            return;
        }

        out.push(implicit_ce(code));
    }

    /// CE символа одним списком
    pub fn ces_of(&self, c: char) -> SmallVec<[u64; 4]>
    {
        let mut out = Vec::with_capacity(4);
        self.append_ces(c, &mut out);

        SmallVec::from_vec(out)
    }

    /// копия явных сопоставлений и сокращений - основа для языковых правил
    pub(crate) fn parts(&self) -> (HashMap<char, Box<[u64]>>, HashMap<char, Vec<Contraction>>, [bool; 256])
    {
        (self.mappings.clone(), self.contractions.clone(), self.compressible)
    }

    pub(crate) fn mappings(&self) -> impl Iterator<Item = (&char, &Box<[u64]>)>
    {
        self.mappings.iter()
    }

    pub(crate) fn all_contractions(&self) -> impl Iterator<Item = &Contraction>
    {
        self.contractions.values().flatten()
    }

    pub(crate) fn max_expansions_cell(&self) -> &OnceCell<HashMap<u32, u32>>
    {
        &self.max_expansions
    }

    pub(crate) fn fast_latin_cell(&self) -> &OnceCell<FastLatinTable>
    {
        &self.fast_latin
    }
}

/// декомпозиция символа, если она есть
fn decomposition(c: char, compatible: bool) -> Option<SmallVec<[char; 4]>>
{
    let mut result = SmallVec::<[char; 4]>::new();

    match compatible {
        true => decompose_compatible(c, |d| result.push(d)),
        false => decompose_canonical(c, |d| result.push(d)),
    }

    match result.as_slice() {
        [single] if *single == c => None,
        _ => Some(result),
    }
}

/// вариант третичного веса (совместимость, лигатуры, формы)
#[inline(always)]
pub(crate) fn tertiary_variant(ce: u64) -> u64
{
    let tertiary = ce as u32 & 0x3F00;

    match ce as u32 == 0 || tertiary > 0x3C00 {
        true => ce,
        false => ce + 0x0200,
    }
}

/// вторичный CE комбинируемого символа
#[inline(always)]
pub(crate) fn mark_ce(code: u32) -> u64
{
    let secondary = match code {
        0x0300 ..= 0x036F => (0x50 + code - 0x0300) << 8,
        _ => 0xC000 + ((code & 0x3F) << 8),
    };

    make_ce_weights(0, secondary, COMMON_WEIGHT16)
}
