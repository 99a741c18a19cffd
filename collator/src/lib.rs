use core::cell::RefCell;
use core::cmp::Ordering;
use std::sync::Arc;

use log::debug;
use parking_lot::Mutex;

use data::CollationData;

pub use buffer::CollationBuffer;
pub use codepoint::Text;
pub use data::{ReorderCode, TailoringBuilder};
pub use elements::CollationElementIterator;
pub use error::{CollationError, Result};
pub use key::SortKey;
pub use options::{
    AlternateHandling, CaseFirst, CollationSettings, CollatorOptions, CollatorOptionsValue,
    MaxVariable, Strength,
};
pub use search::{BreakIterator, ElementComparison, GraphemeBreaker, StringSearch, WordBreaker};

mod buffer;
mod codepoint;
pub mod collation_element;
mod compare;
pub mod data;
pub mod elements;
mod error;
mod hangul;
mod implicit;
mod key;
pub mod options;
mod scanner;
pub mod search;

/// таблица весов и настройки: всё, что нужно итератору CE, сравнению и поиску
#[derive(Debug, Clone)]
pub struct Tailoring
{
    data: Arc<CollationData>,
    settings: CollationSettings,
}

impl Tailoring
{
    pub fn new(data: Arc<CollationData>, settings: CollationSettings) -> Self
    {
        Self { data, settings }
    }

    /// корневая таблица, настройки по умолчанию
    pub fn root() -> Self
    {
        Self::new(data::root(), CollationSettings::default())
    }

    /// правила локали; если их нет - корневая таблица
    pub fn for_locale(locale: &str) -> Result<Self>
    {
        let data = match data::load_locale(locale)? {
            Some(data) => data,
            None => {
                debug!("no tailoring for locale {:?}, falling back to root", locale);
                data::root()
            }
        };

        Ok(Self::new(data, CollationSettings::default()))
    }

    #[inline(always)]
    pub fn data(&self) -> &CollationData
    {
        &self.data
    }

    #[inline(always)]
    pub fn settings(&self) -> &CollationSettings
    {
        &self.settings
    }

    pub fn set_options(&mut self, options: CollatorOptions)
    {
        self.settings.set_options(options);
    }

    pub fn set_reorder_codes(&mut self, codes: &[ReorderCode]) -> Result<()>
    {
        self.settings.set_reorder_codes(codes)
    }

    pub fn set_variable_top(&mut self, primary: u32) -> Result<()>
    {
        self.settings.set_variable_top(primary)
    }

    pub fn element_iter<'a>(&'a self, text: &'a str) -> CollationElementIterator<'a>
    {
        CollationElementIterator::new(self, Text::Utf8(text))
    }

    pub fn element_iter_utf16<'a>(&'a self, text: &'a [u16]) -> CollationElementIterator<'a>
    {
        CollationElementIterator::new(self, Text::Utf16(text))
    }

    /// максимальная длина расширения, заканчивающегося на legacy CE
    pub fn max_expansion(&self, order: u32) -> u32
    {
        elements::max_expansion(&self.data, order)
    }

    #[inline(always)]
    fn compare_texts(&self, left: Text, right: Text, buffer: &mut CollationBuffer) -> Ordering
    {
        compare::compare(&self.data, &self.settings, left, right, buffer)
    }

    #[inline(always)]
    fn sort_key_of(&self, text: Text, buffer: &mut CollationBuffer) -> SortKey
    {
        key::sort_key(&self.data, &self.settings, text, buffer)
    }
}

/// одна и та же таблица (не копия) и одинаковые настройки
impl PartialEq for Tailoring
{
    fn eq(&self, other: &Self) -> bool
    {
        Arc::ptr_eq(&self.data, &other.data) && self.settings == other.settings
    }
}

impl AsRef<Tailoring> for Tailoring
{
    fn as_ref(&self) -> &Tailoring
    {
        self
    }
}

/// сравнение и ключи; рабочие буферы выдает реализация
pub trait Collate: AsRef<Tailoring>
{
    /// выполнить f с рабочим буфером коллатора
    fn with_buffer<R>(&self, f: impl FnOnce(&mut CollationBuffer) -> R) -> R;

    fn compare(&self, left: &str, right: &str) -> Ordering
    {
        self.with_buffer(|buffer| {
            self.as_ref()
                .compare_texts(Text::Utf8(left), Text::Utf8(right), buffer)
        })
    }

    fn compare_utf16(&self, left: &[u16], right: &[u16]) -> Ordering
    {
        self.with_buffer(|buffer| {
            self.as_ref()
                .compare_texts(Text::Utf16(left), Text::Utf16(right), buffer)
        })
    }

    fn equals(&self, left: &str, right: &str) -> bool
    {
        self.compare(left, right) == Ordering::Equal
    }

    fn sort_key(&self, text: &str) -> SortKey
    {
        self.with_buffer(|buffer| self.as_ref().sort_key_of(Text::Utf8(text), buffer))
    }

    fn sort_key_utf16(&self, text: &[u16]) -> SortKey
    {
        self.with_buffer(|buffer| self.as_ref().sort_key_of(Text::Utf16(text), buffer))
    }

    fn element_iter<'a>(&'a self, text: &'a str) -> CollationElementIterator<'a>
    {
        self.as_ref().element_iter(text)
    }

    fn element_iter_utf16<'a>(&'a self, text: &'a [u16]) -> CollationElementIterator<'a>
    {
        self.as_ref().element_iter_utf16(text)
    }

    fn options(&self) -> CollatorOptions
    {
        self.as_ref().settings().options()
    }

    fn variable_top(&self) -> u32
    {
        self.as_ref().settings().variable_top()
    }

    fn max_expansion(&self, order: u32) -> u32
    {
        self.as_ref().max_expansion(order)
    }
}

/// коллатор с одним владельцем: настройки меняются, буфер без блокировки
#[derive(Debug)]
pub struct Collator
{
    tailoring: Tailoring,
    buffer: RefCell<CollationBuffer>,
}

impl Collator
{
    pub fn new(tailoring: Tailoring) -> Self
    {
        Self {
            tailoring,
            buffer: RefCell::default(),
        }
    }

    /// CLDR root
    pub fn root() -> Self
    {
        Self::new(Tailoring::root())
    }

    pub fn for_locale(locale: &str) -> Result<Self>
    {
        Ok(Self::new(Tailoring::for_locale(locale)?))
    }

    #[inline(always)]
    pub fn tailoring(&self) -> &Tailoring
    {
        &self.tailoring
    }

    pub fn set_options(&mut self, options: CollatorOptions)
    {
        self.tailoring.set_options(options);
    }

    pub fn set_strength(&mut self, strength: Strength)
    {
        self.update(|options| options.strength = strength);
    }

    pub fn set_alternate(&mut self, alternate: AlternateHandling)
    {
        self.update(|options| options.alternate = alternate);
    }

    pub fn set_max_variable(&mut self, max_variable: MaxVariable)
    {
        self.update(|options| options.max_variable = max_variable);
    }

    /// граница переменных весов по первичному весу; вес вне групп переменных - ошибка
    pub fn set_variable_top(&mut self, primary: u32) -> Result<()>
    {
        self.tailoring.set_variable_top(primary)
    }

    pub fn set_case_first(&mut self, case_first: CaseFirst)
    {
        self.update(|options| options.case_first = case_first);
    }

    pub fn set_case_level(&mut self, case_level: bool)
    {
        self.update(|options| options.case_level = case_level);
    }

    pub fn set_backward_secondary(&mut self, backward_secondary: bool)
    {
        self.update(|options| options.backward_secondary = backward_secondary);
    }

    pub fn set_numeric(&mut self, numeric: bool)
    {
        self.update(|options| options.numeric = numeric);
    }

    pub fn set_normalization(&mut self, normalization: bool)
    {
        self.update(|options| options.normalization = normalization);
    }

    pub fn set_reorder_codes(&mut self, codes: &[ReorderCode]) -> Result<()>
    {
        self.tailoring.set_reorder_codes(codes)
    }

    pub fn reorder_codes(&self) -> &[ReorderCode]
    {
        self.tailoring.settings().reorder_codes()
    }

    /// неизменяемый коллатор для использования из нескольких потоков
    pub fn freeze(self) -> FrozenCollator
    {
        FrozenCollator::new(self.tailoring)
    }

    #[inline(always)]
    fn update(&mut self, f: impl FnOnce(&mut CollatorOptions))
    {
        let mut options = self.tailoring.settings().options();
        f(&mut options);

        self.tailoring.set_options(options);
    }
}

impl Clone for Collator
{
    fn clone(&self) -> Self
    {
        Self::new(self.tailoring.clone())
    }
}

impl AsRef<Tailoring> for Collator
{
    fn as_ref(&self) -> &Tailoring
    {
        &self.tailoring
    }
}

impl Collate for Collator
{
    fn with_buffer<R>(&self, f: impl FnOnce(&mut CollationBuffer) -> R) -> R
    {
        f(&mut self.buffer.borrow_mut())
    }
}

/// неизменяемый коллатор: Send + Sync, рабочий буфер выдается под блокировкой
#[derive(Debug)]
pub struct FrozenCollator
{
    tailoring: Tailoring,
    buffer: Mutex<CollationBuffer>,
}

impl FrozenCollator
{
    pub fn new(tailoring: Tailoring) -> Self
    {
        Self {
            tailoring,
            buffer: Mutex::default(),
        }
    }

    #[inline(always)]
    pub fn tailoring(&self) -> &Tailoring
    {
        &self.tailoring
    }

    /// изменяемая копия
    pub fn thaw(self) -> Collator
    {
        Collator::new(self.tailoring)
    }
}

impl Clone for FrozenCollator
{
    fn clone(&self) -> Self
    {
        Self::new(self.tailoring.clone())
    }
}

impl AsRef<Tailoring> for FrozenCollator
{
    fn as_ref(&self) -> &Tailoring
    {
        &self.tailoring
    }
}

impl Collate for FrozenCollator
{
    fn with_buffer<R>(&self, f: impl FnOnce(&mut CollationBuffer) -> R) -> R
    {
        f(&mut self.buffer.lock())
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn frozen_is_shared()
    {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<FrozenCollator>();

        let collator = Arc::new(Collator::root().freeze());

        let handles: Vec<_> = (0 .. 4)
            .map(|_| {
                let collator = Arc::clone(&collator);
                std::thread::spawn(move || collator.compare("abc", "abd"))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), Ordering::Less);
        }
    }

    #[test]
    fn setters_change_order()
    {
        let mut collator = Collator::root();

        assert_eq!(collator.compare("a", "A"), Ordering::Less);

        collator.set_case_first(CaseFirst::UpperFirst);
        assert_eq!(collator.compare("a", "A"), Ordering::Greater);

        collator.set_strength(Strength::Primary);
        assert!(collator.equals("a", "Á"));
    }

    #[test]
    fn variable_top_from_primary()
    {
        let mut collator = Collator::root();
        collator.set_alternate(AlternateHandling::Shifted);

        assert_eq!(collator.compare("a$b", "ab"), Ordering::Less);

        collator.set_variable_top(0x0700_0000).unwrap();
        assert_eq!(collator.options().max_variable, MaxVariable::Currency);
        assert_eq!(collator.variable_top(), 0x07FF_FFFF);
        assert!(collator.equals("a$b", "ab"));

        assert_eq!(
            collator.set_variable_top(0x1000_0000),
            Err(CollationError::InvalidVariableTop(0x1000_0000))
        );
        assert_eq!(collator.options().max_variable, MaxVariable::Currency);
    }

    #[test]
    fn missing_locale_falls_back()
    {
        let collator = Collator::for_locale("xx-YY").unwrap();

        assert_eq!(collator.tailoring(), &Tailoring::root());
    }
}
