use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use super::root::{with_tertiary, UPPER_TERTIARY};
use super::{decomposition, root, CollationData, Contraction};
use crate::collation_element::primary;
use crate::error::{CollationError, Result};

/// сколько букв можно вставить после одной буквы корневой таблицы
const MAX_LETTERS_AFTER: u32 = 5;

/// построение таблицы с языковыми правилами поверх базовой
pub struct TailoringBuilder
{
    name: String,
    base: Arc<CollationData>,
    mappings: HashMap<char, Box<[u64]>>,
    contractions: HashMap<char, Vec<Contraction>>,
    compressible: [bool; 256],
    /// сколько букв уже вставлено после первичного веса
    inserted_after: HashMap<u32, u32>,
}

impl TailoringBuilder
{
    pub fn new(name: &str) -> Self
    {
        Self::with_base(name, root())
    }

    pub fn with_base(name: &str, base: Arc<CollationData>) -> Self
    {
        let (mappings, contractions, compressible) = base.parts();

        Self {
            name: name.to_owned(),
            base,
            mappings,
            contractions,
            compressible,
            inserted_after: HashMap::new(),
        }
    }

    /// новая буква сразу после `after`: строчная форма и заглавные формы
    ///
    /// многосимвольная форма становится сокращением, у односимвольной с канонической декомпозицией
    /// сокращением становится и разложенная форма
    pub fn letter_after(mut self, after: char, lower: &str, upper: &[&str]) -> Result<Self>
    {
        let ce = match self.ces(after).as_slice() {
            [ce] if primary(*ce) != 0 => *ce,
            _ => {
                return Err(CollationError::InvalidTailoring(format!(
                    "'{after}' has no single primary weight"
                )))
            }
        };

        let p = primary(ce);
        let count = self.inserted_after.entry(p).or_insert(0);
        *count += 1;

        if *count > MAX_LETTERS_AFTER {
            return Err(CollationError::InvalidTailoring(format!(
                "no room for '{lower}' after '{after}'"
            )));
        }

        let letter = ce + ((*count as u64) << 48);

        self.add_form(lower, letter)?;

        for form in upper {
            self.add_form(form, with_tertiary(letter, UPPER_TERTIARY))?;
        }

        Ok(self)
    }

    /// символ сортируется как последовательность символов
    pub fn expansion(mut self, c: char, sequence: &str) -> Result<Self>
    {
        let ces: Vec<u64> = sequence.chars().flat_map(|s| self.ces(s)).collect();

        if ces.is_empty() {
            return Err(CollationError::InvalidTailoring(format!(
                "empty expansion for U+{:04X}",
                c as u32
            )));
        }

        self.mappings.insert(c, ces.into_boxed_slice());

        Ok(self)
    }

    /// последовательность символов сортируется как последовательность CE
    pub fn contraction(mut self, sequence: &str, ces: &[u64]) -> Result<Self>
    {
        self.insert_contraction(sequence, ces)?;

        Ok(self)
    }

    pub fn build(self) -> CollationData
    {
        log::debug!(
            "tailoring {}: {} mappings, {} contraction starters",
            self.name,
            self.mappings.len(),
            self.contractions.len()
        );

        CollationData::new(self.name, self.mappings, self.contractions, self.compressible)
    }

    /// CE символа с учетом уже добавленных правил
    fn ces(&self, c: char) -> Vec<u64>
    {
        match self.mappings.get(&c) {
            Some(ces) => ces.to_vec(),
            None => self.base.ces_of(c).to_vec(),
        }
    }

    fn add_form(&mut self, form: &str, ce: u64) -> Result<()>
    {
        let mut chars = form.chars();

        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                self.mappings.insert(c, Box::new([ce]));

                if let Some(decomposed) = decomposition(c, false) {
                    let decomposed: String = decomposed.into_iter().collect();
                    self.insert_contraction(&decomposed, &[ce])?;
                }

                Ok(())
            }
            (Some(_), Some(_)) => self.insert_contraction(form, &[ce]),
            _ => Err(CollationError::InvalidTailoring(String::from("empty letter"))),
        }
    }

    fn insert_contraction(&mut self, sequence: &str, ces: &[u64]) -> Result<()>
    {
        let mut chars = sequence.chars();

        let (first, suffix) = match (chars.next(), chars.as_str()) {
            (Some(first), suffix) if !suffix.is_empty() && !ces.is_empty() => (first, suffix),
            _ => {
                return Err(CollationError::InvalidTailoring(format!(
                    "invalid contraction {sequence:?}"
                )))
            }
        };

        let list = self.contractions.entry(first).or_default();
        let suffix: Box<[char]> = suffix.chars().collect();

        list.retain(|contraction| contraction.suffix != suffix);
        list.push(Contraction {
            suffix,
            ces: ces.into(),
        });
        list.sort_by(|a, b| b.suffix.len().cmp(&a.suffix.len()));

        Ok(())
    }
}

/// языковые правила по идентификатору
fn build_locale(id: &str) -> Option<Result<CollationData>>
{
    let builder = TailoringBuilder::new(id);

    let result = match id {
        "es" => builder.letter_after('n', "ñ", &["Ñ"]),
        "es_traditional" => builder
            .letter_after('n', "ñ", &["Ñ"])
            .and_then(|b| b.letter_after('c', "ch", &["Ch", "CH"]))
            .and_then(|b| b.letter_after('l', "ll", &["Ll", "LL"])),
        "cs" | "sk" => builder.letter_after('h', "ch", &["Ch", "CH"]),
        "da" | "nb" | "nn" | "no" => builder
            .letter_after('z', "æ", &["Æ"])
            .and_then(|b| b.letter_after('z', "ø", &["Ø"]))
            .and_then(|b| b.letter_after('z', "å", &["Å"])),
        "sv" | "fi" => builder
            .letter_after('z', "å", &["Å"])
            .and_then(|b| b.letter_after('z', "ä", &["Ä"]))
            .and_then(|b| b.letter_after('z', "ö", &["Ö"])),
        _ => return None,
    };

    Some(result.map(TailoringBuilder::build))
}

static TAILORINGS: Lazy<Mutex<HashMap<String, Arc<CollationData>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// нормализованные варианты идентификатора: полный, затем только язык
fn candidates(locale: &str) -> Vec<String>
{
    let id = locale.trim().to_ascii_lowercase().replace('-', "_");

    let (id, traditional) = match id.split_once("@collation=") {
        Some((base, collation)) => (base.to_owned(), collation == "traditional"),
        None => match id.split_once("_u_co_") {
            Some((base, collation)) => (base.to_owned(), collation == "trad"),
            None => (id.clone(), false),
        },
    };

    let language = id.split('_').next().unwrap_or_default().to_owned();
    let mut result = vec![];

    if traditional {
        result.push(format!("{language}_traditional"));
    }

    result.push(id.clone());

    if language != id {
        result.push(language);
    }

    result
}

/// таблица для локали; None - правил для локали нет, используется корневая таблица
pub fn load_locale(locale: &str) -> Result<Option<Arc<CollationData>>>
{
    for id in candidates(locale) {
        if matches!(id.as_str(), "" | "root" | "und") {
            return Ok(Some(root()));
        }

        if let Some(data) = TAILORINGS.lock().get(&id) {
            return Ok(Some(Arc::clone(data)));
        }

        if let Some(data) = build_locale(&id) {
            let data = Arc::new(data?);
            TAILORINGS.lock().insert(id, Arc::clone(&data));

            return Ok(Some(data));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn locale_candidates()
    {
        assert_eq!(candidates("es-u-co-trad"), ["es_traditional", "es"]);
        assert_eq!(candidates("es@collation=traditional"), ["es_traditional", "es"]);
        assert_eq!(candidates("de_DE"), ["de_de", "de"]);
        assert_eq!(candidates("SV"), ["sv"]);
    }

    #[test]
    fn traditional_spanish_has_ch()
    {
        let data = load_locale("es-u-co-trad").unwrap().unwrap();
        let contractions = data.contractions('c').unwrap();

        assert!(contractions.iter().any(|c| *c.suffix == ['h']));
        assert!(data.is_unsafe_backward('h', false));
    }

    #[test]
    fn too_many_letters_after()
    {
        let result = (0 .. 6).try_fold(TailoringBuilder::new("test"), |builder, i| {
            let letter = char::from_u32(0xE000 + i).unwrap().to_string();
            builder.letter_after('q', &letter, &[])
        });

        assert!(matches!(result, Err(CollationError::InvalidTailoring(_))));
    }
}
