//! общие помощники интеграционных тестов

use unicode_collator::collation_element::NULLORDER;
use unicode_collator::{
    Collate, CollationElementIterator, Collator, CollatorOptions, Result, StringSearch, Strength,
};

/// корневой коллатор с заданным уровнем сравнения
pub fn collator(strength: Strength) -> Collator
{
    let mut collator = Collator::root();
    collator.set_options(CollatorOptions {
        strength,
        ..Default::default()
    });

    collator
}

/// все CE от текущей позиции до конца
pub fn forward(iter: &mut CollationElementIterator) -> Result<Vec<u32>>
{
    let mut result = vec![];

    loop {
        match iter.next()? {
            NULLORDER => return Ok(result),
            ce => result.push(ce),
        }
    }
}

/// все CE от текущей позиции до начала, в порядке получения
pub fn backward(iter: &mut CollationElementIterator) -> Result<Vec<u32>>
{
    let mut result = vec![];

    loop {
        match iter.previous()? {
            NULLORDER => return Ok(result),
            ce => result.push(ce),
        }
    }
}

/// CE строки вперед
pub fn elements(collator: &impl Collate, text: &str) -> Vec<u32>
{
    let mut iter = collator.element_iter(text);

    match forward(&mut iter) {
        Ok(ces) => ces,
        Err(e) => panic!("{:?}: {}", text, e),
    }
}

/// смещения перед каждым CE при движении вперед
pub fn forward_offsets(iter: &mut CollationElementIterator) -> Result<Vec<usize>>
{
    let mut result = vec![];

    loop {
        let offset = iter.offset();

        if iter.next()? == NULLORDER {
            return Ok(result);
        }

        result.push(offset);
    }
}

/// смещения после каждого CE при движении назад
pub fn backward_offsets(iter: &mut CollationElementIterator) -> Result<Vec<usize>>
{
    let mut result = vec![];

    while iter.previous()? != NULLORDER {
        result.push(iter.offset());
    }

    Ok(result)
}

/// все совпадения (начало, длина) от начала текста вперед
pub fn matches(search: &mut StringSearch) -> Result<Vec<(usize, usize)>>
{
    let mut result = vec![];
    let mut found = search.first()?;

    while let Some(start) = found {
        result.push((start, search.matched_length()));
        found = search.next()?;
    }

    Ok(result)
}

/// все совпадения от конца текста назад
pub fn matches_backward(search: &mut StringSearch) -> Result<Vec<(usize, usize)>>
{
    let mut result = vec![];
    let mut found = search.last()?;

    while let Some(start) = found {
        result.push((start, search.matched_length()));
        found = search.previous()?;
    }

    Ok(result)
}
