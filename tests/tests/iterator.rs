use std::sync::Arc;

use proptest::prelude::*;
use rstest::rstest;
use unicode_collation_tests::*;
use unicode_collator::collation_element::*;
use unicode_collator::{
    Collate, CollationError, CollationSettings, Collator, Strength, Tailoring, TailoringBuilder,
};

#[test]
fn traditional_spanish_ch()
{
    let collator = Collator::for_locale("es-u-co-trad").unwrap();
    let ces = elements(&collator, "cha");

    assert_eq!(ces.len(), 2);
    assert!(ces.iter().all(|&ce| primary_order(ce) != 0));

    // без языковых правил "ch" - две буквы
    let root = Collator::root();
    assert_eq!(elements(&root, "cha").len(), 3);
    assert_ne!(primary_order(ces[0]), primary_order(elements(&root, "c")[0]));
}

#[test]
fn ligature_expands()
{
    let collator = Collator::root();
    let ces = elements(&collator, "æb");
    let letters = elements(&collator, "aeb");

    assert_eq!(ces.len(), 3);

    for (ce, letter) in ces.iter().zip(letters.iter()) {
        assert_eq!(primary_order(*ce), primary_order(*letter));
        assert_eq!(secondary_order(*ce), secondary_order(*letter));
    }

    // лигатура отличается от букв только третичным весом
    assert_ne!(tertiary_order(ces[0]), tertiary_order(letters[0]));
}

#[test]
fn max_expansion_of_tail()
{
    let data = TailoringBuilder::new("expansion")
        .expansion('\u{E000}', "xyz")
        .unwrap()
        .build();
    let tailoring = Tailoring::new(Arc::new(data), CollationSettings::default());

    let mut iter = tailoring.element_iter("\u{E000}");
    let ces = forward(&mut iter).unwrap();
    let z = elements(&Collator::root(), "z")[0];

    assert_eq!(ces.len(), 3);
    assert_eq!(ces[2], z);
    assert_eq!(iter.max_expansion(z), 3);
    assert_eq!(Collator::root().max_expansion(z), 1);
}

#[test]
fn direction_change_is_fatal()
{
    let collator = Collator::root();
    let mut iter = collator.element_iter("abc");

    assert_ne!(iter.next().unwrap(), NULLORDER);
    assert_eq!(iter.previous(), Err(CollationError::IllegalDirectionChange));

    // set_offset разрешает смену направления
    iter.set_offset(2).unwrap();
    assert_eq!(iter.previous().unwrap(), elements(&collator, "b")[0]);
}

#[test]
fn utf16_matches_utf8()
{
    let collator = Collator::root();
    let text = "Straße, café 中文 ﬁ";
    let units: Vec<u16> = text.encode_utf16().collect();

    let mut iter = collator.element_iter_utf16(&units);

    assert_eq!(forward(&mut iter).unwrap(), elements(&collator, text));
    assert_eq!(iter.offset(), units.len());
}

#[rstest]
#[case("abc", 1, "bc")]
#[case("abc", 3, "")]
#[case("a中b", 1, "中b")]
#[case("xæy", 1, "æy")]
fn set_offset_restarts_at_char(#[case] text: &str, #[case] offset: usize, #[case] rest: &str)
{
    let collator = Collator::root();
    let mut iter = collator.element_iter(text);

    iter.set_offset(offset).unwrap();

    assert_eq!(iter.offset(), offset);
    assert_eq!(forward(&mut iter).unwrap(), elements(&collator, rest));
}

#[test]
fn set_offset_leaves_contraction()
{
    let collator = Collator::for_locale("es-u-co-trad").unwrap();
    let mut iter = collator.element_iter("acha");

    // середина "ch" - назад к началу сокращения
    iter.set_offset(2).unwrap();

    assert_eq!(iter.offset(), 1);
    assert_eq!(forward(&mut iter).unwrap().len(), 2);
}

#[test]
fn strength_order_masks_levels()
{
    let collator = collator(Strength::Primary);
    let iter = collator.element_iter("a");
    let a = elements(&collator, "a")[0];

    assert_eq!(iter.strength_order(a), a & 0xFFFF_0000);
}

fn text() -> impl Strategy<Value = String>
{
    "[a-zA-Z0-9 .,\\-æßøéÀ\u{300}\u{325}中ア가]{0,12}"
}

proptest! {
    #[test]
    fn backward_mirrors_forward(text in text())
    {
        let collator = Collator::root();

        let mut expected = elements(&collator, &text);
        expected.reverse();

        let mut iter = collator.element_iter(&text);
        prop_assert_eq!(backward(&mut iter).unwrap(), expected);
    }

    #[test]
    fn offsets_are_monotonic(text in text())
    {
        let collator = Collator::root();

        let mut iter = collator.element_iter(&text);
        let offsets = forward_offsets(&mut iter).unwrap();

        prop_assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(offsets.iter().all(|&o| o <= text.len()));
        prop_assert_eq!(iter.offset(), text.len());

        iter.reset();
        let offsets = backward_offsets(&mut iter).unwrap();

        prop_assert!(offsets.windows(2).all(|w| w[0] >= w[1]));
        prop_assert_eq!(iter.offset(), 0);
    }

    #[test]
    fn offsets_round_trip(text in "[a-zæßø\u{300}\u{325}中가 ]{0,16}")
    {
        let collator = Collator::root();
        let mut iter = collator.element_iter(&text);

        let mut expected = forward_offsets(&mut iter).unwrap();
        expected.reverse();

        iter.reset();
        prop_assert_eq!(backward_offsets(&mut iter).unwrap(), expected);
    }

    #[test]
    fn reset_is_idempotent(text in text(), steps in 0usize .. 8)
    {
        let collator = Collator::root();
        let expected = elements(&collator, &text);

        let mut iter = collator.element_iter(&text);

        for _ in 0 .. steps {
            iter.next().unwrap();
        }

        iter.reset();
        prop_assert_eq!(forward(&mut iter).unwrap(), expected.clone());

        iter.reset();
        iter.reset();
        prop_assert_eq!(forward(&mut iter).unwrap(), expected);
    }

    #[test]
    fn normalized_backward_mirrors_forward(text in unordered_text())
    {
        let mut collator = Collator::root();
        collator.set_normalization(true);

        let mut expected = elements(&collator, &text);
        expected.reverse();

        let mut iter = collator.element_iter(&text);
        prop_assert_eq!(backward(&mut iter).unwrap(), expected);
    }

    #[test]
    fn normalized_offsets_are_monotonic(text in unordered_text())
    {
        let mut collator = Collator::root();
        collator.set_normalization(true);

        let mut iter = collator.element_iter(&text);
        let offsets = forward_offsets(&mut iter).unwrap();

        prop_assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
        prop_assert_eq!(iter.offset(), text.len());

        iter.reset();
        let offsets = backward_offsets(&mut iter).unwrap();

        prop_assert!(offsets.windows(2).all(|w| w[0] >= w[1]));
        prop_assert!(offsets.iter().all(|&o| o <= text.len()));
        prop_assert_eq!(iter.offset(), 0);
    }

    #[test]
    fn normalization_keeps_canonical_equivalents_equal(text in unordered_text())
    {
        use unicode_normalization::UnicodeNormalization;

        let mut collator = Collator::root();
        collator.set_normalization(true);

        let nfd: String = text.nfd().collect();
        prop_assert_eq!(elements(&collator, &text), elements(&collator, &nfd));
    }
}

/// текст с метками в произвольном порядке: сегменты, не прошедшие проверку FCD
fn unordered_text() -> impl Strategy<Value = String>
{
    "[aeuxǘé\u{300}\u{301}\u{308}\u{325}\u{f73} 中]{0,10}"
}

#[test]
fn misordered_marks_need_normalization()
{
    let mut collator = Collator::root();
    let ordered = "a\u{325}\u{301}";
    let unordered = "a\u{301}\u{325}";

    assert_ne!(elements(&collator, ordered), elements(&collator, unordered));

    collator.set_normalization(true);
    assert_eq!(elements(&collator, ordered), elements(&collator, unordered));
    assert_eq!(collator.compare(ordered, unordered), core::cmp::Ordering::Equal);
}

#[test]
fn tibetan_vowel_around_decomposed_letter()
{
    let mut collator = Collator::root();
    collator.set_normalization(true);

    let text = "\u{f73}ǘ\u{f73}";
    let mut expected = elements(&collator, text);
    expected.reverse();

    let mut iter = collator.element_iter(text);
    assert_eq!(backward(&mut iter).unwrap(), expected);
    assert_eq!(expected.len(), 7);
}
