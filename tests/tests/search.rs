use proptest::prelude::*;
use rstest::rstest;
use unicode_collation_tests::*;
use unicode_collator::{
    BreakIterator, Collate, CollationError, Collator, ElementComparison, GraphemeBreaker,
    StringSearch, Strength, WordBreaker,
};

#[rstest]
#[case(Strength::Tertiary, "ab", "xabyab", &[(1, 2), (4, 2)])]
#[case(Strength::Tertiary, "Ab", "xabyab", &[])]
#[case(Strength::Secondary, "Ab", "xabyab", &[(1, 2), (4, 2)])]
#[case(Strength::Secondary, "e", "café", &[])]
#[case(Strength::Primary, "e", "café", &[(3, 2)])]
#[case(Strength::Primary, "strasse", "Straße", &[(0, 7)])]
#[case(Strength::Tertiary, "中", "中文中", &[(0, 3), (6, 3)])]
#[case(Strength::Tertiary, "b", "a\u{300}b\u{300}b", &[(6, 1)])]
#[case(Strength::Tertiary, "é", "éé", &[(0, 2), (2, 2)])]
#[case(Strength::Tertiary, "ab", "a\u{200B}b ab", &[(0, 5), (6, 2)])]
#[case(Strength::Identical, "ab", "a\u{200B}b ab", &[(6, 2)])]
fn forward_matches(
    #[case] strength: Strength,
    #[case] pattern: &str,
    #[case] text: &str,
    #[case] expected: &[(usize, usize)],
)
{
    let collator = collator(strength);
    let mut search = StringSearch::new(pattern, text, &collator, None).unwrap();

    assert_eq!(matches(&mut search).unwrap(), expected);

    let mut backward = matches_backward(&mut search).unwrap();
    backward.reverse();

    assert_eq!(backward, expected);
}

#[test]
fn canonical_marks()
{
    let collator = Collator::root();
    let mut search = StringSearch::new("a\u{300}", "a\u{325}\u{300}", &collator, None).unwrap();

    assert_eq!(search.first().unwrap(), None);

    search.set_canonical(true);

    assert!(search.is_canonical());
    assert_eq!(search.first().unwrap(), Some(0));
    assert_eq!(search.matched_length(), 5);
    assert_eq!(search.matched_text(), Some("a\u{325}\u{300}"));
}

#[test]
fn whole_words()
{
    let collator = Collator::root();
    let text = "cat at bat at";
    let breaker: Box<dyn BreakIterator> = Box::new(WordBreaker::new(text));
    let mut search = StringSearch::new("at", text, &collator, Some(breaker)).unwrap();

    assert_eq!(matches(&mut search).unwrap(), [(4, 2), (11, 2)]);

    search.set_break_iterator(None);
    assert_eq!(matches(&mut search).unwrap().len(), 4);
}

#[test]
fn base_weight_wildcards()
{
    let collator = Collator::root();
    let mut search = StringSearch::new("a", "A á a", &collator, None).unwrap();

    assert_eq!(matches(&mut search).unwrap(), [(5, 1)]);

    search.set_element_comparison(ElementComparison::PatternBaseWeightIsWildcard);
    assert_eq!(search.element_comparison(), ElementComparison::PatternBaseWeightIsWildcard);
    assert_eq!(matches(&mut search).unwrap(), [(0, 1), (2, 2), (5, 1)]);

    // общий вес в тексте не совпадает с особым весом образца
    let mut search = StringSearch::new("A", "a A", &collator, None).unwrap();
    search.set_element_comparison(ElementComparison::PatternBaseWeightIsWildcard);
    assert_eq!(matches(&mut search).unwrap(), [(2, 1)]);

    search.set_element_comparison(ElementComparison::AnyBaseWeightIsWildcard);
    assert_eq!(matches(&mut search).unwrap(), [(0, 1), (2, 1)]);
}

#[test]
fn navigation()
{
    let collator = Collator::root();
    let mut search = StringSearch::new("ab", "ab ab ab", &collator, None).unwrap();

    assert_eq!(search.following(1).unwrap(), Some(3));
    assert_eq!(search.matched_text(), Some("ab"));
    assert_eq!(search.next().unwrap(), Some(6));
    assert_eq!(search.next().unwrap(), None);
    assert_eq!(search.matched_start(), None);
    assert_eq!(search.offset(), 8);

    assert_eq!(search.preceding(6).unwrap(), Some(3));
    assert_eq!(search.previous().unwrap(), Some(0));
    assert_eq!(search.previous().unwrap(), None);
    assert_eq!(search.offset(), 0);

    search.set_offset(4).unwrap();
    assert_eq!(search.next().unwrap(), Some(6));

    search.reset();
    assert_eq!(search.offset(), 0);
    assert_eq!(search.next().unwrap(), Some(0));
    assert_eq!(search.previous().unwrap(), Some(0));
}

#[test]
fn replace_pattern_text_and_collator()
{
    let root = Collator::root();
    let primary = collator(Strength::Primary);
    let mut search = StringSearch::new("a", "banana", &root, None).unwrap();

    assert_eq!(matches(&mut search).unwrap().len(), 3);

    search.set_pattern("an").unwrap();
    assert_eq!(search.pattern(), "an");
    assert_eq!(matches(&mut search).unwrap(), [(1, 2), (3, 2)]);

    search.set_text("BANANA").unwrap();
    assert_eq!(search.text(), "BANANA");
    assert!(matches(&mut search).unwrap().is_empty());

    search.set_collator(&primary).unwrap();
    assert_eq!(matches(&mut search).unwrap(), [(1, 2), (3, 2)]);

    assert_eq!(search.set_pattern(""), Err(CollationError::EmptyPattern));
    assert_eq!(search.set_text(""), Err(CollationError::EmptyText));
    assert!(matches!(
        search.set_offset(100),
        Err(CollationError::OffsetOutOfRange { offset: 100, len: 6 })
    ));
}

#[test]
fn overlapping_both_directions()
{
    let collator = Collator::root();
    let mut search = StringSearch::new("aa", "aaaa", &collator, None).unwrap();

    assert_eq!(matches(&mut search).unwrap(), [(0, 2), (2, 2)]);

    search.set_overlapping(true);
    assert!(search.is_overlapping());
    assert_eq!(matches(&mut search).unwrap(), [(0, 2), (1, 2), (2, 2)]);
    assert_eq!(matches_backward(&mut search).unwrap(), [(2, 2), (1, 2), (0, 2)]);
}

#[test]
fn frozen_collator_search()
{
    let frozen = collator(Strength::Primary).freeze();
    let mut search = StringSearch::new("o", "Öl und Ol", &frozen, None).unwrap();

    assert_eq!(matches(&mut search).unwrap(), [(0, 2), (8, 1)]);
}

proptest! {
    #[test]
    fn matches_are_equal_and_bounded(
        text in "[abAB á\u{300}]{1,12}",
        pattern in "[ab]{1,3}",
        strength in prop_oneof![Just(Strength::Primary), Just(Strength::Secondary), Just(Strength::Tertiary)],
    )
    {
        let collator = collator(strength);
        let characters = GraphemeBreaker::new(&text);
        let mut search = StringSearch::new(&pattern, &text, &collator, None).unwrap();

        for (start, length) in matches(&mut search).unwrap() {
            prop_assert!(characters.is_boundary(start));
            prop_assert!(characters.is_boundary(start + length));
            prop_assert!(collator.equals(&pattern, &text[start .. start + length]));
        }
    }
}
