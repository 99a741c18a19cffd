use core::cmp::Ordering::{self, *};

use proptest::prelude::*;
use rstest::rstest;
use unicode_collation_tests::*;
use unicode_collator::{
    AlternateHandling, CaseFirst, Collate, CollationError, Collator, CollatorOptions, ReorderCode,
    Strength,
};

#[rstest]
#[case(Strength::Primary, "a", "b", Less)]
#[case(Strength::Primary, "a", "á", Equal)]
#[case(Strength::Primary, "a", "A", Equal)]
#[case(Strength::Secondary, "a", "á", Less)]
#[case(Strength::Secondary, "a", "A", Equal)]
#[case(Strength::Tertiary, "a", "A", Less)]
#[case(Strength::Tertiary, "ab", "a-b", Greater)]
#[case(Strength::Tertiary, "Straße", "Strasse", Greater)]
#[case(Strength::Tertiary, "æ", "ae", Greater)]
#[case(Strength::Tertiary, "resume", "résumé", Less)]
#[case(Strength::Tertiary, "a\u{301}", "á", Equal)]
#[case(Strength::Tertiary, "a\u{200B}", "a", Equal)]
#[case(Strength::Identical, "a\u{200B}", "a", Greater)]
#[case(Strength::Identical, "a\u{301}", "á", Equal)]
#[case(Strength::Tertiary, "z", "α", Less)]
#[case(Strength::Tertiary, "α", "я", Less)]
#[case(Strength::Tertiary, "9", "a", Less)]
fn root_order(
    #[case] strength: Strength,
    #[case] left: &str,
    #[case] right: &str,
    #[case] expected: Ordering,
)
{
    let collator = collator(strength);

    assert_eq!(collator.compare(left, right), expected);
    assert_eq!(collator.compare(right, left), expected.reverse());
    assert_eq!(collator.sort_key(left).cmp(&collator.sort_key(right)), expected);
}

#[test]
fn numeric_digits()
{
    let mut collator = Collator::root();

    assert_eq!(collator.compare("2", "100"), Greater);
    assert_eq!(collator.compare("a10", "a9"), Less);

    collator.set_numeric(true);

    assert_eq!(collator.compare("2", "100"), Less);
    assert_eq!(collator.compare("a10", "a9"), Greater);
    assert_eq!(collator.compare("007", "7"), Equal);
    assert_eq!(collator.sort_key("2").cmp(&collator.sort_key("100")), Less);
}

#[test]
fn shifted_punctuation()
{
    let mut collator = Collator::root();
    collator.set_alternate(AlternateHandling::Shifted);

    assert_eq!(collator.compare("ab", "a-b"), Equal);
    assert_eq!(collator.compare("a b", "a-b"), Equal);

    collator.set_strength(Strength::Quaternary);

    assert_eq!(collator.compare("a-b", "ab"), Less);
    assert_eq!(collator.sort_key("a-b").cmp(&collator.sort_key("ab")), Less);
}

#[test]
fn backward_secondary()
{
    let mut collator = Collator::root();

    assert_eq!(collator.compare("coté", "côte"), Less);

    collator.set_backward_secondary(true);

    assert_eq!(collator.compare("coté", "côte"), Greater);
    assert_eq!(collator.sort_key("coté").cmp(&collator.sort_key("côte")), Greater);
}

#[test]
fn case_first_and_level()
{
    let mut collator = Collator::root();

    collator.set_case_first(CaseFirst::UpperFirst);
    assert_eq!(collator.compare("A", "a"), Less);

    collator.set_case_first(CaseFirst::LowerFirst);
    assert_eq!(collator.compare("a", "A"), Less);

    let mut collator = collator_with(CollatorOptions {
        strength: Strength::Primary,
        case_level: true,
        ..Default::default()
    });

    assert_eq!(collator.compare("a", "á"), Equal);
    assert_eq!(collator.compare("a", "A"), Less);

    collator.set_case_level(false);
    assert_eq!(collator.compare("a", "A"), Equal);
}

#[test]
fn reordered_scripts()
{
    let mut collator = Collator::root();

    assert_eq!(collator.compare("α", "a"), Greater);

    collator.set_reorder_codes(&[ReorderCode::Greek]).unwrap();

    assert_eq!(collator.reorder_codes(), &[ReorderCode::Greek]);
    assert_eq!(collator.compare("α", "a"), Less);
    assert_eq!(collator.sort_key("α").cmp(&collator.sort_key("a")), Less);

    collator.set_reorder_codes(&[ReorderCode::Default]).unwrap();
    assert_eq!(collator.compare("α", "a"), Greater);

    assert!(matches!(
        collator.set_reorder_codes(&[ReorderCode::Greek, ReorderCode::Greek]),
        Err(CollationError::InvalidReorder(_))
    ));
}

#[test]
fn scandinavian_letters_after_z()
{
    let collator = Collator::for_locale("sv").unwrap();

    assert_eq!(collator.compare("z", "å"), Less);
    assert_eq!(collator.compare("å", "ä"), Less);
    assert_eq!(collator.compare("ä", "ö"), Less);
    assert_eq!(Collator::root().compare("z", "å"), Greater);
}

#[test]
fn utf16_matches_utf8()
{
    let collator = Collator::root();
    let words = ["", "a", "A", "ä", "中文", "가", "a-b", "Straße", "ǆ"];

    for left in words {
        for right in words {
            let l: Vec<u16> = left.encode_utf16().collect();
            let r: Vec<u16> = right.encode_utf16().collect();

            assert_eq!(collator.compare_utf16(&l, &r), collator.compare(left, right));
            assert_eq!(collator.sort_key_utf16(&l), collator.sort_key(left));
        }
    }
}

#[test]
fn frozen_matches_collator()
{
    let collator = collator(Strength::Secondary);
    let frozen = collator.clone().freeze();

    for (left, right) in [("a", "A"), ("a", "á"), ("b", "a")] {
        assert_eq!(frozen.compare(left, right), collator.compare(left, right));
        assert_eq!(frozen.sort_key(left), collator.sort_key(left));
    }

    assert_eq!(frozen.options(), collator.options());
    assert_eq!(frozen.thaw().options(), collator.options());
}

#[test]
fn sorted_list()
{
    let collator = Collator::root();
    let mut words = vec!["peach", "Péché", "péché", "pêche", "pêché", "peach-pie", "Peach"];

    words.sort_by(|a, b| collator.compare(a, b));

    let mut by_key = words.clone();
    by_key.sort_by_key(|word| collator.sort_key(word));

    assert_eq!(words, by_key);
    assert_eq!(words[0], "peach");
    assert_eq!(words[1], "Peach");
}

fn collator_with(options: CollatorOptions) -> Collator
{
    let mut collator = Collator::root();
    collator.set_options(options);

    collator
}

fn strength() -> impl Strategy<Value = Strength>
{
    prop_oneof![
        Just(Strength::Primary),
        Just(Strength::Secondary),
        Just(Strength::Tertiary),
        Just(Strength::Quaternary),
    ]
}

fn word() -> impl Strategy<Value = String>
{
    "[abcABCáàäæßø \\-.,1-3]{0,6}"
}

proptest! {
    #[test]
    fn compare_is_antisymmetric(a in word(), b in word(), strength in strength())
    {
        let collator = collator(strength);

        prop_assert_eq!(collator.compare(&a, &a), Equal);
        prop_assert_eq!(collator.compare(&a, &b), collator.compare(&b, &a).reverse());
    }

    #[test]
    fn compare_is_transitive(a in word(), b in word(), c in word(), strength in strength())
    {
        let collator = collator(strength);
        let mut words = [a, b, c];

        words.sort_by(|x, y| collator.compare(x, y));

        prop_assert_ne!(collator.compare(&words[0], &words[1]), Greater);
        prop_assert_ne!(collator.compare(&words[1], &words[2]), Greater);
        prop_assert_ne!(collator.compare(&words[0], &words[2]), Greater);
    }

    #[test]
    fn sort_key_agrees(a in word(), b in word(), strength in strength(), shifted in any::<bool>())
    {
        let collator = collator_with(CollatorOptions {
            strength,
            alternate: match shifted {
                true => AlternateHandling::Shifted,
                false => AlternateHandling::NonIgnorable,
            },
            ..Default::default()
        });

        prop_assert_eq!(
            collator.sort_key(&a).cmp(&collator.sort_key(&b)),
            collator.compare(&a, &b)
        );
    }

    #[test]
    fn stronger_keeps_order(a in word(), b in word())
    {
        let strengths = [Strength::Primary, Strength::Secondary, Strength::Tertiary, Strength::Quaternary];

        for (i, &weaker) in strengths.iter().enumerate() {
            let order = collator(weaker).compare(&a, &b);

            if order == Equal {
                continue;
            }

            for &stronger in &strengths[i + 1 ..] {
                prop_assert_eq!(collator(stronger).compare(&a, &b), order);
            }
        }
    }
}
