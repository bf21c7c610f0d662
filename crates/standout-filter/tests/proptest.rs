//! Property-based tests for the filter processor using proptest.

use proptest::prelude::*;
use standout_filter::{parse_json, to_json, Op, Processor, Rule, RuleGroup, RuleValue};
use standout_filter_macros::Filterable;

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Debug, Clone, PartialEq, Filterable)]
struct TestItem {
    #[filter(tag(json = "v"))]
    pub value: i64,
    #[filter(tag(json = "n"))]
    pub name: String,
    pub active: bool,
}

// Strategy to generate test items
fn test_item_strategy() -> impl Strategy<Value = TestItem> {
    (-1000i64..1000, "[a-z]{1,10}", any::<bool>()).prop_map(|(value, name, active)| TestItem {
        value,
        name,
        active,
    })
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop::sample::select(vec![
        Op::Equal,
        Op::Less,
        Op::LessOrEqual,
        Op::Greater,
        Op::GreaterOrEqual,
    ])
}

fn always() -> Rule {
    Rule::new("", Op::Regexp, ".*")
}

fn never() -> Rule {
    Rule::new("", Op::Regexp, "$a")
}

fn processor() -> Processor {
    Processor::builder().max_rules(16).build().unwrap()
}

fn filtered<T: standout_filter::AsValue + Clone>(rules: &[RuleGroup], items: &[T]) -> Vec<T> {
    let mut items = items.to_vec();
    processor().apply(rules, &mut items).unwrap();
    items
}

fn rule_value_strategy() -> impl Strategy<Value = RuleValue> {
    let leaf = prop_oneof![
        Just(RuleValue::Null),
        any::<bool>().prop_map(RuleValue::Bool),
        (-4000i32..4000).prop_map(|n| RuleValue::Number(f64::from(n) / 4.0)),
        "[a-z ]{0,8}".prop_map(RuleValue::String),
    ];
    leaf.prop_recursive(2, 8, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..3).prop_map(RuleValue::List),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..3).prop_map(RuleValue::Map),
        ]
    })
}

fn rule_strategy() -> impl Strategy<Value = Rule> {
    let tags: Vec<String> = Op::ALL
        .iter()
        .flat_map(|op| [op.as_str().to_string(), op.negated_tag()])
        .collect();
    ("[a-z.]{0,12}", prop::sample::select(tags), rule_value_strategy())
        .prop_map(|(field, tag, value)| Rule::with_tag(field, tag, value))
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Apply never grows the collection and keeps the original order.
    #[test]
    fn apply_keeps_an_ordered_subset(
        items in prop::collection::vec(test_item_strategy(), 0..50),
        op in op_strategy(),
        threshold in -1000i64..1000,
    ) {
        let kept = filtered(&[vec![Rule::new("value", op, threshold)]], &items);
        prop_assert!(kept.len() <= items.len());

        let mut remaining = items.iter();
        for item in &kept {
            prop_assert!(remaining.any(|candidate| candidate == item));
        }
    }

    /// Every kept item satisfies the rule and every dropped item does not.
    #[test]
    fn numeric_rules_agree_with_native_comparisons(
        items in prop::collection::vec(test_item_strategy(), 0..50),
        op in op_strategy(),
        threshold in -1000i64..1000,
    ) {
        let kept = filtered(&[vec![Rule::new("value", op, threshold)]], &items);
        let expected: Vec<_> = items
            .iter()
            .filter(|item| match op {
                Op::Equal => item.value == threshold,
                Op::Less => item.value < threshold,
                Op::LessOrEqual => item.value <= threshold,
                Op::Greater => item.value > threshold,
                _ => item.value >= threshold,
            })
            .cloned()
            .collect();
        prop_assert_eq!(kept, expected);
    }

    /// A rule and its negation partition any collection without missing paths.
    #[test]
    fn negation_partitions(
        items in prop::collection::vec(test_item_strategy(), 0..50),
        op in op_strategy(),
        threshold in -1000i64..1000,
    ) {
        let positive = filtered(&[vec![Rule::new("value", op, threshold)]], &items);
        let negative = filtered(&[vec![Rule::not("value", op, threshold)]], &items);
        prop_assert_eq!(positive.len() + negative.len(), items.len());
    }

    /// The empty rule set is the identity and an empty group absorbs.
    #[test]
    fn absorption_and_identity(
        items in prop::collection::vec(test_item_strategy(), 0..50),
        threshold in -1000i64..1000,
    ) {
        let rule = Rule::new("value", Op::Greater, threshold);

        prop_assert_eq!(filtered(&[], &items), items.clone());
        prop_assert!(filtered(&[vec![]], &items).is_empty());
        prop_assert!(filtered(&[vec![rule.clone()], vec![]], &items).is_empty());
        prop_assert_eq!(
            filtered(&[vec![rule.clone()]], &items),
            filtered(&[vec![rule.clone()], vec![rule]], &items)
        );
    }

    /// Groups combine with AND, rules within a group with OR.
    #[test]
    fn truth_table(a in any::<bool>(), b in any::<bool>(), c in any::<bool>(), d in any::<bool>()) {
        let pick = |flag: bool| if flag { always() } else { never() };
        let rules = vec![vec![pick(a), pick(b)], vec![pick(c), pick(d)]];
        let kept = filtered(&rules, &["x".to_string()]);
        prop_assert_eq!(kept.len() == 1, (a || b) && (c || d));
    }

    /// Applying the same rules twice changes nothing the second time.
    #[test]
    fn apply_is_idempotent(
        items in prop::collection::vec(test_item_strategy(), 0..50),
        needle in "[a-z]{1,2}",
    ) {
        let rules = vec![vec![Rule::new("name", Op::Contains, needle.as_str())]];
        let once = filtered(&rules, &items);
        let twice = filtered(&rules, &once);
        prop_assert_eq!(once, twice);
    }

    /// Addressing a field by alias or by declared name selects the same items.
    #[test]
    fn alias_equivalence(
        items in prop::collection::vec(test_item_strategy(), 0..50),
        prefix in "[a-z]{1,2}",
    ) {
        let by_name = filtered(&[vec![Rule::new("name", Op::HasPrefix, prefix.as_str())]], &items);

        let mut by_alias = items.clone();
        Processor::builder()
            .field_name_tag("json")
            .build()
            .unwrap()
            .apply(&[vec![Rule::new("n", Op::HasPrefix, prefix.as_str())]], &mut by_alias)
            .unwrap();

        prop_assert_eq!(by_name, by_alias);
    }

    /// Windows are slices of the full match list; total ignores the window.
    #[test]
    fn windows_slice_the_matches(
        items in prop::collection::vec(test_item_strategy(), 0..60),
        offset in 0usize..70,
        length in 1usize..30,
    ) {
        let rules = vec![vec![Rule::new("active", Op::Equal, true)]];
        let all = filtered(&rules, &items);

        let mut window = items.clone();
        let selection = processor()
            .apply_subset(&rules, &mut window, offset, length)
            .unwrap();

        let expected: Vec<_> = all.iter().skip(offset).take(length).cloned().collect();
        prop_assert_eq!(selection.total, all.len());
        prop_assert_eq!(selection.len, expected.len());
        prop_assert_eq!(window, expected);
    }

    /// The result cap never drops below min(total, max_results).
    #[test]
    fn max_results_caps(
        items in prop::collection::vec(any::<i32>(), 0..60),
        max_results in 1usize..20,
    ) {
        let processor = Processor::builder().max_results(max_results).build().unwrap();
        let mut kept = items.clone();
        let selection = processor.apply(&[], &mut kept).unwrap();
        prop_assert_eq!(selection.total, items.len());
        prop_assert_eq!(kept.len(), items.len().min(max_results));
        prop_assert_eq!(&kept[..], &items[..kept.len()]);
    }

    /// Encoding and decoding a rule set is lossless.
    #[test]
    fn json_round_trip(
        rules in prop::collection::vec(prop::collection::vec(rule_strategy(), 0..4), 0..4),
    ) {
        let encoded = to_json(&rules).unwrap();
        prop_assert_eq!(parse_json(&encoded).unwrap(), rules);
    }

    /// Random rules never panic: they either compile and evaluate, or fail
    /// with an error.
    #[test]
    fn arbitrary_rules_never_panic(
        items in prop::collection::vec(test_item_strategy(), 0..10),
        rules in prop::collection::vec(prop::collection::vec(rule_strategy(), 0..3), 0..3),
    ) {
        let mut items = items;
        let before = items.clone();
        if processor().apply(&rules, &mut items).is_err() {
            prop_assert_eq!(items, before);
        }
    }
}
