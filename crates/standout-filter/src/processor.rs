//! Rule processor: compiles rule sets and applies them to collections.
//!
//! A [`Processor`] is built once from a [`FilterConfig`] and reused for many
//! calls. Each call compiles the rules into a [`Matcher`], scans the
//! collection once, and keeps the matching elements in place.
//!
//! The match logic is:
//!
//! ```text
//! match = group_1 ∧ group_2 ∧ … ∧ group_n        (empty set  = true)
//! group = rule_1 ∨ rule_2 ∨ … ∨ rule_m           (empty group = false)
//! ```
//!
//! # Example
//!
//! ```
//! use standout_filter::{Op, Processor, Rule};
//!
//! let processor = Processor::default();
//! let mut ages = vec![40, 41, 42, 43, 44];
//! let rules = vec![vec![Rule::new("", Op::GreaterOrEqual, 42)]];
//!
//! let selection = processor.apply(&rules, &mut ages).unwrap();
//! assert_eq!(ages, [42, 43, 44]);
//! assert_eq!(selection.total, 3);
//! ```

use crate::config::FilterConfig;
use crate::error::{FilterError, Result};
use crate::evaluator::Evaluator;
use crate::path::FieldPath;
use crate::rule::{parse_json, RuleGroup, RuleSet};
use crate::traits::AsValue;
use crate::value::Value;

/// Outcome of an apply call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    /// Number of elements left in the collection.
    pub len: usize,
    /// Number of elements that matched, before any cap or window.
    pub total: usize,
}

/// Applies rule sets to collections.
///
/// The processor only holds its configuration, so it is `Send + Sync` and
/// can be shared between threads. Each call needs its own collection.
#[derive(Debug, Clone, Default)]
pub struct Processor {
    config: FilterConfig,
}

impl Processor {
    /// Creates a processor from a validated configuration.
    pub fn new(config: FilterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Processor { config })
    }

    /// Starts a builder with the default configuration.
    pub fn builder() -> ProcessorBuilder {
        ProcessorBuilder::default()
    }

    /// Returns the configuration of this processor.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    // ========================================================================
    // Parsing
    // ========================================================================

    /// Decodes a rule set from JSON.
    pub fn parse(&self, input: &str) -> Result<RuleSet> {
        parse_json(input)
    }

    /// Extracts and decodes the rule set from decoded query parameters.
    ///
    /// The first value of the configured key is used. An absent or empty
    /// parameter yields an empty rule set, which matches everything.
    ///
    /// ```
    /// use standout_filter::Processor;
    ///
    /// let processor = Processor::builder().query_key("q").build().unwrap();
    /// let params = [("q", r#"[[{"field":"age","type":"==","value":42}]]"#)];
    /// assert_eq!(processor.parse_query(params).unwrap().len(), 1);
    /// assert!(processor.parse_query([("filter", "[")]).unwrap().is_empty());
    /// ```
    pub fn parse_query<I, K, V>(&self, params: I) -> Result<RuleSet>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let raw = params
            .into_iter()
            .find(|(key, _)| key.as_ref() == self.config.query_key);
        match raw {
            Some((_, value)) if !value.as_ref().is_empty() => parse_json(value.as_ref()),
            _ => Ok(RuleSet::new()),
        }
    }

    // ========================================================================
    // Compilation
    // ========================================================================

    /// Validates a rule set and builds its evaluators.
    ///
    /// Fails if the rule count exceeds `max_rules` or if any rule has an
    /// invalid operator or reference value.
    pub fn compile(&self, rules: &[RuleGroup]) -> Result<Matcher> {
        let count: usize = rules.iter().map(Vec::len).sum();
        if count > self.config.max_rules {
            return Err(FilterError::TooManyRules {
                count,
                max: self.config.max_rules,
            });
        }

        let groups = rules
            .iter()
            .map(|group| {
                group
                    .iter()
                    .map(|rule| {
                        Ok(CompiledRule {
                            path: FieldPath::parse(&rule.field),
                            evaluator: Evaluator::new(&rule.op, &rule.value)?,
                        })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(groups = groups.len(), rules = count, "compiled filter rules");

        Ok(Matcher {
            groups,
            tag: self.config.field_name_tag.clone(),
        })
    }

    // ========================================================================
    // Application
    // ========================================================================

    /// Keeps the matching elements of `items`, in their original order.
    ///
    /// At most `max_results` elements are kept; `total` still counts every
    /// match. On error `items` is left untouched.
    pub fn apply<T: AsValue>(&self, rules: &[RuleGroup], items: &mut Vec<T>) -> Result<Selection> {
        let matcher = self.compile(rules)?;
        let mask = matcher.scan(items.as_slice())?;
        let selection = retain_window(items, &mask, 0, self.config.max_results);
        tracing::debug!(total = selection.total, len = selection.len, "applied filter");
        Ok(selection)
    }

    /// Keeps the window `[offset, offset + length)` of the matching elements.
    ///
    /// `length` must be between 1 and `max_results`. A window past the last
    /// match is clamped, possibly to nothing; `total` always reports the full
    /// match count.
    pub fn apply_subset<T: AsValue>(
        &self,
        rules: &[RuleGroup],
        items: &mut Vec<T>,
        offset: usize,
        length: usize,
    ) -> Result<Selection> {
        if length == 0 || length > self.config.max_results {
            return Err(FilterError::InvalidWindow {
                length,
                max: self.config.max_results,
            });
        }

        let matcher = self.compile(rules)?;
        let mask = matcher.scan(items.as_slice())?;
        let selection = retain_window(items, &mask, offset, length);
        tracing::debug!(
            total = selection.total,
            len = selection.len,
            offset,
            length,
            "applied filter window"
        );
        Ok(selection)
    }

    /// Applies rules to a JSON array in place.
    ///
    /// Fails with [`FilterError::NotACollection`] if `value` is not an array.
    pub fn apply_json(&self, rules: &[RuleGroup], value: &mut serde_json::Value) -> Result<Selection> {
        self.apply(rules, json_items(value)?)
    }

    /// Applies rules to a JSON array in place, keeping one window.
    pub fn apply_subset_json(
        &self,
        rules: &[RuleGroup],
        value: &mut serde_json::Value,
        offset: usize,
        length: usize,
    ) -> Result<Selection> {
        self.apply_subset(rules, json_items(value)?, offset, length)
    }
}

fn json_items(value: &mut serde_json::Value) -> Result<&mut Vec<serde_json::Value>> {
    match value {
        serde_json::Value::Array(items) => Ok(items),
        other => Err(FilterError::NotACollection {
            found: json_kind(other),
        }),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Keeps the matches whose ordinal falls in `[offset, offset + length)`.
fn retain_window<T>(items: &mut Vec<T>, mask: &[bool], offset: usize, length: usize) -> Selection {
    let end = offset.saturating_add(length);
    let mut index = 0;
    let mut ordinal = 0;
    items.retain(|_| {
        let keep = if mask[index] {
            let in_window = (offset..end).contains(&ordinal);
            ordinal += 1;
            in_window
        } else {
            false
        };
        index += 1;
        keep
    });
    Selection {
        len: items.len(),
        total: ordinal,
    }
}

/// A compiled rule set, ready to test elements.
#[derive(Debug, Clone)]
pub struct Matcher {
    groups: Vec<Vec<CompiledRule>>,
    tag: Option<String>,
}

#[derive(Debug, Clone)]
struct CompiledRule {
    path: FieldPath,
    evaluator: Evaluator,
}

impl CompiledRule {
    fn matches(&self, root: &Value<'_>, tag: Option<&str>) -> Result<bool> {
        match self.path.resolve(root, tag)? {
            Some(value) => self.evaluator.evaluate(&value),
            None => Ok(false),
        }
    }
}

impl Matcher {
    /// Returns `true` if the item satisfies every group.
    ///
    /// Evaluation stops at the first true rule of a group and at the first
    /// false group.
    pub fn matches<T: AsValue + ?Sized>(&self, item: &T) -> Result<bool> {
        let root = item.as_value();
        let tag = self.tag.as_deref();
        for group in &self.groups {
            let mut any = false;
            for rule in group {
                if rule.matches(&root, tag)? {
                    any = true;
                    break;
                }
            }
            if !any {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Counts the matching items.
    pub fn count<T: AsValue>(&self, items: &[T]) -> Result<usize> {
        let mut count = 0;
        for item in items {
            if self.matches(item)? {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Returns whether each item matches, in order.
    fn scan<T: AsValue>(&self, items: &[T]) -> Result<Vec<bool>> {
        items.iter().map(|item| self.matches(item)).collect()
    }

    /// Returns the number of rules across all groups.
    pub fn rule_count(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }
}

/// Builder for [`Processor`].
///
/// # Example
///
/// ```
/// use standout_filter::Processor;
///
/// let processor = Processor::builder()
///     .field_name_tag("json")
///     .query_key("q")
///     .max_rules(10)
///     .max_results(100)
///     .build()
///     .unwrap();
/// assert_eq!(processor.config().max_rules, 10);
///
/// assert!(Processor::builder().max_results(0).build().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProcessorBuilder {
    config: FilterConfig,
}

impl ProcessorBuilder {
    /// Matches path segments against aliases from this source.
    pub fn field_name_tag(mut self, tag: impl Into<String>) -> Self {
        self.config.field_name_tag = Some(tag.into());
        self
    }

    /// Sets the query parameter read by [`Processor::parse_query`].
    pub fn query_key(mut self, key: impl Into<String>) -> Self {
        self.config.query_key = key.into();
        self
    }

    /// Sets the maximum number of rules across all groups.
    pub fn max_rules(mut self, max: usize) -> Self {
        self.config.max_rules = max;
        self
    }

    /// Sets the maximum number of results and window length.
    pub fn max_results(mut self, max: usize) -> Self {
        self.config.max_results = max;
        self
    }

    /// Validates the configuration and builds the processor.
    pub fn build(self) -> Result<Processor> {
        Processor::new(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::op::Op;
    use crate::rule::{Rule, RuleValue};

    fn always() -> Rule {
        Rule::new("", Op::Regexp, ".*")
    }

    fn never() -> Rule {
        Rule::new("", Op::Regexp, "$a")
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn processor_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Processor>();
        assert_send_sync::<Matcher>();
    }

    #[test]
    fn empty_rule_set_matches_everything() {
        let mut items = vec![41, 42, 43];
        let selection = Processor::default().apply(&[], &mut items).unwrap();
        assert_eq!(items, [41, 42, 43]);
        assert_eq!(selection, Selection { len: 3, total: 3 });
    }

    #[test]
    fn empty_group_matches_nothing() {
        let mut items = vec![41, 42, 43];
        let selection = Processor::default()
            .apply(&[vec![]], &mut items)
            .unwrap();
        assert!(items.is_empty());
        assert_eq!(selection, Selection { len: 0, total: 0 });
    }

    #[test]
    fn truth_table() {
        let processor = Processor::builder().max_rules(4).build().unwrap();
        let cases = [
            (vec![vec![always()], vec![always()]], true),
            (vec![vec![always()], vec![never()]], false),
            (vec![vec![never()], vec![always()]], false),
            (vec![vec![never()], vec![never()]], false),
            (vec![vec![always(), never()]], true),
            (vec![vec![never(), always()]], true),
            (vec![vec![always(), always()]], true),
            (vec![vec![never(), never()]], false),
            (vec![vec![never(), always()], vec![always(), never()]], true),
            (vec![vec![never(), always()], vec![never(), never()]], false),
        ];
        for (rules, expected) in cases {
            let mut items = strings(&["a"]);
            let selection = processor.apply(&rules, &mut items).unwrap();
            assert_eq!(selection.total == 1, expected, "{rules:?}");
            assert_eq!(items.len(), usize::from(expected));
        }
    }

    #[test]
    fn max_results_caps_returned_length() {
        let processor = Processor::builder().max_results(3).build().unwrap();
        let mut items = strings(&["1", "2", "3", "4", "5"]);
        let selection = processor.apply(&[vec![always()]], &mut items).unwrap();
        assert_eq!(items, strings(&["1", "2", "3"]));
        assert_eq!(selection, Selection { len: 3, total: 5 });
    }

    #[test]
    fn too_many_rules() {
        let processor = Processor::builder().max_rules(1).build().unwrap();
        let rules = vec![vec![Rule::new("", Op::Equal, 1), Rule::new("", Op::Equal, 3)]];
        let mut items = vec![1, 2, 3];
        let err = processor.apply(&rules, &mut items).unwrap_err();
        assert!(matches!(err, FilterError::TooManyRules { count: 2, max: 1 }));
        assert_eq!(items, [1, 2, 3]);
    }

    #[test]
    fn missing_type_is_an_unknown_operator() {
        let processor = Processor::default();
        let rules = processor
            .parse(r#"[[{"field": "a", "value": 1}]]"#)
            .unwrap();
        let err = processor.compile(&rules).unwrap_err();
        assert!(matches!(err, FilterError::UnknownOperator(ref tag) if tag.is_empty()));
        assert_eq!(err.kind(), ErrorKind::Construction);
    }

    #[test]
    fn errors_leave_items_untouched() {
        let rules = vec![vec![Rule::new("", Op::Contains, "1")]];
        let mut items = vec![1, 2, 3];
        let err = Processor::default().apply(&rules, &mut items).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Evaluation);
        assert_eq!(items, [1, 2, 3]);
    }

    #[test]
    fn windows() {
        let processor = Processor::default();
        let cases = [
            (0, 5, vec!["1", "2", "3", "4", "5"]),
            (1, 3, vec!["2", "3", "4"]),
            (5, 10, vec![]),
            (3, 10, vec!["4", "5"]),
            (2, 2, vec!["3", "4"]),
            (usize::MAX, 1, vec![]),
        ];
        for (offset, length, expected) in cases {
            let mut items = strings(&["1", "2", "3", "4", "5"]);
            let selection = processor
                .apply_subset(&[vec![always()]], &mut items, offset, length)
                .unwrap();
            assert_eq!(items, strings(&expected), "offset={offset} length={length}");
            assert_eq!(selection.total, 5);
            assert_eq!(selection.len, expected.len());
        }
    }

    #[test]
    fn window_length_is_validated() {
        let processor = Processor::builder().max_results(10).build().unwrap();
        let mut items = vec![1, 2, 3];
        for length in [0, 11] {
            let err = processor
                .apply_subset(&[], &mut items, 0, length)
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Limit);
        }
        assert_eq!(items, [1, 2, 3]);
    }

    #[test]
    fn parse_query_params() {
        let processor = Processor::default();
        let rules = processor
            .parse_query([("filter", r#"[[{"field":"Age","type":"==","value":42}]]"#)])
            .unwrap();
        assert_eq!(rules, vec![vec![Rule::new("Age", Op::Equal, 42.0)]]);

        let empty: [(&str, &str); 0] = [];
        assert!(processor.parse_query(empty).unwrap().is_empty());
        assert!(processor.parse_query([("filter", "")]).unwrap().is_empty());

        let err = processor.parse_query([("filter", "[")]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn parse_query_custom_key() {
        let processor = Processor::builder()
            .query_key("myCustomFilter")
            .build()
            .unwrap();
        let params = vec![
            ("filter".to_string(), "[".to_string()),
            (
                "myCustomFilter".to_string(),
                r#"[[{"field":"Age","type":"==","value":42}]]"#.to_string(),
            ),
        ];
        let rules = processor.parse_query(params).unwrap();
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn json_collections() {
        let processor = Processor::default();
        let rules = vec![vec![Rule::new("age", Op::Greater, 41)]];
        let mut doc = serde_json::json!([{"age": 40}, {"age": 42}, {"name": "x"}]);
        let selection = processor.apply_json(&rules, &mut doc).unwrap();
        assert_eq!(doc, serde_json::json!([{"age": 42}]));
        assert_eq!(selection.total, 1);

        let mut not_array = serde_json::json!({"age": 42});
        let err = processor.apply_json(&rules, &mut not_array).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputShape);
    }

    #[test]
    fn json_nil_element_is_an_error() {
        let rules = vec![vec![Rule::new("Somefield", Op::Equal, "value 1")]];
        let mut doc = serde_json::json!([null]);
        let err = Processor::default().apply_json(&rules, &mut doc).unwrap_err();
        assert!(matches!(err, FilterError::NilElement { .. }));

        let rules = vec![vec![Rule::new("", Op::Equal, RuleValue::Null)]];
        let mut doc = serde_json::json!([1, null]);
        let err = Processor::default().apply_json(&rules, &mut doc).unwrap_err();
        assert!(matches!(err, FilterError::NilElement { .. }));
        assert_eq!(doc, serde_json::json!([1, null]));
    }

    #[test]
    fn matcher_reuse() {
        let matcher = Processor::default()
            .compile(&[vec![Rule::new("", Op::LessOrEqual, 42)]])
            .unwrap();
        assert_eq!(matcher.rule_count(), 1);
        assert!(matcher.matches(&41).unwrap());
        assert!(!matcher.matches(&43).unwrap());
        assert_eq!(matcher.count(&[41, 42, 43]).unwrap(), 2);
    }
}
