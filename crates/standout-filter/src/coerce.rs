//! Value normalization shared by the evaluators.
//!
//! Candidates arrive as [`Value`]s (wrappers already dereferenced), references
//! as [`RuleValue`]s. These helpers bridge the two.

use crate::rule::RuleValue;
use crate::value::Value;

/// Returns the operand an ordering operator compares against its reference.
///
/// Numbers widen to `f64`. Strings, lists and maps yield their length. Nil,
/// bool and record candidates have no ordering operand.
pub(crate) fn ordering_operand(value: &Value<'_>) -> Option<Operand> {
    match value {
        Value::Number(n) => Some(Operand::Number(n.to_f64())),
        other => other.len().map(Operand::Length),
    }
}

/// Left-hand side of an ordering comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Operand {
    Number(f64),
    Length(usize),
}

impl Operand {
    /// Compares this operand with a numeric reference using `cmp`.
    ///
    /// Lengths are compared against the reference truncated to an integer.
    pub(crate) fn compare(self, reference: f64, cmp: fn(f64, f64) -> bool) -> bool {
        match self {
            Operand::Number(n) => cmp(n, reference),
            Operand::Length(len) => cmp(len as f64, reference.trunc()),
        }
    }
}

/// Deep equality between a candidate and a reference value.
///
/// Nil only equals null, numbers compare as `f64`, lists element-wise and
/// maps by key. Any kind mismatch is simply unequal.
pub(crate) fn deep_equal(candidate: &Value<'_>, reference: &RuleValue) -> bool {
    match (candidate, reference) {
        (Value::Nil, RuleValue::Null) => true,
        (Value::Bool(a), RuleValue::Bool(b)) => a == b,
        (Value::Number(a), RuleValue::Number(b)) => a.to_f64() == *b,
        (Value::String(a), RuleValue::String(b)) => *a == b.as_str(),
        (Value::List(items), RuleValue::List(refs)) => {
            items.len() == refs.len()
                && items
                    .iter()
                    .zip(refs)
                    .all(|(item, reference)| deep_equal(item, reference))
        }
        (Value::Map(entries), RuleValue::Map(refs)) => {
            entries.len() == refs.len()
                && entries.iter().all(|(key, value)| {
                    refs.get(*key)
                        .is_some_and(|reference| deep_equal(value, reference))
                })
        }
        _ => false,
    }
}
