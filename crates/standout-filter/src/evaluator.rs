//! Evaluators: rule predicates bound to a validated reference value.
//!
//! An [`Evaluator`] is built once per rule and then applied to every element.
//! Reference values are checked at construction (a regex is compiled, a
//! number is extracted); candidate types are only known per element and are
//! checked lazily in [`Evaluator::evaluate`].

use regex::Regex;

use crate::coerce::{deep_equal, ordering_operand};
use crate::error::{FilterError, Result};
use crate::op::Op;
use crate::rule::RuleValue;
use crate::value::Value;

/// A predicate bound to one reference value.
///
/// # Example
///
/// ```
/// use standout_filter::{Evaluator, RuleValue, Value, Number};
///
/// let at_most = Evaluator::new("<=", &RuleValue::Number(42.0)).unwrap();
/// assert!(at_most.evaluate(&Value::Number(Number::I64(41))).unwrap());
/// assert!(!at_most.evaluate(&Value::Number(Number::I64(43))).unwrap());
///
/// assert!(Evaluator::new("<=", &RuleValue::from("x")).is_err());
/// ```
#[derive(Debug, Clone)]
pub enum Evaluator {
    /// Deep equality with any reference.
    Equal(RuleValue),
    /// Case-insensitive equality under simple case folding; holds the folded
    /// reference.
    EqualFold(String),
    /// Ordering comparison against a numeric reference.
    Ordering(Op, f64),
    /// Regular expression match.
    Regexp(Regex),
    /// Substring match.
    Contains(String),
    /// Prefix match.
    HasPrefix(String),
    /// Suffix match.
    HasSuffix(String),
    /// Negation of another evaluator.
    Not(Box<Evaluator>),
}

impl Evaluator {
    /// Builds an evaluator from an operator tag and a reference value.
    ///
    /// Fails on unknown tags, non-numeric references for ordering operators,
    /// non-string references for string operators, and invalid patterns.
    pub fn new(tag: &str, reference: &RuleValue) -> Result<Self> {
        let (negated, op) = Op::parse_tag(tag)?;
        let evaluator = Evaluator::for_op(op, reference)?;
        Ok(if negated {
            Evaluator::Not(Box::new(evaluator))
        } else {
            evaluator
        })
    }

    fn for_op(op: Op, reference: &RuleValue) -> Result<Self> {
        let evaluator = match op {
            Op::Equal => Evaluator::Equal(reference.clone()),
            Op::Less | Op::LessOrEqual | Op::Greater | Op::GreaterOrEqual => {
                let n = reference
                    .as_f64()
                    .ok_or_else(|| invalid_reference(op, "number", reference))?;
                Evaluator::Ordering(op, n)
            }
            Op::EqualFold => Evaluator::EqualFold(fold_case(text_reference(op, reference)?)),
            Op::Regexp => Evaluator::Regexp(Regex::new(text_reference(op, reference)?)?),
            Op::Contains => Evaluator::Contains(text_reference(op, reference)?.to_string()),
            Op::HasPrefix => Evaluator::HasPrefix(text_reference(op, reference)?.to_string()),
            Op::HasSuffix => Evaluator::HasSuffix(text_reference(op, reference)?.to_string()),
        };
        Ok(evaluator)
    }

    /// Returns the base operator of this evaluator.
    pub fn op(&self) -> Op {
        match self {
            Evaluator::Equal(_) => Op::Equal,
            Evaluator::EqualFold(_) => Op::EqualFold,
            Evaluator::Ordering(op, _) => *op,
            Evaluator::Regexp(_) => Op::Regexp,
            Evaluator::Contains(_) => Op::Contains,
            Evaluator::HasPrefix(_) => Op::HasPrefix,
            Evaluator::HasSuffix(_) => Op::HasSuffix,
            Evaluator::Not(inner) => inner.op(),
        }
    }

    /// Returns `true` if the candidate satisfies this predicate.
    ///
    /// A nil candidate never satisfies a positive predicate (except `== null`).
    /// String operators other than `regexp` fail with
    /// [`FilterError::NotText`] on non-textual candidates.
    pub fn evaluate(&self, candidate: &Value<'_>) -> Result<bool> {
        match self {
            Evaluator::Equal(reference) => Ok(deep_equal(candidate, reference)),
            Evaluator::Ordering(op, reference) => Ok(ordering_operand(candidate)
                .is_some_and(|operand| operand.compare(*reference, comparator(*op)))),
            Evaluator::Regexp(regex) => Ok(candidate.as_str().is_some_and(|s| regex.is_match(s))),
            Evaluator::EqualFold(reference) => {
                self.with_text(candidate, |s| fold_case(s) == *reference)
            }
            Evaluator::Contains(reference) => {
                self.with_text(candidate, |s| s.contains(reference.as_str()))
            }
            Evaluator::HasPrefix(reference) => {
                self.with_text(candidate, |s| s.starts_with(reference.as_str()))
            }
            Evaluator::HasSuffix(reference) => {
                self.with_text(candidate, |s| s.ends_with(reference.as_str()))
            }
            Evaluator::Not(inner) => inner.evaluate(candidate).map(|matched| !matched),
        }
    }

    fn with_text(&self, candidate: &Value<'_>, test: impl FnOnce(&str) -> bool) -> Result<bool> {
        match candidate {
            Value::String(s) => Ok(test(s)),
            Value::Nil => Ok(false),
            other => Err(FilterError::NotText {
                op: self.op(),
                found: other.kind_name(),
            }),
        }
    }
}

fn comparator(op: Op) -> fn(f64, f64) -> bool {
    match op {
        Op::Less => |a, b| a < b,
        Op::LessOrEqual => |a, b| a <= b,
        Op::Greater => |a, b| a > b,
        _ => |a, b| a >= b,
    }
}

fn text_reference(op: Op, reference: &RuleValue) -> Result<&str> {
    reference
        .as_str()
        .ok_or_else(|| invalid_reference(op, "string", reference))
}

/// Maps every character to one representative of its case-folding orbit, so
/// `Σ`, `σ` and `ς` all fold to `σ`. Mappings that expand to several
/// characters (`ß` to `SS`) are not applied.
fn fold_case(s: &str) -> String {
    s.chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    // Turkic dotted and dotless i have no simple folding.
    if matches!(c, 'ı' | 'İ') {
        return c;
    }
    let upper = single(c.to_uppercase()).unwrap_or(c);
    single(upper.to_lowercase()).unwrap_or(upper)
}

fn single(mut chars: impl Iterator<Item = char>) -> Option<char> {
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

fn invalid_reference(op: Op, expected: &'static str, reference: &RuleValue) -> FilterError {
    FilterError::InvalidReference {
        op,
        expected,
        found: reference.kind_name(),
    }
}
