//! Rule data model and its JSON encoding.
//!
//! A [`Rule`] is one `{field, type, value}` predicate. Rules are grouped into
//! a [`RuleGroup`] (OR) and groups into a [`RuleSet`] (AND):
//!
//! ```text
//! [
//!   [ {"field": "name", "type": "==", "value": "doe"},
//!     {"field": "age",  "type": "<=", "value": 42} ],
//!   [ {"field": "address.country", "type": "regexp", "value": "^EN$|^FR$"} ]
//! ]
//! ```
//!
//! reads as `(name == "doe" OR age <= 42) AND address.country =~ /^EN$|^FR$/`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::op::Op;

/// OR-combined list of rules. An empty group never matches.
pub type RuleGroup = Vec<Rule>;

/// AND-combined list of rule groups. An empty set matches everything.
pub type RuleSet = Vec<RuleGroup>;

/// A single filter predicate.
///
/// # Example
///
/// ```
/// use standout_filter::{Op, Rule, RuleValue};
///
/// let rule = Rule::new("address.country", Op::Equal, "FR");
/// assert_eq!(rule.op, "==");
/// assert_eq!(rule.value, RuleValue::String("FR".into()));
///
/// let negated = Rule::not("name", Op::Contains, "test");
/// assert_eq!(negated.op, "!~=");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Dotted path of the field to compare; empty selects the element itself.
    #[serde(default)]
    pub field: String,
    /// Operator tag, optionally negated with `!`. A missing tag decodes as
    /// empty and is rejected when the rule is compiled.
    #[serde(rename = "type", default)]
    pub op: String,
    /// Reference value.
    #[serde(default)]
    pub value: RuleValue,
}

impl Rule {
    /// Creates a new rule.
    pub fn new(field: impl Into<String>, op: Op, value: impl Into<RuleValue>) -> Self {
        Rule::with_tag(field, op.as_str(), value)
    }

    /// Creates a new negated rule.
    pub fn not(field: impl Into<String>, op: Op, value: impl Into<RuleValue>) -> Self {
        Rule::with_tag(field, op.negated_tag(), value)
    }

    /// Creates a new rule from a raw operator tag.
    ///
    /// The tag is validated when the rule is compiled, not here.
    pub fn with_tag(
        field: impl Into<String>,
        tag: impl Into<String>,
        value: impl Into<RuleValue>,
    ) -> Self {
        Rule {
            field: field.into(),
            op: tag.into(),
            value: value.into(),
        }
    }
}

/// Owned reference value of a rule.
///
/// Numbers are always stored as `f64`, whatever their source type, so a
/// decoded `42` and a constructed `42u8` are the same value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    /// `null`.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(f64),
    /// String value.
    String(String),
    /// List of values.
    List(Vec<RuleValue>),
    /// String-keyed map of values.
    Map(BTreeMap<String, RuleValue>),
}

impl RuleValue {
    /// Returns a short name of the value kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            RuleValue::Null => "null",
            RuleValue::Bool(_) => "bool",
            RuleValue::Number(_) => "number",
            RuleValue::String(_) => "string",
            RuleValue::List(_) => "list",
            RuleValue::Map(_) => "map",
        }
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RuleValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RuleValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<String> for RuleValue {
    fn from(s: String) -> Self {
        RuleValue::String(s)
    }
}

impl From<&str> for RuleValue {
    fn from(s: &str) -> Self {
        RuleValue::String(s.to_string())
    }
}

impl From<bool> for RuleValue {
    fn from(b: bool) -> Self {
        RuleValue::Bool(b)
    }
}

impl<T: Into<RuleValue>> From<Option<T>> for RuleValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(RuleValue::Null, Into::into)
    }
}

impl<T: Into<RuleValue>> From<Vec<T>> for RuleValue {
    fn from(items: Vec<T>) -> Self {
        RuleValue::List(items.into_iter().map(Into::into).collect())
    }
}

macro_rules! rule_value_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for RuleValue {
                fn from(n: $t) -> Self {
                    RuleValue::Number(n as f64)
                }
            }
        )*
    };
}

rule_value_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// Decodes a rule set from its JSON representation.
///
/// # Example
///
/// ```
/// use standout_filter::{parse_json, Op, Rule};
///
/// let rules = parse_json(r#"[[{"field": "age", "type": ">=", "value": 42}]]"#).unwrap();
/// assert_eq!(rules, vec![vec![Rule::new("age", Op::GreaterOrEqual, 42)]]);
/// ```
pub fn parse_json(input: &str) -> Result<RuleSet> {
    let rules: RuleSet = serde_json::from_str(input)?;
    tracing::trace!(groups = rules.len(), "decoded filter rules");
    Ok(rules)
}

/// Encodes a rule set to its JSON representation.
pub fn to_json(rules: &[RuleGroup]) -> Result<String> {
    Ok(serde_json::to_string(rules)?)
}
