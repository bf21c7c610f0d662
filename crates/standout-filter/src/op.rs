//! Filter operators.
//!
//! The [`Op`] enum is the closed vocabulary of comparison operators. Each
//! operator has a wire tag (the `"type"` of a rule); any tag may carry the
//! [`NOT_PREFIX`] to negate the result.

use std::fmt;
use std::str::FromStr;

use crate::error::FilterError;

/// Prefix that negates any operator tag, e.g. `!==` or `!~=`.
pub const NOT_PREFIX: &str = "!";

/// Comparison operator of a rule.
///
/// Operators are grouped by the reference value they accept:
/// - **Any**: `Equal`
/// - **String**: `EqualFold`, `Contains`, `HasPrefix`, `HasSuffix`, `Regexp`
/// - **Number**: `Less`, `LessOrEqual`, `Greater`, `GreaterOrEqual`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Deep equality (`==`).
    Equal,
    /// Case-insensitive string equality (`=~`).
    EqualFold,
    /// Less than (`<`).
    Less,
    /// Less than or equal (`<=`).
    LessOrEqual,
    /// Greater than (`>`).
    Greater,
    /// Greater than or equal (`>=`).
    GreaterOrEqual,
    /// Regular expression match (`regexp`).
    Regexp,
    /// Substring match (`~=`).
    Contains,
    /// String starts with prefix (`^=`).
    HasPrefix,
    /// String ends with suffix (`$=`).
    HasSuffix,
}

impl Op {
    /// All operators, in tag order.
    pub const ALL: [Op; 10] = [
        Op::Equal,
        Op::EqualFold,
        Op::Less,
        Op::LessOrEqual,
        Op::Greater,
        Op::GreaterOrEqual,
        Op::Regexp,
        Op::Contains,
        Op::HasPrefix,
        Op::HasSuffix,
    ];

    /// Returns the wire tag of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Equal => "==",
            Op::EqualFold => "=~",
            Op::Less => "<",
            Op::LessOrEqual => "<=",
            Op::Greater => ">",
            Op::GreaterOrEqual => ">=",
            Op::Regexp => "regexp",
            Op::Contains => "~=",
            Op::HasPrefix => "^=",
            Op::HasSuffix => "$=",
        }
    }

    /// Returns the negated wire tag of this operator.
    pub fn negated_tag(self) -> String {
        format!("{NOT_PREFIX}{}", self.as_str())
    }

    /// Returns `true` if this operator needs a numeric reference value.
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            Op::Less | Op::LessOrEqual | Op::Greater | Op::GreaterOrEqual
        )
    }

    /// Returns `true` if this operator needs a string reference value.
    pub fn is_textual(self) -> bool {
        matches!(
            self,
            Op::EqualFold | Op::Regexp | Op::Contains | Op::HasPrefix | Op::HasSuffix
        )
    }

    /// Splits a tag into its negation flag and base operator.
    ///
    /// Only a single negation prefix is accepted.
    pub fn parse_tag(tag: &str) -> Result<(bool, Op), FilterError> {
        let (negated, base) = match tag.strip_prefix(NOT_PREFIX) {
            Some(rest) => (true, rest),
            None => (false, tag),
        };
        Op::ALL
            .into_iter()
            .find(|op| op.as_str() == base)
            .map(|op| (negated, op))
            .ok_or_else(|| FilterError::UnknownOperator(tag.to_string()))
    }
}

impl FromStr for Op {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Op::parse_tag(s)? {
            (false, op) => Ok(op),
            (true, _) => Err(FilterError::UnknownOperator(s.to_string())),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
