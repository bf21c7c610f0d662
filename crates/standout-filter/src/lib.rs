//! Filter - Declarative rule-based filtering for in-memory collections.
//!
//! Rules are plain `{field, type, value}` triples, usually decoded from a
//! JSON query parameter. A [`Processor`] compiles them and keeps the matching
//! elements of a collection in place. It supports:
//!
//! - Dotted field paths with per-source aliases (e.g. JSON names)
//! - Equality, ordering, case-folding, substring, prefix, suffix and regex
//!   operators, each negatable with `!`
//! - Rule groups: OR within a group, AND across groups
//! - Result caps and `(offset, length)` windows with total match counts
//!
//! # Quick Start
//!
//! ```rust
//! use standout_filter::{AsValue, FieldDef, Filterable, Processor, Value};
//!
//! // Define your data
//! struct Person {
//!     name: String,
//!     age: u32,
//! }
//!
//! // Describe its fields (or use `#[derive(Filterable)]`)
//! impl Filterable for Person {
//!     fn fields(&self) -> &'static [FieldDef] {
//!         const FIELDS: &[FieldDef] = &[FieldDef::new("name"), FieldDef::new("age")];
//!         FIELDS
//!     }
//!
//!     fn field(&self, index: usize) -> Value<'_> {
//!         match index {
//!             0 => self.name.as_value(),
//!             1 => self.age.as_value(),
//!             _ => Value::Nil,
//!         }
//!     }
//! }
//!
//! impl AsValue for Person {
//!     fn as_value(&self) -> Value<'_> {
//!         Value::Record(self)
//!     }
//! }
//!
//! let mut people = vec![
//!     Person { name: "John Doe".into(), age: 42 },
//!     Person { name: "Jane Roe".into(), age: 35 },
//!     Person { name: "Max Moe".into(), age: 51 },
//! ];
//!
//! let processor = Processor::default();
//! let rules = processor
//!     .parse(r#"[[{"field":"name","type":"$=","value":"oe"}],
//!                [{"field":"age","type":"<","value":50}]]"#)
//!     .unwrap();
//!
//! let selection = processor.apply(&rules, &mut people).unwrap();
//! assert_eq!(selection.total, 2);
//! assert_eq!(people[0].name, "John Doe");
//! assert_eq!(people[1].name, "Jane Roe");
//! ```
//!
//! # Rule Semantics
//!
//! ```text
//! match = group_1 ∧ … ∧ group_n      group = rule_1 ∨ … ∨ rule_m
//! ```
//!
//! - **Empty rule set**: matches every element
//! - **Empty group**: matches no element
//! - **Missing path**: the rule is false, negated or not
//!
//! # Operators
//!
//! | Tag | Meaning | Reference |
//! |-----|---------|-----------|
//! | `==` | Deep equality | any |
//! | `=~` | Case-insensitive equality | string |
//! | `<` `<=` `>` `>=` | Numeric ordering, or length for strings and collections | number |
//! | `regexp` | Regex match | string |
//! | `~=` | Substring | string |
//! | `^=` | Prefix | string |
//! | `$=` | Suffix | string |
//!
//! Any tag prefixed with `!` is negated.

mod coerce;
mod config;
mod error;
mod evaluator;
mod op;
mod path;
mod processor;
mod rule;
mod traits;
mod value;

// Re-export public API
pub use config::{
    FilterConfig, DEFAULT_MAX_RESULTS, DEFAULT_MAX_RULES, DEFAULT_QUERY_KEY, MAX_RESULTS,
};
pub use error::{ErrorKind, FilterError, Result};
pub use evaluator::Evaluator;
pub use op::{Op, NOT_PREFIX};
pub use path::FieldPath;
pub use processor::{Matcher, Processor, ProcessorBuilder, Selection};
pub use rule::{parse_json, to_json, Rule, RuleGroup, RuleSet, RuleValue};
pub use traits::{AsValue, FieldDef, Filterable};
pub use value::{Number, Value};

#[cfg(feature = "derive")]
pub use standout_filter_macros::Filterable;
