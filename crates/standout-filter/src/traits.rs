//! Value accessor traits.
//!
//! [`AsValue`] turns any supported type into a [`Value`], and [`Filterable`]
//! exposes the named fields of a record so that dotted paths can be resolved
//! against it. Both are usually derived with `#[derive(Filterable)]` from
//! `standout-filter-macros`, but can also be implemented manually.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::Arc;

use crate::value::{Number, Value};

/// Converts a type into a borrowed [`Value`] for rule evaluation.
///
/// Wrapper types (`Option`, `Box`, `Rc`, `Arc`, references) are transparent:
/// they produce the value of what they point to, and `None` produces
/// [`Value::Nil`].
pub trait AsValue {
    /// Returns the runtime value of `self`.
    fn as_value(&self) -> Value<'_>;
}

/// Metadata of a record field, as seen by the path resolver.
///
/// # Example
///
/// ```
/// use standout_filter::FieldDef;
///
/// const NAME: FieldDef = FieldDef::new("name").with_tags(&[("json", "full_name,omitempty")]);
///
/// assert_eq!(NAME.query_name(None), Some("name"));
/// assert_eq!(NAME.query_name(Some("json")), Some("full_name"));
/// assert_eq!(NAME.query_name(Some("xml")), Some("name"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Declared field name.
    pub name: &'static str,
    /// Aliases keyed by source, e.g. `("json", "full_name,omitempty")`.
    pub tags: &'static [(&'static str, &'static str)],
    /// Whether the field may be addressed by rules.
    pub exported: bool,
    /// Whether the field is an embedded member whose fields are promoted.
    pub flatten: bool,
}

impl FieldDef {
    /// Creates an exported, non-flattened field without aliases.
    pub const fn new(name: &'static str) -> Self {
        FieldDef {
            name,
            tags: &[],
            exported: true,
            flatten: false,
        }
    }

    /// Sets the aliases of this field.
    pub const fn with_tags(mut self, tags: &'static [(&'static str, &'static str)]) -> Self {
        self.tags = tags;
        self
    }

    /// Marks this field as not accessible to rules.
    pub const fn private(mut self) -> Self {
        self.exported = false;
        self
    }

    /// Marks this field as an embedded member.
    pub const fn flattened(mut self) -> Self {
        self.flatten = true;
        self
    }

    /// Returns the raw alias of this field for the given source.
    pub fn tag(&self, source: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(key, _)| *key == source)
            .map(|(_, alias)| *alias)
    }

    /// Returns the name rules use to address this field.
    ///
    /// With an alias source, the alias is stripped of any `,`-separated
    /// options. An empty alias name falls back to the declared name, and an
    /// alias of `-` hides the field (returns `None`).
    pub fn query_name(&self, source: Option<&str>) -> Option<&'static str> {
        let Some(alias) = source.and_then(|source| self.tag(source)) else {
            return Some(self.name);
        };
        match alias.split(',').next().unwrap_or_default() {
            "-" => None,
            "" => Some(self.name),
            name => Some(name),
        }
    }
}

/// A record whose named fields can be addressed by rule paths.
///
/// # Manual Implementation
///
/// ```
/// use standout_filter::{AsValue, FieldDef, Filterable, Value};
///
/// struct Task {
///     name: String,
///     priority: u8,
/// }
///
/// impl Filterable for Task {
///     fn fields(&self) -> &'static [FieldDef] {
///         const FIELDS: &[FieldDef] = &[
///             FieldDef::new("name"),
///             FieldDef::new("priority").with_tags(&[("json", "prio")]),
///         ];
///         FIELDS
///     }
///
///     fn field(&self, index: usize) -> Value<'_> {
///         match index {
///             0 => self.name.as_value(),
///             1 => self.priority.as_value(),
///             _ => Value::Nil,
///         }
///     }
/// }
///
/// impl AsValue for Task {
///     fn as_value(&self) -> Value<'_> {
///         Value::Record(self)
///     }
/// }
/// ```
pub trait Filterable {
    /// Returns the field metadata, in declaration order.
    fn fields(&self) -> &'static [FieldDef];

    /// Returns the value of the field at `index` in [`fields`](Self::fields).
    ///
    /// Private fields may return [`Value::Nil`]; the resolver never reads them.
    fn field(&self, index: usize) -> Value<'_>;
}

macro_rules! number_as_value {
    ($($t:ty),*) => {
        $(
            impl AsValue for $t {
                fn as_value(&self) -> Value<'_> {
                    Value::Number(Number::from(*self))
                }
            }
        )*
    };
}

number_as_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl AsValue for bool {
    fn as_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl AsValue for str {
    fn as_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl AsValue for String {
    fn as_value(&self) -> Value<'_> {
        Value::String(self.as_str())
    }
}

impl AsValue for Cow<'_, str> {
    fn as_value(&self) -> Value<'_> {
        Value::String(self.as_ref())
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_value(&self) -> Value<'_> {
        match self {
            Some(inner) => inner.as_value(),
            None => Value::Nil,
        }
    }
}

impl<T: AsValue + ?Sized> AsValue for &T {
    fn as_value(&self) -> Value<'_> {
        (**self).as_value()
    }
}

impl<T: AsValue + ?Sized> AsValue for Box<T> {
    fn as_value(&self) -> Value<'_> {
        (**self).as_value()
    }
}

impl<T: AsValue + ?Sized> AsValue for Rc<T> {
    fn as_value(&self) -> Value<'_> {
        (**self).as_value()
    }
}

impl<T: AsValue + ?Sized> AsValue for Arc<T> {
    fn as_value(&self) -> Value<'_> {
        (**self).as_value()
    }
}

impl<T: AsValue> AsValue for [T] {
    fn as_value(&self) -> Value<'_> {
        Value::List(self.iter().map(AsValue::as_value).collect())
    }
}

impl<T: AsValue, const N: usize> AsValue for [T; N] {
    fn as_value(&self) -> Value<'_> {
        self.as_slice().as_value()
    }
}

impl<T: AsValue> AsValue for Vec<T> {
    fn as_value(&self) -> Value<'_> {
        self.as_slice().as_value()
    }
}

impl<V: AsValue, S: BuildHasher> AsValue for HashMap<String, V, S> {
    fn as_value(&self) -> Value<'_> {
        Value::Map(
            self.iter()
                .map(|(key, value)| (key.as_str(), value.as_value()))
                .collect(),
        )
    }
}

impl<V: AsValue> AsValue for BTreeMap<String, V> {
    fn as_value(&self) -> Value<'_> {
        Value::Map(
            self.iter()
                .map(|(key, value)| (key.as_str(), value.as_value()))
                .collect(),
        )
    }
}

impl AsValue for serde_json::Value {
    fn as_value(&self) -> Value<'_> {
        match self {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(json_number(n)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => items.as_value(),
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_value()))
                    .collect(),
            ),
        }
    }
}

fn json_number(n: &serde_json::Number) -> Number {
    if let Some(i) = n.as_i64() {
        Number::I64(i)
    } else if let Some(u) = n.as_u64() {
        Number::U64(u)
    } else {
        Number::F64(n.as_f64().unwrap_or(f64::NAN))
    }
}

impl<'a> AsValue for Value<'a> {
    fn as_value(&self) -> Value<'_> {
        self.clone()
    }
}
