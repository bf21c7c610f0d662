//! Field path resolution.
//!
//! A [`FieldPath`] is a dotted path such as `address.country`. Resolving it
//! walks records (through [`Filterable`]) and maps, one segment at a time.
//!
//! Resolution distinguishes three outcomes:
//!
//! - `Ok(Some(value))`: the path was followed to the end.
//! - `Ok(None)`: the path does not exist for this element (unknown field,
//!   missing map key, nil intermediate value). This is a non-match.
//! - `Err(_)`: the path is wrong for the data (descending into a scalar,
//!   addressing a private field, a nil element).
//!
//! Flattened members promote their fields, or their keys for maps, to the
//! enclosing record.

use crate::error::{FilterError, Result};
use crate::traits::Filterable;
use crate::value::Value;

/// A parsed dotted field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// Parses a dotted path. The empty path selects the element itself.
    pub fn parse(raw: &str) -> Self {
        let segments = if raw.is_empty() {
            Vec::new()
        } else {
            raw.split('.').map(str::to_string).collect()
        };
        FieldPath {
            raw: raw.to_string(),
            segments,
        }
    }

    /// Returns `true` if this path selects the element itself.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the path as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Resolves this path against `root`.
    ///
    /// `tag` names the alias source used to match record fields; see
    /// [`FieldDef::query_name`](crate::FieldDef::query_name).
    ///
    /// A nil `root` is an error for every path, the root selector included.
    pub fn resolve<'a>(&self, root: &Value<'a>, tag: Option<&str>) -> Result<Option<Value<'a>>> {
        if root.is_nil() {
            return Err(FilterError::NilElement {
                path: self.raw.clone(),
            });
        }
        if self.is_root() {
            return Ok(Some(root.clone()));
        }

        let mut current = root.clone();
        for segment in &self.segments {
            let next = match current {
                Value::Record(record) => self.lookup_field(record, segment, tag)?,
                Value::Map(entries) => entries
                    .into_iter()
                    .find(|(key, _)| *key == segment.as_str())
                    .map(|(_, value)| value),
                Value::Nil => None,
                other => {
                    return Err(FilterError::ScalarTraversal {
                        path: self.raw.clone(),
                        segment: segment.clone(),
                        found: other.kind_name(),
                    })
                }
            };
            match next {
                Some(value) => current = value,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// Finds a field of `record` by its query name.
    ///
    /// Direct fields take precedence over fields promoted from flattened
    /// members, which are searched in declaration order. A flattened map
    /// promotes its keys.
    fn lookup_field<'a>(
        &self,
        record: &'a dyn Filterable,
        segment: &str,
        tag: Option<&str>,
    ) -> Result<Option<Value<'a>>> {
        let fields = record.fields();

        for (index, def) in fields.iter().enumerate() {
            if def.query_name(tag) != Some(segment) {
                continue;
            }
            if !def.exported {
                return Err(FilterError::PrivateField {
                    path: self.raw.clone(),
                    field: segment.to_string(),
                });
            }
            return Ok(Some(record.field(index)));
        }

        for (index, def) in fields.iter().enumerate() {
            if !def.flatten {
                continue;
            }
            let promoted = match record.field(index) {
                Value::Record(inner) => self.lookup_field(inner, segment, tag)?,
                Value::Map(entries) => entries
                    .into_iter()
                    .find(|(key, _)| *key == segment)
                    .map(|(_, value)| value),
                _ => None,
            };
            if promoted.is_some() {
                return Ok(promoted);
            }
        }

        Ok(None)
    }
}

impl From<&str> for FieldPath {
    fn from(raw: &str) -> Self {
        FieldPath::parse(raw)
    }
}
