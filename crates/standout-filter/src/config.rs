//! Processor configuration.
//!
//! [`FilterConfig`] holds the settings of a [`Processor`](crate::Processor).
//! It can be built in code or deserialized as part of a service's own
//! configuration file:
//!
//! ```
//! use standout_filter::FilterConfig;
//!
//! let config: FilterConfig = serde_json::from_str(r#"{"field_name_tag": "json", "max_rules": 8}"#).unwrap();
//! assert_eq!(config.field_name_tag.as_deref(), Some("json"));
//! assert_eq!(config.max_rules, 8);
//! assert_eq!(config.query_key, "filter");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, Result};

/// Upper bound for the number of results a processor may return.
pub const MAX_RESULTS: usize = i32::MAX as usize;

/// Default maximum number of results returned by `apply`.
pub const DEFAULT_MAX_RESULTS: usize = MAX_RESULTS;

/// Default maximum number of rules in a rule set.
pub const DEFAULT_MAX_RULES: usize = 3;

/// Default query parameter carrying the encoded rules.
pub const DEFAULT_QUERY_KEY: &str = "filter";

/// Settings of a processor. Read-only once the processor is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Alias source used to match path segments (e.g. `"json"`); `None`
    /// matches declared field names.
    pub field_name_tag: Option<String>,
    /// Query parameter read by `parse_query`.
    pub query_key: String,
    /// Maximum number of rules across all groups.
    pub max_rules: usize,
    /// Maximum number of results returned, and maximum window length.
    pub max_results: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            field_name_tag: None,
            query_key: DEFAULT_QUERY_KEY.to_string(),
            max_rules: DEFAULT_MAX_RULES,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl FilterConfig {
    /// Checks every setting, returning the first rejected one.
    pub fn validate(&self) -> Result<()> {
        if matches!(self.field_name_tag.as_deref(), Some("")) {
            return Err(invalid("field_name_tag", "must not be empty"));
        }
        if self.query_key.is_empty() {
            return Err(invalid("query_key", "must not be empty"));
        }
        if self.max_rules == 0 {
            return Err(invalid("max_rules", "must be at least 1"));
        }
        if !(1..=MAX_RESULTS).contains(&self.max_results) {
            return Err(invalid(
                "max_results",
                format!("must be between 1 and {MAX_RESULTS}"),
            ));
        }
        Ok(())
    }
}

fn invalid(option: &'static str, reason: impl Into<String>) -> FilterError {
    FilterError::InvalidConfig {
        option,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn defaults_are_valid() {
        let config = FilterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.query_key, "filter");
        assert_eq!(config.max_rules, 3);
        assert_eq!(config.max_results, MAX_RESULTS);
        assert_eq!(config.field_name_tag, None);
    }

    #[test]
    fn rejects_bad_settings() {
        let cases = [
            FilterConfig {
                max_rules: 0,
                ..FilterConfig::default()
            },
            FilterConfig {
                max_results: 0,
                ..FilterConfig::default()
            },
            FilterConfig {
                max_results: MAX_RESULTS + 1,
                ..FilterConfig::default()
            },
            FilterConfig {
                query_key: String::new(),
                ..FilterConfig::default()
            },
            FilterConfig {
                field_name_tag: Some(String::new()),
                ..FilterConfig::default()
            },
        ];
        for config in cases {
            let err = config.validate().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Construction, "{config:?}");
        }
    }

    #[test]
    fn deserialize_partial() {
        let config: FilterConfig = serde_json::from_str(r#"{"max_results": 50}"#).unwrap();
        assert_eq!(config.max_results, 50);
        assert_eq!(config.max_rules, DEFAULT_MAX_RULES);

        assert!(serde_json::from_str::<FilterConfig>(r#"{"unknown": 1}"#).is_err());
    }
}
