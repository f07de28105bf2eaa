//! Notable-functions JSON loader.
//!
//! The file is a JSON array; each element is an object with a non-empty
//! `name` and exactly one of `reporting` ("return_value" | "errno") or
//! `type` ("handler" | "logger").

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use super::{FunctionRole, Registry};
use crate::errors::ConfigError;

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    reporting: Option<String>,
    #[serde(default, rename = "type")]
    role: Option<String>,
}

impl Registry {
    /// Load and validate a notable-functions file.
    pub fn from_file(path: &Path) -> Result<Registry, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Registry::from_json(&contents)
    }

    /// Parse and validate notable-functions JSON.
    pub fn from_json(json: &str) -> Result<Registry, ConfigError> {
        let parsed: Value =
            serde_json::from_str(json).map_err(|e| ConfigError::InvalidJson(e.to_string()))?;
        let entries = parsed.as_array().ok_or(ConfigError::NotAnArray)?;

        let mut registry = Registry::default();
        for (index, entry) in entries.iter().enumerate() {
            if !entry.is_object() {
                return Err(invalid(index, "must be an object"));
            }
            let raw: RawEntry = serde_json::from_value(entry.clone())
                .map_err(|e| invalid(index, &format!("is malformed: {e}")))?;

            let name = match raw.name {
                Some(name) if !name.is_empty() => name,
                _ => return Err(invalid(index, "must have a non-empty \"name\"")),
            };

            let role = resolve_role(index, raw.reporting.as_deref(), raw.role.as_deref())?;
            registry.insert(name, role)?;
        }

        tracing::debug!(functions = registry.len(), "loaded notable functions");
        Ok(registry)
    }
}

fn resolve_role(
    index: usize,
    reporting: Option<&str>,
    role: Option<&str>,
) -> Result<FunctionRole, ConfigError> {
    if let Some(role) = role {
        if reporting.is_some() {
            return Err(invalid(
                index,
                "must not have a \"reporting\" field when using type \"handler\" or \"logger\"",
            ));
        }
        return match role {
            "handler" => Ok(FunctionRole::Handler),
            "logger" => Ok(FunctionRole::Logger),
            other => Err(invalid(index, &format!("has unsupported type \"{other}\""))),
        };
    }

    match reporting {
        Some("return_value") => Ok(FunctionRole::WatchedReturnValue),
        Some("errno") => Ok(FunctionRole::WatchedErrno),
        Some(other) => Err(invalid(
            index,
            &format!("has unsupported reporting type \"{other}\""),
        )),
        None => Err(invalid(index, "must have a \"reporting\" field")),
    }
}

fn invalid(index: usize, message: &str) -> ConfigError {
    ConfigError::InvalidEntry {
        index,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ErrorReporting;

    #[test]
    fn loads_all_four_roles() {
        let registry = Registry::from_json(
            r#"[
                {"name": "strtoull", "reporting": "errno"},
                {"name": "malloc", "reporting": "return_value"},
                {"name": "handle", "type": "handler"},
                {"name": "log_error", "type": "logger"}
            ]"#,
        )
        .unwrap();

        assert_eq!(registry.reporting("strtoull"), Some(ErrorReporting::Errno));
        assert_eq!(registry.reporting("malloc"), Some(ErrorReporting::ReturnValue));
        assert!(registry.is_handler("handle"));
        assert!(registry.is_logger("log_error"));
        assert_eq!(registry.role("unknown"), None);
    }

    #[test]
    fn rejects_duplicate_names_across_roles() {
        let err = Registry::from_json(
            r#"[
                {"name": "handle", "type": "handler"},
                {"name": "handle", "reporting": "errno"}
            ]"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateName(name) if name == "handle"));
    }

    #[test]
    fn rejects_reporting_and_type_together() {
        let err = Registry::from_json(
            r#"[{"name": "f", "reporting": "errno", "type": "logger"}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEntry { index: 0, .. }));
    }

    #[test]
    fn rejects_unknown_reporting_value() {
        let err =
            Registry::from_json(r#"[{"name": "f", "reporting": "exceptions"}]"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEntry { index: 0, .. }));
    }

    #[test]
    fn rejects_missing_name() {
        let err = Registry::from_json(r#"[{"reporting": "errno"}]"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEntry { index: 0, .. }));
    }

    #[test]
    fn rejects_non_array_document() {
        let err = Registry::from_json(r#"{"name": "f"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::NotAnArray));
    }
}
