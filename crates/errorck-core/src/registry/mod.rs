//! Notable-function registry: the validated mapping from function name to
//! role (watched, handler, logger) that drives the classifiers.

pub mod loader;
pub mod types;

use rustc_hash::FxHashMap;

use crate::errors::ConfigError;

pub use types::{ErrorReporting, FunctionRole};

/// Validated name → role map. Names are unique across all roles.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    roles: FxHashMap<String, FunctionRole>,
}

impl Registry {
    /// Role of a registered name, if any.
    pub fn role(&self, name: &str) -> Option<FunctionRole> {
        self.roles.get(name).copied()
    }

    /// Reporting contract when `name` is a watched function.
    pub fn reporting(&self, name: &str) -> Option<ErrorReporting> {
        self.role(name).and_then(FunctionRole::reporting)
    }

    pub fn is_handler(&self, name: &str) -> bool {
        self.role(name) == Some(FunctionRole::Handler)
    }

    pub fn is_logger(&self, name: &str) -> bool {
        self.role(name) == Some(FunctionRole::Logger)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Insert a name with duplicate detection across every role.
    pub(crate) fn insert(&mut self, name: String, role: FunctionRole) -> Result<(), ConfigError> {
        if self.roles.contains_key(&name) {
            return Err(ConfigError::DuplicateName(name));
        }
        self.roles.insert(name, role);
        Ok(())
    }
}
