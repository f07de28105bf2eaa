//! Registry types.

use serde::{Deserialize, Serialize};

/// How a watched function reports failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorReporting {
    /// The error signal is the call's return value.
    ReturnValue,
    /// The error signal is communicated out-of-band via `errno`.
    Errno,
}

/// Role of a registered function name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionRole {
    WatchedReturnValue,
    WatchedErrno,
    /// Receiving the error value terminates analysis as handled.
    Handler,
    /// Receiving the error value only marks it as logged.
    Logger,
}

impl FunctionRole {
    /// Reporting contract for watched roles, `None` for handler/logger.
    pub fn reporting(self) -> Option<ErrorReporting> {
        match self {
            FunctionRole::WatchedReturnValue => Some(ErrorReporting::ReturnValue),
            FunctionRole::WatchedErrno => Some(ErrorReporting::Errno),
            FunctionRole::Handler | FunctionRole::Logger => None,
        }
    }
}
