//! Classification result types.

use serde::{Deserialize, Serialize};

/// How a watched call's error signal was handled. Every watched call gets
/// exactly one of these; `UsedOther` is the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlingCategory {
    Ignored,
    CastToVoid,
    AssignedNotRead,
    BranchedNoCatchall,
    BranchedWithCatchall,
    Propagated,
    PassedToHandlerFn,
    LoggedNotHandled,
    UsedOther,
}

impl HandlingCategory {
    pub const ALL: [HandlingCategory; 9] = [
        HandlingCategory::Ignored,
        HandlingCategory::CastToVoid,
        HandlingCategory::AssignedNotRead,
        HandlingCategory::BranchedNoCatchall,
        HandlingCategory::BranchedWithCatchall,
        HandlingCategory::Propagated,
        HandlingCategory::PassedToHandlerFn,
        HandlingCategory::LoggedNotHandled,
        HandlingCategory::UsedOther,
    ];

    /// Stable label stored in the sink.
    pub fn as_str(self) -> &'static str {
        match self {
            HandlingCategory::Ignored => "ignored",
            HandlingCategory::CastToVoid => "cast_to_void",
            HandlingCategory::AssignedNotRead => "assigned_not_read",
            HandlingCategory::BranchedNoCatchall => "branched_no_catchall",
            HandlingCategory::BranchedWithCatchall => "branched_with_catchall",
            HandlingCategory::Propagated => "propagated",
            HandlingCategory::PassedToHandlerFn => "passed_to_handler_fn",
            HandlingCategory::LoggedNotHandled => "logged_not_handled",
            HandlingCategory::UsedOther => "used_other",
        }
    }

    pub fn from_str_label(label: &str) -> Option<HandlingCategory> {
        HandlingCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == label)
    }
}

impl std::fmt::Display for HandlingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source location of the final value-bearing expression copied into a
/// local that was never read. Populated only for `AssignedNotRead`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignedLocation {
    pub filename: String,
    pub line: u32,
    pub column: u32,
}

/// One classified watched call: the emission record.
/// Records are unique on (name, filename, line, column, category).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchedCall {
    pub name: String,
    pub filename: String,
    pub line: u32,
    pub column: u32,
    pub category: HandlingCategory,
    pub assigned: Option<AssignedLocation>,
}
