//! The per-translation-unit classification engine.
//!
//! Each watched call is classified by an ordered sequence of syntactic
//! predicates; the first match wins. The return-value and errno contracts
//! have their own rule chains, both funneling assigned values into the
//! local-propagation tracker.

pub mod analyzer;
pub mod errno;
pub mod return_value;
pub mod tracker;
pub mod types;
pub mod usage;

use tree_sitter::Node;

use crate::ast::{contains_node, if_has_catchall, switch_has_default};
use crate::registry::Registry;

pub use analyzer::CallClassifier;
pub use types::{AssignedLocation, HandlingCategory, WatchedCall};

/// Per-unit context shared by every rule.
#[derive(Clone, Copy)]
pub(crate) struct UnitContext<'r, 's> {
    pub registry: &'r Registry,
    pub source: &'s [u8],
}

/// Outcome of one rule chain: a category plus the node whose location is
/// reported as the assignment site. The site is populated only for
/// `AssignedNotRead`.
pub(crate) struct Outcome<'t> {
    pub category: HandlingCategory,
    pub assigned: Option<Node<'t>>,
}

impl<'t> Outcome<'t> {
    pub(crate) fn of(category: HandlingCategory) -> Self {
        Self {
            category,
            assigned: None,
        }
    }
}

pub(crate) fn branch_category(has_catchall: bool) -> HandlingCategory {
    if has_catchall {
        HandlingCategory::BranchedWithCatchall
    } else {
        HandlingCategory::BranchedNoCatchall
    }
}

/// Branch category when the statement is an `if`/`switch` whose condition
/// satisfies `pred`.
pub(crate) fn branch_for_stmt<'t>(
    stmt: Node<'t>,
    pred: &mut dyn FnMut(Node<'t>) -> bool,
) -> Option<HandlingCategory> {
    match stmt.kind() {
        "if_statement" => {
            let condition = stmt.child_by_field_name("condition")?;
            pred(condition).then(|| branch_category(if_has_catchall(stmt)))
        }
        "switch_statement" => {
            let condition = stmt.child_by_field_name("condition")?;
            pred(condition).then(|| branch_category(switch_has_default(stmt)))
        }
        _ => None,
    }
}

/// Branch category when the statement's condition contains the given call.
pub(crate) fn branch_for_call<'t>(stmt: Node<'t>, call: Node<'t>) -> Option<HandlingCategory> {
    branch_for_stmt(stmt, &mut |condition| contains_node(condition, call))
}
