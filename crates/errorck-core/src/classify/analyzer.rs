//! Per-translation-unit call walker.
//!
//! Visits every call expression with a direct identifier callee, dispatches
//! registered watched calls to the matching classifier, and collects one
//! emission record per call. Classification never fails; `used_other` is
//! the fallback the rule chains bottom out in.

use tracing::trace;
use tree_sitter::{Query, QueryCursor};

use crate::ast::{node_text, resolve_local, start_location};
use crate::classify::errno::classify_errno;
use crate::classify::return_value::classify_return_value;
use crate::classify::types::{AssignedLocation, WatchedCall};
use crate::classify::UnitContext;
use crate::parsers::ParsedUnit;
use crate::registry::{ErrorReporting, Registry};

/// Classifies every watched call in a parsed translation unit.
pub struct CallClassifier<'r> {
    registry: &'r Registry,
}

impl<'r> CallClassifier<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Classify all watched calls in the unit, in tree order.
    ///
    /// `query` is the call-site query compiled for the unit's language
    /// (see `SourceParser::call_query`).
    pub fn classify_unit(
        &self,
        unit: &ParsedUnit,
        source: &str,
        query: &Query,
    ) -> Vec<WatchedCall> {
        let source_bytes = source.as_bytes();
        let root = unit.tree.root_node();
        let ctx = UnitContext {
            registry: self.registry,
            source: source_bytes,
        };

        let mut calls = Vec::new();
        let mut cursor = QueryCursor::new();
        let matches = cursor.matches(query, root, source_bytes);

        for m in matches {
            let mut call_node = None;
            let mut callee = "";

            for capture in m.captures {
                let capture_name = query.capture_names()[capture.index as usize];
                match capture_name {
                    "call" => call_node = Some(capture.node),
                    "callee" => callee = node_text(capture.node, source_bytes),
                    _ => {}
                }
            }

            let Some(call) = call_node else { continue };
            let Some(reporting) = self.registry.reporting(callee) else {
                continue;
            };
            // A callee naming a local (e.g. a function pointer variable)
            // is not a watched function.
            if resolve_local(call, callee, source_bytes).is_some() {
                trace!(callee, "skipping indirect call through local");
                continue;
            }

            let outcome = match reporting {
                ErrorReporting::ReturnValue => classify_return_value(call, &ctx),
                ErrorReporting::Errno => classify_errno(call, &ctx),
            };

            let (line, column) = start_location(call);
            let assigned = outcome.assigned.map(|site| {
                let (line, column) = start_location(site);
                AssignedLocation {
                    filename: unit.path.clone(),
                    line,
                    column,
                }
            });

            trace!(callee, line, column, category = %outcome.category, "classified watched call");
            calls.push(WatchedCall {
                name: callee.to_string(),
                filename: unit.path.clone(),
                line,
                column,
                category: outcome.category,
                assigned,
            });
        }

        calls
    }
}
