//! Return-value contract classifier.
//!
//! The watched function signals errors through its return value. Rules are
//! applied in strict precedence order; the first match wins:
//! void cast, direct handler/logger argument, statement position, returned,
//! branch condition, assignment hand-off to the tracker, then `used_other`.

use tree_sitter::Node;

use crate::ast::{
    callee_name, declared_identifier, has_static_or_extern, is_expression, is_statement_position,
    is_void_cast, statement_in_block, top_wrapper, unwrap_parens, VarBinding,
};
use crate::classify::usage::as_local_var;
use crate::classify::{branch_for_call, tracker, Outcome, UnitContext};
use crate::classify::types::HandlingCategory;

pub(crate) fn classify_return_value<'t>(call: Node<'t>, ctx: &UnitContext) -> Outcome<'t> {
    if is_top_level_void_cast(call, ctx.source) {
        return Outcome::of(HandlingCategory::CastToVoid);
    }

    if let Some(category) = direct_handler_logger_use(call, ctx) {
        return Outcome::of(category);
    }

    if is_statement_position(call) {
        return Outcome::of(HandlingCategory::Ignored);
    }

    if is_returned_call(call) {
        return Outcome::of(HandlingCategory::Propagated);
    }

    if let Some(stmt) = statement_in_block(call) {
        if let Some(category) = branch_for_call(stmt, call) {
            return Outcome::of(category);
        }
    }

    if let Some((binding, stmt)) = return_value_assignment(call, ctx.source) {
        if let Some(outcome) = tracker::track(stmt, binding, call, true, ctx) {
            return outcome;
        }
    }

    Outcome::of(HandlingCategory::UsedOther)
}

/// The topmost wrapper above the call is an explicit cast to `void`.
fn is_top_level_void_cast(call: Node, source: &[u8]) -> bool {
    let top = unwrap_parens(top_wrapper(call));
    is_void_cast(top, source)
}

/// The nearest enclosing call taking this call as an argument, when it is
/// a registered handler or logger. Handler wins over logger.
fn direct_handler_logger_use(call: Node, ctx: &UnitContext) -> Option<HandlingCategory> {
    let enclosing = enclosing_call_with_argument(call)?;
    let name = callee_name(enclosing, ctx.source)?;
    if ctx.registry.is_handler(name) {
        return Some(HandlingCategory::PassedToHandlerFn);
    }
    if ctx.registry.is_logger(name) {
        return Some(HandlingCategory::LoggedNotHandled);
    }
    None
}

fn enclosing_call_with_argument(call: Node) -> Option<Node> {
    let mut current = call;
    while let Some(parent) = current.parent() {
        if parent.kind() == "call_expression" {
            let in_arguments = parent
                .child_by_field_name("arguments")
                .is_some_and(|arguments| arguments.id() == current.id());
            if in_arguments {
                return Some(parent);
            }
        }
        current = parent;
    }
    None
}

/// The first statement-kind ancestor above the expression chain is a
/// return statement.
fn is_returned_call(call: Node) -> bool {
    let mut current = call;
    while let Some(parent) = current.parent() {
        if is_expression(parent) {
            current = parent;
            continue;
        }
        return parent.kind() == "return_statement";
    }
    false
}

/// The call's value initializes or is assigned to a local variable, with
/// the whole declaration or assignment forming the enclosing statement.
fn return_value_assignment<'t>(
    call: Node<'t>,
    source: &[u8],
) -> Option<(VarBinding<'t>, Node<'t>)> {
    let top = top_wrapper(call);
    let parent = top.parent()?;
    match parent.kind() {
        "init_declarator" => {
            let value = parent.child_by_field_name("value")?;
            if value.id() != top.id() {
                return None;
            }
            let declaration = parent.parent()?;
            if declaration.kind() != "declaration" || has_static_or_extern(declaration) {
                return None;
            }
            let ident = declared_identifier(parent)?;
            let stmt = statement_in_block(call)?;
            if stmt.id() != declaration.id() {
                return None;
            }
            Some((VarBinding { ident }, stmt))
        }
        "assignment_expression" => {
            if parent.child_by_field_name("operator")?.kind() != "=" {
                return None;
            }
            let right = parent.child_by_field_name("right")?;
            if right.id() != top.id() {
                return None;
            }
            let binding = as_local_var(parent.child_by_field_name("left")?, source)?;
            let stmt = statement_in_block(call)?;
            if stmt.kind() != "expression_statement" {
                return None;
            }
            Some((binding, stmt))
        }
        _ => None,
    }
}
