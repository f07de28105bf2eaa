//! Errno contract classifier.
//!
//! The call's return value is not the error signal; the error arrives
//! out-of-band through the thread-local `errno`. Analysis is confined to
//! the call statement and the immediately following statement of the
//! enclosing compound block.

use tree_sitter::Node;

use crate::ast::{
    contains_errno_reference, declared_identifier, first_expr_child, has_static_or_extern,
    is_errno_expr, next_statement, statement_in_block, unwrap_parens, VarBinding,
};
use crate::classify::types::HandlingCategory;
use crate::classify::usage::{as_local_var, contains_return_of_errno, scan_usage, UsageTarget};
use crate::classify::{branch_for_stmt, tracker, Outcome, UnitContext};

pub(crate) fn classify_errno<'t>(call: Node<'t>, ctx: &UnitContext) -> Outcome<'t> {
    let Some(stmt) = statement_in_block(call) else {
        return Outcome::of(HandlingCategory::Ignored);
    };
    let next = next_statement(stmt);

    // Errno checks are adjacent to the call by contract; anything further
    // away is treated as ignoring the error.
    let referenced = contains_errno_reference(stmt, ctx.source)
        || next.is_some_and(|n| contains_errno_reference(n, ctx.source));
    if !referenced {
        return Outcome::of(HandlingCategory::Ignored);
    }

    let mut logged = false;
    if let Some(category) = analyze_errno_statement(stmt, ctx, &mut logged) {
        return Outcome::of(category);
    }
    if let Some(next) = next {
        if let Some(category) = analyze_errno_statement(next, ctx, &mut logged) {
            return Outcome::of(category);
        }
    }

    if let Some(outcome) = track_errno_assignment(stmt, next, ctx) {
        return outcome;
    }

    if logged {
        return Outcome::of(HandlingCategory::LoggedNotHandled);
    }
    Outcome::of(HandlingCategory::UsedOther)
}

/// One statement's direct handling of errno, in precedence order:
/// handler argument, returned, branch condition, assignment into a local
/// (deferred to the tracker), then other uses.
fn analyze_errno_statement(
    stmt: Node,
    ctx: &UnitContext,
    logged: &mut bool,
) -> Option<HandlingCategory> {
    let usage = scan_usage(stmt, UsageTarget::Errno, ctx.registry, ctx.source);
    if usage.handler {
        return Some(HandlingCategory::PassedToHandlerFn);
    }

    if contains_return_of_errno(stmt, ctx.source) {
        return Some(HandlingCategory::Propagated);
    }

    if let Some(category) =
        branch_for_stmt(stmt, &mut |cond| contains_errno_reference(cond, ctx.source))
    {
        return Some(category);
    }

    if errno_assignment_in_statement(stmt, ctx.source).is_some() {
        if usage.logger {
            *logged = true;
        }
        return None;
    }

    if usage.other {
        return Some(HandlingCategory::UsedOther);
    }
    if usage.logger {
        *logged = true;
    }
    None
}

/// The statement copies errno verbatim into a local: a declaration with an
/// errno initializer, or a plain assignment whose right-hand side is the
/// errno expression.
fn errno_assignment_in_statement<'t>(
    stmt: Node<'t>,
    source: &[u8],
) -> Option<(VarBinding<'t>, Node<'t>)> {
    if stmt.kind() == "declaration" && !has_static_or_extern(stmt) {
        let mut cursor = stmt.walk();
        for declarator in stmt.children_by_field_name("declarator", &mut cursor) {
            if declarator.kind() != "init_declarator" {
                continue;
            }
            let Some(value) = declarator.child_by_field_name("value") else {
                continue;
            };
            let unwrapped = unwrap_parens(value);
            if !is_errno_expr(unwrapped, source) {
                continue;
            }
            let Some(ident) = declared_identifier(declarator) else {
                continue;
            };
            return Some((VarBinding { ident }, unwrapped));
        }
        return None;
    }

    if stmt.kind() == "expression_statement" {
        let expr = first_expr_child(stmt)?;
        if expr.kind() != "assignment_expression"
            || expr.child_by_field_name("operator")?.kind() != "="
        {
            return None;
        }
        let binding = as_local_var(expr.child_by_field_name("left")?, source)?;
        let rhs = unwrap_parens(expr.child_by_field_name("right")?);
        if !is_errno_expr(rhs, source) {
            return None;
        }
        return Some((binding, rhs));
    }

    None
}

/// Find the errno-to-local copy in the call statement or the next one and
/// hand off to the tracker. Explicit void casts of the copied value do not
/// count as `cast_to_void` under the errno contract.
fn track_errno_assignment<'t>(
    stmt: Node<'t>,
    next: Option<Node<'t>>,
    ctx: &UnitContext,
) -> Option<Outcome<'t>> {
    let (assignment_stmt, binding, site) =
        if let Some((binding, site)) = errno_assignment_in_statement(stmt, ctx.source) {
            (stmt, binding, site)
        } else {
            let next = next?;
            let (binding, site) = errno_assignment_in_statement(next, ctx.source)?;
            (next, binding, site)
        };

    tracker::track(assignment_stmt, binding, site, false, ctx)
}
