//! Local-propagation tracker.
//!
//! Given a local holding the error value, walks forward through the
//! sibling statements of the enclosing compound block and classifies the
//! first non-trivial use. Copy-assignments retarget the walk to the new
//! local; logging never terminates the walk.

use tree_sitter::Node;

use crate::ast::{
    block_statements, declared_identifier, first_expr_child, has_static_or_extern, is_void_cast,
    unwrap_parens, VarBinding,
};
use crate::classify::types::HandlingCategory;
use crate::classify::usage::{
    as_local_var, contains_return_of_var, contains_var_reference, direct_var_reference,
    scan_usage, UsageTarget,
};
use crate::classify::{branch_for_stmt, Outcome, UnitContext};

/// How one statement uses the tracked variable.
enum StatementUse<'t> {
    None,
    Logged,
    /// Copied verbatim into another local; retarget the walk.
    PropagatedValue {
        var: VarBinding<'t>,
        site: Node<'t>,
    },
    /// Overwritten without reading the old value.
    Killed,
    BranchedNoCatchall,
    BranchedWithCatchall,
    PassedToHandlerFn,
    Returned,
    CastToVoid,
    UsedOther,
}

/// Walk the block forward from `start_stmt`, tracking `var`.
///
/// `site` is the value-bearing expression reported when the value turns
/// out to be unread. `allow_cast_to_void` distinguishes the return-value
/// contract (an explicit void cast of the local is `cast_to_void`) from
/// the errno contract (it is `used_other`).
pub(crate) fn track<'t>(
    start_stmt: Node<'t>,
    var: VarBinding<'t>,
    site: Node<'t>,
    allow_cast_to_void: bool,
    ctx: &UnitContext,
) -> Option<Outcome<'t>> {
    // The walk is local and linear on purpose; no dataflow across blocks.
    // TODO: Track uses across control flow so a value read on only one
    // branch is not misclassified as unread.
    let block = start_stmt.parent()?;
    if block.kind() != "compound_statement" {
        return None;
    }

    let mut current_var = var;
    let mut current_site = site;
    let mut logged = false;
    let mut found = false;

    for stmt in block_statements(block) {
        if !found {
            if stmt.id() == start_stmt.id() {
                found = true;
            }
            continue;
        }

        match statement_use(stmt, current_var, allow_cast_to_void, ctx) {
            StatementUse::None => {}
            StatementUse::Logged => logged = true,
            StatementUse::PropagatedValue { var, site } => {
                current_var = var;
                current_site = site;
            }
            StatementUse::BranchedNoCatchall => {
                return Some(Outcome::of(HandlingCategory::BranchedNoCatchall));
            }
            StatementUse::BranchedWithCatchall => {
                return Some(Outcome::of(HandlingCategory::BranchedWithCatchall));
            }
            StatementUse::PassedToHandlerFn => {
                return Some(Outcome::of(HandlingCategory::PassedToHandlerFn));
            }
            StatementUse::Returned => {
                return Some(Outcome::of(HandlingCategory::Propagated));
            }
            StatementUse::CastToVoid => {
                return Some(Outcome::of(HandlingCategory::CastToVoid));
            }
            StatementUse::UsedOther => {
                return Some(Outcome::of(HandlingCategory::UsedOther));
            }
            StatementUse::Killed => {
                return Some(finish(logged, current_site));
            }
        }
    }

    Some(finish(logged, current_site))
}

fn finish(logged: bool, site: Node) -> Outcome {
    if logged {
        Outcome::of(HandlingCategory::LoggedNotHandled)
    } else {
        Outcome {
            category: HandlingCategory::AssignedNotRead,
            assigned: Some(site),
        }
    }
}

/// Classify one statement's use of the tracked variable.
///
/// Precedence within a statement: handler beats everything, a return
/// beats branching, and logger detection never stops the scan.
fn statement_use<'t>(
    stmt: Node<'t>,
    var: VarBinding<'t>,
    allow_cast_to_void: bool,
    ctx: &UnitContext,
) -> StatementUse<'t> {
    let usage = scan_usage(stmt, UsageTarget::Var(var), ctx.registry, ctx.source);
    if usage.handler {
        return StatementUse::PassedToHandlerFn;
    }

    if contains_return_of_var(stmt, var, ctx.source) {
        return StatementUse::Returned;
    }

    if let Some(category) =
        branch_for_stmt(stmt, &mut |cond| contains_var_reference(cond, var, ctx.source))
    {
        return match category {
            HandlingCategory::BranchedWithCatchall => StatementUse::BranchedWithCatchall,
            _ => StatementUse::BranchedNoCatchall,
        };
    }

    if stmt.kind() == "declaration" {
        if let Some(use_) = declaration_use(stmt, var, ctx) {
            return use_;
        }
    }

    if let Some(use_) = assignment_use(stmt, var, ctx) {
        return use_;
    }

    if is_void_cast_statement(stmt, var, ctx.source) {
        return if allow_cast_to_void {
            StatementUse::CastToVoid
        } else {
            StatementUse::UsedOther
        };
    }

    if usage.other {
        return StatementUse::UsedOther;
    }
    if usage.logger {
        return StatementUse::Logged;
    }

    StatementUse::None
}

/// Declaration statements: a declarator initialized with exactly the
/// tracked variable retargets the walk; anything else referencing it is a
/// terminal use.
fn declaration_use<'t>(
    stmt: Node<'t>,
    var: VarBinding<'t>,
    ctx: &UnitContext,
) -> Option<StatementUse<'t>> {
    let mut candidate: Option<(VarBinding<'t>, Node<'t>)> = None;
    let mut cursor = stmt.walk();
    let local = !has_static_or_extern(stmt);

    for declarator in stmt.children_by_field_name("declarator", &mut cursor) {
        if declarator.kind() != "init_declarator" {
            continue;
        }
        let Some(value) = declarator.child_by_field_name("value") else {
            continue;
        };
        if !contains_var_reference(value, var, ctx.source) {
            continue;
        }

        if let Some(site) = direct_var_reference(value, var, ctx.source) {
            if local {
                if let Some(ident) = declared_identifier(declarator) {
                    if let Some((existing, _)) = &candidate {
                        if existing.ident.id() != ident.id() {
                            return Some(StatementUse::UsedOther);
                        }
                    }
                    candidate = Some((VarBinding { ident }, site));
                    continue;
                }
            }
        }

        let init_usage = scan_usage(value, UsageTarget::Var(var), ctx.registry, ctx.source);
        if init_usage.handler {
            return Some(StatementUse::PassedToHandlerFn);
        }
        if init_usage.other {
            return Some(StatementUse::UsedOther);
        }
        if init_usage.logger {
            return Some(StatementUse::Logged);
        }
        return Some(StatementUse::UsedOther);
    }

    candidate.map(|(var, site)| StatementUse::PropagatedValue { var, site })
}

/// Plain assignment statements: kill, retarget, or terminal use.
fn assignment_use<'t>(
    stmt: Node<'t>,
    var: VarBinding<'t>,
    ctx: &UnitContext,
) -> Option<StatementUse<'t>> {
    if stmt.kind() != "expression_statement" {
        return None;
    }
    let expr = first_expr_child(stmt)?;
    if expr.kind() != "assignment_expression" || expr.child_by_field_name("operator")?.kind() != "="
    {
        return None;
    }

    let left = expr.child_by_field_name("left")?;
    let right = expr.child_by_field_name("right")?;
    let lhs_var = as_local_var(left, ctx.source);
    let rhs_contains = contains_var_reference(right, var, ctx.source);

    if lhs_var.as_ref().is_some_and(|lhs| lhs.same(&var)) && !rhs_contains {
        return Some(StatementUse::Killed);
    }

    if rhs_contains {
        if let Some(site) = direct_var_reference(right, var, ctx.source) {
            if let Some(lhs) = lhs_var {
                if !lhs.same(&var) {
                    return Some(StatementUse::PropagatedValue { var: lhs, site });
                }
            }
        }
        let rhs_usage = scan_usage(right, UsageTarget::Var(var), ctx.registry, ctx.source);
        if rhs_usage.handler {
            return Some(StatementUse::PassedToHandlerFn);
        }
        if rhs_usage.other {
            return Some(StatementUse::UsedOther);
        }
        if rhs_usage.logger {
            return Some(StatementUse::Logged);
        }
        return Some(StatementUse::UsedOther);
    }

    None
}

/// The statement is an explicit cast to void of an expression containing
/// the tracked variable.
fn is_void_cast_statement(stmt: Node, var: VarBinding, source: &[u8]) -> bool {
    if stmt.kind() != "expression_statement" {
        return false;
    }
    let Some(expr) = first_expr_child(stmt) else {
        return false;
    };
    let cast = unwrap_parens(expr);
    is_void_cast(cast, source) && contains_var_reference(cast, var, source)
}
