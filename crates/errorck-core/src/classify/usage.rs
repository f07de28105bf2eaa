//! Usage scanning with handler/logger argument context.
//!
//! While traversing an expression the scanner tracks which call's argument
//! list it is inside with an explicit context stack: descending into a
//! registered handler's or logger's arguments switches the context for the
//! whole argument subtree, and nested unregistered calls inherit the
//! surrounding context.

use tree_sitter::Node;

use crate::ast::{
    callee_name, is_declarator_position, is_errno_accessor_name, is_errno_expr, node_text,
    resolve_local, VarBinding,
};
use crate::registry::Registry;

/// How the target was used within one statement.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsageInfo {
    pub handler: bool,
    pub logger: bool,
    pub other: bool,
}

/// What the scanner looks for: a specific local, or errno.
#[derive(Debug, Clone, Copy)]
pub enum UsageTarget<'t> {
    Var(VarBinding<'t>),
    Errno,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Other,
    Logger,
    Handler,
}

/// Scan a statement (or expression) for uses of the target.
pub fn scan_usage(
    node: Node,
    target: UsageTarget,
    registry: &Registry,
    source: &[u8],
) -> UsageInfo {
    let mut info = UsageInfo::default();
    scan(node, Context::Other, target, registry, source, &mut info);
    info
}

fn scan(
    node: Node,
    ctx: Context,
    target: UsageTarget,
    registry: &Registry,
    source: &[u8],
    info: &mut UsageInfo,
) {
    match node.kind() {
        // An assignment whose left-hand side is an errno lvalue writes
        // errno; only the right-hand side is a read.
        "assignment_expression" if matches!(target, UsageTarget::Errno) => {
            if let (Some(left), Some(right)) = (
                node.child_by_field_name("left"),
                node.child_by_field_name("right"),
            ) {
                if is_errno_expr(left, source) {
                    scan(right, ctx, target, registry, source, info);
                    return;
                }
            }
        }
        "call_expression" => {
            let callee = callee_name(node, source);
            if callee.is_some_and(is_errno_accessor_name) {
                mark(ctx, info);
            }

            let arg_ctx = match callee {
                Some(name) if registry.is_handler(name) => Context::Handler,
                Some(name) if registry.is_logger(name) => Context::Logger,
                _ => ctx,
            };

            if let Some(function) = node.child_by_field_name("function") {
                scan(function, ctx, target, registry, source, info);
            }
            if let Some(arguments) = node.child_by_field_name("arguments") {
                for index in 0..arguments.child_count() {
                    if let Some(argument) = arguments.child(index) {
                        scan(argument, arg_ctx, target, registry, source, info);
                    }
                }
            }
            return;
        }
        "identifier" => {
            if references_target(node, target, source) {
                mark(ctx, info);
            }
        }
        _ => {}
    }

    for index in 0..node.child_count() {
        if let Some(child) = node.child(index) {
            scan(child, ctx, target, registry, source, info);
        }
    }
}

fn references_target(ident: Node, target: UsageTarget, source: &[u8]) -> bool {
    if is_declarator_position(ident) {
        return false;
    }
    match target {
        UsageTarget::Errno => node_text(ident, source) == "errno",
        UsageTarget::Var(binding) => {
            let name = binding.name(source);
            node_text(ident, source) == name
                && resolve_local(ident, name, source).is_some_and(|found| found.same(&binding))
        }
    }
}

fn mark(ctx: Context, info: &mut UsageInfo) {
    match ctx {
        Context::Handler => info.handler = true,
        Context::Logger => info.logger = true,
        Context::Other => info.other = true,
    }
}

/// True when the subtree references the binding anywhere.
pub fn contains_var_reference(node: Node, binding: VarBinding, source: &[u8]) -> bool {
    crate::ast::find_node(node, &mut |n| {
        n.kind() == "identifier" && references_target(n, UsageTarget::Var(binding), source)
    })
    .is_some()
}

/// The reference node when the expression is exactly the binding after
/// stripping parentheses.
pub fn direct_var_reference<'t>(
    node: Node<'t>,
    binding: VarBinding,
    source: &[u8],
) -> Option<Node<'t>> {
    let expr = crate::ast::unwrap_parens(node);
    (expr.kind() == "identifier" && references_target(expr, UsageTarget::Var(binding), source))
        .then_some(expr)
}

/// The local binding when the expression is exactly a local variable after
/// stripping parentheses.
pub fn as_local_var<'t>(node: Node<'t>, source: &[u8]) -> Option<VarBinding<'t>> {
    let expr = crate::ast::unwrap_parens(node);
    if expr.kind() != "identifier" {
        return None;
    }
    resolve_local(expr, node_text(expr, source), source)
}

/// True when some return statement in the subtree returns a value
/// referencing the binding.
pub fn contains_return_of_var(stmt: Node, binding: VarBinding, source: &[u8]) -> bool {
    return_values(stmt)
        .into_iter()
        .any(|value| contains_var_reference(value, binding, source))
}

/// True when some return statement in the subtree returns a value reading
/// errno.
pub fn contains_return_of_errno(stmt: Node, source: &[u8]) -> bool {
    return_values(stmt)
        .into_iter()
        .any(|value| crate::ast::contains_errno_reference(value, source))
}

fn return_values(stmt: Node) -> Vec<Node> {
    let mut values = Vec::new();
    collect_return_values(stmt, &mut values);
    values
}

fn collect_return_values<'t>(node: Node<'t>, out: &mut Vec<Node<'t>>) {
    if node.kind() == "return_statement" {
        if let Some(value) = crate::ast::first_expr_child(node) {
            out.push(value);
        }
    }
    for index in 0..node.child_count() {
        if let Some(child) = node.child(index) {
            collect_return_values(child, out);
        }
    }
}
