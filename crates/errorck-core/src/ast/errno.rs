//! Syntactic recognition of errno reads.
//!
//! Three forms count as an errno reference: an identifier named `errno`, a
//! call to the builtin accessors `__errno_location` / `__error`, and a
//! dereference of either (the expanded form of the `errno` macro on common
//! platforms). An assignment whose left-hand side is one of these forms is
//! not a read.

use tree_sitter::Node;

use super::walk::{callee_name, is_declarator_position, node_text, unwrap_parens};

pub fn is_errno_accessor_name(name: &str) -> bool {
    name == "__errno_location" || name == "__error"
}

/// True when the expression (after stripping parentheses) is an errno
/// lvalue.
pub fn is_errno_expr(node: Node, source: &[u8]) -> bool {
    let expr = unwrap_parens(node);
    match expr.kind() {
        "identifier" => node_text(expr, source) == "errno",
        "pointer_expression" => {
            let is_deref = expr
                .child_by_field_name("operator")
                .is_some_and(|op| op.kind() == "*");
            is_deref
                && expr
                    .child_by_field_name("argument")
                    .is_some_and(|argument| is_errno_expr(argument, source))
        }
        "call_expression" => {
            callee_name(expr, source).is_some_and(is_errno_accessor_name)
        }
        _ => false,
    }
}

/// True when the statement reads errno anywhere in its subtree.
/// Assignment left-hand sides that are errno lvalues are skipped.
pub fn contains_errno_reference(node: Node, source: &[u8]) -> bool {
    if node.kind() == "assignment_expression" {
        if let (Some(left), Some(right)) = (
            node.child_by_field_name("left"),
            node.child_by_field_name("right"),
        ) {
            if is_errno_expr(left, source) {
                return contains_errno_reference(right, source);
            }
        }
    }

    match node.kind() {
        "identifier" => {
            if node_text(node, source) == "errno" && !is_declarator_position(node) {
                return true;
            }
        }
        "call_expression" => {
            if callee_name(node, source).is_some_and(is_errno_accessor_name) {
                return true;
            }
        }
        _ => {}
    }

    for index in 0..node.child_count() {
        if let Some(child) = node.child(index) {
            if contains_errno_reference(child, source) {
                return true;
            }
        }
    }
    false
}
