//! Syntactic local-variable scopes.
//!
//! The CST has no symbol table, so "local variable" is modeled as the
//! innermost binding found by scanning enclosing compound blocks, `for`
//! initializers, and function parameters. `static` and `extern`
//! declarations are excluded so the model matches block-scope storage.

use tree_sitter::Node;

use super::walk::{block_statements, node_text};

/// A resolved local binding, identified by its declaring identifier node.
#[derive(Debug, Clone, Copy)]
pub struct VarBinding<'t> {
    pub ident: Node<'t>,
}

impl<'t> VarBinding<'t> {
    pub fn name<'s>(&self, source: &'s [u8]) -> &'s str {
        node_text(self.ident, source)
    }

    /// Two bindings are the same variable when they share the declaring
    /// identifier node.
    pub fn same(&self, other: &VarBinding) -> bool {
        self.ident.id() == other.ident.id()
    }
}

/// Innermost binding for `name` visible at `at`, or `None` when the name
/// does not resolve to a local.
pub fn resolve_local<'t>(at: Node<'t>, name: &str, source: &[u8]) -> Option<VarBinding<'t>> {
    let mut scope = at.parent();
    while let Some(node) = scope {
        match node.kind() {
            "compound_statement" => {
                for stmt in block_statements(node) {
                    if stmt.kind() != "declaration" || has_static_or_extern(stmt) {
                        continue;
                    }
                    if let Some(binding) = binding_in_declaration(stmt, name, source) {
                        return Some(binding);
                    }
                }
            }
            "for_statement" => {
                if let Some(init) = node.child_by_field_name("initializer") {
                    if init.kind() == "declaration" {
                        if let Some(binding) = binding_in_declaration(init, name, source) {
                            return Some(binding);
                        }
                    }
                }
            }
            "function_definition" => {
                if let Some(binding) = parameter_binding(node, name, source) {
                    return Some(binding);
                }
            }
            _ => {}
        }
        scope = node.parent();
    }
    None
}

/// Binding declared by a declaration statement, if it declares `name`.
pub fn binding_in_declaration<'t>(
    declaration: Node<'t>,
    name: &str,
    source: &[u8],
) -> Option<VarBinding<'t>> {
    let mut cursor = declaration.walk();
    for declarator in declaration.children_by_field_name("declarator", &mut cursor) {
        if let Some(ident) = declared_identifier(declarator) {
            if node_text(ident, source) == name {
                return Some(VarBinding { ident });
            }
        }
    }
    None
}

/// The identifier a declarator ultimately declares.
pub fn declared_identifier(declarator: Node) -> Option<Node> {
    let mut node = declarator;
    loop {
        match node.kind() {
            "identifier" => return Some(node),
            "init_declarator" | "pointer_declarator" | "array_declarator"
            | "function_declarator" => {
                node = node.child_by_field_name("declarator")?;
            }
            // Parenthesized declarators carry no field for their inner
            // declarator.
            "parenthesized_declarator" => {
                node = super::walk::first_expr_child(node)?;
            }
            _ => return None,
        }
    }
}

/// True when the declaration carries `static` or `extern` storage.
pub fn has_static_or_extern(declaration: Node) -> bool {
    for index in 0..declaration.child_count() {
        let Some(child) = declaration.child(index) else {
            continue;
        };
        if child.kind() != "storage_class_specifier" {
            continue;
        }
        if let Some(keyword) = child.child(0) {
            if matches!(keyword.kind(), "static" | "extern") {
                return true;
            }
        }
    }
    false
}

fn parameter_binding<'t>(
    function: Node<'t>,
    name: &str,
    source: &[u8],
) -> Option<VarBinding<'t>> {
    let mut declarator = function.child_by_field_name("declarator")?;
    while declarator.kind() != "function_declarator" {
        declarator = declarator.child_by_field_name("declarator")?;
    }
    let parameters = declarator.child_by_field_name("parameters")?;
    let mut cursor = parameters.walk();
    for parameter in parameters.named_children(&mut cursor) {
        if parameter.kind() != "parameter_declaration" {
            continue;
        }
        let Some(param_declarator) = parameter.child_by_field_name("declarator") else {
            continue;
        };
        if let Some(ident) = declared_identifier(param_declarator) {
            if node_text(ident, source) == name {
                return Some(VarBinding { ident });
            }
        }
    }
    None
}
