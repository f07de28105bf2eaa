//! Parent-chain and sibling navigation.

use tree_sitter::Node;

/// Wrapper expressions that are transparent when walking the parent chain.
/// The CST inserts no implicit-cast or cleanup nodes, so parentheses and
/// explicit casts are the complete set.
pub fn is_wrapper(node: Node) -> bool {
    matches!(node.kind(), "parenthesized_expression" | "cast_expression")
}

/// Expression-kind nodes, for walks that climb until the first statement.
pub fn is_expression(node: Node) -> bool {
    matches!(
        node.kind(),
        "parenthesized_expression"
            | "cast_expression"
            | "binary_expression"
            | "unary_expression"
            | "pointer_expression"
            | "conditional_expression"
            | "comma_expression"
            | "assignment_expression"
            | "update_expression"
            | "call_expression"
            | "argument_list"
            | "field_expression"
            | "subscript_expression"
            | "sizeof_expression"
            | "initializer_list"
            | "identifier"
            | "number_literal"
            | "string_literal"
            | "char_literal"
            | "concatenated_string"
    )
}

/// Source text of a node.
pub fn node_text<'s>(node: Node, source: &'s [u8]) -> &'s str {
    node.utf8_text(source).unwrap_or("")
}

/// 1-based (line, column) of a node's start.
pub fn start_location(node: Node) -> (u32, u32) {
    let point = node.start_position();
    (point.row as u32 + 1, point.column as u32 + 1)
}

/// First named child that is not a comment.
pub fn first_expr_child(node: Node) -> Option<Node> {
    let mut index = 0;
    while let Some(child) = node.named_child(index) {
        if child.kind() != "comment" {
            return Some(child);
        }
        index += 1;
    }
    None
}

/// Strip surrounding parentheses.
pub fn unwrap_parens(node: Node) -> Node {
    let mut current = node;
    while current.kind() == "parenthesized_expression" {
        match first_expr_child(current) {
            Some(inner) => current = inner,
            None => break,
        }
    }
    current
}

/// Topmost node of the wrapper chain above `node` (`node` itself when its
/// parent is not a wrapper).
pub fn top_wrapper(node: Node) -> Node {
    let mut current = node;
    while let Some(parent) = current.parent() {
        if !is_wrapper(parent) {
            break;
        }
        current = parent;
    }
    current
}

/// True when a cast expression casts to plain `void`.
pub fn is_void_cast(node: Node, source: &[u8]) -> bool {
    if node.kind() != "cast_expression" {
        return false;
    }
    match node.child_by_field_name("type") {
        Some(ty) => node_text(ty, source).trim() == "void",
        None => false,
    }
}

/// Direct identifier callee of a call expression, if any.
pub fn callee_name<'s>(call: Node, source: &'s [u8]) -> Option<&'s str> {
    let function = call.child_by_field_name("function")?;
    if function.kind() == "identifier" {
        Some(node_text(function, source))
    } else {
        None
    }
}

/// Nearest ancestor that sits directly in a compound block.
pub fn statement_in_block(node: Node) -> Option<Node> {
    let mut current = node;
    while let Some(parent) = current.parent() {
        if parent.kind() == "compound_statement" {
            return Some(current);
        }
        current = parent;
    }
    None
}

/// Named statements of a compound block, comments skipped.
pub fn block_statements(block: Node) -> Vec<Node> {
    let mut cursor = block.walk();
    block
        .named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .collect()
}

/// Next statement after `stmt` among its siblings, comments skipped.
pub fn next_statement(stmt: Node) -> Option<Node> {
    let mut next = stmt.next_named_sibling();
    while let Some(node) = next {
        if node.kind() != "comment" {
            return Some(node);
        }
        next = node.next_named_sibling();
    }
    None
}

/// True when `ancestor` contains `node` in its subtree (inclusive).
pub fn contains_node(ancestor: Node, node: Node) -> bool {
    let mut current = Some(node);
    while let Some(n) = current {
        if n.id() == ancestor.id() {
            return true;
        }
        current = n.parent();
    }
    false
}

/// True when the expression's value is syntactically discarded.
///
/// Every discarding slot (compound-block child, if/loop/switch
/// substatement, case/default/label substatement) wraps its expression in
/// an `expression_statement`; the `for` initializer and update slots hold
/// the expression directly.
pub fn is_statement_position(node: Node) -> bool {
    let top = top_wrapper(node);
    let Some(parent) = top.parent() else {
        return false;
    };
    match parent.kind() {
        "expression_statement" => true,
        "for_statement" => {
            let in_field = |field: &str| {
                parent
                    .child_by_field_name(field)
                    .is_some_and(|n| n.id() == top.id())
            };
            in_field("initializer") || in_field("update")
        }
        _ => false,
    }
}

/// Terminal `else` that is not another `if`.
pub fn if_has_catchall(if_stmt: Node) -> bool {
    let mut current = if_stmt;
    loop {
        let Some(alternative) = current.child_by_field_name("alternative") else {
            return false;
        };
        let body = if alternative.kind() == "else_clause" {
            match first_expr_child(alternative) {
                Some(body) => body,
                None => return false,
            }
        } else {
            alternative
        };
        if body.kind() == "if_statement" {
            current = body;
            continue;
        }
        return true;
    }
}

/// `default` label among the switch body's cases.
pub fn switch_has_default(switch_stmt: Node) -> bool {
    let Some(body) = switch_stmt.child_by_field_name("body") else {
        return false;
    };
    let mut cursor = body.walk();
    let result = body.named_children(&mut cursor).any(|case| {
        case.kind() == "case_statement" && case.child_by_field_name("value").is_none()
    });
    result
}

/// True when the identifier sits in declarator position (it declares a
/// name rather than referencing one).
pub fn is_declarator_position(ident: Node) -> bool {
    let Some(parent) = ident.parent() else {
        return false;
    };
    match parent.kind() {
        "init_declarator" | "declaration" | "parameter_declaration" | "pointer_declarator"
        | "array_declarator" | "function_declarator" => parent
            .child_by_field_name("declarator")
            .is_some_and(|d| d.id() == ident.id()),
        _ => false,
    }
}

/// Preorder search for the first node satisfying `pred`.
pub fn find_node<'t>(
    root: Node<'t>,
    pred: &mut dyn FnMut(Node<'t>) -> bool,
) -> Option<Node<'t>> {
    if pred(root) {
        return Some(root);
    }
    for index in 0..root.child_count() {
        if let Some(child) = root.child(index) {
            if let Some(found) = find_node(child, pred) {
                return Some(found);
            }
        }
    }
    None
}
