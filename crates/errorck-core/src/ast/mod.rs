//! Location and parent services over the concrete syntax tree.
//!
//! Everything here is purely syntactic: parent-chain walking, statement
//! lookup inside compound blocks, catch-all detection, local-variable
//! scope resolution, and errno recognition.

pub mod errno;
pub mod scope;
pub mod walk;

pub use errno::{contains_errno_reference, is_errno_accessor_name, is_errno_expr};
pub use scope::{
    binding_in_declaration, declared_identifier, has_static_or_extern, resolve_local, VarBinding,
};
pub use walk::{
    block_statements, callee_name, contains_node, find_node, first_expr_child, if_has_catchall,
    is_declarator_position, is_expression, is_statement_position, is_void_cast, is_wrapper,
    next_statement, node_text, start_location, statement_in_block, switch_has_default,
    top_wrapper, unwrap_parens,
};
