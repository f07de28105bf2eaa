//! Return-value contract classification scenarios.
//! Each test is a complete translation unit with `malloc` watched.

use errorck_core::{CallClassifier, HandlingCategory, Registry, SourceParser, WatchedCall};

fn classify(source: &str) -> Vec<WatchedCall> {
    let registry = Registry::from_json(
        r#"[
            {"name": "malloc", "reporting": "return_value"},
            {"name": "handle", "type": "handler"},
            {"name": "log_error", "type": "logger"}
        ]"#,
    )
    .unwrap();
    let mut parser = SourceParser::new().unwrap();
    let unit = parser.parse("main.c", source).unwrap();
    let classifier = CallClassifier::new(&registry);
    classifier.classify_unit(&unit, source, parser.call_query(unit.language))
}

fn single(source: &str) -> WatchedCall {
    let calls = classify(source);
    assert_eq!(calls.len(), 1, "expected one watched call in: {source}");
    calls.into_iter().next().unwrap()
}

#[test]
fn call_in_statement_position_is_ignored() {
    let call = single("int main(void) { malloc(10); return 0; }");
    assert_eq!(call.category, HandlingCategory::Ignored);
    assert!(call.assigned.is_none());
}

#[test]
fn call_in_loop_body_is_ignored() {
    let call = single("void spin(void) { for (;;) malloc(10); }");
    assert_eq!(call.category, HandlingCategory::Ignored);
}

#[test]
fn call_in_for_init_is_ignored() {
    let call = single("void spin(void) { for (malloc(10);;) { break; } }");
    assert_eq!(call.category, HandlingCategory::Ignored);
}

#[test]
fn explicit_void_cast_wins_over_statement_position() {
    let call = single("int main(void) { (void)malloc(10); return 0; }");
    assert_eq!(call.category, HandlingCategory::CastToVoid);
}

#[test]
fn parenthesized_void_cast_is_still_cast_to_void() {
    let call = single("int main(void) { ((void)malloc(10)); return 0; }");
    assert_eq!(call.category, HandlingCategory::CastToVoid);
}

#[test]
fn cast_to_non_void_does_not_count() {
    let call = single("int main(void) { (long)malloc(10); return 0; }");
    assert_eq!(call.category, HandlingCategory::Ignored);
}

#[test]
fn argument_to_handler_is_passed_to_handler_fn() {
    let call = single(
        "void handle(void *p);\nint main(void) { handle(malloc(10)); return 0; }",
    );
    assert_eq!(call.category, HandlingCategory::PassedToHandlerFn);
}

#[test]
fn argument_to_logger_is_logged_not_handled() {
    let call = single(
        "void log_error(void *p);\nint main(void) { log_error(malloc(10)); return 0; }",
    );
    assert_eq!(call.category, HandlingCategory::LoggedNotHandled);
}

#[test]
fn argument_to_unregistered_call_is_used_other() {
    let call = single("void wrap(void *p);\nint main(void) { wrap(malloc(10)); return 0; }");
    assert_eq!(call.category, HandlingCategory::UsedOther);
}

#[test]
fn nearest_enclosing_call_decides_even_inside_handler() {
    // wrap() is the nearest enclosing call, so the handler further out
    // does not claim the value.
    let call = single(
        "void handle(void *p);\nvoid *wrap(void *p);\nint main(void) { handle(wrap(malloc(10))); return 0; }",
    );
    assert_eq!(call.category, HandlingCategory::UsedOther);
}

#[test]
fn returned_call_is_propagated() {
    let call = single("void *get(void) { return malloc(10); }");
    assert_eq!(call.category, HandlingCategory::Propagated);
}

#[test]
fn returned_inside_expression_is_propagated() {
    let call = single("long get(void) { return (long)malloc(10) + 1; }");
    assert_eq!(call.category, HandlingCategory::Propagated);
}

#[test]
fn branch_condition_without_else_is_branched_no_catchall() {
    let call = single("int main(void) { if (malloc(10)) { return 1; } return 0; }");
    assert_eq!(call.category, HandlingCategory::BranchedNoCatchall);
}

#[test]
fn branch_with_terminal_else_is_branched_with_catchall() {
    let call =
        single("int main(void) { if (malloc(10)) { return 1; } else { return 2; } }");
    assert_eq!(call.category, HandlingCategory::BranchedWithCatchall);
}

#[test]
fn else_if_chain_without_terminal_else_has_no_catchall() {
    let call = single(
        "int g;\nint main(void) { if (malloc(10)) { return 1; } else if (g) { return 2; } return 0; }",
    );
    assert_eq!(call.category, HandlingCategory::BranchedNoCatchall);
}

#[test]
fn else_if_chain_with_terminal_else_has_catchall() {
    let call = single(
        "int g;\nint main(void) { if (malloc(10)) { return 1; } else if (g) { return 2; } else { return 3; } }",
    );
    assert_eq!(call.category, HandlingCategory::BranchedWithCatchall);
}

#[test]
fn assigned_and_never_read_reports_the_call_site() {
    let call = single("int main(void) { void *p = malloc(10); return 0; }");
    assert_eq!(call.category, HandlingCategory::AssignedNotRead);
    let assigned = call.assigned.expect("assignment site");
    assert_eq!((call.line, call.column), (assigned.line, assigned.column));
}

#[test]
fn plain_assignment_to_local_is_tracked() {
    let call = single("int main(void) { void *p; p = malloc(10); return 0; }");
    assert_eq!(call.category, HandlingCategory::AssignedNotRead);
    assert!(call.assigned.is_some());
}

#[test]
fn copy_into_second_local_retargets_the_unread_site() {
    let source = "int main(void) { void *p = malloc(10); void *q = p; return 0; }";
    let call = single(source);
    assert_eq!(call.category, HandlingCategory::AssignedNotRead);
    // The reported site is the final value-bearing expression: the `p`
    // reference in the second declaration.
    let assigned = call.assigned.expect("assignment site");
    assert!(assigned.line == 1 && assigned.column > call.column);
}

#[test]
fn killed_value_is_assigned_not_read() {
    let call = single("int main(void) { void *p = malloc(10); p = 0; return (int)(long)p; }");
    assert_eq!(call.category, HandlingCategory::AssignedNotRead);
}

#[test]
fn logged_then_killed_is_logged_not_handled() {
    let call = single(
        "void log_error(void *p);\nint main(void) { void *p = malloc(10); log_error(p); p = 0; return 0; }",
    );
    assert_eq!(call.category, HandlingCategory::LoggedNotHandled);
    assert!(call.assigned.is_none());
}

#[test]
fn logged_then_branched_is_branched() {
    // Logging never terminates the walk; the later branch wins.
    let call = single(
        "void log_error(void *p);\nint main(void) { void *p = malloc(10); log_error(p); if (!p) { return 1; } return 0; }",
    );
    assert_eq!(call.category, HandlingCategory::BranchedNoCatchall);
}

#[test]
fn logged_then_void_cast_is_cast_to_void() {
    let call = single(
        "void log_error(void *p);\nint main(void) { void *p = malloc(10); log_error(p); (void)p; return 0; }",
    );
    assert_eq!(call.category, HandlingCategory::CastToVoid);
}

#[test]
fn tracked_value_passed_to_handler() {
    let call = single(
        "void handle(void *p);\nint main(void) { void *p = malloc(10); handle(p); return 0; }",
    );
    assert_eq!(call.category, HandlingCategory::PassedToHandlerFn);
}

#[test]
fn tracked_value_returned_is_propagated() {
    let call = single("void *get(void) { void *p = malloc(10); return p; }");
    assert_eq!(call.category, HandlingCategory::Propagated);
}

#[test]
fn tracked_value_in_branch_condition() {
    let call = single(
        "int main(void) { void *p = malloc(10); if (!p) { return 1; } return 0; }",
    );
    assert_eq!(call.category, HandlingCategory::BranchedNoCatchall);
}

#[test]
fn tracked_value_used_in_arithmetic_is_used_other() {
    let call = single(
        "int main(void) { void *p = malloc(10); long n = (long)p + 1; return (int)n; }",
    );
    assert_eq!(call.category, HandlingCategory::UsedOther);
}

#[test]
fn return_inside_branch_body_is_propagated_not_branched() {
    // The whole-statement scan sees the returned variable before the
    // branch condition is consulted.
    let call = single(
        "void *get(int c) { void *p = malloc(10); if (c) { return p; } return 0; }",
    );
    assert_eq!(call.category, HandlingCategory::Propagated);
}

#[test]
fn handler_inside_branch_body_wins_over_branching() {
    let call = single(
        "void handle(void *p);\nint main(void) { void *p = malloc(10); if (p) { handle(p); } return 0; }",
    );
    assert_eq!(call.category, HandlingCategory::PassedToHandlerFn);
}

#[test]
fn indirect_call_through_local_function_pointer_is_not_watched() {
    let calls = classify(
        "typedef void *(*alloc_fn)(unsigned long);\nvoid *impl(unsigned long n);\nint main(void) { alloc_fn malloc = impl; malloc(10); return 0; }",
    );
    assert!(calls.is_empty());
}

#[test]
fn every_call_site_gets_exactly_one_row() {
    let calls = classify(
        "int main(void) { malloc(1); malloc(2); void *p = malloc(3); return 0; }",
    );
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].category, HandlingCategory::Ignored);
    assert_eq!(calls[1].category, HandlingCategory::Ignored);
    assert_eq!(calls[2].category, HandlingCategory::AssignedNotRead);
    // Only assigned_not_read carries an assignment site.
    assert!(calls[0].assigned.is_none());
    assert!(calls[1].assigned.is_none());
    assert!(calls[2].assigned.is_some());
}
