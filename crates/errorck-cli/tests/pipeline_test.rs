//! End-to-end driver tests: compilation database in, sink rows out.

use std::path::Path;

use errorck_cli::{run, RunOptions};
use errorck_core::errors::PipelineError;
use errorck_core::HandlingCategory;
use errorck_storage::read_all;

const NOTABLE_JSON: &str = r#"[
    {"name": "strtoull", "reporting": "errno"},
    {"name": "malloc", "reporting": "return_value"},
    {"name": "handle", "type": "handler"},
    {"name": "log_errno", "type": "logger"}
]"#;

const MAIN_C: &str = r#"
void handle(int e);

int main(void) {
    void *p = malloc(10);
    if (!p) {
        return 1;
    }
    unsigned long x = strtoull("", 0, 10);
    handle(errno);
    return (int)x;
}
"#;

fn write_project(dir: &Path, sources: &[(&str, &str)]) {
    let mut entries = Vec::new();
    for (name, contents) in sources {
        std::fs::write(dir.join(name), contents).unwrap();
        entries.push(format!(
            r#"{{"directory": "{dir}", "command": "cc -c {name}", "file": "{name}"}}"#,
            dir = dir.display(),
        ));
    }
    std::fs::write(
        dir.join("compile_commands.json"),
        format!("[{}]", entries.join(",")),
    )
    .unwrap();
    std::fs::write(dir.join("notable.json"), NOTABLE_JSON).unwrap();
}

fn options(dir: &Path, overwrite: bool) -> RunOptions {
    RunOptions {
        notable_functions: dir.join("notable.json"),
        db: dir.join("calls.db"),
        compdb: dir.to_path_buf(),
        overwrite_if_needed: overwrite,
        sources: Vec::new(),
    }
}

#[test]
fn classifies_a_unit_into_the_sink() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path(), &[("main.c", MAIN_C)]);

    let result = run(&options(dir.path(), false)).unwrap();
    assert!(result.is_clean());
    assert_eq!(result.data.files_analyzed, 1);
    assert_eq!(result.data.calls_classified, 2);

    let rows = read_all(&dir.path().join("calls.db")).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "malloc");
    assert_eq!(rows[0].category, HandlingCategory::BranchedNoCatchall);
    assert_eq!(rows[1].name, "strtoull");
    assert_eq!(rows[1].category, HandlingCategory::PassedToHandlerFn);
}

#[test]
fn rerun_with_overwrite_reproduces_the_sink() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path(), &[("main.c", MAIN_C)]);

    run(&options(dir.path(), false)).unwrap();
    let first = read_all(&dir.path().join("calls.db")).unwrap();

    let result = run(&options(dir.path(), true)).unwrap();
    assert!(result.is_clean());
    let second = read_all(&dir.path().join("calls.db")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn existing_sink_without_overwrite_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path(), &[("main.c", MAIN_C)]);

    run(&options(dir.path(), false)).unwrap();
    let err = run(&options(dir.path(), false)).unwrap_err();
    assert!(matches!(err, PipelineError::Storage(_)));
}

#[test]
fn broken_unit_is_skipped_and_surfaces_an_error() {
    let dir = tempfile::tempdir().unwrap();
    write_project(
        dir.path(),
        &[
            ("main.c", MAIN_C),
            ("broken.c", "int main( { this is not C"),
        ],
    );

    let result = run(&options(dir.path(), false)).unwrap();
    assert!(!result.is_clean());
    assert_eq!(result.data.files_analyzed, 1);
    assert_eq!(result.data.files_failed, 1);

    // The healthy unit was still classified.
    let rows = read_all(&dir.path().join("calls.db")).unwrap();
    assert_eq!(rows.len(), 2);
}

#[test]
fn missing_notable_functions_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path(), &[("main.c", MAIN_C)]);
    std::fs::remove_file(dir.path().join("notable.json")).unwrap();

    let err = run(&options(dir.path(), false)).unwrap_err();
    assert!(matches!(err, PipelineError::Config(_)));
}

#[test]
fn explicit_source_list_overrides_the_database_files() {
    let dir = tempfile::tempdir().unwrap();
    write_project(
        dir.path(),
        &[("main.c", MAIN_C), ("other.c", "int main(void) { malloc(1); return 0; }")],
    );

    let mut opts = options(dir.path(), false);
    opts.sources = vec![dir.path().join("other.c")];
    let result = run(&opts).unwrap();
    assert!(result.is_clean());
    assert_eq!(result.data.files_analyzed, 1);

    let rows = read_all(&dir.path().join("calls.db")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category, HandlingCategory::Ignored);
}
