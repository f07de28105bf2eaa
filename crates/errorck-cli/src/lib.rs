//! Batch driver: load the registry, create the sink, walk the compilation
//! database, and classify each translation unit.
//!
//! Configuration and sink-creation failures are fatal; translation units
//! that fail to parse are skipped and surfaced as non-fatal errors that
//! force a non-zero exit at end of run.

use std::path::PathBuf;
use std::sync::Once;

use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use errorck_core::errors::{ParseError, PipelineError, PipelineResult};
use errorck_core::{CallClassifier, CompilationDatabase, Registry, SourceParser};
use errorck_storage::CallSink;

static INIT: Once = Once::new();

/// Initialize tracing from the `ERRORCK_LOG` environment variable,
/// defaulting to `errorck=info`. Idempotent.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env("ERRORCK_LOG").unwrap_or_else(|_| EnvFilter::new("errorck=info"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(filter)
            .init();
    });
}

/// Resolved driver options.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Notable-functions JSON path.
    pub notable_functions: PathBuf,
    /// Sink database path.
    pub db: PathBuf,
    /// Directory containing compile_commands.json.
    pub compdb: PathBuf,
    /// Allow replacing an existing sink.
    pub overwrite_if_needed: bool,
    /// Explicit source files; empty means every file in the database.
    pub sources: Vec<PathBuf>,
}

/// Counters for one run.
#[derive(Debug, Default)]
pub struct RunStats {
    pub files_analyzed: usize,
    pub files_failed: usize,
    pub calls_classified: usize,
}

/// Run the batch analysis.
///
/// `Err` means a fatal setup failure; non-fatal per-unit and sink errors
/// are collected on the returned `PipelineResult`.
pub fn run(options: &RunOptions) -> Result<PipelineResult<RunStats>, PipelineError> {
    let registry = Registry::from_file(&options.notable_functions)?;
    let mut sink = CallSink::create(&options.db, options.overwrite_if_needed)?;
    let compdb = CompilationDatabase::load(&options.compdb)?;

    let files = if options.sources.is_empty() {
        compdb.files()
    } else {
        options.sources.clone()
    };
    info!(files = files.len(), functions = registry.len(), "starting analysis");

    let mut parser = SourceParser::new()?;
    let classifier = CallClassifier::new(&registry);
    let mut result = PipelineResult::new(RunStats::default());

    for file in &files {
        let path = file.display().to_string();
        let source = match std::fs::read_to_string(file) {
            Ok(source) => source,
            Err(e) => {
                warn!(%path, error = %e, "skipping unreadable source");
                result.data.files_failed += 1;
                result.add_error(PipelineError::Parse(ParseError::UnreadableSource {
                    path,
                    message: e.to_string(),
                }));
                continue;
            }
        };

        let unit = match parser.parse(&path, &source) {
            Ok(unit) => unit,
            Err(e) => {
                warn!(%path, error = %e, "skipping translation unit");
                result.data.files_failed += 1;
                result.add_error(e.into());
                continue;
            }
        };

        let calls = classifier.classify_unit(&unit, &source, parser.call_query(unit.language));
        debug!(%path, calls = calls.len(), "classified translation unit");
        result.data.calls_classified += calls.len();
        for call in &calls {
            sink.insert(call);
        }
        result.data.files_analyzed += 1;
    }

    if let Some(error) = sink.into_error() {
        result.add_error(error.into());
    }

    Ok(result)
}
