use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use errorck_cli::{init_tracing, run, RunOptions};
use errorck_core::errors::ErrorckErrorCode;

#[derive(Parser, Debug)]
#[command(
    name = "errorck",
    version,
    about = "Classify how watched C/C++ calls handle their error signals"
)]
struct Cli {
    /// Path to the JSON array of functions to watch
    #[arg(long = "notable-functions", value_name = "PATH")]
    notable_functions: PathBuf,

    /// Path to the SQLite database output
    #[arg(long = "db", value_name = "PATH")]
    db: PathBuf,

    /// Directory containing compile_commands.json
    #[arg(short = 'p', long = "compdb", value_name = "DIR")]
    compdb: PathBuf,

    /// Allow overwriting an existing database
    #[arg(long = "overwrite-if-needed")]
    overwrite_if_needed: bool,

    /// Source files to analyze (defaults to every file in the compilation
    /// database)
    #[arg(value_name = "SOURCE")]
    sources: Vec<PathBuf>,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let options = RunOptions {
        notable_functions: cli.notable_functions,
        db: cli.db,
        compdb: cli.compdb,
        overwrite_if_needed: cli.overwrite_if_needed,
        sources: cli.sources,
    };

    match run(&options) {
        Ok(result) => {
            info!(
                files = result.data.files_analyzed,
                failed = result.data.files_failed,
                calls = result.data.calls_classified,
                "analysis complete"
            );
            if result.is_clean() {
                ExitCode::SUCCESS
            } else {
                for e in &result.errors {
                    error!(code = e.error_code(), "{e}");
                }
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            error!(code = e.error_code(), "{e}");
            ExitCode::FAILURE
        }
    }
}
