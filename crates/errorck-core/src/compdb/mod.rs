//! Compilation-database ingestion.
//!
//! Reads `compile_commands.json` from a build directory and yields the
//! translation units to analyze. Compiler flags are not interpreted; the
//! frontend parses sources unpreprocessed.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::ParseError;

/// One entry of `compile_commands.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct CompileCommand {
    pub directory: String,
    pub file: String,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub arguments: Option<Vec<String>>,
}

/// A loaded compilation database.
#[derive(Debug, Clone, Default)]
pub struct CompilationDatabase {
    commands: Vec<CompileCommand>,
}

impl CompilationDatabase {
    /// Load `compile_commands.json` from `dir`.
    pub fn load(dir: &Path) -> Result<Self, ParseError> {
        let path = dir.join("compile_commands.json");
        let contents = std::fs::read_to_string(&path).map_err(|e| db_error(dir, e.to_string()))?;
        let commands: Vec<CompileCommand> =
            serde_json::from_str(&contents).map_err(|e| db_error(dir, e.to_string()))?;
        tracing::debug!(entries = commands.len(), dir = %dir.display(), "loaded compilation database");
        Ok(Self { commands })
    }

    pub fn commands(&self) -> &[CompileCommand] {
        &self.commands
    }

    /// Unique source files in first-seen order, each resolved against its
    /// entry's directory.
    pub fn files(&self) -> Vec<PathBuf> {
        let mut seen = rustc_hash::FxHashSet::default();
        let mut files = Vec::new();
        for command in &self.commands {
            let file = Path::new(&command.file);
            let resolved = if file.is_absolute() {
                file.to_path_buf()
            } else {
                Path::new(&command.directory).join(file)
            };
            if seen.insert(resolved.clone()) {
                files.push(resolved);
            }
        }
        files
    }
}

fn db_error(dir: &Path, message: String) -> ParseError {
    ParseError::CompilationDatabase {
        dir: dir.display().to_string(),
        message,
    }
}
