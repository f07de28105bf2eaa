//! C and C++ frontends using native tree-sitter.
//!
//! The concrete syntax tree is the engine's AST input: it provides parent
//! queries, sibling iteration, source positions, and the node kinds the
//! classifiers match on.

pub mod c;
pub mod cpp;

use std::path::Path;

use tree_sitter::Tree;

use crate::errors::ParseError;

/// Query matching every call through a direct identifier callee.
/// Member calls and qualified calls are deliberately excluded: the engine
/// only watches syntactic function names.
pub(crate) const CALL_QUERY: &str = r#"
(call_expression
    function: (identifier) @callee
    arguments: (argument_list) @args
) @call
"#;

/// Supported source languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    C,
    Cpp,
}

impl Language {
    /// Detect language from a file extension string.
    pub fn from_extension(ext: Option<&str>) -> Option<Language> {
        match ext? {
            "c" | "h" => Some(Language::C),
            "cpp" | "cc" | "cxx" | "hpp" | "hxx" | "hh" => Some(Language::Cpp),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Language> {
        Language::from_extension(path.extension().and_then(|e| e.to_str()))
    }
}

/// One parsed translation unit.
#[derive(Debug)]
pub struct ParsedUnit {
    pub path: String,
    pub language: Language,
    pub tree: Tree,
}

/// Owns one parser per language and dispatches on file extension.
pub struct SourceParser {
    c: c::CParser,
    cpp: cpp::CppParser,
}

impl SourceParser {
    pub fn new() -> Result<Self, ParseError> {
        Ok(Self {
            c: c::CParser::new()?,
            cpp: cpp::CppParser::new()?,
        })
    }

    /// Parse one translation unit.
    ///
    /// A missing tree or a root containing syntax errors is a frontend
    /// failure: the unit is skipped and the run exits non-zero.
    pub fn parse(&mut self, path: &str, source: &str) -> Result<ParsedUnit, ParseError> {
        let language = Language::from_path(Path::new(path)).ok_or_else(|| {
            ParseError::UnsupportedLanguage {
                path: path.to_string(),
            }
        })?;

        let tree = match language {
            Language::C => self.c.parse(source),
            Language::Cpp => self.cpp.parse(source),
        };
        let tree = tree.ok_or_else(|| ParseError::NoTree {
            path: path.to_string(),
        })?;

        if tree.root_node().has_error() {
            return Err(ParseError::SyntaxErrors {
                path: path.to_string(),
            });
        }

        Ok(ParsedUnit {
            path: path.to_string(),
            language,
            tree,
        })
    }

    /// Compiled call-site query for a language.
    pub fn call_query(&self, language: Language) -> &tree_sitter::Query {
        match language {
            Language::C => self.c.call_query(),
            Language::Cpp => self.cpp.call_query(),
        }
    }
}
