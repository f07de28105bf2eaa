//! C++ parser using native tree-sitter.
//!
//! The C++ grammar shares the statement and expression node kinds the
//! classifiers match on, so analysis code is language-agnostic.

use tree_sitter::{Parser, Query, Tree};

use super::CALL_QUERY;
use crate::errors::ParseError;

/// C++ parser with the compiled call-site query.
pub struct CppParser {
    parser: Parser,
    call_query: Query,
}

impl CppParser {
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        let language = tree_sitter_cpp::LANGUAGE;
        parser
            .set_language(&language.into())
            .map_err(|e| ParseError::Language(e.to_string()))?;

        let call_query = Query::new(&language.into(), CALL_QUERY)
            .map_err(|e| ParseError::QueryCompilationFailed(e.to_string()))?;

        Ok(Self { parser, call_query })
    }

    pub fn parse(&mut self, source: &str) -> Option<Tree> {
        self.parser.parse(source, None)
    }

    pub fn call_query(&self) -> &Query {
        &self.call_query
    }
}
