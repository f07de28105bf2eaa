//! C parser using native tree-sitter.

use tree_sitter::{Parser, Query, Tree};

use super::CALL_QUERY;
use crate::errors::ParseError;

/// C parser with the compiled call-site query.
pub struct CParser {
    parser: Parser,
    call_query: Query,
}

impl CParser {
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        let language = tree_sitter_c::LANGUAGE;
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
