#![allow(dead_code)]

use shadelang::{CompilationUnit, Error, parse_str};

/// Parse source text, panicking with the rendered diagnostic on failure.
pub fn parse_source(input: &str) -> CompilationUnit {
    parse_str(input).unwrap_or_else(|e| {
        panic!("failed to parse shader:\n{input}\n--- error ---\n{e}");
    })
}

/// Parse source text that must fail, returning the error.
pub fn parse_failure(input: &str) -> Error {
    match parse_str(input) {
        Ok(unit) => panic!("expected a parse failure, got: {unit:?}"),
        Err(e) => e,
    }
}
