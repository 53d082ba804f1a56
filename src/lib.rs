//! Scanner and recursive-descent parser for a small, Godot-like shading
//! language.
//!
//! Source text is tokenized line by line into a flat token queue, then
//! parsed into an immutable [`CompilationUnit`] holding the shader type,
//! includes, uniforms, varyings, constants, functions, and pipeline
//! stages. Errors are fatal to the parse and carry the offending
//! `line:column` plus the surrounding text; no partial tree is returned.
//!
//! # Quick start
//!
//! ## Parse a shader source string
//!
//! ```
//! use shadelang::parse_str;
//!
//! let source = "\
//! #shader_type canvas
//! uniform float u_time;
//!
//! void vertex() {
//!     // wobble the sprite
//! }
//! ";
//!
//! let unit = parse_str(source).unwrap();
//! assert_eq!(unit.shader_type.name, "canvas");
//! assert_eq!(unit.uniforms.len(), 1);
//! assert_eq!(unit.stages.len(), 1);
//! ```
//!
//! ## Parse pulled lines with a diagnostic label
//!
//! ```
//! use shadelang::{CancelToken, parse_shader};
//!
//! let lines = ["uniform vec4 u_color;"];
//! let unit = parse_shader("shaders/tint.shader", lines, &CancelToken::new()).unwrap();
//! assert_eq!(unit.shader_type.name, "sprite"); // fixed default
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{
    CompilationUnit, ConstantDeclaration, DEFAULT_SHADER_TYPE, Declaration, Expression,
    FunctionDeclaration, Include, Parameter, Primitive, ScalarKind, ShaderTypeDeclaration,
    StageDeclaration, StageKind, Statement, UniformDeclaration, VaryingDeclaration,
};
pub use lexer::{CancelToken, ScanError, ScanErrorKind, tokenize, tokenize_lines};
pub use parser::{ParseError, ParseErrorKind, parse};
pub use token::{LinePosition, Literal, Token, TokenKind};

/// Unified error type covering both scanning and parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A scanner error.
    #[error("{0}")]
    Scan(#[from] ScanError),
    /// A parser error.
    #[error("{0}")]
    Parse(#[from] ParseError),
}

/// An [`Error`] carrying the diagnostic label of the source it came from.
///
/// The label is opaque (a file path, a resource URI); it is never opened
/// or interpreted, only prefixed to the rendered diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{path}: {error}")]
pub struct ShaderError {
    pub path: String,
    #[source]
    pub error: Error,
}

/// Tokenize and parse a shader source string in one step.
pub fn parse_str(input: &str) -> Result<CompilationUnit, Error> {
    let tokens = tokenize(input)?;
    Ok(parse(&tokens)?)
}

/// Parse a shader from a pull-based supplier of source lines.
///
/// `path` labels diagnostics only. `cancel` is observed once per line
/// while scanning; once the token queue is complete, parsing runs to
/// completion or fails. Each call owns its token queue, so independent
/// parses may run concurrently without synchronization.
pub fn parse_shader<I, S>(
    path: &str,
    lines: I,
    cancel: &CancelToken,
) -> Result<CompilationUnit, ShaderError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokenize_lines(lines, cancel)
        .map_err(Error::from)
        .and_then(|tokens| parse(&tokens).map_err(Error::from))
        .map_err(|error| ShaderError {
            path: path.to_string(),
            error,
        })
}
