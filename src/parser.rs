use std::fmt;

use crate::ast::{
    CompilationUnit, ConstantDeclaration, Declaration, Expression, FunctionDeclaration, Include,
    Parameter, Primitive, ShaderTypeDeclaration, StageDeclaration, StageKind, Statement,
    UniformDeclaration, VaryingDeclaration,
};
use crate::token::{LinePosition, Token, TokenKind};

/// Classifies a parser error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A specific token kind was required; something else (or EOF) was next.
    UnexpectedToken {
        expected: TokenKind,
        found: Option<String>,
    },
    /// Identifier in type position that is not in the primitive table.
    UnknownPrimitive(String),
    /// Compile-time keyword the parser has no rule for.
    UnknownCompileKeyword(String),
    /// Keyword that cannot start a top-level declaration.
    UnknownKeyword(String),
    /// Stage-named function with a non-void return type.
    StageReturnType(String),
    /// Stage-named function with a non-empty parameter list.
    StageParameters(String),
    /// `const` initializers need an expression grammar that does not
    /// exist yet.
    UnsupportedExpression,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken {
                expected,
                found: None,
            } => {
                write!(f, "expected {expected}")
            }
            Self::UnexpectedToken {
                expected,
                found: Some(found),
            } => {
                write!(f, "expected {expected}, got '{found}'")
            }
            Self::UnknownPrimitive(name) => {
                write!(f, "unrecognized primitive type '{name}'")
            }
            Self::UnknownCompileKeyword(name) => {
                write!(f, "unrecognized compile-time keyword '{name}'")
            }
            Self::UnknownKeyword(name) => {
                write!(f, "unrecognized keyword '{name}'")
            }
            Self::StageReturnType(name) => {
                write!(f, "the stage function '{name}' should have a void return type")
            }
            Self::StageParameters(name) => {
                write!(f, "the stage function '{name}' should have no parameters")
            }
            Self::UnsupportedExpression => {
                write!(f, "expression parsing is not yet supported")
            }
        }
    }
}

/// Error produced during parsing.
///
/// `position` and `lexeme` refer to the last successfully consumed token,
/// the point the grammar had reached when it failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at {position} near '{lexeme}'")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: LinePosition,
    pub lexeme: String,
}

/// Parse a token stream into a [`CompilationUnit`].
///
/// # Errors
///
/// Returns `ParseError` on any expected-token mismatch, unresolved
/// primitive type, or stage-signature violation. No partial tree is
/// ever returned.
pub fn parse(tokens: &[Token]) -> Result<CompilationUnit, ParseError> {
    Parser::new(tokens).parse()
}

/// Recursive-descent parser over an immutable token slice with an
/// explicit read cursor and one token of lookahead. No backtracking.
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Last consumed token, used to attach position context to errors.
    last: Option<&'a Token>,
}

impl<'a> Parser<'a> {
    const fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            last: None,
        }
    }

    fn parse(mut self) -> Result<CompilationUnit, ParseError> {
        let mut nodes = Vec::new();

        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::CompileKeyword => nodes.push(self.parse_compile_directive()?),
                TokenKind::Keyword => nodes.push(self.parse_keyword_declaration()?),
                TokenKind::Identifier => nodes.push(self.parse_stage_or_function()?),
                // defensive skip: semicolons, stray comments
                _ => self.discard(),
            }
        }

        Ok(partition(nodes))
    }

    fn parse_compile_directive(&mut self) -> Result<Declaration, ParseError> {
        let token = self.consume(TokenKind::CompileKeyword)?;

        match token.text() {
            Some("include") => Ok(Declaration::Include(self.parse_include()?)),
            Some("shader_type") => Ok(Declaration::ShaderType(self.parse_shader_type()?)),

            other => Err(self.error(ParseErrorKind::UnknownCompileKeyword(
                other.unwrap_or_default().to_string(),
            ))),
        }
    }

    fn parse_keyword_declaration(&mut self) -> Result<Declaration, ParseError> {
        let token = self.consume(TokenKind::Keyword)?;

        match token.text() {
            Some("uniform") => Ok(Declaration::Uniform(self.parse_uniform()?)),
            Some("varying") => Ok(Declaration::Varying(self.parse_varying()?)),
            Some("const") => Ok(Declaration::Constant(self.parse_constant()?)),

            other => Err(self.error(ParseErrorKind::UnknownKeyword(
                other.unwrap_or_default().to_string(),
            ))),
        }
    }

    /// Shared grammar for stages and ordinary functions; the name decides
    /// which node is built, with stage signatures re-validated afterwards.
    fn parse_stage_or_function(&mut self) -> Result<Declaration, ParseError> {
        let return_type = self.parse_primitive()?;
        let name = self.parse_identifier()?;
        let parameters = self.parse_parameters()?;
        let statements = self.parse_statements()?;

        let Some(kind) = StageKind::from_name(&name) else {
            return Ok(Declaration::Function(FunctionDeclaration {
                return_type,
                name,
                parameters,
                statements,
            }));
        };

        if !return_type.is_void() {
            return Err(self.error(ParseErrorKind::StageReturnType(name)));
        }
        if !parameters.is_empty() {
            return Err(self.error(ParseErrorKind::StageParameters(name)));
        }

        Ok(Declaration::Stage(StageDeclaration { kind, statements }))
    }

    fn parse_include(&mut self) -> Result<Include, ParseError> {
        let path = self.consume_text(TokenKind::String)?.to_string();

        Ok(Include { path })
    }

    fn parse_shader_type(&mut self) -> Result<ShaderTypeDeclaration, ParseError> {
        let name = self.parse_identifier()?;

        Ok(ShaderTypeDeclaration { name })
    }

    fn parse_uniform(&mut self) -> Result<UniformDeclaration, ParseError> {
        let ty = self.parse_primitive()?;
        let name = self.parse_identifier()?;

        Ok(UniformDeclaration { ty, name })
    }

    fn parse_varying(&mut self) -> Result<VaryingDeclaration, ParseError> {
        let ty = self.parse_primitive()?;
        let name = self.parse_identifier()?;

        Ok(VaryingDeclaration { ty, name })
    }

    fn parse_constant(&mut self) -> Result<ConstantDeclaration, ParseError> {
        let ty = self.parse_primitive()?;
        let name = self.parse_identifier()?;
        let value = self.parse_expression()?;

        Ok(ConstantDeclaration { ty, name, value })
    }

    /// Placeholder: the expression grammar is a planned extension, so a
    /// `const` initializer cannot be finished yet.
    fn parse_expression(&self) -> Result<Expression, ParseError> {
        Err(self.error(ParseErrorKind::UnsupportedExpression))
    }

    fn parse_parameters(&mut self) -> Result<Vec<Parameter>, ParseError> {
        let mut parameters = Vec::new();

        self.consume(TokenKind::LeftParen)?;

        while !self.peek_kind(TokenKind::RightParen) {
            let ty = self.parse_primitive()?;
            let name = self.parse_identifier()?;
            parameters.push(Parameter { ty, name });

            if self.peek_kind(TokenKind::Comma) {
                self.discard();
            }
        }

        self.consume(TokenKind::RightParen)?;

        Ok(parameters)
    }

    fn parse_statements(&mut self) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();

        self.consume(TokenKind::LeftBrace)?;

        while !self.peek_kind(TokenKind::RightBrace) {
            // comments are the only statement form recognized so far
            let comment = self.consume_text(TokenKind::Comment)?.to_string();
            statements.push(Statement::Comment(comment));
        }

        self.consume(TokenKind::RightBrace)?;

        Ok(statements)
    }

    fn parse_primitive(&mut self) -> Result<Primitive, ParseError> {
        let name = self.consume_text(TokenKind::Identifier)?;

        Primitive::resolve(name)
            .ok_or_else(|| self.error(ParseErrorKind::UnknownPrimitive(name.to_string())))
    }

    fn parse_identifier(&mut self) -> Result<String, ParseError> {
        Ok(self.consume_text(TokenKind::Identifier)?.to_string())
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|token| token.kind == kind)
    }

    fn discard(&mut self) {
        if let Some(token) = self.peek() {
            self.pos += 1;
            self.last = Some(token);
        }
    }

    fn consume(&mut self, kind: TokenKind) -> Result<&'a Token, ParseError> {
        let next = self.peek();

        if let Some(token) = next {
            if token.kind == kind {
                self.pos += 1;
                self.last = Some(token);
                return Ok(token);
            }
        }

        Err(self.error(ParseErrorKind::UnexpectedToken {
            expected: kind,
            found: next.map(|token| token.lexeme.clone()),
        }))
    }

    /// Consume a token of the given kind and return its decoded text.
    fn consume_text(&mut self, kind: TokenKind) -> Result<&'a str, ParseError> {
        let token = self.consume(kind)?;

        token.text().ok_or_else(|| {
            self.error(ParseErrorKind::UnexpectedToken {
                expected: kind,
                found: Some(token.lexeme.clone()),
            })
        })
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        let (position, lexeme) = self.last.map_or_else(
            || (LinePosition { line: 1, column: 1 }, String::new()),
            |token| (token.position, token.lexeme.clone()),
        );

        ParseError {
            kind,
            position,
            lexeme,
        }
    }
}

/// Partition top-level nodes into the typed lists of a compilation unit;
/// the first `shader_type` wins, absence leaves the default.
fn partition(nodes: Vec<Declaration>) -> CompilationUnit {
    let mut unit = CompilationUnit::default();
    let mut shader_type = None;

    for node in nodes {
        match node {
            Declaration::ShaderType(declaration) => {
                if shader_type.is_none() {
                    shader_type = Some(declaration);
                }
            }
            Declaration::Include(declaration) => unit.includes.push(declaration),
            Declaration::Uniform(declaration) => unit.uniforms.push(declaration),
            Declaration::Varying(declaration) => unit.varyings.push(declaration),
            Declaration::Constant(declaration) => unit.constants.push(declaration),
            Declaration::Function(declaration) => unit.functions.push(declaration),
            Declaration::Stage(declaration) => unit.stages.push(declaration),
        }
    }

    if let Some(declaration) = shader_type {
        unit.shader_type = declaration;
    }

    unit
}
