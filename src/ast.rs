//! Immutable syntax-tree value types for one parsed shader source.
//!
//! Nodes are created once by the parser and never mutated; two nodes with
//! equal fields are interchangeable.

/// Shader type assumed when a source carries no `#shader_type` directive.
pub const DEFAULT_SHADER_TYPE: &str = "sprite";

/// Fully parsed shader source: the root of the syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    /// The first `#shader_type` directive, or the fixed default.
    pub shader_type: ShaderTypeDeclaration,
    pub includes: Vec<Include>,
    pub uniforms: Vec<UniformDeclaration>,
    pub varyings: Vec<VaryingDeclaration>,
    pub constants: Vec<ConstantDeclaration>,
    pub functions: Vec<FunctionDeclaration>,
    pub stages: Vec<StageDeclaration>,
}

impl Default for CompilationUnit {
    fn default() -> Self {
        Self {
            shader_type: ShaderTypeDeclaration {
                name: DEFAULT_SHADER_TYPE.to_string(),
            },
            includes: Vec::new(),
            uniforms: Vec::new(),
            varyings: Vec::new(),
            constants: Vec::new(),
            functions: Vec::new(),
            stages: Vec::new(),
        }
    }
}

/// `#shader_type <name>` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderTypeDeclaration {
    pub name: String,
}

/// `#include "<path>"` directive; recorded verbatim, never resolved here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Include {
    pub path: String,
}

/// `uniform <type> <name>` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformDeclaration {
    pub ty: Primitive,
    pub name: String,
}

/// `varying <type> <name>` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaryingDeclaration {
    pub ty: Primitive,
    pub name: String,
}

/// `const <type> <name> = <value>` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantDeclaration {
    pub ty: Primitive,
    pub name: String,
    pub value: Expression,
}

/// Ordinary function: return type, name, parameters, body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDeclaration {
    pub return_type: Primitive,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub statements: Vec<Statement>,
}

/// Pipeline entry function: a zero-parameter, void-returning function
/// whose name matched one of the fixed stage names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageDeclaration {
    pub kind: StageKind,
    pub statements: Vec<Statement>,
}

/// The three pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Vertex,
    Fragment,
    Geometry,
}

impl StageKind {
    /// Match a declaration name against the fixed stage names.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "vertex" => Some(Self::Vertex),
            "fragment" => Some(Self::Fragment),
            "geometry" => Some(Self::Geometry),
            _ => None,
        }
    }
}

/// A single typed function parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub ty: Primitive,
    pub name: String,
}

/// A scalar or vector primitive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Primitive {
    pub scalar: ScalarKind,
    /// 1 for scalars, 2..=4 for vectors.
    pub components: u8,
}

impl Primitive {
    #[must_use]
    pub const fn new(scalar: ScalarKind, components: u8) -> Self {
        Self { scalar, components }
    }

    #[must_use]
    pub const fn is_void(self) -> bool {
        matches!(self.scalar, ScalarKind::Void)
    }

    /// Resolve a source spelling against the closed primitive table.
    #[must_use]
    pub fn resolve(name: &str) -> Option<Self> {
        let primitive = match name {
            "void" => Self::new(ScalarKind::Void, 1),
            "bool" => Self::new(ScalarKind::Bool, 1),
            "bool2" => Self::new(ScalarKind::Bool, 2),
            "bool3" => Self::new(ScalarKind::Bool, 3),
            "bool4" => Self::new(ScalarKind::Bool, 4),
            "int" => Self::new(ScalarKind::Int, 1),
            "int2" => Self::new(ScalarKind::Int, 2),
            "int3" => Self::new(ScalarKind::Int, 3),
            "int4" => Self::new(ScalarKind::Int, 4),
            "float" => Self::new(ScalarKind::Float, 1),
            "vec2" => Self::new(ScalarKind::Float, 2),
            "vec3" => Self::new(ScalarKind::Float, 3),
            "vec4" => Self::new(ScalarKind::Float, 4),
            _ => return None,
        };

        Some(primitive)
    }
}

/// Scalar element kind of a [`Primitive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Void,
    Bool,
    Int,
    Float,
}

/// A statement inside a function or stage body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// A line comment; the only statement form recognized so far.
    Comment(String),
}

/// A value expression.
///
/// Uninhabited: no expression grammar exists yet, so no expression node
/// can be built and `const` declarations cannot be completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {}

/// Any node the top level of a shader source can produce.
///
/// The parser partitions these into the typed lists of a
/// [`CompilationUnit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    ShaderType(ShaderTypeDeclaration),
    Include(Include),
    Uniform(UniformDeclaration),
    Varying(VaryingDeclaration),
    Constant(ConstantDeclaration),
    Function(FunctionDeclaration),
    Stage(StageDeclaration),
}
