//! Black-box parser tests over the public API.

mod common;

use common::{parse_failure, parse_source};
use shadelang::{
    Error, ParseErrorKind, Primitive, ScalarKind, StageKind, Statement, TokenKind,
};

#[test]
fn full_set_of_declaration_kinds() {
    let unit = parse_source(
        "#shader_type canvas\n\
         #include \"noise.glsl\"\n\
         uniform float u_time;\n\
         varying vec2 v_uv;\n\
         float wave(float x) { }\n\
         void vertex() { }\n",
    );

    assert_eq!(unit.shader_type.name, "canvas");
    assert_eq!(unit.includes.len(), 1);
    assert_eq!(unit.uniforms.len(), 1);
    assert_eq!(unit.varyings.len(), 1);
    assert_eq!(unit.functions.len(), 1);
    assert_eq!(unit.stages.len(), 1);
    assert!(unit.constants.is_empty());
}

#[test]
fn primitive_table_resolves_vectors() {
    let unit = parse_source(
        "uniform bool4 u_flags;\n\
         uniform int2 u_cell;\n\
         uniform vec3 u_normal;\n",
    );

    assert_eq!(unit.uniforms[0].ty, Primitive::new(ScalarKind::Bool, 4));
    assert_eq!(unit.uniforms[1].ty, Primitive::new(ScalarKind::Int, 2));
    assert_eq!(unit.uniforms[2].ty, Primitive::new(ScalarKind::Float, 3));
}

#[test]
fn all_three_stages() {
    let unit = parse_source("void vertex() { }\nvoid fragment() { }\nvoid geometry() { }\n");
    let kinds: Vec<_> = unit.stages.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![StageKind::Vertex, StageKind::Fragment, StageKind::Geometry]
    );
}

#[test]
fn stage_signature_is_enforced() {
    let err = parse_failure("int vertex() { }");
    assert!(matches!(
        err,
        Error::Parse(e) if e.kind == ParseErrorKind::StageReturnType("vertex".to_string())
    ));

    let err = parse_failure("void vertex(float x) { }");
    assert!(matches!(
        err,
        Error::Parse(e) if e.kind == ParseErrorKind::StageParameters("vertex".to_string())
    ));
}

#[test]
fn stage_named_function_is_not_in_functions_list() {
    let unit = parse_source("void fragment() { }");
    assert!(unit.functions.is_empty());
    assert_eq!(unit.stages.len(), 1);
}

#[test]
fn function_parameters_allow_trailing_comma() {
    let unit = parse_source("vec3 mix3(vec3 a, vec3 b,) { }");
    assert_eq!(unit.functions[0].parameters.len(), 2);
}

#[test]
fn bodies_capture_comments() {
    let unit = parse_source(
        "void fragment() {\n\
         \t// sample the texture\n\
         \t// apply tint\n\
         }\n",
    );

    assert_eq!(
        unit.stages[0].statements,
        vec![
            Statement::Comment("sample the texture".to_string()),
            Statement::Comment("apply tint".to_string()),
        ]
    );
}

#[test]
fn missing_uniform_name_fails() {
    let err = parse_failure("uniform float;");
    assert!(matches!(
        err,
        Error::Parse(e) if matches!(
            e.kind,
            ParseErrorKind::UnexpectedToken { expected: TokenKind::Identifier, .. }
        )
    ));
}

#[test]
fn include_requires_a_string_path() {
    let err = parse_failure("#include common");
    assert!(matches!(
        err,
        Error::Parse(e) if matches!(
            e.kind,
            ParseErrorKind::UnexpectedToken { expected: TokenKind::String, .. }
        )
    ));
}

#[test]
fn error_reports_last_consumed_token() {
    let err = parse_failure("uniform mat4 u_model;");
    let Error::Parse(e) = err else {
        panic!("expected a parse error");
    };
    assert_eq!(e.kind, ParseErrorKind::UnknownPrimitive("mat4".to_string()));
    // the offending spelling was the last token consumed
    assert_eq!(e.lexeme, "mat4");
    assert_eq!(e.position.line, 1);
    assert_eq!(e.position.column, 9);
}

#[test]
fn rendered_diagnostic_contains_position() {
    let err = parse_failure("uniform mat4 u_model;");
    let rendered = err.to_string();
    assert!(rendered.contains("mat4"), "got: {rendered}");
    assert!(rendered.contains("1:9"), "got: {rendered}");
}
