//! CLI tool to validate shader sources and inspect their token streams.

use std::fs;
use std::process::ExitCode;

use shadelang::CancelToken;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        eprintln!("Usage: shadelang <command> [files...]");
        eprintln!();
        eprintln!("Commands:");
        eprintln!("  validate  Check if shader source(s) parse");
        eprintln!("  tokens    Dump the token stream of shader source(s)");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  shadelang validate sprite.shader");
        eprintln!("  shadelang tokens sprite.shader");
        return ExitCode::from(2);
    }

    let command = args[1].as_str();
    let files = &args[2..];

    if files.is_empty() {
        eprintln!("Error: no files specified");
        return ExitCode::from(2);
    }

    let mut had_error = false;

    for path in files {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{path}: {e}");
                had_error = true;
                continue;
            }
        };

        match command {
            "validate" => {
                match shadelang::parse_shader(path, content.lines(), &CancelToken::new()) {
                    Ok(unit) => {
                        let uniforms = unit.uniforms.len();
                        let varyings = unit.varyings.len();
                        let functions = unit.functions.len();
                        let stages = unit.stages.len();
                        eprintln!(
                            "{path}: valid '{}' shader ({uniforms} uniform(s), \
                             {varyings} varying(s), {functions} function(s), \
                             {stages} stage(s))",
                            unit.shader_type.name
                        );
                    }
                    Err(e) => {
                        eprintln!("{e}");
                        had_error = true;
                    }
                }
            }
            "tokens" => match shadelang::tokenize(&content) {
                Ok(tokens) => {
                    for token in tokens {
                        println!("{path}:{} {:?} {}", token.position, token.kind, token.lexeme);
                    }
                }
                Err(e) => {
                    eprintln!("{path}: {e}");
                    had_error = true;
                }
            },
            _ => {
                eprintln!("Unknown command: {command}");
                return ExitCode::from(2);
            }
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
