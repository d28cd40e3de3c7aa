#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;

use pretty_assertions::assert_eq;

use super::{execute, parse_args, CliOptions, Command};
use crate::BuildError;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|&a| a.to_owned()).collect()
}

fn no_env(_: &str) -> Option<String> {
    None
}

fn transpile(command: Command) -> CliOptions {
    match command {
        Command::Transpile(options) => options,
        other => panic!("expected a transpile run, got {other:?}"),
    }
}

#[test]
fn input_alone_uses_defaults() {
    let options = transpile(parse_args(&args(&["prog.py"]), no_env).unwrap());
    assert_eq!(
        options,
        CliOptions {
            input: PathBuf::from("prog.py"),
            ..CliOptions::default()
        }
    );
    assert_eq!(options.compile.max_iterations, 32);
    assert_eq!(options.compile.package, "main");
}

#[test]
fn flags_fill_every_option() {
    let options = transpile(
        parse_args(
            &args(&[
                "--strict-types",
                "prog.py",
                "-o",
                "out.go",
                "--dump-ast",
                "--max-iterations=5",
                "--hash-convergence",
                "--package=tool",
                "--python=/usr/bin/python3.12",
                "--go=/opt/go/bin/go",
                "--goimports=gi",
                "--gofumpt=gf",
                "--debug-render",
            ]),
            no_env,
        )
        .unwrap(),
    );
    assert_eq!(options.input, PathBuf::from("prog.py"));
    assert_eq!(options.output, Some(PathBuf::from("out.go")));
    assert!(options.dump_ast);
    assert!(options.compile.strict_types);
    assert!(options.compile.hash_convergence);
    assert_eq!(options.compile.max_iterations, 5);
    assert_eq!(options.compile.package, "tool");
    assert_eq!(options.frontend.python3, "/usr/bin/python3.12");
    assert_eq!(options.render.go, "/opt/go/bin/go");
    assert_eq!(options.render.goimports, "gi");
    assert_eq!(options.render.gofumpt, "gf");
    assert!(options.render.debug);
}

#[test]
fn environment_sets_defaults_and_flags_win() {
    let env = |key: &str| match key {
        "PYGO_PYTHON" => Some("py-from-env".to_owned()),
        "PYGO_GO" => Some("go-from-env".to_owned()),
        "PYGO_MAX_ITERATIONS" => Some("7".to_owned()),
        _ => None,
    };
    let options = transpile(parse_args(&args(&["prog.py"]), env).unwrap());
    assert_eq!(options.frontend.python3, "py-from-env");
    assert_eq!(options.render.go, "go-from-env");
    assert_eq!(options.compile.max_iterations, 7);

    let flags = args(&["prog.py", "--go=go-flag", "--max-iterations=9"]);
    let options = transpile(parse_args(&flags, env).unwrap());
    assert_eq!(options.render.go, "go-flag");
    assert_eq!(options.compile.max_iterations, 9);
}

#[test]
fn bad_iteration_count_in_env_is_ignored() {
    let env = |key: &str| (key == "PYGO_MAX_ITERATIONS").then(|| "lots".to_owned());
    let options = transpile(parse_args(&args(&["prog.py"]), env).unwrap());
    assert_eq!(options.compile.max_iterations, 32);
}

#[test]
fn help_and_version() {
    assert_eq!(parse_args(&args(&["--help"]), no_env), Ok(Command::Help));
    assert_eq!(parse_args(&args(&["prog.py", "-h"]), no_env), Ok(Command::Help));
    assert_eq!(parse_args(&args(&["-V"]), no_env), Ok(Command::Version));
}

#[test]
fn usage_errors() {
    assert_eq!(
        parse_args(&args(&[]), no_env),
        Err("missing input file".to_owned())
    );
    assert_eq!(
        parse_args(&args(&["a.py", "b.py"]), no_env),
        Err("unexpected argument 'b.py'".to_owned())
    );
    assert_eq!(
        parse_args(&args(&["a.py", "--fast"]), no_env),
        Err("unknown option '--fast'".to_owned())
    );
    assert_eq!(
        parse_args(&args(&["a.py", "-o"]), no_env),
        Err("-o needs a path".to_owned())
    );
    assert_eq!(
        parse_args(&args(&["a.py", "--max-iterations=many"]), no_env),
        Err("--max-iterations expects a number, got 'many'".to_owned())
    );
}

#[test]
fn missing_input_file_is_an_io_error() {
    let options = CliOptions {
        input: PathBuf::from("pygo-tests/no/such/file.py"),
        ..CliOptions::default()
    };
    let err = execute(&options).unwrap_err();
    assert!(matches!(err, BuildError::Io(_)), "{err}");
}
