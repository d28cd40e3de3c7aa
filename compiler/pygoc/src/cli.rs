//! Command-line handling for the `pygoc` binary.
//!
//! Defaults come from [`CompileOptions`], [`FrontendOptions`] and
//! [`RenderOptions`], then `PYGO_PYTHON`, `PYGO_GO` and
//! `PYGO_MAX_ITERATIONS`, then flags.

use std::path::PathBuf;

use crate::{
    compile, frontend, BuildError, CompileOptions, FrontendOptions, GoToolchain, RenderOptions,
};

/// Everything one transpile run needs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub input: PathBuf,
    /// Write here instead of stdout.
    pub output: Option<PathBuf>,
    /// Emit the `go/ast` literal instead of rendered source.
    pub dump_ast: bool,
    pub compile: CompileOptions,
    pub frontend: FrontendOptions,
    pub render: RenderOptions,
}

/// What the command line asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Version,
    Transpile(CliOptions),
}

/// Parse arguments (without the program name). `env` looks up environment
/// variables.
pub fn parse_args(
    args: &[String],
    env: impl Fn(&str) -> Option<String>,
) -> Result<Command, String> {
    let mut options = CliOptions::default();
    if let Some(python) = env("PYGO_PYTHON") {
        options.frontend.python3 = python;
    }
    if let Some(go) = env("PYGO_GO") {
        options.render.go = go;
    }
    if let Some(n) = env("PYGO_MAX_ITERATIONS") {
        match n.parse() {
            Ok(n) => options.compile.max_iterations = n,
            Err(_) => eprintln!("warning: ignoring PYGO_MAX_ITERATIONS='{n}', not a number"),
        }
    }

    let mut input: Option<PathBuf> = None;
    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        if arg == "-o" {
            let Some(path) = args.get(i + 1) else {
                return Err("-o needs a path".to_owned());
            };
            options.output = Some(PathBuf::from(path));
            i += 2;
            continue;
        }
        if arg == "-h" || arg == "--help" {
            return Ok(Command::Help);
        } else if arg == "-V" || arg == "--version" {
            return Ok(Command::Version);
        } else if let Some(path) = arg
            .strip_prefix("-o=")
            .or_else(|| arg.strip_prefix("--output="))
        {
            options.output = Some(PathBuf::from(path));
        } else if arg == "--dump-ast" {
            options.dump_ast = true;
        } else if arg == "--strict-types" {
            options.compile.strict_types = true;
        } else if arg == "--hash-convergence" {
            options.compile.hash_convergence = true;
        } else if let Some(n) = arg.strip_prefix("--max-iterations=") {
            options.compile.max_iterations = n
                .parse()
                .map_err(|_| format!("--max-iterations expects a number, got '{n}'"))?;
        } else if let Some(package) = arg.strip_prefix("--package=") {
            options.compile.package = package.to_owned();
        } else if let Some(python) = arg.strip_prefix("--python=") {
            options.frontend.python3 = python.to_owned();
        } else if let Some(go) = arg.strip_prefix("--go=") {
            options.render.go = go.to_owned();
        } else if let Some(tool) = arg.strip_prefix("--goimports=") {
            options.render.goimports = tool.to_owned();
        } else if let Some(tool) = arg.strip_prefix("--gofumpt=") {
            options.render.gofumpt = tool.to_owned();
        } else if arg == "--debug-render" {
            options.render.debug = true;
        } else if arg.starts_with('-') {
            return Err(format!("unknown option '{arg}'"));
        } else if input.is_some() {
            return Err(format!("unexpected argument '{arg}'"));
        } else {
            input = Some(PathBuf::from(arg));
        }
        i += 1;
    }

    let Some(input) = input else {
        return Err("missing input file".to_owned());
    };
    options.input = input;
    Ok(Command::Transpile(options))
}

/// Read, transpile and write one file.
pub fn execute(options: &CliOptions) -> Result<(), BuildError> {
    let source = std::fs::read_to_string(&options.input)?;
    let module = frontend::parse(&source, &options.frontend)?;
    let compiled = compile(&module, &options.compile)?;
    let mut text = if options.dump_ast {
        compiled.dump()
    } else {
        compiled.render(&GoToolchain::new(options.render.clone()))?
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }
    match &options.output {
        Some(path) => std::fs::write(path, text)?,
        None => print!("{text}"),
    }
    Ok(())
}

pub fn print_usage() {
    println!("pygoc - translate a Python program to Go");
    println!();
    println!("Usage: pygoc <input.py> [options]");
    println!();
    println!("Options:");
    println!("  -o <path>               Write Go source to <path> (default: stdout)");
    println!("  --dump-ast              Print the go/ast literal instead of source");
    println!("  --max-iterations=<n>    Rewrite iterations before giving up (default: 32)");
    println!("  --strict-types          Fail when a type cannot be inferred");
    println!("  --hash-convergence      Also iterate while the tree changes shape");
    println!("  --package=<name>        Package clause (default: main)");
    println!("  --python=<path>         Python 3 interpreter (default: python3)");
    println!("  --go=<path>             Go toolchain (default: go)");
    println!("  --goimports=<path>      goimports executable");
    println!("  --gofumpt=<path>        gofumpt executable");
    println!("  --debug-render          Echo the generated printer program");
    println!("  -h, --help              Show this help message");
    println!("  -V, --version           Show version information");
    println!();
    println!("Environment:");
    println!("  PYGO_PYTHON, PYGO_GO, PYGO_MAX_ITERATIONS   Defaults for the flags above");
    println!("  RUST_LOG                Enable tracing output (e.g. pygo_passes=debug)");
    println!("  PYGO_LOG_TREE           Print tracing output as an indented tree");
}

#[cfg(test)]
mod tests;
