//! pygoc CLI
//!
//! Python in, Go out.

use pygoc::cli::{execute, parse_args, print_usage, Command};

fn main() {
    pygoc::tracing_setup::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        print_usage();
        return;
    }

    let command = match parse_args(&args, |key| std::env::var(key).ok()) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!("Usage: pygoc <input.py> [-o out.go] [options]");
            eprintln!("Run `pygoc --help` for the full list of options.");
            std::process::exit(2);
        }
    };

    match command {
        Command::Help => print_usage(),
        Command::Version => println!("pygoc {}", env!("CARGO_PKG_VERSION")),
        Command::Transpile(options) => {
            if let Err(err) = execute(&options) {
                eprintln!("error: {err}");
                if err.is_unsupported() {
                    eprintln!("note: this construct has no Go translation yet");
                } else if err.is_type_error() {
                    eprintln!("note: try --max-iterations=<n> or drop --strict-types");
                } else if err.is_environment() {
                    eprintln!("note: --python= and --go= select the tools to run");
                }
                std::process::exit(1);
            }
        }
    }
}
