//! CPython as the parser.
//!
//! `python3` runs a small script that walks `ast.parse` output and prints
//! it as JSON in the shape [`pygo_py::Module`] deserializes. Syntax errors
//! come back as an unsupported statement, so they surface as
//! [`BuildError::UnsupportedConstruct`](crate::BuildError) like any other
//! construct the transpiler cannot take.

use std::io::Write;
use std::process::{Command, Stdio};

use pygo_py::Module;
use thiserror::Error;
use tracing::debug;

/// The script handed to `python3 -c`.
const DUMP_AST: &str = include_str!("frontend/dump_ast.py");

/// Knobs for [`parse`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrontendOptions {
    /// Python 3.9 or newer.
    pub python3: String,
}

impl Default for FrontendOptions {
    fn default() -> Self {
        FrontendOptions {
            python3: "python3".to_owned(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FrontendError {
    #[error("could not start `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("`{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("malformed AST dump: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Parse `source` with the configured interpreter.
pub fn parse(source: &str, options: &FrontendOptions) -> Result<Module, FrontendError> {
    let program = &options.python3;
    let mut child = Command::new(program)
        .arg("-c")
        .arg(DUMP_AST)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| FrontendError::Spawn {
            program: program.clone(),
            source,
        })?;
    // The script reads all of stdin before writing anything.
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(source.as_bytes())?;
    }
    let output = child.wait_with_output()?;
    if !output.status.success() {
        return Err(FrontendError::Failed {
            program: program.clone(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        });
    }
    debug!(bytes = output.stdout.len(), "AST dump received");
    decode(&String::from_utf8_lossy(&output.stdout))
}

/// Deserialize a dump produced by the parser script.
pub fn decode(json: &str) -> Result<Module, FrontendError> {
    Ok(serde_json::from_str(json)?)
}
