//! Turning a bridge dump into Go source.
//!
//! The transpiler never prints Go itself. [`GoToolchain`] compiles the
//! printer program from [`bridge::program`], runs it, and pipes the output
//! through `goimports` and `gofumpt`. Tests substitute their own
//! [`Renderer`].

use std::ffi::OsStr;
use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::{debug, warn};

use crate::bridge;

/// Formats a `go/ast` dump as Go source.
pub trait Renderer {
    fn render(&self, dump: &str) -> Result<String, RenderError>;
}

/// Executables used by [`GoToolchain`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    pub go: String,
    pub goimports: String,
    pub gofumpt: String,
    /// Echo the generated printer program to stderr.
    pub debug: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            go: "go".to_owned(),
            goimports: "goimports".to_owned(),
            gofumpt: "gofumpt".to_owned(),
            debug: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
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
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The installed Go toolchain.
#[derive(Clone, Debug, Default)]
pub struct GoToolchain {
    options: RenderOptions,
}

impl GoToolchain {
    pub fn new(options: RenderOptions) -> Self {
        GoToolchain { options }
    }

    /// Pipe `code` through an optional formatter. A formatter that is not
    /// installed is skipped.
    fn format(&self, formatter: &str, code: String) -> Result<String, RenderError> {
        match pipe(formatter, &[], Some(&code)) {
            Ok(formatted) => Ok(formatted),
            Err(RenderError::Spawn { source, .. }) if source.kind() == ErrorKind::NotFound => {
                warn!(formatter, "formatter not found; leaving output as printed");
                Ok(code)
            }
            Err(err) => Err(err),
        }
    }
}

impl Renderer for GoToolchain {
    #[tracing::instrument(level = "debug", skip_all)]
    fn render(&self, dump: &str) -> Result<String, RenderError> {
        let source = bridge::program(dump);
        if self.options.debug {
            eprintln!("=== Start Printer Program ===");
            let width = source.lines().count().to_string().len();
            for (i, line) in source.lines().enumerate() {
                eprintln!("{:>width$} {line}", i + 1);
            }
            eprintln!("=== End Printer Program ===");
        }

        let mut file = tempfile::Builder::new()
            .prefix("pygo-printer-")
            .suffix(".go")
            .tempfile()?;
        file.write_all(source.as_bytes())?;
        file.flush()?;

        let printed = pipe(
            &self.options.go,
            &[OsStr::new("run"), file.path().as_os_str()],
            None,
        )?;
        debug!(bytes = printed.len(), "printer program ran");

        let code = self.format(&self.options.goimports, printed)?;
        self.format(&self.options.gofumpt, code)
    }
}

/// Run `program`, feed it `input`, and return its stdout.
fn pipe(program: &str, args: &[&OsStr], input: Option<&str>) -> Result<String, RenderError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| RenderError::Spawn {
            program: program.to_owned(),
            source,
        })?;
    if let (Some(input), Some(mut stdin)) = (input, child.stdin.take()) {
        stdin.write_all(input.as_bytes())?;
    }
    let output = child.wait_with_output()?;
    if !output.status.success() {
        return Err(RenderError::Failed {
            program: program.to_owned(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
