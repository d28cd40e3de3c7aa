//! Tracing subscriber setup.
//!
//! Nothing is installed unless `RUST_LOG` is set, so a plain run stays
//! silent. `PYGO_LOG_TREE` swaps the flat formatter for an indented tree
//! that follows the pipeline's spans (iterations, passes).
//!
//! ```text
//! RUST_LOG=pygo_passes=debug pygoc prog.py
//! RUST_LOG=debug PYGO_LOG_TREE=1 pygoc prog.py
//! ```

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tracing_tree::HierarchicalLayer;

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        if std::env::var_os("RUST_LOG").is_none() {
            return;
        }
        let tree = std::env::var_os("PYGO_LOG_TREE").is_some();
        let installed = tracing_subscriber::registry()
            .with(EnvFilter::from_default_env())
            .with(tree.then(|| {
                HierarchicalLayer::new(2)
                    .with_targets(true)
                    .with_writer(std::io::stderr)
            }))
            .with((!tree).then(|| {
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr)
            }))
            .try_init();
        if let Err(err) = installed {
            eprintln!("warning: tracing already initialized: {err}");
        }
    });
}
