//! The fixed-point driver.
//!
//! Stage 0 and stage 1 run until the number of `interface{}` nodes left in
//! the file stops going down. Later iterations skip the passes that must
//! only run once. Stage 2 runs after that, once.

use pygo_ir::{GoArena, NodeId, NodeKind, Token};
use thiserror::Error;
use tracing::{debug, warn};

use crate::passes;
use crate::walk::{walk, Pass};

/// Knobs for [`run`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Iterations allowed before giving up with
    /// [`PipelineError::ConvergenceFailure`].
    pub max_iterations: usize,
    /// Fail on names whose type never became known instead of leaving
    /// them `interface{}`.
    pub strict_types: bool,
    /// Also keep iterating while the tree still changes shape, even when
    /// the `interface{}` count holds steady.
    pub hash_convergence: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            max_iterations: 32,
            strict_types: false,
            hash_convergence: false,
        }
    }
}

/// What a successful run did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Iterations of stages 0 and 1.
    pub iterations: usize,
    /// `interface{}` count after each iteration.
    pub interfaces: Vec<usize>,
    /// Names left without a type. Empty under `strict_types`.
    pub unresolved: Vec<String>,
}

/// Why the pipeline gave up.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("types still changing after {iterations} iterations ({remaining} interface{{}} left)")]
    ConvergenceFailure { iterations: usize, remaining: usize },
    #[error("could not infer a type for {}", .names.join(", "))]
    TypeResolutionDeadlock { names: Vec<String> },
    /// A Python operator (`in`, `is`, `**`, `//`) that no pass could lower,
    /// usually because an operand's type never became known.
    #[error("no Go form for `{op}` in `{excerpt}`")]
    UnloweredOperator { op: String, excerpt: String },
}

/// Run every stage over the file at `root`.
///
/// # Errors
///
/// [`PipelineError::ConvergenceFailure`] when stages 0 and 1 are still
/// making progress after `max_iterations`, and
/// [`PipelineError::TypeResolutionDeadlock`] under `strict_types` when a
/// declared name never got a type, and [`PipelineError::UnloweredOperator`]
/// when a Python-only operator is still in the tree at the end.
#[tracing::instrument(level = "debug", skip_all)]
pub fn run(
    arena: &mut GoArena,
    root: NodeId,
    options: &PipelineOptions,
) -> Result<PipelineReport, PipelineError> {
    let mut report = PipelineReport::default();
    let mut remaining = arena.count_interfaces(root);
    let mut shape = arena.structural_hash(root);
    let mut unresolved: Vec<String>;

    loop {
        if report.iterations == options.max_iterations {
            return Err(PipelineError::ConvergenceFailure {
                iterations: report.iterations,
                remaining,
            });
        }
        let first = report.iterations == 0;
        report.iterations += 1;

        let mut stage = passes::stage0();
        stage.extend(passes::stage1());
        unresolved = run_stage(arena, root, stage, first);

        let count = arena.count_interfaces(root);
        report.interfaces.push(count);
        debug!(iteration = report.iterations, interfaces = count, "iteration done");

        let mut progressed = count < remaining;
        if options.hash_convergence {
            let next = arena.structural_hash(root);
            progressed |= next != shape;
            shape = next;
        }
        remaining = count;
        if !progressed {
            break;
        }
    }

    run_stage(arena, root, passes::stage2(), true);
    if let Some((op, id)) = leftover_operator(arena, root) {
        let op = op.text().to_owned();
        let excerpt = arena.sketch(id);
        warn!(%op, %excerpt, "operator left unlowered");
        return Err(PipelineError::UnloweredOperator { op, excerpt });
    }

    unresolved.sort();
    unresolved.dedup();
    if !unresolved.is_empty() {
        if options.strict_types {
            return Err(PipelineError::TypeResolutionDeadlock { names: unresolved });
        }
        warn!(names = ?unresolved, "leaving unresolved names as interface{{}}");
        report.unresolved = unresolved;
    }
    debug!(
        iterations = report.iterations,
        interfaces = remaining,
        "pipeline converged"
    );
    Ok(report)
}

/// First binary expression still using a placeholder operator.
fn leftover_operator(arena: &GoArena, root: NodeId) -> Option<(Token, NodeId)> {
    arena
        .descendants(root)
        .into_iter()
        .find_map(|id| match arena.kind(id) {
            NodeKind::BinaryExpr { op, .. } if op.is_placeholder() => Some((*op, id)),
            _ => None,
        })
}

/// Walk each pass in order. Passes that must run once are skipped unless
/// `first`. Returns the names the last scoped walk could not type.
fn run_stage(
    arena: &mut GoArena,
    root: NodeId,
    stage: Vec<Box<dyn Pass>>,
    first: bool,
) -> Vec<String> {
    let mut unresolved = Vec::new();
    for mut pass in stage {
        if !first && !pass.repeatable() {
            continue;
        }
        let report = walk(arena, root, pass.as_mut());
        if pass.scoped() {
            unresolved = report.unresolved;
        }
    }
    unresolved
}

#[cfg(test)]
mod tests;
