use thiserror::Error;

/// Errors from the coverage pipeline (selector, link graph, scoring).
/// Per-candidate and per-pair failures inside the pipeline are handled
/// locally (logged and skipped) rather than surfaced as one
/// of these — these variants are for conditions that make the whole job
/// unable to produce any result at all.
#[derive(Debug, Error)]
pub enum CoverageError {
    #[error("no candidates supplied")]
    NoCandidates,

    #[error("n_select must be at least 1, got {0}")]
    InvalidSelectionCount(usize),

    #[error("job cancelled before completion")]
    JobCancelled,

    #[error(transparent)]
    Viewshed(#[from] meshplan_viewshed::ViewshedError),

    #[error(transparent)]
    Common(#[from] meshplan_common::CommonError),
}
