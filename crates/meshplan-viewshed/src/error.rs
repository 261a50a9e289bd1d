use thiserror::Error;

/// Errors from the viewshed engine itself (not swallowed per-pixel
/// failures, which are logged and skipped).
#[derive(Debug, Error)]
pub enum ViewshedError {
    #[error("radius must be finite and positive, got {0} m")]
    InvalidRadius(f64),

    #[error("resolution must be finite and positive, got {0} m")]
    InvalidResolution(f64),

    #[error(transparent)]
    Common(#[from] meshplan_common::CommonError),
}
