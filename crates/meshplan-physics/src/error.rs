use thiserror::Error;

/// Errors raised by the physics kernel. These represent invalid input to a
/// pure function (a programmer error), never a plausible-looking fallback
/// value and never a panic — callers treat an `Err` here as a local
/// per-pixel or per-pair failure.
#[derive(Debug, Error)]
pub enum PhysicsError {
    #[error("distance must be finite and positive, got {0}")]
    InvalidDistance(f64),

    #[error("frequency must be finite and positive, got {0} MHz")]
    InvalidFrequency(f64),

    #[error("elevation profile must contain at least 2 samples, got {0}")]
    ProfileTooShort(usize),

    #[error("d1 + d2 must equal the total path length D (d1={d1}, d2={d2}, D={d})")]
    InconsistentFresnelSplit { d1: f64, d2: f64, d: f64 },

    #[error("hata model requires an environment, none was given")]
    MissingEnvironment,

    #[error("antenna height must be finite and positive, got {0} m")]
    InvalidHeight(f64),
}
