use thiserror::Error;

/// Errors raised constructing or validating the shared value types.
#[derive(Debug, Error)]
pub enum CommonError {
    #[error("latitude {0} out of range [-90, 90]")]
    InvalidLatitude(f64),

    #[error("longitude {0} out of range [-180, 180]")]
    InvalidLongitude(f64),

    #[error("antenna height {0} m must be positive and finite")]
    InvalidHeight(f64),
}
