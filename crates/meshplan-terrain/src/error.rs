use meshplan_common::TileKey;
use thiserror::Error;

/// Errors from the terrain tile manager: one structured variant per
/// failure mode, plus `#[from]` wrapping for underlying I/O errors.
#[derive(Debug, Error, Clone)]
pub enum TerrainError {
    #[error("tile {0:?} is unavailable from the configured source")]
    TileUnavailable(TileKey),

    #[error("tile {0:?} could not be decoded: {1}")]
    TileCorrupt(TileKey, String),

    #[error("coordinate ({lat}, {lon}) is out of domain")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("no elevation data at ({lat}, {lon})")]
    NoData { lat: f64, lon: f64 },

    #[error("zoom level {0} is out of the supported range")]
    InvalidZoom(u8),

    #[error("non-finite value produced during interpolation")]
    InternalNumeric,

    #[error("tile request failed: {0}")]
    Http(String),

    #[error("tile I/O failed: {0}")]
    Io(String),
}

impl From<reqwest::Error> for TerrainError {
    fn from(err: reqwest::Error) -> Self {
        TerrainError::Http(err.to_string())
    }
}

impl From<std::io::Error> for TerrainError {
    fn from(err: std::io::Error) -> Self {
        TerrainError::Io(err.to_string())
    }
}

impl From<tiff::TiffError> for TerrainError {
    fn from(err: tiff::TiffError) -> Self {
        TerrainError::Io(err.to_string())
    }
}
