use serde::{Deserialize, Serialize};

use crate::error::CommonError;
use crate::geo::Coordinate;

/// A candidate or committed mesh node: a location plus antenna/radio
/// parameters needed by the physics and viewshed layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    pub position: Coordinate,
    /// Antenna height above ground in metres.
    pub height_m: f64,
    pub name: Option<String>,
}

impl NodeConfig {
    pub fn new(position: Coordinate, height_m: f64) -> Result<Self, CommonError> {
        if !height_m.is_finite() || height_m <= 0.0 {
            return Err(CommonError::InvalidHeight(height_m));
        }
        Ok(Self {
            position,
            height_m,
            name: None,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A committed site: a [`NodeConfig`] that has been selected into the
/// deployment (as opposed to a candidate still being scored).
pub type Site = NodeConfig;
