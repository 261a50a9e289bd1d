use serde::{Deserialize, Serialize};

use meshplan_physics::DEFAULT_K_FACTOR;

/// Runtime configuration, loadable from a YAML file (`--config`) and
/// overridable per-field from the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshplanConfig {
    pub frequency_mhz: f64,
    pub tx_height_m: f64,
    pub rx_height_m: f64,
    pub k_factor: f64,
    pub clutter_height_m: f64,
    pub zoom: u8,
    pub tile_source: String,
    pub log_level: String,
}

impl Default for MeshplanConfig {
    fn default() -> Self {
        Self {
            frequency_mhz: 915.0,
            tx_height_m: 10.0,
            rx_height_m: 2.0,
            k_factor: DEFAULT_K_FACTOR,
            clutter_height_m: 0.0,
            zoom: meshplan_terrain::DEFAULT_ZOOM,
            tile_source: "https://example-tiles.invalid/dem".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl MeshplanConfig {
    pub fn load(path: Option<&std::path::Path>) -> Result<Self, crate::error::CliError> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                Ok(serde_yaml::from_str(&text)?)
            }
            None => Ok(Self::default()),
        }
    }
}
