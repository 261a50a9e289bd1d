use serde::{Deserialize, Serialize};

/// Link viability classification, applying the 60%-Fresnel-clearance rule:
/// `min_clearance_ratio < 0.0` is blocked (terrain intrudes into the direct
/// path), `< 0.6` is degraded, otherwise viable. `Unknown` is reserved for
/// pairs whose analysis itself failed rather than a computed clearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkStatus {
    Viable,
    Degraded,
    Blocked,
    Unknown,
}

impl LinkStatus {
    pub fn from_clearance_ratio(ratio: f64) -> Self {
        if ratio < 0.0 {
            LinkStatus::Blocked
        } else if ratio < 0.6 {
            LinkStatus::Degraded
        } else {
            LinkStatus::Viable
        }
    }
}

/// Outcome of analyzing a single point-to-point path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkResult {
    pub distance_km: f64,
    pub status: LinkStatus,
    pub min_clearance_ratio: f64,
    pub path_loss_db: f64,
    /// Index into the sampled elevation profile with the worst clearance,
    /// i.e. the limiting obstruction along the path.
    pub worst_point_index: usize,
}
