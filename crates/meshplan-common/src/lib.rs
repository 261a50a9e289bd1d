//! # meshplan-common
//!
//! Shared value types for the mesh site-planning engine: geographic
//! coordinates, tile keys, node/site configuration, scoring candidates, and
//! link-analysis results. Every other crate in the workspace depends on
//! this one; it has no dependency on terrain, physics, or viewshed logic
//! itself.

mod candidate;
mod error;
mod geo;
mod link;
mod site;
pub mod telemetry;

pub use candidate::{Candidate, ScoringWeights};
pub use error::CommonError;
pub use geo::{Coordinate, ElevationSample, TileKey, EARTH_RADIUS_M};
pub use link::{LinkResult, LinkStatus};
pub use site::{NodeConfig, Site};
