//! # meshplan-viewshed
//!
//! Builds a visibility grid around a transmitter by sampling a coarse
//! elevation profile to every candidate pixel and evaluating it through the
//! RF physics kernel. Row evaluation runs across a `rayon` thread pool,
//! bridging into the async [`meshplan_terrain::TerrainManager`] per pixel.

mod engine;
mod error;

pub use engine::{calculate_viewshed, calculate_viewshed_default, Viewshed};
pub use error::ViewshedError;
