//! # meshplan-coverage
//!
//! Composition layer over terrain, physics, and viewshed: greedy submodular
//! coverage selection, the inter-node link graph, the composite raster,
//! and the candidate-scoring surface (prominence, Fresnel clearance,
//! normalised weighted score).

mod composite;
mod error;
mod grid;
mod link_graph;
mod report;
mod scoring;
mod selector;

pub use composite::{build_composite, Composite};
pub use error::CoverageError;
pub use grid::MasterGrid;
pub use link_graph::{build_link_graph, connectivity_scores, NodeLink};
pub use report::{run_coverage, CoverageParams, CoverageReport, NodeResult, ProgressEvent};
pub use scoring::{apply_scores, calculate_prominence, check_fresnel_clearance, score_candidates};
pub use selector::{greedy_select, marginal_coverage_report, total_union_pixels, MarginalCoverage};
