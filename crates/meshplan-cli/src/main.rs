//! # meshplan-cli
//!
//! Command-line front end over the mesh site-planning engine's core
//! crates. Subcommands mirror the programmatic surface the core exposes
//! to the fuller system's HTTP/job-queue shells, which this workspace does
//! not implement.

mod cli;
mod config;
mod error;

use std::sync::Arc;

use clap::Parser;
use meshplan_common::{Candidate, Coordinate, NodeConfig, ScoringWeights};
use meshplan_coverage::{run_coverage, score_candidates, CoverageParams};
use meshplan_physics::{calculate_link, PathLossModel};
use meshplan_terrain::{encode_terrain_rgb, FileTileSource, HttpTileSource, TerrainManager};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use config::MeshplanConfig;
use error::CliError;

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn build_terrain_manager(config: &MeshplanConfig) -> TerrainManager {
    if let Some(dir) = config.tile_source.strip_prefix("file://") {
        TerrainManager::with_zoom(Box::new(FileTileSource::new(dir)), config.zoom)
    } else {
        TerrainManager::with_zoom(Box::new(HttpTileSource::new(&config.tile_source)), config.zoom)
    }
}

fn merge_overrides(mut config: MeshplanConfig, cli: &Cli) -> MeshplanConfig {
    if let Some(v) = cli.frequency {
        config.frequency_mhz = v;
    }
    if let Some(v) = cli.tx_height {
        config.tx_height_m = v;
    }
    if let Some(v) = cli.rx_height {
        config.rx_height_m = v;
    }
    if let Some(v) = cli.k_factor {
        config.k_factor = v;
    }
    if let Some(v) = cli.clutter {
        config.clutter_height_m = v;
    }
    if let Some(v) = cli.zoom {
        config.zoom = v;
    }
    if let Some(v) = &cli.tile_source {
        config.tile_source = v.clone();
    }
    if let Some(v) = &cli.log_level {
        config.log_level = v.clone();
    }
    config
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let config = merge_overrides(MeshplanConfig::load(cli.config.as_deref())?, &cli);
    init_logging(&config.log_level);
    meshplan_common::telemetry::describe_metrics();

    let tm = Arc::new(build_terrain_manager(&config));

    match &cli.command {
        Command::Elevation { lat, lon } => {
            let coord = Coordinate::new(*lat, *lon)?;
            let elevation = tm.get_elevation(coord).await?;
            println!("{}", serde_json::json!({ "elevation_m": elevation }));
        }
        Command::Link { tx_lat, tx_lon, rx_lat, rx_lon } => {
            let tx = Coordinate::new(*tx_lat, *tx_lon)?;
            let rx = Coordinate::new(*rx_lat, *rx_lon)?;
            let profile = tm.get_elevation_profile(tx, rx, 50).await;
            let elevations: Vec<f32> = profile.iter().map(|e| e.unwrap_or(0.0)).collect();
            let distance = meshplan_physics::haversine_distance(tx, rx);
            let report = calculate_link(
                &elevations,
                distance,
                config.frequency_mhz,
                config.tx_height_m,
                config.rx_height_m,
                PathLossModel::Bullington,
                None,
                config.k_factor,
                config.clutter_height_m,
            )?;
            println!(
                "{}",
                serde_json::json!({
                    "dist_km": report.result.distance_km,
                    "status": format!("{:?}", report.result.status),
                    "min_clearance_ratio": report.result.min_clearance_ratio,
                    "path_loss_db": report.result.path_loss_db,
                    "profile": report.profile,
                    "model_used": format!("{:?}", report.model_used),
                })
            );
        }
        Command::Viewshed { lat, lon, radius } => {
            let tx = Coordinate::new(*lat, *lon)?;
            let viewshed = meshplan_viewshed::calculate_viewshed(
                &tm,
                tx,
                config.tx_height_m,
                *radius,
                config.rx_height_m,
                config.frequency_mhz,
                30.0,
                config.k_factor,
                config.clutter_height_m,
            )
            .await?;
            println!(
                "{}",
                serde_json::json!({
                    "rows": viewshed.rows,
                    "cols": viewshed.cols,
                    "visible_count": viewshed.visible_count(),
                })
            );
        }
        Command::Coverage { nodes, radius, optimize_n } => {
            let text = std::fs::read_to_string(nodes)?;
            let nodes: Vec<NodeConfig> = serde_json::from_str(&text)?;

            let mut params = CoverageParams::new(nodes, *radius, config.frequency_mhz, config.rx_height_m);
            params.k = config.k_factor;
            params.clutter = config.clutter_height_m;
            params.optimize_n = *optimize_n;

            let report = run_coverage(&tm, params, None).await?;
            println!(
                "{}",
                serde_json::json!({
                    "selected_count": report.results.len(),
                    "total_unique_coverage_km2": report.total_unique_coverage_km2,
                    "link_count": report.inter_node_links.len(),
                })
            );
        }
        Command::Score { candidates, existing } => {
            let text = std::fs::read_to_string(candidates)?;
            let candidates: Vec<Candidate> = serde_json::from_str(&text)?;

            let existing_nodes: Vec<NodeConfig> = match existing {
                Some(path) => {
                    let text = std::fs::read_to_string(path)?;
                    serde_json::from_str(&text)?
                }
                None => Vec::new(),
            };

            let scored = score_candidates(
                &tm,
                candidates,
                ScoringWeights::default(),
                &existing_nodes,
                config.frequency_mhz,
                config.clutter_height_m,
            )
            .await;
            println!("{}", serde_json::to_string_pretty(&scored).unwrap_or_default());
        }
        Command::TerrainTile { z, x, y } => {
            let grid = tm.get_terrain_tile(*z, *x, *y).await?;
            let rgb: Vec<[u8; 3]> = grid.iter().map(|&h| encode_terrain_rgb(h as f64)).collect();
            println!(
                "{}",
                serde_json::json!({
                    "z": z,
                    "x": x,
                    "y": y,
                    "size": 256,
                    "pixels": rgb,
                })
            );
        }
    }

    Ok(())
}
