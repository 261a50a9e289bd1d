use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "meshplan", version, about = "Mesh site-planning engine")]
pub struct Cli {
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub frequency: Option<f64>,

    #[arg(long = "tx-height")]
    pub tx_height: Option<f64>,

    #[arg(long = "rx-height")]
    pub rx_height: Option<f64>,

    #[arg(long = "k-factor")]
    pub k_factor: Option<f64>,

    #[arg(long)]
    pub clutter: Option<f64>,

    #[arg(long)]
    pub zoom: Option<u8>,

    #[arg(long = "tile-source")]
    pub tile_source: Option<String>,

    #[arg(long = "log-level")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Single-point elevation lookup.
    Elevation { #[arg(long)] lat: f64, #[arg(long)] lon: f64 },

    /// Point-to-point link analysis.
    Link {
        #[arg(long = "tx-lat")]
        tx_lat: f64,
        #[arg(long = "tx-lon")]
        tx_lon: f64,
        #[arg(long = "rx-lat")]
        rx_lat: f64,
        #[arg(long = "rx-lon")]
        rx_lon: f64,
    },

    /// Viewshed around a transmitter.
    Viewshed {
        #[arg(long)]
        lat: f64,
        #[arg(long)]
        lon: f64,
        #[arg(long, default_value_t = 5000.0)]
        radius: f64,
    },

    /// Coverage selection over a JSON-encoded node list.
    Coverage {
        #[arg(long)]
        nodes: PathBuf,
        #[arg(long, default_value_t = 5000.0)]
        radius: f64,
        #[arg(long = "optimize-n")]
        optimize_n: Option<usize>,
    },

    /// Candidate scoring over a JSON-encoded candidate list.
    Score {
        #[arg(long)]
        candidates: PathBuf,
        #[arg(long)]
        existing: Option<PathBuf>,
    },

    /// Fetches a slippy-map tile as a 256x256 terrain-RGB raster.
    TerrainTile {
        #[arg(long)]
        z: u8,
        #[arg(long)]
        x: u32,
        #[arg(long)]
        y: u32,
    },
}
