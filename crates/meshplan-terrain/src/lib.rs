//! # meshplan-terrain
//!
//! Web-mercator terrain tile manager: maps coordinates onto OSM slippy-map
//! tiles, decodes GeoTIFF rasters, bilinearly interpolates elevation
//! samples, and caches/coalesces concurrent fetches of the same tile.
//!
//! Tiles come from a pluggable [`TileSource`] — HTTP or a local directory
//! in the same `{z}/{x}/{y}.tif` layout — behind a two-level cache: a
//! process-local LRU of decoded rasters and a shared byte cache of encoded
//! tiles that stands in for an external KV store.

mod cache;
mod decoded;
mod error;
mod geotiff;
mod manager;
mod rgb;
mod source;
mod tile_coord;

pub use decoded::DecodedTile;
pub use error::TerrainError;
pub use manager::TerrainManager;
pub use rgb::{decode_terrain_rgb, encode_terrain_rgb};
pub use source::{FileTileSource, HttpTileSource, TileSource};
pub use tile_coord::{tile_bounds, tile_for_coord, TileBounds, DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM};
