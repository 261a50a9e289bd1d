use std::collections::HashMap;
use std::sync::Arc;

use meshplan_common::Coordinate;
use parking_lot::Mutex as SyncMutex;

use crate::cache::{InFlightTracker, SharedByteCache, TileLru};
use crate::decoded::DecodedTile;
use crate::error::TerrainError;
use crate::geotiff::decode_tile;
use crate::source::TileSource;
use crate::tile_coord::{tile_for_coord, DEFAULT_ZOOM};

const DEFAULT_PROCESS_CACHE_SIZE: usize = 256;
const DEFAULT_SHARED_CACHE_SIZE: usize = 4096;

/// Public entry point for elevation lookups. Wraps a
/// pluggable [`TileSource`] with a two-level cache and single-flight fetch
/// coalescing.
pub struct TerrainManager {
    source: Box<dyn TileSource>,
    zoom: u8,
    process_cache: SyncMutex<TileLru>,
    shared_cache: SharedByteCache,
    in_flight: InFlightTracker,
}

impl TerrainManager {
    pub fn new(source: Box<dyn TileSource>) -> Self {
        Self::with_zoom(source, DEFAULT_ZOOM)
    }

    pub fn with_zoom(source: Box<dyn TileSource>, zoom: u8) -> Self {
        Self {
            source,
            zoom,
            process_cache: SyncMutex::new(TileLru::new(DEFAULT_PROCESS_CACHE_SIZE)),
            shared_cache: SharedByteCache::new(DEFAULT_SHARED_CACHE_SIZE),
            in_flight: InFlightTracker::default(),
        }
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    async fn load_tile(&self, key: meshplan_common::TileKey) -> Result<Arc<DecodedTile>, TerrainError> {
        if let Some(tile) = self.process_cache.lock().get(&key) {
            return Ok(tile);
        }

        let tile = self
            .in_flight
            .run(key, || async {
                if let Some(bytes) = self.shared_cache.get(key) {
                    return decode_tile(key, &bytes);
                }
                let bytes = self.source.fetch_bytes(key).await?;
                self.shared_cache.insert(key, bytes.clone());
                decode_tile(key, &bytes)
            })
            .await?;

        self.process_cache.lock().insert(key, tile.clone());
        Ok(tile)
    }

    /// Single-point elevation lookup. Surfaces no-data and fetch failures
    /// directly to the caller.
    pub async fn get_elevation(&self, coord: Coordinate) -> Result<f32, TerrainError> {
        let key = tile_for_coord(coord, self.zoom)?;
        let tile = self.load_tile(key).await?;
        let (fx, fy) = tile.fractional_pixel(coord.lat, coord.lon);
        tile.bilinear(fx, fy)
            .map_err(|_| TerrainError::NoData { lat: coord.lat, lon: coord.lon })
    }

    /// Batched elevation lookup. Coordinates are grouped by containing
    /// tile; a per-tile fetch failure masks that tile's coordinates as
    /// `None` rather than failing the whole batch.
    pub async fn get_elevations_batch(&self, coords: &[Coordinate]) -> Vec<Option<f32>> {
        let mut by_tile: HashMap<meshplan_common::TileKey, Vec<usize>> = HashMap::new();
        let mut keys = vec![None; coords.len()];

        for (i, coord) in coords.iter().enumerate() {
            match tile_for_coord(*coord, self.zoom) {
                Ok(key) => {
                    keys[i] = Some(key);
                    by_tile.entry(key).or_default().push(i);
                }
                Err(_) => keys[i] = None,
            }
        }

        let mut results = vec![None; coords.len()];
        for (key, indices) in by_tile {
            match self.load_tile(key).await {
                Ok(tile) => {
                    for i in indices {
                        let coord = coords[i];
                        let (fx, fy) = tile.fractional_pixel(coord.lat, coord.lon);
                        results[i] = tile.bilinear(fx, fy).ok();
                    }
                }
                Err(err) => {
                    tracing::debug!(?key, %err, "tile fetch failed, marking batch members no-data");
                }
            }
        }
        results
    }

    /// Samples the great-circle line between `a` and `b` at `samples`
    /// evenly arc-length-spaced points via spherical linear interpolation —
    /// never raw lat/lon interpolation, which distorts near the poles and
    /// over long east-west spans.
    pub async fn get_elevation_profile(
        &self,
        a: Coordinate,
        b: Coordinate,
        samples: usize,
    ) -> Vec<Option<f32>> {
        if samples == 0 {
            return Vec::new();
        }
        let points: Vec<Coordinate> = (0..samples)
            .map(|i| {
                let t = if samples == 1 {
                    0.0
                } else {
                    i as f64 / (samples - 1) as f64
                };
                a.slerp(&b, t)
            })
            .collect();
        self.get_elevations_batch(&points).await
    }

    /// Produces a regular `size x size` grid at the exact pixel geometry of
    /// web-mercator tile `key`, row-major. If `size` differs from the
    /// tile's native dimensions the tile is resampled via bilinear
    /// interpolation over its own pixel space.
    pub async fn get_interpolated_grid(
        &self,
        key: meshplan_common::TileKey,
        size: u32,
    ) -> Result<Vec<f32>, TerrainError> {
        let tile = self.load_tile(key).await?;
        if size == tile.width && size == tile.height {
            return Ok(tile.data.clone());
        }

        let mut grid = Vec::with_capacity((size * size) as usize);
        for row in 0..size {
            for col in 0..size {
                let fx = col as f64 / (size.max(1) - 1).max(1) as f64 * (tile.width - 1) as f64;
                let fy = row as f64 / (size.max(1) - 1).max(1) as f64 * (tile.height - 1) as f64;
                grid.push(tile.bilinear(fx, fy).unwrap_or(0.0));
            }
        }
        Ok(grid)
    }

    /// `GetTerrainTile(z, x, y)`: the slippy-map tile
    /// resampled to the standard 256x256 terrain-RGB raster size.
    pub async fn get_terrain_tile(&self, z: u8, x: u32, y: u32) -> Result<Vec<f32>, TerrainError> {
        self.get_interpolated_grid(meshplan_common::TileKey { z, x, y }, 256)
            .await
    }
}
