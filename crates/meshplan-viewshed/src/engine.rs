use meshplan_common::Coordinate;
use meshplan_physics::{analyze_link, haversine_distance, DEFAULT_K_FACTOR};
use meshplan_terrain::TerrainManager;
use rayon::prelude::*;

use crate::error::ViewshedError;

const MIN_RESOLUTION_M: f64 = 100.0;
const MAX_GRID_DIM: usize = 250;
const DEFAULT_PROFILE_SAMPLES: usize = 15;
const DEG_PER_METRE_LAT: f64 = 1.0 / 111_320.0;

/// Result of [`calculate_viewshed`]: a row-major visibility grid (`1` =
/// visible, `0` = not) plus the latitude/longitude arrays that bracket it.
#[derive(Debug, Clone)]
pub struct Viewshed {
    pub visibility: Vec<u8>,
    pub rows: usize,
    pub cols: usize,
    pub lats: Vec<f64>,
    pub lons: Vec<f64>,
}

impl Viewshed {
    pub fn at(&self, row: usize, col: usize) -> u8 {
        self.visibility[row * self.cols + col]
    }

    pub fn visible_count(&self) -> usize {
        self.visibility.iter().filter(|&&v| v == 1).count()
    }

    /// Pixel coordinates (in this grid's own lat/lon arrays) of every
    /// visible cell, used by the coverage selector's set-based marginal
    /// gain accounting.
    pub fn visible_pixels(&self) -> Vec<(usize, usize)> {
        (0..self.rows)
            .flat_map(|r| (0..self.cols).map(move |c| (r, c)))
            .filter(|&(r, c)| self.at(r, c) == 1)
            .collect()
    }
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n <= 1 {
        return vec![start];
    }
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Builds the visibility grid around a transmitter and evaluates each pixel
/// against the physics kernel.
///
/// Row evaluation fans out across a rayon thread pool; each pixel bridges
/// into the async terrain manager via `Handle::block_on`, since the
/// per-pixel work is CPU-bound (profile sampling + `analyze_link`) and
/// rayon's pool is not itself async-aware. Must be called from within a
/// tokio runtime.
#[allow(clippy::too_many_arguments)]
pub async fn calculate_viewshed(
    tm: &TerrainManager,
    tx: Coordinate,
    tx_h: f64,
    radius_m: f64,
    rx_h: f64,
    f_mhz: f64,
    resolution_m: f64,
    k_factor: f64,
    clutter: f64,
) -> Result<Viewshed, ViewshedError> {
    if !radius_m.is_finite() || radius_m <= 0.0 {
        return Err(ViewshedError::InvalidRadius(radius_m));
    }
    if !resolution_m.is_finite() || resolution_m <= 0.0 {
        return Err(ViewshedError::InvalidResolution(resolution_m));
    }

    let lat_per_m = DEG_PER_METRE_LAT;
    let lon_per_m = 1.0 / (111_320.0 * tx.lat.to_radians().cos());
    let eff_res = resolution_m.max(MIN_RESOLUTION_M);

    let dim = ((2.0 * radius_m / eff_res).floor() as usize)
        .clamp(1, MAX_GRID_DIM);
    let rows = dim;
    let cols = dim;

    let lat_span = radius_m * lat_per_m;
    let lon_span = radius_m * lon_per_m;
    let lats = linspace(tx.lat - lat_span, tx.lat + lat_span, rows);
    let lons = linspace(tx.lon - lon_span, tx.lon + lon_span, cols);

    let handle = tokio::runtime::Handle::current();

    let grid: Vec<Vec<u8>> = lats
        .par_iter()
        .map(|&lat| {
            let mut row = vec![0u8; cols];
            for (c, &lon) in lons.iter().enumerate() {
                let point = match Coordinate::new(lat, lon) {
                    Ok(p) => p,
                    Err(_) => continue,
                };
                let dist = haversine_distance(tx, point);
                if dist > radius_m || dist < 10.0 {
                    continue;
                }

                let profile = handle
                    .block_on(tm.get_elevation_profile(tx, point, DEFAULT_PROFILE_SAMPLES));
                let elevations: Vec<f32> = profile.iter().map(|e| e.unwrap_or(0.0)).collect();

                match analyze_link(&elevations, dist, f_mhz, tx_h, rx_h, k_factor, clutter) {
                    Ok(result) if result.min_clearance_ratio >= 0.0 => row[c] = 1,
                    Ok(_) => {}
                    Err(err) => {
                        tracing::debug!(lat, lon, %err, "viewshed pixel failed, skipping");
                    }
                }
            }
            row
        })
        .collect();

    let visibility = grid.into_iter().flatten().collect();

    Ok(Viewshed {
        visibility,
        rows,
        cols,
        lats,
        lons,
    })
}

/// Convenience wrapper using the default Fresnel effective-Earth k-factor
/// and no clutter height, for callers that don't need to override either.
pub async fn calculate_viewshed_default(
    tm: &TerrainManager,
    tx: Coordinate,
    tx_h: f64,
    radius_m: f64,
    rx_h: f64,
    f_mhz: f64,
    resolution_m: f64,
) -> Result<Viewshed, ViewshedError> {
    calculate_viewshed(
        tm,
        tx,
        tx_h,
        radius_m,
        rx_h,
        f_mhz,
        resolution_m,
        DEFAULT_K_FACTOR,
        0.0,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_produces_n_points_spanning_range() {
        let points = linspace(0.0, 10.0, 5);
        assert_eq!(points.len(), 5);
        assert!((points[0] - 0.0).abs() < 1e-9);
        assert!((points[4] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn linspace_single_point_returns_start() {
        assert_eq!(linspace(3.0, 7.0, 1), vec![3.0]);
    }
}
