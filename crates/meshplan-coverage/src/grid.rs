use meshplan_common::EARTH_RADIUS_M;
use meshplan_viewshed::Viewshed;

const GRID_RESOLUTION_M: f64 = 100.0;
const MAX_GRID_DIM: usize = 1024;
const BUFFER_M: f64 = 1000.0;

/// A 100 m-resolution, ≤1024×1024-capped raster covering the union of a set
/// of viewsheds plus a 1 km buffer.
#[derive(Debug, Clone, Copy)]
pub struct MasterGrid {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
    pub rows: usize,
    pub cols: usize,
}

impl MasterGrid {
    /// Builds a grid bounding every viewshed's own lat/lon extents, with a
    /// 1 km buffer, capped to [`MAX_GRID_DIM`] in each dimension.
    pub fn covering(viewsheds: &[Viewshed]) -> Option<MasterGrid> {
        let mut min_lat = f64::INFINITY;
        let mut max_lat = f64::NEG_INFINITY;
        let mut min_lon = f64::INFINITY;
        let mut max_lon = f64::NEG_INFINITY;

        for vs in viewsheds {
            for &lat in &vs.lats {
                min_lat = min_lat.min(lat);
                max_lat = max_lat.max(lat);
            }
            for &lon in &vs.lons {
                min_lon = min_lon.min(lon);
                max_lon = max_lon.max(lon);
            }
        }

        if !min_lat.is_finite() {
            return None;
        }

        let mid_lat = (min_lat + max_lat) / 2.0;
        let lat_buffer_deg = BUFFER_M / 111_320.0;
        let lon_buffer_deg = BUFFER_M / (111_320.0 * mid_lat.to_radians().cos().max(1e-6));

        let min_lat = min_lat - lat_buffer_deg;
        let max_lat = max_lat + lat_buffer_deg;
        let min_lon = min_lon - lon_buffer_deg;
        let max_lon = max_lon + lon_buffer_deg;

        let lat_span_m = (max_lat - min_lat) * std::f64::consts::PI / 180.0 * EARTH_RADIUS_M;
        let lon_span_m = (max_lon - min_lon)
            * std::f64::consts::PI
            / 180.0
            * EARTH_RADIUS_M
            * mid_lat.to_radians().cos().max(1e-6);

        let rows = ((lat_span_m / GRID_RESOLUTION_M).ceil() as usize)
            .clamp(1, MAX_GRID_DIM);
        let cols = ((lon_span_m / GRID_RESOLUTION_M).ceil() as usize)
            .clamp(1, MAX_GRID_DIM);

        Some(MasterGrid {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
            rows,
            cols,
        })
    }

    pub fn lat_to_row(&self, lat: f64) -> usize {
        let t = (self.max_lat - lat) / (self.max_lat - self.min_lat);
        ((t * self.rows as f64) as isize).clamp(0, self.rows as isize - 1) as usize
    }

    pub fn lon_to_col(&self, lon: f64) -> usize {
        let t = (lon - self.min_lon) / (self.max_lon - self.min_lon);
        ((t * self.cols as f64) as isize).clamp(0, self.cols as isize - 1) as usize
    }

    /// Maps a viewshed's visible pixels into this grid's (row, col) index
    /// space, deduplicated — this is the candidate's pixel set `V_i`.
    pub fn pixel_set(&self, viewshed: &Viewshed) -> std::collections::HashSet<(usize, usize)> {
        viewshed
            .visible_pixels()
            .into_iter()
            .map(|(r, c)| {
                let lat = viewshed.lats[r];
                let lon = viewshed.lons[c];
                (self.lat_to_row(lat), self.lon_to_col(lon))
            })
            .collect()
    }
}
