use std::f64::consts::PI;

use meshplan_common::{Coordinate, TileKey};

use crate::error::TerrainError;

pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 14;
pub const DEFAULT_ZOOM: u8 = 12;

/// Maximum latitude representable in web-mercator projection.
const MAX_MERCATOR_LAT: f64 = 85.0511287798;

/// Geographic bounds of a tile, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl TileBounds {
    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.lat >= self.min_lat
            && coord.lat <= self.max_lat
            && coord.lon >= self.min_lon
            && coord.lon <= self.max_lon
    }
}

fn validate_zoom(z: u8) -> Result<(), TerrainError> {
    if z < MIN_ZOOM || z > MAX_ZOOM {
        return Err(TerrainError::InvalidZoom(z));
    }
    Ok(())
}

/// Maps a coordinate to the OSM slippy-map tile that contains it at zoom `z`.
pub fn tile_for_coord(coord: Coordinate, z: u8) -> Result<TileKey, TerrainError> {
    validate_zoom(z)?;
    let lat = coord.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
    let n = 2f64.powi(z as i32);

    let x = ((coord.lon + 180.0) / 360.0 * n).floor();
    let lat_rad = lat.to_radians();
    let y = ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n).floor();

    let max_coord = (1u32 << z) - 1;
    Ok(TileKey::new(
        z,
        (x as i64).clamp(0, max_coord as i64) as u32,
        (y as i64).clamp(0, max_coord as i64) as u32,
    ))
}

/// Geographic bounds of a tile, computed purely from its (z, x, y) — the
/// fallback used when a GeoTIFF carries no tiepoint/pixel-scale tags.
pub fn tile_bounds(key: TileKey) -> TileBounds {
    let n = 2f64.powi(key.z as i32);
    let lon_per_tile = |x: u32| x as f64 / n * 360.0 - 180.0;
    let lat_per_tile = |y: u32| {
        let unit = 1.0 - 2.0 * y as f64 / n;
        (PI * unit).sinh().atan().to_degrees()
    };

    TileBounds {
        min_lat: lat_per_tile(key.y + 1),
        max_lat: lat_per_tile(key.y),
        min_lon: lon_per_tile(key.x),
        max_lon: lon_per_tile(key.x + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn equator_null_island_at_zoom_12() {
        let coord = Coordinate::new(0.0, 0.0).unwrap();
        let key = tile_for_coord(coord, 12).unwrap();
        assert_eq!(key.x, 2048);
        assert_eq!(key.y, 2048);
    }

    #[test]
    fn bounds_contain_the_originating_coordinate() {
        let coord = Coordinate::new(47.6062, -122.3321).unwrap();
        let key = tile_for_coord(coord, 10).unwrap();
        let bounds = tile_bounds(key);
        assert!(bounds.contains(coord));
    }

    #[test]
    fn rejects_invalid_zoom() {
        let coord = Coordinate::new(0.0, 0.0).unwrap();
        assert!(tile_for_coord(coord, 0).is_err());
        assert!(tile_for_coord(coord, 20).is_err());
    }

    #[test]
    fn clamps_poles_to_mercator_limit() {
        let coord = Coordinate::new(89.9, 0.0).unwrap();
        let key = tile_for_coord(coord, 5).unwrap();
        assert_eq!(key.y, 0);
        let coord = Coordinate::new(-89.9, 0.0).unwrap();
        let key = tile_for_coord(coord, 5).unwrap();
        assert_eq!(key.y, (1u32 << 5) - 1);
    }

    #[test]
    fn roundtrip_named_points() {
        let points = [
            (47.6062, -122.3321), // Seattle
            (40.7128, -74.0060),  // New York
            (51.5074, -0.1278),   // London
        ];
        for (lat, lon) in points {
            let coord = Coordinate::new(lat, lon).unwrap();
            let key = tile_for_coord(coord, 10).unwrap();
            let bounds = tile_bounds(key);
            assert!(bounds.contains(coord));
            assert_abs_diff_eq!(
                (bounds.min_lat + bounds.max_lat) / 2.0,
                lat,
                epsilon = 5.0
            );
        }
    }
}
