use serde::{Deserialize, Serialize};

use crate::error::CommonError;

/// Mean Earth radius in metres, used throughout the workspace for
/// great-circle distance and effective-Earth-radius diffraction math.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A validated WGS84 geographic coordinate.
///
/// Construction always goes through [`Coordinate::new`], which rejects
/// out-of-range latitude/longitude so that downstream code never has to
/// re-check these bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self, CommonError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(CommonError::InvalidLatitude(lat));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(CommonError::InvalidLongitude(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Midpoint along the great circle between `self` and `other`, via
    /// spherical linear interpolation at `t` in `[0, 1]`.
    ///
    /// Used by [`Coordinate::slerp`] and exposed separately since profile
    /// sampling needs many points along a single path.
    pub fn slerp(&self, other: &Coordinate, t: f64) -> Coordinate {
        let (lat1, lon1) = (self.lat.to_radians(), self.lon.to_radians());
        let (lat2, lon2) = (other.lat.to_radians(), other.lon.to_radians());

        let (x1, y1, z1) = (lat1.cos() * lon1.cos(), lat1.cos() * lon1.sin(), lat1.sin());
        let (x2, y2, z2) = (lat2.cos() * lon2.cos(), lat2.cos() * lon2.sin(), lat2.sin());

        let cos_d = (x1 * x2 + y1 * y2 + z1 * z2).clamp(-1.0, 1.0);
        let delta = cos_d.acos();

        if delta < 1e-12 {
            return *self;
        }

        let a = ((1.0 - t) * delta).sin() / delta.sin();
        let b = (t * delta).sin() / delta.sin();

        let x = a * x1 + b * x2;
        let y = a * y1 + b * y2;
        let z = a * z1 + b * z2;

        let lat = z.atan2((x * x + y * y).sqrt());
        let lon = y.atan2(x);

        Coordinate {
            lat: lat.to_degrees(),
            lon: lon.to_degrees(),
        }
    }
}

/// A single elevation sample in metres above the terrain source's datum.
///
/// `None` means the source has no data at this location (e.g. outside tile
/// coverage, or the tile's own no-data sentinel) — callers must handle this
/// explicitly rather than treating a missing sample as sea level or NaN.
pub type ElevationSample = Option<f32>;

/// Web-mercator ("slippy map") tile coordinate, zoom/x/y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileKey {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileKey {
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_latitude() {
        assert!(Coordinate::new(91.0, 0.0).is_err());
        assert!(Coordinate::new(-91.0, 0.0).is_err());
    }

    #[test]
    fn rejects_out_of_range_longitude() {
        assert!(Coordinate::new(0.0, 181.0).is_err());
        assert!(Coordinate::new(0.0, -181.0).is_err());
    }

    #[test]
    fn slerp_endpoints_return_originals() {
        let a = Coordinate::new(47.6062, -122.3321).unwrap();
        let b = Coordinate::new(40.7128, -74.0060).unwrap();
        let start = a.slerp(&b, 0.0);
        let end = a.slerp(&b, 1.0);
        assert!((start.lat - a.lat).abs() < 1e-6);
        assert!((end.lat - b.lat).abs() < 1e-6);
    }

    #[test]
    fn slerp_midpoint_is_between() {
        let a = Coordinate::new(0.0, 0.0).unwrap();
        let b = Coordinate::new(0.0, 10.0).unwrap();
        let mid = a.slerp(&b, 0.5);
        assert!((mid.lat - 0.0).abs() < 1e-6);
        assert!((mid.lon - 5.0).abs() < 1e-6);
    }
}
