use crate::error::TerrainError;
use crate::tile_coord::TileBounds;

/// A decoded elevation raster for a single web-mercator tile.
#[derive(Debug, Clone)]
pub struct DecodedTile {
    pub data: Vec<f32>,
    pub width: u32,
    pub height: u32,
    pub bounds: TileBounds,
    pub no_data: Option<f32>,
}

impl DecodedTile {
    fn pixel(&self, x: u32, y: u32) -> Option<f32> {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        let value = self.data[(y * self.width + x) as usize];
        if let Some(nd) = self.no_data {
            if (value - nd).abs() < 1e-3 {
                return None;
            }
        }
        Some(value)
    }

    /// Bilinearly interpolates the elevation at fractional pixel position
    /// `(fx, fy)`, clamping the fractional indices to `[0, size-1]`.
    pub fn bilinear(&self, fx: f64, fy: f64) -> Result<f32, TerrainError> {
        let fx = fx.clamp(0.0, (self.width - 1) as f64);
        let fy = fy.clamp(0.0, (self.height - 1) as f64);

        let x0 = fx.floor() as u32;
        let y0 = fy.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let tx = fx - x0 as f64;
        let ty = fy - y0 as f64;

        let q00 = self.pixel(x0, y0);
        let q10 = self.pixel(x1, y0);
        let q01 = self.pixel(x0, y1);
        let q11 = self.pixel(x1, y1);

        match (q00, q10, q01, q11) {
            (Some(q00), Some(q10), Some(q01), Some(q11)) => {
                let top = q00 as f64 * (1.0 - tx) + q10 as f64 * tx;
                let bottom = q01 as f64 * (1.0 - tx) + q11 as f64 * tx;
                Ok((top * (1.0 - ty) + bottom * ty) as f32)
            }
            _ => Err(TerrainError::NoData { lat: f64::NAN, lon: f64::NAN }),
        }
    }

    /// Fractional pixel position of a point within this tile's bounds.
    pub fn fractional_pixel(&self, lat: f64, lon: f64) -> (f64, f64) {
        let fx = (lon - self.bounds.min_lon) / (self.bounds.max_lon - self.bounds.min_lon)
            * (self.width - 1) as f64;
        let fy = (self.bounds.max_lat - lat) / (self.bounds.max_lat - self.bounds.min_lat)
            * (self.height - 1) as f64;
        (fx, fy)
    }
}
