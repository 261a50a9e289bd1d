use std::io::Cursor;

use tiff::decoder::{DecodingResult, Limits};
use tiff::tags::Tag;

use meshplan_common::TileKey;

use crate::decoded::DecodedTile;
use crate::error::TerrainError;
use crate::tile_coord::tile_bounds;

/// Generous buffer limits; a single decoded tile can comfortably exceed the
/// `tiff` crate's conservative defaults.
const BUFFER_LIMIT: usize = 1024 * 1024 * 1024;

/// Decodes a GeoTIFF byte buffer into a [`DecodedTile`], falling back to the
/// tile's well-known web-mercator bounds when the file carries no
/// tiepoint/pixel-scale tags.
pub fn decode_tile(key: TileKey, bytes: &[u8]) -> Result<DecodedTile, TerrainError> {
    let mut limits = Limits::default();
    limits.decoding_buffer_size = BUFFER_LIMIT;
    limits.intermediate_buffer_size = BUFFER_LIMIT;
    limits.ifd_value_size = BUFFER_LIMIT;

    let mut decoder = tiff::decoder::Decoder::new(Cursor::new(bytes))
        .map_err(|e| TerrainError::TileCorrupt(key, e.to_string()))?
        .with_limits(limits);

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| TerrainError::TileCorrupt(key, e.to_string()))?;

    let no_data = read_nodata_value(&mut decoder);
    let bounds = read_geotransform(&mut decoder, width, height).unwrap_or_else(|| tile_bounds(key));

    let result = decoder
        .read_image()
        .map_err(|e| TerrainError::TileCorrupt(key, e.to_string()))?;

    let data = decoding_result_to_f32(result)?;

    Ok(DecodedTile {
        data,
        width,
        height,
        bounds,
        no_data,
    })
}

fn decoding_result_to_f32(result: DecodingResult) -> Result<Vec<f32>, TerrainError> {
    Ok(match result {
        DecodingResult::U8(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::U16(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::U32(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::U64(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::I8(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::I16(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::I32(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::I64(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::F32(v) => v,
        DecodingResult::F64(v) => v.into_iter().map(|x| x as f32).collect(),
    })
}

fn read_nodata_value<R: std::io::Read + std::io::Seek>(
    decoder: &mut tiff::decoder::Decoder<R>,
) -> Option<f32> {
    // GDAL_NODATA, tag 42113, stored as an ASCII string.
    decoder
        .get_tag_ascii_string(Tag::Unknown(42113))
        .ok()
        .and_then(|s| s.trim().parse::<f32>().ok())
}

fn read_geotransform<R: std::io::Read + std::io::Seek>(
    decoder: &mut tiff::decoder::Decoder<R>,
    width: u32,
    height: u32,
) -> Option<crate::tile_coord::TileBounds> {
    let tiepoint = decoder.get_tag_f64_vec(Tag::Unknown(33922)).ok()?;
    let pixel_scale = decoder.get_tag_f64_vec(Tag::Unknown(33550)).ok()?;
    if tiepoint.len() < 6 || pixel_scale.len() < 2 {
        return None;
    }

    let origin_lon = tiepoint[3];
    let origin_lat = tiepoint[4];
    let pixel_w = pixel_scale[0];
    let pixel_h = pixel_scale[1];

    Some(crate::tile_coord::TileBounds {
        min_lat: origin_lat - pixel_h * height as f64,
        max_lat: origin_lat,
        min_lon: origin_lon,
        max_lon: origin_lon + pixel_w * width as f64,
    })
}
