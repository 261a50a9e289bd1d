use meshplan_viewshed::Viewshed;

use crate::grid::MasterGrid;

/// A single-channel composite raster over the union of selected viewsheds
/// plus its geographic bounds. Stops at the typed byte-grid-plus-bounds
/// value — encoding to a portable image format is an external
/// collaborator's job, out of scope here.
#[derive(Debug, Clone)]
pub struct Composite {
    pub data: Vec<u8>,
    pub rows: usize,
    pub cols: usize,
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

/// Builds the composite raster: a bounding rectangle over all selected
/// viewsheds (plus a 1 km buffer, computed in [`MasterGrid::covering`]),
/// with every visible cell of every selected viewshed written as 255.
pub fn build_composite(selected_viewsheds: &[Viewshed]) -> Option<Composite> {
    let grid = MasterGrid::covering(selected_viewsheds)?;
    let mut data = vec![0u8; grid.rows * grid.cols];

    for viewshed in selected_viewsheds {
        for (r, c) in viewshed.visible_pixels() {
            let lat = viewshed.lats[r];
            let lon = viewshed.lons[c];
            let row = grid.lat_to_row(lat);
            let col = grid.lon_to_col(lon);
            data[row * grid.cols + col] = 255;
        }
    }

    Some(Composite {
        data,
        rows: grid.rows,
        cols: grid.cols,
        min_lat: grid.min_lat,
        min_lon: grid.min_lon,
        max_lat: grid.max_lat,
        max_lon: grid.max_lon,
    })
}
