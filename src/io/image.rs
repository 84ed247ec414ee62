//! PNG export of the classified world raster

use std::path::Path;

use image::{ImageBuffer, Rgba, RgbaImage};

use crate::io::configuration::{EMPTY_COLOR, PATH_COLOR, TERRAIN_COLOR};
use crate::io::error::{LayoutError, Result, computation_error};
use crate::spatial::grid::WorldGrid;
use crate::spatial::tiles::TileKind;

/// Color of a raster cell
pub const fn tile_color(kind: Option<TileKind>) -> [u8; 4] {
    match kind {
        Some(TileKind::Path) => PATH_COLOR,
        Some(TileKind::Terrain) => TERRAIN_COLOR,
        None => EMPTY_COLOR,
    }
}

/// Render the raster with one pixel per world cell
///
/// Cells outside every chunk are transparent.
///
/// # Errors
///
/// Returns an error if the raster is empty
pub fn render_grid(grid: &WorldGrid) -> Result<RgbaImage> {
    if grid.rows() == 0 || grid.cols() == 0 {
        return Err(computation_error("png export", &"layout has no tiles"));
    }

    let mut img = ImageBuffer::new(grid.cols() as u32, grid.rows() as u32);
    for ((row, col), &kind) in grid.cells().indexed_iter() {
        img.put_pixel(col as u32, row as u32, Rgba(tile_color(kind)));
    }
    Ok(img)
}

/// Export the raster as a PNG image with transparent background
///
/// # Errors
///
/// Returns an error if:
/// - The layout has no tiles
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_grid_as_png(grid: &WorldGrid, output_path: &Path) -> Result<()> {
    let img = render_grid(grid)?;

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| LayoutError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    img.save(output_path)
        .map_err(|e| LayoutError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}
