//! Contact-sheet composition.

use image::{imageops, RgbImage};

/// Arrange same-size tiles into a `rows x cols` sheet, row-major, no padding.
///
/// Tile `i` is placed at column `i % cols`, row `i / cols`. Tile size is taken
/// from the first tile.
///
/// # Panics
///
/// Panics if `tiles.len() != rows * cols`. Callers construct the tile list
/// themselves, so a mismatch is a programming error.
pub fn compose_grid(tiles: &[RgbImage], rows: usize, cols: usize) -> RgbImage {
    assert_eq!(
        tiles.len(),
        rows * cols,
        "grid of {rows}x{cols} needs exactly {} tiles",
        rows * cols
    );

    let Some(first) = tiles.first() else {
        return RgbImage::new(0, 0);
    };
    let (w, h) = first.dimensions();

    let mut sheet = RgbImage::new(cols as u32 * w, rows as u32 * h);
    for (i, tile) in tiles.iter().enumerate() {
        let x = (i % cols) as i64 * i64::from(w);
        let y = (i / cols) as i64 * i64::from(h);
        imageops::replace(&mut sheet, tile, x, y);
    }
    sheet
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
