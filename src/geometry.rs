//! Tile-grid geometry: how a raster is partitioned into overlapping tiles.
//!
//! Adjacent tiles share one row/column of pixels at their seam (§3 of the
//! design). All the arithmetic that turns `(tile_cols, tile_rows,
//! raster_cols, raster_rows)` into a tile grid lives here, so the rest of
//! the pipeline only ever deals with already-validated geometry.

use ndarray::{s, ArrayView2};

use crate::error::CclError;
use crate::raster::Raster;

/// Identifies one tile in the grid by its `(tx, ty)` position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId {
    /// Column of this tile in the tile grid.
    pub tx: usize,
    /// Row of this tile in the tile grid.
    pub ty: usize,
}

impl TileId {
    /// Row-major index of this tile, given the grid's tile-column count.
    pub fn index(&self, n_tiles_x: usize) -> usize {
        self.ty * n_tiles_x + self.tx
    }
}

/// Validated tile-grid geometry over a raster.
///
/// * `tile_cols`, `tile_rows` - nominal tile size `TX x TY` (`TX, TY >= 2`).
/// * `logical_cols`, `logical_rows` - the caller's unpadded raster size
///   `NC1 x NR1` (`>= 1` each).
///
/// The padded, tile-aligned raster size `NC x NR` and tile-grid dimensions
/// `ntX x ntY` are derived and exposed as `nc()`/`nr()`/`n_tiles_x()`/
/// `n_tiles_y()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGeometry {
    tile_cols: usize,
    tile_rows: usize,
    logical_cols: usize,
    logical_rows: usize,
    n_tiles_x: usize,
    n_tiles_y: usize,
}

impl TileGeometry {
    /// Validates `(TX, TY, NC1, NR1)` and derives the tile grid.
    pub fn new(
        tile_cols: usize,
        tile_rows: usize,
        logical_cols: usize,
        logical_rows: usize,
    ) -> Result<Self, CclError> {
        if tile_cols < 2 {
            return Err(CclError::InvalidGeometry {
                detail: format!("tile_cols must be >= 2, got {tile_cols}"),
            });
        }
        if tile_rows < 2 {
            return Err(CclError::InvalidGeometry {
                detail: format!("tile_rows must be >= 2, got {tile_rows}"),
            });
        }
        if logical_cols < 1 {
            return Err(CclError::InvalidGeometry {
                detail: "logical_cols must be >= 1".into(),
            });
        }
        if logical_rows < 1 {
            return Err(CclError::InvalidGeometry {
                detail: "logical_rows must be >= 1".into(),
            });
        }

        // Conceptually, a single leading row/column of background is
        // prepended to the caller's NC1 x NR1 content (so every tile's
        // nw/nn/ww reads at the raster edge are always defined, §3), giving
        // an (NC1+1) x (NR1+1) intermediate grid. Tile `k` along an axis
        // covers indices `[k*(len-1), (k+1)*(len-1)]` of that grid, so the
        // tile count needed to reach index NC1 (the last column of the
        // intermediate grid) is `ceil(NC1 / (TX-1))`.
        let n_tiles_x = div_ceil(logical_cols, tile_cols - 1);
        let n_tiles_y = div_ceil(logical_rows, tile_rows - 1);

        Ok(TileGeometry { tile_cols, tile_rows, logical_cols, logical_rows, n_tiles_x, n_tiles_y })
    }

    /// Nominal tile width (`TX`).
    pub fn tile_cols(&self) -> usize {
        self.tile_cols
    }

    /// Nominal tile height (`TY`).
    pub fn tile_rows(&self) -> usize {
        self.tile_rows
    }

    /// Caller-specified, unpadded raster width (`NC1`).
    pub fn logical_cols(&self) -> usize {
        self.logical_cols
    }

    /// Caller-specified, unpadded raster height (`NR1`).
    pub fn logical_rows(&self) -> usize {
        self.logical_rows
    }

    /// Number of tile columns (`ntX`).
    pub fn n_tiles_x(&self) -> usize {
        self.n_tiles_x
    }

    /// Number of tile rows (`ntY`).
    pub fn n_tiles_y(&self) -> usize {
        self.n_tiles_y
    }

    /// Total number of tiles.
    pub fn n_tiles(&self) -> usize {
        self.n_tiles_x * self.n_tiles_y
    }

    /// Tile-aligned, padded raster width (`NC`).
    pub fn nc(&self) -> usize {
        self.n_tiles_x * (self.tile_cols - 1) + 1
    }

    /// Tile-aligned, padded raster height (`NR`).
    pub fn nr(&self) -> usize {
        self.n_tiles_y * (self.tile_rows - 1) + 1
    }

    /// Raster-space `(row, col)` of this tile's top-left pixel.
    pub fn tile_origin(&self, tile: TileId) -> (usize, usize) {
        (tile.ty * (self.tile_rows - 1), tile.tx * (self.tile_cols - 1))
    }

    /// The tile directly north of `tile`, if any.
    pub fn north(&self, tile: TileId) -> Option<TileId> {
        (tile.ty > 0).then(|| TileId { tx: tile.tx, ty: tile.ty - 1 })
    }

    /// The tile directly west of `tile`, if any.
    pub fn west(&self, tile: TileId) -> Option<TileId> {
        (tile.tx > 0).then(|| TileId { tx: tile.tx - 1, ty: tile.ty })
    }

    /// Iterates every tile in row-major order (`ty` outer, `tx` inner) -
    /// the order required by C6/C7/C8 for deterministic class roots.
    pub fn tiles_row_major(&self) -> impl Iterator<Item = TileId> + '_ {
        (0..self.n_tiles_y).flat_map(move |ty| (0..self.n_tiles_x).map(move |tx| TileId { tx, ty }))
    }

    /// Extracts the `TX x TY` submatrix for `tile` out of a padded,
    /// tile-aligned `raster`.
    ///
    /// Panics (via `ndarray` slicing) if `raster`'s shape doesn't match
    /// `(nr(), nc())`; callers are expected to check that with
    /// [`TileGeometry::validate_raster`] first.
    pub fn tile_view<'a>(&self, raster: &'a Raster, tile: TileId) -> ArrayView2<'a, bool> {
        let (r0, c0) = self.tile_origin(tile);
        raster.slice(s![r0..r0 + self.tile_rows, c0..c0 + self.tile_cols])
    }

    /// Confirms `raster`'s shape matches this geometry's padded dimensions.
    pub fn validate_raster(&self, raster: &Raster) -> Result<(), CclError> {
        let (rows, cols) = raster.dim();
        if rows != self.nr() || cols != self.nc() {
            return Err(CclError::InvalidGeometry {
                detail: format!(
                    "raster is {rows}x{cols}, expected {}x{} for this tile geometry",
                    self.nr(),
                    self.nc()
                ),
            });
        }
        Ok(())
    }
}

fn div_ceil(numerator: usize, denominator: usize) -> usize {
    (numerator + denominator - 1) / denominator
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_tile_covers_whole_raster() {
        let geom = TileGeometry::new(6, 6, 5, 5).unwrap();
        assert_eq!(geom.n_tiles_x(), 1);
        assert_eq!(geom.n_tiles_y(), 1);
        assert_eq!(geom.nc(), 6);
        assert_eq!(geom.nr(), 6);
    }

    #[test]
    fn two_tiles_share_one_column() {
        // TX=6 => each tile covers 5 new columns after the first; NC1=9 needs 2 tiles.
        let geom = TileGeometry::new(6, 5, 9, 4).unwrap();
        assert_eq!(geom.n_tiles_x(), 2);
        assert_eq!(geom.n_tiles_y(), 1);
        assert_eq!(geom.tile_origin(TileId { tx: 0, ty: 0 }), (0, 0));
        assert_eq!(geom.tile_origin(TileId { tx: 1, ty: 0 }), (0, 5));
    }

    #[test]
    fn rejects_degenerate_tile_size() {
        assert!(matches!(
            TileGeometry::new(1, 6, 5, 5),
            Err(CclError::InvalidGeometry { .. })
        ));
        assert!(matches!(
            TileGeometry::new(6, 0, 5, 5),
            Err(CclError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn tiles_row_major_order_is_deterministic() {
        let geom = TileGeometry::new(4, 4, 9, 9).unwrap();
        let order: Vec<TileId> = geom.tiles_row_major().collect();
        let mut expected = vec![];
        for ty in 0..geom.n_tiles_y() {
            for tx in 0..geom.n_tiles_x() {
                expected.push(TileId { tx, ty });
            }
        }
        assert_eq!(order, expected);
    }
}
