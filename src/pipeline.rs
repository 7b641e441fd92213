//! Orchestrates the full tiled pipeline: per-tile C2-C5, the C6-C8 global
//! reduction, and the per-tile C9 third scan (§2's data-flow table).
//!
//! Stages C2-C5 and C9 are expressed as functions over one [`TileId`] at a
//! time and collected into plain `Vec`s here; nothing about this module
//! prevents a caller from farming those per-tile calls out to other
//! threads (§5: "tile-parallel by construction"), but this crate doesn't
//! itself schedule that work, per the spec's explicit non-goal.

use ndarray::{s, Array2};

use crate::cross::CrossClassTable;
use crate::error::CclError;
use crate::geometry::{TileGeometry, TileId};
use crate::histogram::label_histogram;
use crate::raster::Raster;
use crate::tile_scan::{resolve_tile, TileResult};

/// The result of labeling a raster: one global-ID label matrix per tile,
/// plus the geometry and feature count needed to assemble or inspect them.
#[derive(Debug, Clone)]
pub struct Labeling {
    geometry: TileGeometry,
    /// Per-tile label matrices, indexed by `TileId::index(n_tiles_x)`, each
    /// already rewritten to dense global IDs by C9.
    pub tiles: Vec<Array2<u32>>,
    /// `G`: the number of distinct foreground components, i.e. the highest
    /// global ID in use.
    pub feature_count: usize,
}

impl Labeling {
    /// The tile geometry this labeling was produced with.
    pub fn geometry(&self) -> &TileGeometry {
        &self.geometry
    }

    /// Returns this tile's label matrix, if `tile` is within the grid.
    pub fn tile(&self, tile: TileId) -> Option<&Array2<u32>> {
        self.tiles.get(tile.index(self.geometry.n_tiles_x()))
    }

    /// Assembles the per-tile label matrices into one dense
    /// `(NR-1) x (NC-1)` matrix: the padded `NR x NC` raster with every tile
    /// written back into place (seam pixels are written more than once, but
    /// carry the same global id by construction so this is harmless), with
    /// the single leading row/column of synthetic background padding (§3)
    /// dropped.
    pub fn assemble(&self) -> Array2<u32> {
        let geom = &self.geometry;
        let mut padded = Array2::<u32>::zeros((geom.nr(), geom.nc()));

        for ty in 0..geom.n_tiles_y() {
            for tx in 0..geom.n_tiles_x() {
                let tile = TileId { tx, ty };
                let labels = &self.tiles[tile.index(geom.n_tiles_x())];
                let (r0, c0) = geom.tile_origin(tile);

                for r in 0..labels.nrows() {
                    for c in 0..labels.ncols() {
                        padded[(r0 + r, c0 + c)] = labels[(r, c)];
                    }
                }
            }
        }

        padded.slice(s![1.., 1..]).to_owned()
    }

    /// Per-label pixel counts over the assembled raster, in the teacher's
    /// `label_histogram` idiom (index 0 is background's count).
    pub fn histogram(&self) -> Vec<usize> {
        label_histogram(&self.assemble(), self.feature_count)
    }
}

/// Runs the full pipeline: C2-C5 per tile, C6-C8 as a single global
/// reduction, and C9 per tile.
pub fn label_raster(raster: &Raster, geometry: &TileGeometry) -> Result<Labeling, CclError> {
    geometry.validate_raster(raster)?;

    log::debug!(
        "labeling {}x{} raster over {}x{} tiles of size {}x{}",
        geometry.nr(),
        geometry.nc(),
        geometry.n_tiles_x(),
        geometry.n_tiles_y(),
        geometry.tile_cols(),
        geometry.tile_rows(),
    );

    let mut tile_results: Vec<TileResult> = Vec::with_capacity(geometry.n_tiles());
    for tile in geometry.tiles_row_major() {
        let view = geometry.tile_view(raster, tile);
        let result = resolve_tile(view);
        log::trace!(
            "tile ({}, {}): {} local root(s)",
            tile.tx,
            tile.ty,
            result.roots.len()
        );
        tile_results.push(result);
    }

    let mut cross_table = CrossClassTable::build(
        geometry.n_tiles_x(),
        geometry.n_tiles_y(),
        &tile_results,
        |tile| (geometry.north(tile), geometry.west(tile)),
    );

    let (final_parent, feature_count) =
        cross_table.relabel(geometry.n_tiles_x(), geometry.n_tiles_y(), &tile_results)?;

    log::debug!("{feature_count} global feature(s) after cross-tile stitching");

    let tiles: Vec<Array2<u32>> = tile_results
        .into_iter()
        .zip(final_parent.iter())
        .map(|(mut result, parent)| {
            result.labels.mapv_inplace(|l| if l == 0 { 0 } else { parent[l as usize] });
            result.labels
        })
        .collect();

    Ok(Labeling { geometry: *geometry, tiles, feature_count })
}

/// Convenience entry point: validates `(tile_cols, tile_rows, logical_cols,
/// logical_rows)` into a [`TileGeometry`] and runs [`label_raster`] against
/// it in one call (§6's external interface).
pub fn label(
    raster: &Raster,
    tile_cols: usize,
    tile_rows: usize,
    logical_cols: usize,
    logical_rows: usize,
) -> Result<Labeling, CclError> {
    let geometry = TileGeometry::new(tile_cols, tile_rows, logical_cols, logical_rows)?;
    label_raster(raster, &geometry)
}
