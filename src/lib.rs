#![warn(missing_docs, trivial_casts, trivial_numeric_casts, unused_qualifications)]

//! The `tiled-ccl` crate labels connected components of a binary raster by
//! partitioning it into overlapping tiles, labeling each tile independently,
//! and stitching the per-tile results back into one globally consistent set
//! of component IDs.
//!
//! The pipeline follows the data-flow of the source material's nine
//! components: [`tile_scan`] runs the first scan and the intra-tile
//! union/relabel/second-scan (C2-C5) over one tile at a time, [`cross`] runs
//! the cross-tile equivalence build, union, and relabel (C6-C8) as a single
//! global reduction, and [`pipeline`] orchestrates the whole thing plus the
//! per-tile third scan (C9) and final assembly.

mod cross;
mod equivalence;
mod error;
mod geometry;
mod histogram;
mod pipeline;
mod raster;
mod tile_scan;

pub use crate::error::{CclError, Stage};
pub use crate::geometry::{TileGeometry, TileId};
pub use crate::pipeline::{label, label_raster, Labeling};
pub use crate::raster::{Raster, BACKGROUND, FIRST_LABEL};
