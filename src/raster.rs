//! The binary raster type and its foreground/background convention.

use ndarray::Array2;

/// A rectangular binary raster: `true` is foreground (`Vo`), `false` is
/// background (`Vb`). Specializes the crate's usual n-dimensional `Mask`
/// convention to the 2D case this pipeline operates on.
pub type Raster = Array2<bool>;

/// Label value reserved for background pixels throughout the pipeline.
pub const BACKGROUND: u32 = 0;

/// First label value handed out by the first scan (C2).
pub const FIRST_LABEL: u32 = 1;
