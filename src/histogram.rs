//! Per-label pixel counts over an assembled label matrix.
//!
//! Grounded on `original_source/connected_component_labeling.c`'s `cont`
//! array (incremented once per pixel at each scan) and the teacher's
//! `measurements::label_histogram`, which computes the same count in one
//! pass with `Zip::from(...).for_each`.

use ndarray::{Array2, Zip};

/// Counts pixels per global label over `labels`.
///
/// * `labels` - assembled label matrix, as returned by
///   [`crate::pipeline::Labeling::assemble`].
/// * `nb_features` - `G`, the number of distinct foreground components.
///
/// Index 0 holds the background pixel count; index `g` (for `1 <= g <=
/// nb_features`) holds the pixel count of global feature `g`.
pub fn label_histogram(labels: &Array2<u32>, nb_features: usize) -> Vec<usize> {
    let mut count = vec![0usize; nb_features + 1];
    Zip::from(labels).for_each(|&l| {
        count[l as usize] += 1;
    });
    count
}
