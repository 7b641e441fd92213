//! Intra-tile scans: C2 (first scan + equivalence recording), C5 (second
//! scan, rewriting provisional labels to local roots).
//!
//! Grounded on `original_source/connected_component_labeling.c`'s
//! `first_scan`/`second_scan`, restructured around [`UnionFind`] instead of
//! the source's two-column `PARENT` table, and on the teacher's
//! `measurements::label`, which scans the same `{nw, nn, ne, ww}` mask
//! (there generalized to N dimensions via a structuring element; here fixed
//! to the eight-connectivity case).

use ndarray::{Array2, ArrayView2};

use crate::equivalence::UnionFind;
use crate::raster::BACKGROUND;

/// Result of running C2 (first scan) and C3/C4 (union + relabel) over one
/// tile.
pub struct TileResult {
    /// The tile's label matrix (`TX x TY`), already rewritten to local
    /// roots by C5.
    pub labels: Array2<u32>,
    /// Local roots present in this tile, ascending (`mc[tile]` values).
    pub roots: Vec<u32>,
}

/// Runs C2 over a single tile: forward raster scan with the mask
/// `{nw, nn, ne, ww}`, tie-break order `nn > ww > nw > ne` (§4.2).
///
/// Returns the provisional label matrix together with the union-find that
/// recorded intra-tile equivalences as it went.
pub fn first_scan(tile: ArrayView2<bool>) -> (Array2<u32>, UnionFind) {
    let (rows, cols) = tile.dim();
    let mut labels = Array2::<u32>::zeros((rows, cols));
    let mut uf = UnionFind::new();

    for r in 0..rows {
        for c in 0..cols {
            if !tile[(r, c)] {
                continue;
            }

            let nn = if r > 0 { labels[(r - 1, c)] } else { BACKGROUND };
            let ww = if c > 0 { labels[(r, c - 1)] } else { BACKGROUND };
            let nw = if r > 0 && c > 0 { labels[(r - 1, c - 1)] } else { BACKGROUND };
            let ne = if r > 0 && c + 1 < cols { labels[(r - 1, c + 1)] } else { BACKGROUND };

            let label = if nn != BACKGROUND {
                nn
            } else if ww != BACKGROUND {
                if ne != BACKGROUND && ne != ww {
                    uf.union(ne, ww);
                }
                ww
            } else if nw != BACKGROUND {
                if ne != BACKGROUND {
                    uf.union(ne, nw);
                }
                nw
            } else if ne != BACKGROUND {
                ne
            } else {
                uf.make_label()
            };

            labels[(r, c)] = label;
        }
    }

    (labels, uf)
}

/// Runs C3 (union closure, already incremental via [`UnionFind`]), C4
/// (dense relabel), and C5 (second scan rewriting the tile in place) in one
/// pass, returning the finished [`TileResult`].
pub fn resolve_tile(tile: ArrayView2<bool>) -> TileResult {
    let (mut labels, mut uf) = first_scan(tile);

    let relabel = uf.relabel(); // C4: local_label -> root_local_label
    labels.mapv_inplace(|l| relabel[l as usize]); // C5

    let roots = uf.roots();

    TileResult { labels, roots }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn background_only_tile_has_no_labels() {
        let tile = Array2::from_elem((4, 4), false);
        let result = resolve_tile(tile.view());
        assert!(result.roots.is_empty());
        assert!(result.labels.iter().all(|&l| l == 0));
    }

    #[test]
    fn all_foreground_tile_is_one_component() {
        let tile = Array2::from_elem((4, 4), true);
        let result = resolve_tile(tile.view());
        assert_eq!(result.roots.len(), 1);
        let root = result.roots[0];
        assert!(result.labels.iter().all(|&l| l == root));
    }

    #[test]
    fn scenario_a_five_by_five_raster() {
        // Scenario A's raster (§8), 1 tile, TX=TY=6. Under eight-connectivity
        // (2,2) is diagonally adjacent to (1,1), so it joins the same
        // component as (1,0)/(1,1)/(2,0) rather than standing alone: three
        // components total.
        let tile = array![
            [false, false, false, false, true],
            [true, true, false, false, true],
            [true, false, true, false, false],
            [false, false, false, false, true],
            [false, false, false, false, false],
        ];
        let result = resolve_tile(tile.view());
        assert_eq!(result.roots.len(), 3);

        let labels = &result.labels;
        // (0,4) and (1,4) are vertically adjacent, one component.
        assert_eq!(labels[(0, 4)], labels[(1, 4)]);
        // (1,0),(1,1),(2,0),(2,2) are one component (diagonal chain).
        assert_eq!(labels[(1, 0)], labels[(1, 1)]);
        assert_eq!(labels[(1, 1)], labels[(2, 0)]);
        assert_eq!(labels[(2, 0)], labels[(2, 2)]);
        // (3,4) is isolated.
        let distinct: std::collections::HashSet<u32> =
            [labels[(0, 4)], labels[(1, 0)], labels[(3, 4)]].into_iter().collect();
        assert_eq!(distinct.len(), 3);
    }

    #[test]
    fn diagonal_chain_is_eight_connected() {
        let tile = array![[true, false], [false, true]];
        let result = resolve_tile(tile.view());
        assert_eq!(result.roots.len(), 1);
        assert_eq!(result.labels[(0, 0)], result.labels[(1, 1)]);
    }
}
