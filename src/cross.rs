//! Cross-tile stitching: C6 (cross-equivalence builder), C7 (cross-union),
//! C8 (cross-relabel).
//!
//! The source's cross-parent table is a list of `(tile, local_root)` pairs
//! searched by row order and row identity - "find the earlier row whose
//! left pair equals this row's right pair" (§4.7, §4.8). That search is
//! replaced here with a `HashMap<(TileId, u32), ClassHandle>` plus a plain
//! union-find over the handles (§9's re-architecture note): seam rows and
//! self-root rows become two constructors of the same `register` operation
//! rather than sharing positional storage.

use std::collections::HashMap;

use crate::error::{CclError, Stage};
use crate::geometry::TileId;
use crate::tile_scan::TileResult;

/// A node identifier inside the cross-tile union-find.
type ClassHandle = usize;

/// Closes inter-tile equivalences into a forest of class roots and then
/// assigns each root a dense global ID.
#[derive(Debug, Default)]
pub struct CrossClassTable {
    index: HashMap<(TileId, u32), ClassHandle>,
    keys: Vec<(TileId, u32)>,
    parent: Vec<ClassHandle>,
    rank: Vec<u8>,
}

impl CrossClassTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        CrossClassTable::default()
    }

    /// Returns the handle for `(tile, local_root)`, registering it as a
    /// fresh singleton class if this is the first time it's seen. This is
    /// what makes self-root rows (§4.6 step 3) and seam rows (steps 1-2)
    /// the same operation: naming a `(tile, local_root)` pair always
    /// ensures its node exists, whether or not it's ever unioned with
    /// anything else.
    fn get_or_insert(&mut self, key: (TileId, u32)) -> ClassHandle {
        if let Some(&h) = self.index.get(&key) {
            return h;
        }
        let h = self.parent.len();
        self.parent.push(h);
        self.rank.push(0);
        self.keys.push(key);
        self.index.insert(key, h);
        h
    }

    fn find(&mut self, h: ClassHandle) -> ClassHandle {
        let mut root = h;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = h;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Records that `(tile_a, root_a)` and `(tile_b, root_b)` are the same
    /// component (a seam row, §4.6 steps 1-2).
    fn union(&mut self, a: (TileId, u32), b: (TileId, u32)) {
        let ha = self.get_or_insert(a);
        let hb = self.get_or_insert(b);
        let ra = self.find(ha);
        let rb = self.find(hb);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }

    /// Ensures `(tile, local_root)` has a node, without unioning it with
    /// anything (a self-root row, §4.6 step 3 - here unconditional, since
    /// `get_or_insert` is already idempotent with any seam row naming the
    /// same pair first).
    fn register(&mut self, key: (TileId, u32)) {
        self.get_or_insert(key);
    }

    /// C6: builds the cross-equivalence table for every tile, in row-major
    /// order (required so class representative choice is deterministic,
    /// per §5 "Ordering").
    ///
    /// `tiles` must be indexed by `TileId::index(n_tiles_x)`.
    pub fn build<F>(n_tiles_x: usize, n_tiles_y: usize, tiles: &[TileResult], neighbor_of: F) -> Self
    where
        F: Fn(TileId) -> (Option<TileId>, Option<TileId>),
    {
        let mut table = CrossClassTable::new();

        for ty in 0..n_tiles_y {
            for tx in 0..n_tiles_x {
                let tile = TileId { tx, ty };
                let idx = tile.index(n_tiles_x);
                let this = &tiles[idx];
                let (north, west) = neighbor_of(tile);

                // North seam.
                if let Some(north) = north {
                    let north_result = &tiles[north.index(n_tiles_x)];
                    let last_row = north_result.labels.nrows() - 1;
                    for c in 0..this.labels.ncols().min(north_result.labels.ncols()) {
                        let neighbor_label = north_result.labels[(last_row, c)];
                        if neighbor_label != 0 {
                            let own_label = this.labels[(0, c)];
                            if own_label != 0 {
                                table.union((tile, own_label), (north, neighbor_label));
                            }
                        }
                    }
                }

                // West seam.
                if let Some(west) = west {
                    let west_result = &tiles[west.index(n_tiles_x)];
                    let last_col = west_result.labels.ncols() - 1;
                    for r in 0..this.labels.nrows().min(west_result.labels.nrows()) {
                        let neighbor_label = west_result.labels[(r, last_col)];
                        if neighbor_label != 0 {
                            let own_label = this.labels[(r, 0)];
                            if own_label != 0 {
                                table.union((tile, own_label), (west, neighbor_label));
                            }
                        }
                    }
                }

                // Self roots: guarantee every local root of this tile has a
                // node, even ones never named by a seam row.
                for &root in &this.roots {
                    table.register((tile, root));
                }
            }
        }

        table
    }

    /// C8: assigns dense global IDs `1..=G` to class roots and builds the
    /// per-tile `local_root -> global_id` table plus the feature count `G`.
    ///
    /// `tiles_in_order` and `n_tiles_x` are used only to size and index the
    /// output; any row-major walk works since the union-find closure is
    /// already complete by the time this runs.
    pub fn relabel(
        &mut self,
        n_tiles_x: usize,
        n_tiles_y: usize,
        tiles: &[TileResult],
    ) -> Result<(Vec<Vec<u32>>, usize), CclError> {
        let mut global_id_of_root: HashMap<ClassHandle, u32> = HashMap::new();
        let mut next_global_id: u32 = 1;

        let mut final_parent: Vec<Vec<u32>> = Vec::with_capacity(n_tiles_x * n_tiles_y);
        for tile_result in tiles {
            final_parent.push(vec![0u32; tile_result.roots.iter().max().map_or(1, |m| *m as usize + 1)]);
        }

        for ty in 0..n_tiles_y {
            for tx in 0..n_tiles_x {
                let tile = TileId { tx, ty };
                let idx = tile.index(n_tiles_x);
                for &root in &tiles[idx].roots {
                    let handle = *self.index.get(&(tile, root)).ok_or_else(|| {
                        let detail = format!(
                            "no cross-parent node registered for tile {tx},{ty} local root {root}"
                        );
                        log::error!("{} detected invariant violation: {detail}", Stage::CrossRelabel);
                        CclError::InvariantViolation { stage: Stage::CrossRelabel, detail }
                    })?;
                    let class_root = self.find(handle);
                    let global_id = *global_id_of_root.entry(class_root).or_insert_with(|| {
                        let id = next_global_id;
                        next_global_id += 1;
                        id
                    });
                    final_parent[idx][root as usize] = global_id;
                }
            }
        }

        Ok((final_parent, (next_global_id - 1) as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn tile_result(labels: ndarray::Array2<u32>, roots: Vec<u32>) -> TileResult {
        TileResult { labels, roots }
    }

    #[test]
    fn single_tile_round_trips_its_own_roots() {
        let labels = array![[1u32, 0], [0, 1]];
        let tiles = vec![tile_result(labels, vec![1])];
        let mut table = CrossClassTable::build(1, 1, &tiles, |_| (None, None));
        let (final_parent, g) = table.relabel(1, 1, &tiles).unwrap();
        assert_eq!(g, 1);
        assert_eq!(final_parent[0][1], 1);
    }

    #[test]
    fn seam_rows_merge_components_across_tiles() {
        // Two 1-row-overlap tiles sharing a column; both name local root 1
        // at the shared seam.
        let left = array![[1u32, 1]];
        let right = array![[1u32, 0]];
        let tiles = vec![tile_result(left, vec![1]), tile_result(right, vec![1])];

        let mut table = CrossClassTable::build(2, 1, &tiles, |tile| {
            let west = (tile.tx > 0).then(|| TileId { tx: tile.tx - 1, ty: tile.ty });
            (None, west)
        });
        let (final_parent, g) = table.relabel(2, 1, &tiles).unwrap();
        assert_eq!(g, 1);
        assert_eq!(final_parent[0][1], final_parent[1][1]);
    }

    #[test]
    fn disjoint_tiles_get_distinct_global_ids() {
        let a = array![[1u32]];
        let b = array![[1u32]];
        let tiles = vec![tile_result(a, vec![1]), tile_result(b, vec![1])];

        let mut table = CrossClassTable::build(2, 1, &tiles, |_| (None, None));
        let (final_parent, g) = table.relabel(2, 1, &tiles).unwrap();
        assert_eq!(g, 2);
        assert_ne!(final_parent[0][1], final_parent[1][1]);
    }
}
