//! Within-tile label equivalence (C1: record, C3: union, C4: relabel).
//!
//! The source's two-column `PARENT` table plus its quadratic closure pass
//! (`union_equivalence` chasing `PARENT[k] != 0`, and the combined-chain
//! resolution in the tiled variant) is replaced here with a union-find over
//! local labels, with path compression and union-by-rank. The external
//! contract is unchanged: `root_of` always resolves to the same partition a
//! quadratic closure would produce, and every root is its own parent.
//!
//! This generalizes the teacher's `measurements::take_label_or_merge` /
//! `mark_for_merge`, which already walk parent pointers to a root and
//! rewrite every visited label to point at it directly - that's path
//! compression without the name. Rank tracking is the only true addition.

use crate::raster::BACKGROUND;

/// A union-find over local labels `1..=n`, where label `0` is reserved for
/// the background and is never unioned with anything.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<u32>,
    rank: Vec<u8>,
}

impl Default for UnionFind {
    fn default() -> Self {
        Self::new()
    }
}

impl UnionFind {
    /// Creates an empty union-find. Index `0` (background) is pre-seeded
    /// as its own root so lookups never need to special-case it.
    pub fn new() -> Self {
        UnionFind { parent: vec![BACKGROUND], rank: vec![0] }
    }

    /// Allocates a fresh local label and returns it (C2's `++maxcount`).
    /// Labels are handed out in strictly increasing order starting at 1.
    pub fn make_label(&mut self) -> u32 {
        let label = self.parent.len() as u32;
        self.parent.push(label);
        self.rank.push(0);
        label
    }

    /// Number of local labels allocated so far (`maxcount`), excluding the
    /// reserved background slot.
    pub fn len(&self) -> usize {
        self.parent.len() - 1
    }

    /// True if no labels have been allocated yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finds the root of `label`, compressing the traversed path.
    pub fn find(&mut self, label: u32) -> u32 {
        debug_assert!((label as usize) < self.parent.len(), "label out of range");
        let mut root = label;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        let mut cur = label;
        while self.parent[cur as usize] != root {
            let next = self.parent[cur as usize];
            self.parent[cur as usize] = root;
            cur = next;
        }
        root
    }

    /// Records that `a` and `b` denote the same component (C1's `record`).
    /// A no-op when `a == b`, when either is the background, or when they
    /// are already known to be equivalent.
    ///
    /// Standard union-by-rank. When both roots have equal rank the tie is
    /// broken toward the smaller label, echoing the source's
    /// `record_equivalence(a, b) => PARENT[max(a,b)] = min(a,b)`
    /// convention without forcing it as a general invariant.
    pub fn union(&mut self, a: u32, b: u32) {
        if a == BACKGROUND || b == BACKGROUND || a == b {
            return;
        }
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra as usize].cmp(&self.rank[rb as usize]) {
            std::cmp::Ordering::Less => self.parent[ra as usize] = rb,
            std::cmp::Ordering::Greater => self.parent[rb as usize] = ra,
            std::cmp::Ordering::Equal => {
                let (small, big) = if ra < rb { (ra, rb) } else { (rb, ra) };
                self.parent[big as usize] = small;
                self.rank[small as usize] += 1;
            }
        }
    }

    /// Builds the dense `local_label -> root_local_label` table (C4),
    /// i.e. `new_PARENT` in the source. Index `0` maps to `0`.
    pub fn relabel(&mut self) -> Vec<u32> {
        let mut table = vec![BACKGROUND; self.parent.len()];
        for label in 1..self.parent.len() as u32 {
            table[label as usize] = self.find(label);
        }
        table
    }

    /// The local roots present, in ascending order - used as `mc[tile]`
    /// (§3's "global count map") once duplicates are removed by the caller.
    pub fn roots(&mut self) -> Vec<u32> {
        let mut roots: Vec<u32> = (1..self.parent.len() as u32).map(|l| self.find(l)).collect();
        roots.sort_unstable();
        roots.dedup();
        roots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_labels_are_their_own_root() {
        let mut uf = UnionFind::new();
        let a = uf.make_label();
        let b = uf.make_label();
        assert_eq!(uf.find(a), a);
        assert_eq!(uf.find(b), b);
        assert_ne!(a, b);
    }

    #[test]
    fn union_merges_all_three_into_one_class() {
        let mut uf = UnionFind::new();
        let a = uf.make_label();
        let b = uf.make_label();
        let c = uf.make_label();
        uf.union(b, c);
        uf.union(a, c);
        let ra = uf.find(a);
        assert_eq!(uf.find(b), ra);
        assert_eq!(uf.find(c), ra);
    }

    #[test]
    fn combined_chains_collapse_to_one_root() {
        // Mirrors the source's "(5,3) and (5,2)" combined-chain example:
        // three labels that are transitively the same component.
        let mut uf = UnionFind::new();
        let labels: Vec<u32> = (0..5).map(|_| uf.make_label()).collect();
        uf.union(labels[4], labels[2]);
        uf.union(labels[4], labels[1]);
        let root = uf.find(labels[1]);
        assert_eq!(uf.find(labels[2]), root);
        assert_eq!(uf.find(labels[4]), root);
    }

    #[test]
    fn relabel_table_is_idempotent_on_roots() {
        let mut uf = UnionFind::new();
        let a = uf.make_label();
        let b = uf.make_label();
        uf.union(a, b);
        let table = uf.relabel();
        let root = table[a as usize];
        assert_eq!(table[root as usize], root);
    }

    #[test]
    fn roots_are_deduplicated_and_sorted() {
        let mut uf = UnionFind::new();
        let a = uf.make_label();
        let b = uf.make_label();
        let c = uf.make_label();
        uf.union(a, b);
        let roots = uf.roots();
        assert_eq!(roots, vec![a.min(b), c]);
    }
}
