use std::collections::HashSet;

use match3_core::{Mask256, Position};
use match3_shape_detector::DetectedShape;

/// Cell-disjointness testing for a set of candidates, backed by
/// fixed-width bitmasks for components within the 256-cell cap and
/// falling back to hash-set overlap for larger components.
pub(crate) enum Disjointness {
    Bitmask(Vec<Mask256>),
    HashSets(Vec<HashSet<Position>>),
}

impl Disjointness {
    pub(crate) fn build(universe: &[Position], candidates: &[DetectedShape]) -> Self {
        if universe.len() <= Mask256::CAPACITY {
            let index: std::collections::HashMap<Position, usize> = universe
                .iter()
                .enumerate()
                .map(|(i, &p)| (p, i))
                .collect();
            let masks = candidates
                .iter()
                .map(|c| Mask256::from_indices(c.cells.iter().map(|p| index[p])))
                .collect();
            Disjointness::Bitmask(masks)
        } else {
            let sets = candidates
                .iter()
                .map(|c| c.cells.iter().copied().collect())
                .collect();
            Disjointness::HashSets(sets)
        }
    }

    pub(crate) fn disjoint(&self, i: usize, j: usize) -> bool {
        match self {
            Disjointness::Bitmask(masks) => masks[i].is_disjoint(&masks[j]),
            Disjointness::HashSets(sets) => sets[i].is_disjoint(&sets[j]),
        }
    }

    pub(crate) fn disjoint_from_all(&self, i: usize, chosen: &[usize]) -> bool {
        chosen.iter().all(|&j| self.disjoint(i, j))
    }
}

/// Exact maximum-weight disjoint subset via branch-and-bound with
/// suffix-sum pruning. `items` must already be sorted by weight
/// descending; `items.len()` must be small (the caller enforces the
/// <=25 cap before calling this).
pub(crate) fn exact_max_weight_subset(
    items: &[usize],
    weights: &[u32],
    disjointness: &Disjointness,
) -> Vec<usize> {
    let n = items.len();
    let mut suffix_sum = vec![0u64; n + 1];
    for i in (0..n).rev() {
        suffix_sum[i] = suffix_sum[i + 1] + u64::from(weights[items[i]]);
    }

    let mut best_weight = 0u64;
    let mut best_choice: Vec<usize> = Vec::new();
    let mut current_choice: Vec<usize> = Vec::new();

    fn recurse(
        depth: usize,
        items: &[usize],
        weights: &[u32],
        disjointness: &Disjointness,
        suffix_sum: &[u64],
        current_weight: u64,
        current_choice: &mut Vec<usize>,
        best_weight: &mut u64,
        best_choice: &mut Vec<usize>,
    ) {
        if current_weight + suffix_sum[depth] <= *best_weight {
            return;
        }
        if depth == items.len() {
            if current_weight > *best_weight {
                *best_weight = current_weight;
                *best_choice = current_choice.clone();
            }
            return;
        }

        let candidate = items[depth];
        if disjointness.disjoint_from_all(candidate, current_choice) {
            current_choice.push(candidate);
            recurse(
                depth + 1,
                items,
                weights,
                disjointness,
                suffix_sum,
                current_weight + u64::from(weights[candidate]),
                current_choice,
                best_weight,
                best_choice,
            );
            let _ = current_choice.pop();
        }

        recurse(
            depth + 1,
            items,
            weights,
            disjointness,
            suffix_sum,
            current_weight,
            current_choice,
            best_weight,
            best_choice,
        );
    }

    recurse(
        0,
        items,
        weights,
        disjointness,
        &suffix_sum,
        0,
        &mut current_choice,
        &mut best_weight,
        &mut best_choice,
    );
    best_choice
}

/// Greedy fallback: visit `order` in the given sequence, taking any
/// candidate disjoint from everything already chosen.
pub(crate) fn greedy_subset(order: &[usize], disjointness: &Disjointness) -> Vec<usize> {
    let mut chosen = Vec::new();
    for &candidate in order {
        if disjointness.disjoint_from_all(candidate, &chosen) {
            chosen.push(candidate);
        }
    }
    chosen
}
