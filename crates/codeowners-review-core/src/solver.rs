//! Minimum hitting sets over owner sets.
//!
//! Given one owner set per outstanding rule, find every smallest group of
//! owners that includes at least one owner from each set. The search is an
//! exact brute force over combinations of the owner universe, so it is only
//! attempted when the universe holds at most [`MAX_UNIVERSE_SIZE`] owners.

use log::{debug, trace};
use std::collections::BTreeSet;

/// The largest owner universe the solver will search.
pub const MAX_UNIVERSE_SIZE: usize = 12;

/// Iterates over the `k`-element combinations of a slice in lexicographic
/// index order.
#[derive(Debug, Clone)]
pub struct Combinations<'a, T> {
    pool: &'a [T],
    indices: Option<Vec<usize>>,
    started: bool,
}

impl<'a, T> Combinations<'a, T> {
    /// Creates an iterator over the `k`-element combinations of `pool`.
    pub fn new(pool: &'a [T], k: usize) -> Self {
        let indices = (k <= pool.len()).then(|| (0..k).collect());
        Self {
            pool,
            indices,
            started: false,
        }
    }
}

impl<'a, T> Iterator for Combinations<'a, T> {
    type Item = Vec<&'a T>;

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.pool.len();
        let indices = self.indices.as_mut()?;
        let k = indices.len();

        if self.started {
            // Rightmost index that can still move right.
            match (0..k).rev().find(|&i| indices[i] != i + n - k) {
                Some(i) => {
                    indices[i] += 1;
                    for j in i + 1..k {
                        indices[j] = indices[j - 1] + 1;
                    }
                }
                None => {
                    self.indices = None;
                    return None;
                }
            }
        } else {
            self.started = true;
        }

        Some(indices.iter().map(|&i| &self.pool[i]).collect())
    }
}

/// Returns every minimum-size set of elements that intersects each of `sets`.
///
/// Empty input sets are ignored. The result is empty when there is nothing
/// to hit or the universe exceeds [`MAX_UNIVERSE_SIZE`]. Each returned set is
/// sorted, and sets are listed in lexicographic order.
pub fn minimum_hitting_sets<T: Ord + Clone>(sets: &[Vec<T>]) -> Vec<Vec<T>> {
    let family: BTreeSet<BTreeSet<&T>> = sets
        .iter()
        .filter(|set| !set.is_empty())
        .map(|set| set.iter().collect())
        .collect();

    let universe: Vec<&T> = family
        .iter()
        .flatten()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    if family.is_empty() || universe.is_empty() {
        return Vec::new();
    }
    if universe.len() > MAX_UNIVERSE_SIZE {
        debug!(
            "Owner universe of {} exceeds {} - skipping recommendations",
            universe.len(),
            MAX_UNIVERSE_SIZE
        );
        return Vec::new();
    }

    let required = prune_supersets(family);
    trace!(
        "Searching {} owners against {} owner sets",
        universe.len(),
        required.len()
    );

    for k in 1..=universe.len() {
        let found: Vec<Vec<T>> = Combinations::new(&universe, k)
            .filter(|combo| {
                required
                    .iter()
                    .all(|set| combo.iter().any(|owner| set.contains(*owner)))
            })
            .map(|combo| combo.into_iter().map(|owner| (*owner).clone()).collect())
            .collect();

        if !found.is_empty() {
            debug!("Found {} minimum sets of size {}", found.len(), k);
            return found;
        }
    }

    Vec::new()
}

/// Drops every set that contains another set of the family.
fn prune_supersets<T: Ord>(family: BTreeSet<BTreeSet<T>>) -> Vec<BTreeSet<T>> {
    let mut by_size: Vec<BTreeSet<T>> = family.into_iter().collect();
    by_size.sort_by_key(BTreeSet::len);

    let mut kept: Vec<BTreeSet<T>> = Vec::new();
    for set in by_size {
        if !kept.iter().any(|smaller| smaller.is_subset(&set)) {
            kept.push(set);
        }
    }
    kept
}
