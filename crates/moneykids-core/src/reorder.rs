//! Priority ordering helpers for wishlist items
//!
//! Positions are 1-based to match stored priorities.

use std::collections::HashSet;

use crate::error::{Error, Result};

/// Move the element at position `from` to position `to`, shifting the
/// elements in between by one.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<()> {
    let len = items.len();
    if from == 0 || from > len || to == 0 || to > len {
        return Err(Error::InvalidData(format!(
            "Position out of range: from {} to {} (1..={})",
            from, to, len
        )));
    }
    if from != to {
        let item = items.remove(from - 1);
        items.insert(to - 1, item);
    }
    Ok(())
}

/// Pair each id with its 1-based priority in list order
pub fn renumber(ids: &[i64]) -> Vec<(i64, i64)> {
    ids.iter()
        .enumerate()
        .map(|(idx, id)| (*id, idx as i64 + 1))
        .collect()
}

/// Check that `proposed` holds exactly the ids in `current`, each once
pub fn is_permutation(current: &[i64], proposed: &[i64]) -> bool {
    if current.len() != proposed.len() {
        return false;
    }
    let wanted: HashSet<i64> = current.iter().copied().collect();
    let mut seen = HashSet::with_capacity(proposed.len());
    proposed
        .iter()
        .all(|id| wanted.contains(id) && seen.insert(*id))
}
