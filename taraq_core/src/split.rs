use std::collections::BTreeMap;

use crate::player::PlayerId;

/// Pending heart deltas of a split turn, keyed by target player.
/// Zero deltas are never stored.
pub type SplitActions = BTreeMap<PlayerId, i32>;

/// Points of the roll already allocated.
pub fn used_points(pending: &SplitActions) -> u32 {
    pending.values().map(|delta| delta.unsigned_abs()).sum()
}

/// Points of the roll still free to allocate.
pub fn remaining_points(pending: &SplitActions, budget: u8) -> i64 {
    budget as i64 - used_points(pending) as i64
}

/// Whether moving `target`'s pending delta by `delta` keeps the total
/// allocation within `budget`.
pub fn accepts(pending: &SplitActions, target: &str, delta: i32, budget: u8) -> bool {
    let other_usage: u64 = pending
        .iter()
        .filter(|(id, _)| id.as_str() != target)
        .map(|(_, d)| d.unsigned_abs() as u64)
        .sum();
    let current = pending.get(target).copied().unwrap_or(0) as i64;
    let new_delta = current + delta as i64;

    other_usage + new_delta.unsigned_abs() <= budget as u64
}

/// Applies the adjustment if the validator accepts it. Returns whether anything changed.
pub fn adjust(pending: &mut SplitActions, target: &str, delta: i32, budget: u8) -> bool {
    if delta == 0 || !accepts(pending, target, delta, budget) {
        return false;
    }
    let new_delta = pending.get(target).copied().unwrap_or(0) + delta;
    if new_delta == 0 {
        pending.remove(target);
    } else {
        pending.insert(target.to_string(), new_delta);
    }
    true
}
