//! Level-capped stochastic sort.
//!
//! A tunable middle ground between "shuffle" and "sort": apply `levels`
//! rounds of quicksort partitioning with a random pivot, then stop.  With
//! `levels = 0` the slice is fully shuffled; as `levels` grows the order
//! approaches a proper comparison sort, but elements near the middle of each
//! partition stay stochastically arranged.
//!
//! The agent state machine uses this to rank candidate interaction partners
//! by affinity with only a *preference* for the highest-affinity candidates,
//! rather than a deterministic greedy ordering.  The partition routine is
//! deliberately hand-rolled — the partial-ness is the point, and no library
//! sort exposes it.

use crate::SimRng;

/// Partially sort `slice` in place.
///
/// `comes_before(a, b)` should return `true` when `a` must precede `b`
/// (e.g. `|a, b| a > b` for descending order).
///
/// - `levels == 0`: Fisher-Yates shuffle, no ordering at all.
/// - `levels >= log2(len)`: indistinguishable from a full quicksort.
pub fn stochastic_sort<T, F>(rng: &mut SimRng, slice: &mut [T], levels: u32, comes_before: F)
where
    F: Fn(&T, &T) -> bool,
{
    if levels == 0 {
        rng.shuffle(slice);
        return;
    }
    let len = slice.len();
    sort_rec(rng, slice, 0, len, 0, levels, &comes_before);
}

fn sort_rec<T, F>(
    rng:          &mut SimRng,
    slice:        &mut [T],
    low:          usize,
    high:         usize,
    level:        u32,
    max_level:    u32,
    comes_before: &F,
) where
    F: Fn(&T, &T) -> bool,
{
    if level >= max_level || low + 1 >= high {
        return;
    }
    let q = partition(rng, slice, low, high, comes_before);
    sort_rec(rng, slice, low, q, level + 1, max_level, comes_before);
    sort_rec(rng, slice, q + 1, high, level + 1, max_level, comes_before);
}

/// Lomuto partition of `slice[low..high]` around a random pivot.
/// Returns the pivot's final index.
fn partition<T, F>(rng: &mut SimRng, slice: &mut [T], low: usize, high: usize, comes_before: &F) -> usize
where
    F: Fn(&T, &T) -> bool,
{
    let pivot_idx = rng.gen_range(low..high);
    slice.swap(pivot_idx, high - 1);

    let mut j = low;
    for i in low..high - 1 {
        if comes_before(&slice[i], &slice[high - 1]) {
            slice.swap(i, j);
            j += 1;
        }
    }
    slice.swap(j, high - 1);
    j
}
