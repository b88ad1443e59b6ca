//! Deterministic occupant placement for rendering.
//!
//! Visualizers draw a location's occupants spread over the location's pixel
//! region.  The engine guarantees occupancy never exceeds capacity (and
//! capacity derives from pixel area), so a region always has room — this
//! helper just turns "N occupants" into N *distinct* cells of a `w × h`
//! grid, deterministically for a given RNG state so frames don't jitter
//! between re-renders of the same tick.

use rustc_hash::FxHashSet;

use epi_core::SimRng;

use crate::error::{OutputError, OutputResult};

/// Pick `count` distinct cells of a `width × height` grid, uniformly at
/// random, in a deterministic order for a given RNG state.
///
/// Errors if the grid cannot hold `count` occupants — that means the
/// occupancy bookkeeping upstream was violated, since capacity is derived
/// from the region's area.
pub fn spread_coords(
    rng:    &mut SimRng,
    width:  u32,
    height: u32,
    count:  usize,
) -> OutputResult<Vec<(u32, u32)>> {
    let cells = (width as usize) * (height as usize);
    if count > cells {
        return Err(OutputError::GridTooSmall { needed: count, cells });
    }

    // Rejection sampling is fine here: renderers place at most
    // capacity ≈ area occupants, and densities near 100% only occur on
    // tiny test grids where the loop still terminates quickly.
    let mut taken: FxHashSet<(u32, u32)> = FxHashSet::default();
    let mut coords = Vec::with_capacity(count);
    while coords.len() < count {
        let cell = (rng.gen_range(0..width), rng.gen_range(0..height));
        if taken.insert(cell) {
            coords.push(cell);
        }
    }
    Ok(coords)
}
