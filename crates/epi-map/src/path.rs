//! Route computation over the Public-corridor graph.
//!
//! # Algorithm
//!
//! Uniform-cost search (Dijkstra) that only traverses Public-type locations
//! as intermediate hops, with edge weight = the *destination* hop's
//! `travel_time`.  Frontier order is informed by a Manhattan-distance
//! heuristic to the target (scaled by the map's `time_per_distance` factor).
//!
//! The heuristic is **not guaranteed admissible** — a big, slow public
//! square can cost more to cross than its extent suggests — so the returned
//! path is "good enough", not provably shortest.  That trade-off is
//! accepted: agents re-route thousands of times per simulated day and fewer
//! node expansions beat strict optimality.
//!
//! Ties in estimated total cost break by discovery order (a monotonically
//! increasing sequence counter), never by comparing location ids, so the
//! expansion order carries no accidental meaning.

use std::cmp::Ordering;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use epi_core::LocationId;

use crate::error::{MapError, MapResult};
use crate::location::LocationType;
use crate::map::WorldMap;

// ── Frontier entry ───────────────────────────────────────────────────────────

/// One frontier candidate: estimated total cost, discovery sequence, node.
struct Candidate {
    est:  f32,
    seq:  u32,
    node: LocationId,
    cost: f32,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Primary: estimated total cost.  Secondary: first-discovered wins.
        self.est
            .total_cmp(&other.est)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

// ── Search ───────────────────────────────────────────────────────────────────

impl WorldMap {
    /// Compute a travel path from `from` to `to`.
    ///
    /// Returns the ordered list of locations still to traverse: it starts
    /// with the first Public hop out of `from` and ends with `to` itself.
    /// `path(a, a)` is the empty path.
    ///
    /// # Errors
    ///
    /// - [`MapError::NoAdjacentPublicSpace`] if `from` is not Public and has
    ///   no Public neighbor — a map-data error, unrecoverable at runtime.
    /// - [`MapError::NoRoute`] if the Public corridors don't connect the two.
    pub fn path(&self, from: LocationId, to: LocationId) -> MapResult<Vec<LocationId>> {
        if from == to {
            return Ok(Vec::new());
        }

        // Step out onto public space first.  Adjacency is sorted, so the
        // lowest-id public neighbor is the deterministic choice.
        let start = if self.location(from).kind == LocationType::Public {
            from
        } else {
            *self
                .location(from)
                .adjacent()
                .iter()
                .find(|&&adj| self.location(adj).kind == LocationType::Public)
                .ok_or(MapError::NoAdjacentPublicSpace(from))?
        };
        if start == to {
            return Ok(vec![to]);
        }

        let target_center = self.location(to).center;
        let n = self.len();
        let mut best = vec![f32::INFINITY; n];
        let mut prev = vec![LocationId::INVALID; n];
        let mut seq = 0u32;

        let mut heap: BinaryHeap<Reverse<Candidate>> = BinaryHeap::new();
        best[start.index()] = 0.0;
        heap.push(Reverse(Candidate { est: 0.0, seq, node: start, cost: 0.0 }));

        while let Some(Reverse(cand)) = heap.pop() {
            if cand.node == to {
                let mut path = self.reconstruct(prev, start, to);
                if start == from {
                    // Already standing on the first public hop — the path
                    // holds only the locations still ahead of us.
                    path.remove(0);
                }
                return Ok(path);
            }
            // Skip stale frontier entries.
            if cand.cost > best[cand.node.index()] {
                continue;
            }

            for &next in self.location(cand.node).adjacent() {
                let loc = self.location(next);
                // Only public space may be traversed; the target itself is
                // always enterable as the final hop.
                if loc.kind != LocationType::Public && next != to {
                    continue;
                }
                let cost = cand.cost + loc.travel_time as f32;
                if cost < best[next.index()] {
                    best[next.index()] = cost;
                    prev[next.index()] = cand.node;
                    seq += 1;
                    let est = cost + loc.center.manhattan(target_center) * self.time_per_distance;
                    heap.push(Reverse(Candidate { est, seq, node: next, cost }));
                }
            }
        }

        Err(MapError::NoRoute { from, to })
    }

    /// Walk `prev` back from `to`, producing `[start, ..., to]`.
    fn reconstruct(&self, prev: Vec<LocationId>, start: LocationId, to: LocationId) -> Vec<LocationId> {
        let mut path = vec![to];
        let mut cur = to;
        while cur != start {
            cur = prev[cur.index()];
            debug_assert_ne!(cur, LocationId::INVALID, "broken predecessor chain");
            path.push(cur);
        }
        path.reverse();
        path
    }
}
