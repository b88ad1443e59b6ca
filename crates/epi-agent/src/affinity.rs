//! The social-affinity score: how much two co-located people want to
//! interact this tick.
//!
//! # Model
//!
//! Interaction probability decays with geodesic distance on the relevant
//! social graph — you chat with a coworker-of-a-coworker far less than with
//! a direct coworker.  Two independent graphs matter: coworker edges and
//! friend edges.  Which one dominates depends on where you are: at your
//! workplace the coworker graph leads and friendship adds a bonus; anywhere
//! else friendship leads and a coworker-but-not-friend relationship is a
//! *penalty* (nobody wants to run into their coworkers off the clock).
//!
//! The decay curve is pinned by two anchor probabilities — the value at
//! distance 1 and at distance 2 — and the exponential through those points
//! is evaluated in closed form rather than iterated:
//!
//! ```text
//! decay(d) = level_one² · (level_two / level_one)^d / level_two
//! ```
//!
//! This function is called many times per tick, so it is a pure score with
//! no side effects: BFS over the social graphs (depth-capped), a handful of
//! multiplies, no allocation beyond the BFS frontier.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use epi_core::PersonId;

use crate::person::Person;
use crate::population::Population;

// ── Tuning constants ─────────────────────────────────────────────────────────

/// Affinity toward a partner, before the symptomatic penalty.
pub const PARTNER_AFFINITY: f64 = 0.9;

/// How hard a visibly sick person withdraws from interaction, scaled by
/// their own hygiene coefficient — the hygiene-conscious self-isolate.
pub const SICK_WITHDRAWAL: f64 = 0.3;

/// Small flat bonus nudging agents toward interacting with strangers.
pub const INTERACTION_EXPLORATION_REWARD: f64 = 0.05;

/// Social-graph BFS gives up past this depth; beyond it two people are
/// treated as socially infinitely far apart.
pub const SOCIAL_SEARCH_DEPTH: u32 = 4;

// ── Decay ────────────────────────────────────────────────────────────────────

/// Evaluate the two-anchor exponential decay at distance `d`
/// (`None` = unreachable = 0).
///
/// Derivation: `f(d) = level_one · e^(-rate·(d-1))` with
/// `rate = -ln(level_two / level_one)`, which simplifies to the closed form
/// above — no per-step iteration.
fn decay(level_one: f64, level_two: f64, d: Option<u32>) -> f64 {
    match d {
        None => 0.0,
        Some(d) => (level_one * level_one) * (level_two / level_one).powi(d as i32) / level_two,
    }
}

/// Probability-weighted combination of two scores (`w1 + w2` should be 1).
#[inline]
fn combine(p1: f64, w1: f64, p2: f64, w2: f64) -> f64 {
    p1 * w1 + p2 * w2
}

// ── Social-graph BFS ─────────────────────────────────────────────────────────

/// Geodesic distance from `from` to `to` on one social graph, or `None` if
/// `to` is more than [`SOCIAL_SEARCH_DEPTH`] hops out (or unreachable).
///
/// `edges` selects which edge set to walk (`|p| &p.friends` or
/// `|p| &p.coworkers`).  Edges may be one-directional; distance is measured
/// along out-edges from `from`'s side.
fn social_distance<'a>(
    pop:   &'a Population,
    from:  PersonId,
    to:    PersonId,
    edges: impl Fn(&'a Person) -> &'a [PersonId],
) -> Option<u32> {
    if from == to {
        return Some(0);
    }

    let mut seen: FxHashSet<PersonId> = FxHashSet::default();
    let mut queue: VecDeque<(PersonId, u32)> = VecDeque::new();
    seen.insert(from);
    queue.push_back((from, 0));

    while let Some((current, dist)) = queue.pop_front() {
        if dist == SOCIAL_SEARCH_DEPTH {
            continue;
        }
        for &n in edges(pop.get(current)) {
            if seen.insert(n) {
                if n == to {
                    return Some(dist + 1);
                }
                queue.push_back((n, dist + 1));
            }
        }
    }
    None
}

// ── Affinity ─────────────────────────────────────────────────────────────────

/// How likely `me` is to choose to interact with `other` this tick,
/// in `[0, 1]`.
///
/// Not exactly symmetric — each side scores from their own graph edges and
/// their own symptoms — but symmetric in spirit: both directions are built
/// from the same pairwise distances when the graphs are bidirectional.
pub fn affinity(pop: &Population, me: PersonId, other: PersonId) -> f64 {
    let a = pop.get(me);
    let b = pop.get(other);

    // No affinity if we can't interact.
    if a.location != b.location {
        return 0.0;
    }

    let sick_penalty = if a.showing_symptoms {
        a.hygiene * SICK_WITHDRAWAL
    } else {
        0.0
    };

    // Partners short-circuit the whole graph machinery.
    if a.partners.contains(&other) {
        return (PARTNER_AFFINITY - sick_penalty).clamp(0.0, 1.0);
    }

    let cw_dist = social_distance(pop, me, other, |p| p.coworkers.as_slice());
    let fr_dist = social_distance(pop, me, other, |p| p.friends.as_slice());
    // "I see this person more as a friend than as a coworker."
    let friend_first = match (fr_dist, cw_dist) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(f), Some(c)) => f <= c,
    };

    let at_work = a.workplace.is_some() && a.workplace == Some(a.location);
    let mut rolling = if at_work {
        // 70% chance to interact with a direct coworker, 10% with a
        // coworker-of-a-coworker; friendship sweetens the deal.
        let mut p = decay(0.7, 0.1, cw_dist);
        if friend_first {
            p = combine(p, 0.6, decay(0.75, 0.2, fr_dist), 0.4);
        }
        p
    } else {
        let mut p = decay(0.9, 0.2, fr_dist);
        if !friend_first {
            // A coworker I don't consider a friend — actively avoided
            // off the clock.
            p = combine(p, 0.8, -decay(0.6, 0.1, cw_dist), 0.2).max(0.0);
        }
        p
    };

    rolling += INTERACTION_EXPLORATION_REWARD - sick_penalty;
    rolling.clamp(0.0, 1.0)
}
