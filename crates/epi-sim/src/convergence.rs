//! Pluggable stopping rules for the day loop.
//!
//! The run loop checks convergence between days; a rule may keep its own
//! state (the sliding-window rule does) which is why `converged` takes
//! `&mut self`.

use crate::sim::Simulation;

/// When is a run over?
pub trait Convergence {
    /// Called once before the first day and once after every day.
    fn converged(&mut self, sim: &Simulation) -> bool;
}

// ── Strict ───────────────────────────────────────────────────────────────────

/// Every disease state of every person is final — nobody is infectious for
/// anything, so no further epidemiological change is possible.
pub struct Strict;

impl Convergence for Strict {
    fn converged(&mut self, sim: &Simulation) -> bool {
        sim.population.iter().all(|person| {
            sim.active_disease_ids()
                .all(|d| person.disease_state(d).is_final())
        })
    }
}

// ── StrictSingleDead ─────────────────────────────────────────────────────────

/// At least one active disease has fully burned out (every person's state
/// for it is final).  Useful for multi-disease runs where one epidemic
/// ending is the event of interest.
pub struct StrictSingleDead;

impl Convergence for StrictSingleDead {
    fn converged(&mut self, sim: &Simulation) -> bool {
        sim.active_disease_ids().any(|d| {
            sim.population
                .iter()
                .all(|person| person.disease_state(d).is_final())
        })
    }
}

// ── NoNewInfections ──────────────────────────────────────────────────────────

/// A sliding window of recent days produced zero new infections
/// (direct + idle combined).  Much looser than the strict rules — slow
/// diseases may still be progressing inside their hosts — but a good proxy
/// for "the epidemic is over".
pub struct NoNewInfections {
    /// How many consecutive quiet days count as converged.
    pub window: usize,
}

impl NoNewInfections {
    pub fn new(window: usize) -> Self {
        debug_assert!(window > 0, "a zero-day window converges immediately");
        Self { window }
    }
}

impl Default for NoNewInfections {
    /// The conventional five-day window.
    fn default() -> Self {
        Self::new(5)
    }
}

impl Convergence for NoNewInfections {
    fn converged(&mut self, sim: &Simulation) -> bool {
        let history = &sim.history;
        if history.len() < self.window {
            return false;
        }
        history[history.len() - self.window..]
            .iter()
            .all(|day| day.total() == 0)
    }
}
