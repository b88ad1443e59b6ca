//! Simulation observer trait for telemetry and progress reporting.

use epi_agent::{Disease, Population};
use epi_core::Tick;
use epi_map::WorldMap;

use crate::sim::DayStats;

/// Callbacks invoked by [`Simulation`][crate::Simulation] at key points in
/// the run.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Snapshot cadence is configured by
/// `SimConfig::snapshot_interval_ticks`; the hook receives read-only access
/// to the whole world so writers can record any view of it without the
/// engine knowing about output formats.
pub trait SimObserver {
    /// Called at snapshot intervals, before the tick counter advances.
    fn on_snapshot(
        &mut self,
        _tick:       Tick,
        _map:        &WorldMap,
        _population: &Population,
        _diseases:   &[Disease],
    ) {
    }

    /// Called once per simulated day with that day's infection counters.
    fn on_day_end(&mut self, _stats: &DayStats) {}

    /// Called once when the run loop exits (converged or out of days).
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to run the
/// simulation but don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
