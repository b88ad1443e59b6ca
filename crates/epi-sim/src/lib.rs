//! `epi-sim` — the engine: per-tick agent decisions and the day loop.
//!
//! # Tick anatomy
//!
//! Each of a day's 1,440 ticks processes every person **in id order**:
//! first the consequences of their current activity (a travel step, or
//! transmission inside an interaction), then the decision about what to do
//! next.  Agent A's decision may read agent B's just-updated state within
//! the same tick — that same-tick causality is intentional and is why the
//! loop is single-threaded and deterministic given a seed.
//!
//! Daily disease progression runs once at day begin; convergence is checked
//! between days.
//!
//! # Crate layout
//!
//! | Module          | Contents                                          |
//! |-----------------|---------------------------------------------------|
//! | [`sim`]         | `Simulation`, `SimConfig`, `DayStats`, run loop   |
//! | [`behavior`]    | the per-agent activity state machine              |
//! | [`convergence`] | `Convergence` trait + the three standard rules    |
//! | [`observer`]    | `SimObserver` snapshot/summary hooks              |
//! | [`error`]       | `SimError`, `SimResult<T>`                        |

pub mod behavior;
pub mod convergence;
pub mod error;
pub mod observer;
pub mod sim;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use convergence::{Convergence, NoNewInfections, Strict, StrictSingleDead};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{DayStats, SimConfig, Simulation};
