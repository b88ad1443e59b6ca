//! `epi-core` — foundational types for the `epi` epidemic simulation engine.
//!
//! This crate is a dependency of every other `epi-*` crate.  It intentionally
//! has no `epi-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                            |
//! |-------------|-----------------------------------------------------|
//! | [`ids`]     | `PersonId`, `LocationId`, `DiseaseId`               |
//! | [`grid`]    | `GridPoint`, Manhattan/Euclidean distance           |
//! | [`time`]    | `Tick`, `TimeOfDay`, `TimeWindow`, `TICKS_PER_DAY`  |
//! | [`rng`]     | `SimRng` — the single shared generator              |
//! | [`sort`]    | level-capped stochastic quicksort shuffle           |
//! | [`error`]   | `CoreError`, `CoreResult`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod error;
pub mod grid;
pub mod ids;
pub mod rng;
pub mod sort;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use grid::GridPoint;
pub use ids::{DiseaseId, LocationId, PersonId};
pub use rng::SimRng;
pub use sort::stochastic_sort;
pub use time::{TICKS_PER_DAY, Tick, TimeOfDay, TimeWindow};
