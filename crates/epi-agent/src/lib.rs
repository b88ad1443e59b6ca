//! `epi-agent` — people, diseases, and the social fabric between them.
//!
//! The population is an input: an external collaborator samples demographics,
//! wires up the social graphs, and hands this crate a finished arena of
//! people with homes, schedules, and per-disease states pre-populated.  This
//! crate owns what happens *to* them:
//!
//! - the multi-disease state machine (infection, symptoms, recovery, death,
//!   vaccination tracks, comorbidity cross-effects);
//! - the activity model (what a person is doing right now, and where that
//!   activity is legal);
//! - the social-affinity score that decides who wants to interact with whom.
//!
//! Person and disease live in one crate deliberately: transmission is a
//! function of *both* the disease's parameters and the two people's current
//! activities and hygiene, so the types are mutually entangled the same way
//! the behavior is.
//!
//! # Crate layout
//!
//! | Module         | Contents                                           |
//! |----------------|----------------------------------------------------|
//! | [`state`]      | `DiseaseState` — the 11-state progression enum     |
//! | [`disease`]    | `Disease` config + transition/transmission rules   |
//! | [`catalog`]    | preset disease parameter sets                      |
//! | [`activity`]   | `Activity` / `ActivityKind` tagged unions          |
//! | [`person`]     | `Person` arena record                              |
//! | [`population`] | `Population` arena with disjoint split borrows     |
//! | [`affinity`]   | social-graph BFS + decaying interaction score      |

pub mod activity;
pub mod affinity;
pub mod catalog;
pub mod disease;
pub mod person;
pub mod population;
pub mod state;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use activity::{Activity, ActivityKind};
pub use affinity::affinity;
pub use disease::{Disease, Infectivity, StateModifiers};
pub use person::Person;
pub use population::Population;
pub use state::DiseaseState;
