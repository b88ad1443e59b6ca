//! `epi-map` — the location network the simulation engine moves agents on.
//!
//! The map is an input: an external collaborator extracts typed regions from
//! a raster image and hands this crate a finished list of locations with
//! capacity, adjacency, travel cost, and centroid already populated.  This
//! crate owns the queries the engine needs at runtime:
//!
//! - "how do I get from A to B" — [`WorldMap::path`], a uniform-cost search
//!   over Public-type corridors with a Manhattan heuristic;
//! - "who can take me in" — occupancy bookkeeping with capacity rejection;
//! - "where is the nearest hospital / a free shop / the school" — linear
//!   scans and the one-time school designation.
//!
//! # Crate layout
//!
//! | Module       | Contents                                          |
//! |--------------|---------------------------------------------------|
//! | [`location`] | `LocationType`, `OfficeHours`, `Location`         |
//! | [`map`]      | `WorldMap` registry and spatial queries           |
//! | [`path`]     | heuristic Dijkstra over Public corridors          |
//! | [`error`]    | `MapError`, `MapResult<T>`                        |

pub mod error;
pub mod location;
pub mod map;
pub mod path;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{MapError, MapResult};
pub use location::{Location, LocationType, OfficeHours};
pub use map::WorldMap;
