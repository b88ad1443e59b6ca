//! Map-subsystem error type.

use thiserror::Error;

use epi_core::LocationId;

/// Errors produced by `epi-map`.
///
/// All of these are configuration/data errors in the sense of the engine's
/// error taxonomy: they indicate a malformed map or a query made before
/// setup finished, and are surfaced to the caller immediately rather than
/// recovered from.
#[derive(Debug, Error)]
pub enum MapError {
    /// A non-Public location has no Public neighbor, so no travel route can
    /// begin there.  The map extraction produced a disconnected region.
    #[error("location {0} is not adjacent to any public space")]
    NoAdjacentPublicSpace(LocationId),

    /// The Public-corridor graph does not connect `from` to `to`.
    #[error("no route from {from} to {to} through public space")]
    NoRoute { from: LocationId, to: LocationId },

    /// `school()` was queried before `create_school()` designated one.
    #[error("no school has been assigned on this map")]
    NoSchoolAssigned,

    /// `create_school()` found no Office-type location to designate.
    #[error("map has no office location that could serve as a school")]
    NoSchoolCandidate,
}

pub type MapResult<T> = Result<T, MapError>;
