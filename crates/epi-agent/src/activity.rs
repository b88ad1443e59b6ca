//! What a person is doing right now.
//!
//! The activity is a closed tagged union; the state machine in `epi-sim`
//! matches on it exhaustively, so there is no "unknown activity" fallback
//! branch anywhere.  Interactions (`Talking`/`Intimate`) are always held
//! symmetrically: if A's activity targets B, B's activity targets A until
//! one of them drops the interaction — the state machine maintains that
//! invariant, this module only represents it.

use epi_core::{LocationId, PersonId};
use epi_map::LocationType;

// ── ActivityKind ─────────────────────────────────────────────────────────────

/// The payload-free tag of an [`Activity`].
///
/// Disease infectivity is parameterized per kind, so this enum doubles as
/// the index into [`Infectivity`][crate::Infectivity] tables.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActivityKind {
    Idle,
    Sleep,
    Traveling,
    Talking,
    Intimate,
}

impl ActivityKind {
    /// Number of variants; sizes the per-activity infectivity tables.
    pub const COUNT: usize = 5;

    /// Position in the infectivity tables.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            ActivityKind::Idle      => 0,
            ActivityKind::Sleep     => 1,
            ActivityKind::Traveling => 2,
            ActivityKind::Talking   => 3,
            ActivityKind::Intimate  => 4,
        }
    }

    /// Where this activity may legally happen.
    ///
    /// Violations are programming errors, not simulation outcomes — the
    /// state machine debug-asserts this before committing a transition.
    pub fn legal_in(self, loc: LocationType) -> bool {
        match self {
            ActivityKind::Idle | ActivityKind::Talking => true,
            ActivityKind::Sleep | ActivityKind::Intimate => loc == LocationType::Home,
            ActivityKind::Traveling => loc == LocationType::Public,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::Idle      => "idle",
            ActivityKind::Sleep     => "sleep",
            ActivityKind::Traveling => "traveling",
            ActivityKind::Talking   => "talking",
            ActivityKind::Intimate  => "intimate",
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Activity ─────────────────────────────────────────────────────────────────

/// A person's current activity, with its payload.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Activity {
    #[default]
    Idle,
    Sleep,
    /// En route to `dest`.  `path` holds the locations still to traverse in
    /// **reverse** order (next hop last) so stepping is a cheap `pop()`; the
    /// final destination is `path[0]` until arrival.
    Traveling {
        dest: LocationId,
        path: Vec<LocationId>,
    },
    /// In conversation with `partner` (held symmetrically).
    Talking { partner: PersonId },
    /// Intimate with `partner` (held symmetrically; Home only).
    Intimate { partner: PersonId },
}

impl Activity {
    /// Build a traveling activity from a forward-ordered path as produced by
    /// [`WorldMap::path`][epi_map::WorldMap::path].
    ///
    /// # Panics
    /// Panics in debug mode on an empty path — "travel nowhere" must be
    /// caught by the caller (it means the agent is already there).
    pub fn traveling(dest: LocationId, mut forward_path: Vec<LocationId>) -> Activity {
        debug_assert!(!forward_path.is_empty(), "travel with an empty path");
        debug_assert_eq!(forward_path.last(), Some(&dest), "path must end at the destination");
        forward_path.reverse();
        Activity::Traveling { dest, path: forward_path }
    }

    #[inline]
    pub fn kind(&self) -> ActivityKind {
        match self {
            Activity::Idle            => ActivityKind::Idle,
            Activity::Sleep           => ActivityKind::Sleep,
            Activity::Traveling { .. } => ActivityKind::Traveling,
            Activity::Talking { .. }  => ActivityKind::Talking,
            Activity::Intimate { .. } => ActivityKind::Intimate,
        }
    }

    /// The interaction partner, if this is an interaction.
    #[inline]
    pub fn partner(&self) -> Option<PersonId> {
        match self {
            Activity::Talking { partner } | Activity::Intimate { partner } => Some(*partner),
            _ => None,
        }
    }

    /// The travel destination, if traveling.
    #[inline]
    pub fn destination(&self) -> Option<LocationId> {
        match self {
            Activity::Traveling { dest, .. } => Some(*dest),
            _ => None,
        }
    }

    /// `true` if already traveling to exactly `loc` (used to make travel
    /// decisions idempotent).
    #[inline]
    pub fn is_traveling_to(&self, loc: LocationId) -> bool {
        self.destination() == Some(loc)
    }
}
