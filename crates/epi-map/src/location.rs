//! Location records: type tag, occupancy, adjacency, and membership sets.

use epi_core::{GridPoint, LocationId, PersonId, TICKS_PER_DAY, TimeOfDay, TimeWindow};

// ── LocationType ─────────────────────────────────────────────────────────────

/// What kind of place a location is.
///
/// A closed enum so the agent state machine can match exhaustively — there
/// is no "unknown location type" branch anywhere in the engine.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LocationType {
    /// Where people live.  Sleep and intimate activities are only legal here.
    Home,
    /// Visitable only by its employees (includes schools).
    Office,
    /// A large gathering area — stadium, convention center.
    Convention,
    /// Enterable by both employees and the general public (shops, restaurants).
    Shop,
    /// Streets, plazas, parks.  The connective tissue all travel routes pass
    /// through; nobody works here.
    Public,
    /// Where the sick people go.  Technically a kind of shop, but important
    /// enough to stand on its own: being here improves recovery odds.
    Hospital,
}

impl LocationType {
    /// `true` if people can be employed here.
    #[inline]
    pub fn is_workable(self) -> bool {
        matches!(
            self,
            LocationType::Office | LocationType::Shop | LocationType::Convention | LocationType::Hospital
        )
    }

    /// `true` if the location can appear in a person's preferred-places list
    /// (leisure destinations open to the general public).
    #[inline]
    pub fn is_placeable(self) -> bool {
        matches!(self, LocationType::Convention | LocationType::Shop)
    }

    /// Human-readable label, useful for telemetry column values.
    pub fn as_str(self) -> &'static str {
        match self {
            LocationType::Home       => "home",
            LocationType::Office     => "office",
            LocationType::Convention => "convention",
            LocationType::Shop       => "shop",
            LocationType::Public     => "public",
            LocationType::Hospital   => "hospital",
        }
    }
}

impl std::fmt::Display for LocationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── OfficeHours ──────────────────────────────────────────────────────────────

/// The shared work schedule of an Office-type location, fixed once when the
/// map is built.  Everyone employed at the office derives their personal
/// work window from this.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OfficeHours {
    pub begin:          TimeOfDay,
    /// How long the workday lasts, in ticks.
    pub duration_ticks: u32,
}

impl OfficeHours {
    pub fn new(begin: TimeOfDay, duration_ticks: u32) -> Self {
        debug_assert!(duration_ticks < TICKS_PER_DAY, "a workday must fit inside a day");
        Self { begin, duration_ticks }
    }

    /// The (possibly midnight-wrapping) window this schedule covers.
    #[inline]
    pub fn window(&self) -> TimeWindow {
        TimeWindow::starting_at(self.begin, self.duration_ticks)
    }
}

// ── Location ─────────────────────────────────────────────────────────────────

/// One node of the location graph.
///
/// Construct through [`WorldMap::add_location`][crate::WorldMap::add_location];
/// adjacency through [`WorldMap::connect`][crate::WorldMap::connect].
/// Occupancy moves only through [`WorldMap::try_move`][crate::WorldMap::try_move]
/// so the occupant set and each person's location back-reference can never
/// diverge.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub id:   LocationId,
    pub kind: LocationType,

    /// Max simultaneous occupants.  [`Location::UNBOUNDED`] for places with
    /// no practical limit (large public spaces).
    pub capacity: usize,

    /// Everyone currently here, dead or alive.
    pub occupants: Vec<PersonId>,

    /// Locations reachable without traversing a third.  Kept sorted so the
    /// "first adjacent public space" choice is deterministic.
    pub(crate) adjacent: Vec<LocationId>,

    /// Ticks needed to cross this location, proportional to its spatial
    /// extent (side length of an equivalent-area square).
    pub travel_time: u32,

    /// Centroid on the map grid; the pathfinding heuristic measures to this.
    pub center: GridPoint,

    /// People who live here (Home) or belong here.
    pub residents: Vec<PersonId>,

    /// People employed here.
    pub employees: Vec<PersonId>,

    /// People who list this as a preferred leisure destination.
    pub clientele: Vec<PersonId>,

    /// Office only: the shared workday, fixed once at map-build time.
    pub office_hours: Option<OfficeHours>,

    /// Office only: set by the one-time school designation.
    pub school: bool,
}

impl Location {
    /// Capacity value meaning "no limit".
    pub const UNBOUNDED: usize = usize::MAX;

    pub(crate) fn new(
        id:          LocationId,
        kind:        LocationType,
        capacity:    usize,
        travel_time: u32,
        center:      GridPoint,
    ) -> Self {
        Self {
            id,
            kind,
            capacity,
            occupants: Vec::new(),
            adjacent: Vec::new(),
            travel_time,
            center,
            residents: Vec::new(),
            employees: Vec::new(),
            clientele: Vec::new(),
            office_hours: None,
            school: false,
        }
    }

    /// `true` if no further arrivals can be admitted.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.occupants.len() >= self.capacity
    }

    /// Remaining room for residents (used while assigning homes).
    #[inline]
    pub fn has_resident_room(&self) -> bool {
        self.residents.len() < self.capacity
    }

    /// Remaining room for employees (used while assigning workplaces).
    #[inline]
    pub fn has_employee_room(&self) -> bool {
        self.employees.len() < self.capacity
    }

    /// Read-only view of the sorted adjacency list.
    #[inline]
    pub fn adjacent(&self) -> &[LocationId] {
        &self.adjacent
    }

    /// The work window shared by this location's employees, if it has one.
    #[inline]
    pub fn work_window(&self) -> Option<TimeWindow> {
        self.office_hours.map(|h| h.window())
    }

    /// `true` if `person` is currently in the occupant set.  O(n) — only for
    /// assertions and tests; the engine trusts the back-reference.
    pub fn hosts(&self, person: PersonId) -> bool {
        self.occupants.contains(&person)
    }
}
