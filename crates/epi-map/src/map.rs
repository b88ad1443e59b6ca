//! The `WorldMap` registry: location storage, occupancy movement, and
//! spatial queries.

use epi_core::{GridPoint, LocationId, PersonId, SimRng};

use crate::error::{MapError, MapResult};
use crate::location::{Location, LocationType};

/// The location network.
///
/// Locations are stored in an arena indexed by `LocationId`; all
/// cross-references (adjacency, occupants, the school designation) are IDs
/// into it.  The map-construction collaborator populates the arena through
/// [`add_location`](Self::add_location)/[`connect`](Self::connect) and the
/// membership vectors on each [`Location`], then hands the finished map to
/// the engine.
pub struct WorldMap {
    locations: Vec<Location>,
    school:    Option<LocationId>,

    /// Converts heuristic grid distance into tick cost for the pathfinding
    /// frontier ordering (the raster extraction's steps-per-pixel rate).
    pub time_per_distance: f32,
}

impl WorldMap {
    pub fn new(time_per_distance: f32) -> Self {
        Self {
            locations: Vec::new(),
            school: None,
            time_per_distance,
        }
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Add a location and return its id (sequential from 0).
    pub fn add_location(
        &mut self,
        kind:        LocationType,
        capacity:    usize,
        travel_time: u32,
        center:      GridPoint,
    ) -> LocationId {
        let id = LocationId(self.locations.len() as u32);
        self.locations.push(Location::new(id, kind, capacity, travel_time, center));
        id
    }

    /// Record that `a` and `b` border each other (symmetric).
    ///
    /// Adjacency lists are kept sorted so "the first adjacent public space"
    /// is a deterministic choice.
    pub fn connect(&mut self, a: LocationId, b: LocationId) {
        debug_assert_ne!(a, b, "a location cannot neighbor itself");
        Self::insert_sorted(&mut self.locations[a.index()].adjacent, b);
        Self::insert_sorted(&mut self.locations[b.index()].adjacent, a);
    }

    fn insert_sorted(adj: &mut Vec<LocationId>, id: LocationId) {
        if let Err(pos) = adj.binary_search(&id) {
            adj.insert(pos, id);
        }
    }

    // ── Access ────────────────────────────────────────────────────────────

    #[inline]
    pub fn location(&self, id: LocationId) -> &Location {
        &self.locations[id.index()]
    }

    #[inline]
    pub fn location_mut(&mut self, id: LocationId) -> &mut Location {
        &mut self.locations[id.index()]
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = LocationId> + '_ {
        (0..self.locations.len() as u32).map(LocationId)
    }

    // ── Occupancy movement ────────────────────────────────────────────────

    /// Move `person` from `from` into `to`, enforcing capacity.
    ///
    /// Returns `false` — with **no state change anywhere** — if `to` is
    /// already full.  Capacity rejection is expected and frequent, not an
    /// error.  The caller owns updating the person's location back-reference
    /// when this returns `true`.
    ///
    /// `from == None` is the initial placement of a person not yet on the
    /// map.
    #[must_use]
    pub fn try_move(&mut self, person: PersonId, from: Option<LocationId>, to: LocationId) -> bool {
        if from == Some(to) {
            return true;
        }
        if self.locations[to.index()].is_full() {
            return false;
        }
        if let Some(from) = from {
            let occ = &mut self.locations[from.index()].occupants;
            match occ.iter().position(|&p| p == person) {
                Some(i) => {
                    occ.swap_remove(i);
                }
                None => panic!("occupancy corrupted: {person} not present at {from}"),
            }
        }
        self.locations[to.index()].occupants.push(person);
        true
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// First non-full location of `kind` in arena order.
    ///
    /// Call sites (homeless placement, overflow fallbacks) don't need
    /// uniform randomness, just *a* spot — so this is a plain scan.
    pub fn first_nonfull(&self, kind: LocationType) -> Option<LocationId> {
        self.locations
            .iter()
            .find(|l| l.kind == kind && !l.is_full())
            .map(|l| l.id)
    }

    /// The hospital whose centroid is nearest `from` by Manhattan distance.
    ///
    /// Linear scan — hospital counts are tiny, and this runs once per
    /// symptomatic hospital decision, not per tick per agent.
    pub fn nearest_hospital(&self, from: GridPoint) -> Option<LocationId> {
        self.locations
            .iter()
            .filter(|l| l.kind == LocationType::Hospital)
            .min_by(|a, b| {
                from.manhattan(a.center)
                    .total_cmp(&from.manhattan(b.center))
            })
            .map(|l| l.id)
    }

    // ── Population-construction support ───────────────────────────────────
    //
    // The population builder assigns homes and workplaces by drawing from
    // candidate lists it owns.  Saturated candidates are swap-removed from
    // the list rather than the list being rebuilt per call, so assigning a
    // large population stays linear overall.

    /// All Home-type locations, for seeding a home-candidate list.
    pub fn house_candidates(&self) -> Vec<LocationId> {
        self.locations
            .iter()
            .filter(|l| l.kind == LocationType::Home)
            .map(|l| l.id)
            .collect()
    }

    /// All workable locations, for seeding a workplace-candidate list.
    pub fn workable_candidates(&self) -> Vec<LocationId> {
        self.locations
            .iter()
            .filter(|l| l.kind.is_workable())
            .map(|l| l.id)
            .collect()
    }

    /// Uniform random house with resident room left, culling saturated
    /// entries from `candidates` as they are discovered.
    pub fn random_house(&self, candidates: &mut Vec<LocationId>, rng: &mut SimRng) -> Option<LocationId> {
        self.random_with_room(candidates, rng, |l| l.has_resident_room())
    }

    /// Uniform random workable location with employee room left, culling
    /// saturated entries from `candidates` as they are discovered.
    pub fn random_workable(&self, candidates: &mut Vec<LocationId>, rng: &mut SimRng) -> Option<LocationId> {
        self.random_with_room(candidates, rng, |l| l.has_employee_room())
    }

    fn random_with_room(
        &self,
        candidates: &mut Vec<LocationId>,
        rng:        &mut SimRng,
        has_room:   impl Fn(&Location) -> bool,
    ) -> Option<LocationId> {
        while !candidates.is_empty() {
            let i = rng.gen_range(0..candidates.len());
            let id = candidates[i];
            if has_room(&self.locations[id.index()]) {
                return Some(id);
            }
            candidates.swap_remove(i);
        }
        None
    }

    // ── School designation ────────────────────────────────────────────────

    /// Designate exactly one Office as "the school", once.
    ///
    /// Prefers the *smallest* existing office whose capacity already exceeds
    /// `max_size` (no point over-allocating a huge one); if none is big
    /// enough, forcibly resizes the single largest office up to `max_size`.
    ///
    /// Calling this twice returns the already-designated school.
    pub fn create_school(&mut self, max_size: usize) -> MapResult<LocationId> {
        if let Some(id) = self.school {
            return Ok(id);
        }

        let offices = || self.locations.iter().filter(|l| l.kind == LocationType::Office);

        let chosen = match offices()
            .filter(|l| l.capacity > max_size)
            .min_by_key(|l| l.capacity)
        {
            Some(fit) => fit.id,
            None => {
                let biggest = offices()
                    .max_by_key(|l| l.capacity)
                    .ok_or(MapError::NoSchoolCandidate)?
                    .id;
                self.locations[biggest.index()].capacity = max_size;
                biggest
            }
        };

        self.locations[chosen.index()].school = true;
        self.school = Some(chosen);
        Ok(chosen)
    }

    /// The designated school.  Errors if [`create_school`](Self::create_school)
    /// has not run — querying before designation is a setup-order bug.
    pub fn school(&self) -> MapResult<LocationId> {
        self.school.ok_or(MapError::NoSchoolAssigned)
    }
}
