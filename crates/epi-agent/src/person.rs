//! The per-person arena record.

use epi_core::{LocationId, PersonId, TimeOfDay, TimeWindow};

use crate::activity::Activity;
use crate::disease::Disease;
use crate::state::DiseaseState;

/// One person.
///
/// All cross-references (home, workplace, social edges, current location)
/// are arena ids, never owning pointers — see the arena design note in the
/// crate docs.  `location` is a back-reference into the map's occupant sets;
/// it is only ever updated together with them (via the relocation helper in
/// `epi-sim`), so the two can never diverge.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Person {
    pub id: PersonId,

    /// Owning home, exactly one — or `None` for the homeless, who are placed
    /// in a public location at build time.
    pub home: Option<LocationId>,

    pub age: u32,

    /// Where the person is right now.  `INVALID` until first placement.
    pub location: LocationId,

    pub activity: Activity,

    /// Workplace or school.
    pub workplace: Option<LocationId>,

    /// When this person is due at work; derived from the workplace's shared
    /// office hours.  `None` for the unemployed.
    pub work_schedule: Option<TimeWindow>,

    /// When this person sleeps.  Defaults to 22:00–08:00.
    pub sleep_schedule: TimeWindow,

    /// Preferred leisure destinations (shops, conventions).
    pub places: Vec<LocationId>,

    // ── Social graph ──────────────────────────────────────────────────────
    // Edge direction matters: depending on configuration these may be
    // one-directional (I consider you a friend, you don't reciprocate).
    pub friends:   Vec<PersonId>,
    pub coworkers: Vec<PersonId>,
    pub partners:  Vec<PersonId>,

    /// Probability of having washed hands before an interaction, in [0, 1].
    pub hygiene: f64,

    /// Baseline constitution in [0, 1]; gates the daily death roll.
    pub healthiness: f64,

    pub alive: bool,

    /// Ticks still to wait before taking the next step of the current path.
    pub travel_wait: u32,

    /// Exactly one state per active disease, indexed by `DiseaseId`.
    /// Private so total coverage can never be broken after construction.
    disease_states: Vec<DiseaseState>,

    /// Cached "any disease symptomatic" flag, recomputed after the daily
    /// transitions.
    pub showing_symptoms: bool,
}

impl Person {
    /// Default sleep window: 22:00–08:00.
    pub fn default_sleep_schedule() -> TimeWindow {
        TimeWindow::new(TimeOfDay::from_hours(22), TimeOfDay::from_hours(8))
    }

    pub(crate) fn new(
        id:             PersonId,
        home:           Option<LocationId>,
        age:            u32,
        initial_states: Vec<DiseaseState>,
    ) -> Self {
        debug_assert!(
            initial_states.iter().all(|s| s.is_initial()),
            "population must be built in initial disease states"
        );
        Self {
            id,
            home,
            age,
            location: LocationId::INVALID,
            activity: Activity::Idle,
            workplace: None,
            work_schedule: None,
            sleep_schedule: Self::default_sleep_schedule(),
            places: Vec::new(),
            friends: Vec::new(),
            coworkers: Vec::new(),
            partners: Vec::new(),
            hygiene: 0.0,
            healthiness: 1.0,
            alive: true,
            travel_wait: 0,
            disease_states: initial_states,
            showing_symptoms: false,
        }
    }

    // ── Disease state access ──────────────────────────────────────────────

    /// This person's state for `disease`.
    ///
    /// # Panics
    /// Panics if `disease` is not covered — every person carries a state for
    /// every active disease, so a miss is a corrupted-population bug.
    #[inline]
    pub fn disease_state(&self, disease: epi_core::DiseaseId) -> DiseaseState {
        self.disease_states[disease.index()]
    }

    /// Overwrite the state for `disease`.
    ///
    /// Normal progression goes through [`Disease`]'s transition methods;
    /// this direct setter exists for test seeding and for the patient-zero
    /// fallback that forcibly desensitizes an immune person.
    #[inline]
    pub fn set_disease_state(&mut self, disease: epi_core::DiseaseId, state: DiseaseState) {
        self.disease_states[disease.index()] = state;
    }

    /// All states, indexed by `DiseaseId`.
    #[inline]
    pub fn disease_states(&self) -> &[DiseaseState] {
        &self.disease_states
    }

    /// Recompute the cached symptomatic flag from the per-disease states.
    pub fn refresh_symptom_flag(&mut self) {
        self.showing_symptoms = self.disease_states.iter().any(|s| s.is_symptomatic());
    }

    /// Healthiness after symptom drag: baseline minus the *worst*
    /// symptom-health-impact among currently symptomatic diseases, floored
    /// at 0.
    pub fn effective_healthiness(&self, roster: &[Disease]) -> f64 {
        let worst = self
            .disease_states
            .iter()
            .zip(roster)
            .filter(|(s, _)| s.is_symptomatic())
            .map(|(_, d)| d.symptom_health_impact)
            .fold(0.0_f64, f64::max);
        (self.healthiness - worst).max(0.0)
    }

    // ── Convenience predicates ────────────────────────────────────────────

    /// `true` if this person is at their workplace right now.
    #[inline]
    pub fn at_workplace(&self) -> bool {
        self.workplace.is_some() && self.workplace == Some(self.location)
    }

    /// `true` if this person is at home right now.
    #[inline]
    pub fn at_home(&self) -> bool {
        self.home.is_some() && self.home == Some(self.location)
    }

    /// Mark dead.  Irreversible; the person stops acting but keeps their
    /// final location and states for inspection.
    pub fn mark_dead(&mut self) {
        self.alive = false;
    }
}
