//! The simulation context and day loop.

use rustc_hash::FxHashSet;

use epi_agent::{Disease, DiseaseState, Population};
use epi_core::{DiseaseId, LocationId, PersonId, SimRng, TICKS_PER_DAY, Tick};
use epi_map::{LocationType, WorldMap};

use crate::behavior;
use crate::convergence::Convergence;
use crate::error::{SimError, SimResult};
use crate::observer::SimObserver;

// ── SimConfig ────────────────────────────────────────────────────────────────

/// Knobs for one run.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Call the snapshot observer hook every N ticks.  0 = never.
    pub snapshot_interval_ticks: u64,

    /// Model transmission between co-located people who are *not* in an
    /// explicit interaction.  Off by default — it dominates runtime on
    /// crowded maps (pairwise per location) and rarely changes outcomes.
    pub idle_infection: bool,

    /// Require each patient zero to be drawn from the non-vaccinated pool,
    /// force-desensitizing someone if the whole population is immune.
    pub ensure_fresh_patient_zero: bool,

    /// At work (or waiting out symptoms in a hospital), the per-tick chance
    /// an idle person goes looking for a conversation.
    pub talk_seek_probability: f64,

    /// Baseline per-decision chance an idle person actually commits to a
    /// leisure trip once the option comes up.
    pub travel_probability: f64,

    /// Partition levels for the stochastic partner ranking:
    /// 0 = pure shuffle, higher = closer to a strict best-affinity-first
    /// ordering.
    pub ssort_levels: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            snapshot_interval_ticks: 0,
            idle_infection: false,
            ensure_fresh_patient_zero: false,
            talk_seek_probability: 0.5,
            travel_probability: 0.2,
            ssort_levels: 0,
        }
    }
}

// ── DayStats ─────────────────────────────────────────────────────────────────

/// One day's aggregate infection counters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DayStats {
    pub day: u64,
    /// Infections transmitted inside explicit Talking/Intimate interactions.
    pub direct_infections: u32,
    /// Infections between co-located non-interacting people (0 unless
    /// `idle_infection` is on).
    pub idle_infections: u32,
}

impl DayStats {
    pub fn total(&self) -> u32 {
        self.direct_infections + self.idle_infections
    }
}

// ── Simulation ───────────────────────────────────────────────────────────────

/// Everything one run owns: the world, the people, the disease roster, the
/// RNG, the clock, and the counters.
///
/// There is no global state anywhere in the engine — all of it is threaded
/// through this struct explicitly.
pub struct Simulation {
    pub config: SimConfig,
    pub map: WorldMap,
    pub population: Population,

    /// Active disease roster, indexed by `DiseaseId`.  Never shrinks
    /// mid-run; diseases that fail to take hold are recorded in `dropped`
    /// instead so per-person state vectors keep their indexing.
    pub diseases: Vec<Disease>,

    /// Diseases whose patient zero never became infectious.
    dropped: Vec<DiseaseId>,

    pub rng: SimRng,

    /// Global tick counter across days.
    pub now: Tick,

    /// Per-day history, appended by [`simulate_day`](Self::simulate_day).
    /// The sliding-window convergence rule reads this.
    pub history: Vec<DayStats>,

    // ── Intra-day scratch ─────────────────────────────────────────────────
    pub(crate) direct_today: u32,
    pub(crate) idle_today: u32,
    /// Unique co-located pairs already evaluated for idle infection this
    /// tick; cleared every tick.
    pub(crate) idle_pairs_done: FxHashSet<(PersonId, PersonId)>,
}

impl Simulation {
    /// Assemble a simulation from pre-built inputs.
    ///
    /// Fails fast if any person's disease-state vector doesn't cover the
    /// roster — that is a population-construction bug, not a runtime
    /// condition.
    pub fn new(
        config:     SimConfig,
        map:        WorldMap,
        population: Population,
        diseases:   Vec<Disease>,
    ) -> SimResult<Self> {
        for person in population.iter() {
            if person.disease_states().len() != diseases.len() {
                return Err(SimError::DiseaseCoverage {
                    person:   person.id,
                    expected: diseases.len(),
                    got:      person.disease_states().len(),
                });
            }
        }
        let rng = SimRng::new(config.seed);
        Ok(Self {
            config,
            map,
            population,
            diseases,
            dropped: Vec::new(),
            rng,
            now: Tick::ZERO,
            history: Vec::new(),
            direct_today: 0,
            idle_today: 0,
            idle_pairs_done: FxHashSet::default(),
        })
    }

    // ── Placement ─────────────────────────────────────────────────────────

    /// Put `person` at `loc`, keeping occupant set and back-reference in
    /// lockstep.  Returns `false` (no state change) on capacity rejection.
    #[must_use]
    pub fn place(&mut self, person: PersonId, loc: LocationId) -> bool {
        let from = {
            let p = self.population.get(person);
            (p.location != LocationId::INVALID).then_some(p.location)
        };
        if self.map.try_move(person, from, loc) {
            self.population.get_mut(person).location = loc;
            true
        } else {
            false
        }
    }

    /// Place everyone at their home, falling back to the first non-full
    /// public space for the homeless (and for homes that are somehow full).
    pub fn place_all_at_home(&mut self) -> SimResult<()> {
        for i in 0..self.population.len() as u32 {
            let id = PersonId(i);
            let target = match self.population.get(id).home {
                Some(home) if !self.map.location(home).is_full() => home,
                _ => self
                    .map
                    .first_nonfull(LocationType::Public)
                    .ok_or_else(|| SimError::Config("no public space to place people in".into()))?,
            };
            if !self.place(id, target) {
                return Err(SimError::Unplaced(id));
            }
        }
        Ok(())
    }

    // ── Roster helpers ────────────────────────────────────────────────────

    /// Ids of diseases still in play (not dropped at seeding time).
    pub fn active_disease_ids(&self) -> impl Iterator<Item = DiseaseId> + '_ {
        (0..self.diseases.len() as u16)
            .map(DiseaseId)
            .filter(|id| !self.dropped.contains(id))
    }

    pub fn is_dropped(&self, disease: DiseaseId) -> bool {
        self.dropped.contains(&disease)
    }

    /// Count people per disease state for `disease` — the telemetry writers
    /// and day summaries both want this.
    pub fn state_census(&self, disease: DiseaseId) -> [usize; DiseaseState::COUNT] {
        let mut counts = [0usize; DiseaseState::COUNT];
        for person in self.population.iter() {
            counts[person.disease_state(disease).index()] += 1;
        }
        counts
    }

    // ── Day loop ──────────────────────────────────────────────────────────

    /// Run one full day: daily disease progression, then 1,440 ticks of
    /// agent behavior.  Appends and returns the day's counters.
    pub fn simulate_day<O: SimObserver>(&mut self, observer: &mut O) -> DayStats {
        let day = self.now.day();
        self.direct_today = 0;
        self.idle_today = 0;

        self.day_begin();

        let n = self.population.len() as u32;
        for _ in 0..TICKS_PER_DAY {
            let tod = self.now.time_of_day();
            self.idle_pairs_done.clear();

            for i in 0..n {
                let id = PersonId(i);
                behavior::do_current_action(self, id);
                behavior::action_transition(self, id, tod);
            }

            if self.config.snapshot_interval_ticks > 0
                && self.now.0 % self.config.snapshot_interval_ticks == 0
            {
                observer.on_snapshot(self.now, &self.map, &self.population, &self.diseases);
            }
            self.now = self.now + 1;
        }

        let stats = DayStats {
            day,
            direct_infections: self.direct_today,
            idle_infections: self.idle_today,
        };
        self.history.push(stats);
        stats
    }

    /// Apply each active disease's daily state transition to every living
    /// person, then release the interaction partners of anyone who died.
    fn day_begin(&mut self) {
        let active: Vec<DiseaseId> = self.active_disease_ids().collect();
        let n = self.population.len() as u32;
        for i in 0..n {
            let id = PersonId(i);
            if !self.population.get(id).alive {
                continue;
            }
            let at_hospital = {
                let loc = self.population.get(id).location;
                self.map.location(loc).kind == LocationType::Hospital
            };
            for &di in &active {
                let person = self.population.get_mut(id);
                // Split borrows: the roster is read-only during transitions.
                let roster = &self.diseases;
                roster[di.index()].state_transition(di, roster, person, at_hospital, &mut self.rng);
            }
            if !self.population.get(id).alive {
                behavior::release_on_death(self, id);
            }
        }
    }

    // ── Full run ──────────────────────────────────────────────────────────

    /// Seed patient zeros, then run days until `convergence` fires or
    /// `day_limit` is reached (0 = unlimited).  Returns the number of days
    /// simulated.
    pub fn run<C: Convergence, O: SimObserver>(
        &mut self,
        convergence: &mut C,
        day_limit:   u32,
        observer:    &mut O,
    ) -> SimResult<u32> {
        self.validate_placement()?;
        self.seed_patient_zeros();

        let mut days = 0u32;
        while !convergence.converged(self) && (day_limit == 0 || days < day_limit) {
            let stats = self.simulate_day(observer);
            observer.on_day_end(&stats);
            self.log_day_summary(&stats);
            days += 1;
        }
        observer.on_sim_end(self.now);
        Ok(days)
    }

    fn validate_placement(&self) -> SimResult<()> {
        for person in self.population.iter() {
            if person.location == LocationId::INVALID {
                return Err(SimError::Unplaced(person.id));
            }
            debug_assert!(
                self.map.location(person.location).hosts(person.id),
                "occupancy out of sync for {}",
                person.id
            );
        }
        Ok(())
    }

    /// Pick and infect a patient zero for every disease; drop the diseases
    /// where the infection didn't take hold.
    fn seed_patient_zeros(&mut self) {
        let everyone: Vec<PersonId> = self.population.ids().collect();
        if everyone.is_empty() {
            return;
        }

        for di in 0..self.diseases.len() {
            let disease_id = DiseaseId(di as u16);

            let zero = if self.config.ensure_fresh_patient_zero {
                let fresh: Vec<PersonId> = everyone
                    .iter()
                    .copied()
                    .filter(|&p| !self.population.get(p).disease_state(disease_id).is_vaccinated())
                    .collect();
                match self.rng.choose(&fresh) {
                    Some(&p) => p,
                    None => {
                        // Whole population is on the vaccinated track:
                        // force-desensitize someone at random.
                        let p = *self.rng.choose(&everyone).expect("population is non-empty");
                        log::warn!(
                            "disease {} has no non-immune hosts; desensitizing {p}",
                            self.diseases[di].name
                        );
                        self.population
                            .get_mut(p)
                            .set_disease_state(disease_id, DiseaseState::Susceptible);
                        p
                    }
                }
            } else {
                *self.rng.choose(&everyone).expect("population is non-empty")
            };

            self.diseases[di].infect(disease_id, self.population.get_mut(zero));

            if self.population.get(zero).disease_state(disease_id).is_infectious() {
                self.diseases[di].patient_zero = Some(zero);
                log::info!("disease {}: patient zero is {zero}", self.diseases[di].name);
            } else {
                // Patient zero turned out immune — this disease never starts.
                log::warn!(
                    "disease {} failed to take hold (patient zero {zero} immune); dropping it",
                    self.diseases[di].name
                );
                self.dropped.push(disease_id);
            }
        }
    }

    fn log_day_summary(&self, stats: &DayStats) {
        if !log::log_enabled!(log::Level::Info) {
            return;
        }
        let mut infectious = 0usize;
        for di in self.active_disease_ids() {
            let census = self.state_census(di);
            infectious += DiseaseState::ALL
                .iter()
                .filter(|s| s.is_infectious())
                .map(|s| census[s.index()])
                .sum::<usize>();
        }
        log::info!(
            "day {}: {} new infections ({} direct, {} idle), {} currently infectious",
            stats.day,
            stats.total(),
            stats.direct_infections,
            stats.idle_infections,
            infectious,
        );
    }
}
