//! Disease configuration and the stochastic rules that drive it.
//!
//! A [`Disease`] is immutable parameterization plus pure decision functions
//! over person state; the only mutable fields are the optional R0-tracking
//! counters updated by the simulation loop.  All randomness routes through
//! the caller's [`SimRng`].
//!
//! Daily progression ([`Disease::state_transition`]) applies **at most one**
//! transition per disease per day, evaluated in fixed priority order:
//! symptom onset, then recovery, then death.

use epi_core::{DiseaseId, PersonId, SimRng};

use crate::activity::{Activity, ActivityKind};
use crate::person::Person;
use crate::state::DiseaseState;

// ── Transmission constants ───────────────────────────────────────────────────

/// Infectivity adjustment by (a washed hands, b washed hands).  All entries
/// are non-positive: hand-washing can only hurt the disease.
pub const HANDWASH_EFFECT_MODIFIERS: [[f64; 2]; 2] = [[0.0, -0.1], [-0.1, -0.5]];

/// Flat infectivity bonus while intimate, independent of the disease.
pub const INTIMATE_EFFECT_MODIFIER: f64 = 0.2;

/// How much hospital care helps, modulo the disease's treatability.
pub const HOSPITAL_TREATMENT_EFFECT: f64 = 0.5;

// ── Parameter tables ─────────────────────────────────────────────────────────

/// Per-activity-kind base infectivity, total over [`ActivityKind`] by
/// construction.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Infectivity([f64; ActivityKind::COUNT]);

impl Infectivity {
    pub fn new(idle: f64, sleep: f64, traveling: f64, talking: f64, intimate: f64) -> Self {
        Self([idle, sleep, traveling, talking, intimate])
    }
}

impl std::ops::Index<ActivityKind> for Infectivity {
    type Output = f64;
    #[inline]
    fn index(&self, kind: ActivityKind) -> &f64 {
        &self.0[kind.index()]
    }
}

/// Per-disease-state infectability modifier table, total over
/// [`DiseaseState`] by construction — a missing-state entry is
/// unrepresentable, so no runtime coverage check is needed.
///
/// Positive entries make a person carrying that state *more* susceptible to
/// other diseases (symbiosis, e.g. an immunosuppressive infection); negative
/// entries make them less (competition).
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateModifiers([f64; DiseaseState::COUNT]);

impl StateModifiers {
    pub const NONE: StateModifiers = StateModifiers([0.0; DiseaseState::COUNT]);

    /// Same modifier for every infected state, asymptomatic or symptomatic
    /// — the common shape of the presets.
    pub fn infected(asymptomatic: f64, symptomatic: f64) -> Self {
        let mut m = [0.0; DiseaseState::COUNT];
        m[DiseaseState::InfectedAsymptomatic.index()] = asymptomatic;
        m[DiseaseState::VaccinatedInfectedAsymptomatic.index()] = asymptomatic;
        m[DiseaseState::InfectedSymptomatic.index()] = symptomatic;
        m[DiseaseState::VaccinatedInfectedSymptomatic.index()] = symptomatic;
        Self(m)
    }

    pub fn set(&mut self, state: DiseaseState, modifier: f64) {
        self.0[state.index()] = modifier;
    }
}

impl From<[f64; DiseaseState::COUNT]> for StateModifiers {
    fn from(table: [f64; DiseaseState::COUNT]) -> Self {
        Self(table)
    }
}

impl std::ops::Index<DiseaseState> for StateModifiers {
    type Output = f64;
    #[inline]
    fn index(&self, state: DiseaseState) -> &f64 {
        &self.0[state.index()]
    }
}

// ── Disease ──────────────────────────────────────────────────────────────────

/// One disease: immutable parameters plus R0 bookkeeping.
#[derive(Clone, Debug)]
pub struct Disease {
    pub name: String,

    /// Per time step of doing this interaction with someone infected, the
    /// probability they infect me.  For `Idle`/`Sleep`/`Traveling` this is
    /// "per infected person in the same location".
    pub infectivity: Infectivity,

    /// How much hand-washing affects this disease (scales the handwash
    /// pair-outcome table).  0 for diseases hygiene can't touch.
    pub hand_wash_coef: f64,

    /// Per day: probability an asymptomatic infection starts showing.
    pub symptom_show_rate: f64,

    /// Added to infectivity while the carrier is symptomatic.
    pub symptom_infectivity_modifier: f64,

    /// Per day: probability a symptomatic case recovers.
    pub recovery_rate: f64,

    /// Per day: probability a symptomatic case dies, given the healthiness
    /// gate already failed.
    pub die_probability: f64,

    /// How hard the symptoms drag down effective healthiness.
    pub symptom_health_impact: f64,

    /// How much this disease responds to hospital treatment, in [0, 1].
    pub treatability: f64,

    /// How other diseases' states in the *victim* modify susceptibility to
    /// this one.
    pub state_infectability_modifiers: StateModifiers,

    /// Probability any given person was vaccinated against this.
    pub vaccination_rate: f64,

    /// Probability the vaccine actually confers immunity.
    pub vaccination_effectiveness: f64,

    // ── R0 bookkeeping (the only mutable state) ───────────────────────────
    /// The initially infected person, set by the simulation loop.
    pub patient_zero: Option<PersonId>,

    /// Infections transmitted directly by patient zero — the empirical R0
    /// numerator.
    pub secondary_cases: u32,
}

impl Disease {
    /// The null disease: present but inert.  Presets start from this and
    /// override what they need.
    pub fn inert(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            infectivity: Infectivity::default(),
            hand_wash_coef: 0.0,
            symptom_show_rate: 0.0,
            symptom_infectivity_modifier: 0.0,
            recovery_rate: 0.0,
            die_probability: 0.0,
            symptom_health_impact: 0.0,
            treatability: 0.0,
            state_infectability_modifiers: StateModifiers::NONE,
            vaccination_rate: 0.0,
            vaccination_effectiveness: 0.0,
            patient_zero: None,
            secondary_cases: 0,
        }
    }

    /// The flat recovery/death adjustment hospital care is worth for this
    /// disease.
    #[inline]
    fn hospital_bonus(&self) -> f64 {
        HOSPITAL_TREATMENT_EFFECT * self.treatability
    }

    // ── Daily stochastic rules ────────────────────────────────────────────

    /// Does a symptomatic case recover today?
    pub fn recover(&self, at_hospital: bool, rng: &mut SimRng) -> bool {
        let mut p = self.recovery_rate;
        if at_hospital {
            p = (p + self.hospital_bonus()).min(1.0);
        }
        rng.gen_bool(p)
    }

    /// Does an asymptomatic case start showing today?
    pub fn symptom_show(&self, rng: &mut SimRng) -> bool {
        rng.gen_bool(self.symptom_show_rate)
    }

    /// Does a symptomatic case die today?
    ///
    /// Two gates: first the person's constitution (healthier people fail
    /// this roll more often), then the disease's own lethality, eased by
    /// hospital care.
    pub fn die(&self, effective_healthiness: f64, at_hospital: bool, rng: &mut SimRng) -> bool {
        if !rng.gen_bool(1.0 - effective_healthiness) {
            return false;
        }
        let mut p = self.die_probability;
        if at_hospital {
            p = (p - self.hospital_bonus()).max(0.0);
        }
        rng.gen_bool(p)
    }

    /// Apply at most one daily transition for this disease to `person`, then
    /// refresh their symptomatic flag.
    ///
    /// `roster` is the full active-disease list (needed for the
    /// effective-healthiness computation behind the death gate); `self` must
    /// be `roster[disease.index()]`.
    pub fn state_transition(
        &self,
        disease:     DiseaseId,
        roster:      &[Disease],
        person:      &mut Person,
        at_hospital: bool,
        rng:         &mut SimRng,
    ) {
        use DiseaseState::*;

        let eff_health = person.effective_healthiness(roster);
        let next = match person.disease_state(disease) {
            InfectedAsymptomatic if self.symptom_show(rng) => Some(InfectedSymptomatic),
            VaccinatedInfectedAsymptomatic if self.symptom_show(rng) => {
                Some(VaccinatedInfectedSymptomatic)
            }
            InfectedSymptomatic if self.recover(at_hospital, rng) => Some(Recovered),
            VaccinatedInfectedSymptomatic if self.recover(at_hospital, rng) => {
                Some(VaccinatedRecovered)
            }
            InfectedSymptomatic if self.die(eff_health, at_hospital, rng) => Some(Dead),
            VaccinatedInfectedSymptomatic if self.die(eff_health, at_hospital, rng) => {
                Some(VaccinatedDead)
            }
            _ => None,
        };

        if let Some(next) = next {
            person.set_disease_state(disease, next);
            if next.is_dead() {
                person.mark_dead();
            }
        }
        person.refresh_symptom_flag();
    }

    // ── Transmission ──────────────────────────────────────────────────────

    /// Does `a` infect `b` this tick?
    ///
    /// Pure read of both people plus one weighted coin flip.  `self` must be
    /// `roster[disease.index()]`.
    ///
    /// The effective activity is `a`'s current one, collapsed to `Idle` when
    /// its interaction target is someone other than `b` — talking *at* a
    /// third person doesn't make `a` any more dangerous to `b` than idling
    /// next to them.
    pub fn infects(
        &self,
        disease: DiseaseId,
        roster:  &[Disease],
        a:       &Person,
        b:       &Person,
        rng:     &mut SimRng,
    ) -> bool {
        if !a.disease_state(disease).is_infectious() {
            return false;
        }
        if !b.disease_state(disease).is_susceptible() {
            return false;
        }

        let symptom_effect = if a.disease_state(disease).is_symptomatic() {
            self.symptom_infectivity_modifier
        } else {
            0.0
        };

        let mut effective_kind = a.activity.kind();
        let mut hand_wash_effect = 0.0;
        let mut intimate_effect = 0.0;
        match &a.activity {
            Activity::Talking { partner } | Activity::Intimate { partner } => {
                if *partner == b.id {
                    // Both participants independently roll hand-washing.
                    let a_washed = rng.gen_bool(a.hygiene) as usize;
                    let b_washed = rng.gen_bool(b.hygiene) as usize;
                    hand_wash_effect =
                        self.hand_wash_coef * HANDWASH_EFFECT_MODIFIERS[a_washed][b_washed];
                    if a.activity.kind() == ActivityKind::Intimate {
                        intimate_effect = INTIMATE_EFFECT_MODIFIER;
                    }
                } else {
                    effective_kind = ActivityKind::Idle;
                }
            }
            _ => {}
        }

        // Symbiotic/competitive cross-effects: what else `b` carries changes
        // how easily this disease takes hold.
        let mut symbio_effect = 0.0;
        for (i, other) in roster.iter().enumerate() {
            if i != disease.index() {
                symbio_effect +=
                    other.state_infectability_modifiers[b.disease_state(DiseaseId(i as u16))];
            }
        }

        let infectivity = self.infectivity[effective_kind]
            + symptom_effect
            + hand_wash_effect
            + intimate_effect
            + symbio_effect;

        rng.gen_bool(infectivity)
    }

    /// Infect `person` with this disease.
    ///
    /// No-op unless currently susceptible.  Returns `true` if a new
    /// infection actually happened (the caller counts these).
    pub fn infect(&self, disease: DiseaseId, person: &mut Person) -> bool {
        let state = person.disease_state(disease);
        if !state.is_susceptible() {
            return false;
        }
        let next = if state.is_vaccinated() {
            DiseaseState::VaccinatedInfectedAsymptomatic
        } else {
            DiseaseState::InfectedAsymptomatic
        };
        person.set_disease_state(disease, next);
        true
    }

    // ── Population-build support ──────────────────────────────────────────

    /// Decide a person's initial state for this disease: vaccination roll,
    /// then effectiveness roll.  Done once at population-build time.
    pub fn initial_state(&self, rng: &mut SimRng) -> DiseaseState {
        if rng.gen_bool(self.vaccination_rate) {
            if rng.gen_bool(self.vaccination_effectiveness) {
                DiseaseState::VaccinatedUnsusceptible
            } else {
                DiseaseState::VaccinatedSusceptible
            }
        } else {
            DiseaseState::Susceptible
        }
    }

    /// Empirical R0: secondary cases caused directly by patient zero.
    pub fn measured_r0(&self) -> u32 {
        self.secondary_cases
    }
}

impl std::fmt::Display for Disease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Disease {}", self.name)
    }
}
