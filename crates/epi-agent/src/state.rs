//! Per-person, per-disease progression state.
//!
//! # State graph
//!
//! ```text
//! S  ──▶ II ──▶ IS ──▶ { R, D }
//! VS ──▶ VII ─▶ VIS ─▶ { VR, VD }          VU (never leaves)
//! ```
//!
//! Transitions only ever move forward along these edges.  `R`, `D`, `VR`,
//! `VD`, and `VU` are sinks; `VU` is the vaccine working as intended.

/// The state of one disease in one person.
///
/// The vaccinated track mirrors the unvaccinated one so that "was this
/// person vaccinated" survives infection and recovery — useful both for the
/// comorbidity modifier table and for post-run analysis.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiseaseState {
    /// Never exposed, can be infected.
    Susceptible,
    /// Infected and infectious, not yet showing symptoms.
    InfectedAsymptomatic,
    /// Infected, infectious, and visibly sick.
    InfectedSymptomatic,
    /// Recovered; immune for the rest of the run.
    Recovered,
    /// Killed by this disease.
    Dead,
    /// Vaccinated but the vaccine didn't take; still infectable.
    VaccinatedSusceptible,
    /// Vaccinated and protected; cannot be infected.
    VaccinatedUnsusceptible,
    VaccinatedInfectedAsymptomatic,
    VaccinatedInfectedSymptomatic,
    VaccinatedRecovered,
    VaccinatedDead,
}

impl DiseaseState {
    /// Number of variants; sizes the per-state modifier tables.
    pub const COUNT: usize = 11;

    /// All variants, in telemetry column order.
    pub const ALL: [DiseaseState; Self::COUNT] = [
        DiseaseState::Susceptible,
        DiseaseState::InfectedAsymptomatic,
        DiseaseState::InfectedSymptomatic,
        DiseaseState::Recovered,
        DiseaseState::Dead,
        DiseaseState::VaccinatedSusceptible,
        DiseaseState::VaccinatedUnsusceptible,
        DiseaseState::VaccinatedInfectedAsymptomatic,
        DiseaseState::VaccinatedInfectedSymptomatic,
        DiseaseState::VaccinatedRecovered,
        DiseaseState::VaccinatedDead,
    ];

    /// Position in [`Self::ALL`]; indexes the per-state modifier tables.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            DiseaseState::Susceptible                    => 0,
            DiseaseState::InfectedAsymptomatic           => 1,
            DiseaseState::InfectedSymptomatic            => 2,
            DiseaseState::Recovered                      => 3,
            DiseaseState::Dead                           => 4,
            DiseaseState::VaccinatedSusceptible          => 5,
            DiseaseState::VaccinatedUnsusceptible        => 6,
            DiseaseState::VaccinatedInfectedAsymptomatic => 7,
            DiseaseState::VaccinatedInfectedSymptomatic  => 8,
            DiseaseState::VaccinatedRecovered            => 9,
            DiseaseState::VaccinatedDead                 => 10,
        }
    }

    /// Can catch the disease.
    #[inline]
    pub fn is_susceptible(self) -> bool {
        matches!(self, DiseaseState::Susceptible | DiseaseState::VaccinatedSusceptible)
    }

    /// Can pass the disease on.
    #[inline]
    pub fn is_infectious(self) -> bool {
        matches!(
            self,
            DiseaseState::InfectedAsymptomatic
                | DiseaseState::InfectedSymptomatic
                | DiseaseState::VaccinatedInfectedAsymptomatic
                | DiseaseState::VaccinatedInfectedSymptomatic
        )
    }

    /// Visibly sick (drives hospital-seeking and social withdrawal).
    #[inline]
    pub fn is_symptomatic(self) -> bool {
        matches!(
            self,
            DiseaseState::InfectedSymptomatic | DiseaseState::VaccinatedInfectedSymptomatic
        )
    }

    /// On the vaccinated track.
    #[inline]
    pub fn is_vaccinated(self) -> bool {
        matches!(
            self,
            DiseaseState::VaccinatedSusceptible
                | DiseaseState::VaccinatedUnsusceptible
                | DiseaseState::VaccinatedInfectedAsymptomatic
                | DiseaseState::VaccinatedInfectedSymptomatic
                | DiseaseState::VaccinatedRecovered
                | DiseaseState::VaccinatedDead
        )
    }

    #[inline]
    pub fn is_dead(self) -> bool {
        matches!(self, DiseaseState::Dead | DiseaseState::VaccinatedDead)
    }

    /// The disease can make no further progress from this state.  A run has
    /// converged (strictly) when every state of every person is final.
    ///
    /// Note this includes `Susceptible`: once nobody is infectious, the
    /// susceptible can never be infected again.
    #[inline]
    pub fn is_final(self) -> bool {
        !self.is_infectious()
    }

    /// Legal states at population-build time.
    #[inline]
    pub fn is_initial(self) -> bool {
        matches!(
            self,
            DiseaseState::Susceptible
                | DiseaseState::VaccinatedSusceptible
                | DiseaseState::VaccinatedUnsusceptible
        )
    }

    /// The set of states a single daily transition may move to.  Used by the
    /// forward-progress property tests; the engine itself never consults it.
    pub fn successors(self) -> &'static [DiseaseState] {
        use DiseaseState::*;
        match self {
            Susceptible                    => &[InfectedAsymptomatic],
            InfectedAsymptomatic           => &[InfectedSymptomatic],
            InfectedSymptomatic            => &[Recovered, Dead],
            VaccinatedSusceptible          => &[VaccinatedInfectedAsymptomatic],
            VaccinatedInfectedAsymptomatic => &[VaccinatedInfectedSymptomatic],
            VaccinatedInfectedSymptomatic  => &[VaccinatedRecovered, VaccinatedDead],
            Recovered | Dead | VaccinatedUnsusceptible | VaccinatedRecovered | VaccinatedDead => &[],
        }
    }

    /// Short telemetry label (matches the original dump columns).
    pub fn as_str(self) -> &'static str {
        match self {
            DiseaseState::Susceptible                    => "S",
            DiseaseState::InfectedAsymptomatic           => "II",
            DiseaseState::InfectedSymptomatic            => "IS",
            DiseaseState::Recovered                      => "R",
            DiseaseState::Dead                           => "D",
            DiseaseState::VaccinatedSusceptible          => "VS",
            DiseaseState::VaccinatedUnsusceptible        => "VU",
            DiseaseState::VaccinatedInfectedAsymptomatic => "VII",
            DiseaseState::VaccinatedInfectedSymptomatic  => "VIS",
            DiseaseState::VaccinatedRecovered            => "VR",
            DiseaseState::VaccinatedDead                 => "VD",
        }
    }
}

impl std::fmt::Display for DiseaseState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
