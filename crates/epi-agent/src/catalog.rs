//! Preset disease parameter sets.
//!
//! Parameter values are hand-tuned for interesting dynamics, not
//! epidemiological calibration; the real-disease names indicate the *shape*
//! of each parameter set, nothing more.

use crate::disease::{Disease, Infectivity, StateModifiers};
use crate::state::DiseaseState;

/// An HIV-like STD: near-zero casual transmission, high intimate
/// transmission, very slow progression, immunosuppressive (carriers catch
/// everything else more easily), no vaccine.
pub fn std_0() -> Disease {
    let mut d = Disease::inert("STD_0");
    d.infectivity = Infectivity::new(0.0, 0.001, 0.0, 0.001, 0.3);
    d.symptom_show_rate = 0.05;
    d.recovery_rate = 0.01;
    d.die_probability = 0.001;
    d.symptom_health_impact = 0.1;
    d.treatability = 0.2;
    d.state_infectability_modifiers = StateModifiers::infected(0.2, 0.3);
    d
}

/// A flu-like virus: moderate airborne spread, quick resolution, mitigated
/// well by hand-washing, mediocre vaccine with mediocre uptake.
pub fn flu() -> Disease {
    let mut d = Disease::inert("flu");
    d.infectivity = Infectivity::new(0.05, 0.001, 0.001, 0.1, 0.3);
    d.hand_wash_coef = 0.5;
    d.symptom_show_rate = 0.3;
    d.recovery_rate = 0.2;
    d.die_probability = 0.009;
    d.symptom_health_impact = 0.2;
    d.treatability = 0.6;
    d.vaccination_rate = 0.2;
    d.vaccination_effectiveness = 0.3;
    d
}

/// A measles-like virus: extremely contagious in conversation, long
/// incubation, dangerous, excellent vaccine with near-universal uptake.
pub fn measles() -> Disease {
    let mut d = Disease::inert("measles");
    d.infectivity = Infectivity::new(0.05, 0.1, 0.05, 0.7, 0.9);
    d.hand_wash_coef = 0.2;
    d.symptom_show_rate = 1.0 / 14.0;
    d.recovery_rate = 0.09;
    d.die_probability = 0.1;
    d.symptom_health_impact = 0.4;
    d.treatability = 0.3;
    d.vaccination_rate = 0.95;
    d.vaccination_effectiveness = 0.99;
    d
}

/// A made-up competitive disease: carrying it *suppresses* other
/// infections (all its infected and recovered states carry negative
/// infectability modifiers).
pub fn competitive_0() -> Disease {
    let mut d = Disease::inert("competitive_0");
    d.infectivity = Infectivity::new(0.0, 0.075, 0.0, 0.1, 0.35);
    d.hand_wash_coef = 0.7;
    d.symptom_show_rate = 0.1;
    d.symptom_infectivity_modifier = 0.3;
    d.recovery_rate = 0.2;
    d.die_probability = 0.001;
    d.symptom_health_impact = 0.15;
    d.treatability = 0.5;
    let mut m = StateModifiers::infected(-0.4, -0.6);
    m.set(DiseaseState::Recovered, -0.1);
    m.set(DiseaseState::VaccinatedRecovered, -0.1);
    d.state_infectability_modifiers = m;
    d.vaccination_rate = 0.4;
    d.vaccination_effectiveness = 0.6;
    d
}

/// A fully deterministic disease for exercising the transmission logic:
/// guaranteed transmission in conversation, coin-flip daily progression.
pub fn test_disease() -> Disease {
    let mut d = Disease::inert("test disease");
    d.infectivity = Infectivity::new(0.0, 0.0, 0.0, 1.0, 1.0);
    d.symptom_show_rate = 0.5;
    d.recovery_rate = 0.5;
    d.die_probability = 0.1;
    d.vaccination_rate = 0.5;
    d
}

/// Every preset with a real-disease basis.
pub fn all() -> Vec<Disease> {
    vec![std_0(), flu(), measles(), competitive_0()]
}

/// Just the presets with high daily recovery/death rates — runs converge in
/// a few simulated weeks.
pub fn fast() -> Vec<Disease> {
    vec![flu(), measles(), competitive_0()]
}
