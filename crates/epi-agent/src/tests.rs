//! Unit tests for the disease model, activities, and social affinity.

use epi_core::{DiseaseId, LocationId, PersonId, SimRng};

use crate::activity::{Activity, ActivityKind};
use crate::affinity::affinity;
use crate::catalog;
use crate::disease::{Disease, Infectivity};
use crate::population::Population;
use crate::state::DiseaseState;

// ── Helpers ───────────────────────────────────────────────────────────────────

const D0: DiseaseId = DiseaseId(0);

/// Fully deterministic lethal disease: always shows, never recovers,
/// always kills once symptomatic (given a zero-healthiness host).
fn lethal_disease() -> Disease {
    let mut d = Disease::inert("lethal");
    d.infectivity = Infectivity::new(0.0, 0.0, 0.0, 1.0, 1.0);
    d.symptom_show_rate = 1.0;
    d.recovery_rate = 0.0;
    d.die_probability = 1.0;
    d
}

/// Population of `n` people, all susceptible to one disease, co-located at
/// location 0.
fn colocated_pop(n: u32) -> Population {
    let mut pop = Population::new();
    for _ in 0..n {
        let id = pop.add(Some(LocationId(0)), 30, vec![DiseaseState::Susceptible]);
        pop.get_mut(id).location = LocationId(0);
    }
    pop
}

// ── Disease state machine ─────────────────────────────────────────────────────

#[cfg(test)]
mod state_tests {
    use super::*;

    #[test]
    fn predicates_partition_sensibly() {
        use DiseaseState::*;
        assert!(Susceptible.is_susceptible() && VaccinatedSusceptible.is_susceptible());
        assert!(!VaccinatedUnsusceptible.is_susceptible());
        for s in [InfectedAsymptomatic, InfectedSymptomatic, VaccinatedInfectedAsymptomatic, VaccinatedInfectedSymptomatic] {
            assert!(s.is_infectious());
            assert!(!s.is_final());
        }
        assert!(InfectedSymptomatic.is_symptomatic());
        assert!(!InfectedAsymptomatic.is_symptomatic());
        assert!(Dead.is_dead() && VaccinatedDead.is_dead());
        // Susceptible counts as final: with nobody infectious the disease
        // can make no further progress.
        assert!(Susceptible.is_final());
    }

    #[test]
    fn all_covers_every_state_once() {
        let mut seen = [false; DiseaseState::COUNT];
        for s in DiseaseState::ALL {
            assert!(!seen[s.index()], "duplicate index for {s:?}");
            seen[s.index()] = true;
        }
        assert!(seen.iter().all(|&b| b));
    }

    /// Forward-progress property: run daily transitions from every state
    /// under many random disease parameterizations and check each observed
    /// transition lands in the state's declared successor set.
    #[test]
    fn transitions_only_move_forward() {
        let mut rng = SimRng::new(0xfeed);
        for trial in 0..200 {
            let mut d = Disease::inert("prop");
            d.symptom_show_rate = rng.random::<f64>();
            d.recovery_rate = rng.random::<f64>();
            d.die_probability = rng.random::<f64>();
            d.treatability = rng.random::<f64>();
            let roster = vec![d];

            for start in DiseaseState::ALL {
                let mut pop = Population::new();
                let id = pop.add(None, 40, vec![DiseaseState::Susceptible]);
                let person = pop.get_mut(id);
                person.healthiness = (trial % 10) as f64 / 10.0;
                person.set_disease_state(D0, start);

                roster[0].state_transition(D0, &roster, person, trial % 2 == 0, &mut rng);

                let end = person.disease_state(D0);
                assert!(
                    end == start || start.successors().contains(&end),
                    "illegal transition {start:?} -> {end:?}"
                );
            }
        }
    }

    #[test]
    fn lethal_progression_and_death_flag() {
        let mut rng = SimRng::new(1);
        let roster = vec![lethal_disease()];
        let mut pop = colocated_pop(1);
        let p = pop.get_mut(PersonId(0));
        p.healthiness = 0.0; // the constitution gate always fails
        p.set_disease_state(D0, DiseaseState::InfectedAsymptomatic);

        // Day 1: symptoms show.
        roster[0].state_transition(D0, &roster, p, false, &mut rng);
        assert_eq!(p.disease_state(D0), DiseaseState::InfectedSymptomatic);
        assert!(p.showing_symptoms);
        assert!(p.alive);

        // Day 2: recovery (rate 0) loses to death (probability 1).
        roster[0].state_transition(D0, &roster, p, false, &mut rng);
        assert_eq!(p.disease_state(D0), DiseaseState::Dead);
        assert!(!p.alive);
        assert!(!p.showing_symptoms, "the dead no longer show symptoms");

        // Further transitions are no-ops: Dead is terminal.
        for _ in 0..5 {
            roster[0].state_transition(D0, &roster, p, false, &mut rng);
            assert_eq!(p.disease_state(D0), DiseaseState::Dead);
        }
    }

    #[test]
    fn vaccinated_track_mirrors_unvaccinated() {
        let mut rng = SimRng::new(2);
        let roster = vec![lethal_disease()];
        let mut pop = colocated_pop(1);
        let p = pop.get_mut(PersonId(0));
        p.healthiness = 0.0;
        p.set_disease_state(D0, DiseaseState::VaccinatedInfectedAsymptomatic);

        roster[0].state_transition(D0, &roster, p, false, &mut rng);
        assert_eq!(p.disease_state(D0), DiseaseState::VaccinatedInfectedSymptomatic);
        roster[0].state_transition(D0, &roster, p, false, &mut rng);
        assert_eq!(p.disease_state(D0), DiseaseState::VaccinatedDead);
        assert!(!p.alive);
    }

    #[test]
    fn hospital_turns_death_into_survival() {
        // die_probability 1.0, treatability 1.0: the hospital bonus (0.5)
        // drops the death roll to 0.5; recovery 0 + bonus 0.5 becomes a coin
        // flip.  Statistically over many trials the patient must sometimes
        // survive at the hospital and never outside one.
        let mut d = lethal_disease();
        d.treatability = 1.0;
        let roster = vec![d];

        let mut rng = SimRng::new(3);
        let mut survived_any = false;
        for _ in 0..64 {
            let mut pop = colocated_pop(1);
            let p = pop.get_mut(PersonId(0));
            p.healthiness = 0.0;
            p.set_disease_state(D0, DiseaseState::InfectedSymptomatic);
            roster[0].state_transition(D0, &roster, p, true, &mut rng);
            if p.disease_state(D0) != DiseaseState::Dead {
                survived_any = true;
            }
        }
        assert!(survived_any, "hospital treatment never helped in 64 trials");
    }
}

// ── Transmission ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod infection_tests {
    use super::*;

    #[test]
    fn certain_transmission_while_talking() {
        let roster = vec![lethal_disease()];
        let mut rng = SimRng::new(4);
        let mut pop = colocated_pop(2);
        pop.get_mut(PersonId(0))
            .set_disease_state(D0, DiseaseState::InfectedAsymptomatic);
        pop.get_mut(PersonId(0)).activity = Activity::Talking { partner: PersonId(1) };
        pop.get_mut(PersonId(1)).activity = Activity::Talking { partner: PersonId(0) };

        assert!(roster[0].infects(D0, &roster, pop.get(PersonId(0)), pop.get(PersonId(1)), &mut rng));
    }

    #[test]
    fn vaccinated_susceptible_catches_vaccinated_infection() {
        let roster = vec![lethal_disease()];
        let mut rng = SimRng::new(5);
        let mut pop = colocated_pop(2);
        pop.get_mut(PersonId(0))
            .set_disease_state(D0, DiseaseState::InfectedAsymptomatic);
        pop.get_mut(PersonId(1))
            .set_disease_state(D0, DiseaseState::VaccinatedSusceptible);
        pop.get_mut(PersonId(0)).activity = Activity::Talking { partner: PersonId(1) };

        assert!(roster[0].infects(D0, &roster, pop.get(PersonId(0)), pop.get(PersonId(1)), &mut rng));
        let victim = pop.get_mut(PersonId(1));
        assert!(roster[0].infect(D0, victim));
        assert_eq!(victim.disease_state(D0), DiseaseState::VaccinatedInfectedAsymptomatic);
    }

    #[test]
    fn non_infectious_and_non_susceptible_never_transmit() {
        let roster = vec![lethal_disease()];
        let mut rng = SimRng::new(6);
        let mut pop = colocated_pop(2);
        pop.get_mut(PersonId(0)).activity = Activity::Talking { partner: PersonId(1) };

        // Susceptible source: no.
        assert!(!roster[0].infects(D0, &roster, pop.get(PersonId(0)), pop.get(PersonId(1)), &mut rng));

        // Infectious source but recovered target: no.
        pop.get_mut(PersonId(0))
            .set_disease_state(D0, DiseaseState::InfectedAsymptomatic);
        pop.get_mut(PersonId(1)).set_disease_state(D0, DiseaseState::Recovered);
        assert!(!roster[0].infects(D0, &roster, pop.get(PersonId(0)), pop.get(PersonId(1)), &mut rng));

        // infect() on a non-susceptible is a no-op.
        assert!(!roster[0].infect(D0, pop.get_mut(PersonId(1))));
        assert_eq!(pop.get(PersonId(1)).disease_state(D0), DiseaseState::Recovered);
    }

    #[test]
    fn talking_at_a_third_party_collapses_to_idle() {
        // Talking infectivity 1.0 but idle infectivity 0.0: if the carrier's
        // conversation targets someone else, transmission to a bystander
        // uses the idle rate.
        let roster = vec![lethal_disease()];
        let mut rng = SimRng::new(7);
        let mut pop = colocated_pop(3);
        pop.get_mut(PersonId(0))
            .set_disease_state(D0, DiseaseState::InfectedAsymptomatic);
        pop.get_mut(PersonId(0)).activity = Activity::Talking { partner: PersonId(2) };

        for _ in 0..32 {
            assert!(!roster[0].infects(
                D0,
                &roster,
                pop.get(PersonId(0)),
                pop.get(PersonId(1)),
                &mut rng
            ));
        }
    }

    #[test]
    fn hand_washing_can_stop_transmission() {
        // Talking infectivity 0.5, hand_wash_coef 1.0, both hygiene 1.0:
        // both always wash, modifier is -0.5, net infectivity 0.
        let mut d = Disease::inert("washable");
        d.infectivity = Infectivity::new(0.0, 0.0, 0.0, 0.5, 0.5);
        d.hand_wash_coef = 1.0;
        let roster = vec![d];
        let mut rng = SimRng::new(8);
        let mut pop = colocated_pop(2);
        for id in [PersonId(0), PersonId(1)] {
            pop.get_mut(id).hygiene = 1.0;
        }
        pop.get_mut(PersonId(0))
            .set_disease_state(D0, DiseaseState::InfectedAsymptomatic);
        pop.get_mut(PersonId(0)).activity = Activity::Talking { partner: PersonId(1) };

        for _ in 0..32 {
            assert!(!roster[0].infects(
                D0,
                &roster,
                pop.get(PersonId(0)),
                pop.get(PersonId(1)),
                &mut rng
            ));
        }
    }

    #[test]
    fn competitive_comorbidity_suppresses_infection() {
        // Disease 1 talks at 0.4; carrying disease 0 (modifier -0.6 while
        // symptomatic) drives the roll to 0.
        let mut suppressor = Disease::inert("suppressor");
        suppressor.state_infectability_modifiers =
            crate::disease::StateModifiers::infected(-0.4, -0.6);
        let mut target = Disease::inert("target");
        target.infectivity = Infectivity::new(0.0, 0.0, 0.0, 0.4, 0.4);
        let roster = vec![suppressor, target];
        let d1 = DiseaseId(1);

        let mut rng = SimRng::new(9);
        let mut pop = Population::new();
        for _ in 0..2 {
            let id = pop.add(Some(LocationId(0)), 30, vec![
                DiseaseState::Susceptible,
                DiseaseState::Susceptible,
            ]);
            pop.get_mut(id).location = LocationId(0);
        }
        pop.get_mut(PersonId(0)).set_disease_state(d1, DiseaseState::InfectedAsymptomatic);
        pop.get_mut(PersonId(0)).activity = Activity::Talking { partner: PersonId(1) };
        pop.get_mut(PersonId(1)).set_disease_state(D0, DiseaseState::InfectedSymptomatic);

        for _ in 0..32 {
            assert!(!roster[1].infects(
                d1,
                &roster,
                pop.get(PersonId(0)),
                pop.get(PersonId(1)),
                &mut rng
            ));
        }
    }

    #[test]
    fn initial_state_follows_vaccination_rolls() {
        let mut rng = SimRng::new(10);

        let mut always_works = Disease::inert("v");
        always_works.vaccination_rate = 1.0;
        always_works.vaccination_effectiveness = 1.0;
        assert_eq!(always_works.initial_state(&mut rng), DiseaseState::VaccinatedUnsusceptible);

        let mut never_works = Disease::inert("v2");
        never_works.vaccination_rate = 1.0;
        never_works.vaccination_effectiveness = 0.0;
        assert_eq!(never_works.initial_state(&mut rng), DiseaseState::VaccinatedSusceptible);

        let no_vaccine = Disease::inert("v3");
        assert_eq!(no_vaccine.initial_state(&mut rng), DiseaseState::Susceptible);
    }

    #[test]
    fn catalog_presets_are_well_formed() {
        for d in catalog::all().iter().chain([catalog::test_disease()].iter()) {
            assert!((0.0..=1.0).contains(&d.symptom_show_rate), "{}", d.name);
            assert!((0.0..=1.0).contains(&d.recovery_rate), "{}", d.name);
            assert!((0.0..=1.0).contains(&d.die_probability), "{}", d.name);
            assert!((0.0..=1.0).contains(&d.vaccination_rate), "{}", d.name);
            assert!((0.0..=1.0).contains(&d.treatability), "{}", d.name);
            assert!(d.patient_zero.is_none());
        }
    }
}

// ── Activities ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod activity_tests {
    use super::*;
    use epi_map::LocationType;

    #[test]
    fn legality_table() {
        use LocationType::*;
        for loc in [Home, Office, Convention, Shop, Public, Hospital] {
            assert!(ActivityKind::Idle.legal_in(loc));
            assert!(ActivityKind::Talking.legal_in(loc));
        }
        assert!(ActivityKind::Sleep.legal_in(Home));
        assert!(!ActivityKind::Sleep.legal_in(Office));
        assert!(ActivityKind::Intimate.legal_in(Home));
        assert!(!ActivityKind::Intimate.legal_in(Shop));
        assert!(ActivityKind::Traveling.legal_in(Public));
        assert!(!ActivityKind::Traveling.legal_in(Home));
    }

    #[test]
    fn traveling_path_is_stepped_from_the_back() {
        let act = Activity::traveling(
            LocationId(3),
            vec![LocationId(1), LocationId(2), LocationId(3)],
        );
        match &act {
            Activity::Traveling { dest, path } => {
                assert_eq!(*dest, LocationId(3));
                assert_eq!(path.last(), Some(&LocationId(1)), "next hop must be last");
            }
            other => panic!("expected Traveling, got {other:?}"),
        }
        assert!(act.is_traveling_to(LocationId(3)));
        assert!(!act.is_traveling_to(LocationId(1)));
    }
}

// ── Population arena ──────────────────────────────────────────────────────────

#[cfg(test)]
mod population_tests {
    use super::*;

    #[test]
    fn pair_mut_returns_disjoint_refs_in_order() {
        let mut pop = colocated_pop(3);
        let (a, b) = pop.pair_mut(PersonId(2), PersonId(0));
        assert_eq!(a.id, PersonId(2));
        assert_eq!(b.id, PersonId(0));
        a.hygiene = 0.25;
        b.hygiene = 0.75;
        assert_eq!(pop.get(PersonId(2)).hygiene, 0.25);
        assert_eq!(pop.get(PersonId(0)).hygiene, 0.75);
    }

    #[test]
    #[should_panic(expected = "distinct")]
    fn pair_mut_rejects_same_person() {
        let mut pop = colocated_pop(1);
        let _ = pop.pair_mut(PersonId(0), PersonId(0));
    }

    #[test]
    fn total_disease_coverage_at_construction() {
        let mut pop = Population::new();
        let id = pop.add(None, 20, vec![DiseaseState::Susceptible; 3]);
        assert_eq!(pop.get(id).disease_states().len(), 3);
    }
}

// ── Affinity ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod affinity_tests {
    use super::*;

    const WORK: LocationId = LocationId(7);
    const HOME: LocationId = LocationId(8);

    /// Two people at `loc`; the first considers the second whatever the
    /// caller wires up afterwards.
    fn duo(loc: LocationId, employed_there: bool) -> Population {
        let mut pop = colocated_pop(2);
        for id in [PersonId(0), PersonId(1)] {
            pop.get_mut(id).location = loc;
            if employed_there {
                pop.get_mut(id).workplace = Some(WORK);
            }
        }
        pop
    }

    #[test]
    fn zero_when_apart() {
        let mut pop = duo(WORK, true);
        pop.get_mut(PersonId(1)).location = HOME;
        assert_eq!(affinity(&pop, PersonId(0), PersonId(1)), 0.0);
    }

    #[test]
    fn partner_short_circuit() {
        let mut pop = duo(HOME, false);
        pop.get_mut(PersonId(0)).partners.push(PersonId(1));
        assert!((affinity(&pop, PersonId(0), PersonId(1)) - 0.9).abs() < 1e-9);
    }

    #[test]
    fn symptomatic_partner_withdraws_by_hygiene() {
        let mut pop = duo(HOME, false);
        pop.get_mut(PersonId(0)).partners.push(PersonId(1));
        pop.get_mut(PersonId(0)).hygiene = 1.0;
        pop.get_mut(PersonId(0)).showing_symptoms = true;
        // 0.9 - 1.0 * SICK_WITHDRAWAL
        assert!((affinity(&pop, PersonId(0), PersonId(1)) - 0.6).abs() < 1e-9);
    }

    #[test]
    fn direct_coworker_at_work() {
        let mut pop = duo(WORK, true);
        pop.get_mut(PersonId(0)).coworkers.push(PersonId(1));
        // decay(0.7, 0.1)(1) = 0.7, plus the exploration reward.
        assert!((affinity(&pop, PersonId(0), PersonId(1)) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn coworker_of_coworker_at_work() {
        let mut pop = colocated_pop(3);
        for id in [PersonId(0), PersonId(1), PersonId(2)] {
            pop.get_mut(id).location = WORK;
            pop.get_mut(id).workplace = Some(WORK);
        }
        pop.get_mut(PersonId(0)).coworkers.push(PersonId(1));
        pop.get_mut(PersonId(1)).coworkers.push(PersonId(2));
        // decay(0.7, 0.1)(2) = 0.1, plus the exploration reward.
        assert!((affinity(&pop, PersonId(0), PersonId(2)) - 0.15).abs() < 1e-9);
    }

    #[test]
    fn coworker_who_is_also_friend_at_work() {
        let mut pop = duo(WORK, true);
        pop.get_mut(PersonId(0)).coworkers.push(PersonId(1));
        pop.get_mut(PersonId(0)).friends.push(PersonId(1));
        // combine(0.7, 0.6, decay(0.75,0.2)(1)=0.75, 0.4) = 0.72 + reward.
        assert!((affinity(&pop, PersonId(0), PersonId(1)) - 0.77).abs() < 1e-9);
    }

    #[test]
    fn direct_friend_off_the_clock() {
        let mut pop = duo(HOME, false);
        pop.get_mut(PersonId(0)).friends.push(PersonId(1));
        // decay(0.9, 0.2)(1) = 0.9 + reward, clamped to 1 — hmm, 0.95.
        assert!((affinity(&pop, PersonId(0), PersonId(1)) - 0.95).abs() < 1e-9);
    }

    #[test]
    fn mere_coworker_off_the_clock_is_avoided() {
        let mut pop = duo(HOME, false);
        pop.get_mut(PersonId(0)).coworkers.push(PersonId(1));
        // Friend affinity 0, coworker penalty floors at 0, reward remains.
        assert!((affinity(&pop, PersonId(0), PersonId(1)) - 0.05).abs() < 1e-9);
    }

    #[test]
    fn bfs_depth_cap_cuts_distant_friends() {
        // Chain p0 - p1 - p2 - p3 - p4 - p5: distance 5 exceeds the cap, so
        // p5 scores like a stranger.
        let mut pop = colocated_pop(6);
        for i in 0..5u32 {
            pop.get_mut(PersonId(i)).friends.push(PersonId(i + 1));
        }
        let far = affinity(&pop, PersonId(0), PersonId(5));
        assert!((far - 0.05).abs() < 1e-9, "got {far}");
        // Distance 4 is still within the cap and beats the stranger score.
        let near = affinity(&pop, PersonId(0), PersonId(4));
        assert!(near > far, "decay at distance 4 should exceed stranger level");
    }

    #[test]
    fn affinity_always_in_unit_interval() {
        let mut rng = SimRng::new(11);
        let mut pop = colocated_pop(8);
        // Random-ish social wiring.
        for i in 0..8u32 {
            for j in 0..8u32 {
                if i != j && rng.gen_bool(0.3) {
                    pop.get_mut(PersonId(i)).friends.push(PersonId(j));
                }
                if i != j && rng.gen_bool(0.3) {
                    pop.get_mut(PersonId(i)).coworkers.push(PersonId(j));
                }
                if i != j && rng.gen_bool(0.1) {
                    pop.get_mut(PersonId(i)).partners.push(PersonId(j));
                }
            }
            pop.get_mut(PersonId(i)).workplace = Some(LocationId(0));
            pop.get_mut(PersonId(i)).hygiene = rng.random();
            pop.get_mut(PersonId(i)).showing_symptoms = rng.gen_bool(0.5);
        }
        for i in 0..8u32 {
            for j in 0..8u32 {
                if i == j {
                    continue;
                }
                let a = affinity(&pop, PersonId(i), PersonId(j));
                assert!((0.0..=1.0).contains(&a), "affinity({i},{j}) = {a}");
            }
        }
    }
}
