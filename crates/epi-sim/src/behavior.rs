//! The per-agent activity state machine.
//!
//! Two entry points per agent per tick, called by the day loop in id order:
//!
//! 1. [`do_current_action`] — execute the consequences of what the agent is
//!    already doing: advance a journey one hop, or run transmission inside
//!    an interaction.
//! 2. [`action_transition`] — decide what to do next.  A fixed priority
//!    ladder: sleep, hospital-seeking, work, then location-specific social
//!    behavior.  First applicable rule wins.
//!
//! # Interaction symmetry
//!
//! Talking/Intimate are always held symmetrically: if A targets B, B targets
//! A.  Every activity change funnels through [`set_activity`], which
//! releases the old partner back to Idle whenever an interaction is broken —
//! by a drop roll, by a higher-priority transition (bedtime, hospital), or
//! by death.
//!
//! # Failure semantics
//!
//! Branches that "can't happen" (asleep away from home, intimate outside a
//! home, an exhausted travel path) panic.  They indicate corrupted
//! agent/location state; continuing would silently corrupt the run.

use epi_agent::{Activity, ActivityKind, affinity};
use epi_core::{DiseaseId, LocationId, PersonId, TimeOfDay, stochastic_sort};
use epi_map::LocationType;

use crate::sim::Simulation;

/// Which bookkeeping counter a transmission feeds.
#[derive(Copy, Clone, PartialEq, Eq)]
enum Channel {
    Direct,
    Idle,
}

// ── Executing the current activity ───────────────────────────────────────────

/// Execute the side effects of the agent's current activity.
pub(crate) fn do_current_action(sim: &mut Simulation, id: PersonId) {
    let (alive, kind, partner) = {
        let p = sim.population.get(id);
        (p.alive, p.activity.kind(), p.activity.partner())
    };
    if !alive {
        return;
    }
    match kind {
        ActivityKind::Traveling => step_travel(sim, id),
        ActivityKind::Talking | ActivityKind::Intimate => {
            let partner = partner.expect("interaction without a partner");
            interact(sim, id, partner);
        }
        ActivityKind::Idle | ActivityKind::Sleep => {}
    }
}

/// Advance a traveling agent: wait out the current location's crossing time,
/// then take the next hop.  Arrival at the final destination flips the
/// activity back to Idle.
fn step_travel(sim: &mut Simulation, id: PersonId) {
    {
        let person = sim.population.get_mut(id);
        if person.travel_wait > 0 {
            person.travel_wait -= 1;
            return;
        }
    }

    let (from, dest, next) = {
        let person = sim.population.get(id);
        let Activity::Traveling { dest, path } = &person.activity else {
            unreachable!("step_travel on a non-traveling agent");
        };
        let next = *path
            .last()
            .unwrap_or_else(|| panic!("{id} is traveling with an exhausted path"));
        (person.location, *dest, next)
    };

    if !sim.map.try_move(id, Some(from), next) {
        // Next hop is at capacity: hold position and retry next tick.
        return;
    }

    let crossing_time = sim.map.location(next).travel_time;
    let person = sim.population.get_mut(id);
    person.location = next;
    let Activity::Traveling { path, .. } = &mut person.activity else {
        unreachable!();
    };
    path.pop();

    if next == dest {
        debug_assert!(path.is_empty(), "arrived with hops left over");
        person.activity = Activity::Idle;
        person.travel_wait = 0;
    } else {
        person.travel_wait = crossing_time;
    }
}

/// Run transmission both ways inside an interaction.  This is the sole
/// channel for direct infection.
fn interact(sim: &mut Simulation, id: PersonId, partner: PersonId) {
    debug_assert_eq!(
        sim.population.get(partner).activity.partner(),
        Some(id),
        "interaction between {id} and {partner} is not symmetric"
    );
    for di in 0..sim.diseases.len() {
        let d = DiseaseId(di as u16);
        transmit(sim, d, id, partner, Channel::Direct);
        transmit(sim, d, partner, id, Channel::Direct);
    }
}

/// One directed transmission attempt; applies the infection and feeds the
/// counters (and patient zero's R0 tally) if it lands.
fn transmit(sim: &mut Simulation, d: DiseaseId, from: PersonId, to: PersonId, channel: Channel) {
    let caught = {
        let a = sim.population.get(from);
        let b = sim.population.get(to);
        sim.diseases[d.index()].infects(d, &sim.diseases, a, b, &mut sim.rng)
    };
    if !caught {
        return;
    }
    let applied = sim.diseases[d.index()].infect(d, sim.population.get_mut(to));
    if applied {
        let disease = &mut sim.diseases[d.index()];
        if disease.patient_zero == Some(from) {
            disease.secondary_cases += 1;
        }
        match channel {
            Channel::Direct => sim.direct_today += 1,
            Channel::Idle => sim.idle_today += 1,
        }
    }
}

// ── Deciding the next activity ───────────────────────────────────────────────

/// The per-tick decision ladder.  First applicable rule wins.
pub(crate) fn action_transition(sim: &mut Simulation, id: PersonId, tod: TimeOfDay) {
    let (alive, home, workplace, work_schedule, sleep_schedule, location, showing) = {
        let p = sim.population.get(id);
        (
            p.alive,
            p.home,
            p.workplace,
            p.work_schedule,
            p.sleep_schedule,
            p.location,
            p.showing_symptoms,
        )
    };

    // 1. The dead do nothing.
    if !alive {
        return;
    }

    let mut kind = sim.population.get(id).activity.kind();

    // 2. Bedtime.
    if sleep_schedule.contains(tod) {
        if kind == ActivityKind::Sleep {
            return;
        }
        if home == Some(location) {
            set_activity(sim, id, Activity::Sleep);
            return;
        }
        if let Some(home) = home {
            if sim.population.get(id).activity.is_traveling_to(home) {
                return; // already on the way
            }
            travel_to(sim, id, home);
            return;
        }
        // Homeless: nowhere to sleep, keep loitering below.
    } else if kind == ActivityKind::Sleep {
        assert!(
            home == Some(location),
            "{id} woke up somewhere other than home"
        );
        set_activity(sim, id, Activity::Idle);
        kind = ActivityKind::Idle;
    }

    // 3. Visibly sick people weigh going to a hospital: the conscientious
    //    and the frail go sooner.
    if showing && sim.map.location(location).kind != LocationType::Hospital {
        let p_hospital = {
            let person = sim.population.get(id);
            let eff = person.effective_healthiness(&sim.diseases);
            0.5 * person.hygiene + 0.5 * (1.0 - eff)
        };
        if sim.rng.gen_bool(p_hospital) {
            if let Some(hospital) = sim.map.nearest_hospital(sim.map.location(location).center) {
                if sim.population.get(id).activity.is_traveling_to(hospital) {
                    return; // already on the way
                }
                travel_to(sim, id, hospital);
                return;
            }
        }
    }

    // 4. Work bell.
    if let (Some(schedule), Some(workplace)) = (work_schedule, workplace) {
        if schedule.contains(tod) && location != workplace {
            if sim.population.get(id).activity.is_traveling_to(workplace) {
                return;
            }
            travel_to(sim, id, workplace);
            return;
        }
    }

    // 5. Mid-journey: keep going until arrival.
    if kind == ActivityKind::Traveling {
        return;
    }

    // 6. Location-specific idling.
    let loc_kind = sim.map.location(location).kind;

    if workplace == Some(location) {
        let during_hours = work_schedule.is_some_and(|w| w.contains(tod));
        if during_hours {
            social_round(sim, id);
            return;
        }
        // Work is over: head home.
        if let Some(home) = home {
            travel_to(sim, id, home);
            return;
        }
        generic_idle(sim, id, loc_kind);
        return;
    }

    if loc_kind == LocationType::Hospital {
        // Patients (staff were handled above): leave once the symptoms do.
        if !showing {
            if let Some(home) = home {
                travel_to(sim, id, home);
                return;
            }
        }
        social_round(sim, id);
        return;
    }

    if home == Some(location) {
        match sim.population.get(id).activity.clone() {
            Activity::Talking { partner } | Activity::Intimate { partner } => {
                continue_or_drop(sim, id, partner);
            }
            Activity::Idle => home_menu(sim, id),
            other => unreachable!("{id} is {:?} at home after the ladder", other.kind()),
        }
        return;
    }

    generic_idle(sim, id, loc_kind);
}

/// Idle behavior anywhere that isn't home, the workplace, or a hospital
/// stay: hang around, chat, or head out somewhere nicer.
fn generic_idle(sim: &mut Simulation, id: PersonId, loc_kind: LocationType) {
    match sim.population.get(id).activity.clone() {
        Activity::Talking { partner } => continue_or_drop(sim, id, partner),
        Activity::Idle => public_menu(sim, id),
        other => unreachable!(
            "{id} is {:?} in a {loc_kind} location after the ladder",
            other.kind()
        ),
    }
}

/// Workplace/hospital social behavior: keep an ongoing conversation going,
/// or flip a coin between striking one up and staying idle.
fn social_round(sim: &mut Simulation, id: PersonId) {
    match sim.population.get(id).activity.clone() {
        Activity::Talking { partner } => continue_or_drop(sim, id, partner),
        Activity::Idle => {
            if sim.rng.gen_bool(sim.config.talk_seek_probability) {
                if !seek_talk_partner(sim, id) {
                    set_activity(sim, id, Activity::Idle);
                }
            } else {
                set_activity(sim, id, Activity::Idle);
            }
        }
        other => unreachable!("{id} is {:?} during a social round", other.kind()),
    }
}

// ── Menus ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq)]
enum MenuChoice {
    Stay,
    Talk,
    Intimate,
    Outing,
}

/// At home and idle: pick among staying put, chatting, intimacy, or a
/// leisure trip.  Failed options are removed and another is drawn until one
/// succeeds or only bare idling remains.
fn home_menu(sim: &mut Simulation, id: PersonId) {
    run_menu(
        sim,
        id,
        vec![MenuChoice::Stay, MenuChoice::Talk, MenuChoice::Intimate, MenuChoice::Outing],
    );
}

/// Anywhere public-ish and idle: the same retry menu minus the intimate
/// option.
fn public_menu(sim: &mut Simulation, id: PersonId) {
    run_menu(sim, id, vec![MenuChoice::Stay, MenuChoice::Talk, MenuChoice::Outing]);
}

fn run_menu(sim: &mut Simulation, id: PersonId, mut options: Vec<MenuChoice>) {
    while !options.is_empty() {
        let i = sim.rng.gen_range(0..options.len());
        let succeeded = match options.swap_remove(i) {
            MenuChoice::Stay => {
                set_activity(sim, id, Activity::Idle);
                true
            }
            MenuChoice::Talk => seek_talk_partner(sim, id),
            MenuChoice::Intimate => seek_intimate_partner(sim, id),
            MenuChoice::Outing => try_leisure(sim, id),
        };
        if succeeded {
            return;
        }
    }
    set_activity(sim, id, Activity::Idle);
}

// ── Interaction management ───────────────────────────────────────────────────

/// Re-draw the dyadic affinity; the interaction survives with that
/// probability, otherwise both participants revert to Idle.  Interactions
/// are self-terminating, not fixed-duration.
fn continue_or_drop(sim: &mut Simulation, id: PersonId, partner: PersonId) {
    let aff = affinity(&sim.population, id, partner);
    if !sim.rng.gen_bool(aff) {
        set_activity(sim, id, Activity::Idle);
    }
}

/// Look for someone here worth talking to.  Candidates are ranked by
/// affinity through the stochastic sort (a *preference* for high affinity,
/// not a strict greedy order), then accepted by a Bernoulli trial on the
/// affinity itself.  Returns `false` if nobody bites.
fn seek_talk_partner(sim: &mut Simulation, id: PersonId) -> bool {
    idle_infection_round(sim, id);

    let location = sim.population.get(id).location;
    let mut candidates: Vec<(PersonId, f64)> = sim
        .map
        .location(location)
        .occupants
        .iter()
        .copied()
        .filter(|&other| other != id)
        .filter(|&other| {
            let p = sim.population.get(other);
            p.alive && p.activity == Activity::Idle
        })
        .map(|other| (other, affinity(&sim.population, id, other)))
        .collect();

    let levels = sim.config.ssort_levels;
    stochastic_sort(&mut sim.rng, &mut candidates, levels, |a, b| a.1 > b.1);

    for (candidate, aff) in candidates {
        if sim.rng.gen_bool(aff) {
            set_activity(sim, id, Activity::Talking { partner: candidate });
            set_activity(sim, candidate, Activity::Talking { partner: id });
            return true;
        }
    }
    false
}

/// Look for a co-located partner in the mood.  Home only.
fn seek_intimate_partner(sim: &mut Simulation, id: PersonId) -> bool {
    idle_infection_round(sim, id);

    let (location, partners) = {
        let p = sim.population.get(id);
        (p.location, p.partners.clone())
    };
    let mut candidates: Vec<(PersonId, f64)> = partners
        .into_iter()
        .filter(|&other| {
            let p = sim.population.get(other);
            p.alive && p.location == location && p.activity == Activity::Idle
        })
        .map(|other| (other, affinity(&sim.population, id, other)))
        .collect();

    let levels = sim.config.ssort_levels;
    stochastic_sort(&mut sim.rng, &mut candidates, levels, |a, b| a.1 > b.1);

    for (candidate, aff) in candidates {
        if sim.rng.gen_bool(aff) {
            set_activity(sim, id, Activity::Intimate { partner: candidate });
            set_activity(sim, candidate, Activity::Intimate { partner: id });
            return true;
        }
    }
    false
}

/// Head out to one of the preferred leisure places.  Fails (for the menu's
/// retry logic) when there are no places, the travel mood doesn't strike,
/// or the drawn place is where we already are.
fn try_leisure(sim: &mut Simulation, id: PersonId) -> bool {
    if sim.population.get(id).places.is_empty() {
        return false;
    }
    if !sim.rng.gen_bool(sim.config.travel_probability) {
        return false;
    }
    let location = sim.population.get(id).location;
    let dest = *sim
        .rng
        .choose(&sim.population.get(id).places)
        .expect("places is non-empty");
    if dest == location {
        return false;
    }
    travel_to(sim, id, dest);
    true
}

// ── Primitives ───────────────────────────────────────────────────────────────

/// Start traveling to `dest`.  Routing failure is a map-data error and
/// fails fast.
fn travel_to(sim: &mut Simulation, id: PersonId, dest: LocationId) {
    let from = sim.population.get(id).location;
    debug_assert_ne!(from, dest, "travel to the current location");
    let path = sim
        .map
        .path(from, dest)
        .unwrap_or_else(|e| panic!("routing failure for {id}: {e}"));
    let crossing_time = sim.map.location(from).travel_time;
    set_activity(sim, id, Activity::traveling(dest, path));
    sim.population.get_mut(id).travel_wait = crossing_time;
}

/// Commit an activity change, releasing the previous interaction partner
/// (if any) so the symmetry invariant holds across every transition.
fn set_activity(sim: &mut Simulation, id: PersonId, new: Activity) {
    let old_partner = sim.population.get(id).activity.partner();
    if let Some(p) = old_partner {
        if new.partner() != Some(p) {
            sim.population.get_mut(p).activity = Activity::Idle;
        }
    }
    debug_assert!(
        {
            let k = new.kind();
            k == ActivityKind::Traveling
                || k.legal_in(sim.map.location(sim.population.get(id).location).kind)
        },
        "{id}: {} is illegal here",
        new.kind()
    );
    sim.population.get_mut(id).activity = new;
}

/// Release a freshly dead agent from any interaction (their partner reverts
/// to Idle) and park them in Idle for inspection.
pub(crate) fn release_on_death(sim: &mut Simulation, id: PersonId) {
    set_activity(sim, id, Activity::Idle);
    sim.population.get_mut(id).travel_wait = 0;
}

/// Evaluate idle transmission between this agent and every co-located
/// other, at most once per unique pair per tick (the pair set is cleared by
/// the day loop each tick).  Costs O(occupancy²) per location per tick when
/// enabled — which is why it defaults off.
fn idle_infection_round(sim: &mut Simulation, id: PersonId) {
    if !sim.config.idle_infection {
        return;
    }
    let location = sim.population.get(id).location;
    let others: Vec<PersonId> = sim
        .map
        .location(location)
        .occupants
        .iter()
        .copied()
        .filter(|&other| other != id)
        .collect();

    for other in others {
        let key = if id < other { (id, other) } else { (other, id) };
        if !sim.idle_pairs_done.insert(key) {
            continue;
        }
        for di in 0..sim.diseases.len() {
            let d = DiseaseId(di as u16);
            transmit(sim, d, id, other, Channel::Idle);
            transmit(sim, d, other, id, Channel::Idle);
        }
    }
}
