//! outbreak — smallest end-to-end run of the epi simulation engine.
//!
//! Builds a hand-made town and a 24-person population, seeds a flu-like
//! disease, and runs to convergence with PSV telemetry.  The map and
//! population construction here stand in for the real collaborators (raster
//! extraction and statistical population synthesis); everything after
//! `Simulation::new` is the engine proper.

mod world;

use std::path::PathBuf;

use anyhow::Result;

use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};

use epi_agent::{DiseaseState, Population, catalog};
use epi_core::{PersonId, SimRng, TimeOfDay, TimeWindow};
use epi_map::LocationType;
use epi_output::PsvWriter;
use epi_sim::{NoNewInfections, SimConfig, Simulation};

// ── Constants ─────────────────────────────────────────────────────────────────

const POPULATION:  u32 = 24;
const SEED:        u64 = 42;
const DAY_LIMIT:   u32 = 120;
const SCHOOL_SIZE: usize = 8;

/// Fallback workday for workplaces without shared office hours.
fn default_work_window() -> TimeWindow {
    TimeWindow::new(TimeOfDay::from_hours(9), TimeOfDay::from_hours(17))
}

fn init_logging() -> Result<()> {
    let stdout = ConsoleAppender::builder().build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(log::LevelFilter::Info))?;
    log4rs::init_config(config)?;
    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_logging()?;
    println!("=== outbreak — epi simulation engine ===");
    println!("Population: {POPULATION}  |  Day limit: {DAY_LIMIT}  |  Seed: {SEED}");
    println!();

    // 1. World and disease roster.
    let mut town = world::build_town();
    let school = town.map.create_school(SCHOOL_SIZE)?;
    let roster = vec![catalog::flu()];
    println!("Map: {} locations (school at {school})", town.map.len());

    // 2. Population.  A stand-in for the statistical population builder:
    //    random homes, workplaces, schedules, and social wiring.
    let mut build_rng = SimRng::new(SEED ^ 0x5eed);
    let mut pop = Population::new();

    let mut home_candidates = town.map.house_candidates();
    for _ in 0..POPULATION {
        let age = build_rng.gen_range(6..80u32);
        let home = town.map.random_house(&mut home_candidates, &mut build_rng);
        let states: Vec<DiseaseState> =
            roster.iter().map(|d| d.initial_state(&mut build_rng)).collect();
        let id = pop.add(home, age, states);
        if let Some(h) = home {
            town.map.location_mut(h).residents.push(id);
        }
        let person = pop.get_mut(id);
        person.hygiene = build_rng.gen_range(0.2..0.9);
        person.healthiness = build_rng.gen_range(0.5..1.0);
    }
    let everyone: Vec<PersonId> = pop.ids().collect();

    // Workplaces: minors attend the school, most adults hold a job.
    let mut workable = town.map.workable_candidates();
    for &id in &everyone {
        let age = pop.get(id).age;
        let workplace = if age < 18 {
            Some(school)
        } else if build_rng.gen_bool(0.7) {
            town.map.random_workable(&mut workable, &mut build_rng)
        } else {
            None
        };
        let Some(w) = workplace else { continue };
        town.map.location_mut(w).employees.push(id);
        let window = town.map.location(w).work_window().unwrap_or_else(default_work_window);
        let person = pop.get_mut(id);
        person.workplace = Some(w);
        person.work_schedule = Some(window);
    }

    // Coworker edges among each workplace's staff (one-directional draws,
    // like the reference population builder).
    for loc in town.map.ids().collect::<Vec<_>>() {
        let staff = town.map.location(loc).employees.clone();
        for &id in &staff {
            for _ in 0..staff.len().min(3) {
                if let Some(&other) = build_rng.choose(&staff) {
                    if other != id && !pop.get(id).coworkers.contains(&other) {
                        pop.get_mut(id).coworkers.push(other);
                    }
                }
            }
        }
    }

    // Friends: a few random draws from the whole town.
    for &id in &everyone {
        let n = build_rng.gen_range(1..4usize);
        for _ in 0..n {
            if let Some(&other) = build_rng.choose(&everyone) {
                if other != id && !pop.get(id).friends.contains(&other) {
                    pop.get_mut(id).friends.push(other);
                }
            }
        }
    }

    // Partners: the first two adult housemates of each home.
    for &home in &town.homes {
        let adults: Vec<PersonId> = town
            .map
            .location(home)
            .residents
            .iter()
            .copied()
            .filter(|&p| pop.get(p).age >= 18)
            .collect();
        if let [a, b, ..] = adults[..] {
            pop.get_mut(a).partners.push(b);
            pop.get_mut(b).partners.push(a);
        }
    }

    // Preferred leisure spots.
    for &id in &everyone {
        for place in [town.shop, town.stadium] {
            if build_rng.gen_bool(0.6) {
                pop.get_mut(id).places.push(place);
                town.map.location_mut(place).clientele.push(id);
            }
        }
    }

    // 3. Assemble and run.
    let config = SimConfig {
        seed: SEED,
        snapshot_interval_ticks: 360, // four snapshots per day
        ensure_fresh_patient_zero: true,
        ..SimConfig::default()
    };
    let mut sim = Simulation::new(config, town.map, pop, roster)?;
    sim.place_all_at_home()?;

    let out_dir = PathBuf::from("outbreak-out");
    std::fs::create_dir_all(&out_dir)?;
    let mut writer = PsvWriter::new(&out_dir)?;

    let days = sim.run(&mut NoNewInfections::default(), DAY_LIMIT, &mut writer)?;
    if let Some(e) = writer.take_error() {
        return Err(e.into());
    }

    // 4. Summary.
    println!();
    println!("Converged after {days} days.  Telemetry in {}/", out_dir.display());
    for (i, disease) in sim.diseases.iter().enumerate() {
        let census = sim.state_census(epi_core::DiseaseId(i as u16));
        println!("{}:", disease.name);
        for state in DiseaseState::ALL {
            let n = census[state.index()];
            if n > 0 {
                println!("  {:>4}  {}", n, state.as_str());
            }
        }
        println!("  measured R0: {}", disease.measured_r0());
    }
    let dead = sim.population.iter().filter(|p| !p.alive).count();
    let hospitalized = sim
        .population
        .iter()
        .filter(|p| p.alive && sim.map.location(p.location).kind == LocationType::Hospital)
        .count();
    println!("{dead} dead, {hospitalized} still hospitalized");

    Ok(())
}
