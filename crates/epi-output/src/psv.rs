//! Pipe-separated telemetry files.
//!
//! Three streams, all in one output directory:
//!
//! - `daily.psv` — one row per day: `day|direct|idle|total`.
//! - `infections.psv` — one row per snapshot tick: per-disease,
//!   per-state population counts, then the population total.
//! - `snapshots.psv` — one row per person per snapshot tick: id, location,
//!   and every disease state.
//!
//! Headers are written lazily on the first row (the infection header needs
//! the disease names, which only arrive with the first snapshot).  Observer
//! hooks return `()`, so write errors are captured and surfaced through
//! [`take_error`](PsvWriter::take_error) after the run.

use std::fs::File;
use std::path::Path;

use csv::{Writer, WriterBuilder};

use epi_agent::{Disease, DiseaseState, Population};
use epi_core::Tick;
use epi_map::WorldMap;
use epi_sim::{DayStats, SimObserver};

use crate::error::{OutputError, OutputResult};

const DELIMITER: u8 = b'|';

fn open(dir: &Path, name: &str) -> OutputResult<Writer<File>> {
    Ok(WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_path(dir.join(name))?)
}

/// A [`SimObserver`] writing the pipe-separated dump files.
pub struct PsvWriter {
    daily:      Writer<File>,
    infections: Writer<File>,
    snapshots:  Writer<File>,
    headers_written: bool,
    last_error: Option<OutputError>,
}

impl PsvWriter {
    /// Create (truncating) the three `.psv` files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut daily = open(dir, "daily.psv")?;
        daily.write_record(["day", "direct", "idle", "total"])?;

        Ok(Self {
            daily,
            infections: open(dir, "infections.psv")?,
            snapshots: open(dir, "snapshots.psv")?,
            headers_written: false,
            last_error: None,
        })
    }

    /// Take the first write error (if any) after the run completes.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush all streams.  Call after the run; also invoked by
    /// `on_sim_end`.
    pub fn finish(&mut self) -> OutputResult<()> {
        self.daily.flush()?;
        self.infections.flush()?;
        self.snapshots.flush()?;
        Ok(())
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn write_headers(&mut self, diseases: &[Disease]) -> OutputResult<()> {
        let mut infection_header = vec!["tick".to_owned()];
        for d in diseases {
            for s in DiseaseState::ALL {
                infection_header.push(format!("{} {s}", d.name));
            }
        }
        infection_header.push("total".to_owned());
        self.infections.write_record(&infection_header)?;

        let mut snapshot_header = vec!["tick".to_owned(), "person".to_owned(), "location".to_owned()];
        for d in diseases {
            snapshot_header.push(d.name.clone());
        }
        self.snapshots.write_record(&snapshot_header)?;
        Ok(())
    }

    fn write_snapshot_rows(
        &mut self,
        tick:       Tick,
        population: &Population,
        diseases:   &[Disease],
    ) -> OutputResult<()> {
        if !self.headers_written {
            self.write_headers(diseases)?;
            self.headers_written = true;
        }

        // Infection census row.
        let mut census = vec![tick.0.to_string()];
        for di in 0..diseases.len() {
            let mut counts = [0usize; DiseaseState::COUNT];
            for person in population.iter() {
                counts[person.disease_state(epi_core::DiseaseId(di as u16)).index()] += 1;
            }
            census.extend(counts.iter().map(|c| c.to_string()));
        }
        census.push(population.len().to_string());
        self.infections.write_record(&census)?;

        // Per-person rows.
        for person in population.iter() {
            let mut row = vec![
                tick.0.to_string(),
                person.id.0.to_string(),
                person.location.0.to_string(),
            ];
            for &state in person.disease_states() {
                row.push(state.as_str().to_owned());
            }
            self.snapshots.write_record(&row)?;
        }
        Ok(())
    }
}

impl SimObserver for PsvWriter {
    fn on_snapshot(
        &mut self,
        tick:       Tick,
        _map:       &WorldMap,
        population: &Population,
        diseases:   &[Disease],
    ) {
        let result = self.write_snapshot_rows(tick, population, diseases);
        self.store_err(result);
    }

    fn on_day_end(&mut self, stats: &DayStats) {
        let result = self
            .daily
            .write_record([
                stats.day.to_string(),
                stats.direct_infections.to_string(),
                stats.idle_infections.to_string(),
                stats.total().to_string(),
            ])
            .map_err(OutputError::from);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.finish();
        self.store_err(result);
    }
}
