use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use chrono::Utc;
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use crate::error::Result;
use crate::schedule::score::calculate;
use crate::schedule::{Cell, Occupant, Timetable};

/// Marker written for a seat nobody holds
pub const EMPTY_MARKER: &str = "x";

/// Serialisable view of a timetable's live roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableExport {
    /// Days
    pub columns: Vec<String>,
    /// Time slots
    pub rows: Vec<String>,
    /// slot -> day -> seat names
    pub schedule: BTreeMap<String, BTreeMap<String, Vec<String>>>,
    pub score: i64,
    pub evaluations: u64,
    pub best: Option<i64>,
    /// RFC 3339 timestamp
    pub generated_at: String,
}

impl TimetableExport {
    /// Snapshots the timetable. The score is computed without counting an
    /// evaluation.
    pub fn from_timetable(timetable: &Timetable) -> Self {
        let problem = timetable.problem();
        let mut schedule = BTreeMap::new();
        for (t, slot) in problem.time_slots().iter().enumerate() {
            let mut days = BTreeMap::new();
            for (d, day) in problem.days().iter().enumerate() {
                days.insert(day.clone(), seat_names(timetable, d, t));
            }
            schedule.insert(slot.clone(), days);
        }

        Self {
            columns: problem.days().to_vec(),
            rows: problem.time_slots().to_vec(),
            schedule,
            score: calculate(timetable.roster(), timetable.assistants()),
            evaluations: timetable.evaluations(),
            best: timetable.best(),
            generated_at: Utc::now().to_rfc3339(),
        }
    }

    /// Seat names for one slot and day, empty when either is unknown
    pub fn names(&self, time_slot: &str, day: &str) -> &[String] {
        self.schedule
            .get(time_slot)
            .and_then(|days| days.get(day))
            .map(|names| names.as_slice())
            .unwrap_or(&[])
    }

    /// Largest number of seats listed for any slot
    pub fn seat_count(&self) -> usize {
        self.schedule
            .values()
            .flat_map(|days| days.values())
            .map(|names| names.len())
            .max()
            .unwrap_or(0)
    }

    /// Writes one record per (day, time slot): `day,time_slot,seat_1..seat_n`,
    /// padded with blanks past the slot's capacity.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let seats = self.seat_count();
        let mut wtr = WriterBuilder::new().from_writer(writer);

        let mut header = vec!["day".to_string(), "time_slot".to_string()];
        header.extend((1..=seats).map(|seat| format!("seat_{}", seat)));
        wtr.write_record(&header)?;

        for day in &self.columns {
            for slot in &self.rows {
                let names = self.names(slot, day);
                let mut record = Vec::with_capacity(seats + 2);
                record.push(day.as_str());
                record.push(slot.as_str());
                record.extend(names.iter().map(|name| name.as_str()));
                record.extend(std::iter::repeat("").take(seats - names.len()));
                wtr.write_record(&record)?;
            }
        }

        wtr.flush()?;
        Ok(())
    }

    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv(file)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

fn seat_names(timetable: &Timetable, day: usize, time_slot: usize) -> Vec<String> {
    (0..timetable.problem().capacity(day, time_slot))
        .filter_map(|seat| timetable.roster().get(Cell::new(day, time_slot, seat)))
        .map(|occupant| match occupant {
            Occupant::Empty => EMPTY_MARKER.to_string(),
            Occupant::Assigned(id) => timetable
                .assistant(id)
                .map(|assistant| assistant.name.clone())
                .unwrap_or_else(|| id.to_string()),
        })
        .collect()
}
