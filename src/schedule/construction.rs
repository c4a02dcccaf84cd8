use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};
use crate::error::{Result, RosterError};
use super::timetable::Timetable;

/// Default number of construction attempts before giving up
pub const DEFAULT_ITERATIONS: usize = 100;

/// Randomised greedy construction of an initial roster.
///
/// Hour quotas and within-slot uniqueness are enforced while filling;
/// availability is left to the score.
#[derive(Debug, Clone)]
pub struct Randomize {
    pub iterations: usize,
    /// Treat any cell left empty as a failed attempt
    pub perfect_fit: bool,
}

impl Default for Randomize {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            perfect_fit: true,
        }
    }
}

impl Randomize {
    pub fn new(iterations: usize, perfect_fit: bool) -> Self {
        Self { iterations, perfect_fit }
    }

    /// Fills the timetable's roster, restarting from a clean reset until an
    /// attempt succeeds or the iteration limit is exhausted.
    pub fn run<R: Rng + ?Sized>(&self, timetable: &mut Timetable, rng: &mut R) -> Result<()> {
        for attempt in 1..=self.iterations.max(1) {
            let empty = self.randomize(timetable, rng);
            if empty == 0 || !self.perfect_fit {
                info!(attempt, empty_cells = empty, "Constructed initial roster");
                return Ok(());
            }
            debug!(attempt, empty_cells = empty, "Construction attempt left cells empty");
        }
        Err(RosterError::ConstructionExhausted {
            attempts: self.iterations.max(1),
        })
    }

    /// One construction pass. Returns the number of occupied cells that no
    /// assistant could take.
    pub fn randomize<R: Rng + ?Sized>(&self, timetable: &mut Timetable, rng: &mut R) -> usize {
        timetable.reset();
        let mut assistants = timetable.assistant_ids();
        let cells = timetable.problem().occupied_cells().to_vec();
        let mut empty = 0;

        for cell in cells {
            assistants.shuffle(rng);
            let candidate = assistants
                .iter()
                .copied()
                .find(|&id| timetable.can_assign(id, cell.day, cell.time_slot));
            match candidate {
                Some(id) => timetable.assign(cell, id),
                None => empty += 1,
            }
        }

        empty
    }
}
