use rand::Rng;
use tracing::{info, trace, warn};
use crate::error::{Result, RosterError};
use super::timetable::Timetable;

/// Default evaluation budget of one run
pub const DEFAULT_SWAPS: u64 = 250;
/// Default number of cells rotated per perturbation
pub const DEFAULT_ARITY: usize = 2;

/// Stochastic hill climber over cyclic swaps.
///
/// Each step scores a copy of the live roster with one swap applied and keeps
/// it when the score does not drop, so plateaus can be crossed. The run ends
/// when the timetable has performed exactly the requested number of
/// evaluations; it never stops on convergence.
#[derive(Debug, Clone)]
pub struct Hillclimber {
    pub swaps: u64,
    pub arity: usize,
}

impl Default for Hillclimber {
    fn default() -> Self {
        Self {
            swaps: DEFAULT_SWAPS,
            arity: DEFAULT_ARITY,
        }
    }
}

impl Hillclimber {
    pub fn new(swaps: u64, arity: usize) -> Self {
        Self { swaps, arity }
    }

    /// Improves the timetable in place using `swaps` evaluations, or the
    /// configured default when `None`. Scoring the starting roster counts
    /// towards the budget.
    ///
    /// If the roster admits no valid swap at all the run stops early with a
    /// warning, leaving the roster unchanged.
    pub fn run<R: Rng + ?Sized>(&self, timetable: &mut Timetable, swaps: Option<u64>, rng: &mut R) -> Result<()> {
        let budget = swaps.unwrap_or(self.swaps);
        if budget == 0 {
            return Ok(());
        }
        let target = timetable.evaluations() + budget;
        let mut maximum = timetable.score();
        let mut accepted = 0u64;

        while timetable.evaluations() < target {
            let candidate = match timetable.roster().swapped_copy(self.arity, rng) {
                Ok(candidate) => candidate,
                Err(RosterError::NoValidSwap { arity }) => {
                    warn!(arity, evaluations = timetable.evaluations(), "No valid swap left, stopping early");
                    break;
                }
                Err(e) => return Err(e),
            };

            let score = timetable.evaluate(&candidate);
            if score >= maximum {
                timetable.adopt_swapped(candidate);
                timetable.record_step(score);
                maximum = score;
                accepted += 1;
                trace!(score, evaluations = timetable.evaluations(), "Accepted step");
            }
        }

        info!(
            evaluations = timetable.evaluations(),
            score = maximum,
            accepted,
            "Hill climbing finished"
        );
        Ok(())
    }
}
