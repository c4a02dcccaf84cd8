use std::collections::{BTreeMap, BTreeSet};
use super::roster::Roster;
use super::types::{Assistant, AssistantId, Occupant};

pub const BASELINE: i64 = 100;
pub const AVAILABILITY_PENALTY: i64 = 100;
pub const ISOLATION_PENALTY: i64 = 1;
pub const GAP_PENALTY: i64 = 100;
pub const LONG_BLOCK_PENALTY: i64 = 5;
/// Longest run of consecutive slots on one day that goes unpenalised
pub const MAX_BLOCK: usize = 4;

/// Scores a roster against the assistants' availability.
///
/// Starts at [`BASELINE`] and only subtracts:
/// - [`AVAILABILITY_PENALTY`] per assigned cell the assistant is unavailable for
///   (assistants missing from `assistants` count as unavailable),
/// - [`ISOLATION_PENALTY`] per assigned cell with no assignment of the same
///   assistant in the previous or next slot of that day,
/// - [`GAP_PENALTY`] per pair of consecutive same-day assignments that are not
///   adjacent,
/// - [`LONG_BLOCK_PENALTY`] for every slot past the [`MAX_BLOCK`]th of a run.
///
/// Empty cells contribute nothing.
pub fn calculate(roster: &Roster, assistants: &BTreeMap<AssistantId, Assistant>) -> i64 {
    let mut score = BASELINE;
    let mut schedule: BTreeMap<AssistantId, BTreeSet<(usize, usize)>> = BTreeMap::new();

    for (cell, occupant) in roster.occupied() {
        let Occupant::Assigned(id) = occupant else {
            continue;
        };
        schedule.entry(id).or_default().insert(cell.group());

        let available = assistants
            .get(&id)
            .map(|assistant| assistant.is_available(cell.day, cell.time_slot))
            .unwrap_or(false);
        if !available {
            score -= AVAILABILITY_PENALTY;
        }
    }

    for (cell, occupant) in roster.occupied() {
        let Some(slots) = occupant.assistant().and_then(|id| schedule.get(&id)) else {
            continue;
        };
        let before = cell.time_slot > 0 && slots.contains(&(cell.day, cell.time_slot - 1));
        let after = slots.contains(&(cell.day, cell.time_slot + 1));
        if !before && !after {
            score -= ISOLATION_PENALTY;
        }
    }

    for slots in schedule.values() {
        let mut run = 1;
        let ordered: Vec<_> = slots.iter().copied().collect();
        for pair in ordered.windows(2) {
            let ((prev_day, prev_slot), (day, slot)) = (pair[0], pair[1]);
            if day != prev_day {
                run = 1;
                continue;
            }
            if slot - prev_slot != 1 {
                score -= GAP_PENALTY;
                run = 1;
                continue;
            }
            run += 1;
            if run > MAX_BLOCK {
                score -= LONG_BLOCK_PENALTY;
            }
        }
    }

    score
}
