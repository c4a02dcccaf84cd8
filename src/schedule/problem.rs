use std::collections::HashSet;
use crate::error::{Result, RosterError};
use super::types::{Assistant, Cell};

/// Static description of the scheduling universe.
///
/// Built once from parsed input and never mutated afterwards, so a single
/// instance can be shared between runs behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ProblemDefinition {
    days: Vec<String>,
    time_slots: Vec<String>,
    /// Required seats, indexed `[day][time_slot]`
    capacity: Vec<Vec<usize>>,
    max_capacity: usize,
    occupied_cells: Vec<Cell>,
    assistants: Vec<Assistant>,
}

impl ProblemDefinition {
    /// Validates the axes, the capacity table and every availability grid,
    /// then derives the occupied cell universe in (day, time slot, seat) order.
    pub fn new(
        days: Vec<String>,
        time_slots: Vec<String>,
        capacity: Vec<Vec<i64>>,
        assistants: Vec<Assistant>,
    ) -> Result<Self> {
        if days.is_empty() || time_slots.is_empty() {
            return Err(invalid("day and time slot axes must not be empty"));
        }
        if capacity.len() != days.len() {
            return Err(invalid(format!(
                "capacity table has {} day rows, expected {}",
                capacity.len(),
                days.len()
            )));
        }

        let mut seats = Vec::with_capacity(days.len());
        for (day, row) in capacity.iter().enumerate() {
            if row.len() != time_slots.len() {
                return Err(invalid(format!(
                    "capacity row for day '{}' has {} time slots, expected {}",
                    days[day],
                    row.len(),
                    time_slots.len()
                )));
            }
            let mut converted = Vec::with_capacity(row.len());
            for (time_slot, &count) in row.iter().enumerate() {
                if count < 0 {
                    return Err(invalid(format!(
                        "negative capacity {} at day '{}', time slot '{}'",
                        count, days[day], time_slots[time_slot]
                    )));
                }
                converted.push(count as usize);
            }
            seats.push(converted);
        }

        let mut seen = HashSet::new();
        for assistant in &assistants {
            if !seen.insert(assistant.id) {
                return Err(invalid(format!("duplicate assistant id {}", assistant.id)));
            }
            let shaped = assistant.availability.len() == time_slots.len()
                && assistant.availability.iter().all(|row| row.len() == days.len());
            if !shaped {
                return Err(invalid(format!(
                    "availability of assistant {} is not {} time slots by {} days",
                    assistant.id,
                    time_slots.len(),
                    days.len()
                )));
            }
        }

        let max_capacity = seats.iter().flatten().copied().max().unwrap_or(0);

        let mut occupied_cells = Vec::new();
        for (day, row) in seats.iter().enumerate() {
            for (time_slot, &count) in row.iter().enumerate() {
                for seat in 0..count {
                    occupied_cells.push(Cell::new(day, time_slot, seat));
                }
            }
        }

        // The swap neighbourhood needs at least two cells in distinct slot groups.
        if occupied_cells.len() < 2 {
            return Err(invalid("at least two seats must be required"));
        }
        let first_group = occupied_cells[0].group();
        if occupied_cells.iter().all(|cell| cell.group() == first_group) {
            return Err(invalid("all required seats fall into a single time slot"));
        }

        Ok(Self {
            days,
            time_slots,
            capacity: seats,
            max_capacity,
            occupied_cells,
            assistants,
        })
    }

    pub fn days(&self) -> &[String] {
        &self.days
    }

    pub fn time_slots(&self) -> &[String] {
        &self.time_slots
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn time_slot_count(&self) -> usize {
        self.time_slots.len()
    }

    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    pub fn capacity(&self, day: usize, time_slot: usize) -> usize {
        self.capacity[day][time_slot]
    }

    pub fn occupied_cells(&self) -> &[Cell] {
        &self.occupied_cells
    }

    pub fn assistants(&self) -> &[Assistant] {
        &self.assistants
    }

    /// Whether the cell must hold an assignment. Seats past a slot's required
    /// capacity are permanently unused.
    pub fn is_occupied(&self, cell: Cell) -> bool {
        cell.day < self.day_count()
            && cell.time_slot < self.time_slot_count()
            && cell.seat < self.capacity[cell.day][cell.time_slot]
    }

    /// Number of distinct (day, time slot) groups that contain required seats
    pub fn occupied_group_count(&self) -> usize {
        self.capacity.iter().flatten().filter(|&&count| count > 0).count()
    }
}

fn invalid(message: impl Into<String>) -> RosterError {
    RosterError::InvalidProblemDefinition(message.into())
}
