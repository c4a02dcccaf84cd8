use std::sync::Arc;
use rand::seq::{index, SliceRandom};
use rand::Rng;
use crate::error::{Result, RosterError};
use super::problem::ProblemDefinition;
use super::types::{AssistantId, Cell, Occupant};

/// Failed random draws per selected cell before the sampler switches to an
/// exhaustive search.
const DRAWS_PER_CELL: usize = 64;

/// Mutable (day, time slot, seat) grid of occupants.
///
/// Seats past a slot's required capacity are unused: reads return `None`
/// and writes are ignored.
#[derive(Debug, Clone)]
pub struct Roster {
    problem: Arc<ProblemDefinition>,
    grid: Vec<Occupant>,
}

impl Roster {
    /// Creates a roster with every occupied cell empty
    pub fn new(problem: Arc<ProblemDefinition>) -> Self {
        let size = problem.day_count() * problem.time_slot_count() * problem.max_capacity();
        Self {
            problem,
            grid: vec![Occupant::Empty; size],
        }
    }

    pub fn problem(&self) -> &Arc<ProblemDefinition> {
        &self.problem
    }

    fn index(&self, cell: Cell) -> usize {
        let seats = self.problem.max_capacity();
        (cell.day * self.problem.time_slot_count() + cell.time_slot) * seats + cell.seat
    }

    pub fn get(&self, cell: Cell) -> Option<Occupant> {
        if self.problem.is_occupied(cell) {
            Some(self.grid[self.index(cell)])
        } else {
            None
        }
    }

    pub fn set(&mut self, cell: Cell, occupant: Occupant) {
        debug_assert!(self.problem.is_occupied(cell), "write to unused cell {:?}", cell);
        if self.problem.is_occupied(cell) {
            let index = self.index(cell);
            self.grid[index] = occupant;
        }
    }

    pub fn clear(&mut self) {
        self.grid.iter_mut().for_each(|occupant| *occupant = Occupant::Empty);
    }

    /// All occupied cells with their current occupants, in (day, time slot, seat) order
    pub fn occupied(&self) -> impl Iterator<Item = (Cell, Occupant)> + '_ {
        self.problem
            .occupied_cells()
            .iter()
            .map(move |&cell| (cell, self.grid[self.index(cell)]))
    }

    /// Occupants of the required seats of one (day, time slot) group
    pub fn group(&self, day: usize, time_slot: usize) -> impl Iterator<Item = Occupant> + '_ {
        (0..self.problem.capacity(day, time_slot))
            .map(move |seat| self.grid[self.index(Cell::new(day, time_slot, seat))])
    }

    pub fn group_contains(&self, day: usize, time_slot: usize, id: AssistantId) -> bool {
        self.group(day, time_slot).any(|occupant| occupant == Occupant::Assigned(id))
    }

    pub fn count_assigned(&self, id: AssistantId) -> usize {
        self.occupied()
            .filter(|(_, occupant)| *occupant == Occupant::Assigned(id))
            .count()
    }

    pub fn empty_cells(&self) -> usize {
        self.occupied().filter(|(_, occupant)| occupant.is_empty()).count()
    }

    /// Rotates occupants along `cells`: each cell receives the next cell's
    /// occupant and the last cell receives the first's.
    pub fn rotate(&mut self, cells: &[Cell]) {
        let Some(&first) = cells.first() else {
            return;
        };
        let dummy = self.grid[self.index(first)];
        for pair in cells.windows(2) {
            let next = self.grid[self.index(pair[1])];
            self.set(pair[0], next);
        }
        self.set(cells[cells.len() - 1], dummy);
    }

    /// Draws `n` cells that can be rotated safely and rotates them in place.
    /// Returns the rotated cells in rotation order.
    pub fn cyclic_swap<R: Rng + ?Sized>(&mut self, n: usize, rng: &mut R) -> Result<Vec<Cell>> {
        let cells = self.random_elements(n, rng)?;
        self.rotate(&cells);
        Ok(cells)
    }

    /// Independent copy of this roster with one cyclic swap applied
    pub fn swapped_copy<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Roster> {
        let mut copy = self.clone();
        copy.cyclic_swap(n, rng)?;
        Ok(copy)
    }

    /// Selects `n` occupied cells in distinct slot groups whose occupants are
    /// mutually distinct and can move into each other's groups without
    /// creating a duplicate.
    ///
    /// Random samples are drawn until one is valid. Valid samples are common
    /// whenever the roster has several slot groups and a varied staff, so the
    /// draw loop normally ends after a few trials; if it keeps failing, a
    /// randomised exhaustive search either finds a selection or proves that
    /// none exists.
    pub fn random_elements<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Vec<Cell>> {
        let universe = self.problem.occupied_cells();
        if n < 2 || n > self.problem.occupied_group_count() {
            return Err(RosterError::NoValidSwap { arity: n });
        }

        for _ in 0..DRAWS_PER_CELL * n {
            let mut targets: Vec<Cell> = index::sample(rng, universe.len(), n)
                .into_iter()
                .map(|i| universe[i])
                .collect();
            if self.valid_target(&targets) {
                targets.shuffle(rng);
                return Ok(targets);
            }
        }

        self.search_valid_target(n, rng)
            .ok_or(RosterError::NoValidSwap { arity: n })
    }

    pub fn valid_target(&self, targets: &[Cell]) -> bool {
        if targets.is_empty() {
            return false;
        }
        targets.iter().enumerate().all(|(i, &a)| {
            targets[i + 1..].iter().all(|&b| self.compatible(a, b))
        })
    }

    fn compatible(&self, a: Cell, b: Cell) -> bool {
        if a.group() == b.group() {
            return false;
        }
        let (Some(occ_a), Some(occ_b)) = (self.get(a), self.get(b)) else {
            return false;
        };
        if occ_a == occ_b {
            return false;
        }
        let moves_in = |occupant: Occupant, target: Cell| match occupant {
            Occupant::Assigned(id) => !self.group_contains(target.day, target.time_slot, id),
            Occupant::Empty => true,
        };
        moves_in(occ_a, b) && moves_in(occ_b, a)
    }

    fn search_valid_target<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Option<Vec<Cell>> {
        let mut pool = self.problem.occupied_cells().to_vec();
        pool.shuffle(rng);
        let mut chosen = Vec::with_capacity(n);
        if self.extend_target(&pool, 0, n, &mut chosen) {
            chosen.shuffle(rng);
            Some(chosen)
        } else {
            None
        }
    }

    fn extend_target(&self, pool: &[Cell], start: usize, n: usize, chosen: &mut Vec<Cell>) -> bool {
        if chosen.len() == n {
            return true;
        }
        for i in start..pool.len() {
            let candidate = pool[i];
            if chosen.iter().all(|&c| self.compatible(c, candidate)) {
                chosen.push(candidate);
                if self.extend_target(pool, i + 1, n, chosen) {
                    return true;
                }
                chosen.pop();
            }
        }
        false
    }
}
