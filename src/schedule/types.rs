use std::fmt;
use std::hash::{Hash, Hasher};
use serde::{Serialize, Deserialize};

/// Stable identity of an assistant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssistantId(pub u64);

impl fmt::Display for AssistantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content of an occupied cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occupant {
    Empty,
    Assigned(AssistantId),
}

impl Occupant {
    pub fn assistant(&self) -> Option<AssistantId> {
        match self {
            Occupant::Empty => None,
            Occupant::Assigned(id) => Some(*id),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Occupant::Empty)
    }
}

/// A (day, time slot, seat) coordinate in the roster grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    pub day: usize,
    pub time_slot: usize,
    pub seat: usize,
}

impl Cell {
    pub fn new(day: usize, time_slot: usize, seat: usize) -> Self {
        Self { day, time_slot, seat }
    }

    /// The (day, time slot) group this seat belongs to
    pub fn group(&self) -> (usize, usize) {
        (self.day, self.time_slot)
    }
}

/// One staff member with availability and hour quota
#[derive(Debug, Clone)]
pub struct Assistant {
    pub id: AssistantId,
    pub name: String,
    /// Rows are time slots, columns are days
    pub availability: Vec<Vec<bool>>,
    pub hour_quota: u32,
    /// Cells currently assigned to this assistant in the live roster
    pub rostered: u32,
}

impl Assistant {
    pub fn new(id: AssistantId, name: impl Into<String>, availability: Vec<Vec<bool>>, hour_quota: u32) -> Self {
        Self {
            id,
            name: name.into(),
            availability,
            hour_quota,
            rostered: 0,
        }
    }

    pub fn is_available(&self, day: usize, time_slot: usize) -> bool {
        self.availability
            .get(time_slot)
            .and_then(|row| row.get(day))
            .copied()
            .unwrap_or(false)
    }

    pub fn has_capacity(&self) -> bool {
        self.rostered < self.hour_quota
    }
}

impl PartialEq for Assistant {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Assistant {}

impl Hash for Assistant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Assistant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_assistant_identity_is_by_id() {
        let a = Assistant::new(AssistantId(1), "Ann", vec![vec![true]], 2);
        let mut b = Assistant::new(AssistantId(1), "Annie", vec![vec![false]], 5);
        b.rostered = 3;
        assert_eq!(a, b);

        let set: HashSet<Assistant> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_availability_lookup_is_slot_major() {
        // two time slots, three days
        let a = Assistant::new(
            AssistantId(1),
            "Ann",
            vec![vec![true, false, false], vec![false, false, true]],
            2,
        );
        assert!(a.is_available(0, 0));
        assert!(!a.is_available(1, 0));
        assert!(a.is_available(2, 1));
        assert!(!a.is_available(5, 5));
    }

    #[test]
    fn test_occupant_assistant() {
        assert_eq!(Occupant::Empty.assistant(), None);
        assert_eq!(Occupant::Assigned(AssistantId(4)).assistant(), Some(AssistantId(4)));
        assert!(Occupant::Empty.is_empty());
    }
}
