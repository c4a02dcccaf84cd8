use std::collections::BTreeMap;
use std::sync::Arc;
use serde::Serialize;
use super::problem::ProblemDefinition;
use super::roster::Roster;
use super::score::calculate;
use super::types::{Assistant, AssistantId, Cell, Occupant};

/// Snapshot taken whenever the search accepts a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EvaluationRecord {
    pub evaluations: u64,
    pub score: i64,
    pub best: i64,
}

/// Owns the live roster of one optimisation run together with a private copy
/// of the assistants and the evaluation bookkeeping.
///
/// Scoring goes through the timetable so every evaluation is counted; the
/// roster itself holds no reference back to its owner.
#[derive(Debug, Clone)]
pub struct Timetable {
    problem: Arc<ProblemDefinition>,
    roster: Roster,
    assistants: BTreeMap<AssistantId, Assistant>,
    evaluations: u64,
    best: Option<i64>,
    history: Vec<EvaluationRecord>,
}

impl Timetable {
    /// Creates a timetable with an empty roster
    pub fn new(problem: Arc<ProblemDefinition>) -> Self {
        Self::from_roster(Roster::new(problem))
    }

    /// Creates a timetable around an existing roster, sharing its problem
    pub fn from_roster(roster: Roster) -> Self {
        let problem = roster.problem().clone();
        let assistants = problem
            .assistants()
            .iter()
            .map(|assistant| {
                let mut assistant = assistant.clone();
                assistant.rostered = 0;
                (assistant.id, assistant)
            })
            .collect();
        let mut timetable = Self {
            problem,
            roster,
            assistants,
            evaluations: 0,
            best: None,
            history: Vec::new(),
        };
        timetable.recount();
        timetable
    }

    pub fn problem(&self) -> &Arc<ProblemDefinition> {
        &self.problem
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn assistants(&self) -> &BTreeMap<AssistantId, Assistant> {
        &self.assistants
    }

    pub fn assistant(&self, id: AssistantId) -> Option<&Assistant> {
        self.assistants.get(&id)
    }

    /// Ids in a stable order, used as the candidate list for construction
    pub fn assistant_ids(&self) -> Vec<AssistantId> {
        self.assistants.keys().copied().collect()
    }

    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Best score observed since the last reset
    pub fn best(&self) -> Option<i64> {
        self.best
    }

    pub fn history(&self) -> &[EvaluationRecord] {
        &self.history
    }

    /// Clears the roster, the hour counters, the best score and the history.
    /// The evaluation counter keeps running.
    pub fn reset(&mut self) {
        self.roster.clear();
        self.assistants.values_mut().for_each(|assistant| assistant.rostered = 0);
        self.best = None;
        self.history.clear();
    }

    /// Whether `id` may take another cell in the given slot group
    pub fn can_assign(&self, id: AssistantId, day: usize, time_slot: usize) -> bool {
        self.assistants
            .get(&id)
            .is_some_and(|assistant| assistant.has_capacity())
            && !self.roster.group_contains(day, time_slot, id)
    }

    /// Places `id` in `cell`, keeping the hour counters in step with the roster
    pub fn assign(&mut self, cell: Cell, id: AssistantId) {
        if let Some(previous) = self.roster.get(cell).and_then(|occupant| occupant.assistant()) {
            if let Some(assistant) = self.assistants.get_mut(&previous) {
                assistant.rostered = assistant.rostered.saturating_sub(1);
            }
        }
        self.roster.set(cell, Occupant::Assigned(id));
        if let Some(assistant) = self.assistants.get_mut(&id) {
            assistant.rostered += 1;
        }
    }

    /// Replaces the live roster and recounts every assistant's hours from it
    pub fn adopt_roster(&mut self, roster: Roster) {
        debug_assert!(
            Arc::ptr_eq(&self.problem, roster.problem()),
            "roster belongs to a different problem"
        );
        self.roster = roster;
        self.recount();
    }

    /// Replaces the live roster with a swapped copy of itself. Hour counters
    /// are left untouched: a swap never changes anyone's cell count.
    pub fn adopt_swapped(&mut self, roster: Roster) {
        debug_assert!(Arc::ptr_eq(&self.problem, roster.problem()));
        self.roster = roster;
    }

    fn recount(&mut self) {
        let mut counts: BTreeMap<AssistantId, u32> = BTreeMap::new();
        for (_, occupant) in self.roster.occupied() {
            if let Some(id) = occupant.assistant() {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
        for (id, assistant) in self.assistants.iter_mut() {
            assistant.rostered = counts.get(id).copied().unwrap_or(0);
        }
    }

    /// Scores the live roster, counting one evaluation
    pub fn score(&mut self) -> i64 {
        let score = calculate(&self.roster, &self.assistants);
        self.record_evaluation(score);
        score
    }

    /// Scores a candidate roster against this timetable's assistants,
    /// counting one evaluation
    pub fn evaluate(&mut self, roster: &Roster) -> i64 {
        let score = calculate(roster, &self.assistants);
        self.record_evaluation(score);
        score
    }

    fn record_evaluation(&mut self, score: i64) {
        self.evaluations += 1;
        if self.best.map_or(true, |best| score > best) {
            self.best = Some(score);
        }
    }

    /// Appends the current counters to the history
    pub fn record_step(&mut self, score: i64) {
        self.history.push(EvaluationRecord {
            evaluations: self.evaluations,
            score,
            best: self.best.unwrap_or(score),
        });
    }

    /// Independent exploration copy: roster, assistants and counters are all
    /// duplicated, the problem definition is shared.
    pub fn deep_copy(&self) -> Timetable {
        let mut copy = Timetable::from_roster(self.roster.clone());
        copy.evaluations = self.evaluations;
        copy.best = self.best;
        copy.history = self.history.clone();
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn problem() -> Arc<ProblemDefinition> {
        let staff = (1..=3)
            .map(|id| Assistant::new(AssistantId(id), format!("a{}", id), vec![vec![true]; 3], 2))
            .collect();
        Arc::new(
            ProblemDefinition::new(
                vec!["mon".to_string()],
                vec!["t0".to_string(), "t1".to_string(), "t2".to_string()],
                vec![vec![1, 2, 1]],
                staff,
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_assign_tracks_hours() {
        let mut timetable = Timetable::new(problem());
        timetable.assign(Cell::new(0, 0, 0), AssistantId(1));
        timetable.assign(Cell::new(0, 1, 0), AssistantId(1));
        assert_eq!(timetable.assistant(AssistantId(1)).unwrap().rostered, 2);
        assert!(!timetable.can_assign(AssistantId(1), 0, 2));

        // overwriting releases the previous occupant
        timetable.assign(Cell::new(0, 1, 0), AssistantId(2));
        assert_eq!(timetable.assistant(AssistantId(1)).unwrap().rostered, 1);
        assert_eq!(timetable.assistant(AssistantId(2)).unwrap().rostered, 1);
        assert!(!timetable.can_assign(AssistantId(2), 0, 1));
        assert!(timetable.can_assign(AssistantId(3), 0, 1));
    }

    #[test]
    fn test_scoring_counts_evaluations_and_best() {
        let mut timetable = Timetable::new(problem());
        assert_eq!(timetable.best(), None);
        let first = timetable.score();
        let second = timetable.score();
        assert_eq!(first, second);
        assert_eq!(timetable.evaluations(), 2);
        assert_eq!(timetable.best(), Some(first));
    }

    #[test]
    fn test_reset_clears_roster_and_counters() {
        let mut timetable = Timetable::new(problem());
        timetable.assign(Cell::new(0, 0, 0), AssistantId(1));
        timetable.score();
        timetable.reset();

        assert_eq!(timetable.roster().empty_cells(), 4);
        assert!(timetable.assistants().values().all(|a| a.rostered == 0));
        assert_eq!(timetable.best(), None);
        assert_eq!(timetable.evaluations(), 1);
    }

    #[test]
    fn test_adoption_recounts_hours() {
        let problem = problem();
        let mut roster = Roster::new(problem.clone());
        roster.set(Cell::new(0, 0, 0), Occupant::Assigned(AssistantId(3)));
        roster.set(Cell::new(0, 2, 0), Occupant::Assigned(AssistantId(3)));

        let mut timetable = Timetable::new(problem);
        timetable.adopt_roster(roster);
        assert_eq!(timetable.assistant(AssistantId(3)).unwrap().rostered, 2);
        assert_eq!(timetable.assistant(AssistantId(1)).unwrap().rostered, 0);
    }

    #[test]
    fn test_from_roster_shares_the_roster_problem() {
        let problem = problem();
        let mut roster = Roster::new(problem.clone());
        roster.set(Cell::new(0, 1, 1), Occupant::Assigned(AssistantId(2)));

        let timetable = Timetable::from_roster(roster);
        assert!(Arc::ptr_eq(timetable.problem(), &problem));
        assert!(Arc::ptr_eq(timetable.problem(), timetable.roster().problem()));
        assert_eq!(timetable.assistant(AssistantId(2)).unwrap().rostered, 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "different problem")]
    fn test_adopting_a_foreign_roster_panics() {
        let mut timetable = Timetable::new(problem());
        timetable.adopt_roster(Roster::new(problem()));
    }

    #[test]
    fn test_swapped_adoption_keeps_hours_in_step() {
        let mut timetable = Timetable::new(problem());
        timetable.assign(Cell::new(0, 0, 0), AssistantId(1));
        timetable.assign(Cell::new(0, 1, 0), AssistantId(2));
        timetable.assign(Cell::new(0, 1, 1), AssistantId(3));
        timetable.assign(Cell::new(0, 2, 0), AssistantId(1));

        let mut rng = StdRng::seed_from_u64(6);
        let swapped = timetable.roster().swapped_copy(2, &mut rng).unwrap();
        timetable.adopt_swapped(swapped);
        for assistant in timetable.assistants().values() {
            assert_eq!(assistant.rostered as usize, timetable.roster().count_assigned(assistant.id));
        }
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let mut timetable = Timetable::new(problem());
        timetable.assign(Cell::new(0, 0, 0), AssistantId(1));
        timetable.assign(Cell::new(0, 1, 0), AssistantId(2));
        timetable.assign(Cell::new(0, 1, 1), AssistantId(3));
        timetable.assign(Cell::new(0, 2, 0), AssistantId(2));

        let mut copy = timetable.deep_copy();
        assert_eq!(copy.score(), timetable.score());

        copy.assign(Cell::new(0, 0, 0), AssistantId(3));
        let original = timetable.score();
        assert_eq!(timetable.roster().get(Cell::new(0, 0, 0)), Some(Occupant::Assigned(AssistantId(1))));
        assert_eq!(timetable.assistant(AssistantId(1)).unwrap().rostered, 1);
        assert_ne!(copy.score(), original);
    }
}
