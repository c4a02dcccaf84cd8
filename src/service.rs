use std::sync::Arc;
use tracing::info;
use crate::config::SolverConfig;
use crate::error::Result;
use crate::export::TimetableExport;
use crate::parser::ScheduleRequest;
use crate::schedule::{build_timetable_with, improve_with};

/// Builds and improves a roster for one request.
///
/// The budget is the request's `swaps` when given, otherwise the configured
/// `request_swaps`.
pub fn solve_request(request: &ScheduleRequest, config: &SolverConfig) -> Result<TimetableExport> {
    let problem = Arc::new(request.to_problem()?);
    let budget = request.swaps.unwrap_or(config.request_swaps);
    info!(
        assistants = problem.assistants().len(),
        cells = problem.occupied_cells().len(),
        budget,
        "Solving schedule request"
    );

    let mut rng = config.rng();
    let timetable = build_timetable_with(problem, config, &mut rng)?;
    let timetable = improve_with(timetable, budget, config, &mut rng)?;
    Ok(TimetableExport::from_timetable(&timetable))
}
