use std::collections::HashMap;
use std::path::Path;
use serde::{Serialize, Deserialize};
use crate::error::{Result, RosterError};
use crate::schedule::{Assistant, AssistantId, ProblemDefinition};

/// A JSON value that may arrive as a number, a numeric string or a boolean
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Bool(b) => Some(*b as i64),
            Scalar::Int(n) => Some(*n),
            Scalar::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            Scalar::Float(_) => None,
            Scalar::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Availability flag: true, a non-zero number, or their string forms
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            Scalar::Text(s) if s.trim().eq_ignore_ascii_case("true") => Some(true),
            Scalar::Text(s) if s.trim().eq_ignore_ascii_case("false") => Some(false),
            Scalar::Float(f) => Some(*f != 0.0),
            other => other.as_int().map(|n| n != 0),
        }
    }
}

/// One staff record of a request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffRecord {
    pub id: Scalar,
    pub name: String,
    /// slot -> day -> available
    pub schedule: HashMap<String, HashMap<String, Scalar>>,
    /// Hour quota
    pub periods: Scalar,
}

/// Axes and per-slot seat counts of a request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Days
    pub columns: Vec<String>,
    /// Time slots
    pub rows: Vec<String>,
    /// slot -> day -> required seats
    pub schedule: HashMap<String, HashMap<String, Scalar>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub staff: Vec<StaffRecord>,
    pub project: ProjectRecord,
    /// Evaluation budget override
    #[serde(default)]
    pub swaps: Option<u64>,
}

impl ScheduleRequest {
    /// Converts the request into a validated problem definition
    pub fn to_problem(&self) -> Result<ProblemDefinition> {
        let days = &self.project.columns;
        let slots = &self.project.rows;

        let mut capacity = Vec::with_capacity(days.len());
        for day in days {
            let mut row = Vec::with_capacity(slots.len());
            for slot in slots {
                let value = lookup(&self.project.schedule, slot, day, "project")?;
                let seats = value.as_int().ok_or_else(|| {
                    invalid(format!("project capacity at '{}' / '{}' is not a number", slot, day))
                })?;
                row.push(seats);
            }
            capacity.push(row);
        }

        let mut assistants = Vec::with_capacity(self.staff.len());
        for record in &self.staff {
            assistants.push(parse_staff(record, days, slots)?);
        }

        ProblemDefinition::new(days.clone(), slots.clone(), capacity, assistants)
    }
}

fn parse_staff(record: &StaffRecord, days: &[String], slots: &[String]) -> Result<Assistant> {
    let id = record
        .id
        .as_int()
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| invalid(format!("staff id of '{}' is not a non-negative integer", record.name)))?;
    let quota = record
        .periods
        .as_int()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| invalid(format!("periods of '{}' is not a non-negative integer", record.name)))?;

    let mut availability = Vec::with_capacity(slots.len());
    for slot in slots {
        let mut row = Vec::with_capacity(days.len());
        for day in days {
            let value = lookup(&record.schedule, slot, day, &record.name)?;
            let flag = value.as_flag().ok_or_else(|| {
                invalid(format!("availability of '{}' at '{}' / '{}' is not a flag", record.name, slot, day))
            })?;
            row.push(flag);
        }
        availability.push(row);
    }

    Ok(Assistant::new(AssistantId(id), record.name.clone(), availability, quota))
}

fn lookup<'a>(
    table: &'a HashMap<String, HashMap<String, Scalar>>,
    slot: &str,
    day: &str,
    owner: &str,
) -> Result<&'a Scalar> {
    table
        .get(slot)
        .and_then(|row| row.get(day))
        .ok_or_else(|| invalid(format!("schedule of '{}' has no entry for '{}' / '{}'", owner, slot, day)))
}

fn invalid(message: String) -> RosterError {
    RosterError::InvalidInput(message)
}

/// Parses a request body
pub fn parse_request(body: &str) -> Result<ScheduleRequest> {
    Ok(serde_json::from_str(body)?)
}

/// Loads a request from a JSON file
pub fn load_request<P: AsRef<Path>>(path: P) -> Result<ScheduleRequest> {
    let body = std::fs::read_to_string(path)?;
    parse_request(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUEST: &str = r#"{
        "staff": [
            {"id": 1, "name": "Ann", "periods": 2,
             "schedule": {"09:00": {"mon": 1, "tue": 0}, "10:00": {"mon": true, "tue": "1"}}},
            {"id": "2", "name": "Bob", "periods": "3",
             "schedule": {"09:00": {"mon": 0, "tue": 1}, "10:00": {"mon": false, "tue": 1}}}
        ],
        "project": {
            "columns": ["mon", "tue"],
            "rows": ["09:00", "10:00"],
            "schedule": {"09:00": {"mon": 1, "tue": "2"}, "10:00": {"mon": 1, "tue": 0}}
        },
        "swaps": 50
    }"#;

    #[test]
    fn test_parse_request() {
        let request = parse_request(REQUEST).unwrap();
        assert_eq!(request.swaps, Some(50));

        let problem = request.to_problem().unwrap();
        assert_eq!(problem.days(), ["mon", "tue"]);
        assert_eq!(problem.time_slots(), ["09:00", "10:00"]);
        assert_eq!(problem.capacity(1, 0), 2);
        assert_eq!(problem.capacity(1, 1), 0);
        assert_eq!(problem.occupied_cells().len(), 4);

        let ann = &problem.assistants()[0];
        assert_eq!(ann.id, AssistantId(1));
        assert_eq!(ann.hour_quota, 2);
        assert!(ann.is_available(0, 0));
        assert!(!ann.is_available(1, 0));
        assert!(ann.is_available(1, 1));

        let bob = &problem.assistants()[1];
        assert_eq!(bob.id, AssistantId(2));
        assert_eq!(bob.hour_quota, 3);
        assert!(!bob.is_available(0, 1));
    }

    #[test]
    fn test_swaps_are_optional() {
        let request: ScheduleRequest = serde_json::from_value(serde_json::json!({
            "staff": [],
            "project": {"columns": ["mon"], "rows": ["09:00"], "schedule": {"09:00": {"mon": 1}}}
        }))
        .unwrap();
        assert_eq!(request.swaps, None);
    }

    #[test]
    fn test_missing_capacity_entry() {
        let mut request = parse_request(REQUEST).unwrap();
        request.project.schedule.get_mut("10:00").unwrap().remove("tue");
        assert!(matches!(request.to_problem(), Err(RosterError::InvalidInput(_))));
    }

    #[test]
    fn test_non_numeric_quota() {
        let mut request = parse_request(REQUEST).unwrap();
        request.staff[0].periods = Scalar::Text("many".to_string());
        assert!(matches!(request.to_problem(), Err(RosterError::InvalidInput(_))));
    }

    #[test]
    fn test_negative_capacity_reaches_problem_validation() {
        let mut request = parse_request(REQUEST).unwrap();
        request.project.schedule.get_mut("09:00").unwrap().insert("mon".to_string(), Scalar::Int(-1));
        assert!(matches!(request.to_problem(), Err(RosterError::InvalidProblemDefinition(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(parse_request("{\"staff\": 3}"), Err(RosterError::Json(_))));
    }

    #[test]
    fn test_flags() {
        assert_eq!(Scalar::Int(2).as_flag(), Some(true));
        assert_eq!(Scalar::Text("0".to_string()).as_flag(), Some(false));
        assert_eq!(Scalar::Text("TRUE".to_string()).as_flag(), Some(true));
        assert_eq!(Scalar::Text("maybe".to_string()).as_flag(), None);
        assert_eq!(Scalar::Float(2.0).as_int(), Some(2));
        assert_eq!(Scalar::Float(2.5).as_int(), None);
    }
}
