//! Assistant roster generation: randomised construction followed by
//! stochastic hill climbing over cyclic swaps.

pub mod config;
pub mod error;
pub mod schedule;
pub mod parser;
pub mod export;
pub mod display;
pub mod service;
pub mod web;

pub use config::SolverConfig;
pub use error::{Result, RosterError};
pub use export::TimetableExport;
pub use schedule::{build_timetable, improve, ProblemDefinition, Roster, Timetable};
