//! Solver configuration

use serde::{Deserialize, Serialize};
use rand::rngs::StdRng;
use rand::SeedableRng;
use crate::error::{Result, RosterError};
use crate::schedule::construction::DEFAULT_ITERATIONS;
use crate::schedule::hillclimber::{DEFAULT_ARITY, DEFAULT_SWAPS};

/// Budget used when a request does not name its own
pub const DEFAULT_REQUEST_SWAPS: u64 = 20000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Construction attempts before giving up
    pub construction_iterations: usize,
    /// Reject construction attempts that leave any cell empty
    pub perfect_fit: bool,
    /// Hill climber budget when none is passed explicitly
    pub default_swaps: u64,
    /// Budget for requests served by the CLI and HTTP entry points
    pub request_swaps: u64,
    /// Cells rotated per perturbation
    pub swap_arity: usize,
    /// Fixed seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            construction_iterations: DEFAULT_ITERATIONS,
            perfect_fit: true,
            default_swaps: DEFAULT_SWAPS,
            request_swaps: DEFAULT_REQUEST_SWAPS,
            swap_arity: DEFAULT_ARITY,
            seed: None,
        }
    }
}

impl SolverConfig {
    /// Defaults, then the JSON file named by `ROSTER_CONFIG`, then the other
    /// `ROSTER_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup("ROSTER_CONFIG") {
            Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
            None => Self::default(),
        };
        if let Some(value) = lookup("ROSTER_ITERATIONS") {
            config.construction_iterations = parse_var("ROSTER_ITERATIONS", &value)?;
        }
        if let Some(value) = lookup("ROSTER_PERFECT_FIT") {
            config.perfect_fit = parse_var("ROSTER_PERFECT_FIT", &value)?;
        }
        if let Some(value) = lookup("ROSTER_DEFAULT_SWAPS") {
            config.default_swaps = parse_var("ROSTER_DEFAULT_SWAPS", &value)?;
        }
        if let Some(value) = lookup("ROSTER_SWAPS") {
            config.request_swaps = parse_var("ROSTER_SWAPS", &value)?;
        }
        if let Some(value) = lookup("ROSTER_ARITY") {
            config.swap_arity = parse_var("ROSTER_ARITY", &value)?;
        }
        if let Some(value) = lookup("ROSTER_SEED") {
            config.seed = Some(parse_var("ROSTER_SEED", &value)?);
        }
        Ok(config)
    }

    /// Seeded generator when a seed is configured, entropy otherwise
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| RosterError::InvalidInput(format!("{} has an invalid value '{}'", key, value)))
}
