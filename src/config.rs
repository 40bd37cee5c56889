use log::warn;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::solver::SolverOptions;
use crate::domain::solver_factory::SolverType;

const DEFAULT_PORT: u16 = 9000;
const DEFAULT_JSON_PAYLOAD_LIMIT: usize = 2 * 1024 * 1024; // 2 MB
const DEFAULT_SOLVE_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CACHE_SIZE: usize = 128;
const FALLBACK_MAX_CONCURRENT_SOLVES: usize = 4;

/// Service settings, read from the environment (after `.env` is loaded).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub json_limit: usize,
    pub solver: SolverType,
    pub solve_timeout_secs: u64,
    pub cache_size: usize,
    /// Solves allowed on the blocking pool at once; at least 1.
    pub max_concurrent_solves: usize,
    pub sentry_dsn: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: DEFAULT_PORT,
            json_limit: DEFAULT_JSON_PAYLOAD_LIMIT,
            solver: SolverType::Glpk,
            solve_timeout_secs: DEFAULT_SOLVE_TIMEOUT_SECS,
            cache_size: DEFAULT_CACHE_SIZE,
            max_concurrent_solves: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(FALLBACK_MAX_CONCURRENT_SOLVES),
            sentry_dsn: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup. Malformed values fall back to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Config::default();

        let solver = match lookup("SOLVER") {
            Some(name) => SolverType::from_str(&name).unwrap_or_else(|| {
                warn!("Unknown SOLVER '{}', falling back to {:?}", name, defaults.solver);
                defaults.solver
            }),
            None => defaults.solver,
        };

        Config {
            port: parsed(&lookup, "PORT", defaults.port),
            json_limit: parsed(&lookup, "JSON_PAYLOAD_LIMIT", defaults.json_limit),
            solver,
            solve_timeout_secs: parsed(&lookup, "SOLVE_TIMEOUT_SECS", defaults.solve_timeout_secs),
            cache_size: parsed(&lookup, "SCHEDULE_CACHE_SIZE", defaults.cache_size),
            max_concurrent_solves: parsed(
                &lookup,
                "MAX_CONCURRENT_SOLVES",
                defaults.max_concurrent_solves,
            )
            .max(1),
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.trim().is_empty()),
        }
    }

    pub fn solve_timeout(&self) -> Duration {
        Duration::from_secs(self.solve_timeout_secs)
    }

    pub fn solver_options(&self) -> SolverOptions {
        SolverOptions {
            time_limit_secs: Some(self.solve_timeout_secs),
        }
    }
}

fn parsed<T: FromStr + std::fmt::Display + Copy>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!("Ignoring malformed {}='{}', using {}", key, raw, default);
            default
        }),
        None => default,
    }
}
