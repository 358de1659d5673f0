//! Application configuration, loaded from environment variables.
//!
//! Follows a warn-and-default policy: a missing or unparsable variable
//! never aborts startup, it logs a warning and falls back to the default.

use std::env;

use crate::calculator::SolverStrategy;

/// Complete application configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub calculator: CalculatorConfig,
}

impl AppConfig {
    /// Creates a configuration from the currently available environment
    /// variables.
    pub fn from_env() -> Self {
        Self {
            catalog: CatalogConfig::from_env(),
            calculator: CalculatorConfig::from_env(),
        }
    }
}

/// Configuration for the pack size catalog.
#[derive(Clone, Debug)]
pub struct CatalogConfig {
    seed_sizes: Vec<u64>,
}

impl CatalogConfig {
    const SEED_SIZES_VAR: &'static str = "PACKWISE_PACK_SIZES";

    /// The stock catalog the service starts with when nothing is configured.
    pub const DEFAULT_SEED_SIZES: &'static [u64] = &[250, 500, 1000, 2000, 5000];

    fn from_env() -> Self {
        let seed_sizes = match env_string(Self::SEED_SIZES_VAR) {
            Some(raw) => match parse_size_list(&raw) {
                Ok(sizes) => sizes,
                Err(reason) => {
                    tracing::warn!(
                        value = %raw,
                        reason,
                        "could not parse {}; using the default catalog",
                        Self::SEED_SIZES_VAR
                    );
                    Self::DEFAULT_SEED_SIZES.to_vec()
                }
            },
            None => Self::DEFAULT_SEED_SIZES.to_vec(),
        };
        Self { seed_sizes }
    }

    /// The pack sizes to seed the catalog with.
    pub fn seed_sizes(&self) -> &[u64] {
        &self.seed_sizes
    }
}

/// Configuration for the calculation engine.
#[derive(Clone, Debug, Default)]
pub struct CalculatorConfig {
    strategy: SolverStrategy,
}

impl CalculatorConfig {
    const SOLVER_VAR: &'static str = "PACKWISE_SOLVER";

    fn from_env() -> Self {
        let strategy = match env_string(Self::SOLVER_VAR) {
            Some(raw) => match parse_strategy(&raw) {
                Some(strategy) => strategy,
                None => {
                    tracing::warn!(
                        value = %raw,
                        "could not interpret {}; using the automatic solver selection",
                        Self::SOLVER_VAR
                    );
                    SolverStrategy::Auto
                }
            },
            None => SolverStrategy::Auto,
        };
        Self { strategy }
    }

    /// The configured solver strategy.
    pub fn strategy(&self) -> SolverStrategy {
        self.strategy
    }
}

fn env_string(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_owned())
            }
        }
        Err(env::VarError::NotPresent) => None,
        Err(err) => {
            tracing::warn!("access to {} failed: {}; using default value", name, err);
            None
        }
    }
}

/// Parses a comma-separated list of strictly positive, distinct sizes.
fn parse_size_list(raw: &str) -> Result<Vec<u64>, &'static str> {
    let mut sizes = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let size: u64 = part.parse().map_err(|_| "not a positive integer")?;
        if size == 0 {
            return Err("pack sizes must be greater than 0");
        }
        if sizes.contains(&size) {
            return Err("pack sizes must be distinct");
        }
        sizes.push(size);
    }
    if sizes.is_empty() {
        return Err("list contains no sizes");
    }
    Ok(sizes)
}

fn parse_strategy(raw: &str) -> Option<SolverStrategy> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "auto" => Some(SolverStrategy::Auto),
        "table" => Some(SolverStrategy::TableOnly),
        "windowed" => Some(SolverStrategy::WindowedOnly),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_size_list() {
        assert_eq!(
            parse_size_list("250, 500,1000"),
            Ok(vec![250, 500, 1000])
        );
        assert_eq!(parse_size_list("23,31,53,"), Ok(vec![23, 31, 53]));
    }

    #[test]
    fn rejects_invalid_size_lists() {
        assert!(parse_size_list("250,abc").is_err());
        assert!(parse_size_list("0,250").is_err());
        assert!(parse_size_list("250,250").is_err());
        assert!(parse_size_list("").is_err());
        assert!(parse_size_list(" , ").is_err());
    }

    #[test]
    fn parses_solver_strategies() {
        assert_eq!(parse_strategy("auto"), Some(SolverStrategy::Auto));
        assert_eq!(parse_strategy(" Table "), Some(SolverStrategy::TableOnly));
        assert_eq!(parse_strategy("Windowed"), Some(SolverStrategy::WindowedOnly));
        assert_eq!(parse_strategy("fastest"), None);
        assert_eq!(parse_strategy(""), None);
    }
}
