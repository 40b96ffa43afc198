//! Configuration loading from TOML.
//!
//! Reads `config.toml` into strongly-typed sections. Every field has a
//! sensible default, so the engine runs with no config file at all;
//! a present-but-broken file is an error rather than a silent default.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::contest::ContestType;
use crate::engine::parlay::GeneratorConfig;
use crate::types::Sport;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineSettings,
    pub contest: ContestSettings,
    pub generator: GeneratorConfig,
    pub appeal: AppealSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub sport: Sport,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self { sport: Sport::Mlb }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContestSettings {
    pub contest_type: ContestType,
    /// Nominal bankroll for stake sizing and plan selection.
    pub bankroll: Decimal,
}

impl Default for ContestSettings {
    fn default() -> Self {
        Self {
            contest_type: ContestType::TwoMan,
            bankroll: dec!(60),
        }
    }
}

/// Public-appeal inputs for the opportunity analyzer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppealSettings {
    /// Names the casual public recognizes; their props demand extra
    /// edge before qualifying.
    pub star_players: Vec<String>,
}

impl AppConfig {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Load from `path` when present, otherwise fall back to defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            info!(%path, "No config file found, using defaults");
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.engine.sport, Sport::Mlb);
        assert_eq!(config.contest.contest_type, ContestType::TwoMan);
        assert_eq!(config.contest.bankroll, dec!(60));
        assert_eq!(config.generator.min_leg_probability, dec!(0.50));
        assert!(config.appeal.star_players.is_empty());
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml = r#"
            [engine]
            sport = "nfl"

            [contest]
            contest_type = "3-man"
            bankroll = 250

            [appeal]
            star_players = ["Patrick Mahomes"]
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.engine.sport, Sport::Nfl);
        assert_eq!(config.contest.contest_type, ContestType::ThreeMan);
        assert_eq!(config.contest.bankroll, dec!(250));
        assert_eq!(config.appeal.star_players, vec!["Patrick Mahomes"]);
        // Unspecified sections keep their defaults
        assert_eq!(config.generator.max_results, 50);
    }

    #[test]
    fn test_parse_generator_overrides() {
        let toml = r#"
            [generator]
            min_leg_probability = 0.55
            max_results = 10
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.generator.min_leg_probability, dec!(0.55));
        assert_eq!(config.generator.max_results, 10);
        assert_eq!(config.generator.max_props_per_game, 10);
    }
}
