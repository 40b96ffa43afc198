//! Engine orchestration.
//!
//! Wires the analyzer, generator, and anchor builder together for one
//! sport/contest pair and runs them over a snapshot. Synchronous and
//! stateless across invocations: every run works on the snapshot it is
//! handed and returns a self-contained report.

pub mod anchor;
pub mod opportunity;
pub mod parlay;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use crate::config::AppConfig;
use crate::contest::{BankrollPlan, ContestConfig, ContestType};
use crate::correlation::CorrelationModel;
use crate::types::{PropEdgeError, Snapshot, Sport};

use anchor::{AnchorBuilder, AnchorSection};
use opportunity::{OneSidedMarket, Opportunity, OpportunityAnalyzer};
use parlay::{Parlay, ParlayGenerator};

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Everything one engine run produced, ready for the presentation
/// layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineReport {
    pub generated_at: DateTime<Utc>,
    pub sport: Sport,
    pub contest_type: ContestType,
    pub opportunities: Vec<Opportunity>,
    pub parlays: Vec<Parlay>,
    pub anchor_sections: Vec<AnchorSection>,
    pub one_sided: Vec<OneSidedMarket>,
    pub dropped_markets: u32,
    pub bankroll_plan: BankrollPlan,
}

impl fmt::Display for EngineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "=== {} {} report | {} opportunities | {} parlays | {} anchors ===",
            self.sport,
            self.contest_type,
            self.opportunities.len(),
            self.parlays.len(),
            self.anchor_sections.len(),
        )?;
        for parlay in &self.parlays {
            write!(f, "{parlay}")?;
        }
        for section in &self.anchor_sections {
            write!(f, "{section}")?;
        }
        if !self.one_sided.is_empty() {
            writeln!(f, "--- one-sided markets (report only) ---")?;
            for market in &self.one_sided {
                writeln!(f, "{market}")?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// One sport/contest engine instance. Construction picks the anchor
/// specialization: pitcher-anchored for MLB, passer-anchored for
/// football, none for WNBA.
pub struct Engine {
    sport: Sport,
    contest: ContestConfig,
    analyzer: OpportunityAnalyzer,
    generator: ParlayGenerator,
    anchor_builder: Option<AnchorBuilder>,
    bankroll: Decimal,
}

impl Engine {
    pub fn new(config: &AppConfig) -> Self {
        let sport = config.engine.sport;
        let contest = ContestConfig::standard(config.contest.contest_type);

        let analyzer = OpportunityAnalyzer::new(
            sport,
            contest.clone(),
            config.appeal.star_players.clone(),
        );
        let generator = ParlayGenerator::new(
            contest.clone(),
            CorrelationModel::for_sport(sport),
            config.generator.clone(),
        );
        let anchor_builder = match sport {
            Sport::Mlb => Some(AnchorBuilder::pitcher_anchored(contest.clone())),
            Sport::Nfl | Sport::Ncaaf => {
                Some(AnchorBuilder::passer_anchored(sport, contest.clone()))
            }
            Sport::Wnba => None,
        };

        info!(%sport, contest = %contest.contest_type, "Engine initialized");
        Self {
            sport,
            contest,
            analyzer,
            generator,
            anchor_builder,
            bankroll: config.contest.bankroll,
        }
    }

    pub fn contest(&self) -> &ContestConfig {
        &self.contest
    }

    /// Run the full pipeline over one snapshot.
    pub fn run(&self, snapshot: &Snapshot) -> Result<EngineReport, PropEdgeError> {
        info!(
            props = snapshot.props.len(),
            fetched_at = %snapshot.fetched_at,
            "Engine run starting"
        );

        let pool = self.analyzer.normalize(snapshot)?;
        info!(
            eligible = pool.eligible.len(),
            one_sided = pool.one_sided.len(),
            dropped = pool.dropped_markets,
            "Snapshot normalized"
        );

        let opportunities = self.analyzer.opportunities(&pool);
        let parlays = self.generator.generate(&pool.eligible);
        let anchor_sections = self
            .anchor_builder
            .as_ref()
            .map(|builder| builder.build_sections(&pool.eligible))
            .unwrap_or_default();

        Ok(EngineReport {
            generated_at: Utc::now(),
            sport: self.sport,
            contest_type: self.contest.contest_type,
            opportunities,
            parlays,
            anchor_sections,
            one_sided: pool.one_sided,
            dropped_markets: pool.dropped_markets,
            bankroll_plan: BankrollPlan::for_bankroll(self.bankroll),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn test_engine_anchor_specialization_by_sport() {
        let mut config = AppConfig::default();

        config.engine.sport = Sport::Mlb;
        assert!(Engine::new(&config).anchor_builder.is_some());

        config.engine.sport = Sport::Nfl;
        assert!(Engine::new(&config).anchor_builder.is_some());

        config.engine.sport = Sport::Wnba;
        assert!(Engine::new(&config).anchor_builder.is_none());
    }

    #[test]
    fn test_engine_run_on_empty_snapshot() {
        let engine = Engine::new(&AppConfig::default());
        let report = engine.run(&Snapshot::new(Vec::new())).unwrap();
        assert!(report.opportunities.is_empty());
        assert!(report.parlays.is_empty());
        assert!(report.anchor_sections.is_empty());
        assert_eq!(report.dropped_markets, 0);
    }
}
