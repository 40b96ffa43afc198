//! Anchor-grouped correlation views.
//!
//! Instead of closed parlays, this builder presents every
//! anchor-eligible leg (pitcher markets for baseball, QB passer markets
//! for football) with the correlated secondary legs available in the
//! same game, grouped by recommended market/side and ranked for manual
//! pick-and-choose. Combination validity is only enforced when a
//! human's selection is assembled via [`AnchorBuilder::assemble`].

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::info;

use crate::contest::{ContestConfig, ContestEvaluation};
use crate::correlation::{describe, CorrelationModel};
use crate::markets::MarketType;
use crate::types::{PositionTier, Prop, PropEdgeError, Side, Sport};

// ---------------------------------------------------------------------------
// Output structures
// ---------------------------------------------------------------------------

/// A secondary leg scored against its anchor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedLeg {
    pub prop: Prop,
    pub correlation: Decimal,
}

/// All available legs for one correlated market/side recommendation,
/// best EV first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelatedGroup {
    pub market: MarketType,
    pub side: Side,
    pub strength: Decimal,
    pub tier: Option<PositionTier>,
    pub legs: Vec<RankedLeg>,
}

/// One anchor leg with its correlated-market groups, strongest
/// relationship first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorSection {
    pub anchor: Prop,
    pub priority: Decimal,
    pub groups: Vec<CorrelatedGroup>,
}

impl fmt::Display for AnchorSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ANCHOR: {}", self.anchor)?;
        for group in &self.groups {
            let tier = match group.tier {
                Some(tier) => format!(" [{tier}]"),
                None => String::new(),
            };
            writeln!(
                f,
                "  {} {}{} ({:.2}, {})",
                group.market,
                group.side,
                tier,
                group.strength,
                describe(group.strength),
            )?;
            for leg in &group.legs {
                writeln!(f, "    {}", leg.prop)?;
            }
        }
        Ok(())
    }
}

/// One pair's correlation inside an assembled selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairCorrelation {
    pub player_a: String,
    pub player_b: String,
    pub score: Decimal,
    pub label: String,
}

/// A human-selected leg set, validated and evaluated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedParlay {
    pub legs: Vec<Prop>,
    pub combined_probability: Decimal,
    pub evaluation: ContestEvaluation,
    pub pair_correlations: Vec<PairCorrelation>,
    pub avg_correlation: Decimal,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// What counts as an anchor leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnchorMode {
    Pitcher,
    Passer,
}

/// Groups correlated secondary legs under each anchor for one sport.
pub struct AnchorBuilder {
    model: CorrelationModel,
    contest: ContestConfig,
    mode: AnchorMode,
}

// Earned runs backtest cleanest against the de-vigged lines, so ER
// anchors jump the queue.
const PRIORITY_MARKET: MarketType = MarketType::PitcherEarnedRuns;
const PRIORITY_BONUS: Decimal = dec!(10);

impl AnchorBuilder {
    /// Baseball: pitcher markets anchor, batter markets follow.
    pub fn pitcher_anchored(contest: ContestConfig) -> Self {
        Self {
            model: CorrelationModel::for_sport(Sport::Mlb),
            contest,
            mode: AnchorMode::Pitcher,
        }
    }

    /// Football: QB passer markets anchor, receiver markets follow.
    /// NFL and NCAAF share the matrix; `sport` picks which pool the
    /// builder is labeled for.
    pub fn passer_anchored(sport: Sport, contest: ContestConfig) -> Self {
        debug_assert!(sport.is_football());
        Self {
            model: CorrelationModel::for_sport(sport),
            contest,
            mode: AnchorMode::Passer,
        }
    }

    fn is_anchor(&self, prop: &Prop) -> bool {
        match self.mode {
            AnchorMode::Pitcher => prop.market.is_pitcher(),
            AnchorMode::Passer => {
                prop.market.is_passer() && prop.position == Some(PositionTier::QB)
            }
        }
    }

    /// Build anchor sections from the eligible pool, highest-priority
    /// anchor first.
    pub fn build_sections(&self, pool: &[Prop]) -> Vec<AnchorSection> {
        let mut sections: Vec<AnchorSection> = pool
            .iter()
            .filter(|prop| self.is_anchor(prop))
            .map(|anchor| self.section_for(anchor, pool))
            .collect();
        sections.sort_by(|a, b| b.priority.cmp(&a.priority));
        info!(
            mode = ?self.mode,
            anchors = sections.len(),
            "Anchor sections built"
        );
        sections
    }

    fn section_for(&self, anchor: &Prop, pool: &[Prop]) -> AnchorSection {
        let mut groups = Vec::new();
        for cm in self.model.correlated_markets(anchor.market, anchor.side) {
            let mut legs: Vec<RankedLeg> = pool
                .iter()
                .filter(|p| {
                    p.same_game(anchor)
                        && !p.same_player(anchor)
                        && p.market == cm.market
                        && p.side == cm.side
                        && (cm.tier.is_none() || p.position == cm.tier)
                })
                .map(|p| RankedLeg {
                    prop: p.clone(),
                    correlation: self.model.score(anchor, p),
                })
                .collect();
            if legs.is_empty() {
                continue;
            }
            legs.sort_by(|a, b| b.prop.ev_percent.cmp(&a.prop.ev_percent));
            groups.push(CorrelatedGroup {
                market: cm.market,
                side: cm.side,
                strength: cm.strength,
                tier: cm.tier,
                legs,
            });
        }
        groups.sort_by(|a, b| b.strength.abs().cmp(&a.strength.abs()));

        let mut priority = anchor.ev_percent;
        if anchor.market == PRIORITY_MARKET {
            priority += PRIORITY_BONUS;
        }
        AnchorSection {
            anchor: anchor.clone(),
            priority,
            groups,
        }
    }

    /// Validate and evaluate a manually selected leg set.
    ///
    /// Rejects duplicate players and selections drawn entirely from one
    /// team's props — both broken selections, not market conditions.
    pub fn assemble(&self, legs: Vec<Prop>) -> Result<SelectedParlay, PropEdgeError> {
        if legs.len() < 2 {
            return Err(PropEdgeError::InvalidSelection(
                "A selection needs at least two legs".to_string(),
            ));
        }

        let mut players = HashSet::new();
        for leg in &legs {
            if !players.insert(leg.normalized_name.as_str()) {
                return Err(PropEdgeError::InvalidSelection(format!(
                    "Player {} appears on more than one leg",
                    leg.player_name
                )));
            }
        }

        let teams: HashSet<&str> = legs
            .iter()
            .filter_map(|leg| leg.team.as_deref())
            .collect();
        if teams.len() < 2 {
            return Err(PropEdgeError::InvalidSelection(
                "Legs must span at least two teams".to_string(),
            ));
        }

        let mut combined = Decimal::ONE;
        for leg in &legs {
            combined *= leg.true_probability;
        }

        let mut pair_correlations = Vec::new();
        let mut score_sum = Decimal::ZERO;
        for (i, a) in legs.iter().enumerate() {
            for b in &legs[i + 1..] {
                let score = self.model.score(a, b);
                score_sum += score;
                pair_correlations.push(PairCorrelation {
                    player_a: a.player_name.clone(),
                    player_b: b.player_name.clone(),
                    score,
                    label: describe(score).to_string(),
                });
            }
        }
        let avg_correlation = if pair_correlations.is_empty() {
            Decimal::ZERO
        } else {
            score_sum / Decimal::from(pair_correlations.len() as u32)
        };

        Ok(SelectedParlay {
            evaluation: self.contest.evaluate(combined),
            legs,
            combined_probability: combined,
            pair_correlations,
            avg_correlation,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contest::ContestType;

    fn mlb_prop(name: &str, market: MarketType, side: Side, team: &str, ev: Decimal) -> Prop {
        Prop {
            player_name: name.to_string(),
            normalized_name: name.to_lowercase().replace(' ', "_"),
            market,
            line: dec!(5.5),
            side,
            true_probability: dec!(0.60),
            ev_percent: ev,
            home: "Yankees".to_string(),
            away: "Red Sox".to_string(),
            sport: Sport::Mlb,
            team: Some(team.to_string()),
            book_count: 5,
            position: None,
        }
    }

    fn football_prop(
        name: &str,
        market: MarketType,
        side: Side,
        tier: PositionTier,
        ev: Decimal,
    ) -> Prop {
        Prop {
            player_name: name.to_string(),
            normalized_name: name.to_lowercase().replace(' ', "_"),
            market,
            line: dec!(250.5),
            side,
            true_probability: dec!(0.58),
            ev_percent: ev,
            home: "Chiefs".to_string(),
            away: "Bills".to_string(),
            sport: Sport::Nfl,
            team: Some("Chiefs".to_string()),
            book_count: 4,
            position: Some(tier),
        }
    }

    fn builder() -> AnchorBuilder {
        AnchorBuilder::pitcher_anchored(ContestConfig::standard(ContestType::ThreeMan))
    }

    #[test]
    fn test_pitcher_sections_group_opposing_batters() {
        let pool = vec![
            mlb_prop("Gerrit Cole", MarketType::PitcherStrikeouts, Side::Over, "Yankees", dec!(4.0)),
            mlb_prop("Rafael Devers", MarketType::BatterHits, Side::Under, "Red Sox", dec!(2.0)),
            mlb_prop("Alex Bregman", MarketType::BatterHits, Side::Under, "Red Sox", dec!(3.0)),
            // Wrong side for a negative rule: must not appear
            mlb_prop("Trevor Story", MarketType::BatterHits, Side::Over, "Red Sox", dec!(5.0)),
        ];
        let sections = builder().build_sections(&pool);
        assert_eq!(sections.len(), 1);
        let section = &sections[0];
        assert_eq!(section.anchor.player_name, "Gerrit Cole");

        let hits_group = section
            .groups
            .iter()
            .find(|g| g.market == MarketType::BatterHits)
            .unwrap();
        assert_eq!(hits_group.side, Side::Under);
        assert_eq!(hits_group.legs.len(), 2);
        // Ranked by EV descending
        assert_eq!(hits_group.legs[0].prop.player_name, "Alex Bregman");
        assert_eq!(hits_group.legs[1].prop.player_name, "Rafael Devers");
        for leg in &hits_group.legs {
            assert_eq!(leg.correlation, dec!(-0.7));
        }
    }

    #[test]
    fn test_groups_sorted_by_strength_magnitude() {
        let pool = vec![
            mlb_prop("Gerrit Cole", MarketType::PitcherStrikeouts, Side::Over, "Yankees", dec!(4.0)),
            mlb_prop("Rafael Devers", MarketType::BatterHits, Side::Under, "Red Sox", dec!(2.0)),
            mlb_prop("Alex Bregman", MarketType::BatterSingles, Side::Under, "Red Sox", dec!(2.0)),
        ];
        let sections = builder().build_sections(&pool);
        let groups = &sections[0].groups;
        assert_eq!(groups.len(), 2);
        // Strong (hits, 0.7) before moderate (singles, 0.4)
        assert_eq!(groups[0].market, MarketType::BatterHits);
        assert_eq!(groups[1].market, MarketType::BatterSingles);
    }

    #[test]
    fn test_earned_runs_anchor_gets_priority_bonus() {
        let pool = vec![
            mlb_prop("Gerrit Cole", MarketType::PitcherStrikeouts, Side::Over, "Yankees", dec!(8.0)),
            mlb_prop("Carlos Rodon", MarketType::PitcherEarnedRuns, Side::Under, "Yankees", dec!(1.0)),
        ];
        let sections = builder().build_sections(&pool);
        assert_eq!(sections.len(), 2);
        // 1.0 + 10 bonus outranks 8.0
        assert_eq!(sections[0].anchor.player_name, "Carlos Rodon");
        assert_eq!(sections[0].priority, dec!(11.0));
        assert_eq!(sections[1].priority, dec!(8.0));
    }

    #[test]
    fn test_passer_sections_filter_by_tier() {
        let contest = ContestConfig::standard(ContestType::TwoMan);
        let builder = AnchorBuilder::passer_anchored(Sport::Nfl, contest);
        let pool = vec![
            football_prop("Patrick Mahomes", MarketType::PlayerPassYds, Side::Over, PositionTier::QB, dec!(5.0)),
            football_prop("Rashee Rice", MarketType::PlayerReceptionYds, Side::Over, PositionTier::WR1, dec!(3.0)),
            football_prop("Travis Kelce", MarketType::PlayerReceptionYds, Side::Over, PositionTier::TE, dec!(2.0)),
            // Receiver prop on a non-anchor player position is fine, but
            // a non-QB passer prop must not anchor
            football_prop("Backup Guy", MarketType::PlayerPassYds, Side::Over, PositionTier::RB, dec!(9.0)),
        ];
        let sections = builder.build_sections(&pool);
        assert_eq!(sections.len(), 1);
        let section = &sections[0];
        assert_eq!(section.anchor.player_name, "Patrick Mahomes");

        let wr1 = section
            .groups
            .iter()
            .find(|g| g.tier == Some(PositionTier::WR1))
            .unwrap();
        assert_eq!(wr1.legs.len(), 1);
        assert_eq!(wr1.legs[0].prop.player_name, "Rashee Rice");
        assert_eq!(wr1.legs[0].correlation, dec!(0.70));

        let te = section
            .groups
            .iter()
            .find(|g| g.tier == Some(PositionTier::TE))
            .unwrap();
        assert_eq!(te.legs[0].prop.player_name, "Travis Kelce");
    }

    #[test]
    fn test_assemble_rejects_duplicate_players() {
        let legs = vec![
            mlb_prop("Aaron Judge", MarketType::BatterHits, Side::Over, "Yankees", dec!(2.0)),
            mlb_prop("Aaron Judge", MarketType::BatterTotalBases, Side::Over, "Yankees", dec!(2.0)),
        ];
        assert!(matches!(
            builder().assemble(legs),
            Err(PropEdgeError::InvalidSelection(_))
        ));
    }

    #[test]
    fn test_assemble_rejects_single_team_selections() {
        let legs = vec![
            mlb_prop("Aaron Judge", MarketType::BatterHits, Side::Over, "Yankees", dec!(2.0)),
            mlb_prop("Juan Soto", MarketType::BatterRunsScored, Side::Over, "Yankees", dec!(2.0)),
        ];
        assert!(matches!(
            builder().assemble(legs),
            Err(PropEdgeError::InvalidSelection(_))
        ));
    }

    #[test]
    fn test_assemble_evaluates_valid_selection() {
        let legs = vec![
            mlb_prop("Gerrit Cole", MarketType::PitcherStrikeouts, Side::Over, "Yankees", dec!(4.0)),
            mlb_prop("Rafael Devers", MarketType::BatterHits, Side::Under, "Red Sox", dec!(2.0)),
        ];
        let selected = builder().assemble(legs).unwrap();
        assert_eq!(selected.combined_probability, dec!(0.36));
        assert_eq!(selected.pair_correlations.len(), 1);
        assert_eq!(selected.avg_correlation, dec!(-0.7));
        assert_eq!(selected.pair_correlations[0].score, dec!(-0.7));
        // 3-man contest: EV = 0.36 * 6 - 1
        assert_eq!(selected.evaluation.ev_percent, dec!(116.0));
    }

    #[test]
    fn test_assemble_requires_two_legs() {
        let legs = vec![mlb_prop(
            "Gerrit Cole",
            MarketType::PitcherStrikeouts,
            Side::Over,
            "Yankees",
            dec!(4.0),
        )];
        assert!(builder().assemble(legs).is_err());
    }
}
