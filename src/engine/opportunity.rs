//! Snapshot normalization and single-leg opportunity analysis.
//!
//! Turns a raw quote snapshot into the engine's working pool: de-vigged
//! two-sided [`Prop`]s eligible for correlation/parlay work, one-sided
//! markets kept for low-confidence standalone reporting, and a count of
//! quotes dropped for unknown market names.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::contest::ContestConfig;
use crate::markets::MarketType;
use crate::odds::{devig, one_sided_average};
use crate::types::{Prop, PropEdgeError, Side, Snapshot, Sport};

// ---------------------------------------------------------------------------
// Pool
// ---------------------------------------------------------------------------

/// Output of one normalization pass over a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropPool {
    /// Both-sided, de-vigged props. Both sides of each market appear.
    pub eligible: Vec<Prop>,
    /// Markets no book quoted both sides of. Report-only.
    pub one_sided: Vec<OneSidedMarket>,
    /// Quotes skipped for unmappable provider market names.
    pub dropped_markets: u32,
}

/// A market excluded from de-vigging because no book quoted both sides.
/// The raw probability still carries the vig, hence low confidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneSidedMarket {
    pub player_name: String,
    pub market: MarketType,
    pub line: Decimal,
    pub side: Side,
    pub raw_probability: Decimal,
    pub book_count: u32,
}

impl fmt::Display for OneSidedMarket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} | raw P: {:.1}% | books: {} (one-sided)",
            self.player_name,
            self.market,
            self.side,
            self.line,
            self.raw_probability * Decimal::from(100),
            self.book_count,
        )
    }
}

// ---------------------------------------------------------------------------
// Opportunity
// ---------------------------------------------------------------------------

/// A single eligible leg scored for standalone display: EV over the
/// contest's per-leg break-even, plus a public-appeal adjustment that
/// demands extra edge from picks the crowd piles onto.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    pub prop: Prop,
    pub appeal: u32,
    pub adjusted_break_even: Decimal,
    pub meets_threshold: bool,
}

impl fmt::Display for Opportunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = if self.meets_threshold { "PLAY" } else { "pass" };
        write!(
            f,
            "[{flag}] {} | appeal: {} | adj BE: {:.1}%",
            self.prop,
            self.appeal,
            self.adjusted_break_even * Decimal::from(100),
        )
    }
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

/// Normalizes snapshots and ranks single-leg opportunities for one
/// sport against one contest's economics.
pub struct OpportunityAnalyzer {
    sport: Sport,
    contest: ContestConfig,
    star_players: Vec<String>,
}

// Markets the contest public gravitates to; these get the largest
// appeal penalty.
const POPULAR_MARKETS: &[&str] = &["hits", "strikeouts", "points", "rebounds"];

impl OpportunityAnalyzer {
    pub fn new(sport: Sport, contest: ContestConfig, star_players: Vec<String>) -> Self {
        let star_players = star_players
            .into_iter()
            .map(|name| name.trim().to_lowercase().replace(' ', "_"))
            .collect();
        Self {
            sport,
            contest,
            star_players,
        }
    }

    /// Build the eligible pool from a raw snapshot.
    ///
    /// Quotes for other sports are skipped, unknown market names are
    /// dropped with a warning, and markets with no two-sided book fall
    /// into the one-sided bucket. Only a constructed prop failing its
    /// own probability contract is an error.
    pub fn normalize(&self, snapshot: &Snapshot) -> Result<PropPool, PropEdgeError> {
        let mut eligible = Vec::new();
        let mut one_sided = Vec::new();
        let mut dropped_markets = 0u32;

        for raw in &snapshot.props {
            if raw.sport != self.sport {
                continue;
            }
            let Some(market) = MarketType::from_provider(&raw.market) else {
                warn!(market = %raw.market, player = %raw.player_name, "Unknown market name, dropping");
                dropped_markets += 1;
                continue;
            };

            let Some(pair) = devig(&raw.quotes) else {
                // No book quoted both sides; fall back to a raw one-sided
                // average for reporting.
                for side in [Side::Over, Side::Under] {
                    if let Some((raw_probability, book_count)) =
                        one_sided_average(&raw.quotes, side)
                    {
                        debug!(player = %raw.player_name, market = %market, %side, "One-sided market");
                        one_sided.push(OneSidedMarket {
                            player_name: raw.player_name.clone(),
                            market,
                            line: raw.line,
                            side,
                            raw_probability,
                            book_count,
                        });
                    }
                }
                continue;
            };

            for (side, probability) in [(Side::Over, pair.over), (Side::Under, pair.under)] {
                let ev_percent =
                    (probability - self.contest.per_leg_break_even) * Decimal::from(100);
                let prop = Prop {
                    player_name: raw.player_name.clone(),
                    normalized_name: raw.normalized_name.clone(),
                    market,
                    line: raw.line,
                    side,
                    true_probability: probability,
                    ev_percent,
                    home: raw.home.clone(),
                    away: raw.away.clone(),
                    sport: raw.sport,
                    team: raw.team.clone(),
                    book_count: pair.book_count,
                    position: raw.position,
                }
                .validated()?;
                eligible.push(prop);
            }
        }

        Ok(PropPool {
            eligible,
            one_sided,
            dropped_markets,
        })
    }

    /// Rank the pool's legs for standalone display, best EV first.
    pub fn opportunities(&self, pool: &PropPool) -> Vec<Opportunity> {
        let mut out: Vec<Opportunity> = pool
            .eligible
            .iter()
            .map(|prop| self.assess(prop))
            .collect();
        out.sort_by(|a, b| b.prop.ev_percent.cmp(&a.prop.ev_percent));
        out
    }

    /// Score one leg's public appeal and threshold it against an
    /// appeal-adjusted break-even.
    pub fn assess(&self, prop: &Prop) -> Opportunity {
        let appeal = self.appeal_score(prop);
        // Each appeal point demands another 1% of win probability.
        let adjusted_break_even =
            self.contest.per_leg_break_even + Decimal::from(appeal) * dec!(0.01);
        Opportunity {
            prop: prop.clone(),
            appeal,
            adjusted_break_even,
            meets_threshold: prop.true_probability > adjusted_break_even,
        }
    }

    /// Public-appeal heuristic: star players, marquee markets, round
    /// lines, and overs are what casual entries flock to.
    fn appeal_score(&self, prop: &Prop) -> u32 {
        let mut score = 0;
        if self.star_players.contains(&prop.normalized_name) {
            score += 3;
        }
        let market_name = prop.market.canonical();
        if POPULAR_MARKETS.iter().any(|m| market_name.contains(m)) {
            score += 2;
        }
        if prop.line.fract().is_zero() {
            score += 1;
        }
        if prop.side == Side::Over {
            score += 1;
        }
        score
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
