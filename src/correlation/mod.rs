//! Market correlation model.
//!
//! Given two candidate legs from the same game, produces a signed
//! correlation score in [-1, 1] plus a human-readable rationale. The
//! model exists purely to bias the generator toward variance-reducing
//! (negative) same-game combinations and away from compounding
//! (positive) ones. It is a ranking heuristic, not a calibrated joint
//! distribution.
//!
//! Sport matrices are data, not logic: each sport contributes a rule
//! table (see [`mlb`], [`wnba`], [`football`]) and the scoring
//! algorithm never changes per sport.

mod football;
mod mlb;
mod wnba;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

use crate::markets::MarketType;
use crate::types::{PositionTier, Prop, Side, Sport};

// ---------------------------------------------------------------------------
// Strength scale
// ---------------------------------------------------------------------------

/// Signed correlation strength category used by the rule tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strength {
    StrongNegative,
    ModerateNegative,
    WeakNegative,
    WeakPositive,
    ModeratePositive,
    StrongPositive,
}

impl Strength {
    /// Numeric score this category contributes.
    pub fn value(&self) -> Decimal {
        match self {
            Strength::StrongNegative => dec!(-0.7),
            Strength::ModerateNegative => dec!(-0.4),
            Strength::WeakNegative => dec!(-0.2),
            Strength::WeakPositive => dec!(0.2),
            Strength::ModeratePositive => dec!(0.4),
            Strength::StrongPositive => dec!(0.7),
        }
    }

    pub fn is_negative(&self) -> bool {
        self.value() < Decimal::ZERO
    }
}

/// Label a numeric correlation score for display.
pub fn describe(score: Decimal) -> &'static str {
    if score <= dec!(-0.6) {
        "Strong Negative (Excellent hedge)"
    } else if score <= dec!(-0.3) {
        "Moderate Negative (Good hedge)"
    } else if score <= dec!(-0.1) {
        "Weak Negative (Slight hedge)"
    } else if score <= dec!(0.1) {
        "Independent (No correlation)"
    } else if score <= dec!(0.3) {
        "Weak Positive (Slight correlation)"
    } else if score <= dec!(0.6) {
        "Moderate Positive (Avoid if possible)"
    } else {
        "Strong Positive (AVOID - High risk)"
    }
}

/// Variance multiplier for a combination with the given average pairwise
/// correlation. Negative correlation shrinks effective variance, positive
/// inflates it.
pub fn variance_multiplier(avg_correlation: Decimal) -> Decimal {
    Decimal::ONE + avg_correlation
}

// Heuristic fallbacks applied when no rule matches.
const SAME_PLAYER_SAME_SIDE: Decimal = dec!(0.4);
const SAME_PLAYER_DIFF_SIDE: Decimal = dec!(0.2);
const SAME_TEAM_SAME_SIDE: Decimal = dec!(0.2);
const SAME_GAME_NUDGE: Decimal = dec!(0.1);

// ---------------------------------------------------------------------------
// Rule tables
// ---------------------------------------------------------------------------

/// A sport's static correlation rules, loaded once and read-only.
///
/// Pair rules are keyed by unordered market pair with a signed strength:
/// a negative rule scores when the two sides differ and collapses to
/// independent when they match; a positive rule is the mirror image.
/// Football additionally carries tier-qualified passer/receiver rules.
pub struct CorrelationTable {
    pub sport: Sport,
    pair: HashMap<(MarketType, MarketType), Strength>,
    tiered: HashMap<(MarketType, MarketType, PositionTier), Decimal>,
}

impl CorrelationTable {
    /// Build the rule table for a sport. NFL and NCAAF share the
    /// football matrix.
    pub fn for_sport(sport: Sport) -> Self {
        let (pair_rules, tiered_rules) = match sport {
            Sport::Mlb => (mlb::pair_rules(), Vec::new()),
            Sport::Wnba => (wnba::pair_rules(), Vec::new()),
            Sport::Nfl | Sport::Ncaaf => (Vec::new(), football::tiered_rules()),
        };
        Self {
            sport,
            pair: pair_rules.into_iter().collect(),
            tiered: tiered_rules.into_iter().collect(),
        }
    }

    /// Symmetric pair-rule lookup: tries (a, b) then (b, a).
    fn pair_rule(&self, a: MarketType, b: MarketType) -> Option<Strength> {
        self.pair
            .get(&(a, b))
            .or_else(|| self.pair.get(&(b, a)))
            .copied()
    }
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// A secondary market recommendation for an anchor leg: which market to
/// pair, which side to take given the anchor's side, and how strong the
/// relationship is. Football entries are tier-qualified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelatedMarket {
    pub market: MarketType,
    pub side: Side,
    pub strength: Decimal,
    pub tier: Option<PositionTier>,
}

/// Correlation scorer over one sport's rule table.
pub struct CorrelationModel {
    table: CorrelationTable,
}

impl CorrelationModel {
    pub fn new(table: CorrelationTable) -> Self {
        Self { table }
    }

    pub fn for_sport(sport: Sport) -> Self {
        Self::new(CorrelationTable::for_sport(sport))
    }

    pub fn sport(&self) -> Sport {
        self.table.sport
    }

    /// Signed correlation score for two legs, in [-1, 1].
    ///
    /// Legs from different games are always independent. Within a game,
    /// rule lookup runs first (symmetric in argument order); heuristics
    /// cover the rest: same player is the strongest generic signal, same
    /// team weaker, and any remaining same-game pair gets a small
    /// positive nudge for shared game-state variance.
    pub fn score(&self, a: &Prop, b: &Prop) -> Decimal {
        if !a.same_game(b) {
            return Decimal::ZERO;
        }

        if let Some(strength) = self.table.pair_rule(a.market, b.market) {
            let applies = if strength.is_negative() {
                a.side != b.side
            } else {
                a.side == b.side
            };
            return if applies { strength.value() } else { Decimal::ZERO };
        }

        if let Some(base) = self.tiered_rule(a, b) {
            return if a.side == b.side { base } else { Decimal::ZERO };
        }

        if a.same_player(b) {
            return if a.side == b.side {
                SAME_PLAYER_SAME_SIDE
            } else {
                SAME_PLAYER_DIFF_SIDE
            };
        }
        if a.same_team(b) == Some(true) {
            return if a.side == b.side {
                SAME_TEAM_SAME_SIDE
            } else {
                Decimal::ZERO
            };
        }
        SAME_GAME_NUDGE
    }

    /// Score plus display label.
    pub fn score_described(&self, a: &Prop, b: &Prop) -> (Decimal, &'static str) {
        let score = self.score(a, b);
        (score, describe(score))
    }

    /// Tier-qualified passer/receiver lookup. Falls through (None) when
    /// neither orientation matches or the receiver's tier is unknown.
    fn tiered_rule(&self, a: &Prop, b: &Prop) -> Option<Decimal> {
        if self.table.tiered.is_empty() {
            return None;
        }
        let (passer, receiver) = if a.market.is_passer() && b.market.is_receiver() {
            (a, b)
        } else if b.market.is_passer() && a.market.is_receiver() {
            (b, a)
        } else {
            return None;
        };
        let tier = receiver.position?;
        self.table
            .tiered
            .get(&(passer.market, receiver.market, tier))
            .copied()
    }

    /// Scan a pool for its strongest hedges: same-game, distinct-player
    /// pairs with a negative score, most negative first.
    pub fn find_best_pairs<'a>(&self, props: &'a [Prop]) -> Vec<(&'a Prop, &'a Prop, Decimal)> {
        let mut out = Vec::new();
        for (i, a) in props.iter().enumerate() {
            for b in &props[i + 1..] {
                if a.same_player(b) {
                    continue;
                }
                let score = self.score(a, b);
                if score < Decimal::ZERO {
                    out.push((a, b, score));
                }
            }
        }
        out.sort_by(|x, y| x.2.cmp(&y.2));
        out
    }

    /// Static correlated-market listing for an anchor: every market the
    /// rule table relates to `anchor`, with the side to pair against
    /// `anchor_side` (opposite for negative rules, same for positive and
    /// tiered ones), sorted by strength magnitude descending.
    pub fn correlated_markets(&self, anchor: MarketType, anchor_side: Side) -> Vec<CorrelatedMarket> {
        let mut out = Vec::new();

        for (&(a, b), &strength) in &self.table.pair {
            let other = if a == anchor {
                b
            } else if b == anchor {
                a
            } else {
                continue;
            };
            let side = if strength.is_negative() {
                anchor_side.opposite()
            } else {
                anchor_side
            };
            out.push(CorrelatedMarket {
                market: other,
                side,
                strength: strength.value(),
                tier: None,
            });
        }

        for (&(passer, receiver, tier), &base) in &self.table.tiered {
            if passer != anchor {
                continue;
            }
            out.push(CorrelatedMarket {
                market: receiver,
                side: anchor_side,
                strength: base,
                tier: Some(tier),
            });
        }

        out.sort_by(|x, y| {
            y.strength
                .abs()
                .cmp(&x.strength.abs())
                .then_with(|| x.market.canonical().cmp(y.market.canonical()))
        });
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
