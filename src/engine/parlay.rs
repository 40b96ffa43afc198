//! Combinatorial parlay generation.
//!
//! Two search passes over the eligible pool:
//!
//! 1. **Correlated** — same-game leg sets only, kept when their average
//!    pairwise correlation is negative (variance reduction).
//! 2. **Independent** — the best leg from each of several distinct
//!    games, no correlation constraint by construction.
//!
//! Combined probability is the plain product of leg probabilities even
//! for correlated sets. That is a deliberate simplification: downstream
//! ranking and thresholds are calibrated to it, and the correlation
//! model only biases selection, it is not a joint distribution.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info};

use crate::contest::{ContestConfig, ContestEvaluation};
use crate::correlation::{describe, variance_multiplier, CorrelationModel};
use crate::types::{GameKey, Prop};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Pre-filtering and sizing knobs. The candidate caps exist to keep the
/// combinatorial search tractable on a single thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Legs below this true probability never enter the search.
    pub min_leg_probability: Decimal,
    /// Per-game candidate cap for the correlated pass.
    pub max_props_per_game: usize,
    /// Candidate cap (one leg per game) for the independent pass.
    pub max_independent_candidates: usize,
    /// Fractional-Kelly safety factor.
    pub kelly_multiplier: Decimal,
    /// Result window applied after sorting.
    pub max_results: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_leg_probability: dec!(0.50),
            max_props_per_game: 10,
            max_independent_candidates: 20,
            kelly_multiplier: dec!(0.25),
            max_results: 50,
        }
    }
}

// ---------------------------------------------------------------------------
// Parlay
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParlayKind {
    Correlated,
    Independent,
}

impl fmt::Display for ParlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParlayKind::Correlated => write!(f, "correlated"),
            ParlayKind::Independent => write!(f, "independent"),
        }
    }
}

/// One scored leg combination. Ephemeral: produced, ranked, and
/// truncated per invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parlay {
    pub legs: Vec<Prop>,
    pub kind: ParlayKind,
    /// Populated for correlated (single-game) parlays.
    pub game: Option<GameKey>,
    pub combined_probability: Decimal,
    pub evaluation: ContestEvaluation,
    /// Pairwise correlation scores, one per leg pair.
    pub correlation_scores: Vec<Decimal>,
    pub avg_correlation: Decimal,
    pub correlation_label: String,
    pub variance_multiplier: Decimal,
    /// min(average book count / 5, 1) — more quoting books, more trust.
    pub confidence: Decimal,
    pub risk_adjusted_score: Decimal,
    /// Recommended bankroll fraction, quarter-Kelly scaled.
    pub kelly_fraction: Decimal,
}

impl Parlay {
    /// Dollar stake for a bankroll at the recommended Kelly fraction.
    pub fn stake_for(&self, bankroll: Decimal) -> Decimal {
        bankroll * self.kelly_fraction
    }
}

impl fmt::Display for Parlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ev_sign = if self.evaluation.ev_percent >= Decimal::ZERO {
            "+"
        } else {
            ""
        };
        writeln!(
            f,
            "[{}] {} legs | P: {:.1}% | EV: {ev_sign}{:.2}% | corr: {:.2} ({}) | score: {:.2} | kelly: {:.2}%",
            self.kind,
            self.legs.len(),
            self.combined_probability * Decimal::from(100),
            self.evaluation.ev_percent,
            self.avg_correlation,
            self.correlation_label,
            self.risk_adjusted_score,
            self.kelly_fraction * Decimal::from(100),
        )?;
        for leg in &self.legs {
            writeln!(f, "    {leg}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Enumerates, scores, and ranks leg combinations for one contest.
pub struct ParlayGenerator {
    contest: ContestConfig,
    model: CorrelationModel,
    config: GeneratorConfig,
}

impl ParlayGenerator {
    pub fn new(contest: ContestConfig, model: CorrelationModel, config: GeneratorConfig) -> Self {
        Self {
            contest,
            model,
            config,
        }
    }

    /// Run both passes over the pool and return ranked parlays, best
    /// risk-adjusted score first, truncated to the result window.
    ///
    /// A pool too thin for the contest's leg count yields an empty list,
    /// not an error — thin coverage is an everyday condition.
    pub fn generate(&self, pool: &[Prop]) -> Vec<Parlay> {
        let legs = self.contest.required_legs;
        let eligible: Vec<&Prop> = pool
            .iter()
            .filter(|p| p.true_probability >= self.config.min_leg_probability)
            .collect();

        if eligible.len() < legs {
            debug!(
                eligible = eligible.len(),
                required = legs,
                "Pool too thin for contest"
            );
            return Vec::new();
        }

        let mut parlays = self.correlated_pass(&eligible);
        parlays.extend(self.independent_pass(&eligible));

        // Sort before truncating: the window must see the full field.
        parlays.sort_by(|a, b| b.risk_adjusted_score.cmp(&a.risk_adjusted_score));
        parlays.truncate(self.config.max_results);

        info!(
            contest = %self.contest.contest_type,
            eligible = eligible.len(),
            results = parlays.len(),
            "Parlay generation complete"
        );
        parlays
    }

    /// Same-game combinations with negative average correlation.
    fn correlated_pass(&self, eligible: &[&Prop]) -> Vec<Parlay> {
        let legs = self.contest.required_legs;
        let mut by_game: HashMap<GameKey, Vec<&Prop>> = HashMap::new();
        for &prop in eligible {
            by_game.entry(prop.game_key()).or_default().push(prop);
        }

        let mut out = Vec::new();
        for (game, mut props) in by_game {
            props.sort_by(|a, b| b.true_probability.cmp(&a.true_probability));
            props.truncate(self.config.max_props_per_game);
            if props.len() < legs {
                continue;
            }
            for indices in combination_indices(props.len(), legs) {
                let combo: Vec<&Prop> = indices.iter().map(|&i| props[i]).collect();
                let Some(parlay) = self.build(&combo, ParlayKind::Correlated, Some(game.clone()))
                else {
                    continue;
                };
                if parlay.avg_correlation < Decimal::ZERO {
                    out.push(parlay);
                }
            }
        }
        out
    }

    /// Diversified combinations: best leg per game, distinct games only.
    fn independent_pass(&self, eligible: &[&Prop]) -> Vec<Parlay> {
        let legs = self.contest.required_legs;
        let mut best_per_game: HashMap<GameKey, &Prop> = HashMap::new();
        for &prop in eligible {
            best_per_game
                .entry(prop.game_key())
                .and_modify(|best| {
                    if prop.true_probability > best.true_probability {
                        *best = prop;
                    }
                })
                .or_insert(prop);
        }

        let mut candidates: Vec<&Prop> = best_per_game.into_values().collect();
        candidates.sort_by(|a, b| b.true_probability.cmp(&a.true_probability));
        candidates.truncate(self.config.max_independent_candidates);
        if candidates.len() < legs {
            return Vec::new();
        }

        let cap = self.config.max_results * 2;
        let mut out = Vec::new();
        for indices in combination_indices(candidates.len(), legs) {
            if out.len() >= cap {
                break;
            }
            let combo: Vec<&Prop> = indices.iter().map(|&i| candidates[i]).collect();
            if let Some(parlay) = self.build(&combo, ParlayKind::Independent, None) {
                out.push(parlay);
            }
        }
        out
    }

    /// Score one candidate combination. Returns `None` when a player
    /// appears on more than one leg.
    fn build(&self, combo: &[&Prop], kind: ParlayKind, game: Option<GameKey>) -> Option<Parlay> {
        for (i, a) in combo.iter().enumerate() {
            for b in &combo[i + 1..] {
                if a.same_player(b) {
                    return None;
                }
            }
        }

        let mut combined = Decimal::ONE;
        let mut book_sum = Decimal::ZERO;
        for leg in combo {
            combined *= leg.true_probability;
            book_sum += Decimal::from(leg.book_count);
        }

        let mut correlation_scores = Vec::new();
        for (i, a) in combo.iter().enumerate() {
            for b in &combo[i + 1..] {
                correlation_scores.push(self.model.score(a, b));
            }
        }
        let avg_correlation = if correlation_scores.is_empty() {
            Decimal::ZERO
        } else {
            correlation_scores.iter().sum::<Decimal>()
                / Decimal::from(correlation_scores.len() as u32)
        };

        let evaluation = self.contest.evaluate(combined);
        let vm = variance_multiplier(avg_correlation);
        let leg_count = Decimal::from(combo.len() as u32);
        let confidence = (book_sum / leg_count / dec!(5)).min(Decimal::ONE);
        let risk_adjusted_score = evaluation.ev_percent * confidence * (dec!(2) - vm);

        let raw_kelly = (evaluation.edge / self.contest.win_multiple()).max(Decimal::ZERO);
        let kelly_fraction = if vm > Decimal::ZERO {
            raw_kelly / vm * self.config.kelly_multiplier
        } else {
            Decimal::ZERO
        };

        Some(Parlay {
            legs: combo.iter().map(|p| (*p).clone()).collect(),
            kind,
            game,
            combined_probability: combined,
            evaluation,
            correlation_label: describe(avg_correlation).to_string(),
            correlation_scores,
            avg_correlation,
            variance_multiplier: vm,
            confidence,
            risk_adjusted_score,
            kelly_fraction,
        })
    }
}

/// All k-element index combinations of `0..n`, lexicographic.
fn combination_indices(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if k == 0 || k > n {
        return out;
    }
    let mut indices: Vec<usize> = (0..k).collect();
    loop {
        out.push(indices.clone());
        // Advance the rightmost index that still has room.
        let mut i = k;
        loop {
            if i == 0 {
                return out;
            }
            i -= 1;
            if indices[i] != i + n - k {
                break;
            }
        }
        indices[i] += 1;
        for j in i + 1..k {
            indices[j] = indices[j - 1] + 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
