//! Contest payout structures and EV evaluation.
//!
//! This is the single place contest economics live. Every consumer
//! (parlay generator, anchor builder, opportunity reporting) routes
//! through [`ContestConfig::evaluate`] rather than recomputing EV
//! inline, so a payout change touches exactly one table.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::PropEdgeError;

// ---------------------------------------------------------------------------
// Contest types
// ---------------------------------------------------------------------------

/// Supported fixed-payout contest sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContestType {
    #[serde(rename = "2-man")]
    TwoMan,
    #[serde(rename = "3-man")]
    ThreeMan,
    #[serde(rename = "4-man")]
    FourMan,
    #[serde(rename = "5-man")]
    FiveMan,
    #[serde(rename = "6-man")]
    SixMan,
}

impl ContestType {
    pub const ALL: &'static [ContestType] = &[
        ContestType::TwoMan,
        ContestType::ThreeMan,
        ContestType::FourMan,
        ContestType::FiveMan,
        ContestType::SixMan,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ContestType::TwoMan => "2-man",
            ContestType::ThreeMan => "3-man",
            ContestType::FourMan => "4-man",
            ContestType::FiveMan => "5-man",
            ContestType::SixMan => "6-man",
        }
    }
}

impl fmt::Display for ContestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ContestType {
    type Err = PropEdgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "2-man" | "2" => Ok(ContestType::TwoMan),
            "3-man" | "3" => Ok(ContestType::ThreeMan),
            "4-man" | "4" => Ok(ContestType::FourMan),
            "5-man" | "5" => Ok(ContestType::FiveMan),
            "6-man" | "6" => Ok(ContestType::SixMan),
            other => Err(PropEdgeError::UnknownContest(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Contest configuration
// ---------------------------------------------------------------------------

/// One contest format's economics. Static configuration, one record per
/// supported size; treated as read-only by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestConfig {
    pub contest_type: ContestType,
    /// Number of entrants sharing the pool.
    pub lobby_size: u32,
    /// Gross payout as a multiple of the entry fee.
    pub payout_multiple: Decimal,
    /// Operator's cut of the theoretical pool, percent.
    pub rake_percent: Decimal,
    /// Combined win probability at which EV is exactly zero.
    pub break_even_probability: Decimal,
    /// Minimum edge over break-even required before an entry qualifies.
    pub min_edge: Decimal,
    pub required_legs: usize,
    /// Per-leg probability that compounds to exactly break-even.
    pub per_leg_break_even: Decimal,
}

impl ContestConfig {
    /// The standard contest table.
    pub fn standard(contest_type: ContestType) -> Self {
        let (lobby_size, payout, rake, min_edge, legs, per_leg) = match contest_type {
            ContestType::TwoMan => (4, dec!(3), dec!(25.0), dec!(0.07), 2, dec!(0.5774)),
            ContestType::ThreeMan => (8, dec!(6), dec!(25.0), dec!(0.04), 3, dec!(0.5504)),
            ContestType::FourMan => (16, dec!(12), dec!(25.0), dec!(0.02), 4, dec!(0.5313)),
            ContestType::FiveMan => (32, dec!(25), dec!(21.8), dec!(0.01), 5, dec!(0.5119)),
            ContestType::SixMan => (64, dec!(50), dec!(21.8), dec!(0.005), 6, dec!(0.4929)),
        };
        Self {
            contest_type,
            lobby_size,
            payout_multiple: payout,
            rake_percent: rake,
            break_even_probability: Decimal::ONE / payout,
            min_edge,
            required_legs: legs,
            per_leg_break_even: per_leg,
        }
    }

    /// Every standard contest, smallest first.
    pub fn all_standard() -> Vec<ContestConfig> {
        ContestType::ALL
            .iter()
            .map(|ct| ContestConfig::standard(*ct))
            .collect()
    }

    /// Net profit multiple on a win (payout minus the returned stake).
    pub fn win_multiple(&self) -> Decimal {
        self.payout_multiple - Decimal::ONE
    }

    /// Evaluate a combined win probability against this contest.
    ///
    /// Pure arithmetic, no I/O. `ev = p * payout - 1`, `edge = p - BE`,
    /// and an entry qualifies only when its probability clears
    /// break-even by strictly more than `min_edge`.
    pub fn evaluate(&self, combined_probability: Decimal) -> ContestEvaluation {
        let ev = combined_probability * self.payout_multiple - Decimal::ONE;
        let edge = combined_probability - self.break_even_probability;
        ContestEvaluation {
            probability: combined_probability,
            ev_percent: ev * Decimal::from(100),
            break_even_probability: self.break_even_probability,
            edge,
            expected_roi: ev,
            should_bet: edge > self.min_edge,
            meets_minimum: combined_probability > self.break_even_probability + self.min_edge,
        }
    }
}

/// Flat result of evaluating one combined probability against one
/// contest's economics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestEvaluation {
    pub probability: Decimal,
    pub ev_percent: Decimal,
    pub break_even_probability: Decimal,
    pub edge: Decimal,
    /// Expected return per dollar staked (fraction, not percent).
    pub expected_roi: Decimal,
    pub should_bet: bool,
    pub meets_minimum: bool,
}

// ---------------------------------------------------------------------------
// Bankroll plans
// ---------------------------------------------------------------------------

/// Contest-selection guidance by bankroll size. Display-oriented: which
/// contest sizes are sensible to play and how hard to press.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankrollPlan {
    pub tier: String,
    pub contest_types: Vec<ContestType>,
    /// Max fraction of bankroll across all open entries.
    pub risk_per_contest: Decimal,
    /// Scale applied on top of the generator's fractional Kelly.
    pub kelly_multiplier: Decimal,
}

impl BankrollPlan {
    pub fn for_bankroll(bankroll: Decimal) -> Self {
        if bankroll < dec!(100) {
            Self {
                tier: "micro".to_string(),
                contest_types: vec![ContestType::TwoMan],
                risk_per_contest: dec!(0.25),
                kelly_multiplier: dec!(0.25),
            }
        } else if bankroll < dec!(500) {
            Self {
                tier: "small".to_string(),
                contest_types: vec![ContestType::TwoMan, ContestType::ThreeMan],
                risk_per_contest: dec!(0.20),
                kelly_multiplier: dec!(0.33),
            }
        } else if bankroll < dec!(2000) {
            Self {
                tier: "medium".to_string(),
                contest_types: vec![
                    ContestType::TwoMan,
                    ContestType::ThreeMan,
                    ContestType::FourMan,
                ],
                risk_per_contest: dec!(0.15),
                kelly_multiplier: dec!(0.5),
            }
        } else {
            Self {
                tier: "large".to_string(),
                contest_types: ContestType::ALL.to_vec(),
                risk_per_contest: dec!(0.10),
                kelly_multiplier: dec!(0.75),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contest_type_from_str() {
        assert_eq!("2-man".parse::<ContestType>().unwrap(), ContestType::TwoMan);
        assert_eq!("6".parse::<ContestType>().unwrap(), ContestType::SixMan);
        assert!(matches!(
            "9-man".parse::<ContestType>(),
            Err(PropEdgeError::UnknownContest(_))
        ));
    }

    #[test]
    fn test_break_even_is_inverse_payout() {
        for config in ContestConfig::all_standard() {
            assert_eq!(
                config.break_even_probability,
                Decimal::ONE / config.payout_multiple
            );
        }
    }

    #[test]
    fn test_evaluate_at_break_even() {
        for config in ContestConfig::all_standard() {
            let eval = config.evaluate(config.break_even_probability);
            assert_eq!(eval.edge, Decimal::ZERO, "{}", config.contest_type);
            assert!(!eval.meets_minimum);
            assert!(!eval.should_bet);
        }
    }

    #[test]
    fn test_evaluate_two_man_example() {
        // p = 0.40 at payout 3: EV = 0.40 * 3 - 1 = 20%, edge ≈ 0.0667
        let config = ContestConfig::standard(ContestType::TwoMan);
        let eval = config.evaluate(dec!(0.40));
        assert_eq!(eval.ev_percent, dec!(20.0));
        assert!((eval.edge - dec!(0.0667)).abs() < dec!(0.0001));
        assert!(eval.expected_roi > Decimal::ZERO);
        // Positive EV but edge 0.0667 sits under the 0.07 minimum
        assert!(!eval.should_bet);
        assert!(!eval.meets_minimum);
    }

    #[test]
    fn test_meets_minimum_requires_clearing_min_edge() {
        let config = ContestConfig::standard(ContestType::TwoMan);
        let threshold = config.break_even_probability + config.min_edge;
        assert!(!config.evaluate(threshold).meets_minimum);
        assert!(config.evaluate(threshold + dec!(0.001)).meets_minimum);
    }

    #[test]
    fn test_per_leg_break_even_compounds_for_small_contests() {
        // 0.5774^2 ≈ 1/3 and 0.5504^3 ≈ 1/6
        let two = ContestConfig::standard(ContestType::TwoMan);
        let combined = two.per_leg_break_even * two.per_leg_break_even;
        assert!((combined - two.break_even_probability).abs() < dec!(0.0001));

        let three = ContestConfig::standard(ContestType::ThreeMan);
        let combined =
            three.per_leg_break_even * three.per_leg_break_even * three.per_leg_break_even;
        assert!((combined - three.break_even_probability).abs() < dec!(0.0001));
    }

    #[test]
    fn test_per_leg_break_even_falls_with_contest_size() {
        let configs = ContestConfig::all_standard();
        for pair in configs.windows(2) {
            assert!(pair[0].per_leg_break_even > pair[1].per_leg_break_even);
            assert!(pair[0].break_even_probability > pair[1].break_even_probability);
        }
    }

    #[test]
    fn test_bankroll_plan_tiers() {
        assert_eq!(BankrollPlan::for_bankroll(dec!(60)).tier, "micro");
        let small = BankrollPlan::for_bankroll(dec!(250));
        assert_eq!(small.tier, "small");
        assert_eq!(small.contest_types.len(), 2);
        assert_eq!(BankrollPlan::for_bankroll(dec!(1000)).tier, "medium");
        let large = BankrollPlan::for_bankroll(dec!(5000));
        assert_eq!(large.tier, "large");
        assert_eq!(large.contest_types.len(), ContestType::ALL.len());
    }
}
