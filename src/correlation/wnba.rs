//! Basketball correlation rules.
//!
//! Combo markets (PRA and friends) are near-supersets of their
//! components, so they correlate strongly positive; usage trade-offs
//! (scoring vs. distributing) give the mild negatives.

use super::Strength;
use crate::markets::MarketType;

/// Market-pair rules for WNBA. Order-insensitive at lookup time.
pub(super) fn pair_rules() -> Vec<((MarketType, MarketType), Strength)> {
    use MarketType::*;
    vec![
        // Usage trade-offs
        ((PlayerPoints, PlayerAssists), Strength::ModerateNegative),
        ((PlayerRebounds, PlayerAssists), Strength::WeakNegative),
        // Combo markets contain their components
        ((PlayerPoints, PlayerPointsReboundsAssists), Strength::StrongPositive),
        ((PlayerRebounds, PlayerPointsReboundsAssists), Strength::StrongPositive),
        ((PlayerAssists, PlayerPointsReboundsAssists), Strength::StrongPositive),
        ((PlayerPoints, PlayerPointsRebounds), Strength::StrongPositive),
        ((PlayerPoints, PlayerPointsAssists), Strength::StrongPositive),
        ((PlayerRebounds, PlayerAssistsRebounds), Strength::StrongPositive),
        // Pace effects
        ((PlayerPoints, PlayerRebounds), Strength::WeakPositive),
        ((PlayerThrees, PlayerPoints), Strength::ModeratePositive),
    ]
}
