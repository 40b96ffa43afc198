//! Baseball correlation rules.
//!
//! Battery-anchored: pitcher markets move inversely with opposing
//! batter markets (a dominant pitcher suppresses hits, bases, and
//! runs), while related batter markets reinforce each other.

use super::Strength;
use crate::markets::MarketType;

/// Market-pair rules for MLB. Order-insensitive at lookup time.
pub(super) fn pair_rules() -> Vec<((MarketType, MarketType), Strength)> {
    use MarketType::*;
    vec![
        // Pitcher vs. batter
        ((PitcherStrikeouts, BatterHits), Strength::StrongNegative),
        ((PitcherStrikeouts, BatterTotalBases), Strength::StrongNegative),
        ((PitcherStrikeouts, BatterSingles), Strength::ModerateNegative),
        ((PitcherEarnedRuns, BatterRunsScored), Strength::ModerateNegative),
        ((PitcherHitsAllowed, BatterHits), Strength::StrongNegative),
        ((PitcherOuts, BatterHits), Strength::ModerateNegative),
        // Pitcher internal
        ((PitcherOuts, PitcherHitsAllowed), Strength::ModerateNegative),
        ((PitcherStrikeouts, PitcherEarnedRuns), Strength::WeakNegative),
        // Batter internal
        ((BatterHits, BatterTotalBases), Strength::StrongPositive),
        ((BatterHits, BatterSingles), Strength::StrongPositive),
        ((BatterRunsScored, BatterRbis), Strength::ModeratePositive),
        ((BatterHits, BatterStrikeouts), Strength::ModerateNegative),
    ]
}
