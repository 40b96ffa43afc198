//! Football correlation rules, keyed by receiver depth-chart tier.
//!
//! Passer production flows through receivers, so passer/receiver pairs
//! are always positive, with magnitude set by target share: a WR1 sees
//! far more of the quarterback's yards than a dump-off back does.
//! Shared by NFL and NCAAF.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::markets::MarketType;
use crate::types::PositionTier;

/// Tier-qualified rules: (passer market, receiver market, tier) → base
/// correlation. Sides must match for the value to apply.
pub(super) fn tiered_rules() -> Vec<((MarketType, MarketType, PositionTier), Decimal)> {
    use MarketType::*;
    use PositionTier::*;
    let mut rules = vec![
        ((PlayerPassYds, PlayerReceptionYds, WR1), dec!(0.70)),
        ((PlayerPassYds, PlayerReceptionYds, WR2), dec!(0.55)),
        ((PlayerPassYds, PlayerReceptionYds, WR3), dec!(0.40)),
        ((PlayerPassYds, PlayerReceptionYds, TE), dec!(0.50)),
        ((PlayerPassYds, PlayerReceptionYds, RB), dec!(0.35)),
    ];
    // Reception counts track volume more than depth of target, so the
    // tier spread flattens out.
    for tier in PositionTier::RECEIVERS {
        rules.push(((PlayerPassYds, PlayerReceptions, *tier), dec!(0.60)));
        rules.push(((PlayerPassCompletions, PlayerReceptions, *tier), dec!(0.60)));
    }
    rules
}
