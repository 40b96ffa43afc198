//! Canonical market taxonomy and provider-name remapping.
//!
//! The contest platform and the odds panel name the same market
//! differently ("strikeouts" vs "pitcher_strikeouts"). This module owns
//! the canonical [`MarketType`] enum plus an explicit, testable mapping
//! from every known provider alias — previously buried in SQL `CASE`
//! expressions in the ingestion layer.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// MarketType
// ---------------------------------------------------------------------------

/// Canonical market category across all supported sports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketType {
    // MLB — pitcher
    PitcherStrikeouts,
    PitcherEarnedRuns,
    PitcherHitsAllowed,
    PitcherOuts,
    // MLB — batter
    BatterHits,
    BatterSingles,
    BatterTotalBases,
    BatterRunsScored,
    BatterRbis,
    BatterStrikeouts,
    // WNBA
    PlayerPoints,
    PlayerRebounds,
    PlayerAssists,
    PlayerThrees,
    PlayerPointsReboundsAssists,
    PlayerPointsRebounds,
    PlayerPointsAssists,
    PlayerAssistsRebounds,
    // NFL / NCAAF
    PlayerPassYds,
    PlayerPassCompletions,
    PlayerReceptionYds,
    PlayerReceptions,
}

impl MarketType {
    /// Canonical (odds-panel) name for this market.
    pub fn canonical(&self) -> &'static str {
        match self {
            MarketType::PitcherStrikeouts => "pitcher_strikeouts",
            MarketType::PitcherEarnedRuns => "pitcher_earned_runs",
            MarketType::PitcherHitsAllowed => "pitcher_hits_allowed",
            MarketType::PitcherOuts => "pitcher_outs",
            MarketType::BatterHits => "batter_hits",
            MarketType::BatterSingles => "batter_singles",
            MarketType::BatterTotalBases => "batter_total_bases",
            MarketType::BatterRunsScored => "batter_runs_scored",
            MarketType::BatterRbis => "batter_rbis",
            MarketType::BatterStrikeouts => "batter_strikeouts",
            MarketType::PlayerPoints => "player_points",
            MarketType::PlayerRebounds => "player_rebounds",
            MarketType::PlayerAssists => "player_assists",
            MarketType::PlayerThrees => "player_threes",
            MarketType::PlayerPointsReboundsAssists => "player_points_rebounds_assists",
            MarketType::PlayerPointsRebounds => "player_points_rebounds",
            MarketType::PlayerPointsAssists => "player_points_assists",
            MarketType::PlayerAssistsRebounds => "player_assists_rebounds",
            MarketType::PlayerPassYds => "player_pass_yds",
            MarketType::PlayerPassCompletions => "player_pass_completions",
            MarketType::PlayerReceptionYds => "player_reception_yds",
            MarketType::PlayerReceptions => "player_receptions",
        }
    }

    /// Map a provider-specific market name (contest-platform or
    /// odds-panel spelling) to its canonical market. Returns `None` for
    /// unknown names; callers drop and log those quotes.
    pub fn from_provider(name: &str) -> Option<MarketType> {
        let name = name.trim().to_lowercase();
        let mapped = match name.as_str() {
            // MLB aliases
            "pitcher_ks" | "strikeouts" | "pitcher_strikeouts" => MarketType::PitcherStrikeouts,
            "earned_runs" | "pitcher_earned_runs" => MarketType::PitcherEarnedRuns,
            "allowed_hits" | "hits_allowed" | "pitcher_hits_allowed" => {
                MarketType::PitcherHitsAllowed
            }
            "outs" | "total_outs" | "pitcher_outs" => MarketType::PitcherOuts,
            "hits" | "batter_hits" => MarketType::BatterHits,
            "singles" | "batter_singles" => MarketType::BatterSingles,
            "total_bases" | "batter_total_bases" => MarketType::BatterTotalBases,
            "runs" | "batter_runs_scored" => MarketType::BatterRunsScored,
            "rbis" | "batter_rbis" => MarketType::BatterRbis,
            "batter_strikeouts" => MarketType::BatterStrikeouts,
            // WNBA aliases (both long-form and compact spellings)
            "points" | "player_points" => MarketType::PlayerPoints,
            "rebounds" | "player_rebounds" => MarketType::PlayerRebounds,
            "assists" | "player_assists" => MarketType::PlayerAssists,
            "threes" | "player_threes" => MarketType::PlayerThrees,
            "points_plus_assists_plus_rebounds" | "pts+reb+asts"
            | "player_points_rebounds_assists" => MarketType::PlayerPointsReboundsAssists,
            "points_plus_rebounds" | "pts+reb" | "player_points_rebounds" => {
                MarketType::PlayerPointsRebounds
            }
            "points_plus_assists" | "pts+asts" | "player_points_assists" => {
                MarketType::PlayerPointsAssists
            }
            "assists_plus_rebounds" | "asts+reb" | "player_assists_rebounds" => {
                MarketType::PlayerAssistsRebounds
            }
            // Football aliases
            "passing_yards" | "player_pass_yds" => MarketType::PlayerPassYds,
            "completions" | "player_pass_completions" => MarketType::PlayerPassCompletions,
            "receiving_yards" | "player_reception_yds" => MarketType::PlayerReceptionYds,
            "receiving_receptions" | "receptions" | "player_receptions" => {
                MarketType::PlayerReceptions
            }
            _ => return None,
        };
        Some(mapped)
    }

    /// Pitcher markets — anchor-eligible for baseball.
    pub fn is_pitcher(&self) -> bool {
        matches!(
            self,
            MarketType::PitcherStrikeouts
                | MarketType::PitcherEarnedRuns
                | MarketType::PitcherHitsAllowed
                | MarketType::PitcherOuts
        )
    }

    /// Batter markets — secondary-eligible under a pitcher anchor.
    pub fn is_batter(&self) -> bool {
        matches!(
            self,
            MarketType::BatterHits
                | MarketType::BatterSingles
                | MarketType::BatterTotalBases
                | MarketType::BatterRunsScored
                | MarketType::BatterRbis
                | MarketType::BatterStrikeouts
        )
    }

    /// Passer markets — anchor-eligible for football (QB tier required).
    pub fn is_passer(&self) -> bool {
        matches!(
            self,
            MarketType::PlayerPassYds | MarketType::PlayerPassCompletions
        )
    }

    /// Receiver markets — secondary-eligible under a passer anchor.
    pub fn is_receiver(&self) -> bool {
        matches!(
            self,
            MarketType::PlayerReceptionYds | MarketType::PlayerReceptions
        )
    }
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
