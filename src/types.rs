//! Shared types for the PROPEDGE engine.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that odds, correlation,
//! contest, and engine modules can depend on them without
//! circular references.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::markets::MarketType;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// The side of an over/under prop quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "O", alias = "over", alias = "Over")]
    Over,
    #[serde(rename = "U", alias = "under", alias = "Under")]
    Under,
}

impl Side {
    /// The opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Over => Side::Under,
            Side::Under => Side::Over,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Over => write!(f, "O"),
            Side::Under => write!(f, "U"),
        }
    }
}

impl std::str::FromStr for Side {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "o" | "over" => Ok(Side::Over),
            "u" | "under" => Ok(Side::Under),
            _ => Err(anyhow::anyhow!("Unknown side: {s}")),
        }
    }
}

/// Sport league. NFL and NCAAF share the football correlation matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Mlb,
    Wnba,
    Nfl,
    Ncaaf,
}

impl Sport {
    /// All supported sports (useful for iteration).
    pub const ALL: &'static [Sport] = &[Sport::Mlb, Sport::Wnba, Sport::Nfl, Sport::Ncaaf];

    /// Whether this sport uses the position-tiered football matrix.
    pub fn is_football(&self) -> bool {
        matches!(self, Sport::Nfl | Sport::Ncaaf)
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sport::Mlb => write!(f, "mlb"),
            Sport::Wnba => write!(f, "wnba"),
            Sport::Nfl => write!(f, "nfl"),
            Sport::Ncaaf => write!(f, "ncaaf"),
        }
    }
}

impl std::str::FromStr for Sport {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mlb" | "baseball" => Ok(Sport::Mlb),
            "wnba" => Ok(Sport::Wnba),
            "nfl" => Ok(Sport::Nfl),
            "ncaaf" | "cfb" => Ok(Sport::Ncaaf),
            _ => Err(anyhow::anyhow!("Unknown sport: {s}")),
        }
    }
}

/// Football depth-chart tier used to key passer/receiver correlations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionTier {
    QB,
    WR1,
    WR2,
    WR3,
    TE,
    RB,
}

impl PositionTier {
    /// Receiver tiers eligible as secondary legs under a passer anchor.
    pub const RECEIVERS: &'static [PositionTier] = &[
        PositionTier::WR1,
        PositionTier::WR2,
        PositionTier::WR3,
        PositionTier::TE,
        PositionTier::RB,
    ];

    pub fn is_receiver(&self) -> bool {
        Self::RECEIVERS.contains(self)
    }
}

impl fmt::Display for PositionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionTier::QB => write!(f, "QB"),
            PositionTier::WR1 => write!(f, "WR1"),
            PositionTier::WR2 => write!(f, "WR2"),
            PositionTier::WR3 => write!(f, "WR3"),
            PositionTier::TE => write!(f, "TE"),
            PositionTier::RB => write!(f, "RB"),
        }
    }
}

// ---------------------------------------------------------------------------
// Game context
// ---------------------------------------------------------------------------

/// A single game identified by its home/away pair. Two props belong to
/// the same game exactly when their `GameKey`s are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameKey {
    pub home: String,
    pub away: String,
}

impl GameKey {
    pub fn new(home: impl Into<String>, away: impl Into<String>) -> Self {
        Self {
            home: home.into(),
            away: away.into(),
        }
    }
}

impl fmt::Display for GameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.away, self.home)
    }
}

// ---------------------------------------------------------------------------
// Prop
// ---------------------------------------------------------------------------

/// One side of a single market quote, resolved to a de-vigged true
/// probability. Immutable once built; constructed fresh per snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prop {
    pub player_name: String,
    /// Lowercased, underscore-joined key used for cross-source matching.
    pub normalized_name: String,
    pub market: MarketType,
    pub line: Decimal,
    pub side: Side,
    /// De-vigged win probability, strictly inside (0, 1).
    pub true_probability: Decimal,
    /// EV% relative to the contest's per-leg implied probability.
    pub ev_percent: Decimal,
    pub home: String,
    pub away: String,
    pub sport: Sport,
    pub team: Option<String>,
    /// Number of books that quoted both sides of this market.
    pub book_count: u32,
    /// Depth-chart tier, only populated for football props.
    pub position: Option<PositionTier>,
}

impl Prop {
    /// Validate the construction contract: a prop carrying a de-vigged
    /// probability must have it strictly inside (0, 1). A violation here
    /// is a programming error upstream, not market sparsity.
    pub fn validated(self) -> Result<Self, PropEdgeError> {
        if self.true_probability <= Decimal::ZERO || self.true_probability >= Decimal::ONE {
            return Err(PropEdgeError::InvalidProbability {
                player: self.player_name,
                market: self.market.to_string(),
                value: self.true_probability,
            });
        }
        Ok(self)
    }

    pub fn game_key(&self) -> GameKey {
        GameKey::new(self.home.clone(), self.away.clone())
    }

    pub fn same_game(&self, other: &Prop) -> bool {
        self.home == other.home && self.away == other.away
    }

    pub fn same_player(&self, other: &Prop) -> bool {
        self.normalized_name == other.normalized_name
    }

    /// `None` when team data is missing on either side.
    pub fn same_team(&self, other: &Prop) -> Option<bool> {
        match (&self.team, &other.team) {
            (Some(a), Some(b)) => Some(a == b),
            _ => None,
        }
    }
}

impl fmt::Display for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ev_sign = if self.ev_percent >= Decimal::ZERO { "+" } else { "" };
        write!(
            f,
            "{} ({}) {} {} {} | P: {:.1}% | EV: {ev_sign}{:.2}% | books: {}",
            self.player_name,
            self.sport,
            self.market,
            self.side,
            self.line,
            self.true_probability * Decimal::from(100),
            self.ev_percent,
            self.book_count,
        )
    }
}

// ---------------------------------------------------------------------------
// Raw quote input
// ---------------------------------------------------------------------------

/// A single book's American-odds quote for one side of a market.
/// `price` is `None` when the ingestion layer saw a missing or
/// non-numeric price; such quotes are dropped during normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawQuote {
    pub book: String,
    pub price: Option<i64>,
    pub side: Side,
}

/// All raw quotes for one (player, market, line), as delivered by the
/// excluded ingestion layer. `market` is the provider-specific name and
/// is remapped to a canonical [`MarketType`] during normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropQuotes {
    pub player_name: String,
    pub normalized_name: String,
    pub market: String,
    pub line: Decimal,
    pub home: String,
    pub away: String,
    pub sport: Sport,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub position: Option<PositionTier>,
    pub quotes: Vec<RawQuote>,
}

/// A batch snapshot of raw market quotes, the engine's sole input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub fetched_at: DateTime<Utc>,
    pub props: Vec<PropQuotes>,
}

impl Snapshot {
    pub fn new(props: Vec<PropQuotes>) -> Self {
        Self {
            fetched_at: Utc::now(),
            props,
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for PROPEDGE.
///
/// Expected steady-state conditions (malformed quote, one-sided market,
/// insufficient pool, unknown correlation) never surface here — they
/// are `Option`/empty-result paths. These variants mark broken
/// contracts and should fail fast.
#[derive(Debug, thiserror::Error)]
pub enum PropEdgeError {
    #[error("Invalid probability for {player} {market}: {value}")]
    InvalidProbability {
        player: String,
        market: String,
        value: Decimal,
    },

    #[error("Unknown contest type: {0}")]
    UnknownContest(String),

    #[error("Invalid parlay selection: {0}")]
    InvalidSelection(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
