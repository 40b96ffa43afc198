//! Odds normalization and de-vigging.
//!
//! Converts American-odds quotes into implied probabilities and removes
//! each book's margin by normalizing two-sided quotes from the same
//! book. All arithmetic is exact `Decimal` — EV differences of a few
//! hundredths of a percent decide ranking order, so float drift is a
//! correctness bug here, not a cosmetic one.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

use crate::types::{RawQuote, Side};

// ---------------------------------------------------------------------------
// Price conversion
// ---------------------------------------------------------------------------

/// Convert an American-odds price to its implied probability.
///
/// Negative prices: `|price| / (|price| + 100)`.
/// Positive prices: `100 / (price + 100)`.
///
/// Returns `None` for prices with magnitude below 100 (malformed) —
/// callers must drop the quote, never treat it as probability zero.
pub fn american_to_probability(price: i64) -> Option<Decimal> {
    if price.abs() < 100 {
        return None;
    }
    let hundred = Decimal::from(100);
    let magnitude = Decimal::from(price.abs());
    if price < 0 {
        Some(magnitude / (magnitude + hundred))
    } else {
        Some(hundred / (magnitude + hundred))
    }
}

// ---------------------------------------------------------------------------
// De-vigging
// ---------------------------------------------------------------------------

/// De-vigged probability pair for one market/line, averaged across every
/// book that quoted both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeViggedPair {
    pub over: Decimal,
    pub under: Decimal,
    /// Number of books that contributed (quoted both sides).
    pub book_count: u32,
}

/// Remove the bookmaker margin from a flat list of quotes for one
/// market/line.
///
/// Quotes are grouped by book. For each book quoting both sides, the
/// two implied probabilities are normalized by their sum (which carries
/// the book's margin, > 1 in an honest two-sided market); the per-book
/// under probability is taken as `1 - over` so each pair sums to one
/// exactly. Books quoting only one side cannot be vig-corrected alone
/// and are excluded here (see [`one_sided_average`] for the fallback).
///
/// Returns `None` when no book quoted both sides — fatal for
/// correlation/parlay eligibility, non-fatal for reporting.
pub fn devig(quotes: &[RawQuote]) -> Option<DeViggedPair> {
    // BTreeMap keeps book iteration deterministic across runs.
    let mut by_book: BTreeMap<&str, (Option<Decimal>, Option<Decimal>)> = BTreeMap::new();

    for quote in quotes {
        let Some(price) = quote.price else {
            debug!(book = %quote.book, "Dropping quote with missing price");
            continue;
        };
        let Some(prob) = american_to_probability(price) else {
            debug!(book = %quote.book, price, "Dropping quote with malformed price");
            continue;
        };
        let entry = by_book.entry(quote.book.as_str()).or_default();
        match quote.side {
            Side::Over => entry.0 = Some(prob),
            Side::Under => entry.1 = Some(prob),
        }
    }

    let mut over_sum = Decimal::ZERO;
    let mut under_sum = Decimal::ZERO;
    let mut book_count = 0u32;

    for (over, under) in by_book.values() {
        let (Some(over), Some(under)) = (over, under) else {
            continue;
        };
        let total = over + under;
        let true_over = over / total;
        // Exact complement keeps the two-sided invariant airtight.
        let true_under = Decimal::ONE - true_over;
        over_sum += true_over;
        under_sum += true_under;
        book_count += 1;
    }

    if book_count == 0 {
        return None;
    }

    let count = Decimal::from(book_count);
    Some(DeViggedPair {
        over: over_sum / count,
        under: under_sum / count,
        book_count,
    })
}

/// Average raw implied probability for one side across the books that
/// quoted it. Still carries the vig (no opposite side to normalize
/// against), so it is only fit for low-confidence one-sided reporting.
pub fn one_sided_average(quotes: &[RawQuote], side: Side) -> Option<(Decimal, u32)> {
    let mut sum = Decimal::ZERO;
    let mut count = 0u32;
    for quote in quotes {
        if quote.side != side {
            continue;
        }
        let Some(prob) = quote.price.and_then(american_to_probability) else {
            continue;
        };
        sum += prob;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some((sum / Decimal::from(count), count))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
