use crate::enums::Emotion;
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The symbol used for trades that arrive without an instrument name.
pub const UNKNOWN_SYMBOL: &str = "Unknown";

/// A single closed position, together with any journaling the trader attached to it.
///
/// Trades are treated as immutable values. Editing a journal entry produces a new `Trade`
/// via [`Trade::annotated`]; the original is never modified in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Broker ticket number. Unique within an account, not across accounts.
    pub ticket: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_time: Option<DateTime<FixedOffset>>,
    /// The only time axis used for ordering and bucketing.
    pub close_time: DateTime<FixedOffset>,
    pub symbol: String,
    /// Realized profit (negative for a loss) in account currency.
    pub profit: Decimal,

    // --- Journaling ---
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion_before: Option<Emotion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion_after: Option<Emotion>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news_analysis: Option<String>,
}

impl Trade {
    /// Creates a trade with no journaling attached.
    pub fn new(
        ticket: i64,
        close_time: DateTime<FixedOffset>,
        symbol: impl Into<String>,
        profit: Decimal,
    ) -> Self {
        Self {
            ticket,
            open_time: None,
            close_time,
            symbol: symbol.into(),
            profit,
            journal: None,
            emotion_before: None,
            emotion_after: None,
            tags: BTreeSet::new(),
            news_analysis: None,
        }
    }

    /// A winner is strictly profitable. Break-even trades count as losers.
    pub fn is_win(&self) -> bool {
        self.profit > Decimal::ZERO
    }

    /// The symbol to group by, falling back to [`UNKNOWN_SYMBOL`] when blank.
    pub fn symbol_or_unknown(&self) -> &str {
        if self.symbol.trim().is_empty() {
            UNKNOWN_SYMBOL
        } else {
            &self.symbol
        }
    }

    /// Whether a note or an emotion has been recorded for this trade.
    pub fn is_journaled(&self) -> bool {
        self.journal.as_deref().is_some_and(|j| !j.trim().is_empty())
            || self.emotion_before.is_some()
            || self.emotion_after.is_some()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Returns a copy of this trade with the journaling fields replaced by `annotation`.
    pub fn annotated(&self, annotation: TradeAnnotation) -> Trade {
        Trade {
            journal: annotation.journal,
            emotion_before: annotation.emotion_before,
            emotion_after: annotation.emotion_after,
            tags: annotation.tags,
            news_analysis: annotation.news_analysis,
            ..self.clone()
        }
    }

    /// The journaling fields currently attached to this trade.
    pub fn annotation(&self) -> TradeAnnotation {
        TradeAnnotation {
            journal: self.journal.clone(),
            emotion_before: self.emotion_before,
            emotion_after: self.emotion_after,
            tags: self.tags.clone(),
            news_analysis: self.news_analysis.clone(),
        }
    }
}

/// The user-editable part of a trade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeAnnotation {
    pub journal: Option<String>,
    pub emotion_before: Option<Emotion>,
    pub emotion_after: Option<Emotion>,
    pub tags: BTreeSet<String>,
    pub news_analysis: Option<String>,
}
