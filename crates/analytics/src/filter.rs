use crate::engine::AnalyticsEngine;
use crate::report::PerformanceReport;
use core_types::Trade;
use std::collections::BTreeSet;

/// Narrows a report down to trades carrying every one of a set of tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    tags: BTreeSet<String>,
}

impl TagFilter {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn matches(&self, trade: &Trade) -> bool {
        self.tags.iter().all(|tag| trade.has_tag(tag))
    }

    /// Recomputes the report from the subset of `base.trades` that match.
    ///
    /// An empty filter returns the base report as is.
    pub fn apply(&self, engine: &AnalyticsEngine, base: &PerformanceReport) -> PerformanceReport {
        if self.is_empty() {
            return base.clone();
        }

        let subset: Vec<Trade> = base
            .trades
            .iter()
            .filter(|t| self.matches(t))
            .cloned()
            .collect();
        tracing::debug!(
            tags = ?self.tags,
            kept = subset.len(),
            of = base.trades.len(),
            "Applying tag filter"
        );
        engine.calculate(&subset)
    }
}

/// Every tag used by at least one trade in the report, sorted.
pub fn available_tags(report: &PerformanceReport) -> BTreeSet<String> {
    report
        .trades
        .iter()
        .flat_map(|t| t.tags.iter().cloned())
        .collect()
}
