use analytics::PerformanceReport;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Performance targets a trader sets for an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_profit: Option<Decimal>,
    /// Target win rate in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_rate: Option<Decimal>,
    /// Maximum tolerated drawdown in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_drawdown_pct: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalKind {
    TotalProfit,
    WinRate,
    MaxDrawdown,
}

impl GoalKind {
    /// A limit is something to stay under; progress towards it is bad news.
    pub fn is_limit(&self) -> bool {
        matches!(self, GoalKind::MaxDrawdown)
    }
}

impl fmt::Display for GoalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GoalKind::TotalProfit => "Profit Target",
            GoalKind::WinRate => "Win Rate Target",
            GoalKind::MaxDrawdown => "Drawdown Limit",
        })
    }
}

/// Coarse band of progress: above 80% is high, above 50% medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    Low,
    Medium,
    High,
}

impl Tier {
    fn of(progress_pct: Decimal) -> Self {
        if progress_pct > Decimal::from(80) {
            Tier::High
        } else if progress_pct > Decimal::from(50) {
            Tier::Medium
        } else {
            Tier::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub kind: GoalKind,
    pub current: Decimal,
    pub target: Decimal,
    /// `|current / target| * 100`, capped at 100.
    pub progress_pct: Decimal,
    pub tier: Tier,
}

impl GoalProgress {
    pub fn new(kind: GoalKind, current: Decimal, target: Decimal) -> Self {
        let progress_pct = if target.is_zero() {
            Decimal::ZERO
        } else {
            ((current / target).abs() * Decimal::ONE_HUNDRED).min(Decimal::ONE_HUNDRED)
        };
        Self {
            kind,
            current,
            target,
            progress_pct,
            tier: Tier::of(progress_pct),
        }
    }

    /// Targets are met once reached; limits are met while not exceeded.
    pub fn is_met(&self) -> bool {
        if self.kind.is_limit() {
            self.current <= self.target
        } else {
            self.current >= self.target
        }
    }
}

impl Goals {
    pub fn is_empty(&self) -> bool {
        self.total_profit.is_none() && self.win_rate.is_none() && self.max_drawdown_pct.is_none()
    }

    /// Progress for every goal that is set, compared against `report`.
    ///
    /// A target of zero counts as unset.
    pub fn progress(&self, report: &PerformanceReport) -> Vec<GoalProgress> {
        [
            (GoalKind::TotalProfit, self.total_profit, report.total_profit),
            (GoalKind::WinRate, self.win_rate, report.win_rate),
            (GoalKind::MaxDrawdown, self.max_drawdown_pct, report.max_drawdown_pct),
        ]
        .into_iter()
        .filter_map(|(kind, target, current)| {
            target
                .filter(|target| !target.is_zero())
                .map(|target| GoalProgress::new(kind, current, target))
        })
        .collect()
    }
}
