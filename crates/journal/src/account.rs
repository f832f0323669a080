use crate::edit::AnnotationEdit;
use crate::error::JournalError;
use crate::goals::Goals;
use analytics::{Aggregator, AnalyticsEngine, PerformanceReport, TagFilter};
use core_types::{Trade, TradeAnnotation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One imported trading account.
///
/// Only the raw trades are stored. Reports are derived on demand with
/// [`Account::report`] and never cached on the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    /// Sorted ascending by close time.
    pub trades: Vec<Trade>,
    #[serde(default)]
    pub goals: Goals,
}

impl Account {
    pub fn new(name: impl Into<String>, trades: Vec<Trade>, goals: Goals) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            trades,
            goals,
        }
    }

    pub fn report(&self, engine: &AnalyticsEngine) -> PerformanceReport {
        engine.calculate(&self.trades)
    }

    fn matches(&self, selector: &str) -> bool {
        self.id.to_string() == selector || self.name.eq_ignore_ascii_case(selector)
    }

    /// Returns a copy of the account with the journaling of trade `ticket` replaced.
    pub fn with_trade_annotation(
        &self,
        ticket: i64,
        annotation: TradeAnnotation,
    ) -> Result<Account, JournalError> {
        let index = self
            .trades
            .iter()
            .position(|t| t.ticket == ticket)
            .ok_or_else(|| JournalError::TradeNotFound {
                account: self.name.clone(),
                ticket,
            })?;

        let mut trades = self.trades.clone();
        trades[index] = self.trades[index].annotated(annotation);
        Ok(Account {
            trades,
            ..self.clone()
        })
    }

    /// Applies `edit` on top of what is already recorded for trade `ticket`.
    pub fn with_trade_edit(
        &self,
        ticket: i64,
        edit: &AnnotationEdit,
    ) -> Result<Account, JournalError> {
        let current = self
            .trades
            .iter()
            .find(|t| t.ticket == ticket)
            .map(|t| t.annotation())
            .ok_or_else(|| JournalError::TradeNotFound {
                account: self.name.clone(),
                ticket,
            })?;
        self.with_trade_annotation(ticket, edit.apply(current))
    }
}

/// Which trades a report is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// A single account, selected by id or (case-insensitive) name.
    Account(String),
    /// Every account merged into one chronological history.
    Portfolio,
}

/// The whole application state: every imported account.
///
/// Operations consume the book and hand back the updated one, so a book (and any report
/// derived from it) that is already shared elsewhere is never changed underneath.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountBook {
    accounts: Vec<Account>,
}

impl AccountBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// The default name for the next import, e.g. `Account 3` or `Account 3 (Sample)`.
    pub fn next_account_name(&self, sample: bool) -> String {
        let n = self.accounts.len() + 1;
        if sample {
            format!("Account {n} (Sample)")
        } else {
            format!("Account {n}")
        }
    }

    pub fn find(&self, selector: &str) -> Result<&Account, JournalError> {
        self.accounts
            .iter()
            .find(|a| a.matches(selector))
            .ok_or_else(|| JournalError::AccountNotFound(selector.to_string()))
    }

    pub fn with_account(mut self, account: Account) -> Self {
        tracing::info!(
            account = %account.name,
            id = %account.id,
            trades = account.trades.len(),
            "Account added"
        );
        self.accounts.push(account);
        self
    }

    pub fn with_trade_annotation(
        self,
        selector: &str,
        ticket: i64,
        annotation: TradeAnnotation,
    ) -> Result<Self, JournalError> {
        self.replace(selector, |account| {
            let updated = account.with_trade_annotation(ticket, annotation)?;
            tracing::info!(account = %updated.name, ticket, "Trade journal updated");
            Ok(updated)
        })
    }

    pub fn with_trade_edit(
        self,
        selector: &str,
        ticket: i64,
        edit: &AnnotationEdit,
    ) -> Result<Self, JournalError> {
        self.replace(selector, |account| {
            let updated = account.with_trade_edit(ticket, edit)?;
            tracing::info!(account = %updated.name, ticket, "Trade journal edited");
            Ok(updated)
        })
    }

    pub fn with_goals(self, selector: &str, goals: Goals) -> Result<Self, JournalError> {
        self.replace(selector, |account| {
            tracing::info!(account = %account.name, ?goals, "Goals updated");
            Ok(Account {
                goals,
                ..account.clone()
            })
        })
    }

    fn replace<F>(mut self, selector: &str, update: F) -> Result<Self, JournalError>
    where
        F: FnOnce(&Account) -> Result<Account, JournalError>,
    {
        let index = self
            .accounts
            .iter()
            .position(|a| a.matches(selector))
            .ok_or_else(|| JournalError::AccountNotFound(selector.to_string()))?;
        self.accounts[index] = update(&self.accounts[index])?;
        Ok(self)
    }

    /// Builds the report for `view`, then narrows it with `filter`.
    pub fn report(
        &self,
        engine: &AnalyticsEngine,
        view: &View,
        filter: &TagFilter,
    ) -> Result<PerformanceReport, JournalError> {
        if self.accounts.is_empty() {
            return Err(JournalError::NoAccounts);
        }

        let base = match view {
            View::Account(selector) => self.find(selector)?.report(engine),
            View::Portfolio => Aggregator::new(*engine)
                .combine(self.accounts.iter().map(|a| a.trades.as_slice())),
        };
        Ok(filter.apply(engine, &base))
    }
}
