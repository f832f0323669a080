//! # TradePulse Journal
//!
//! Application state on top of the analytics engine: imported accounts, per-trade
//! journaling, performance goals and their JSON persistence.
//!
//! Every mutation returns a new `AccountBook`; reports are always recomputed from the
//! stored trades rather than patched in place.

pub mod account;
pub mod edit;
pub mod error;
pub mod goals;
pub mod store;

pub use account::{Account, AccountBook, View};
pub use edit::AnnotationEdit;
pub use error::JournalError;
pub use goals::{GoalKind, GoalProgress, Goals, Tier};
pub use store::JsonStore;
