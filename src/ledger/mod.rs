pub mod book;
pub mod filter;

use crate::analytics::AnalyticsError;
use crate::models::ModelError;
use thiserror::Error;

pub use book::{BudgetStatus, Ledger};
pub use filter::RecordFilter;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ModelError),
    #[error("{0}")]
    InvalidMonth(#[from] AnalyticsError),
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },
    #[error("No budget found for month '{month}' and category '{category}'")]
    BudgetNotFound { month: String, category: String },
    #[error("{kind} {id} already exists")]
    Duplicate { kind: &'static str, id: u64 },
}

pub type Result<T> = std::result::Result<T, LedgerError>;
