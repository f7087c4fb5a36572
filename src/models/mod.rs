pub mod account;
pub mod budget;
pub mod income;
pub mod transaction;

use chrono::NaiveDate;
use thiserror::Error;

pub use account::{Account, AccountType, DEFAULT_CURRENCY};
pub use budget::Budget;
pub use income::IncomeEntry;
pub use transaction::{Transaction, TransactionType};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Account name is required")]
    EmptyName,
    #[error("Currency is required")]
    EmptyCurrency,
    #[error("Unknown transaction type '{0}': expected 'income' or 'expense'")]
    UnknownTransactionType(String),
    #[error("Date must be in YYYY-MM-DD format, got '{0}'")]
    InvalidDate(String),
    #[error("Amount must be a finite number, got {0}")]
    InvalidAmount(f64),
    #[error("Budget limit must be a non-negative number, got {0}")]
    InvalidLimit(f64),
}

//parses an iso "YYYY-MM-DD" date
pub fn parse_date(s: &str) -> Result<NaiveDate, ModelError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| ModelError::InvalidDate(s.to_string()))
}

//rejects nan and infinities
pub(crate) fn finite_amount(amount: f64) -> Result<f64, ModelError> {
    if amount.is_finite() {
        Ok(amount)
    } else {
        Err(ModelError::InvalidAmount(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_date("2025-11-18").unwrap(),
            NaiveDate::from_ymd_opt(2025, 11, 18).unwrap()
        );
        assert_eq!(
            parse_date("18/11/2025"),
            Err(ModelError::InvalidDate("18/11/2025".to_string()))
        );
        assert!(parse_date("2025-02-30").is_err());
    }
}
