use crate::analytics::AmountRecord;
use crate::models::{finite_amount, ModelError};
use chrono::NaiveDate;
use serde::Serialize;

//an income receipt, always stored as a positive amount
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeEntry {
    pub id: u64,
    pub account_id: u64,
    pub date: NaiveDate,
    amount: f64,
    pub source: String,
}

impl IncomeEntry {
    pub fn new(
        id: u64,
        account_id: u64,
        date: NaiveDate,
        amount: f64,
        source: &str,
    ) -> Result<Self, ModelError> {
        Ok(IncomeEntry {
            id,
            account_id,
            date,
            amount: finite_amount(amount)?.abs(),
            source: source.trim().to_string(),
        })
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn to_amount_record(&self) -> AmountRecord {
        AmountRecord::with_source(self.amount, self.source.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_is_positive_and_labelled_by_source() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let entry = IncomeEntry::new(3, 1, date, -1200.0, "salary").unwrap();
        assert_eq!(entry.amount(), 1200.0);

        let record = entry.to_amount_record();
        assert_eq!(record.amount, Some(1200.0));
        assert_eq!(record.category, None);
        assert_eq!(record.label(), "salary");
    }
}
