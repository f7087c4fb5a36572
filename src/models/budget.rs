use crate::analytics::MonthBucket;
use crate::models::ModelError;
use serde::Serialize;

//a spending limit for one category in one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Budget {
    pub id: u64,
    pub month: MonthBucket,
    pub category: String,
    limit_amount: f64,
}

impl Budget {
    pub fn new(
        id: u64,
        month: MonthBucket,
        category: &str,
        limit_amount: f64,
    ) -> Result<Self, ModelError> {
        Ok(Budget {
            id,
            month,
            category: category.trim().to_string(),
            limit_amount: checked_limit(limit_amount)?,
        })
    }

    pub fn limit_amount(&self) -> f64 {
        self.limit_amount
    }

    pub fn set_limit_amount(&mut self, limit_amount: f64) -> Result<(), ModelError> {
        self.limit_amount = checked_limit(limit_amount)?;
        Ok(())
    }
}

fn checked_limit(limit_amount: f64) -> Result<f64, ModelError> {
    if limit_amount.is_finite() && limit_amount >= 0.0 {
        Ok(limit_amount)
    } else {
        Err(ModelError::InvalidLimit(limit_amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_must_be_non_negative() {
        let month = MonthBucket::parse("2025-11").unwrap();
        assert!(Budget::new(1, month, "food", 200.0).is_ok());
        assert_eq!(
            Budget::new(1, month, "food", -1.0),
            Err(ModelError::InvalidLimit(-1.0))
        );

        let mut budget = Budget::new(1, month, "food", 200.0).unwrap();
        assert!(budget.set_limit_amount(f64::NAN).is_err());
        budget.set_limit_amount(250.0).unwrap();
        assert_eq!(budget.limit_amount(), 250.0);
    }
}
