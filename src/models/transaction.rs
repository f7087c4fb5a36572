use crate::analytics::AmountRecord;
use crate::models::{finite_amount, ModelError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

//direction of a transaction, decides the sign of its stored amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn parse(s: &str) -> Result<Self, ModelError> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(ModelError::UnknownTransactionType(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    //income is stored positive, expenses negative, whatever sign was supplied
    pub fn normalize(&self, amount: f64) -> f64 {
        match self {
            TransactionType::Income => amount.abs(),
            TransactionType::Expense => -amount.abs(),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//a single money movement on an account
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: u64,
    pub account_id: u64,
    pub date: NaiveDate,
    //signed by transaction_type
    amount: f64,
    pub transaction_type: TransactionType,
    pub category: String,
    pub note: String,
}

impl Transaction {
    //creates a transaction, the amount sign is forced by the type
    pub fn new(
        id: u64,
        account_id: u64,
        date: NaiveDate,
        amount: f64,
        transaction_type: TransactionType,
        category: &str,
        note: &str,
    ) -> Result<Self, ModelError> {
        let amount = finite_amount(amount)?;

        Ok(Transaction {
            id,
            account_id,
            date,
            amount: transaction_type.normalize(amount),
            transaction_type,
            category: category.trim().to_string(),
            note: note.to_string(),
        })
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    //replaces the amount, re-applying the sign rule
    pub fn set_amount(&mut self, amount: f64) -> Result<(), ModelError> {
        self.amount = self.transaction_type.normalize(finite_amount(amount)?);
        Ok(())
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    //the view the summarizer works on
    pub fn to_amount_record(&self) -> AmountRecord {
        AmountRecord::with_category(self.amount, self.category.clone())
    }
}
