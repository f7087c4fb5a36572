//a Rust-based personal finance ledger with summary statistics and income forecasting

pub mod analytics;
pub mod config;
pub mod ledger;
pub mod models;
pub mod report;
pub mod storage;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::analytics::{
        forecast, summarize, AmountRecord, AnalyticsError, ForecastPoint, ForecastResult,
        MonthBucket, MonthlyIncomePoint, SummaryResult,
    };
    pub use crate::config::AppConfig;
    pub use crate::ledger::{BudgetStatus, Ledger, LedgerError, RecordFilter};
    pub use crate::models::{
        parse_date, Account, AccountType, Budget, IncomeEntry, ModelError, Transaction,
        TransactionType,
    };
    pub use crate::storage::{load_ledger, save_ledger, StorageError};
}
