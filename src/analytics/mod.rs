//pure statistics over money-movement records: summaries and income forecasts

mod exact;
pub mod forecast;
pub mod month;
pub mod rounding;
pub mod summary;

use thiserror::Error;

pub use forecast::{
    forecast, ForecastPoint, ForecastResult, LinearFit, MonthlyIncomePoint, DEFAULT_MONTHS_AHEAD,
};
pub use month::MonthBucket;
pub use rounding::{round2, round_half_even};
pub use summary::{summarize, AmountRecord, SummaryResult, UNCATEGORIZED};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Invalid month '{0}': expected YYYY-MM")]
    InvalidMonth(String),
    #[error("Invalid income value for {month}: {value}")]
    InvalidAmount { month: String, value: f64 },
}
