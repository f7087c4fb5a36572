use crate::analytics::exact;
use crate::analytics::rounding::round2;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

//label used when a record carries neither a category nor a source
pub const UNCATEGORIZED: &str = "uncategorized";

//one income or expense entry as seen by the summarizer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AmountRecord {
    //missing amounts count as zero
    #[serde(default)]
    pub amount: Option<f64>,

    #[serde(default)]
    pub category: Option<String>,

    //income entries carry a source instead of a category
    #[serde(default)]
    pub source: Option<String>,
}

impl AmountRecord {
    //creates a record labelled by category
    pub fn with_category(amount: f64, category: impl Into<String>) -> Self {
        AmountRecord {
            amount: Some(amount),
            category: Some(category.into()),
            source: None,
        }
    }

    //creates a record labelled by income source
    pub fn with_source(amount: f64, source: impl Into<String>) -> Self {
        AmountRecord {
            amount: Some(amount),
            category: None,
            source: Some(source.into()),
        }
    }

    pub fn amount_or_zero(&self) -> f64 {
        self.amount.unwrap_or(0.0)
    }

    //grouping key: trimmed category, else trimmed source, else "uncategorized"
    pub fn label(&self) -> &str {
        [self.category.as_deref(), self.source.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|label| !label.is_empty())
            .unwrap_or(UNCATEGORIZED)
    }
}

//aggregate statistics over a set of records, every figure rounded to cents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub std: f64,
    //totals per label, in order of first appearance
    pub by_category: IndexMap<String, f64>,
}

impl SummaryResult {
    fn zeroed(by_category: IndexMap<String, f64>) -> Self {
        SummaryResult {
            count: 0,
            mean: 0.0,
            median: 0.0,
            min: 0.0,
            max: 0.0,
            std: 0.0,
            by_category,
        }
    }
}

//reduces records to count, mean, median, extrema, population std and per-label totals
pub fn summarize(records: &[AmountRecord]) -> SummaryResult {
    let mut by_category: IndexMap<String, f64> = IndexMap::new();
    for record in records {
        *by_category.entry(record.label().to_string()).or_insert(0.0) += record.amount_or_zero();
    }

    if records.is_empty() {
        return SummaryResult::zeroed(by_category);
    }

    let amounts: Vec<f64> = records.iter().map(AmountRecord::amount_or_zero).collect();
    let values: &[f64] = &amounts;

    let mean = exact::mean(values);
    let min = values.min();
    let max = values.max();

    //population deviation is degenerate for a single value
    let std = if amounts.len() > 1 {
        exact::population_std_dev(values)
    } else {
        0.0
    };

    SummaryResult {
        count: amounts.len(),
        mean: round2(mean),
        median: round2(median(&amounts)),
        min: round2(min),
        max: round2(max),
        std: round2(std),
        by_category: by_category
            .into_iter()
            .map(|(label, total)| (label, round2(total)))
            .collect(),
    }
}

//middle value, or the mean of the two middle values for an even count
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
