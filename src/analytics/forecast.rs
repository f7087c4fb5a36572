use crate::analytics::month::MonthBucket;
use crate::analytics::rounding::round2;
use crate::analytics::AnalyticsError;
use serde::{Deserialize, Serialize};
use tracing::debug;

//forecast horizon used when the caller gives none
pub const DEFAULT_MONTHS_AHEAD: i32 = 3;

//aggregated income for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyIncomePoint {
    pub month: String,
    pub income: f64,
}

impl MonthlyIncomePoint {
    pub fn new(month: impl Into<String>, income: f64) -> Self {
        MonthlyIncomePoint {
            month: month.into(),
            income,
        }
    }
}

//a projected month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub month: String,
    pub predicted_income: f64,
}

//sorted, rounded history followed by the projected months
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub history: Vec<MonthlyIncomePoint>,
    pub forecast: Vec<ForecastPoint>,
}

//straight line y = slope * x + intercept
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    //least-squares line through (index, value) pairs where index is 0, 1, 2, ...
    //a single value gives a flat line through it
    pub fn from_ordinal_series(values: &[f64]) -> Self {
        match values {
            [] => LinearFit {
                slope: 0.0,
                intercept: 0.0,
            },
            [only] => LinearFit {
                slope: 0.0,
                intercept: *only,
            },
            _ => {
                let n = values.len() as f64;
                let x_mean = (n - 1.0) / 2.0;
                let y_mean = values.iter().sum::<f64>() / n;

                let mut sxx = 0.0;
                let mut sxy = 0.0;
                for (i, &y) in values.iter().enumerate() {
                    let dx = i as f64 - x_mean;
                    sxx += dx * dx;
                    sxy += dx * (y - y_mean);
                }

                //sxx > 0 whenever there are two or more distinct indices
                let slope = sxy / sxx;
                LinearFit {
                    slope,
                    intercept: y_mean - slope * x_mean,
                }
            }
        }
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

//projects monthly income `months_ahead` months past the last observed month
//months are treated as equally spaced ranks, gaps in the history are not filled
pub fn forecast(
    history: &[MonthlyIncomePoint],
    months_ahead: i32,
) -> Result<ForecastResult, AnalyticsError> {
    let months_ahead = months_ahead.max(1);

    if history.is_empty() {
        return Ok(ForecastResult::default());
    }

    let mut points = history
        .iter()
        .map(|point| {
            let month = MonthBucket::parse(&point.month)?;
            if !point.income.is_finite() {
                return Err(AnalyticsError::InvalidAmount {
                    month: point.month.clone(),
                    value: point.income,
                });
            }
            Ok((month, point.income))
        })
        .collect::<Result<Vec<_>, _>>()?;

    //stable sort, chronological order equals lexicographic order of the labels
    points.sort_by_key(|(month, _)| *month);

    let incomes: Vec<f64> = points.iter().map(|(_, income)| *income).collect();
    let fit = LinearFit::from_ordinal_series(&incomes);

    let n = points.len();
    let last_month = points[n - 1].0;

    debug!(
        points = n,
        slope = fit.slope,
        intercept = fit.intercept,
        months_ahead,
        "fitted income trend"
    );

    let forecast = (1..=months_ahead)
        .map(|step| {
            let index = n as f64 + f64::from(step) - 1.0;
            ForecastPoint {
                month: last_month.add_months(step).to_string(),
                predicted_income: round2(fit.predict(index)),
            }
        })
        .collect();

    let history = points
        .into_iter()
        .map(|(month, income)| MonthlyIncomePoint::new(month.to_string(), round2(income)))
        .collect();

    Ok(ForecastResult { history, forecast })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(month: &str, income: f64) -> MonthlyIncomePoint {
        MonthlyIncomePoint::new(month, income)
    }

    fn months(result: &ForecastResult) -> Vec<&str> {
        result.forecast.iter().map(|p| p.month.as_str()).collect()
    }

    #[test]
    fn empty_history_gives_empty_result() {
        for horizon in [-2, 0, 1, 3, 12] {
            let result = forecast(&[], horizon).unwrap();
            assert!(result.history.is_empty());
            assert!(result.forecast.is_empty());
        }
    }

    #[test]
    fn single_point_is_a_flat_line() {
        let result = forecast(&[point("2025-01", 100.0)], 3).unwrap();
        assert_eq!(result.history, vec![point("2025-01", 100.0)]);
        assert_eq!(months(&result), vec!["2025-02", "2025-03", "2025-04"]);
        assert!(result.forecast.iter().all(|p| p.predicted_income == 100.0));
    }

    #[test]
    fn linear_history_is_extended() {
        let history = vec![
            point("2025-01", 100.0),
            point("2025-02", 200.0),
            point("2025-03", 300.0),
        ];
        let result = forecast(&history, 2).unwrap();
        assert_eq!(months(&result), vec!["2025-04", "2025-05"]);
        assert_eq!(result.forecast[0].predicted_income, 400.0);
        assert_eq!(result.forecast[1].predicted_income, 500.0);
    }

    #[test]
    fn gaps_are_treated_as_adjacent_steps() {
        //2025-02 is missing, yet the three points sit at ranks 0, 1, 2
        let history = vec![
            point("2025-01", 10.0),
            point("2025-03", 20.0),
            point("2025-04", 30.0),
        ];
        let result = forecast(&history, 1).unwrap();
        assert_eq!(result.history.len(), 3);
        assert_eq!(result.forecast[0].month, "2025-05");
        assert_eq!(result.forecast[0].predicted_income, 40.0);
    }

    #[test]
    fn horizon_below_one_is_clamped() {
        let history = vec![point("2025-01", 50.0)];
        assert_eq!(forecast(&history, 0).unwrap().forecast.len(), 1);
        assert_eq!(forecast(&history, -5).unwrap().forecast.len(), 1);
    }

    #[test]
    fn year_rolls_over() {
        let result = forecast(&[point("2025-12", 10.0)], 2).unwrap();
        assert_eq!(months(&result), vec!["2026-01", "2026-02"]);
    }

    #[test]
    fn history_is_sorted_and_rounded() {
        let history = vec![point("2025-03", 3.333), point("2025-01", 1.111)];
        let result = forecast(&history, 1).unwrap();
        assert_eq!(
            result.history,
            vec![point("2025-01", 1.11), point("2025-03", 3.33)]
        );
    }

    #[test]
    fn noisy_series_uses_least_squares() {
        //y = 1, 3, 2 over x = 0, 1, 2: slope 0.5, intercept 1.5
        let fit = LinearFit::from_ordinal_series(&[1.0, 3.0, 2.0]);
        assert!((fit.slope - 0.5).abs() < 1e-12);
        assert!((fit.intercept - 1.5).abs() < 1e-12);

        let history = vec![
            point("2024-11", 1.0),
            point("2024-12", 3.0),
            point("2025-01", 2.0),
        ];
        let result = forecast(&history, 1).unwrap();
        assert_eq!(result.forecast[0].predicted_income, 3.0);
    }

    #[test]
    fn rejects_malformed_month() {
        let err = forecast(&[point("2025-1", 10.0)], 1).unwrap_err();
        assert_eq!(err, AnalyticsError::InvalidMonth("2025-1".to_string()));
    }

    #[test]
    fn rejects_non_finite_income() {
        let err = forecast(&[point("2025-01", f64::NAN)], 1).unwrap_err();
        assert!(
            matches!(err, AnalyticsError::InvalidAmount { ref month, .. } if month == "2025-01")
        );
    }
}
