use pocketbook::prelude::*;

fn records(values: &[(f64, &str)]) -> Vec<AmountRecord> {
    values
        .iter()
        .map(|&(amount, category)| AmountRecord::with_category(amount, category))
        .collect()
}

fn point(month: &str, income: f64) -> MonthlyIncomePoint {
    MonthlyIncomePoint::new(month, income)
}

#[test]
fn empty_summary_matches_zeroed_mapping() {
    let value = serde_json::to_value(summarize(&[])).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "count": 0,
            "mean": 0.0,
            "median": 0.0,
            "min": 0.0,
            "max": 0.0,
            "std": 0.0,
            "by_category": {}
        })
    );
}

#[test]
fn summary_figures_are_bounded_by_extrema() {
    let sets: Vec<Vec<f64>> = vec![
        vec![5.0],
        vec![-12.5, 3.0, 99.99, 0.01],
        vec![1000.0, 1000.0, 1000.0],
        vec![-3.0, -2.0, -1.0, -50.0, 7.25],
        vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7],
    ];

    for amounts in sets {
        let input: Vec<AmountRecord> = amounts
            .iter()
            .map(|&a| AmountRecord::with_category(a, "x"))
            .collect();
        let summary = summarize(&input);

        assert_eq!(summary.count, amounts.len());
        assert!(summary.min <= summary.median && summary.median <= summary.max);
        assert!(summary.min <= summary.mean && summary.mean <= summary.max);
        assert!(summary.std >= 0.0);
    }
}

#[test]
fn category_totals_are_additive() {
    let first = records(&[(10.25, "food"), (-3.0, "fuel"), (4.5, "food")]);
    let second = records(&[(7.0, "food"), (1.1, "rent")]);
    let combined: Vec<AmountRecord> = first.iter().chain(second.iter()).cloned().collect();

    let a = summarize(&first).by_category;
    let b = summarize(&second).by_category;
    let c = summarize(&combined).by_category;

    assert!((a["food"] + b["food"] - c["food"]).abs() < 0.011);
    assert_eq!(c["fuel"], a["fuel"]);
    assert_eq!(c["rent"], b["rent"]);
}

#[test]
fn pair_of_amounts() {
    let summary = summarize(&records(&[(1.0, "a"), (2.0, "b")]));
    assert_eq!(summary.std, 0.5);
    assert_eq!(summary.mean, 1.5);
    assert_eq!(summary.median, 1.5);
}

#[test]
fn pair_mean_and_median_agree() {
    let amounts = [482.3, -675.47, 965.22, -101.81, 380.4, 964.75, 0.01, 0.02, -12.35];
    for &a in &amounts {
        for &b in &amounts {
            let summary = summarize(&records(&[(a, "x"), (b, "y")]));
            assert_eq!(summary.mean, summary.median, "amounts {} and {}", a, b);
        }
    }
}

#[test]
fn flat_forecast_from_single_month() {
    let result = forecast(&[point("2025-01", 100.0)], 3).unwrap();
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "history": [{"month": "2025-01", "income": 100.0}],
            "forecast": [
                {"month": "2025-02", "predicted_income": 100.0},
                {"month": "2025-03", "predicted_income": 100.0},
                {"month": "2025-04", "predicted_income": 100.0}
            ]
        })
    );
}

#[test]
fn empty_history_for_any_horizon() {
    for horizon in [-1, 0, 1, 3, 24] {
        assert_eq!(forecast(&[], horizon).unwrap(), ForecastResult::default());
    }
}

#[test]
fn december_rolls_into_january() {
    let result = forecast(&[point("2025-11", 10.0), point("2025-12", 20.0)], 1).unwrap();
    assert_eq!(result.forecast[0].month, "2026-01");
    assert_eq!(result.forecast[0].predicted_income, 30.0);
}

#[test]
fn input_order_does_not_matter() {
    let history = vec![
        point("2024-10", 1500.0),
        point("2024-11", 1625.4),
        point("2025-01", 1580.0),
        point("2025-02", 1710.9),
        point("2025-03", 1699.99),
    ];
    let expected = forecast(&history, 4).unwrap();

    let permutations = [[4, 3, 2, 1, 0], [2, 0, 4, 1, 3], [1, 4, 0, 3, 2]];
    for order in permutations {
        let shuffled: Vec<MonthlyIncomePoint> =
            order.iter().map(|&i| history[i].clone()).collect();
        assert_eq!(forecast(&shuffled, 4).unwrap(), expected);
    }
}

#[test]
fn bad_month_is_a_format_error() {
    let err = forecast(&[point("March 2025", 1.0)], 3).unwrap_err();
    assert_eq!(err, AnalyticsError::InvalidMonth("March 2025".to_string()));
}
