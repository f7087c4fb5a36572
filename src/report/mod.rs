//terminal tables for ledger listings and analytics results

use crate::analytics::{ForecastResult, SummaryResult};
use crate::ledger::BudgetStatus;
use crate::models::{Account, Budget, IncomeEntry, Transaction};
use prettytable::{Cell, Row, Table};

fn header(labels: &[&str]) -> Row {
    Row::new(labels.iter().map(|label| Cell::new(label)).collect())
}

fn metric_row(label: &str, value: String) -> Row {
    Row::new(vec![Cell::new(label), Cell::new(&value)])
}

pub fn summary_table(summary: &SummaryResult) -> Table {
    let mut table = Table::new();

    table.add_row(header(&["Metric", "Value"]));
    table.add_row(metric_row("Count", format!("{}", summary.count)));
    table.add_row(metric_row("Mean", format!("{:.2}", summary.mean)));
    table.add_row(metric_row("Median", format!("{:.2}", summary.median)));
    table.add_row(metric_row("Min", format!("{:.2}", summary.min)));
    table.add_row(metric_row("Max", format!("{:.2}", summary.max)));
    table.add_row(metric_row("Std Dev", format!("{:.2}", summary.std)));

    for (label, total) in &summary.by_category {
        table.add_row(metric_row(&format!("  {}", label), format!("{:.2}", total)));
    }

    table
}

//history rows first, projected rows marked in the last column
pub fn forecast_table(result: &ForecastResult) -> Table {
    let mut table = Table::new();

    table.add_row(header(&["Month", "Income", "Kind"]));
    for point in &result.history {
        table.add_row(Row::new(vec![
            Cell::new(&point.month),
            Cell::new(&format!("{:.2}", point.income)),
            Cell::new("actual"),
        ]));
    }
    for point in &result.forecast {
        table.add_row(Row::new(vec![
            Cell::new(&point.month),
            Cell::new(&format!("{:.2}", point.predicted_income)),
            Cell::new("forecast"),
        ]));
    }

    table
}

pub fn accounts_table(accounts: &[&Account]) -> Table {
    let mut table = Table::new();

    table.add_row(header(&["ID", "Name", "Type", "Currency"]));
    for account in accounts {
        table.add_row(Row::new(vec![
            Cell::new(&account.id.to_string()),
            Cell::new(&account.name),
            Cell::new(account.account_type.as_str()),
            Cell::new(&account.currency),
        ]));
    }

    table
}

pub fn transactions_table(transactions: &[&Transaction]) -> Table {
    let mut table = Table::new();

    table.add_row(header(&["ID", "Date", "Account", "Type", "Amount", "Category", "Note"]));
    for t in transactions {
        table.add_row(Row::new(vec![
            Cell::new(&t.id.to_string()),
            Cell::new(&t.date.to_string()),
            Cell::new(&t.account_id.to_string()),
            Cell::new(t.transaction_type.as_str()),
            Cell::new(&format!("{:.2}", t.amount())),
            Cell::new(&t.category),
            Cell::new(&t.note),
        ]));
    }

    table
}

pub fn income_table(income: &[&IncomeEntry]) -> Table {
    let mut table = Table::new();

    table.add_row(header(&["ID", "Date", "Account", "Amount", "Source"]));
    for entry in income {
        table.add_row(Row::new(vec![
            Cell::new(&entry.id.to_string()),
            Cell::new(&entry.date.to_string()),
            Cell::new(&entry.account_id.to_string()),
            Cell::new(&format!("{:.2}", entry.amount())),
            Cell::new(&entry.source),
        ]));
    }

    table
}

pub fn budgets_table(budgets: &[&Budget]) -> Table {
    let mut table = Table::new();

    table.add_row(header(&["ID", "Month", "Category", "Limit"]));
    for budget in budgets {
        table.add_row(Row::new(vec![
            Cell::new(&budget.id.to_string()),
            Cell::new(&budget.month.to_string()),
            Cell::new(&budget.category),
            Cell::new(&format!("{:.2}", budget.limit_amount())),
        ]));
    }

    table
}

pub fn budget_status_table(status: &BudgetStatus) -> Table {
    let mut table = Table::new();

    table.add_row(header(&["Limit", "Spent", "Remaining"]));
    table.add_row(Row::new(vec![
        Cell::new(&format!("{:.2}", status.limit)),
        Cell::new(&format!("{:.2}", status.spent)),
        Cell::new(&format!("{:.2}", status.remaining)),
    ]));

    table
}
