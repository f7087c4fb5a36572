use crate::analytics::MonthBucket;
use crate::ledger::{Ledger, RecordFilter};
use crate::models::{
    parse_date, Account, AccountType, Budget, IncomeEntry, ModelError, Transaction,
    TransactionType,
};
use crate::storage::{Result, StorageError};
use csv::{ReaderBuilder, WriterBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ACCOUNTS_FILE: &str = "accounts.csv";
pub const TRANSACTIONS_FILE: &str = "transactions.csv";
pub const INCOME_FILE: &str = "income.csv";
pub const BUDGETS_FILE: &str = "budgets.csv";

#[derive(Debug, Serialize, Deserialize)]
struct AccountRow {
    id: u64,
    name: String,
    account_type: String,
    currency: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct TransactionRow {
    id: u64,
    account_id: u64,
    date: String,
    amount: f64,
    transaction_type: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    note: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct IncomeRow {
    id: u64,
    account_id: u64,
    date: String,
    amount: f64,
    #[serde(default)]
    source: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct BudgetRow {
    id: u64,
    month: String,
    category: String,
    limit_amount: f64,
}

impl From<&Account> for AccountRow {
    fn from(account: &Account) -> Self {
        AccountRow {
            id: account.id,
            name: account.name.clone(),
            account_type: account.account_type.to_string(),
            currency: account.currency.clone(),
        }
    }
}

impl From<&Transaction> for TransactionRow {
    fn from(t: &Transaction) -> Self {
        TransactionRow {
            id: t.id,
            account_id: t.account_id,
            date: t.date.format("%Y-%m-%d").to_string(),
            amount: t.amount(),
            transaction_type: t.transaction_type.to_string(),
            category: t.category.clone(),
            note: t.note.clone(),
        }
    }
}

impl From<&IncomeEntry> for IncomeRow {
    fn from(entry: &IncomeEntry) -> Self {
        IncomeRow {
            id: entry.id,
            account_id: entry.account_id,
            date: entry.date.format("%Y-%m-%d").to_string(),
            amount: entry.amount(),
            source: entry.source.clone(),
        }
    }
}

impl From<&Budget> for BudgetRow {
    fn from(budget: &Budget) -> Self {
        BudgetRow {
            id: budget.id,
            month: budget.month.to_string(),
            category: budget.category.clone(),
            limit_amount: budget.limit_amount(),
        }
    }
}

//writes one row per item with a header line, synced to disk
fn write_rows<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<()> {
    let csv_error = |source| StorageError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(csv_error)?;

    for row in rows {
        writer.serialize(row).map_err(csv_error)?;
    }
    writer.flush()?;
    writer.get_ref().sync_all()?;

    Ok(())
}

//sibling file a table is written to before it replaces the live one
fn staging_path(path: &Path) -> PathBuf {
    path.with_extension("csv.tmp")
}

//writes next to `path` and renames over it, so readers never see a half-written table
fn replace_table<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<()> {
    let staged = staging_path(path);
    if let Err(err) = write_rows(&staged, rows) {
        let _ = fs::remove_file(&staged);
        return Err(err);
    }
    fs::rename(&staged, path)?;
    Ok(())
}

//reads every row paired with its line number, a missing file is an empty table
fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<(usize, T)>> {
    if !path.exists() {
        debug!(path = %path.display(), "no table file, starting empty");
        return Ok(Vec::new());
    }

    let csv_error = |source| StorageError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(csv_error)?;

    let headers = reader.headers().map_err(csv_error)?.clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_error)?;
        //physical line the record starts on, quoted newlines included
        let line = record
            .position()
            .map_or(rows.len() + 2, |position| position.line() as usize);
        let row = record
            .deserialize(Some(&headers))
            .map_err(|e| invalid_row(path, line, e))?;
        rows.push((line, row));
    }

    debug!(path = %path.display(), rows = rows.len(), "table loaded");
    Ok(rows)
}

fn invalid_row(path: &Path, line: usize, err: impl ToString) -> StorageError {
    StorageError::InvalidRecord {
        path: path.to_path_buf(),
        line,
        message: err.to_string(),
    }
}

pub fn save_accounts(path: &Path, accounts: &[&Account]) -> Result<()> {
    replace_table(path, accounts.iter().map(|a| AccountRow::from(*a)))
}

pub fn load_accounts(path: &Path) -> Result<Vec<Account>> {
    read_rows::<AccountRow>(path)?
        .into_iter()
        .map(|(line, row)| {
            Account::new(
                row.id,
                &row.name,
                AccountType::parse(&row.account_type),
                &row.currency,
            )
            .map_err(|e| invalid_row(path, line, e))
        })
        .collect()
}

pub fn save_transactions(path: &Path, transactions: &[&Transaction]) -> Result<()> {
    replace_table(path, transactions.iter().map(|t| TransactionRow::from(*t)))
}

fn transaction_from_row(row: TransactionRow) -> std::result::Result<Transaction, ModelError> {
    let date = parse_date(&row.date)?;
    let transaction_type = TransactionType::parse(&row.transaction_type)?;
    Transaction::new(
        row.id,
        row.account_id,
        date,
        row.amount,
        transaction_type,
        &row.category,
        &row.note,
    )
}

//rows pass through the constructor, so stored signs are re-normalized by type
pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>> {
    read_rows::<TransactionRow>(path)?
        .into_iter()
        .map(|(line, row)| transaction_from_row(row).map_err(|e| invalid_row(path, line, e)))
        .collect()
}

pub fn save_income(path: &Path, income: &[&IncomeEntry]) -> Result<()> {
    replace_table(path, income.iter().map(|entry| IncomeRow::from(*entry)))
}

pub fn load_income(path: &Path) -> Result<Vec<IncomeEntry>> {
    read_rows::<IncomeRow>(path)?
        .into_iter()
        .map(|(line, row)| {
            parse_date(&row.date)
                .and_then(|date| {
                    IncomeEntry::new(row.id, row.account_id, date, row.amount, &row.source)
                })
                .map_err(|e| invalid_row(path, line, e))
        })
        .collect()
}

pub fn save_budgets(path: &Path, budgets: &[&Budget]) -> Result<()> {
    replace_table(path, budgets.iter().map(|b| BudgetRow::from(*b)))
}

pub fn load_budgets(path: &Path) -> Result<Vec<Budget>> {
    read_rows::<BudgetRow>(path)?
        .into_iter()
        .map(|(line, row)| {
            let month = MonthBucket::parse(&row.month).map_err(|e| invalid_row(path, line, e))?;
            Budget::new(row.id, month, &row.category, row.limit_amount)
                .map_err(|e| invalid_row(path, line, e))
        })
        .collect()
}

fn write_staged(ledger: &Ledger, staged: &[PathBuf]) -> Result<()> {
    let accounts = ledger.list_accounts();
    let transactions = ledger.list_transactions(&RecordFilter::all());
    let income = ledger.list_income(&RecordFilter::all());
    let budgets = ledger.list_budgets();

    write_rows(&staged[0], accounts.iter().map(|a| AccountRow::from(*a)))?;
    write_rows(&staged[1], transactions.iter().map(|t| TransactionRow::from(*t)))?;
    write_rows(&staged[2], income.iter().map(|entry| IncomeRow::from(*entry)))?;
    write_rows(&staged[3], budgets.iter().map(|b| BudgetRow::from(*b)))?;
    Ok(())
}

//writes every table of the ledger into `dir`, creating it if needed
//live tables are only replaced once all four staged files are written
pub fn save_ledger(ledger: &Ledger, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;

    let live: Vec<PathBuf> = [ACCOUNTS_FILE, TRANSACTIONS_FILE, INCOME_FILE, BUDGETS_FILE]
        .iter()
        .map(|name| dir.join(name))
        .collect();
    let staged: Vec<PathBuf> = live.iter().map(|path| staging_path(path)).collect();

    if let Err(err) = write_staged(ledger, &staged) {
        for path in &staged {
            let _ = fs::remove_file(path);
        }
        return Err(err);
    }

    for (from, to) in staged.iter().zip(&live) {
        fs::rename(from, to)?;
    }

    debug!(dir = %dir.display(), "ledger saved");
    Ok(())
}

//reads a ledger back from `dir`, missing tables load as empty
pub fn load_ledger(dir: &Path) -> Result<Ledger> {
    let accounts = load_accounts(&dir.join(ACCOUNTS_FILE))?;
    let transactions = load_transactions(&dir.join(TRANSACTIONS_FILE))?;
    let income = load_income(&dir.join(INCOME_FILE))?;
    let budgets = load_budgets(&dir.join(BUDGETS_FILE))?;

    Ok(Ledger::from_parts(accounts, transactions, income, budgets)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_accounts(&dir.path().join(ACCOUNTS_FILE))
            .unwrap()
            .is_empty());
        assert!(load_ledger(dir.path()).unwrap().list_accounts().is_empty());
    }

    #[test]
    fn accounts_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ACCOUNTS_FILE);
        let wallet = Account::new(1, "Wallet", AccountType::Cash, "HUF").unwrap();

        save_accounts(&path, &[&wallet]).unwrap();
        let loaded = load_accounts(&path).unwrap();

        assert_eq!(loaded, vec![wallet]);
    }

    #[test]
    fn bad_date_reports_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TRANSACTIONS_FILE);
        fs::write(
            &path,
            "id,account_id,date,amount,transaction_type,category,note\n\
             1,1,2025-01-02,5,expense,food,\n\
             2,1,02/01/2025,5,expense,food,\n",
        )
        .unwrap();

        match load_transactions(&path).unwrap_err() {
            StorageError::InvalidRecord { line, message, .. } => {
                assert_eq!(line, 3);
                assert!(message.contains("02/01/2025"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn line_numbers_count_quoted_newlines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TRANSACTIONS_FILE);
        fs::write(
            &path,
            "id,account_id,date,amount,transaction_type,category,note\n\
             1,1,2025-01-02,5,expense,food,\"line one\nline two\"\n\
             2,1,2025-13-40,5,expense,food,\n",
        )
        .unwrap();

        match load_transactions(&path).unwrap_err() {
            StorageError::InvalidRecord { line, message, .. } => {
                assert_eq!(line, 4);
                assert!(message.contains("2025-13-40"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn multi_line_note_survives_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TRANSACTIONS_FILE);
        let date = parse_date("2025-01-02").unwrap();
        let t = Transaction::new(1, 1, date, 5.0, TransactionType::Expense, "food", "a\nb")
            .unwrap();

        save_transactions(&path, &[&t]).unwrap();
        let loaded = load_transactions(&path).unwrap();

        assert_eq!(loaded[0].note, "a\nb");
        assert!(!staging_path(&path).exists());
    }

    #[test]
    fn failed_save_keeps_previous_tables() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = Ledger::new();
        ledger.create_account("Wallet", AccountType::Cash, "HUF").unwrap();
        save_ledger(&ledger, dir.path()).unwrap();

        //a directory in the way makes the transactions table unwritable
        fs::create_dir(staging_path(&dir.path().join(TRANSACTIONS_FILE))).unwrap();
        ledger.create_account("Bank", AccountType::Bank, "HUF").unwrap();
        assert!(save_ledger(&ledger, dir.path()).is_err());

        assert!(!staging_path(&dir.path().join(ACCOUNTS_FILE)).exists());
        let reloaded = load_ledger(dir.path()).unwrap();
        assert_eq!(reloaded.list_accounts().len(), 1);
    }

    #[test]
    fn loaded_amounts_follow_the_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TRANSACTIONS_FILE);
        fs::write(
            &path,
            "id,account_id,date,amount,transaction_type,category,note\n\
             1,1,2025-01-02,5,expense,food,\n\
             2,1,2025-01-03,-8,income,refund,\n",
        )
        .unwrap();

        let loaded = load_transactions(&path).unwrap();
        assert_eq!(loaded[0].amount(), -5.0);
        assert_eq!(loaded[1].amount(), 8.0);
    }
}
