use crate::analytics::{AmountRecord, MonthBucket, MonthlyIncomePoint};
use crate::ledger::{LedgerError, RecordFilter, Result};
use crate::models::{Account, AccountType, Budget, IncomeEntry, Transaction, TransactionType};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

//spent and remaining amounts for a budget
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub limit: f64,
    pub spent: f64,
    pub remaining: f64,
}

//the whole book: accounts and everything recorded against them
//tables are keyed by id and kept in insertion order
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    accounts: IndexMap<u64, Account>,
    transactions: IndexMap<u64, Transaction>,
    income: IndexMap<u64, IncomeEntry>,
    budgets: IndexMap<u64, Budget>,
}

impl Ledger {
    //creates an empty ledger
    pub fn new() -> Self {
        Ledger::default()
    }

    //rebuilds a ledger from stored tables, checking ids and account references
    pub fn from_parts(
        accounts: Vec<Account>,
        transactions: Vec<Transaction>,
        income: Vec<IncomeEntry>,
        budgets: Vec<Budget>,
    ) -> Result<Self> {
        let mut ledger = Ledger::new();

        for account in accounts {
            insert_unique(&mut ledger.accounts, "Account", account.id, account)?;
        }
        for transaction in transactions {
            ledger.ensure_account_exists(transaction.account_id)?;
            insert_unique(
                &mut ledger.transactions,
                "Transaction",
                transaction.id,
                transaction,
            )?;
        }
        for entry in income {
            ledger.ensure_account_exists(entry.account_id)?;
            insert_unique(&mut ledger.income, "Income record", entry.id, entry)?;
        }
        for budget in budgets {
            insert_unique(&mut ledger.budgets, "Budget", budget.id, budget)?;
        }

        debug!(
            accounts = ledger.accounts.len(),
            transactions = ledger.transactions.len(),
            income = ledger.income.len(),
            budgets = ledger.budgets.len(),
            "ledger assembled"
        );

        Ok(ledger)
    }

    //accounts

    pub fn create_account(
        &mut self,
        name: &str,
        account_type: AccountType,
        currency: &str,
    ) -> Result<&Account> {
        let id = next_id(&self.accounts);
        let account = Account::new(id, name, account_type, currency)?;
        debug!(id, name = %account.name, "account created");
        self.accounts.insert(id, account);
        self.get_account(id)
    }

    pub fn get_account(&self, id: u64) -> Result<&Account> {
        self.accounts.get(&id).ok_or(LedgerError::NotFound {
            kind: "Account",
            id,
        })
    }

    pub fn list_accounts(&self) -> Vec<&Account> {
        self.accounts.values().collect()
    }

    //changes the given fields, leaving the others untouched
    pub fn update_account(
        &mut self,
        id: u64,
        name: Option<&str>,
        account_type: Option<AccountType>,
        currency: Option<&str>,
    ) -> Result<&Account> {
        let account = self.accounts.get_mut(&id).ok_or(LedgerError::NotFound {
            kind: "Account",
            id,
        })?;

        if let Some(name) = name {
            account.rename(name)?;
        }
        if let Some(account_type) = account_type {
            account.account_type = account_type;
        }
        if let Some(currency) = currency {
            account.set_currency(currency)?;
        }

        debug!(id, "account updated");
        self.get_account(id)
    }

    //removes the account together with its transactions and income
    pub fn delete_account(&mut self, id: u64) -> Result<Account> {
        let account = self
            .accounts
            .shift_remove(&id)
            .ok_or(LedgerError::NotFound {
                kind: "Account",
                id,
            })?;

        self.transactions.retain(|_, t| t.account_id != id);
        self.income.retain(|_, entry| entry.account_id != id);

        debug!(id, "account deleted");
        Ok(account)
    }

    fn ensure_account_exists(&self, id: u64) -> Result<()> {
        self.get_account(id).map(|_| ())
    }

    //transactions

    pub fn create_transaction(
        &mut self,
        account_id: u64,
        date: NaiveDate,
        amount: f64,
        transaction_type: TransactionType,
        category: &str,
        note: &str,
    ) -> Result<&Transaction> {
        self.ensure_account_exists(account_id)?;

        let id = next_id(&self.transactions);
        let transaction = Transaction::new(
            id,
            account_id,
            date,
            amount,
            transaction_type,
            category,
            note,
        )?;

        debug!(id, account_id, amount = transaction.amount(), "transaction recorded");
        self.transactions.insert(id, transaction);
        self.get_transaction(id)
    }

    pub fn get_transaction(&self, id: u64) -> Result<&Transaction> {
        self.transactions.get(&id).ok_or(LedgerError::NotFound {
            kind: "Transaction",
            id,
        })
    }

    //changes the given fields, a new amount gets the sign of the transaction type
    pub fn update_transaction(
        &mut self,
        id: u64,
        date: Option<NaiveDate>,
        amount: Option<f64>,
        category: Option<&str>,
        note: Option<&str>,
    ) -> Result<&Transaction> {
        let transaction = self
            .transactions
            .get_mut(&id)
            .ok_or(LedgerError::NotFound {
                kind: "Transaction",
                id,
            })?;

        if let Some(amount) = amount {
            transaction.set_amount(amount)?;
        }
        if let Some(date) = date {
            transaction.date = date;
        }
        if let Some(category) = category.map(str::trim).filter(|c| !c.is_empty()) {
            transaction.category = category.to_string();
        }
        if let Some(note) = note {
            transaction.note = note.to_string();
        }

        debug!(id, "transaction updated");
        self.get_transaction(id)
    }

    pub fn delete_transaction(&mut self, id: u64) -> Result<Transaction> {
        self.transactions
            .shift_remove(&id)
            .ok_or(LedgerError::NotFound {
                kind: "Transaction",
                id,
            })
    }

    //transactions matching the filter, ordered by date
    pub fn list_transactions(&self, filter: &RecordFilter) -> Vec<&Transaction> {
        let mut rows: Vec<&Transaction> = self
            .transactions
            .values()
            .filter(|t| filter.matches(t.date, t.account_id))
            .collect();
        rows.sort_by_key(|t| t.date);
        rows
    }

    pub fn transaction_records(&self, filter: &RecordFilter) -> Vec<AmountRecord> {
        self.list_transactions(filter)
            .into_iter()
            .map(Transaction::to_amount_record)
            .collect()
    }

    //income

    pub fn create_income(
        &mut self,
        account_id: u64,
        date: NaiveDate,
        amount: f64,
        source: &str,
    ) -> Result<&IncomeEntry> {
        self.ensure_account_exists(account_id)?;

        let id = next_id(&self.income);
        let entry = IncomeEntry::new(id, account_id, date, amount, source)?;

        debug!(id, account_id, amount = entry.amount(), "income recorded");
        self.income.insert(id, entry);
        self.get_income(id)
    }

    pub fn get_income(&self, id: u64) -> Result<&IncomeEntry> {
        self.income.get(&id).ok_or(LedgerError::NotFound {
            kind: "Income record",
            id,
        })
    }

    pub fn delete_income(&mut self, id: u64) -> Result<IncomeEntry> {
        self.income.shift_remove(&id).ok_or(LedgerError::NotFound {
            kind: "Income record",
            id,
        })
    }

    //income entries matching the filter, ordered by date
    pub fn list_income(&self, filter: &RecordFilter) -> Vec<&IncomeEntry> {
        let mut rows: Vec<&IncomeEntry> = self
            .income
            .values()
            .filter(|entry| filter.matches(entry.date, entry.account_id))
            .collect();
        rows.sort_by_key(|entry| entry.date);
        rows
    }

    pub fn income_records(&self, filter: &RecordFilter) -> Vec<AmountRecord> {
        self.list_income(filter)
            .into_iter()
            .map(IncomeEntry::to_amount_record)
            .collect()
    }

    //income summed per calendar month, oldest first, months without income are absent
    pub fn monthly_income(&self, filter: &RecordFilter) -> Vec<MonthlyIncomePoint> {
        let mut totals: BTreeMap<MonthBucket, f64> = BTreeMap::new();
        for entry in self.list_income(filter) {
            *totals.entry(MonthBucket::from_date(entry.date)).or_insert(0.0) += entry.amount();
        }

        totals
            .into_iter()
            .map(|(month, income)| MonthlyIncomePoint::new(month.to_string(), income))
            .collect()
    }

    //budgets

    pub fn create_budget(
        &mut self,
        month: MonthBucket,
        category: &str,
        limit_amount: f64,
    ) -> Result<&Budget> {
        let id = next_id(&self.budgets);
        let budget = Budget::new(id, month, category, limit_amount)?;
        debug!(id, %month, category = %budget.category, "budget created");
        self.budgets.insert(id, budget);
        self.get_budget(id)
    }

    pub fn get_budget(&self, id: u64) -> Result<&Budget> {
        self.budgets.get(&id).ok_or(LedgerError::NotFound {
            kind: "Budget",
            id,
        })
    }

    pub fn list_budgets(&self) -> Vec<&Budget> {
        self.budgets.values().collect()
    }

    pub fn update_budget(
        &mut self,
        id: u64,
        month: Option<MonthBucket>,
        category: Option<&str>,
        limit_amount: Option<f64>,
    ) -> Result<&Budget> {
        let budget = self.budgets.get_mut(&id).ok_or(LedgerError::NotFound {
            kind: "Budget",
            id,
        })?;

        if let Some(limit_amount) = limit_amount {
            budget.set_limit_amount(limit_amount)?;
        }
        if let Some(month) = month {
            budget.month = month;
        }
        if let Some(category) = category.map(str::trim).filter(|c| !c.is_empty()) {
            budget.category = category.to_string();
        }

        self.get_budget(id)
    }

    pub fn delete_budget(&mut self, id: u64) -> Result<Budget> {
        self.budgets.shift_remove(&id).ok_or(LedgerError::NotFound {
            kind: "Budget",
            id,
        })
    }

    //absolute expense total for the month and category, against the first matching budget
    pub fn budget_status(&self, month: MonthBucket, category: &str) -> Result<BudgetStatus> {
        let category = category.trim();
        let budget = self
            .budgets
            .values()
            .find(|b| b.month == month && b.category == category)
            .ok_or_else(|| LedgerError::BudgetNotFound {
                month: month.to_string(),
                category: category.to_string(),
            })?;

        let spent: f64 = self
            .transactions
            .values()
            .filter(|t| t.is_expense() && t.category == category && month.contains(t.date))
            .map(|t| -t.amount())
            .sum();

        Ok(BudgetStatus {
            limit: budget.limit_amount(),
            spent,
            remaining: budget.limit_amount() - spent,
        })
    }
}

//ids continue after the largest one in use
fn next_id<T>(table: &IndexMap<u64, T>) -> u64 {
    table.keys().max().map_or(1, |max| max + 1)
}

fn insert_unique<T>(
    table: &mut IndexMap<u64, T>,
    kind: &'static str,
    id: u64,
    value: T,
) -> Result<()> {
    if table.contains_key(&id) {
        return Err(LedgerError::Duplicate { kind, id });
    }
    table.insert(id, value);
    Ok(())
}
