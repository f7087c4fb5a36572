use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use pocketbook::prelude::*;
use pocketbook::report;
use prettytable::Table;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "pocketbook")]
#[command(about = "A personal finance ledger with statistics and forecasts", long_about = None)]
struct Cli {
    //json configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    //directory holding the csv tables (overrides the configuration)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    //enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    //print results as json instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //manage accounts
    Account {
        #[command(subcommand)]
        action: AccountCommand,
    },

    //manage transactions
    Tx {
        #[command(subcommand)]
        action: TxCommand,
    },

    //manage income records
    Income {
        #[command(subcommand)]
        action: IncomeCommand,
    },

    //manage monthly budgets
    Budget {
        #[command(subcommand)]
        action: BudgetCommand,
    },

    //summary statistics over transactions or income
    Summary {
        #[arg(long, value_enum, default_value = "transactions")]
        kind: SummaryKind,

        #[arg(long, value_parser = date_arg)]
        from: Option<NaiveDate>,

        #[arg(long, value_parser = date_arg)]
        to: Option<NaiveDate>,

        #[arg(long)]
        account: Option<u64>,
    },

    //project monthly income forward
    Forecast {
        //months to project (non-positive means the configured default)
        #[arg(long, allow_negative_numbers = true)]
        months: Option<i32>,

        #[arg(long)]
        account: Option<u64>,
    },

    //both summaries and the forecast together
    Report {
        #[arg(long, value_parser = date_arg)]
        from: Option<NaiveDate>,

        #[arg(long, value_parser = date_arg)]
        to: Option<NaiveDate>,

        #[arg(long, allow_negative_numbers = true)]
        months: Option<i32>,
    },
}

#[derive(Subcommand)]
enum AccountCommand {
    Add {
        #[arg(long)]
        name: String,

        //cash, bank or any other label
        #[arg(long = "type", default_value = "other")]
        account_type: String,

        //defaults to the configured currency
        #[arg(long)]
        currency: Option<String>,
    },
    List,
    Update {
        id: u64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long = "type")]
        account_type: Option<String>,

        #[arg(long)]
        currency: Option<String>,
    },
    //deletes the account with its transactions and income
    Delete { id: u64 },
}

#[derive(Subcommand)]
enum TxCommand {
    Add {
        #[arg(long)]
        account: u64,

        #[arg(long, value_parser = date_arg)]
        date: NaiveDate,

        //sign is taken from the type
        #[arg(long, allow_negative_numbers = true)]
        amount: f64,

        //income or expense
        #[arg(long = "type", value_parser = transaction_type_arg)]
        transaction_type: TransactionType,

        #[arg(long, default_value = "")]
        category: String,

        #[arg(long, default_value = "")]
        note: String,
    },
    List {
        #[arg(long, value_parser = date_arg)]
        from: Option<NaiveDate>,

        #[arg(long, value_parser = date_arg)]
        to: Option<NaiveDate>,

        #[arg(long)]
        account: Option<u64>,
    },
    Update {
        id: u64,

        #[arg(long, value_parser = date_arg)]
        date: Option<NaiveDate>,

        #[arg(long, allow_negative_numbers = true)]
        amount: Option<f64>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        note: Option<String>,
    },
    Delete { id: u64 },
}

#[derive(Subcommand)]
enum IncomeCommand {
    Add {
        #[arg(long)]
        account: u64,

        #[arg(long, value_parser = date_arg)]
        date: NaiveDate,

        //stored as an absolute value
        #[arg(long, allow_negative_numbers = true)]
        amount: f64,

        #[arg(long, default_value = "")]
        source: String,
    },
    List {
        #[arg(long, value_parser = date_arg)]
        from: Option<NaiveDate>,

        #[arg(long, value_parser = date_arg)]
        to: Option<NaiveDate>,

        #[arg(long)]
        account: Option<u64>,
    },
    Delete { id: u64 },
}

#[derive(Subcommand)]
enum BudgetCommand {
    Add {
        #[arg(long, value_parser = month_arg)]
        month: MonthBucket,

        #[arg(long)]
        category: String,

        #[arg(long)]
        limit: f64,
    },
    List,
    Update {
        id: u64,

        #[arg(long, value_parser = month_arg)]
        month: Option<MonthBucket>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        limit: Option<f64>,
    },
    Delete { id: u64 },
    //spent and remaining for a month and category
    Status {
        #[arg(long, value_parser = month_arg)]
        month: MonthBucket,

        #[arg(long)]
        category: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SummaryKind {
    Transactions,
    Income,
}

#[derive(Serialize)]
struct Report {
    transactions: SummaryResult,
    income: SummaryResult,
    forecast: ForecastResult,
}

fn date_arg(s: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}

fn month_arg(s: &str) -> std::result::Result<MonthBucket, String> {
    MonthBucket::parse(s).map_err(|e| e.to_string())
}

fn transaction_type_arg(s: &str) -> std::result::Result<TransactionType, String> {
    TransactionType::parse(s).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_json_file(path)
            .context(format!("Failed to load config from {:?}", path))?,
        None => AppConfig::default(),
    };
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }

    init_logging(cli.verbose, &config.log_level);

    let mut ledger = load_ledger(&config.data_dir).context(format!(
        "Failed to load ledger from {:?}",
        config.data_dir
    ))?;

    let output = Output { json: cli.json };
    let changed = match cli.command {
        Commands::Account { action } => run_account(&mut ledger, &config, action, output)?,
        Commands::Tx { action } => run_tx(&mut ledger, action, output)?,
        Commands::Income { action } => run_income(&mut ledger, action, output)?,
        Commands::Budget { action } => run_budget(&mut ledger, action, output)?,
        Commands::Summary {
            kind,
            from,
            to,
            account,
        } => {
            let filter = RecordFilter::between(from, to).for_account(account);
            let records = match kind {
                SummaryKind::Transactions => ledger.transaction_records(&filter),
                SummaryKind::Income => ledger.income_records(&filter),
            };
            let summary = summarize(&records);
            output.emit(&summary, || report::summary_table(&summary))?;
            false
        }
        Commands::Forecast { months, account } => {
            let history = ledger.monthly_income(&RecordFilter::all().for_account(account));
            let result = forecast(&history, config.months_ahead(months))?;
            output.emit(&result, || report::forecast_table(&result))?;
            false
        }
        Commands::Report { from, to, months } => {
            let overview = build_report(&ledger, RecordFilter::between(from, to), &config, months)?;
            if output.json {
                println!("{}", serde_json::to_string_pretty(&overview)?);
            } else {
                println!("Transactions");
                report::summary_table(&overview.transactions).printstd();
                println!("\nIncome");
                report::summary_table(&overview.income).printstd();
                println!("\nIncome Forecast");
                report::forecast_table(&overview.forecast).printstd();
            }
            false
        }
    };

    if changed {
        save_ledger(&ledger, &config.data_dir).context(format!(
            "Failed to save ledger to {:?}",
            config.data_dir
        ))?;
        info!(dir = %config.data_dir.display(), "ledger saved");
    }

    Ok(())
}

//RUST_LOG wins, then --verbose, then the configured level
fn init_logging(verbose: bool, default_level: &str) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(default_level)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

//the three computations share nothing, so they run in parallel
fn build_report(
    ledger: &Ledger,
    filter: RecordFilter,
    config: &AppConfig,
    months: Option<i32>,
) -> Result<Report> {
    let transactions = ledger.transaction_records(&filter);
    let income = ledger.income_records(&filter);
    let history = ledger.monthly_income(&filter);
    let months_ahead = config.months_ahead(months);

    let ((transactions, income), projection) = rayon::join(
        || rayon::join(|| summarize(&transactions), || summarize(&income)),
        || forecast(&history, months_ahead),
    );

    Ok(Report {
        transactions,
        income,
        forecast: projection?,
    })
}

#[derive(Clone, Copy)]
struct Output {
    json: bool,
}

impl Output {
    //prints the value as json, or the table built by `table`
    fn emit<T: Serialize>(&self, value: &T, table: impl FnOnce() -> Table) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            table().printstd();
        }
        Ok(())
    }
}

fn run_account(
    ledger: &mut Ledger,
    config: &AppConfig,
    action: AccountCommand,
    output: Output,
) -> Result<bool> {
    match action {
        AccountCommand::Add {
            name,
            account_type,
            currency,
        } => {
            let currency = currency.unwrap_or_else(|| config.default_currency.clone());
            let account =
                ledger.create_account(&name, AccountType::parse(&account_type), &currency)?;
            println!("Account {} created: {}", account.id, account.name);
            Ok(true)
        }
        AccountCommand::List => {
            let accounts = ledger.list_accounts();
            output.emit(&accounts, || report::accounts_table(&accounts))?;
            Ok(false)
        }
        AccountCommand::Update {
            id,
            name,
            account_type,
            currency,
        } => {
            ledger.update_account(
                id,
                name.as_deref(),
                account_type.as_deref().map(AccountType::parse),
                currency.as_deref(),
            )?;
            println!("Account {} updated", id);
            Ok(true)
        }
        AccountCommand::Delete { id } => {
            let account = ledger.delete_account(id)?;
            println!("Account {} deleted: {}", id, account.name);
            Ok(true)
        }
    }
}

fn run_tx(ledger: &mut Ledger, action: TxCommand, output: Output) -> Result<bool> {
    match action {
        TxCommand::Add {
            account,
            date,
            amount,
            transaction_type,
            category,
            note,
        } => {
            let t = ledger.create_transaction(
                account,
                date,
                amount,
                transaction_type,
                &category,
                &note,
            )?;
            println!("Transaction {} recorded: {:.2}", t.id, t.amount());
            Ok(true)
        }
        TxCommand::List { from, to, account } => {
            let filter = RecordFilter::between(from, to).for_account(account);
            let transactions = ledger.list_transactions(&filter);
            output.emit(&transactions, || report::transactions_table(&transactions))?;
            Ok(false)
        }
        TxCommand::Update {
            id,
            date,
            amount,
            category,
            note,
        } => {
            ledger.update_transaction(id, date, amount, category.as_deref(), note.as_deref())?;
            println!("Transaction {} updated", id);
            Ok(true)
        }
        TxCommand::Delete { id } => {
            ledger.delete_transaction(id)?;
            println!("Transaction {} deleted", id);
            Ok(true)
        }
    }
}

fn run_income(ledger: &mut Ledger, action: IncomeCommand, output: Output) -> Result<bool> {
    match action {
        IncomeCommand::Add {
            account,
            date,
            amount,
            source,
        } => {
            let entry = ledger.create_income(account, date, amount, &source)?;
            println!("Income {} recorded: {:.2}", entry.id, entry.amount());
            Ok(true)
        }
        IncomeCommand::List { from, to, account } => {
            let filter = RecordFilter::between(from, to).for_account(account);
            let income = ledger.list_income(&filter);
            output.emit(&income, || report::income_table(&income))?;
            Ok(false)
        }
        IncomeCommand::Delete { id } => {
            ledger.delete_income(id)?;
            println!("Income {} deleted", id);
            Ok(true)
        }
    }
}

fn run_budget(ledger: &mut Ledger, action: BudgetCommand, output: Output) -> Result<bool> {
    match action {
        BudgetCommand::Add {
            month,
            category,
            limit,
        } => {
            let budget = ledger.create_budget(month, &category, limit)?;
            println!(
                "Budget {} created: {} {} limit {:.2}",
                budget.id,
                budget.month,
                budget.category,
                budget.limit_amount()
            );
            Ok(true)
        }
        BudgetCommand::List => {
            let budgets = ledger.list_budgets();
            output.emit(&budgets, || report::budgets_table(&budgets))?;
            Ok(false)
        }
        BudgetCommand::Update {
            id,
            month,
            category,
            limit,
        } => {
            ledger.update_budget(id, month, category.as_deref(), limit)?;
            println!("Budget {} updated", id);
            Ok(true)
        }
        BudgetCommand::Delete { id } => {
            ledger.delete_budget(id)?;
            println!("Budget {} deleted", id);
            Ok(true)
        }
        BudgetCommand::Status { month, category } => {
            let status = ledger.budget_status(month, &category)?;
            output.emit(&status, || report::budget_status_table(&status))?;
            Ok(false)
        }
    }
}
