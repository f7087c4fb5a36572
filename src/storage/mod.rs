pub mod csv_store;

use crate::ledger::LedgerError;
use std::path::PathBuf;
use thiserror::Error;

pub use csv_store::{load_ledger, save_ledger};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid record in {} at line {line}: {message}", .path.display())]
    InvalidRecord {
        path: PathBuf,
        line: usize,
        message: String,
    },
    #[error("Inconsistent ledger data: {0}")]
    Ledger(#[from] LedgerError),
}

pub type Result<T> = std::result::Result<T, StorageError>;
