//! passbook-core: era-date normalization, ledger record types and table export

pub mod era;
pub mod error;
pub mod export;
pub mod record;

pub use era::{Era, EraConfig, EraConvention, EraTable, normalize_era_date};
pub use error::{PassbookError, Result};
pub use export::{CsvOptions, HeaderStyle, to_csv_bytes, write_csv, write_json};
pub use record::{Ledger, LedgerStatus, ParseStats, TransactionRecord};
