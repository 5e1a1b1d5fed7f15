//! Ledger record types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One passbook transaction row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// `YYYY-MM-DD`, or the raw date token when it could not be normalized.
    pub date: String,
    pub description: String,
    pub withdrawal: Option<u64>,
    pub deposit: Option<u64>,
    pub balance: u64,
}

impl TransactionRecord {
    /// The date as a real calendar date, if it is one.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    /// Table cells in column order; absent amounts are empty strings.
    pub fn cells(&self) -> [String; 5] {
        [
            self.date.clone(),
            self.description.clone(),
            amount_cell(self.withdrawal),
            amount_cell(self.deposit),
            self.balance.to_string(),
        ]
    }
}

fn amount_cell(amount: Option<u64>) -> String {
    amount.map(|a| a.to_string()).unwrap_or_default()
}

/// Line counts for one parsed document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    pub lines: usize,
    pub blank: usize,
    pub accepted: usize,
    pub dropped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerStatus {
    Recognized(usize),
    /// Nothing on the page looked like a transaction.
    NoRecords,
}

/// Transactions of one document, in source line order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub records: Vec<TransactionRecord>,
    pub stats: ParseStats,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: TransactionRecord) {
        self.stats.lines += 1;
        self.stats.accepted += 1;
        self.records.push(record);
    }

    pub fn skip_blank(&mut self) {
        self.stats.lines += 1;
        self.stats.blank += 1;
    }

    pub fn drop_line(&mut self) {
        self.stats.lines += 1;
        self.stats.dropped += 1;
    }

    pub fn status(&self) -> LedgerStatus {
        if self.records.is_empty() {
            LedgerStatus::NoRecords
        } else {
            LedgerStatus::Recognized(self.records.len())
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TransactionRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<TransactionRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a TransactionRecord;
    type IntoIter = std::slice::Iter<'a, TransactionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
