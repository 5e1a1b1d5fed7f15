//! Five-column table export (CSV, JSON).
//!
//! CSV output carries a UTF-8 byte-order mark by default so spreadsheet
//! tools in Japanese locales pick the right encoding.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::{Ledger, TransactionRecord};

pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderStyle {
    #[default]
    Japanese,
    English,
}

impl HeaderStyle {
    pub fn labels(self) -> [&'static str; 5] {
        match self {
            HeaderStyle::Japanese => ["日付", "摘要", "支払金", "預かり金", "残高"],
            HeaderStyle::English => ["date", "description", "withdrawal", "deposit", "balance"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvOptions {
    pub bom: bool,
    pub headers: HeaderStyle,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            bom: true,
            headers: HeaderStyle::Japanese,
        }
    }
}

pub fn write_csv<W: Write>(mut w: W, records: &[TransactionRecord], opts: &CsvOptions) -> Result<()> {
    if opts.bom {
        w.write_all(UTF8_BOM)?;
    }

    let mut wtr = csv::Writer::from_writer(w);
    wtr.write_record(opts.headers.labels())?;
    for record in records {
        wtr.write_record(record.cells())?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn to_csv_bytes(records: &[TransactionRecord], opts: &CsvOptions) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(&mut buf, records, opts)?;
    Ok(buf)
}

pub fn write_json<W: Write>(w: W, ledger: &Ledger) -> Result<()> {
    serde_json::to_writer_pretty(w, ledger)?;
    Ok(())
}
