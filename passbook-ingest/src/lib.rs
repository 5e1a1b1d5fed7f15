//! passbook-ingest: line-oriented parsing of passbook text (OCR or PDF text layer)
//! into a [`Ledger`](passbook_core::Ledger).

pub mod amount;
pub mod layout;
pub mod ledger;
pub mod parsers;
pub mod width;

pub use layout::{DEFAULT_MARKERS, LayoutPolicy, NumericLayout, detect_layout};
pub use ledger::{parse_ledger, parse_ledger_parallel, parse_line};
