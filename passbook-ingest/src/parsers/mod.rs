//! Per-layout line parsers.
//!
//! Every parser looks at a single line and either returns its fields or
//! `None`. Lines are expected to be width-folded already.

pub mod fixed_columns;
pub mod marker_qualified;
pub mod optional_groups;

use once_cell::sync::Lazy;
use passbook_core::{EraConfig, EraConvention};
use regex::Regex;

/// `YY-MM-DD`
pub(crate) const DATE_BARE: &str = r"[0-9]{1,2}-[0-9]{1,2}-[0-9]{1,2}";
/// `C-YY-MM-DD`
pub(crate) const DATE_CODED: &str = r"[0-9]{1,2}-[0-9]{1,2}-[0-9]{1,2}-[0-9]{1,2}";

/// Shape of the date token that opens a transaction line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateShape {
    Bare,
    Coded,
}

impl DateShape {
    pub fn of(era: &EraConfig) -> Self {
        match era.convention {
            EraConvention::Implied { .. } => DateShape::Bare,
            EraConvention::Coded => DateShape::Coded,
        }
    }
}

/// Fields of one transaction line, date not yet normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFields<'a> {
    pub date_token: &'a str,
    pub description: String,
    pub withdrawal: Option<u64>,
    pub deposit: Option<u64>,
    pub balance: u64,
}

static DATE_PREFIX_BARE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&date_prefix_pattern(DATE_BARE)).unwrap());
static DATE_PREFIX_CODED: Lazy<Regex> =
    Lazy::new(|| Regex::new(&date_prefix_pattern(DATE_CODED)).unwrap());

fn date_prefix_pattern(date: &str) -> String {
    format!(r"^\s*(?P<date>{date})(?P<rest>\s.*)?$", date = date)
}

/// Split a dated line into its date token and the remainder.
/// The remainder is empty when the line holds only a date.
pub(crate) fn split_date_prefix(line: &str, shape: DateShape) -> Option<(&str, &str)> {
    let re = match shape {
        DateShape::Bare => &DATE_PREFIX_BARE,
        DateShape::Coded => &DATE_PREFIX_CODED,
    };
    let caps = re.captures(line)?;
    let date = caps.name("date")?.as_str();
    let rest = caps.name("rest").map(|m| m.as_str()).unwrap_or("");
    Some((date, rest))
}

pub(crate) fn clean_description(span: &str, markers: &[char]) -> String {
    span.trim_matches(|c: char| c.is_whitespace() || markers.contains(&c))
        .to_string()
}
