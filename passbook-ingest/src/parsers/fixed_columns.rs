//! Fixed three-column layout.
//!
//! Every row prints withdrawal, deposit and balance; an empty amount column
//! shows a dash:
//!   05-06-28   ATM withdrawal      10,000         -      50,000
//!   05-06-30   Salary                   -   250,000     300,000

use once_cell::sync::Lazy;
use regex::Regex;

use super::{DATE_BARE, DATE_CODED, DateShape, LineFields, clean_description};
use crate::amount::{NUMERIC_GROUP, PLACEHOLDER, is_placeholder, parse_amount};

static ROW_BARE: Lazy<Regex> = Lazy::new(|| Regex::new(&row_pattern(DATE_BARE)).unwrap());
static ROW_CODED: Lazy<Regex> = Lazy::new(|| Regex::new(&row_pattern(DATE_CODED)).unwrap());

fn row_pattern(date: &str) -> String {
    format!(
        concat!(
            r"^\s*(?P<date>{date})\s+",
            r"(?:(?P<desc>.*?)\s+)?",
            r"(?P<withdrawal>{num}|{ph})\s+",
            r"(?P<deposit>{num}|{ph})\s+",
            r"(?P<balance>{num})\s*$"
        ),
        date = date,
        num = NUMERIC_GROUP,
        ph = PLACEHOLDER,
    )
}

fn row_regex(shape: DateShape) -> &'static Regex {
    match shape {
        DateShape::Bare => &*ROW_BARE,
        DateShape::Coded => &*ROW_CODED,
    }
}

pub fn parse_line<'a>(line: &'a str, shape: DateShape, markers: &[char]) -> Option<LineFields<'a>> {
    let caps = row_regex(shape).captures(line)?;
    let balance = parse_amount(caps.name("balance")?.as_str())?;

    Some(LineFields {
        date_token: caps.name("date")?.as_str(),
        description: caps
            .name("desc")
            .map(|m| clean_description(m.as_str(), markers))
            .unwrap_or_default(),
        withdrawal: parse_amount(&caps["withdrawal"]),
        deposit: parse_amount(&caps["deposit"]),
        balance,
    })
}

/// True when the line is a three-column row with at least one dash placeholder.
pub(crate) fn has_placeholder(line: &str, shape: DateShape) -> bool {
    row_regex(shape)
        .captures(line)
        .map(|caps| is_placeholder(&caps["withdrawal"]) || is_placeholder(&caps["deposit"]))
        .unwrap_or(false)
}
