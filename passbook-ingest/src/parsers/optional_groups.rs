//! Layout where empty amount columns are simply left blank.
//!
//! One to three numeric groups trail the description. The last is the
//! balance; any before it fill withdrawal, then deposit:
//!   05-06-28  ATM withdrawal  10,000   50,000
//!   05-07-01  Interest                 50,003

use once_cell::sync::Lazy;
use regex::Regex;

use super::{DATE_BARE, DATE_CODED, DateShape, LineFields, clean_description};
use crate::amount::{NUMERIC_GROUP, parse_amount};

static ROW_BARE: Lazy<Regex> = Lazy::new(|| Regex::new(&row_pattern(DATE_BARE)).unwrap());
static ROW_CODED: Lazy<Regex> = Lazy::new(|| Regex::new(&row_pattern(DATE_CODED)).unwrap());

fn row_pattern(date: &str) -> String {
    format!(
        concat!(
            r"^\s*(?P<date>{date})",
            r"(?P<desc>\s.*?)?",
            r"(?P<amounts>(?:\s+{num}){{1,3}})\s*$"
        ),
        date = date,
        num = NUMERIC_GROUP,
    )
}

pub fn parse_line<'a>(line: &'a str, shape: DateShape, markers: &[char]) -> Option<LineFields<'a>> {
    let re = match shape {
        DateShape::Bare => &*ROW_BARE,
        DateShape::Coded => &*ROW_CODED,
    };
    let caps = re.captures(line)?;

    let groups: Vec<&str> = caps["amounts"].split_whitespace().collect();
    let (balance, leading) = groups.split_last()?;
    let balance = parse_amount(balance)?;

    Some(LineFields {
        date_token: caps.name("date")?.as_str(),
        description: caps
            .name("desc")
            .map(|m| clean_description(m.as_str(), markers))
            .unwrap_or_default(),
        withdrawal: leading.first().and_then(|g| parse_amount(g)),
        deposit: leading.get(1).and_then(|g| parse_amount(g)),
        balance,
    })
}
