//! Numeric groups as printed in passbooks: digits with optional thousands separators.

/// One numeric group. ASCII digits only; run [`fold_width`](crate::width::fold_width) first.
pub(crate) const NUMERIC_GROUP: &str = r"[0-9][0-9,]*";

/// Printed in an amount column that has no value.
pub(crate) const PLACEHOLDER: &str = r"[-ー—]";

/// Strip thousands separators and read the group as an integer.
///
/// Returns `None` for anything that is not a numeric group or does not fit in `u64`.
pub fn parse_amount(group: &str) -> Option<u64> {
    if !is_numeric_group(group) {
        return None;
    }
    let digits: String = group.chars().filter(|c| *c != ',').collect();
    digits.parse().ok()
}

pub fn is_numeric_group(s: &str) -> bool {
    s.starts_with(|c: char| c.is_ascii_digit()) && s.chars().all(|c| c.is_ascii_digit() || c == ',')
}

pub fn is_placeholder(s: &str) -> bool {
    matches!(s, "-" | "ー" | "—")
}
