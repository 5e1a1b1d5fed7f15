//! Full-width to half-width folding for the characters the parsers care about.
//!
//! OCR of Japanese passbooks often yields `１０，０００` or `０５－０６－２８`.

use std::borrow::Cow;

pub fn fold_width(line: &str) -> Cow<'_, str> {
    if !line.chars().any(is_foldable) {
        return Cow::Borrowed(line);
    }
    Cow::Owned(line.chars().map(fold_char).collect())
}

fn is_foldable(c: char) -> bool {
    matches!(c, '０'..='９' | '，' | '－' | '−')
}

fn fold_char(c: char) -> char {
    match c {
        '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
        '，' => ',',
        '－' | '−' => '-',
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folds_digits_commas_and_dashes() {
        assert_eq!(fold_width("０５－０６－２８　振込　１０，０００"), "05-06-28　振込　10,000");
    }

    #[test]
    fn test_ascii_line_is_borrowed() {
        assert!(matches!(fold_width("05-06-28 ATM 1,000"), Cow::Borrowed(_)));
    }
}
