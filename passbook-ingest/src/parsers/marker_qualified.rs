//! Layout where amounts are tagged with a marker glyph.
//!
//! Some passbooks print branch numbers or reference codes next to the
//! amounts. Only numbers carrying a marker (`※10,000`, `※ 10,000`,
//! `10,000※` or glued `※10,000※20,000`) are amounts; the balance is the
//! last unmarked number:
//!   05-06-28  Transfer 012 ※10,000 ※20,000 30,000

use once_cell::sync::Lazy;
use regex::Regex;

use super::{DateShape, LineFields, clean_description, split_date_prefix};
use crate::amount::{is_numeric_group, parse_amount};

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").unwrap());

#[derive(Debug, Clone, Copy)]
struct NumberToken {
    start: usize,
    marked: bool,
    value: Option<u64>,
}

/// Non-marker run inside a whitespace token, offsets relative to the token.
#[derive(Debug)]
struct Piece<'a> {
    at: usize,
    text: &'a str,
    marker_at: Option<usize>,
}

/// Split a whitespace token at marker glyphs. OCR often loses the space
/// between amounts, so `※10,000※20,000` yields two pieces, each tagged by
/// the marker in front of it.
fn split_on_markers<'a>(token: &'a str, markers: &[char]) -> Vec<Piece<'a>> {
    let mut pieces = Vec::new();
    let mut marker_at: Option<usize> = None;
    let mut start: Option<usize> = None;

    for (i, c) in token.char_indices() {
        if markers.contains(&c) {
            match start.take() {
                Some(s) => {
                    pieces.push(Piece { at: s, text: &token[s..i], marker_at });
                    marker_at = Some(i);
                }
                None if marker_at.is_none() => marker_at = Some(i),
                None => {}
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        pieces.push(Piece { at: s, text: &token[s..], marker_at });
    }

    pieces
}

/// Numeric tokens of `rest` in order, with their byte offsets into `rest`.
fn number_tokens(rest: &str, markers: &[char]) -> Vec<NumberToken> {
    let mut out = Vec::new();
    let mut pending: Option<usize> = None;

    for m in TOKEN.find_iter(rest) {
        let token = m.as_str();
        let pieces = split_on_markers(token, markers);
        if pieces.is_empty() {
            // detached marker, applies to the next number
            pending = Some(m.start());
            continue;
        }

        let last = pieces.len() - 1;
        for (i, piece) in pieces.iter().enumerate() {
            if !is_numeric_group(piece.text) {
                continue;
            }
            let carried = if i == 0 { pending } else { None };
            let lead = carried.or(piece.marker_at.map(|at| m.start() + at));
            // `10,000※`: a marker closing the token tags the number before it
            let trailing = i == last && piece.at + piece.text.len() < token.len();
            out.push(NumberToken {
                start: lead.unwrap_or(m.start() + piece.at),
                marked: lead.is_some() || trailing,
                value: parse_amount(piece.text),
            });
        }
        pending = None;
    }

    out
}

pub fn parse_line<'a>(line: &'a str, shape: DateShape, markers: &[char]) -> Option<LineFields<'a>> {
    let (date_token, rest) = split_date_prefix(line, shape)?;
    let tokens = number_tokens(rest, markers);

    let balance_at = tokens.iter().rposition(|t| !t.marked)?;
    let balance_token = tokens[balance_at];
    let balance = balance_token.value?;

    let mut amounts = tokens[..balance_at].iter().filter(|t| t.marked);
    let first = amounts.next();
    let second = amounts.next();

    let desc_end = first.map(|t| t.start).unwrap_or(balance_token.start);

    Some(LineFields {
        date_token,
        description: clean_description(&rest[..desc_end], markers),
        withdrawal: first.and_then(|t| t.value),
        deposit: second.and_then(|t| t.value),
        balance,
    })
}

/// True when a dated line's remainder has at least one marked number.
pub(crate) fn has_marked_amount(rest: &str, markers: &[char]) -> bool {
    number_tokens(rest, markers).iter().any(|t| t.marked)
}
