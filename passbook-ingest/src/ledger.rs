//! Document-level parsing: text in, ledger out.
//!
//! Each line is classified on its own, with no state carried between lines.
//! A transaction whose description wraps onto a second line keeps only its
//! first line; the continuation is dropped like any other unmatched line.

use passbook_core::{Ledger, TransactionRecord, normalize_era_date};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::layout::{LayoutPolicy, NumericLayout, detect_layout};
use crate::parsers::{LineFields, fixed_columns, marker_qualified, optional_groups};
use crate::width::fold_width;

enum LineOutcome {
    Blank,
    Record(TransactionRecord),
    Dropped,
}

/// Parse one line under `policy`.
///
/// With [`NumericLayout::Auto`] the layout is detected from this line alone.
pub fn parse_line(line: &str, policy: &LayoutPolicy) -> Option<TransactionRecord> {
    let layout = policy.resolve(line);
    match classify(line, layout, policy) {
        LineOutcome::Record(record) => Some(record),
        LineOutcome::Blank | LineOutcome::Dropped => None,
    }
}

/// Parse a whole document. Never fails: unrecognized lines are dropped and
/// an unrecognizable document yields an empty ledger.
pub fn parse_ledger(text: &str, policy: &LayoutPolicy) -> Ledger {
    let layout = resolve_layout(text, policy);

    let mut ledger = Ledger::new();
    for (n, line) in text.lines().enumerate() {
        record_outcome(&mut ledger, n, line, classify(line, layout, policy));
    }

    log_summary(&ledger, layout);
    ledger
}

/// Same result as [`parse_ledger`], classifying lines on the rayon pool.
pub fn parse_ledger_parallel(text: &str, policy: &LayoutPolicy) -> Ledger {
    let layout = resolve_layout(text, policy);

    let lines: Vec<&str> = text.lines().collect();
    let outcomes: Vec<LineOutcome> = lines
        .par_iter()
        .map(|line| classify(line, layout, policy))
        .collect();

    let mut ledger = Ledger::new();
    for (n, (line, outcome)) in lines.iter().zip(outcomes).enumerate() {
        record_outcome(&mut ledger, n, line, outcome);
    }

    log_summary(&ledger, layout);
    ledger
}

fn resolve_layout(text: &str, policy: &LayoutPolicy) -> NumericLayout {
    match policy.layout {
        NumericLayout::Auto => {
            let detected = detect_layout(text, policy);
            debug!(layout = %detected, "detected numeric layout");
            detected
        }
        layout => layout,
    }
}

fn classify(line: &str, layout: NumericLayout, policy: &LayoutPolicy) -> LineOutcome {
    if line.trim().is_empty() {
        return LineOutcome::Blank;
    }

    let line = fold_width(line);
    let shape = policy.date_shape();
    let markers = &policy.markers;

    let fields = match layout {
        NumericLayout::FixedColumns => fixed_columns::parse_line(&line, shape, markers),
        NumericLayout::OptionalGroups | NumericLayout::Auto => {
            optional_groups::parse_line(&line, shape, markers)
        }
        NumericLayout::MarkerQualified => marker_qualified::parse_line(&line, shape, markers),
    };

    match fields {
        Some(fields) => LineOutcome::Record(to_record(fields, policy)),
        None => LineOutcome::Dropped,
    }
}

fn to_record(fields: LineFields<'_>, policy: &LayoutPolicy) -> TransactionRecord {
    TransactionRecord {
        date: normalize_era_date(fields.date_token, &policy.era),
        description: fields.description,
        withdrawal: fields.withdrawal,
        deposit: fields.deposit,
        balance: fields.balance,
    }
}

fn record_outcome(ledger: &mut Ledger, n: usize, line: &str, outcome: LineOutcome) {
    match outcome {
        LineOutcome::Blank => ledger.skip_blank(),
        LineOutcome::Record(record) => ledger.push(record),
        LineOutcome::Dropped => {
            trace!(line = n + 1, text = line, "dropped unrecognized line");
            ledger.drop_line();
        }
    }
}

fn log_summary(ledger: &Ledger, layout: NumericLayout) {
    debug!(
        layout = %layout,
        lines = ledger.stats.lines,
        accepted = ledger.stats.accepted,
        dropped = ledger.stats.dropped,
        "parsed passbook text"
    );
}
