//! Layout policy: which numeric-column convention a document follows, and
//! which era convention its dates use.

use std::fmt;
use std::str::FromStr;

use passbook_core::{EraConfig, PassbookError};
use serde::{Deserialize, Serialize};

use crate::parsers::{DateShape, fixed_columns, marker_qualified, split_date_prefix};
use crate::width::fold_width;

pub const DEFAULT_MARKERS: &[char] = &['※'];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NumericLayout {
    /// Pick one of the others per document, see [`detect_layout`].
    Auto,
    /// Always three columns, a dash where an amount is missing.
    FixedColumns,
    /// One to three columns; the last is the balance.
    #[default]
    OptionalGroups,
    /// Amounts carry a marker glyph; the balance is the last unmarked number.
    MarkerQualified,
}

impl NumericLayout {
    pub fn as_str(self) -> &'static str {
        match self {
            NumericLayout::Auto => "auto",
            NumericLayout::FixedColumns => "fixed-columns",
            NumericLayout::OptionalGroups => "optional-groups",
            NumericLayout::MarkerQualified => "marker-qualified",
        }
    }
}

impl fmt::Display for NumericLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NumericLayout {
    type Err = PassbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(NumericLayout::Auto),
            "fixed" | "fixed-columns" => Ok(NumericLayout::FixedColumns),
            "optional" | "optional-groups" => Ok(NumericLayout::OptionalGroups),
            "marker" | "marker-qualified" => Ok(NumericLayout::MarkerQualified),
            other => Err(PassbookError::Config(format!(
                "unknown layout {:?} (expected auto, fixed, optional or marker)",
                other
            ))),
        }
    }
}

/// Everything the parser needs to know about a document's layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutPolicy {
    pub layout: NumericLayout,
    pub era: EraConfig,
    pub markers: Vec<char>,
}

impl LayoutPolicy {
    pub fn new(layout: NumericLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    pub fn with_era(mut self, era: EraConfig) -> Self {
        self.era = era;
        self
    }

    pub fn with_markers(mut self, markers: impl IntoIterator<Item = char>) -> Self {
        self.markers = markers.into_iter().collect();
        self
    }

    pub(crate) fn date_shape(&self) -> DateShape {
        DateShape::of(&self.era)
    }

    /// The concrete layout for `text`; only `Auto` looks at the text.
    pub fn resolve(&self, text: &str) -> NumericLayout {
        match self.layout {
            NumericLayout::Auto => detect_layout(text, self),
            layout => layout,
        }
    }
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            layout: NumericLayout::default(),
            era: EraConfig::default(),
            markers: DEFAULT_MARKERS.to_vec(),
        }
    }
}

/// Guess the numeric layout of a document.
///
/// Any dated line with a marked number means marker-qualified. Otherwise a
/// dated three-column row with a dash placeholder means fixed columns.
/// Everything else is read with optional groups.
pub fn detect_layout(text: &str, policy: &LayoutPolicy) -> NumericLayout {
    let shape = policy.date_shape();
    let mut dashed = false;

    for line in text.lines() {
        let line = fold_width(line);
        let Some((_, rest)) = split_date_prefix(&line, shape) else {
            continue;
        };
        if marker_qualified::has_marked_amount(rest, &policy.markers) {
            return NumericLayout::MarkerQualified;
        }
        if !dashed && fixed_columns::has_placeholder(&line, shape) {
            dashed = true;
        }
    }

    if dashed {
        NumericLayout::FixedColumns
    } else {
        NumericLayout::OptionalGroups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_accepts_short_and_long_names() {
        assert_eq!("fixed".parse::<NumericLayout>().unwrap(), NumericLayout::FixedColumns);
        assert_eq!(
            "Optional-Groups".parse::<NumericLayout>().unwrap(),
            NumericLayout::OptionalGroups
        );
        assert_eq!("marker".parse::<NumericLayout>().unwrap(), NumericLayout::MarkerQualified);
        assert_eq!("auto".parse::<NumericLayout>().unwrap(), NumericLayout::Auto);
        assert!("columns".parse::<NumericLayout>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for layout in [
            NumericLayout::Auto,
            NumericLayout::FixedColumns,
            NumericLayout::OptionalGroups,
            NumericLayout::MarkerQualified,
        ] {
            assert_eq!(layout.to_string().parse::<NumericLayout>().unwrap(), layout);
        }
    }

    #[test]
    fn test_detect_marker_layout() {
        let text = "Date Description\n05-06-28  Transfer ※10,000 ※20,000 30,000\n";
        assert_eq!(
            detect_layout(text, &LayoutPolicy::default()),
            NumericLayout::MarkerQualified
        );
    }

    #[test]
    fn test_detect_fixed_layout() {
        let text = "05-06-28 ATM 10,000 - 50,000\n05-06-30 Salary - 250,000 300,000\n";
        assert_eq!(detect_layout(text, &LayoutPolicy::default()), NumericLayout::FixedColumns);
    }

    #[test]
    fn test_detect_falls_back_to_optional_groups() {
        let text = "05-06-28 ATM 10,000 50,000\n\n05-07-01 Interest 50,003\n";
        assert_eq!(
            detect_layout(text, &LayoutPolicy::default()),
            NumericLayout::OptionalGroups
        );
        assert_eq!(detect_layout("", &LayoutPolicy::default()), NumericLayout::OptionalGroups);
    }

    #[test]
    fn test_detect_ignores_markers_on_undated_lines() {
        let text = "※ amounts marked with ※ 1 are fees\n05-06-28 ATM 10,000 50,000\n";
        assert_eq!(
            detect_layout(text, &LayoutPolicy::default()),
            NumericLayout::OptionalGroups
        );
    }

    #[test]
    fn test_resolve_keeps_explicit_layout() {
        let policy = LayoutPolicy::new(NumericLayout::FixedColumns);
        assert_eq!(policy.resolve("05-06-28 ※1 2"), NumericLayout::FixedColumns);
    }
}
