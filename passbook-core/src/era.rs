//! Era (reign-year) date normalization.
//!
//! Passbooks print dates as `YY-MM-DD` counted from the start of the current
//! era, or as `C-YY-MM-DD` with a leading numeric era code. Neither form says
//! which era it means, so the caller picks the convention and supplies the
//! offsets through an [`EraTable`].
//!
//!   05-06-28      (implied Reiwa, offset 2018)  -> 2023-06-28
//!   4-31-04-30    (coded, 4 = Heisei)           -> 2019-04-30

use serde::{Deserialize, Serialize};

use crate::error::{PassbookError, Result};

/// A named era. `offset + reign_year` is the Gregorian year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Era {
    pub name: String,
    /// Gregorian year of reign-year 1, minus one (Reiwa began 2019 -> 2018).
    pub offset: i32,
    /// Numeric code used by the `C-YY-MM-DD` convention.
    #[serde(default)]
    pub code: Option<u32>,
    /// Display label, e.g. the kanji era name. Also accepted for lookups.
    #[serde(default)]
    pub label: Option<String>,
}

impl Era {
    pub fn new(name: impl Into<String>, offset: i32) -> Self {
        Self {
            name: name.into(),
            offset,
            code: None,
            label: None,
        }
    }

    pub fn with_code(mut self, code: u32) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn absolute_year(&self, reign_year: u32) -> Option<i32> {
        i32::try_from(reign_year).ok()?.checked_add(self.offset)
    }

    fn answers_to(&self, name: &str) -> bool {
        let name = name.trim();
        self.name.eq_ignore_ascii_case(name) || self.label.as_deref() == Some(name)
    }
}

/// Ordered set of eras, unique by name and by code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EraTable {
    eras: Vec<Era>,
}

impl EraTable {
    pub fn new() -> Self {
        Self { eras: Vec::new() }
    }

    /// Modern Japanese eras with the conventional 1-5 era codes.
    ///
    /// Source documents disagree on some offsets (Heisei 1988 vs 1989,
    /// Reiwa 2018 vs 2019); override with [`EraTable::set_offset`].
    pub fn japanese() -> Self {
        Self {
            eras: vec![
                Era::new("meiji", 1867).with_code(1).with_label("明治"),
                Era::new("taisho", 1911).with_code(2).with_label("大正"),
                Era::new("showa", 1925).with_code(3).with_label("昭和"),
                Era::new("heisei", 1988).with_code(4).with_label("平成"),
                Era::new("reiwa", 2018).with_code(5).with_label("令和"),
            ],
        }
    }

    pub fn get(&self, name: &str) -> Option<&Era> {
        self.eras.iter().find(|e| e.answers_to(name))
    }

    pub fn by_code(&self, code: u32) -> Option<&Era> {
        self.eras.iter().find(|e| e.code == Some(code))
    }

    /// Add an era, replacing any existing era of the same name. An era code
    /// moves to the inserted era; the previous holder keeps its name and
    /// offset but no longer answers to the code.
    pub fn insert(&mut self, era: Era) {
        if era.code.is_some() {
            for e in self.eras.iter_mut().filter(|e| e.code == era.code) {
                e.code = None;
            }
        }
        match self.eras.iter_mut().find(|e| e.answers_to(&era.name)) {
            Some(existing) => *existing = era,
            None => self.eras.push(era),
        }
    }

    /// Returns false when no era answers to `name`.
    pub fn set_offset(&mut self, name: &str, offset: i32) -> bool {
        match self.eras.iter_mut().find(|e| e.answers_to(name)) {
            Some(era) => {
                era.offset = offset;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Era> {
        self.eras.iter()
    }

    pub fn len(&self) -> usize {
        self.eras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eras.is_empty()
    }
}

impl Default for EraTable {
    fn default() -> Self {
        Self::japanese()
    }
}

/// How the first group(s) of a date token select the era.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "convention", rename_all = "kebab-case")]
pub enum EraConvention {
    /// `YY-MM-DD`, every date belongs to the named era.
    Implied { era: String },
    /// `C-YY-MM-DD`, `C` is an era code from the table.
    Coded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EraConfig {
    pub convention: EraConvention,
    pub table: EraTable,
}

impl EraConfig {
    pub fn implied(era: impl Into<String>) -> Self {
        Self {
            convention: EraConvention::Implied { era: era.into() },
            table: EraTable::default(),
        }
    }

    pub fn coded() -> Self {
        Self {
            convention: EraConvention::Coded,
            table: EraTable::default(),
        }
    }

    pub fn with_table(mut self, table: EraTable) -> Self {
        self.table = table;
        self
    }

    /// Number of hyphen-separated groups in a date token.
    pub fn group_count(&self) -> usize {
        match self.convention {
            EraConvention::Implied { .. } => 3,
            EraConvention::Coded => 4,
        }
    }

    /// Check that the convention can resolve against the table.
    pub fn validate(&self) -> Result<()> {
        match &self.convention {
            EraConvention::Implied { era } => {
                if self.table.get(era).is_none() {
                    return Err(PassbookError::Config(format!(
                        "era {:?} is not in the era table",
                        era
                    )));
                }
            }
            EraConvention::Coded => {
                if self.table.iter().all(|e| e.code.is_none()) {
                    return Err(PassbookError::Config(
                        "coded era convention needs at least one era with a code".to_string(),
                    ));
                }
                let mut seen = Vec::new();
                for code in self.table.iter().filter_map(|e| e.code) {
                    if seen.contains(&code) {
                        return Err(PassbookError::Config(format!(
                            "era code {} is used by more than one era",
                            code
                        )));
                    }
                    seen.push(code);
                }
            }
        }
        Ok(())
    }
}

impl Default for EraConfig {
    fn default() -> Self {
        Self::implied("reiwa")
    }
}

/// Convert an era-dated token to `YYYY-MM-DD`.
///
/// Month and day are zero-padded but not range-checked. A token that cannot
/// be read under `config` comes back unchanged.
pub fn normalize_era_date(token: &str, config: &EraConfig) -> String {
    try_normalize(token, config).unwrap_or_else(|| token.to_string())
}

fn try_normalize(token: &str, config: &EraConfig) -> Option<String> {
    let groups = token
        .trim()
        .split('-')
        .map(parse_group)
        .collect::<Option<Vec<u32>>>()?;

    let (era, ymd) = match &config.convention {
        EraConvention::Implied { era } => (config.table.get(era)?, &groups[..]),
        EraConvention::Coded => {
            let (code, rest) = groups.split_first()?;
            (config.table.by_code(*code)?, rest)
        }
    };

    let [year, month, day] = ymd else {
        return None;
    };
    let year = era.absolute_year(*year)?;
    Some(format!("{:04}-{:02}-{:02}", year, month, day))
}

fn parse_group(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reiwa_2018() -> EraConfig {
        EraConfig::implied("reiwa")
    }

    #[test]
    fn test_reiwa_offset() {
        assert_eq!(normalize_era_date("5-6-28", &reiwa_2018()), "2023-06-28");
        assert_eq!(normalize_era_date("05-06-28", &reiwa_2018()), "2023-06-28");
        assert_eq!(normalize_era_date("01-05-01", &reiwa_2018()), "2019-05-01");
    }

    #[test]
    fn test_offset_plus_year_for_every_preset() {
        let table = EraTable::japanese();
        for era in table.iter() {
            let cfg = EraConfig::implied(era.name.clone());
            for year in [1u32, 9, 10, 31, 64] {
                let out = normalize_era_date(&format!("{}-1-2", year), &cfg);
                assert_eq!(out, format!("{:04}-01-02", era.offset + year as i32));
            }
        }
    }

    #[test]
    fn test_out_of_range_month_and_day_still_formatted() {
        assert_eq!(normalize_era_date("5-13-45", &reiwa_2018()), "2023-13-45");
        assert_eq!(normalize_era_date("5-0-0", &reiwa_2018()), "2023-00-00");
    }

    #[test]
    fn test_malformed_tokens_pass_through() {
        let cfg = reiwa_2018();
        for raw in ["abc", "5-6", "", "5-6-28-1", "5--28", "5-O6-28", "+5-6-28", "5-6-28x"] {
            assert_eq!(normalize_era_date(raw, &cfg), raw);
        }
    }

    #[test]
    fn test_unknown_implied_era_passes_through() {
        let cfg = EraConfig::implied("kamakura");
        assert_eq!(normalize_era_date("5-6-28", &cfg), "5-6-28");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_coded_convention() {
        let cfg = EraConfig::coded();
        assert_eq!(normalize_era_date("4-31-04-30", &cfg), "2019-04-30");
        assert_eq!(normalize_era_date("5-01-05-01", &cfg), "2019-05-01");
        assert_eq!(normalize_era_date("3-64-01-07", &cfg), "1989-01-07");
        // unknown code and a bare 3-group token both pass through
        assert_eq!(normalize_era_date("9-01-01-01", &cfg), "9-01-01-01");
        assert_eq!(normalize_era_date("05-06-28", &cfg), "05-06-28");
    }

    #[test]
    fn test_offset_override() {
        let mut table = EraTable::japanese();
        assert!(table.set_offset("heisei", 1989));
        assert!(!table.set_offset("kamakura", 1185));

        let cfg = EraConfig::implied("平成").with_table(table);
        assert_eq!(normalize_era_date("1-1-8", &cfg), "1990-01-08");
    }

    #[test]
    fn test_insert_replaces_by_name() {
        let mut table = EraTable::japanese();
        let before = table.len();
        table.insert(Era::new("Reiwa", 2019).with_code(5));
        table.insert(Era::new("custom", 2000).with_code(9));
        assert_eq!(table.len(), before + 1);
        assert_eq!(table.get("reiwa").map(|e| e.offset), Some(2019));
        assert_eq!(table.by_code(9).map(|e| e.name.as_str()), Some("custom"));
    }

    #[test]
    fn test_insert_takes_over_code() {
        let mut table = EraTable::japanese();
        table.insert(Era::new("reiwa-alt", 2019).with_code(5));

        let coded = EraConfig::coded().with_table(table.clone());
        assert!(coded.validate().is_ok());
        assert_eq!(normalize_era_date("5-05-06-28", &coded), "2024-06-28");

        // the old holder still works by name
        assert_eq!(table.get("reiwa").map(|e| (e.offset, e.code)), Some((2018, None)));
        let implied = EraConfig::implied("reiwa").with_table(table);
        assert_eq!(normalize_era_date("05-06-28", &implied), "2023-06-28");
    }

    #[test]
    fn test_validate_rejects_duplicate_codes() {
        let table: EraTable = serde_json::from_str(
            r#"[{"name":"heisei","offset":1988,"code":4},{"name":"reiwa","offset":2018,"code":4}]"#,
        )
        .unwrap();
        assert!(EraConfig::coded().with_table(table).validate().is_err());
    }

    #[test]
    fn test_validate_coded_needs_codes() {
        let mut table = EraTable::new();
        table.insert(Era::new("reiwa", 2018));
        assert!(EraConfig::coded().with_table(table).validate().is_err());
        assert!(EraConfig::coded().validate().is_ok());
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert_eq!(normalize_era_date(" 5-6-28 ", &reiwa_2018()), "2023-06-28");
    }
}
