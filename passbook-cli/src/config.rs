use anyhow::{Context, Result, bail};
use passbook_core::{CsvOptions, Era, EraConfig, EraConvention, EraTable, HeaderStyle};
use passbook_ingest::{DEFAULT_MARKERS, LayoutPolicy, NumericLayout};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parse: ParseSection,
    pub era: EraSection,
    pub export: ExportSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseSection {
    pub layout: NumericLayout,
    /// Glyphs that tag amounts in the marker-qualified layout.
    pub markers: Vec<char>,
    /// Classify lines on all cores. Output order is unchanged.
    pub parallel: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConventionName {
    Implied,
    Coded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EraSection {
    pub convention: ConventionName,
    /// Era for the implied convention.
    pub era: String,
    /// Added to the built-in era table; an entry with an existing name
    /// replaces it (e.g. `{ name = "reiwa", offset = 2019, code = 5 }`) and
    /// an entry with an existing code takes that code over.
    pub eras: Vec<Era>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSection {
    pub bom: bool,
    pub headers: HeaderStyle,
}

impl Default for ParseSection {
    fn default() -> Self {
        Self {
            layout: NumericLayout::Auto,
            markers: DEFAULT_MARKERS.to_vec(),
            parallel: false,
        }
    }
}

impl Default for EraSection {
    fn default() -> Self {
        Self {
            convention: ConventionName::Implied,
            era: "reiwa".to_string(),
            eras: Vec::new(),
        }
    }
}

impl Default for ExportSection {
    fn default() -> Self {
        let csv = CsvOptions::default();
        Self {
            bom: csv.bom,
            headers: csv.headers,
        }
    }
}

impl Config {
    pub fn era_table(&self) -> EraTable {
        let mut table = EraTable::japanese();
        for era in &self.era.eras {
            table.insert(era.clone());
        }
        table
    }

    pub fn era_config(&self) -> Result<EraConfig> {
        let convention = match self.era.convention {
            ConventionName::Implied => EraConvention::Implied {
                era: self.era.era.clone(),
            },
            ConventionName::Coded => EraConvention::Coded,
        };
        let cfg = EraConfig {
            convention,
            table: self.era_table(),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn layout_policy(&self) -> Result<LayoutPolicy> {
        if self.parse.markers.is_empty()
            && matches!(self.parse.layout, NumericLayout::MarkerQualified)
        {
            bail!("layout marker-qualified needs at least one marker glyph");
        }
        Ok(LayoutPolicy {
            layout: self.parse.layout,
            era: self.era_config()?,
            markers: self.parse.markers.clone(),
        })
    }

    pub fn csv_options(&self) -> CsvOptions {
        CsvOptions {
            bom: self.export.bom,
            headers: self.export.headers,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    state::config_file()
}

/// Load `explicit` (which must exist) or the default config file, falling
/// back to built-in defaults when the default file is absent.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let p = match explicit {
        Some(p) => {
            if !p.exists() {
                bail!("config not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => config_path()?,
    };
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    Ok(toml::from_str(s)?)
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(explicit: Option<&Path>) -> Result<()> {
    let p = match explicit {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&p, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
