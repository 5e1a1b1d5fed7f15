use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use passbook_core::{
    Era, HeaderStyle, Ledger, LedgerStatus, normalize_era_date, to_csv_bytes, write_json,
};
use passbook_ingest::{NumericLayout, parse_ledger, parse_ledger_parallel};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod state;
mod table;

use config::{Config, ConventionName};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("PASSBOOK_BUILD_SHA"),
    ", ",
    env!("PASSBOOK_BUILD_PROFILE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(
    name = "passbook",
    version,
    long_version = LONG_VERSION,
    about = "Turn passbook page text into a date/description/withdrawal/deposit/balance ledger"
)]
struct Cli {
    /// Config file (default: $PASSBOOK_HOME/config.toml or ~/.passbook/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More logging on stderr (-v debug, -vv trace). PASSBOOK_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse extracted page text into a ledger
    Parse(ParseArgs),

    /// Normalize a single era-dated token, e.g. `05-06-28`
    Date {
        token: String,

        #[command(flatten)]
        era: EraArgs,
    },

    /// Show the effective era table
    Eras,

    /// Write a default config file
    InitConfig,
}

#[derive(Args, Debug)]
struct EraArgs {
    /// Era for bare `YY-MM-DD` dates (reiwa, heisei, showa, ... or 令和)
    #[arg(long)]
    era: Option<String>,

    /// Dates carry a leading era code: `C-YY-MM-DD`
    #[arg(long, conflicts_with = "era")]
    coded: bool,
}

#[derive(Args, Debug)]
struct ParseArgs {
    /// Text extracted from the passbook (OCR output or PDF text layer). Reads stdin when omitted.
    input: Option<PathBuf>,

    /// auto, fixed, optional or marker
    #[arg(long)]
    layout: Option<NumericLayout>,

    /// Amount marker glyph for the marker layout (repeatable)
    #[arg(long = "marker")]
    markers: Vec<char>,

    #[command(flatten)]
    era: EraArgs,

    /// Write the ledger as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the ledger as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Omit the UTF-8 byte-order mark from CSV output
    #[arg(long)]
    no_bom: bool,

    /// English column headers instead of 日付/摘要/支払金/預かり金/残高
    #[arg(long)]
    english_headers: bool,

    /// Classify lines in parallel
    #[arg(long)]
    parallel: bool,

    /// Do not print the table
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Parse(args) => {
            let mut cfg = config::load_config(cli.config.as_deref())?;
            apply_parse_args(&mut cfg, &args);
            run_parse(&cfg, &args).await?;
        }

        Command::Date { token, era } => {
            let mut cfg = config::load_config(cli.config.as_deref())?;
            apply_era_args(&mut cfg, &era);
            let era_cfg = cfg.era_config()?;
            println!("{}", normalize_era_date(&token, &era_cfg));
        }

        Command::Eras => {
            let cfg = config::load_config(cli.config.as_deref())?;
            println!("{:<10} {:<6} {:>4} {:>6} {:>10}", "name", "label", "code", "offset", "first year");
            for era in cfg.era_table().iter() {
                println!("{}", era_row(era));
            }
        }

        Command::InitConfig => {
            config::init_config(cli.config.as_deref())?;
        }
    }

    Ok(())
}

fn era_row(era: &Era) -> String {
    format!(
        "{:<10} {:<6} {:>4} {:>6} {:>10}",
        era.name,
        era.label.as_deref().unwrap_or("-"),
        era.code.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string()),
        era.offset,
        era.offset.saturating_add(1)
    )
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("PASSBOOK_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn apply_era_args(cfg: &mut Config, args: &EraArgs) {
    if args.coded {
        cfg.era.convention = ConventionName::Coded;
    } else if let Some(era) = &args.era {
        cfg.era.convention = ConventionName::Implied;
        cfg.era.era = era.clone();
    }
}

fn apply_parse_args(cfg: &mut Config, args: &ParseArgs) {
    apply_era_args(cfg, &args.era);
    if let Some(layout) = args.layout {
        cfg.parse.layout = layout;
    }
    if !args.markers.is_empty() {
        cfg.parse.markers = args.markers.clone();
    }
    if args.parallel {
        cfg.parse.parallel = true;
    }
    if args.no_bom {
        cfg.export.bom = false;
    }
    if args.english_headers {
        cfg.export.headers = HeaderStyle::English;
    }
}

async fn read_input(input: Option<&Path>) -> Result<String> {
    let bytes = match input {
        Some(p) => tokio::fs::read(p)
            .await
            .with_context(|| format!("read {}", p.display()))?,
        None => {
            let mut buf = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut buf)
                .await
                .context("read stdin")?;
            buf
        }
    };

    let text = String::from_utf8_lossy(&bytes);
    Ok(text.strip_prefix('\u{feff}').unwrap_or(&text).to_string())
}

async fn run_parse(cfg: &Config, args: &ParseArgs) -> Result<()> {
    let policy = cfg.layout_policy()?;
    let source = args
        .input
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdin".to_string());

    let text = read_input(args.input.as_deref()).await?;
    debug!(source = %source, bytes = text.len(), "read input");

    let ledger = if cfg.parse.parallel {
        parse_ledger_parallel(&text, &policy)
    } else {
        parse_ledger(&text, &policy)
    };

    match ledger.status() {
        LedgerStatus::NoRecords => {
            warn!(source = %source, lines = ledger.stats.lines, "no transactions recognized");
            eprintln!(
                "No transactions recognized in {} ({} lines). Check the layout (--layout) and era settings (--era/--coded).",
                source, ledger.stats.lines
            );
        }
        LedgerStatus::Recognized(n) if !args.quiet => {
            print!("{}", table::render_table(&ledger.records, cfg.export.headers));
            println!(
                "\nParsed {} transactions from {} ({} lines, {} dropped, layout {})",
                n,
                source,
                ledger.stats.lines,
                ledger.stats.dropped,
                policy.resolve(&text)
            );
        }
        LedgerStatus::Recognized(_) => {}
    }

    let undated = ledger.iter().filter(|r| r.calendar_date().is_none()).count();
    if undated > 0 {
        warn!(count = undated, "records with dates that are not valid calendar dates");
    }

    for export in planned_exports(&ledger, args) {
        let (path, bytes) = match export {
            Export::Csv(path) => (path, to_csv_bytes(&ledger.records, &cfg.csv_options())?),
            Export::Json(path) => {
                let mut buf = Vec::new();
                write_json(&mut buf, &ledger)?;
                (path, buf)
            }
        };
        tokio::fs::write(path, bytes)
            .await
            .with_context(|| format!("write {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Export<'a> {
    Csv(&'a Path),
    Json(&'a Path),
}

/// Files requested on the command line. An empty ledger writes none, so a
/// wrong layout never overwrites a good export with a header-only file.
fn planned_exports<'a>(ledger: &Ledger, args: &'a ParseArgs) -> Vec<Export<'a>> {
    if let LedgerStatus::NoRecords = ledger.status() {
        return Vec::new();
    }
    let mut out = Vec::new();
    if let Some(path) = &args.csv {
        out.push(Export::Csv(path));
    }
    if let Some(path) = &args.json {
        out.push(Export::Json(path));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use passbook_ingest::LayoutPolicy;

    fn parse_args(argv: &[&str]) -> ParseArgs {
        let cli = Cli::try_parse_from(argv.iter().copied()).unwrap();
        match cli.command {
            Command::Parse(args) => args,
            other => panic!("expected parse, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_flags_override_config() {
        let args = parse_args(&[
            "passbook",
            "parse",
            "page.txt",
            "--layout",
            "marker",
            "--marker",
            "*",
            "--marker",
            "※",
            "--coded",
            "--no-bom",
            "--english-headers",
            "--parallel",
        ]);
        let mut cfg = Config::default();
        apply_parse_args(&mut cfg, &args);

        assert_eq!(cfg.parse.layout, NumericLayout::MarkerQualified);
        assert_eq!(cfg.parse.markers, vec!['*', '※']);
        assert_eq!(cfg.era.convention, ConventionName::Coded);
        assert!(cfg.parse.parallel);
        assert!(!cfg.export.bom);
        assert_eq!(cfg.export.headers, HeaderStyle::English);
        assert_eq!(args.input.as_deref(), Some(Path::new("page.txt")));
    }

    #[test]
    fn test_missing_flags_keep_config() {
        let mut cfg = config::parse_config(
            r#"
[parse]
layout = "fixed-columns"
markers = ["*"]

[era]
convention = "coded"

[export]
bom = false
"#,
        )
        .unwrap();
        let args = parse_args(&["passbook", "parse"]);
        apply_parse_args(&mut cfg, &args);

        assert_eq!(cfg.parse.layout, NumericLayout::FixedColumns);
        assert_eq!(cfg.parse.markers, vec!['*']);
        assert_eq!(cfg.era.convention, ConventionName::Coded);
        assert!(!cfg.export.bom);
        assert!(args.input.is_none());
    }

    #[test]
    fn test_era_flag_switches_to_implied() {
        let mut cfg = config::parse_config("[era]\nconvention = \"coded\"\n").unwrap();
        let args = parse_args(&["passbook", "parse", "--era", "heisei"]);
        apply_parse_args(&mut cfg, &args);
        assert_eq!(cfg.era.convention, ConventionName::Implied);
        assert_eq!(cfg.era.era, "heisei");

        assert!(Cli::try_parse_from(["passbook", "parse", "--era", "heisei", "--coded"]).is_err());
    }

    #[test]
    fn test_empty_ledger_skips_exports() {
        let args = parse_args(&["passbook", "parse", "--csv", "out.csv", "--json", "out.json"]);
        let policy = LayoutPolicy::default();

        let empty = parse_ledger("page 1\nno dated rows here\n", &policy);
        assert!(planned_exports(&empty, &args).is_empty());

        let ledger = parse_ledger("05-06-28  ATM  10,000  50,000\n", &policy);
        assert_eq!(
            planned_exports(&ledger, &args),
            vec![Export::Csv(Path::new("out.csv")), Export::Json(Path::new("out.json"))]
        );
    }

    #[test]
    fn test_era_row() {
        let reiwa = Era::new("reiwa", 2018).with_code(5).with_label("令和");
        let row = era_row(&reiwa);
        assert!(row.starts_with("reiwa      令和"));
        assert!(row.ends_with("  2018       2019"));

        let row = era_row(&Era::new("x", i32::MAX));
        assert!(row.ends_with("2147483647 2147483647"));
    }
}
