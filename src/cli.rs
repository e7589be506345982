//! CLI definition and dispatch.

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::adapters::bootstrap::{import_into, load_or_seed};
use crate::adapters::csv_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_state_adapter::JsonFileStateAdapter;
use crate::adapters::state_document::export_document;
use crate::domain::config_validation::validate_config;
use crate::domain::error::FolioError;
use crate::domain::goal::{project_goals, GoalProjection};
use crate::domain::price_resolver::{latest_price, price_at};
use crate::domain::snapshot::PortfolioSnapshot;
use crate::domain::timeline::{sample_timestamps_in, start_of_day_millis, TimeRange};
use crate::domain::valuation::{self, HoldingRow, Totals};
use crate::domain::validation::normalize_symbol;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;
use crate::ports::state_port::StatePort;

#[derive(Parser, Debug)]
#[command(name = "simfolio", about = "Personal investment portfolio tracker")]
pub struct Cli {
    /// INI configuration file
    #[arg(short, long, global = true, default_value = "simfolio.ini")]
    pub config: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show invested amount, current value and per-instrument holdings
    Summary,
    /// Write the value and invested series as CSV
    History {
        /// First day to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Last day to include, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Look up an instrument's price, latest or as of a time
    Price {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        at: Option<String>,
    },
    /// Show time-to-target for every goal
    Goals,
    /// Add an instrument, or rename an existing one
    AddEtf {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        name: String,
    },
    /// Record a price observation
    AddPrice {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        at: Option<String>,
    },
    /// Record a purchase
    Buy {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        qty: f64,
        #[arg(long)]
        at: Option<String>,
    },
    /// Add a savings goal
    AddGoal {
        #[arg(long)]
        name: String,
        #[arg(long)]
        target: f64,
        #[arg(long)]
        monthly: f64,
    },
    /// Remove an instrument (its purchases are kept)
    RemoveEtf {
        #[arg(long)]
        symbol: String,
    },
    /// Remove a goal by id
    RemoveGoal {
        #[arg(long)]
        id: String,
    },
    /// Export the portfolio document
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace the portfolio with an exported document
    Import { file: PathBuf },
    /// Validate the configuration file
    Validate,
}

pub fn run(cli: Cli) -> ExitCode {
    let adapter = match load_config(&cli.config) {
        Ok(a) => a,
        Err(code) => return code,
    };
    init_logging(adapter.get_string("logging", "level").as_deref());

    if let Err(e) = validate_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    match execute(cli.command, &adapter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = FolioError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.map(str::trim).unwrap_or("info")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn execute(command: Command, config: &dyn ConfigPort) -> Result<(), FolioError> {
    if let Command::Validate = command {
        println!("Configuration is valid.");
        return Ok(());
    }

    let port = open_state_port(config)?;
    let currency = currency(config);

    match command {
        Command::Summary => {
            let snapshot = load_or_seed(port.as_ref())?;
            let totals = valuation::totals(&snapshot.purchases, &snapshot.instruments);
            let rows = valuation::holdings(&snapshot.purchases, &snapshot.instruments);
            print!("{}", format_summary(&totals, &rows, &currency));
        }
        Command::History { from, to, output } => {
            let snapshot = load_or_seed(port.as_ref())?;
            let range = TimeRange::from_dates(
                from.as_deref().map(|s| parse_date("from", s)).transpose()?,
                to.as_deref().map(|s| parse_date("to", s)).transpose()?,
            );
            run_history(&snapshot, range, &CsvReportAdapter::new(output))?;
        }
        Command::Price { symbol, at } => {
            let snapshot = load_or_seed(port.as_ref())?;
            let symbol = normalize_symbol(&symbol)?;
            let instrument = snapshot
                .instrument(&symbol)
                .ok_or_else(|| FolioError::UnknownInstrument {
                    symbol: symbol.clone(),
                })?;
            let price = match at.as_deref() {
                Some(s) => price_at(instrument, parse_at(Some(s))?),
                None => latest_price(instrument),
            };
            match price {
                Some(p) => println!("{symbol}: {p:.4} {currency}"),
                None => println!("{symbol}: no price recorded"),
            }
        }
        Command::Goals => {
            let snapshot = load_or_seed(port.as_ref())?;
            print!("{}", format_goals(&project_goals(&snapshot.goals), &currency));
        }
        Command::AddEtf { symbol, name } => {
            let mut snapshot = load_or_seed(port.as_ref())?;
            let symbol = snapshot.upsert_instrument(&symbol, &name)?;
            port.save(&snapshot)?;
            eprintln!("Saved instrument {symbol}");
        }
        Command::AddPrice { symbol, price, at } => {
            let mut snapshot = load_or_seed(port.as_ref())?;
            let ts = parse_at(at.as_deref())?;
            if let Some(previous) = snapshot.record_price(&symbol, ts, price)? {
                tracing::info!(symbol = %symbol, ts, previous, "replaced existing price");
            }
            port.save(&snapshot)?;
            eprintln!("Recorded price {price} for {} at {ts}", symbol.trim().to_uppercase());
        }
        Command::Buy { symbol, qty, at } => {
            let mut snapshot = load_or_seed(port.as_ref())?;
            let ts = parse_at(at.as_deref())?;
            snapshot.record_purchase(&symbol, ts, qty)?;
            if snapshot.instrument(&normalize_symbol(&symbol)?).is_none() {
                tracing::warn!(symbol = %symbol, "purchase recorded for an unknown instrument");
            }
            port.save(&snapshot)?;
            eprintln!("Recorded purchase of {qty} {}", symbol.trim().to_uppercase());
        }
        Command::AddGoal {
            name,
            target,
            monthly,
        } => {
            let mut snapshot = load_or_seed(port.as_ref())?;
            let id = uuid::Uuid::new_v4().to_string();
            snapshot.add_goal(id.clone(), &name, target, monthly)?;
            port.save(&snapshot)?;
            println!("{id}");
        }
        Command::RemoveEtf { symbol } => {
            let mut snapshot = load_or_seed(port.as_ref())?;
            let removed = snapshot.remove_instrument(&symbol)?;
            port.save(&snapshot)?;
            eprintln!("Removed instrument {}", removed.symbol);
        }
        Command::RemoveGoal { id } => {
            let mut snapshot = load_or_seed(port.as_ref())?;
            let removed = snapshot.remove_goal(&id)?;
            port.save(&snapshot)?;
            eprintln!("Removed goal {}", removed.name);
        }
        Command::Export { output } => {
            let snapshot = load_or_seed(port.as_ref())?;
            let text = export_document(&snapshot, Utc::now())?;
            match output {
                Some(path) => {
                    fs::write(&path, text)?;
                    eprintln!("Exported to {}", path.display());
                }
                None => println!("{text}"),
            }
        }
        Command::Import { file } => {
            let text = fs::read_to_string(&file)?;
            let snapshot = import_into(port.as_ref(), &text)?;
            eprintln!(
                "Imported {} instruments, {} purchases, {} goals",
                snapshot.instruments.len(),
                snapshot.purchases.len(),
                snapshot.goals.len()
            );
        }
        Command::Validate => {}
    }
    Ok(())
}

pub fn open_state_port(config: &dyn ConfigPort) -> Result<Box<dyn StatePort>, FolioError> {
    let backend = config
        .get_string("storage", "backend")
        .unwrap_or_else(|| "json".to_string())
        .trim()
        .to_lowercase();
    let path = config
        .get_string("storage", "path")
        .ok_or_else(|| FolioError::ConfigMissing {
            section: "storage".into(),
            key: "path".into(),
        })?;

    match backend.as_str() {
        "json" => Ok(Box::new(JsonFileStateAdapter::new(path))),
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            use crate::adapters::sqlite_state_adapter::SqliteStateAdapter;
            Ok(Box::new(SqliteStateAdapter::from_config(config)?))
        }
        other => Err(FolioError::ConfigInvalid {
            section: "storage".into(),
            key: "backend".into(),
            reason: format!("backend {other} is not available in this build"),
        }),
    }
}

pub fn currency(config: &dyn ConfigPort) -> String {
    config
        .get_string("report", "currency")
        .map(|c| c.trim().to_uppercase())
        .unwrap_or_else(|| "EUR".to_string())
}

pub fn run_history(
    snapshot: &PortfolioSnapshot,
    range: TimeRange,
    report: &dyn ReportPort,
) -> Result<(), FolioError> {
    let timestamps = sample_timestamps_in(&snapshot.instruments, &snapshot.purchases, range);
    tracing::debug!(samples = timestamps.len(), "sampling history");
    let history = valuation::history(&snapshot.purchases, &snapshot.instruments, &timestamps);
    report.write_history(&history)
}

pub fn parse_date(field: &str, s: &str) -> Result<NaiveDate, FolioError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        FolioError::invalid_input(field, "invalid date format (expected YYYY-MM-DD)")
    })
}

/// `YYYY-MM-DD` (midnight UTC) or epoch milliseconds; `None` means now.
pub fn parse_at(s: Option<&str>) -> Result<i64, FolioError> {
    let Some(s) = s.map(str::trim) else {
        return Ok(Utc::now().timestamp_millis());
    };
    if let Ok(ms) = s.parse::<i64>() {
        return Ok(ms);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(start_of_day_millis)
        .map_err(|_| FolioError::invalid_input("at", "expected YYYY-MM-DD or epoch milliseconds"))
}

fn signed(value: f64) -> String {
    if value >= 0.0 {
        format!("+{value:.2}")
    } else {
        format!("{value:.2}")
    }
}

pub fn format_summary(totals: &Totals, rows: &[HoldingRow], currency: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Invested:         {:.2} {currency}", totals.invested);
    let _ = writeln!(out, "Current value:    {:.2} {currency}", totals.current);
    let _ = writeln!(
        out,
        "Profit/Loss:      {} {currency} ({}%)",
        signed(totals.profit_loss),
        signed(totals.profit_loss_pct)
    );

    if !rows.is_empty() {
        let _ = writeln!(out, "\n=== Holdings ===");
        for row in rows {
            let price = row
                .latest_price
                .map(|p| format!("{p:.2}"))
                .unwrap_or_else(|| "n/a".to_string());
            let _ = writeln!(
                out,
                "  {:<10} {:>12.4} @ {:>10}  value {:>12.2}  invested {:>12.2}{}",
                row.symbol,
                row.quantity,
                price,
                row.value,
                row.invested,
                if row.name.is_none() { "  (removed)" } else { "" },
            );
        }
    }
    out
}

pub fn format_goals(rows: &[GoalProjection], currency: &str) -> String {
    if rows.is_empty() {
        return "No goals.\n".to_string();
    }
    let mut out = String::new();
    for row in rows {
        let _ = writeln!(
            out,
            "{} [{}]: {:.2} {currency} at {:.2} {currency}/month -> {}",
            row.goal.name, row.goal.id, row.goal.target, row.goal.monthly, row.months
        );
    }
    out
}
