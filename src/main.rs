//! Ausgabenzettel CLI
//!
//! - `serve`: run the document sync server
//! - `config`: print or write a default config file
//! - `summary`: print the agenda of an exported `dailyEntries` JSON dump

use ausgabenzettel::config::{generate_default_config, Config};
use ausgabenzettel::ledger::{self, Filter, Period, Record, Summary};
use ausgabenzettel::sync::{serve, AppState};
use chrono::{Local, NaiveDate, TimeZone};
use clap::{Parser, Subcommand};
use std::fmt::Write;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ausgabenzettel")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Personal expense tracker and page sync server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the usual locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the sync server
    Serve {
        /// Host to bind
        #[arg(long)]
        host: Option<String>,
        /// Port to bind
        #[arg(short, long)]
        port: Option<u16>,
        /// Directory receiving synced pages
        #[arg(long)]
        upload_dir: Option<PathBuf>,
        /// Page served before the first sync
        #[arg(long)]
        initial: Option<PathBuf>,
        /// Serve HTTPS and require client certificates
        #[arg(long)]
        tls: bool,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Summarize a `dailyEntries` JSON dump
    Summary {
        /// Path to the JSON array
        path: PathBuf,
        /// Period (daily, weekly, monthly, yearly, all)
        #[arg(long, default_value = "all")]
        period: String,
        /// Reference date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    match cli.command {
        Commands::Serve {
            host,
            port,
            upload_dir,
            initial,
            tls,
        } => {
            init_tracing(&config);

            let mut server = config.server;
            if let Some(host) = host {
                server.host = host;
            }
            if let Some(port) = port {
                server.port = port;
            }
            if let Some(dir) = upload_dir {
                server.upload_dir = dir;
            }
            if let Some(initial) = initial {
                server.initial_document = initial;
            }
            if tls {
                server.tls.enabled = true;
            }

            tracing::info!("Starting Ausgabenzettel v{}", env!("CARGO_PKG_VERSION"));
            tracing::info!("Upload directory: {:?}", server.upload_dir);
            tracing::info!("Initial document: {:?}", server.initial_document);

            let state = AppState::new(server.clone())?;
            serve(state, &server).await?;
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)?;
                    println!("Wrote default config to {}", path.display());
                }
                None => print!("{}", content),
            }
        }

        Commands::Summary { path, period, date } => {
            let raw = std::fs::read_to_string(&path)?;
            let period = period.parse::<Period>()?;
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let filter = Filter::new(period, date);

            let summary = summarize(&raw, &filter, &Local)?;
            print!(
                "{}",
                render_summary(&path.display().to_string(), &filter, &summary)
            );
        }
    }

    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "ausgabenzettel={},tower_http=debug",
            config.logging.level
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Aggregate a `dailyEntries` JSON dump
fn summarize<Tz: TimeZone>(
    raw: &str,
    filter: &Filter,
    tz: &Tz,
) -> Result<Summary, serde_json::Error> {
    let records: Vec<Record> = serde_json::from_str(raw)?;
    Ok(ledger::aggregate(&records, filter, tz))
}

/// Agenda table with the grand total
fn render_summary(name: &str, filter: &Filter, summary: &Summary) -> String {
    let rule = "-".repeat(29);
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "{} ({}, {})", name, filter.period.caption(), filter.selected);
    let _ = writeln!(out, "{:<16} {:>12}", "Label", "Total");
    let _ = writeln!(out, "{}", rule);
    for total in summary.agenda() {
        let _ = writeln!(out, "{:<16} {:>11}€", total.label.title, total.value.to_string());
    }
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "{:<16} {:>11}€", "Total", summary.total.to_string());
    let _ = writeln!(
        out,
        "{} of {} entries in period",
        summary.shown_count(),
        summary.rows.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    // Two groceries, one dining out; the second groceries entry was removed
    const DUMP: &str = r#"[
        {"value":"12.50","currency":"€","label":0,"timestamp":1767268800000},
        {"value":"3.00","currency":"€","label":1,"timestamp":1767268800001},
        {"value":"7.25","currency":"€","label":0,"timestamp":1767268800002},
        {"event":"remove","timestamp":1767268800002}
    ]"#;

    fn new_year() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
    }

    #[test]
    fn test_render_summary() {
        let filter = Filter::new(Period::All, new_year());
        let summary = summarize(DUMP, &filter, &Utc).unwrap();
        let text = render_summary("dump.json", &filter, &summary);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 12);
        assert_eq!(lines[0], "dump.json (All, 2026-01-01)");
        assert_eq!(lines[1], "Label                   Total");
        assert_eq!(lines[2], "-".repeat(29));
        assert_eq!(lines[3], "Groceries              12.50€");
        assert_eq!(lines[4], "Dining Out              3.00€");
        assert_eq!(lines[5], "Housing                 0.00€");
        assert_eq!(lines[10], "Total                  15.50€");
        assert_eq!(lines[11], "2 of 2 entries in period");
    }

    #[test]
    fn test_summary_counts_entries_outside_period() {
        let filter = Filter::new(Period::Daily, new_year().succ_opt().unwrap());
        let summary = summarize(DUMP, &filter, &Utc).unwrap();
        let text = render_summary("dump.json", &filter, &summary);

        assert!(text.starts_with("dump.json (Day, 2026-01-02)\n"));
        assert!(text.contains("Total                   0.00€\n"));
        assert!(text.ends_with("0 of 2 entries in period\n"));
    }

    #[test]
    fn test_summarize_rejects_malformed_dump() {
        let filter = Filter::all(new_year());
        assert!(summarize("{\"not\": \"a list\"}", &filter, &Utc).is_err());
    }
}
