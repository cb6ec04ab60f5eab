use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use consigne_core::Transaction;
use consigne_ingest::{StoreRecord, append_store_csv, group_by_client, load_store_export};
use consigne_returns::{Reconciler, return_description};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "consigne",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CONSIGNE_BUILD_SHA"), ")"),
    about = "Track returnable bottles and chopines per client"
)]
struct Cli {
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Items a client still has to bring back
    Remaining {
        /// Store export (.csv or .json)
        #[arg(long)]
        file: PathBuf,

        #[arg(long)]
        client: String,

        /// Show date and time of the last purchase per item
        #[arg(long)]
        dates: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Every client with outstanding items
    Summary {
        #[arg(long)]
        file: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Record that a client returned some items (appends to a CSV export)
    Return {
        #[arg(long)]
        file: PathBuf,

        #[arg(long)]
        client: String,

        /// Item label as shown by `remaining`, e.g. "Chopine Beer"
        #[arg(long)]
        item: String,

        #[arg(long, default_value_t = 1)]
        qty: u64,
    },

    /// Config file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.consigne/config.toml with defaults
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG > --verbose > info
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr).compact())
        .init();

    let cfg = config::load_config()?;

    match cli.command {
        Command::Remaining {
            file,
            client,
            dates,
            json,
        } => {
            let reconciler = reconciler(&cfg)?;
            let ledger = load_ledger(&file, &cfg)?;
            let txns = client_transactions(&ledger, &client)?;
            print_remaining(&reconciler, &client, txns, dates, json)?;
        }

        Command::Summary { file, json } => {
            let reconciler = reconciler(&cfg)?;
            let ledger = load_ledger(&file, &cfg)?;
            print_summary(&reconciler, &ledger, json)?;
        }

        Command::Return {
            file,
            client,
            item,
            qty,
        } => {
            let reconciler = reconciler(&cfg)?;
            record_return(&reconciler, &cfg, &file, &client, &item, qty)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn reconciler(cfg: &Config) -> Result<Reconciler> {
    Reconciler::new(&cfg.parsing)
        .and_then(|r| r.with_display(cfg.display.clone()))
        .context("building reconciler from config")
}

fn load_ledger(file: &Path, cfg: &Config) -> Result<BTreeMap<String, Vec<Transaction>>> {
    if !file.exists() {
        bail!("store export not found: {}", file.display());
    }
    let records = load_store_export(file, &cfg.display.timezone)
        .with_context(|| format!("loading {}", file.display()))?;
    info!("loaded {} transactions from {}", records.len(), file.display());
    Ok(group_by_client(records))
}

fn client_transactions<'a>(
    ledger: &'a BTreeMap<String, Vec<Transaction>>,
    client: &str,
) -> Result<&'a [Transaction]> {
    ledger
        .get(client)
        .map(Vec::as_slice)
        .with_context(|| format!("no transactions for client '{client}'"))
}

fn print_remaining(
    reconciler: &Reconciler,
    client: &str,
    txns: &[Transaction],
    dates: bool,
    json: bool,
) -> Result<()> {
    if dates {
        let items = reconciler.remaining_with_dates(txns);
        if json {
            println!("{}", serde_json::to_string_pretty(&items)?);
            return Ok(());
        }
        println!("Client {client}: {} item(s) outstanding", items.len());
        for d in &items {
            println!("- {} | {} {}", d.text, d.date, d.time);
        }
    } else {
        let items = reconciler.remaining_strings(txns);
        if json {
            println!("{}", serde_json::to_string_pretty(&items)?);
            return Ok(());
        }
        println!("Client {client}: {} item(s) outstanding", items.len());
        for text in &items {
            println!("- {text}");
        }
    }
    Ok(())
}

fn print_summary(
    reconciler: &Reconciler,
    ledger: &BTreeMap<String, Vec<Transaction>>,
    json: bool,
) -> Result<()> {
    let outstanding: BTreeMap<&str, Vec<String>> = ledger
        .iter()
        .map(|(client, txns)| (client.as_str(), reconciler.remaining_strings(txns)))
        .filter(|(_, items)| !items.is_empty())
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&outstanding)?);
        return Ok(());
    }

    println!(
        "{} of {} client(s) hold returnable items\n",
        outstanding.len(),
        ledger.len()
    );
    for (client, items) in &outstanding {
        println!("{client}: {}", items.join(", "));
    }
    Ok(())
}

fn record_return(
    reconciler: &Reconciler,
    cfg: &Config,
    file: &Path,
    client: &str,
    item: &str,
    qty: u64,
) -> Result<()> {
    let is_json = file
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        bail!("returns can only be appended to a CSV export");
    }
    if qty == 0 {
        bail!("--qty must be at least 1");
    }

    let ledger = load_ledger(file, cfg)?;
    let txns = client_transactions(&ledger, client)?;
    let remaining = reconciler.remaining(txns);

    let Some(held) = remaining.iter().find(|r| r.key.matches_label(item)) else {
        let labels: Vec<String> = remaining.iter().map(|r| r.key.label()).collect();
        bail!(
            "client '{client}' holds no '{item}' (outstanding: {})",
            if labels.is_empty() { "none".to_string() } else { labels.join(", ") }
        );
    };
    if qty > held.quantity {
        bail!(
            "client '{client}' only holds {} ({} requested)",
            held.text,
            qty
        );
    }

    let now = Utc::now();
    let record = StoreRecord {
        client_id: client.to_string(),
        transaction: Transaction::new(
            format!("ret-{}", now.timestamp_millis()),
            now,
            return_description(&held.key, qty),
        ),
    };
    append_store_csv(file, &record).with_context(|| format!("appending to {}", file.display()))?;

    info!(client, item = %held.key, qty, "return recorded");
    println!("Recorded: {}", record.transaction.description);
    Ok(())
}
