//! CLI definition and dispatch.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::console_push_adapter::ConsolePushAdapter;
use crate::adapters::csv_store_adapter::CsvStoreAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_store_adapter::JsonStoreAdapter;
use crate::domain::alerts::{build_push_messages, NewTradeDetector};
use crate::domain::config_validation::validate_data_config;
use crate::domain::error::CalldeskError;
use crate::domain::normalize::{self, RawTradeRecord};
use crate::domain::stats::{PerformanceReport, SegmentStats};
use crate::domain::subscription;
use crate::domain::trade::{Segment, TradeRecord, TradeStatus};
use crate::domain::user::UserDistribution;
use crate::ports::config_port::ConfigPort;
use crate::ports::push_port::PushPort;
use crate::ports::store_port::StorePort;

pub const DEFAULT_ALERT_TITLE: &str = "New Trade Alert";

#[derive(Parser, Debug)]
#[command(name = "calldesk", about = "Stock advisory desk toolkit")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Win/loss performance over the closed-trade history
    Performance {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        segment: Option<String>,
    },
    /// Subscription countdowns and the user distribution
    Subscriptions {
        #[arg(short, long)]
        config: PathBuf,
        /// Pin "today" for reproducible output (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<String>,
    },
    /// Diff two trade snapshots and emit push payloads for new trades
    Alerts {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        previous: PathBuf,
        #[arg(long)]
        current: PathBuf,
    },
    /// Validate the configuration and every stored record
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Performance { config, segment } => run_performance(&config, segment.as_deref()),
        Command::Subscriptions { config, as_of } => run_subscriptions(&config, as_of.as_deref()),
        Command::Alerts {
            config,
            previous,
            current,
        } => run_alerts(&config, &previous, &current),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

/// Build the record store named by `[data] format` (default json).
pub fn build_store(config: &dyn ConfigPort) -> Result<Box<dyn StorePort>, CalldeskError> {
    let format = config
        .get_string("data", "format")
        .unwrap_or_else(|| "json".to_string());
    match format.trim().to_lowercase().as_str() {
        "json" => Ok(Box::new(JsonStoreAdapter::from_config(config)?)),
        "csv" => Ok(Box::new(CsvStoreAdapter::from_config(config)?)),
        _ => Err(CalldeskError::ConfigInvalid {
            section: "data".to_string(),
            key: "format".to_string(),
            reason: format!("unsupported format {:?} (expected json or csv)", format),
        }),
    }
}

/// Normalize a raw batch, logging one warning per skipped record plus the
/// skip count.
pub fn normalize_trades(raws: &[RawTradeRecord]) -> Vec<TradeRecord> {
    let outcome = normalize::normalize_batch(raws);
    for skip in &outcome.skipped {
        let label = skip
            .id
            .clone()
            .unwrap_or_else(|| format!("#{}", skip.index));
        eprintln!("warning: skipping record {} ({})", label, skip.error);
    }
    if !outcome.skipped.is_empty() {
        eprintln!(
            "{} of {} records skipped",
            outcome.skipped.len(),
            raws.len()
        );
    }
    outcome.records
}

/// Read one snapshot file: a JSON array of stored trade records.
pub fn read_snapshot(path: &PathBuf) -> Result<Vec<RawTradeRecord>, CalldeskError> {
    let content = fs::read_to_string(path).map_err(|e| CalldeskError::Store {
        reason: format!("failed to read {}: {}", path.display(), e),
    })?;
    serde_json::from_str(&content).map_err(|e| CalldeskError::Store {
        reason: format!("invalid snapshot JSON in {}: {}", path.display(), e),
    })
}

fn fetch_normalized_trades(config: &dyn ConfigPort) -> Result<Vec<TradeRecord>, CalldeskError> {
    validate_data_config(config)?;
    let store = build_store(config)?;
    let raws = store.fetch_trades()?;
    Ok(normalize_trades(&raws))
}

fn print_stats(label: &str, stats: &SegmentStats) {
    println!("=== {} ===", label);
    println!("Total Trades:      {}", stats.total);
    println!("Profitable Trades: {}", stats.profitable);
    println!("Losing Trades:     {}", stats.losing);
    println!("Accuracy:          {}%", stats.accuracy);
}

fn run_performance(config_path: &PathBuf, segment_filter: Option<&str>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let segment = match segment_filter {
        Some(name) => match Segment::from_name(name) {
            Some(s) => Some(s),
            None => {
                eprintln!("error: unknown segment {:?} (expected equity, futures or options)", name);
                return ExitCode::from(2);
            }
        },
        None => None,
    };

    let trades = match fetch_normalized_trades(&config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let active = trades
        .iter()
        .filter(|t| t.status() == TradeStatus::Active)
        .count();
    eprintln!(
        "Loaded {} trades ({} active, {} closed)",
        trades.len(),
        active,
        trades.len() - active
    );

    let report = PerformanceReport::compute(&trades);

    match segment {
        Some(s) => print_stats(&format!("{} Performance", capitalize(s.name())), &report.segment(s)),
        None => {
            print_stats("Overall", &report.overall);
            if config.get_bool("report", "per_segment", true) {
                println!();
                print_stats("Equity", &report.equity);
                println!();
                print_stats("Futures", &report.futures);
                println!();
                print_stats("Options", &report.options);
            }
        }
    }

    ExitCode::SUCCESS
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn run_subscriptions(config_path: &PathBuf, as_of: Option<&str>) -> ExitCode {
    let today = match as_of {
        Some(s) => match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(d) => d,
            Err(_) => {
                eprintln!("error: invalid --as-of date (expected YYYY-MM-DD)");
                return ExitCode::from(2);
            }
        },
        None => Local::now().date_naive(),
    };

    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_data_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let store = match build_store(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let users = match store.fetch_users() {
        Ok(u) => u,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let dist = UserDistribution::compute(&users);
    println!("=== Users ===");
    println!("Total:   {}", dist.total);
    println!("Free:    {}", dist.free);
    println!("Active:  {}", dist.active);
    println!("Blocked: {}", dist.blocked);

    println!();
    println!("=== Subscriptions (as of {}) ===", today);
    for user in &users {
        match subscription::evaluate(user, today) {
            Ok(Some(countdown)) => {
                let blink = if countdown.blinking() { "  [attention]" } else { "" };
                println!(
                    "{}  expires {}  {} days  {}{}",
                    user.phone, countdown.end_date, countdown.days_left, countdown.tier, blink
                );
            }
            Ok(None) => {
                if user.status.can_view_live_trades() {
                    println!("{}  no end date on file", user.phone);
                }
            }
            Err(e) => {
                eprintln!("warning: skipping user {} ({})", user.id, e);
            }
        }
    }

    ExitCode::SUCCESS
}

fn run_alerts(config_path: &PathBuf, previous_path: &PathBuf, current_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_data_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let store = match build_store(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let users = match store.fetch_users() {
        Ok(u) => u,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let previous = match read_snapshot(previous_path) {
        Ok(raws) => normalize_trades(&raws),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let current = match read_snapshot(current_path) {
        Ok(raws) => normalize_trades(&raws),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let mut detector = NewTradeDetector::new();
    detector.process_snapshot(previous.iter().map(|t| t.id.clone()).collect());
    let fresh = detector.process_snapshot(current.iter().map(|t| t.id.clone()).collect());

    let by_id: HashMap<&str, &TradeRecord> =
        current.iter().map(|t| (t.id.as_str(), t)).collect();
    let title = config
        .get_string("alerts", "title")
        .unwrap_or_else(|| DEFAULT_ALERT_TITLE.to_string());

    let push = ConsolePushAdapter;
    let mut delivered = 0usize;
    for id in &fresh {
        let Some(trade) = by_id.get(id.as_str()) else {
            continue;
        };
        let messages = build_push_messages(trade, &users, &title);
        if let Err(e) = push.deliver(&messages) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        delivered += messages.len();
    }

    eprintln!(
        "{} new trades, {} messages emitted",
        fresh.len(),
        delivered
    );
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_data_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("Config validated successfully");

    let store = match build_store(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let raws = match store.fetch_trades() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let outcome = normalize::normalize_batch(&raws);
    for skip in &outcome.skipped {
        let label = skip
            .id
            .clone()
            .unwrap_or_else(|| format!("#{}", skip.index));
        eprintln!("invalid trade record {}: {}", label, skip.error);
    }

    let users = match store.fetch_users() {
        Ok(u) => u,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let today = Local::now().date_naive();
    let mut bad_users = 0usize;
    for user in &users {
        if let Err(e) = subscription::evaluate(user, today) {
            eprintln!("invalid user record {}: {}", user.id, e);
            bad_users += 1;
        }
    }

    eprintln!(
        "{} trade records ({} invalid), {} user records ({} invalid)",
        raws.len(),
        outcome.skipped.len(),
        users.len(),
        bad_users
    );

    if !outcome.skipped.is_empty() || bad_users > 0 {
        return ExitCode::from(4);
    }
    eprintln!("All records validated successfully");
    ExitCode::SUCCESS
}
