use std::env;
use std::process;

use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use slotwatch::notify::Notifier;
use slotwatch::scan::scan;
use slotwatch::scraper::WebScraper;
use slotwatch::types::ScanRequest;

#[derive(Parser)]
#[command(name = "slotwatch")]
#[command(
    about = "Watches a Calendly page for appointment slots earlier than a cutoff date",
    long_about = None
)]
struct Cli {
    #[arg(
        long,
        default_value = slotwatch::DEFAULT_CALENDAR_URL,
        help = "Month-scoped calendar URL prefix; the month number is appended"
    )]
    url: String,

    #[arg(
        long,
        value_name = "YYYY-MM-DD",
        value_parser = parse_date,
        help = "Latest acceptable appointment date; earlier slots trigger a notification"
    )]
    cutoff: NaiveDate,

    #[arg(
        long,
        value_name = "YYYY-MM-DD",
        value_parser = parse_date,
        help = "Scan start date (defaults to today)"
    )]
    from: Option<NaiveDate>,

    #[arg(
        long,
        help = "ntfy topic to notify (defaults to the NTFY_TOPIC environment variable)"
    )]
    topic: Option<String>,

    #[arg(long, help = "Scan and print the report without sending a notification")]
    dry_run: bool,

    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value = "text",
        help = "Output format"
    )]
    format: OutputFormat,

    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        help = "Set the logging level"
    )]
    log_level: LogLevel,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_date(date_str: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Expected YYYY-MM-DD", date_str))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    dotenvy::dotenv().ok();

    let from = cli.from.unwrap_or_else(|| Local::now().date_naive());
    let request = ScanRequest::new(from, cli.cutoff).unwrap_or_else(|e| {
        log::error!("Invalid scan range: {}", e);
        process::exit(1);
    });

    let scraper = WebScraper::new(&cli.url).unwrap_or_else(|e| {
        log::error!("Error creating scraper: {}", e);
        process::exit(1);
    });

    log::info!(
        "Scanning {} month(s) for slots before {}",
        request.months_to_scan(),
        request.cutoff()
    );

    let report = match scan(&scraper, &request).await {
        Ok(report) => report,
        Err(e) => {
            log::error!("Scan failed: {}", e);
            process::exit(1);
        }
    };

    match cli.format {
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                log::error!("Error serializing to JSON: {}", e);
                process::exit(1);
            }
        },
        OutputFormat::Text => {
            if report.is_empty() {
                println!("No earlier dates found.");
            } else {
                print!("{}", report);
            }
        }
    }

    if report.is_empty() {
        log::info!("No earlier dates found.");
        return;
    }

    if cli.dry_run {
        log::info!("Dry run, skipping notification.");
        return;
    }

    let Some(topic) = cli.topic.or_else(|| env::var("NTFY_TOPIC").ok()) else {
        log::warn!("No ntfy topic configured (use --topic or NTFY_TOPIC); skipping notification.");
        return;
    };

    // A failed send is logged and swallowed; the exit status only ever
    // reflects the scan itself.
    match Notifier::new(&topic) {
        Ok(notifier) => {
            if let Err(e) = notifier.send(&report.body()).await {
                log::error!("Notification failed: {}", e);
            }
        }
        Err(e) => log::error!("Error creating notifier: {}", e),
    }
}
