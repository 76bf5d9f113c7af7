use std::fmt;
use std::fs::File;

use chrono::{DateTime, Utc};
use exam_core::Clock;
use storage::import::{Importer, RowPolicy};
use storage::repository::{QuestionRepository, Storage};

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    csv_path: String,
    policy: RowPolicy,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingCsvPath,
    InvalidDbUrl { raw: String },
    InvalidPolicy { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingCsvPath => write!(f, "--csv <path> is required"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidPolicy { raw } => {
                write!(f, "invalid --on-invalid value (expected skip|abort): {raw}")
            }
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("EXAM_DB_URL").unwrap_or_else(|_| "sqlite:exam.sqlite3".into());
        let mut csv_path = std::env::var("EXAM_CSV_PATH").ok();
        let mut policy = RowPolicy::default();
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--csv" => {
                    let value = require_value(&mut args, "--csv")?;
                    csv_path = Some(value);
                }
                "--on-invalid" => {
                    let value = require_value(&mut args, "--on-invalid")?;
                    policy = match value.as_str() {
                        "skip" => RowPolicy::Skip,
                        "abort" => RowPolicy::Abort,
                        _ => return Err(ArgsError::InvalidPolicy { raw: value }),
                    };
                }
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            csv_path: csv_path.ok_or(ArgsError::MissingCsvPath)?,
            policy,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin import -- --csv <path> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --csv <path>              CSV file with a tema,number,text,a,b,c,d,answer header");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:exam.sqlite3)");
    eprintln!("  --on-invalid <policy>     skip (default) or abort on malformed rows");
    eprintln!("  --now <rfc3339>           Fixed creation timestamp for deterministic imports");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  EXAM_DB_URL, EXAM_CSV_PATH");
}

fn prepare_sqlite_file(db_url: &str) -> std::io::Result<()> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .or_else(|| db_url.strip_prefix("sqlite:"))
        .unwrap_or(db_url);
    let path = path.split('?').next().unwrap_or(path);
    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    prepare_sqlite_file(&args.db_url)?;
    let storage = Storage::sqlite(&args.db_url).await?;

    let clock = match args.now {
        Some(at) => Clock::fixed(at),
        None => Clock::default_clock(),
    };

    let file = File::open(&args.csv_path)?;
    let importer = Importer::new(clock, args.policy);
    let report = importer.run(file, storage.questions.as_ref()).await?;
    let stored = storage.questions.count().await?;

    println!(
        "Imported {} of {} rows ({} skipped) in {} batches into {}; store now holds {} documents",
        report.imported, report.rows_read, report.skipped, report.batches, args.db_url, stored
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
