use clap::{Parser, Subcommand};
use festreg::application::pricing::PricingEngine;
use festreg::application::registration::RegistrationService;
use festreg::config::PricingConfig;
use festreg::domain::course::Selection;
use festreg::domain::ports::{RegistrationStore, RegistrationStoreBox};
use festreg::infrastructure::in_memory::{
    InMemoryPaymentGateway, InMemoryRegistrationStore, LogMailer,
};
#[cfg(feature = "storage-rocksdb")]
use festreg::infrastructure::rocksdb::RocksDBRegistrationStore;
use festreg::interfaces::csv::receipt_writer::{Receipt, ReceiptWriter};
use festreg::interfaces::csv::registration_reader::RegistrationReader;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Pricing configuration (TOML). Defaults to the built-in festival rate card.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the course catalog
    Courses,
    /// Price a selection of courses
    Quote {
        /// Course name; repeat for several courses
        #[arg(short = 'c', long = "course")]
        courses: Vec<String>,

        /// Membership or discount code
        #[arg(long)]
        coupon: Option<String>,

        /// Print the full quote as JSON
        #[arg(long)]
        json: bool,
    },
    /// Charge and record every registration in a CSV file
    Finalize {
        /// Input registrations CSV file
        input: PathBuf,

        /// Path to persistent database (optional). If provided, uses RocksDB.
        #[arg(long)]
        db_path: Option<PathBuf>,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    // stdout carries receipts and quotes, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(verbose >= 2)
        .init();
}

fn load_engine(config: Option<PathBuf>) -> Result<PricingEngine> {
    let config = match config {
        Some(path) => {
            debug!("Loading pricing config from {}", path.display());
            PricingConfig::load(path)
        }
        None => PricingConfig::builtin(),
    }
    .into_diagnostic()?;

    let engine = config.into_engine().into_diagnostic()?;
    for violation in engine.cap_violations() {
        warn!("Suspicious price table: {}", violation);
    }
    Ok(engine)
}

fn open_store(db_path: Option<PathBuf>) -> Result<RegistrationStoreBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            let store = RocksDBRegistrationStore::open(path).into_diagnostic()?;
            Ok(Box::new(store))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            warn!(
                "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Box::new(InMemoryRegistrationStore::new()))
        }
        None => Ok(Box::new(InMemoryRegistrationStore::new())),
    }
}

fn list_courses(engine: &PricingEngine) {
    println!("{}", engine.event());
    for course in engine.catalog().courses() {
        println!("{:<14} {}", course.category.to_string(), course.name);
    }
}

fn quote(
    engine: &PricingEngine,
    courses: Vec<String>,
    coupon: Option<String>,
    json: bool,
) -> Result<()> {
    let selection: Selection = courses.into_iter().collect();
    let quote = engine.quote(&selection, coupon.as_deref());

    if json {
        let rendered = serde_json::to_string_pretty(&quote).into_diagnostic()?;
        println!("{}", rendered);
    } else {
        println!("{}", quote.total);
    }
    Ok(())
}

async fn finalize(
    engine: Arc<PricingEngine>,
    input: PathBuf,
    db_path: Option<PathBuf>,
) -> Result<()> {
    let store = open_store(db_path)?;

    // Keep charge ids unique across runs against the same database.
    let existing = store.all().await.into_diagnostic()?;
    let gateway = InMemoryPaymentGateway::new().resume_from(&existing);

    let service = RegistrationService::new(
        engine,
        store,
        Box::new(gateway),
        Box::new(LogMailer::new()),
    );

    let file = File::open(input).into_diagnostic()?;
    let reader = RegistrationReader::new(file);
    let stdout = io::stdout();
    let mut writer = ReceiptWriter::new(stdout.lock());

    for form_result in reader.registrations() {
        match form_result {
            Ok(form) => {
                let receipt = match service.finalize(form.clone()).await {
                    Ok(registration) => Receipt::registered(&registration),
                    Err(e) => {
                        warn!("Error finalizing registration: {}", e);
                        Receipt::rejected(&form, &e)
                    }
                };
                writer.write_receipt(&receipt).into_diagnostic()?;
            }
            Err(e) => {
                warn!("Error reading registration: {}", e);
                writer
                    .write_receipt(&Receipt::unreadable(&e))
                    .into_diagnostic()?;
            }
        }
    }
    writer.flush().into_diagnostic()?;

    let registrations = service.into_registrations().await.into_diagnostic()?;
    info!(stored = registrations.len(), "Finalize complete");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let engine = load_engine(cli.config)?;

    match cli.command {
        Command::Courses => {
            list_courses(&engine);
            Ok(())
        }
        Command::Quote {
            courses,
            coupon,
            json,
        } => quote(&engine, courses, coupon, json),
        Command::Finalize { input, db_path } => {
            finalize(Arc::new(engine), input, db_path).await
        }
    }
}
