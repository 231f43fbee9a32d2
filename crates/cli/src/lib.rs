pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use haberdash_core::config::{AppConfig, ConfigError, LoadOptions, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "haberdash",
    about = "Haberdash catalog CLI",
    long_about = "Organize product variants, resolve selections, price bundles, and rank pairings from JSON catalog files.",
    after_help = "Examples:\n  haberdash organize --catalog catalog.json --product suit-navy\n  haberdash price --bundle bundle.json\n  haberdash recommend --catalog catalog.json --product suit-navy --size 42R"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Group a product's variants by color or size")]
    Organize {
        #[arg(long, help = "Path to a JSON array of products")]
        catalog: PathBuf,
        #[arg(long, help = "Id of the product to organize")]
        product: String,
    },
    #[command(about = "Resolve a color/size selection to a concrete variant")]
    Select {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        product: String,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        size: Option<String>,
        #[arg(long, help = "Seed the selection from an existing variant id")]
        variant: Option<String>,
    },
    #[command(about = "Price a bundle of line items against the discount tiers")]
    Price {
        #[arg(long, help = "Path to a JSON array of bundle line items")]
        bundle: PathBuf,
        #[arg(long, help = "Path to a JSON array of discount tiers (defaults to config)")]
        tiers: Option<PathBuf>,
    },
    #[command(about = "Rank catalog products that pair well with the current product")]
    Recommend {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        product: String,
        #[arg(long, help = "Maximum number of recommendations")]
        max: Option<usize>,
        #[arg(long, help = "Selected size of the current product")]
        size: Option<String>,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    init_logging(&logging_config(AppConfig::load(LoadOptions::default())));

    let result = match cli.command {
        Command::Organize { catalog, product } => commands::organize::run(&catalog, &product),
        Command::Select { catalog, product, color, size, variant } => {
            commands::select::run(&commands::select::SelectArgs {
                catalog,
                product,
                color,
                size,
                variant,
            })
        }
        Command::Price { bundle, tiers } => commands::price::run(&bundle, tiers.as_deref()),
        Command::Recommend { catalog, product, max, size } => {
            commands::recommend::run(&catalog, &product, max, size.as_deref())
        }
        Command::Config => commands::config::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// A config that fails to load still gets default logging, so the failure
/// reported by the command is also logged.
fn logging_config(loaded: Result<AppConfig, ConfigError>) -> AppConfig {
    loaded.unwrap_or_else(|error| {
        eprintln!("haberdash: logging with defaults, config failed to load: {error}");
        AppConfig::default()
    })
}

/// Logs go to stderr so stdout carries only the command's JSON document.
fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    match config.logging.format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}
