mod commands;
mod input;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "declara")]
#[command(version, about = "Declaration processing engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a declaration schema: fields, line layout and rules
    Info {
        /// Declaration code (e.g. 1879)
        code: String,

        /// Metadata store directory
        #[arg(short, long, default_value = ".")]
        store: String,
    },

    /// Validate input rows against a declaration schema
    Validate {
        /// Declaration code (e.g. 1879)
        code: String,

        /// Input CSV file (simple declarations)
        #[arg(short, long)]
        input: Option<String>,

        /// Section input as TAG=path.csv; repeat per section (composite
        /// declarations)
        #[arg(long)]
        section: Vec<String>,

        /// Metadata store directory
        #[arg(short, long, default_value = ".")]
        store: String,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Validate and, on success, encode the authority-facing output file
    Generate {
        /// Declaration code (e.g. 1879)
        code: String,

        /// Input CSV file (simple declarations)
        #[arg(short, long)]
        input: Option<String>,

        /// Section input as TAG=path.csv; repeat per section (composite
        /// declarations)
        #[arg(long)]
        section: Vec<String>,

        /// Metadata store directory
        #[arg(short, long, default_value = ".")]
        store: String,

        /// Directory the output file is written to
        #[arg(short, long, default_value = ".")]
        output: String,

        /// Encode even when validation fails
        #[arg(long)]
        no_strict: bool,

        /// Declaring company RUT
        #[arg(long, default_value = "")]
        rut: String,

        /// Operator name recorded in the run log
        #[arg(long, default_value = "")]
        user: String,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match cli.command {
        Commands::Info { code, store } => commands::info::execute(&code, &store),

        Commands::Validate {
            code,
            input,
            section,
            store,
            format,
        } => commands::validate::execute(&code, input.as_deref(), &section, &store, &format),

        Commands::Generate {
            code,
            input,
            section,
            store,
            output,
            no_strict,
            rut,
            user,
            format,
        } => commands::generate::execute(
            &code,
            input.as_deref(),
            &section,
            &store,
            &output,
            no_strict,
            &rut,
            &user,
            &format,
        ),
    }
}
