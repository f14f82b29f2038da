use clap::{Parser, Subcommand};

use moneta::commands;

#[derive(Parser)]
#[command(name = "moneta")]
#[command(
    about = "Personal finance assistant with semantic transaction categorization",
    long_about = None
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server (also the default)
    #[cfg(feature = "server")]
    Serve {
        #[arg(long, help = "Bind host (default from config)")]
        host: Option<String>,
        #[arg(long, help = "Bind port (default from config)")]
        port: Option<u16>,
    },
    /// Analyze a single financial statement
    Analyze {
        /// Statement to classify (e.g. "paid 500 for dinner")
        text: String,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Cross-validate the category matcher on the labeled corpus
    Eval {
        #[arg(long, default_value = "5", help = "Number of folds")]
        folds: usize,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Show corpus and model status
    Status {
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Write default config and starter corpus
    Init {
        #[arg(long, help = "Overwrite existing files")]
        force: bool,
    },
    /// Manage Model2Vec models for semantic categorization
    Model {
        /// Subcommand: download, status
        #[arg(default_value = "status")]
        action: String,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        // Default: run the HTTP API
        None => run_server(None, None),

        #[cfg(feature = "server")]
        Some(Commands::Serve { host, port }) => run_server(host, port),

        Some(Commands::Analyze { text, json }) => commands::analyze::run(&text, json),
        Some(Commands::Eval { folds, json }) => commands::eval::run(folds, json),
        Some(Commands::Status { json }) => commands::status::run(json),
        Some(Commands::Init { force }) => commands::init::run(force),
        Some(Commands::Model { action, json }) => commands::model::run(&action, json),
    }
}

#[cfg(feature = "server")]
fn run_server(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    commands::serve::run(host, port)
}

#[cfg(not(feature = "server"))]
fn run_server(_host: Option<String>, _port: Option<u16>) -> anyhow::Result<()> {
    eprintln!("Server feature not enabled. Build with --features server");
    std::process::exit(1);
}
