use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan repositories and print the review dashboard (default if no subcommand)
    Dashboard,
    /// List the repositories that would be scanned
    Repos,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum Format {
    #[default]
    Text,
    Json,
    Tsv,
}

#[derive(Parser, Debug)]
#[command(name = "pr-dash")]
#[command(about = "Code review dashboard for GitHub pull requests", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/pr-dash/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_logging(debug: bool) {
    let default_level = if debug { "pr_dash=debug" } else { "pr_dash=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Dashboard);
    let start_time = Instant::now();

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match pr_dash::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    init_logging(cli.verbose || config.debug);

    if let Err(errors) = pr_dash::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let credentials = match pr_dash::credentials::resolve_credentials(config.login.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Credential error: {:#}", e);
            std::process::exit(EXIT_AUTH);
        }
    };

    tracing::debug!(user = credentials.user(), plugin = %config.plugin, "Starting");

    match command {
        Commands::Repos => {
            let walker = match pr_dash::fetch::connect_walker(&config, credentials).await {
                Ok(w) => w,
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    std::process::exit(EXIT_NETWORK);
                }
            };

            match cli.format {
                Format::Json => match serde_json::to_string_pretty(walker.repos()) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Failed to encode output: {}", e);
                        std::process::exit(EXIT_NETWORK);
                    }
                },
                Format::Text | Format::Tsv => {
                    for repo in walker.repos() {
                        println!("{}", repo);
                    }
                }
            }
        }
        Commands::Dashboard => {
            let dashboard = match pr_dash::fetch::fetch_dashboard(&config, credentials).await {
                Ok(d) => d,
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    std::process::exit(EXIT_NETWORK);
                }
            };

            match cli.format {
                Format::Text => {
                    let use_colors = pr_dash::output::should_use_colors();
                    println!("{}", pr_dash::output::format_dashboard(&dashboard, use_colors));
                }
                Format::Json => match serde_json::to_string_pretty(&dashboard) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Failed to encode output: {}", e);
                        std::process::exit(EXIT_NETWORK);
                    }
                },
                Format::Tsv => {
                    let output = pr_dash::output::format_tsv(&dashboard.result);
                    if !output.is_empty() {
                        println!("{}", output);
                    }
                }
            }

            if cli.verbose {
                eprintln!();
                eprintln!(
                    "Total: {} PRs in {:?}",
                    dashboard.result.pulls.len(),
                    start_time.elapsed()
                );
            }
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
