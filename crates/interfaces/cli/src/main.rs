mod interactive;

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use contract_finder_agent::{ContractAgent, DialogueState};
use contract_finder_config::{AppConfig, LLM_API_KEY_VAR, SEARCH_API_KEY_VAR};
use contract_finder_llm::GroqClient;
use contract_finder_tools::{ScrapeOutcome, TavilySearch, scrape_to_file};

#[derive(Debug, Parser)]
#[command(
    name = "contract-finder",
    version,
    about = "Conversational finder for contract opportunities"
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "config/default.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the interactive contract-finding conversation (default).
    Chat,
    /// Fetch a page and save its visible text to a file.
    Scrape {
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the resolved configuration.
    Doctor {
        /// Write a default configuration file at `--config` if none exists.
        #[arg(long)]
        write_default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = AppConfig::load_from(&cli.config)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.telemetry.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => run_chat(&config).await?,
        Commands::Scrape { url, output } => {
            let url = url.unwrap_or_else(|| config.scraper.url.clone());
            let output = output.unwrap_or_else(|| PathBuf::from(&config.scraper.output_path));
            run_scrape(&url, &output).await?;
        }
        Commands::Doctor { write_default } => {
            if write_default {
                if write_default_config(&cli.config)? {
                    println!("wrote default configuration to {}", cli.config.display());
                } else {
                    println!("{} already exists; left unchanged", cli.config.display());
                }
            }
            print_doctor(&cli.config, &config);
        }
    }

    Ok(())
}

async fn run_chat(config: &AppConfig) -> Result<()> {
    let credentials = config.credentials()?;

    let search = TavilySearch::new(
        &config.search.base_url,
        &credentials.search_api_key,
        config.search.timeout_secs.map(Duration::from_secs),
    )?;
    let mut agent = ContractAgent::new(Box::new(search), config.search.max_results);
    if config.llm.follow_up_replies {
        let llm = GroqClient::new(
            &config.llm.base_url,
            &credentials.llm_api_key,
            &config.llm.model,
            config.llm.temperature,
        );
        info!(model = llm.model(), "follow-up replies enabled");
        agent = agent.with_follow_up_replies(Box::new(llm));
    }

    let mut state = DialogueState::new();
    interactive::run_session(&agent, &mut state, io::stdin().lock(), io::stdout()).await
}

async fn run_scrape(url: &str, output: &Path) -> Result<()> {
    match scrape_to_file(url, output).await? {
        ScrapeOutcome::Saved { path, bytes } => {
            info!(path = %path.display(), bytes, "page text saved");
            println!("Content has been saved to \"{}\".", path.display());
        }
        ScrapeOutcome::Failed { status } => {
            info!(%status, "page fetch rejected");
            println!("Failed to retrieve the webpage");
        }
    }
    Ok(())
}

/// Save the built-in defaults to `path` unless a file is already there.
/// Returns whether a file was written.
fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    AppConfig::default().save_to(path)?;
    Ok(true)
}

fn presence(key: &str) -> &'static str {
    if key.trim().is_empty() { "missing" } else { "set" }
}

fn print_doctor(config_path: &Path, config: &AppConfig) {
    let file_state = if config_path.exists() {
        "found"
    } else {
        "not found, using defaults"
    };

    println!("contract-finder doctor");
    println!("- config file: {} ({file_state})", config_path.display());
    println!("- search endpoint: {}", config.search.base_url);
    println!("- search max results: {}", config.search.max_results);
    match config.search.timeout_secs {
        Some(secs) => println!("- search timeout: {secs}s"),
        None => println!("- search timeout: client default"),
    }
    println!("- {SEARCH_API_KEY_VAR}: {}", presence(&config.search.api_key));
    println!("- llm endpoint: {}", config.llm.base_url);
    println!("- llm model: {}", config.llm.model);
    println!("- llm temperature: {}", config.llm.temperature);
    println!("- follow-up replies: {}", config.llm.follow_up_replies);
    println!("- {LLM_API_KEY_VAR}: {}", presence(&config.llm.api_key));
    println!("- scraper url: {}", config.scraper.url);
    println!("- scraper output: {}", config.scraper.output_path);
    println!("- log level: {}", config.telemetry.log_level);
}
