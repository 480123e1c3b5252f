use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use constitucheck_core::config::{Config, DEFAULT_CONFIG_PATH};
use constitucheck_core::provider::{CompletionRequest, GeminiProvider, Provider};
use constitucheck_core::{RagEngine, Server};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "constitucheck")]
#[command(about = "ConstituCheck legal-assistant gateway", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the HTTP gateway")]
    Serve {
        #[arg(short, long, help = "Override the listening port")]
        port: Option<u16>,
    },

    #[command(about = "Show effective configuration")]
    Show,

    #[command(about = "Rank the configured corpus against a query")]
    Search {
        query: String,

        #[arg(short = 'k', long, help = "Number of results (defaults to search.default_top_k)")]
        top_k: Option<usize>,
    },

    #[command(about = "Send a prompt to the configured LLM")]
    Complete { prompt: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("constitucheck_core=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env(&cli.config).context("Failed to load config")?;

    match cli.command {
        Commands::Serve { port } => serve(config, port).await,
        Commands::Show => {
            show_config(&config);
            Ok(())
        }
        Commands::Search { query, top_k } => search(&config, &query, top_k),
        Commands::Complete { prompt } => complete(&config, &prompt).await,
    }
}

async fn serve(mut config: Config, port: Option<u16>) -> Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }

    let server = Server::new(config).context("Failed to create server")?;
    server.start().await.context("Server stopped with an error")?;
    Ok(())
}

fn mask(secret: Option<&str>) -> String {
    match secret {
        Some(_) => "********".to_string(),
        None => "(not set)".dimmed().to_string(),
    }
}

fn show_config(config: &Config) {
    println!("{}", "Current Configuration:".bold().green());
    println!();
    println!("{}", "Server:".bold());
    println!("  Address:         {}", config.server.bind_addr().cyan());
    println!("  Route Prefix:    {:?}", config.server.route_prefix);
    println!("  Body Limit:      {} bytes", config.server.body_limit_bytes);
    println!();
    println!("{}", "LLM:".bold());
    println!("  Model:           {}", config.llm.model.cyan());
    println!("  Base URL:        {}", config.llm.base_url);
    println!("  API Key:         {}", mask(config.llm.api_key.as_deref()));
    println!("  Timeout:         {}s", config.llm.timeout_secs);
    println!();
    println!("{}", "Search:".bold());
    println!("  Default Top K:   {}", config.search.default_top_k);
    println!(
        "  Corpus:          {}",
        config.search.corpus_path.as_deref().unwrap_or("(built-in demo corpus)")
    );
    println!();
    println!("{}", "Identity:".bold());
    println!("  Base URL:        {}", config.identity.base_url);
    println!(
        "  Service Account: {}",
        mask(config.identity.service_account_json.as_deref())
    );
    println!("  Static Tokens:   {}", config.identity.static_tokens.len());
}

fn search(config: &Config, query: &str, top_k: Option<usize>) -> Result<()> {
    let engine = RagEngine::from_config(&config.search).context("Failed to load corpus")?;
    let top_k = top_k.unwrap_or(config.search.default_top_k);
    if top_k == 0 {
        anyhow::bail!("top_k must be a positive integer");
    }

    let results = engine.search(query, top_k);
    println!(
        "{} {} of {} documents for {}",
        "→".blue(),
        results.len(),
        engine.count(),
        query.bold()
    );
    println!();

    for (rank, result) in results.iter().enumerate() {
        println!(
            "  {} {} {} ({:.3})",
            format!("{}.", rank + 1).cyan(),
            result.document.id.bold(),
            result.document.title,
            result.score
        );
        println!("     {}", result.document.category.dimmed());
    }

    Ok(())
}

async fn complete(config: &Config, prompt: &str) -> Result<()> {
    let provider = GeminiProvider::new(&config.llm).context("Failed to create provider")?;
    if !provider.is_configured() {
        println!("{}", "GEMINI_API_KEY not set, running in demo mode".yellow());
    }

    let response = provider
        .complete(CompletionRequest::new(provider.model(), prompt))
        .await
        .context("LLM call failed")?;

    println!("{}", "Dear User,".bold());
    println!("{}", response.text);
    Ok(())
}
