use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// Import from our modular crates
use auditbot_cli::{
    audit, display_banner, format_classification, manager_answer, progress_line, render_report,
    ChatTable, GeminiGateway, HeuristicClassifier, KeywordRules,
};
use auditbot_gemini::GeminiConfig;

#[derive(Parser)]
#[command(name = "auditbot")]
#[command(about = "Audit customer-service chats for sentiment and rudeness", long_about = None)]
struct Cli {
    /// Chat dataset: a JSON array of objects (demo data when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Classify a single message instead of a dataset
    #[arg(short, long)]
    message: Option<String>,

    /// Gemini API key (defaults to GEMINI_API_KEY / API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// JSON file overriding the fallback keyword lists
    #[arg(short, long)]
    keywords: Option<PathBuf>,

    /// Never call the remote classifier
    #[arg(long, default_value_t = false)]
    offline: bool,

    /// Seconds to wait for each remote classification
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Print the report as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Ask the manager assistant a question about the audit
    #[arg(short, long)]
    ask: Option<String>,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_logging(cli.debug);

    let heuristic = match &cli.keywords {
        Some(path) => {
            let rules = KeywordRules::load(path)
                .await
                .with_context(|| format!("failed to load keyword rules from {}", path.display()))?;
            HeuristicClassifier::new(rules)
        }
        None => HeuristicClassifier::default(),
    };

    let gateway = build_gateway(&cli, heuristic)
        .await
        .with_timeout(Duration::from_secs(cli.timeout));

    // Single message mode
    if let Some(message) = &cli.message {
        let (result, source) = gateway.classify_with_source(message).await;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("{}", format_classification(&result, source));
        }
        return Ok(());
    }

    let table = match &cli.input {
        Some(path) => ChatTable::load(path)
            .await
            .with_context(|| format!("failed to read chats from {}", path.display()))?,
        None => {
            eprintln!(
                "{} Demo mode: using sample chats (pass --input to audit your own data)",
                "⚠️".yellow()
            );
            ChatTable::demo()
        }
    };

    if !cli.json {
        display_banner();
    }

    let report = audit(&table, &gateway, |done, total| {
        eprint!("\r{}", progress_line(done, total).dimmed());
        io::stderr().flush().ok();
    })
    .await;
    eprintln!();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_report(&report);
    }

    if let Some(question) = &cli.ask {
        tracing::debug!(%question, "manager question");
        println!();
        println!("{} {}", "AuditBot:".bold().cyan(), manager_answer(&report));
    }

    Ok(())
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn build_gateway(cli: &Cli, heuristic: HeuristicClassifier) -> GeminiGateway {
    if cli.offline {
        return GeminiGateway::offline(heuristic);
    }

    if cli.api_key.is_some() {
        return GeminiGateway::from_credential(cli.api_key.as_deref(), heuristic).await;
    }

    match GeminiConfig::from_env() {
        Ok(config) => GeminiGateway::from_config(config, heuristic).await,
        Err(e) => {
            tracing::info!(error = %e, "no usable API key, classifying with keyword rules");
            GeminiGateway::offline(heuristic)
        }
    }
}
