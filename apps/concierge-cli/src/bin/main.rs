use std::env;
use std::sync::Arc;

use concierge_core::config::Config;
use concierge_core::ChatResponse;
use concierge_rag::{GeminiProvider, PipelineConfig, PipelineState, RagPipeline};
use tracing_subscriber::EnvFilter;

mod chat;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Status,
    Ask(String),
    Chat,
}

const USAGE: &str = "Usage: concierge <status|ask \"<question>\"|chat>";

fn parse_command(args: &[String]) -> Result<Command, String> {
    let Some((cmd, rest)) = args.split_first() else { return Err(USAGE.to_string()) };
    match cmd.as_str() {
        "status" => Ok(Command::Status),
        "chat" => Ok(Command::Chat),
        "ask" => {
            let question = rest.join(" ");
            if question.trim().is_empty() {
                Err("Usage: concierge ask \"<question>\"".to_string())
            } else {
                Ok(Command::Ask(question))
            }
        }
        other => Err(format!("Unknown command: {other}\n{USAGE}")),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args: Vec<String> = env::args().skip(1).collect();
    let command = match parse_command(&args) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.settings()?;
    let api_key = settings.credentials.read_api_key();
    if api_key.is_none() {
        tracing::warn!("{} environment variable not set!", settings.credentials.api_key_env);
    }

    let pipeline = Arc::new(RagPipeline::new(
        PipelineConfig::from_settings(&settings, config.base_dir(), api_key),
        Arc::new(GeminiProvider::from_settings(&settings)),
    ));

    tracing::info!(env = config.env_name(), "🏨 Starting Luxury Haven Hotel AI Concierge...");
    match pipeline.initialize().await {
        PipelineState::Ready => tracing::info!("✅ RAG system ready - AI Concierge is available!"),
        _ => tracing::error!("❌ RAG system failed to initialize"),
    }

    match command {
        Command::Status => println!("{}", serde_json::to_string_pretty(&pipeline.status())?),
        Command::Ask(question) => {
            let response = ChatResponse::from(pipeline.answer(&question).await);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Chat => chat::run(&pipeline).await?,
    }
    Ok(())
}
