use std::io::Write as _;
use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Import our modules
use colloquy::{config::Config, orchestrator::ChatSession};

/// Ask questions against a pasted passage of text
#[derive(Parser, Debug)]
#[command(name = "colloquy", version, about)]
struct Cli {
    /// Read the passage from a file instead of stdin
    #[arg(long)]
    passage_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "colloquy=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load config
    let config = Config::load()?;

    // Create the session and kick off model loading in the background
    let session = ChatSession::from_config(&config);
    session.start()?;

    tracing::info!("Loading models...");
    tracing::info!("Ollama URL: {}", config.ollama_url);
    tracing::info!("QA bridge URL: {}", config.qa_bridge_url);

    let mut input = BufReader::new(tokio::io::stdin()).lines();

    // Capture the passage while the models load
    let passage = match &cli.passage_file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            println!("Paste your passage, then finish with an empty line:");
            let mut collected = String::new();
            while let Some(line) = input.next_line().await? {
                if line.trim().is_empty() {
                    break;
                }
                collected.push_str(&line);
                collected.push('\n');
            }
            collected
        }
    };

    if passage.trim().is_empty() {
        anyhow::bail!("no passage provided");
    }

    // The ask loop is gated on readiness; a load failure ends the session
    if let Err(e) = session.await_ready().await {
        anyhow::bail!("models failed to load: {}", e);
    }
    tracing::info!("Models loaded.");

    println!("Ask a question (Ctrl-D to exit):");
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(question) = input.next_line().await? else {
            break;
        };
        if question.trim() == "/quit" {
            break;
        }

        let answer = session.submit(&passage, &question).await?;
        println!("Chatbot: {}", answer.text);
    }

    // Final transcript render
    let transcript = session.snapshot();
    if !transcript.is_empty() {
        println!();
        println!("--- Transcript ({} turns) ---", transcript.len());
        for turn in transcript {
            println!("User: {}", turn.question);
            println!("Chatbot: {}", turn.answer);
        }
    }

    Ok(())
}
