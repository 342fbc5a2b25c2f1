use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use bookrag_cli::{
    display_banner, handle_input_with_history, print_help, render_answer, render_error,
    render_health,
};
use bookrag_core::{Error, QueryOptions, Settings};
use bookrag_gemini::{GeminiClient, load_configuration};
use bookrag_rag::{QdrantSearcher, RagAgent};

type Agent = RagAgent<GeminiClient, QdrantSearcher, GeminiClient>;

#[derive(Parser)]
#[command(name = "bookrag")]
#[command(about = "Ask questions about a book indexed in Qdrant", long_about = None)]
struct Cli {
    /// Print machine-readable JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single question
    Query {
        /// The question to ask
        text: String,

        /// Maximum number of passages to use
        #[arg(long)]
        top_k: Option<usize>,

        /// Minimum similarity score, between 0 and 1
        #[arg(long)]
        threshold: Option<f32>,

        /// Text the reader highlighted, used as extra context
        #[arg(long)]
        selected_text: Option<String>,
    },
    /// Check the vector database and the LLM endpoint
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let connection = match load_configuration() {
        Ok(connection) => connection,
        Err(e) => {
            report_error(&e, cli.json);
            std::process::exit(2);
        }
    };
    init_tracing(&connection.settings);

    let searcher = QdrantSearcher::from_settings(&connection.settings)
        .context("failed to configure the Qdrant client")?;
    tracing::debug!(
        qdrant_url = %searcher.url(),
        collection = %connection.settings.collection_name,
        "components ready"
    );
    let agent = RagAgent::new(
        connection.settings.clone(),
        connection.client.clone(),
        Arc::new(searcher),
        connection.client.clone(),
    );

    match cli.command {
        Some(Commands::Query {
            text,
            top_k,
            threshold,
            selected_text,
        }) => {
            let options = QueryOptions {
                top_k,
                similarity_threshold: threshold,
                selected_text,
            };
            if !run_query(&agent, &text, &options, cli.json).await? {
                std::process::exit(1);
            }
        }
        Some(Commands::Health) => {
            if !run_health(&agent, cli.json).await? {
                std::process::exit(1);
            }
        }
        None => run_interactive(&agent).await?,
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the level picked from `DEBUG`
fn init_tracing(settings: &Settings) {
    let default_level = if settings.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

async fn run_query(agent: &Agent, text: &str, options: &QueryOptions, json: bool) -> Result<bool> {
    match agent.query(text, options).await {
        Ok(result) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", render_answer(&result));
            }
            Ok(true)
        }
        Err(e) => {
            report_error(&e, json);
            Ok(false)
        }
    }
}

async fn run_health(agent: &Agent, json: bool) -> Result<bool> {
    let report = agent.health_check().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render_health(&report));
    }

    Ok(report.is_healthy())
}

fn report_error(err: &Error, json: bool) {
    if json {
        let body = serde_json::json!({
            "error": {
                "stage": err.stage(),
                "message": err.detail(),
            }
        });
        println!("{}", body);
    } else {
        eprintln!("{}", render_error(err));
    }
}

async fn run_interactive(agent: &Agent) -> Result<()> {
    let settings = agent.settings();
    display_banner(&settings.chat_model, &settings.collection_name);

    let mut history = Vec::new();

    loop {
        let Some(input) = handle_input_with_history(&mut history)? else {
            println!("{}", "Goodbye!".green());
            break;
        };

        if input.is_empty() {
            continue;
        }

        match input.to_lowercase().as_str() {
            "exit" | "quit" => {
                println!("{}", "Goodbye!".green());
                break;
            }
            "help" => {
                print_help();
                continue;
            }
            "health" => {
                run_health(agent, false).await?;
                println!();
                continue;
            }
            _ => {}
        }

        println!("{}", "Searching the book...".blue());
        run_query(agent, &input, &QueryOptions::default(), false).await?;
        println!();
    }

    Ok(())
}
