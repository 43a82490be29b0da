//! # RAG Playground CLI (`ragp`)
//!
//! The `ragp` binary drives a hosted RAG namespace from the command line:
//! ingest documents, check ingestion jobs, and chat against the indexed
//! content.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ragp ask "<question>"` | One-shot question against the namespace |
//! | `ragp chat` | Interactive chat loop |
//! | `ragp ingest text <content>` | Ingest raw text |
//! | `ragp ingest url <name> <url>` | Ingest a remote document by URL |
//! | `ragp ingest file <path>` | Upload and ingest a local file |
//! | `ragp status <job-id>` | Check an ingestion job |
//! | `ragp config` | Print the effective configuration |
//! | `ragp serve` | Start the JSON HTTP API |
//!
//! ## Examples
//!
//! ```bash
//! # Ingest some text under a display name
//! ragp ingest text "Deploys run at 14:00 UTC." --name runbook.txt
//!
//! # Ingest a PDF from the web
//! ragp ingest url "Q3 Report" https://example.com/q3.pdf
//!
//! # Ask against the namespace
//! ragp ask "When do deploys run?"
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use rag_playground::client::{ClientFactory, HttpClientFactory};
use rag_playground::session::Session;
use rag_playground::{chat, config, ingest, server};

/// RAG Playground — ingest documents into a hosted retrieval namespace
/// and chat against them.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/ragp.example.toml` for a full example. Credentials
/// can also come from `OPENAI_API_KEY`, `AGENTSET_API_KEY`, and
/// `AGENTSET_NAMESPACE_ID` in the environment.
#[derive(Parser)]
#[command(
    name = "ragp",
    about = "RAG Playground — ingest documents into a hosted namespace and chat against them",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/ragp.toml`; a missing file falls back to
    /// built-in defaults plus environment variables.
    #[arg(long, global = true, default_value = "./config/ragp.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Ask a single question against the namespace.
    ///
    /// Retrieves passages with the configured top-k and minimum score,
    /// then generates an answer with the configured model.
    Ask {
        /// The question to ask.
        question: String,
    },

    /// Start an interactive chat loop.
    ///
    /// `/clear` resets the transcript, `/quit` exits. The transcript
    /// lives only for the duration of the loop.
    Chat,

    /// Ingest a document into the namespace.
    ///
    /// Ingestion is asynchronous: each action returns a job id
    /// immediately. Use `ragp status <job-id>` to observe completion.
    Ingest {
        #[command(subcommand)]
        action: IngestAction,
    },

    /// Check the status of an ingestion job.
    Status {
        /// Job id returned by an ingest action.
        job_id: String,
    },

    /// Print the effective configuration (secrets redacted).
    Config,

    /// Start the JSON HTTP API server.
    ///
    /// Binds to the address configured in `[server].bind` and serves the
    /// chat, ingestion, and settings endpoints for browser front ends.
    Serve,
}

/// Ingestion subcommands.
#[derive(Subcommand)]
enum IngestAction {
    /// Ingest raw text.
    Text {
        /// The text content to ingest.
        content: String,
        /// Display file name (optional; the service picks one otherwise).
        #[arg(long)]
        name: Option<String>,
    },
    /// Ingest a remote document by URL.
    ///
    /// The URL is not validated locally; a malformed URL is rejected by
    /// the service.
    Url {
        /// Display name for the document.
        name: String,
        /// URL of the document to fetch.
        url: String,
    },
    /// Upload and ingest a local file.
    File {
        /// Path to the file.
        path: PathBuf,
        /// Display name (optional; defaults to the file's base name).
        #[arg(long)]
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;
    let session = Session::from_config(&cfg);
    let factory = HttpClientFactory::new(cfg.clone());

    match cli.command {
        Commands::Ask { question } => {
            let rag = factory.rag(&session);
            chat::run_ask(&session, rag.as_ref(), &question).await?;
        }
        Commands::Chat => {
            let rag = factory.rag(&session);
            chat::run_chat(&session, rag.as_ref()).await?;
        }
        Commands::Ingest { action } => {
            let ingester = factory.ingester(&session);
            match action {
                IngestAction::Text { content, name } => {
                    ingest::run_ingest_text(&session, ingester.as_ref(), &content, name.as_deref())
                        .await?;
                }
                IngestAction::Url { name, url } => {
                    ingest::run_ingest_url(&session, ingester.as_ref(), &name, &url).await?;
                }
                IngestAction::File { path, name } => {
                    ingest::run_ingest_file(
                        &session,
                        ingester.as_ref(),
                        &path.to_string_lossy(),
                        name.as_deref(),
                    )
                    .await?;
                }
            }
        }
        Commands::Status { job_id } => {
            let ingester = factory.ingester(&session);
            ingest::run_status(&session, ingester.as_ref(), &job_id).await?;
        }
        Commands::Config => {
            print_config(&cfg, &session);
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}

/// Print the effective configuration with secrets reduced to presence.
fn print_config(cfg: &config::Config, session: &Session) {
    let redact = |set: bool| if set { "set" } else { "not set" };

    println!("configured: {}", session.is_configured());
    println!(
        "openai_api_key: {}",
        redact(!session.openai_api_key.is_empty())
    );
    println!(
        "agentset_api_key: {}",
        redact(!session.agentset_api_key.is_empty())
    );
    println!("namespace_id: {}", session.namespace_id);
    println!("model: {}", session.model);
    println!("available models: {}", cfg.model.available.join(", "));
    println!("top_k: {}", session.top_k);
    println!("min_score: {}", session.min_score);
    println!("agentset_base_url: {}", cfg.api.agentset_base_url);
    println!("openai_base_url: {}", cfg.api.openai_base_url);
    println!("server.bind: {}", cfg.server.bind);
}
