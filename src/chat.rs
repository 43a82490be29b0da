//! Chat orchestration.
//!
//! [`chat`] is the single entry point for a chat turn: it validates the
//! input and session, calls the RAG collaborator, and folds the result
//! (or any error) into the transcript. The full transcript is returned on
//! every call — the presentation layer replaces its view wholesale, it
//! never applies deltas.
//!
//! Every failure path ends as an assistant message; a chat turn never
//! returns an error and never crashes the process.

use std::io::{BufRead, Write};

use anyhow::Result;

use crate::client::RagClient;
use crate::models::{ChatMessage, QueryResult};
use crate::session::Session;

/// Fixed assistant reply when credentials are missing.
pub const MSG_CONFIGURE_FIRST: &str = "Please configure your API keys first.";

/// Maximum number of characters of retrieved context shown with an answer.
/// Display-only: the underlying data is never truncated.
pub const CONTEXT_PREVIEW_CHARS: usize = 1500;

/// Run one chat turn.
///
/// Returns the updated transcript and the cleared input value (always
/// empty — the caller writes it back into the input field).
///
/// - An empty message is a no-op turn: the transcript is returned
///   unchanged and no collaborator call is made.
/// - The user turn is appended unconditionally; if the session is not
///   configured a fixed assistant instruction follows and the collaborator
///   is never invoked, so the transcript stays balanced.
/// - Collaborator errors become `Error: {text}` assistant turns.
pub async fn chat(
    session: &Session,
    rag: &dyn RagClient,
    mut history: Vec<ChatMessage>,
    message: &str,
) -> (Vec<ChatMessage>, String) {
    if message.is_empty() {
        return (history, String::new());
    }

    history.push(ChatMessage::user(message));

    if !session.is_configured() {
        history.push(ChatMessage::assistant(MSG_CONFIGURE_FIRST));
        return (history, String::new());
    }

    let content = match rag
        .query(message, session.top_k, session.min_score)
        .await
    {
        Ok(result) => format_answer(&result),
        Err(e) => format!("Error: {}", e),
    };
    history.push(ChatMessage::assistant(content));

    (history, String::new())
}

/// Format a query result as assistant content.
///
/// When the result carries a non-empty context, a fenced sources block
/// (truncated for display) precedes the answer; the content always ends
/// with the model's response text.
fn format_answer(result: &QueryResult) -> String {
    match result.context.as_deref().filter(|c| !c.is_empty()) {
        Some(context) => format!(
            "**Sources:**\n```\n{}\n```\n\n---\n\n{}",
            truncate_context(context),
            result.response
        ),
        None => result.response.clone(),
    }
}

/// Hard-truncate context to [`CONTEXT_PREVIEW_CHARS`] characters, with a
/// trailing ellipsis marker only when something was cut. Character-based,
/// so multi-byte text never splits mid-scalar.
fn truncate_context(context: &str) -> String {
    if context.chars().count() <= CONTEXT_PREVIEW_CHARS {
        return context.to_string();
    }
    let truncated: String = context.chars().take(CONTEXT_PREVIEW_CHARS).collect();
    format!("{}...", truncated)
}

// ============ CLI presentation ============

/// One-shot question from the command line.
pub async fn run_ask(session: &Session, rag: &dyn RagClient, question: &str) -> Result<()> {
    let (history, _) = chat(session, rag, Vec::new(), question).await;
    if let Some(answer) = history.last() {
        println!("{}", answer.content);
    }
    Ok(())
}

/// Interactive chat loop on stdin/stdout.
///
/// `/clear` resets the transcript, `/quit` (or EOF) exits.
pub async fn run_chat(session: &Session, rag: &dyn RagClient) -> Result<()> {
    println!("RAG Playground chat. /clear resets the transcript, /quit exits.");

    let stdin = std::io::stdin();
    let mut history: Vec<ChatMessage> = Vec::new();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let message = line.trim();

        match message {
            "" => continue,
            "/quit" | "/exit" => break,
            "/clear" => {
                history.clear();
                println!("Transcript cleared.");
                continue;
            }
            _ => {}
        }

        let (updated, _) = chat(session, rag, history, message).await;
        history = updated;
        if let Some(answer) = history.last() {
            println!("{}\n", answer.content);
        }
    }

    Ok(())
}
