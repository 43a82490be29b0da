//! Ingestion orchestration.
//!
//! All three submission paths (text, URL, local file) share one flow:
//! configuration check → required-field check → collaborator call →
//! outcome mapping. Each step that fails resolves to a status string for
//! the user; nothing here returns an error to the caller.
//!
//! | Action | Required fields | Validation message |
//! |--------|-----------------|--------------------|
//! | text | content | "Enter text content" |
//! | URL | name and URL | "Enter document name and URL" |
//! | file | path | "Choose a file" |
//!
//! URL strings are not validated locally; a malformed URL is rejected by
//! the service and comes back as a logical failure.

use std::future::Future;
use std::path::Path;

use anyhow::Result;

use crate::client::DocumentIngester;
use crate::models::IngestOutcome;
use crate::session::Session;

/// Status line when credentials are missing.
pub const MSG_CONFIGURE_KEYS: &str = "Configure API keys first";
/// Validation message for text ingestion.
pub const MSG_ENTER_TEXT: &str = "Enter text content";
/// Validation message for URL ingestion.
pub const MSG_ENTER_NAME_AND_URL: &str = "Enter document name and URL";
/// Validation message for file ingestion.
pub const MSG_CHOOSE_FILE: &str = "Choose a file";
/// Validation message for status lookup.
pub const MSG_ENTER_JOB_ID: &str = "Enter job ID";

/// Shared ingest flow: configured check, field validation, action,
/// outcome mapping. Collaborator errors are caught here and rendered.
async fn handle_ingest<F>(session: &Session, check: Option<&'static str>, action: F) -> String
where
    F: Future<Output = Result<IngestOutcome>>,
{
    if !session.is_configured() {
        return MSG_CONFIGURE_KEYS.to_string();
    }
    if let Some(err) = check {
        return err.to_string();
    }
    match action.await {
        Ok(outcome) if outcome.success => match outcome.job_id {
            Some(id) => format!("Job ID: {}", id),
            None => "Error: service returned no job id".to_string(),
        },
        Ok(outcome) => format!(
            "Error: {}",
            outcome.message.unwrap_or_else(|| "unknown failure".to_string())
        ),
        Err(e) => format!("Error: {}", e),
    }
}

/// Submit raw text for ingestion. The display file name is optional; when
/// absent the service picks one.
pub async fn ingest_text(
    session: &Session,
    ingester: &dyn DocumentIngester,
    content: &str,
    file_name: Option<&str>,
) -> String {
    let check = content.is_empty().then_some(MSG_ENTER_TEXT);
    let name = file_name.filter(|n| !n.is_empty());
    handle_ingest(session, check, ingester.ingest_text(content, name)).await
}

/// Submit a remote document by URL under a display name.
pub async fn ingest_url(
    session: &Session,
    ingester: &dyn DocumentIngester,
    doc_name: &str,
    url: &str,
) -> String {
    let check = (doc_name.is_empty() || url.is_empty()).then_some(MSG_ENTER_NAME_AND_URL);
    handle_ingest(session, check, ingester.ingest_file_from_url(doc_name, url)).await
}

/// Upload a local file. The display name defaults to the file's base name
/// when no custom name is given.
pub async fn ingest_file(
    session: &Session,
    ingester: &dyn DocumentIngester,
    path: &str,
    custom_name: Option<&str>,
) -> String {
    let check = path.is_empty().then_some(MSG_CHOOSE_FILE);
    let display_name = custom_name
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| base_name(path));
    handle_ingest(
        session,
        check,
        ingester.ingest_local_file(path, &display_name),
    )
    .await
}

/// Look up the status of a submitted job. A single synchronous lookup —
/// no polling, no caching.
pub async fn check_status(
    session: &Session,
    ingester: &dyn DocumentIngester,
    job_id: &str,
) -> String {
    if !session.is_configured() {
        return MSG_CONFIGURE_KEYS.to_string();
    }
    if job_id.is_empty() {
        return MSG_ENTER_JOB_ID.to_string();
    }
    match ingester.job_status(job_id).await {
        Ok(status) => status.message,
        Err(e) => format!("Error: {}", e),
    }
}

fn base_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

// ============ CLI presentation ============

pub async fn run_ingest_text(
    session: &Session,
    ingester: &dyn DocumentIngester,
    content: &str,
    file_name: Option<&str>,
) -> Result<()> {
    println!("{}", ingest_text(session, ingester, content, file_name).await);
    Ok(())
}

pub async fn run_ingest_url(
    session: &Session,
    ingester: &dyn DocumentIngester,
    doc_name: &str,
    url: &str,
) -> Result<()> {
    println!("{}", ingest_url(session, ingester, doc_name, url).await);
    Ok(())
}

pub async fn run_ingest_file(
    session: &Session,
    ingester: &dyn DocumentIngester,
    path: &str,
    custom_name: Option<&str>,
) -> Result<()> {
    println!("{}", ingest_file(session, ingester, path, custom_name).await);
    Ok(())
}

pub async fn run_status(
    session: &Session,
    ingester: &dyn DocumentIngester,
    job_id: &str,
) -> Result<()> {
    println!("{}", check_status(session, ingester, job_id).await);
    Ok(())
}
