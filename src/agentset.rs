//! HTTP implementations of the collaborator traits against a hosted
//! Agentset-style namespace API.
//!
//! All endpoints are namespace-scoped and bearer-authenticated:
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | `POST` | `/v1/namespace/{ns}/ingest-jobs` | Enqueue a text or URL ingestion job |
//! | `POST` | `/v1/namespace/{ns}/ingest-jobs/upload` | Upload and enqueue a local file |
//! | `GET`  | `/v1/namespace/{ns}/ingest-jobs/{id}` | Look up job status |
//! | `POST` | `/v1/namespace/{ns}/search` | Retrieve ranked passages |
//!
//! Logical failures the service reports in-band (`success: false` plus a
//! message in a 2xx body) become [`IngestOutcome`] values. Non-2xx statuses
//! and malformed bodies are errors, surfaced to the orchestration layer
//! which renders them as display strings.
//!
//! No retry or backoff here: ingestion is fire-and-forget and queries are
//! interactive, so a failed round-trip is reported to the user immediately.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::client::{DocumentIngester, RagClient};
use crate::config::Config;
use crate::models::{IngestOutcome, JobStatus, QueryResult};
use crate::openai;
use crate::session::Session;

fn http_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_default()
}

// ============ Ingestion ============

/// [`DocumentIngester`] backed by the hosted namespace API.
pub struct AgentsetIngester {
    client: reqwest::Client,
    base_url: String,
    namespace_id: String,
    api_key: String,
}

impl AgentsetIngester {
    pub fn new(config: &Config, session: &Session) -> Self {
        Self {
            client: http_client(config.api.timeout_secs),
            base_url: config.api.agentset_base_url.clone(),
            namespace_id: session.namespace_id.clone(),
            api_key: session.agentset_api_key.clone(),
        }
    }

    fn jobs_url(&self) -> String {
        format!(
            "{}/v1/namespace/{}/ingest-jobs",
            self.base_url, self.namespace_id
        )
    }

    async fn submit_job(&self, payload: serde_json::Value) -> Result<IngestOutcome> {
        let response = self
            .client
            .post(self.jobs_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&serde_json::json!({ "payload": payload }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            bail!("Agentset API error {}: {}", status, body);
        }

        let json: serde_json::Value = serde_json::from_str(&body)?;
        Ok(parse_outcome(&json))
    }
}

#[async_trait]
impl DocumentIngester for AgentsetIngester {
    async fn ingest_text(
        &self,
        content: &str,
        file_name: Option<&str>,
    ) -> Result<IngestOutcome> {
        let mut payload = serde_json::json!({ "type": "TEXT", "text": content });
        if let Some(name) = file_name {
            payload["fileName"] = serde_json::Value::String(name.to_string());
        }
        self.submit_job(payload).await
    }

    async fn ingest_file_from_url(&self, doc_name: &str, url: &str) -> Result<IngestOutcome> {
        self.submit_job(serde_json::json!({
            "type": "FILE",
            "name": doc_name,
            "fileUrl": url,
        }))
        .await
    }

    async fn ingest_local_file(&self, path: &str, display_name: &str) -> Result<IngestOutcome> {
        let bytes = tokio::fs::read(path).await?;
        let part = reqwest::multipart::Part::bytes(bytes).file_name(display_name.to_string());
        let form = reqwest::multipart::Form::new()
            .text("name", display_name.to_string())
            .part("file", part);

        let response = self
            .client
            .post(format!("{}/upload", self.jobs_url()))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            bail!("Agentset API error {}: {}", status, body);
        }

        let json: serde_json::Value = serde_json::from_str(&body)?;
        Ok(parse_outcome(&json))
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatus> {
        let response = self
            .client
            .get(format!("{}/{}", self.jobs_url(), job_id))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            bail!("Agentset API error {}: {}", status, body);
        }

        let json: serde_json::Value = serde_json::from_str(&body)?;
        Ok(parse_job_status(job_id, &json))
    }
}

/// Map a 2xx ingest-jobs response body onto an [`IngestOutcome`].
fn parse_outcome(json: &serde_json::Value) -> IngestOutcome {
    let success = json
        .get("success")
        .and_then(|s| s.as_bool())
        .unwrap_or(false);

    let job_id = json
        .get("data")
        .and_then(|d| d.get("id"))
        .and_then(|i| i.as_str())
        .map(str::to_string);

    let message = json
        .get("message")
        .or_else(|| json.get("error").and_then(|e| e.get("message")))
        .and_then(|m| m.as_str())
        .map(str::to_string);

    match (success, job_id) {
        (true, Some(id)) => IngestOutcome::accepted(id),
        (true, None) => IngestOutcome::rejected("Service accepted the job but returned no id"),
        (false, _) => IngestOutcome {
            success: false,
            job_id: None,
            message: Some(message.unwrap_or_else(|| "Ingestion rejected".to_string())),
        },
    }
}

/// Render a job lookup body as a one-line human-readable status.
fn parse_job_status(job_id: &str, json: &serde_json::Value) -> JobStatus {
    let state = json
        .get("data")
        .and_then(|d| d.get("status"))
        .and_then(|s| s.as_str())
        .unwrap_or("UNKNOWN");

    let detail = json
        .get("data")
        .and_then(|d| d.get("error"))
        .and_then(|e| e.as_str());

    let message = match detail {
        Some(err) => format!("Job {}: {} ({})", job_id, state, err),
        None => format!("Job {}: {}", job_id, state),
    };
    JobStatus { message }
}

// ============ Query ============

/// [`RagClient`] composing namespace retrieval with OpenAI generation.
///
/// `query` runs two round-trips: `POST .../search` against the namespace
/// for ranked passages, then a chat completion with those passages as
/// context. The joined passages are returned alongside the answer so the
/// presentation layer can show sources.
pub struct AgentsetRag {
    client: reqwest::Client,
    agentset_base_url: String,
    openai_base_url: String,
    namespace_id: String,
    agentset_api_key: String,
    openai_api_key: String,
    system_prompt: String,
    model: String,
}

impl AgentsetRag {
    pub fn new(config: &Config, session: &Session) -> Self {
        Self {
            client: http_client(config.api.timeout_secs),
            agentset_base_url: config.api.agentset_base_url.clone(),
            openai_base_url: config.api.openai_base_url.clone(),
            namespace_id: session.namespace_id.clone(),
            agentset_api_key: session.agentset_api_key.clone(),
            openai_api_key: session.openai_api_key.clone(),
            system_prompt: config.model.system_prompt.clone(),
            model: session.model.clone(),
        }
    }

    async fn search(&self, question: &str, top_k: u32, min_score: f64) -> Result<String> {
        let response = self
            .client
            .post(format!(
                "{}/v1/namespace/{}/search",
                self.agentset_base_url, self.namespace_id
            ))
            .header("Authorization", format!("Bearer {}", self.agentset_api_key))
            .json(&serde_json::json!({
                "query": question,
                "topK": top_k,
                "minScore": min_score,
            }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            bail!("Agentset API error {}: {}", status, body);
        }

        let json: serde_json::Value = serde_json::from_str(&body)?;
        Ok(join_passages(&json))
    }
}

#[async_trait]
impl RagClient for AgentsetRag {
    async fn query(&self, question: &str, top_k: u32, min_score: f64) -> Result<QueryResult> {
        let context = self.search(question, top_k, min_score).await?;

        let response = openai::chat_completion(
            &self.client,
            &self.openai_base_url,
            &self.openai_api_key,
            &self.model,
            &self.system_prompt,
            &context,
            question,
        )
        .await?;

        Ok(QueryResult {
            response,
            context: if context.is_empty() {
                None
            } else {
                Some(context)
            },
        })
    }
}

/// Join the `data[].text` passages from a search response into one
/// context string, separated by blank lines. Passages without text are
/// skipped.
fn join_passages(json: &serde_json::Value) -> String {
    json.get("data")
        .and_then(|d| d.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("text").and_then(|t| t.as_str()))
                .collect::<Vec<_>>()
                .join("\n\n")
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_outcome_accepted() {
        let json = serde_json::json!({ "success": true, "data": { "id": "job_42" } });
        let outcome = parse_outcome(&json);
        assert!(outcome.success);
        assert_eq!(outcome.job_id.as_deref(), Some("job_42"));
    }

    #[test]
    fn test_parse_outcome_rejected_with_message() {
        let json = serde_json::json!({ "success": false, "message": "namespace quota exceeded" });
        let outcome = parse_outcome(&json);
        assert!(!outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("namespace quota exceeded"));
    }

    #[test]
    fn test_parse_outcome_rejected_without_message() {
        let json = serde_json::json!({ "success": false });
        let outcome = parse_outcome(&json);
        assert!(!outcome.success);
        assert!(outcome.message.is_some());
    }

    #[test]
    fn test_parse_job_status() {
        let json = serde_json::json!({ "success": true, "data": { "status": "COMPLETED" } });
        let status = parse_job_status("job_42", &json);
        assert_eq!(status.message, "Job job_42: COMPLETED");
    }

    #[test]
    fn test_parse_job_status_with_error_detail() {
        let json = serde_json::json!({
            "success": true,
            "data": { "status": "FAILED", "error": "unsupported file type" }
        });
        let status = parse_job_status("job_7", &json);
        assert_eq!(status.message, "Job job_7: FAILED (unsupported file type)");
    }

    #[test]
    fn test_join_passages() {
        let json = serde_json::json!({
            "data": [
                { "text": "first passage", "score": 0.9 },
                { "score": 0.5 },
                { "text": "second passage", "score": 0.4 },
            ]
        });
        assert_eq!(join_passages(&json), "first passage\n\nsecond passage");
    }

    #[test]
    fn test_join_passages_empty() {
        assert_eq!(join_passages(&serde_json::json!({ "data": [] })), "");
        assert_eq!(join_passages(&serde_json::json!({})), "");
    }
}
