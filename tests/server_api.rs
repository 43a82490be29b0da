//! In-process API tests.
//!
//! Each test spins up the router on an ephemeral port with stub
//! collaborators injected through the factory seam, then drives it over
//! HTTP. No traffic ever leaves the test process.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use rag_playground::client::{ClientFactory, DocumentIngester, RagClient};
use rag_playground::config::Config;
use rag_playground::models::{IngestOutcome, JobStatus, QueryResult};
use rag_playground::server::{router, AppState};
use rag_playground::session::Session;

struct StubRag;

#[async_trait]
impl RagClient for StubRag {
    async fn query(&self, _question: &str, _top_k: u32, _min_score: f64) -> Result<QueryResult> {
        Ok(QueryResult {
            response: "A".to_string(),
            context: Some("B".to_string()),
        })
    }
}

struct StubIngester;

#[async_trait]
impl DocumentIngester for StubIngester {
    async fn ingest_text(
        &self,
        _content: &str,
        _file_name: Option<&str>,
    ) -> Result<IngestOutcome> {
        Ok(IngestOutcome::accepted("J1"))
    }

    async fn ingest_file_from_url(&self, _doc_name: &str, _url: &str) -> Result<IngestOutcome> {
        Ok(IngestOutcome::rejected("bad url"))
    }

    async fn ingest_local_file(&self, _path: &str, _display_name: &str) -> Result<IngestOutcome> {
        Ok(IngestOutcome::accepted("J2"))
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatus> {
        Ok(JobStatus {
            message: format!("Job {}: COMPLETED", job_id),
        })
    }
}

struct StubFactory;

impl ClientFactory for StubFactory {
    fn rag(&self, _session: &Session) -> Box<dyn RagClient> {
        Box::new(StubRag)
    }

    fn ingester(&self, _session: &Session) -> Box<dyn DocumentIngester> {
        Box::new(StubIngester)
    }
}

/// Bind the router on an ephemeral port and return its base URL.
async fn spawn_app() -> String {
    let config = Config::default();
    let session = Session::from_config(&config);
    let state = AppState::new(session, Arc::new(StubFactory), config.model.available.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    format!("http://{}", addr)
}

async fn configure(client: &reqwest::Client, base: &str) {
    let resp: Value = client
        .put(format!("{}/config", base))
        .json(&json!({
            "openai_api_key": "sk-a",
            "agentset_api_key": "as-b",
            "namespace_id": "ns-c",
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resp["status"], "Configuration saved");
}

#[tokio::test]
async fn test_health() {
    let base = spawn_app().await;
    let resp: Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resp["status"], "ok");
    assert!(resp["version"].is_string());
}

#[tokio::test]
async fn test_settings_initially_unconfigured() {
    let base = spawn_app().await;
    let resp: Value = reqwest::get(format!("{}/settings", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resp["configured"], false);
    assert_eq!(resp["openai_api_key_set"], false);
    assert!(resp["available_models"].as_array().unwrap().len() > 1);
}

#[tokio::test]
async fn test_chat_unconfigured_gets_fixed_reply() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let resp: Value = client
        .post(format!("{}/chat", base))
        .json(&json!({ "message": "Q", "history": [] }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let history = resp["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["role"], "user");
    assert_eq!(history[1]["role"], "assistant");
    assert!(history[1]["content"]
        .as_str()
        .unwrap()
        .contains("configure your API keys"));
    assert_eq!(resp["input"], "");
}

#[tokio::test]
async fn test_save_config_missing_field() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let resp: Value = client
        .put(format!("{}/config", base))
        .json(&json!({
            "openai_api_key": "",
            "agentset_api_key": "x",
            "namespace_id": "y",
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resp["status"], "Missing required fields");

    let settings: Value = reqwest::get(format!("{}/settings", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(settings["configured"], false);
}

#[tokio::test]
async fn test_configured_chat_round_trip() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();
    configure(&client, &base).await;

    let resp: Value = client
        .post(format!("{}/chat", base))
        .json(&json!({ "message": "Q", "history": [] }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let history = resp["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    let answer = history[1]["content"].as_str().unwrap();
    assert!(answer.contains("B"), "context missing from: {}", answer);
    assert!(answer.ends_with("A"), "response should end the turn: {}", answer);
}

#[tokio::test]
async fn test_save_settings_coerces_top_k() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let resp: Value = client
        .put(format!("{}/settings", base))
        .json(&json!({ "model": "gpt-4o", "top_k": 7.9, "min_score": 0.45 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resp["status"], "Settings saved");

    let settings: Value = reqwest::get(format!("{}/settings", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(settings["model"], "gpt-4o");
    assert_eq!(settings["top_k"], 7);
    assert!((settings["min_score"].as_f64().unwrap() - 0.45).abs() < 1e-9);
}

#[tokio::test]
async fn test_ingest_text_validation_and_success() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();
    configure(&client, &base).await;

    let resp: Value = client
        .post(format!("{}/ingest/text", base))
        .json(&json!({ "content": "" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resp["status"], "Enter text content");

    let resp: Value = client
        .post(format!("{}/ingest/text", base))
        .json(&json!({ "content": "hello", "file_name": "notes.txt" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resp["status"], "Job ID: J1");
}

#[tokio::test]
async fn test_ingest_url_failure_surfaces_message() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();
    configure(&client, &base).await;

    let resp: Value = client
        .post(format!("{}/ingest/url", base))
        .json(&json!({ "name": "Doc", "url": "not-a-url" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resp["status"], "Error: bad url");
}

#[tokio::test]
async fn test_job_status_lookup() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();
    configure(&client, &base).await;

    let resp: Value = reqwest::get(format!("{}/jobs/J1", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resp["status"], "Job J1: COMPLETED");
}
