//! Collaborator seams for the external RAG and ingestion services.
//!
//! The orchestration layer never talks to the network directly; it goes
//! through the [`RagClient`] and [`DocumentIngester`] traits. Production
//! code uses the HTTP implementations in [`agentset`](crate::agentset);
//! tests substitute recording stubs.
//!
//! Because credentials can change mid-process (the Settings surface
//! rewrites them), collaborators are rebuilt from a [`Session`] snapshot
//! on every use via a [`ClientFactory`] rather than constructed once at
//! startup.

use anyhow::Result;
use async_trait::async_trait;

use crate::agentset::{AgentsetIngester, AgentsetRag};
use crate::config::Config;
use crate::models::{IngestOutcome, JobStatus, QueryResult};
use crate::session::Session;

/// Query side of the hosted RAG service.
#[async_trait]
pub trait RagClient: Send + Sync {
    /// Answer a natural-language question against the namespace.
    ///
    /// Retrieval parameters are supplied per call; the collaborator owns
    /// everything else (ranking, prompt assembly, generation).
    async fn query(&self, question: &str, top_k: u32, min_score: f64) -> Result<QueryResult>;
}

/// Ingestion side of the hosted namespace service.
///
/// All submission methods are fire-and-forget: the service enqueues an
/// asynchronous job and returns its id immediately. Completion is only
/// observable through [`job_status`](DocumentIngester::job_status).
#[async_trait]
pub trait DocumentIngester: Send + Sync {
    /// Submit raw text, optionally under a display file name.
    async fn ingest_text(&self, content: &str, file_name: Option<&str>)
        -> Result<IngestOutcome>;

    /// Submit a remote document by URL under a display name.
    async fn ingest_file_from_url(&self, doc_name: &str, url: &str) -> Result<IngestOutcome>;

    /// Upload and submit a local file under a display name.
    async fn ingest_local_file(&self, path: &str, display_name: &str) -> Result<IngestOutcome>;

    /// Look up the status of a previously submitted job.
    async fn job_status(&self, job_id: &str) -> Result<JobStatus>;
}

/// Builds collaborators from the current session snapshot.
///
/// The server injects the HTTP factory; integration tests inject a stub
/// factory so no network traffic ever leaves the test process.
pub trait ClientFactory: Send + Sync {
    fn rag(&self, session: &Session) -> Box<dyn RagClient>;
    fn ingester(&self, session: &Session) -> Box<dyn DocumentIngester>;
}

/// Production factory backed by the HTTP implementations.
pub struct HttpClientFactory {
    config: Config,
}

impl HttpClientFactory {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ClientFactory for HttpClientFactory {
    fn rag(&self, session: &Session) -> Box<dyn RagClient> {
        Box::new(AgentsetRag::new(&self.config, session))
    }

    fn ingester(&self, session: &Session) -> Box<dyn DocumentIngester> {
        Box::new(AgentsetIngester::new(&self.config, session))
    }
}
