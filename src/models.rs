//! Core data models used throughout RAG Playground.
//!
//! These types represent the chat transcript, collaborator results, and
//! ingestion job references that flow through the orchestration layer.

use serde::{Deserialize, Serialize};

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single turn in the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Answer returned by the RAG collaborator.
///
/// `context` carries the retrieved passages that supported the answer,
/// when the service returned any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    pub response: String,
    #[serde(default)]
    pub context: Option<String>,
}

/// Outcome of an ingestion request.
///
/// Logical failures reported by the service (`success: false` plus a
/// message) are values, not errors — only transport or protocol problems
/// surface as `Err` from the collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestOutcome {
    pub success: bool,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl IngestOutcome {
    pub fn accepted(job_id: impl Into<String>) -> Self {
        Self {
            success: true,
            job_id: Some(job_id.into()),
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            job_id: None,
            message: Some(message.into()),
        }
    }
}

/// Human-readable status of an ingestion job, as reported by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatus {
    pub message: String,
}
