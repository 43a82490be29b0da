//! # RAG Playground
//!
//! A playground client for hosted RAG namespaces: ingest documents into a
//! retrieval namespace, track ingestion jobs, and chat against the indexed
//! content with retrieval-augmented generation.
//!
//! Retrieval, chunking, and indexing all happen on the hosted service;
//! generation goes through the OpenAI chat-completions API. This crate
//! owns only the orchestration between them — validation, collaborator
//! calls, and result formatting — plus two presentation surfaces:
//!
//! ```text
//! ┌──────────┐   ┌───────────────┐   ┌────────────────────┐
//! │   CLI    │──▶│ Orchestration │──▶│ Hosted namespace   │
//! │  (ragp)  │   │ chat / ingest │   │ (ingest + search)  │
//! ├──────────┤   │ / settings    │   ├────────────────────┤
//! │   HTTP   │──▶│               │──▶│ OpenAI completions │
//! │  (JSON)  │   └───────────────┘   └────────────────────┘
//! └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export OPENAI_API_KEY=sk-...
//! export AGENTSET_API_KEY=agentset_...
//! export AGENTSET_NAMESPACE_ID=ns_...
//!
//! ragp ingest text "Rust ships a borrow checker." --name notes.txt
//! ragp status <job-id>
//! ragp ask "What does Rust ship?"
//! ragp serve                     # JSON API for browser front ends
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration with env overrides |
//! | [`session`] | In-memory mutable settings value |
//! | [`models`] | Core data types |
//! | [`client`] | Collaborator traits and factory seam |
//! | [`agentset`] | HTTP collaborators for the hosted namespace |
//! | [`openai`] | Chat-completions call for generation |
//! | [`chat`] | Chat turn orchestration |
//! | [`ingest`] | Ingestion and job-status orchestration |
//! | [`server`] | JSON HTTP API |

pub mod agentset;
pub mod chat;
pub mod client;
pub mod config;
pub mod ingest;
pub mod models;
pub mod openai;
pub mod server;
pub mod session;
