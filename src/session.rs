//! In-memory session settings.
//!
//! A [`Session`] is the mutable settings value behind the Settings surface:
//! API credentials, target namespace, model choice, and retrieval
//! parameters. It is created from [`Config`](crate::config::Config)
//! defaults at startup and lives only for the process lifetime — nothing
//! is ever written back to disk.
//!
//! The session is an explicit value passed to the orchestration functions,
//! not process-wide state, so multiple sessions can coexist without
//! cross-talk (the HTTP server holds one per process behind a lock).

use crate::config::Config;

/// Status line returned when all credentials are present after a save.
pub const MSG_CONFIG_SAVED: &str = "Configuration saved";
/// Status line returned when at least one credential is still empty.
pub const MSG_MISSING_FIELDS: &str = "Missing required fields";
/// Status line returned by a settings save (always succeeds).
pub const MSG_SETTINGS_SAVED: &str = "Settings saved";

/// Mutable per-session settings.
#[derive(Debug, Clone)]
pub struct Session {
    pub openai_api_key: String,
    pub agentset_api_key: String,
    pub namespace_id: String,
    pub model: String,
    pub top_k: u32,
    pub min_score: f64,
}

impl Session {
    /// Seed a session from configuration defaults.
    pub fn from_config(config: &Config) -> Self {
        Self {
            openai_api_key: config.credentials.openai_api_key.clone(),
            agentset_api_key: config.credentials.agentset_api_key.clone(),
            namespace_id: config.credentials.namespace_id.clone(),
            model: config.model.name.clone(),
            top_k: config.retrieval.top_k,
            min_score: config.retrieval.min_score,
        }
    }

    /// True iff all three credential fields are non-empty.
    pub fn is_configured(&self) -> bool {
        !self.openai_api_key.is_empty()
            && !self.agentset_api_key.is_empty()
            && !self.namespace_id.is_empty()
    }

    /// Overwrite all three credential fields unconditionally.
    ///
    /// No per-field validation beyond the non-emptiness check performed
    /// afterwards; never errors. Returns the status line to show the user.
    pub fn save_credentials(
        &mut self,
        openai_api_key: impl Into<String>,
        agentset_api_key: impl Into<String>,
        namespace_id: impl Into<String>,
    ) -> String {
        self.openai_api_key = openai_api_key.into();
        self.agentset_api_key = agentset_api_key.into();
        self.namespace_id = namespace_id.into();
        if self.is_configured() {
            MSG_CONFIG_SAVED.to_string()
        } else {
            MSG_MISSING_FIELDS.to_string()
        }
    }

    /// Overwrite model and retrieval settings.
    ///
    /// `top_k` arrives as a float from slider-style inputs and is coerced
    /// to an integer, floored at 1. Always succeeds.
    pub fn save_settings(
        &mut self,
        model: impl Into<String>,
        top_k: f64,
        min_score: f64,
    ) -> String {
        self.model = model.into();
        self.top_k = (top_k as u32).max(1);
        self.min_score = min_score;
        MSG_SETTINGS_SAVED.to_string()
    }
}
