//! OpenAI chat-completions call used for the generation step.
//!
//! The hosted namespace handles retrieval; this module turns the retrieved
//! context plus the user's question into an answer via
//! `POST /v1/chat/completions`. Request and response handling follow the
//! same shape as any other bearer-authenticated JSON endpoint in this
//! crate: build the body, check the status, parse the fields we need.

use anyhow::{bail, Result};

/// Generate an answer from the question and retrieved context.
///
/// When `context` is empty the question is sent on its own, letting the
/// model answer from the system prompt alone.
pub async fn chat_completion(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    model: &str,
    system_prompt: &str,
    context: &str,
    question: &str,
) -> Result<String> {
    let user_content = if context.is_empty() {
        question.to_string()
    } else {
        format!("Context:\n{}\n\nQuestion: {}", context, question)
    };

    let body = serde_json::json!({
        "model": model,
        "messages": [
            { "role": "system", "content": system_prompt },
            { "role": "user", "content": user_content },
        ],
    });

    let response = client
        .post(format!("{}/v1/chat/completions", base_url))
        .header("Authorization", format!("Bearer {}", api_key))
        .json(&body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body_text = response.text().await.unwrap_or_default();
        bail!("OpenAI API error {}: {}", status, body_text);
    }

    let json: serde_json::Value = response.json().await?;
    parse_completion(&json)
}

/// Extract `choices[0].message.content` from a completions response.
fn parse_completion(json: &serde_json::Value) -> Result<String> {
    json.get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("Invalid OpenAI response: missing message content"))
}
