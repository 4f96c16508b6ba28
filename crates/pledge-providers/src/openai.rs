//! Chat-completion responder for free text that matched no rule.
//!
//! The request carries three messages: the tone persona, the user's profile
//! snapshot as a JSON system block, and the user's text. Any OpenAI-compatible
//! endpoint works.

use async_trait::async_trait;
use pledge_core::{
    config::OpenAiConfig,
    context::Context,
    error::PledgeError,
    message::{MessageMetadata, OutgoingMessage},
    traits::Provider,
};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

/// Requests that take longer than this fall back to canned replies.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Heading of the system block that carries the snapshot.
const PROFILE_HEADING: &str = "Accountability profile (JSON):";

pub struct OpenAiProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
    pub fn from_config(config: &OpenAiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: std::borrow::Cow<'a, str>,
}

#[derive(Deserialize)]
struct Completion {
    #[serde(default)]
    choices: Vec<Choice>,
    model: Option<String>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ReplyMessage>,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: Option<u64>,
}

/// Persona, then the snapshot block, then the user's text.
fn request_messages(context: &Context) -> Result<Vec<RequestMessage<'_>>, PledgeError> {
    let snapshot = serde_json::to_string(&context.profile)
        .map_err(|e| PledgeError::Provider(format!("openai: cannot encode profile: {e}")))?;

    let mut messages = Vec::with_capacity(3);
    if !context.system_prompt.is_empty() {
        messages.push(RequestMessage {
            role: "system",
            content: context.system_prompt.as_str().into(),
        });
    }
    messages.push(RequestMessage {
        role: "system",
        content: format!("{PROFILE_HEADING}\n{snapshot}").into(),
    });
    messages.push(RequestMessage {
        role: "user",
        content: context.current_message.as_str().into(),
    });
    Ok(messages)
}

impl Completion {
    /// First non-blank choice, trimmed.
    fn reply_text(&self) -> Option<String> {
        self.choices
            .iter()
            .filter_map(|c| c.message.as_ref()?.content.as_deref())
            .map(str::trim)
            .find(|t| !t.is_empty())
            .map(str::to_string)
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn requires_api_key(&self) -> bool {
        true
    }

    async fn complete(&self, context: &Context) -> Result<OutgoingMessage, PledgeError> {
        let start = Instant::now();
        let body = CompletionRequest {
            model: &self.model,
            messages: request_messages(context)?,
        };
        debug!("openai: POST {} model={}", self.endpoint, self.model);

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| PledgeError::Provider(format!("openai request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(PledgeError::Provider(format!(
                "openai returned {status}: {text}"
            )));
        }

        let completion: Completion = resp
            .json()
            .await
            .map_err(|e| PledgeError::Provider(format!("openai: failed to parse response: {e}")))?;

        let text = completion
            .reply_text()
            .ok_or_else(|| PledgeError::Provider("openai: empty completion".to_string()))?;

        Ok(OutgoingMessage {
            text,
            metadata: MessageMetadata {
                provider_used: "openai".to_string(),
                tokens_used: completion.usage.and_then(|u| u.total_tokens),
                processing_time_ms: start.elapsed().as_millis() as u64,
                model: completion.model,
            },
            ..Default::default()
        })
    }

    /// A key is all the responder needs; reachability shows up per request.
    async fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pledge_core::profile::{ProfileSnapshot, Settings, TaskEntry, UserProfile};

    fn config(api_key: &str) -> OpenAiConfig {
        OpenAiConfig {
            api_key: api_key.into(),
            model: "gpt-4o-mini".into(),
            base_url: "https://api.openai.com/v1/".into(),
        }
    }

    fn context(system: &str) -> Context {
        let mut profile = UserProfile::new("u1", Settings::default());
        profile.current_tasks = vec![TaskEntry::pending(1, "ship the release")];
        Context::new("did I slack today?", system, profile.snapshot())
    }

    #[tokio::test]
    async fn test_availability_follows_api_key() {
        assert!(OpenAiProvider::from_config(&config("sk-test")).is_available().await);
        assert!(!OpenAiProvider::from_config(&config("")).is_available().await);
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let p = OpenAiProvider::from_config(&config("sk-test"));
        assert_eq!(p.endpoint, "https://api.openai.com/v1/chat/completions");
        assert!(p.requires_api_key());
    }

    #[test]
    fn test_request_carries_persona_snapshot_and_text() {
        let ctx = context("Be blunt.");
        let messages = request_messages(&ctx).unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!((messages[0].role, &*messages[0].content), ("system", "Be blunt."));
        assert_eq!(messages[2].role, "user");
        assert_eq!(messages[2].content, "did I slack today?");

        let block = messages[1].content.strip_prefix(PROFILE_HEADING).unwrap();
        let snapshot: ProfileSnapshot = serde_json::from_str(block.trim()).unwrap();
        assert_eq!(snapshot, ctx.profile);
    }

    #[test]
    fn test_empty_persona_is_omitted() {
        let ctx = context("");
        let messages = request_messages(&ctx).unwrap();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].content.starts_with(PROFILE_HEADING));
    }

    #[test]
    fn test_reply_text_skips_blank_choices() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"  "}},{"message":{"role":"assistant","content":" Keep going. "}}],"model":"gpt-4o-mini","usage":{"total_tokens":42}}"#;
        let completion: Completion = serde_json::from_str(json).unwrap();
        assert_eq!(completion.reply_text().as_deref(), Some("Keep going."));
        assert_eq!(completion.usage.and_then(|u| u.total_tokens), Some(42));
    }

    #[test]
    fn test_missing_choices_yield_none() {
        let completion: Completion = serde_json::from_str(r#"{"model":"x"}"#).unwrap();
        assert!(completion.reply_text().is_none());
        let null_content: Completion =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(null_content.reply_text().is_none());
    }
}
