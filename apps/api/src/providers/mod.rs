//! Providers: declarative descriptions of the AI backends used for résumé rewriting.
//!
//! A provider is data, not a code path: endpoint, auth scheme, a request builder and a
//! response parser. The orchestrator iterates the registry uniformly; adding a backend
//! means appending a `ProviderSpec` in `catalog.rs`, never branching elsewhere.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::optimization::normalizer::NormalizeError;

pub mod catalog;
pub mod registry;

pub use registry::{ProviderRegistry, ProviderSummary};

/// Longest slice of an error body kept in `ProviderError::Http`.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Fallback locations of generated text across the response shapes we know about.
const KNOWN_TEXT_POINTERS: &[&str] = &[
    "/choices/0/message/content",
    "/choices/0/text",
    "/candidates/0/content/parts/0/text",
    "/0/generated_text",
    "/generated_text",
    "/content/0/text",
    "/output_text",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
        }
    }
}

/// One role-tagged message of the conversation sent to a provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Joins a conversation into one prompt for single-input providers.
pub fn flatten_conversation(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.role.as_str(), m.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Builds the provider-specific JSON body from the conversation.
pub type BuildRequest = fn(&[ChatMessage]) -> Value;

/// Pulls generated text out of a decoded response body. `None` when the provider's
/// own path is absent.
pub type ParseResponse = fn(&Value) -> Option<String>;

/// How the credential is attached to the outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer <credential>`
    Bearer,
    /// The credential as the raw value of the named header.
    Header(&'static str),
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider}: credential {env} is not configured")]
    CredentialMissing {
        provider: String,
        env: &'static str,
    },

    #[error("{provider} returned HTTP {status}: {body}")]
    Http {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("{provider} is rate limited (HTTP 429)")]
    RateLimited { provider: String },

    #[error("{provider} request failed: {source}")]
    Transport {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned an empty response")]
    EmptyResponse { provider: String },

    #[error("{provider} returned an unusable résumé: {source}")]
    InvalidStructure {
        provider: String,
        #[source]
        source: NormalizeError,
    },
}

impl ProviderError {
    pub fn provider(&self) -> &str {
        match self {
            ProviderError::CredentialMissing { provider, .. }
            | ProviderError::Http { provider, .. }
            | ProviderError::RateLimited { provider }
            | ProviderError::Transport { provider, .. }
            | ProviderError::EmptyResponse { provider }
            | ProviderError::InvalidStructure { provider, .. } => provider,
        }
    }

    /// Builds an `Http` error, keeping only the head of a large error body.
    pub fn http(provider: &str, status: u16, body: &str) -> Self {
        ProviderError::Http {
            provider: provider.to_string(),
            status,
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        }
    }
}

/// Immutable description of one AI backend.
#[derive(Clone)]
pub struct ProviderSpec {
    pub name: &'static str,
    /// Environment variable the credential is read from.
    pub credential_env: &'static str,
    pub endpoint: String,
    pub auth: AuthScheme,
    pub extra_headers: Vec<(&'static str, String)>,
    pub build_request: BuildRequest,
    pub parse_response: ParseResponse,
    credential: Option<String>,
}

impl fmt::Debug for ProviderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSpec")
            .field("name", &self.name)
            .field("credential_env", &self.credential_env)
            .field("endpoint", &self.endpoint)
            .field("auth", &self.auth)
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl ProviderSpec {
    pub fn new(
        name: &'static str,
        credential_env: &'static str,
        endpoint: impl Into<String>,
        auth: AuthScheme,
        build_request: BuildRequest,
        parse_response: ParseResponse,
    ) -> Self {
        Self {
            name,
            credential_env,
            endpoint: endpoint.into(),
            auth,
            extra_headers: Vec::new(),
            build_request,
            parse_response,
            credential: None,
        }
    }

    /// Sets the credential. Blank values count as absent.
    pub fn with_credential(mut self, credential: Option<String>) -> Self {
        self.credential = credential
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.extra_headers.push((name, value.into()));
        self
    }

    /// Providers without a credential are skipped, not failed.
    pub fn is_configured(&self) -> bool {
        self.credential.is_some()
    }

    pub fn request_body(&self, conversation: &[ChatMessage]) -> Value {
        (self.build_request)(conversation)
    }

    /// Attaches the credential and any static headers to an outbound request.
    pub fn authorize(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, ProviderError> {
        let credential =
            self.credential
                .as_deref()
                .ok_or_else(|| ProviderError::CredentialMissing {
                    provider: self.name.to_string(),
                    env: self.credential_env,
                })?;

        let request = match self.auth {
            AuthScheme::Bearer => request.bearer_auth(credential),
            AuthScheme::Header(name) => request.header(name, credential),
        };

        Ok(self
            .extra_headers
            .iter()
            .fold(request, |req, (name, value)| req.header(*name, value)))
    }

    /// Extracts generated text: the provider's own path first, then any other known
    /// shape, and finally the whole serialized body so the normalizer still has input.
    pub fn extract_text(&self, body: &Value) -> String {
        (self.parse_response)(body)
            .or_else(|| any_known_text(body))
            .unwrap_or_else(|| body.to_string())
    }
}

/// String found at a JSON pointer, if any.
pub fn text_at(body: &Value, pointer: &str) -> Option<String> {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn any_known_text(body: &Value) -> Option<String> {
    KNOWN_TEXT_POINTERS
        .iter()
        .find_map(|pointer| text_at(body, pointer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn echo_request(messages: &[ChatMessage]) -> Value {
        json!({ "prompt": flatten_conversation(messages) })
    }

    fn parse_custom(body: &Value) -> Option<String> {
        text_at(body, "/result/text")
    }

    fn spec() -> ProviderSpec {
        ProviderSpec::new(
            "Custom",
            "CUSTOM_API_KEY",
            "http://localhost/generate",
            AuthScheme::Bearer,
            echo_request,
            parse_custom,
        )
    }

    #[test]
    fn test_blank_credential_is_unconfigured() {
        assert!(!spec().is_configured());
        assert!(!spec().with_credential(Some("   ".to_string())).is_configured());
        assert!(spec().with_credential(Some("sk-1".to_string())).is_configured());
    }

    #[test]
    fn test_debug_output_redacts_credential() {
        let spec = spec().with_credential(Some("super-secret".to_string()));
        let debug = format!("{spec:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("configured: true"));
    }

    #[test]
    fn test_extract_text_prefers_own_path() {
        let body = json!({
            "result": {"text": "own"},
            "choices": [{"message": {"content": "other"}}]
        });
        assert_eq!(spec().extract_text(&body), "own");
    }

    #[test]
    fn test_extract_text_falls_back_to_known_shapes() {
        let body = json!({"candidates": [{"content": {"parts": [{"text": "gemini-like"}]}}]});
        assert_eq!(spec().extract_text(&body), "gemini-like");
    }

    #[test]
    fn test_extract_text_serializes_unknown_body() {
        let body = json!({"unexpected": {"name": "Ana"}});
        assert_eq!(spec().extract_text(&body), r#"{"unexpected":{"name":"Ana"}}"#);
    }

    #[test]
    fn test_flatten_conversation_tags_roles() {
        let messages = vec![ChatMessage::system("rules"), ChatMessage::user("payload")];
        assert_eq!(flatten_conversation(&messages), "system: rules\n\nuser: payload");
    }

    #[test]
    fn test_authorize_without_credential_reports_missing() {
        let client = reqwest::Client::new();
        let err = spec()
            .authorize(client.post("http://localhost/generate"))
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::CredentialMissing { env: "CUSTOM_API_KEY", .. }
        ));
    }

    #[test]
    fn test_http_error_truncates_body() {
        let body = "x".repeat(2_000);
        match ProviderError::http("Custom", 500, &body) {
            ProviderError::Http { body, status, .. } => {
                assert_eq!(status, 500);
                assert_eq!(body.len(), MAX_ERROR_BODY_CHARS);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_value(ChatMessage::system("x")).unwrap();
        assert_eq!(json["role"], "system");
    }
}
