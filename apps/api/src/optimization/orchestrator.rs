//! Orchestrator: walks the provider registry in declared order and returns the first
//! structurally valid résumé.
//!
//! Flow per request: analyze JD → build conversation once → for each provider:
//! skip if unconfigured → call (retrying 429s) → normalize → first success wins.
//! Calls are strictly sequential; there is no speculative fan-out.
//!
//! Cancellation: the returned future owns the in-flight request. Dropping it (e.g. the
//! HTTP client disconnects and axum drops the handler) aborts the pending call.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::models::resume::ResumeProfile;
use crate::optimization::jd_analyzer::{analyze, JobAnalysis};
use crate::optimization::normalizer::{normalize, PLACEHOLDER_POSITION};
use crate::optimization::prompts::build_conversation;
use crate::providers::{ChatMessage, ProviderError, ProviderRegistry, ProviderSpec};

/// 429 responses are retried at most this many times per provider.
pub const MAX_RATE_LIMIT_RETRIES: u32 = 2;

/// How much of an unusable provider response is logged at debug level.
const RAW_PREVIEW_CHARS: usize = 300;

/// Prompt for the connectivity check. Small enough to stay inside any free tier.
const CONNECTION_CHECK_PROMPT: &str = "Reply with exactly: connection OK";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    /// Fixed wait before re-invoking a rate-limited provider.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RATE_LIMIT_RETRIES,
            delay: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Skipped,
    Failed,
    Succeeded,
}

/// What happened with one provider during a single optimization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderAttempt {
    pub provider: String,
    pub outcome: AttemptOutcome,
    pub rate_limit_retries: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A successful optimization: the winning provider and its normalized profile.
#[derive(Debug, Clone, Serialize)]
pub struct Optimization {
    pub provider: String,
    pub profile: ResumeProfile,
    pub attempts: Vec<ProviderAttempt>,
}

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error(
        "no AI provider produced a valid résumé ({attempted} attempted, {skipped} without credentials){}",
        last_error_suffix(.last_error)
    )]
    AllProvidersExhausted {
        attempted: usize,
        skipped: usize,
        attempts: Vec<ProviderAttempt>,
        #[source]
        last_error: Option<ProviderError>,
    },
}

/// Result of a single connectivity check against one provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionCheck {
    #[serde(flatten)]
    pub attempt: ProviderAttempt,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
}

fn last_error_suffix(last_error: &Option<ProviderError>) -> String {
    last_error
        .as_ref()
        .map(|e| format!("; last error: {e}"))
        .unwrap_or_default()
}

/// The seam route handlers depend on. `AppState` carries an `Arc<dyn ResumeOptimizer>`.
#[async_trait]
pub trait ResumeOptimizer: Send + Sync {
    async fn optimize(
        &self,
        resume_text: &str,
        job_text: &str,
    ) -> Result<Optimization, OptimizeError>;

    /// Sends a minimal prompt to the named provider. `None` when no provider has that name.
    async fn check_provider(&self, name: &str) -> Option<ConnectionCheck>;
}

/// Sequential multi-provider orchestrator over a shared, immutable registry.
pub struct Orchestrator {
    registry: Arc<ProviderRegistry>,
    client: Client,
    retry: RetryPolicy,
}

impl Orchestrator {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            registry,
            client: Client::builder().timeout(timeout).build()?,
            retry,
        })
    }

    pub fn from_config(registry: Arc<ProviderRegistry>, config: &Config) -> anyhow::Result<Self> {
        let retry = RetryPolicy {
            delay: Duration::from_secs(config.rate_limit_retry_delay_secs),
            ..RetryPolicy::default()
        };
        let timeout = Duration::from_secs(config.provider_timeout_secs);
        Ok(Self::new(registry, timeout, retry)?)
    }

    /// Runs the full provider walk for one résumé/job pair.
    pub async fn run(
        &self,
        resume_text: &str,
        job_text: &str,
    ) -> Result<Optimization, OptimizeError> {
        let analysis = analyze(job_text);
        debug!(
            "Job analysis: title={:?}, {} keywords",
            analysis.title,
            analysis.keywords.len()
        );
        let conversation = build_conversation(resume_text, job_text, &analysis);

        let mut attempts = Vec::with_capacity(self.registry.len());
        let mut last_error = None;

        for spec in self.registry.iter() {
            if !spec.is_configured() {
                info!(
                    "{}: {} not configured, skipping",
                    spec.name, spec.credential_env
                );
                attempts.push(ProviderAttempt {
                    provider: spec.name.to_string(),
                    outcome: AttemptOutcome::Skipped,
                    rate_limit_retries: 0,
                    error: None,
                });
                continue;
            }

            info!("Trying provider {}...", spec.name);
            let mut retries = 0;
            let result = self
                .call_provider(spec, &conversation, &mut retries)
                .await
                .and_then(|text| {
                    normalize(&text).map_err(|source| ProviderError::InvalidStructure {
                        provider: spec.name.to_string(),
                        source,
                    })
                });

            match result {
                Ok(mut profile) => {
                    apply_job_hints(&mut profile, &analysis);
                    info!("Résumé optimized successfully with {}", spec.name);
                    attempts.push(ProviderAttempt {
                        provider: spec.name.to_string(),
                        outcome: AttemptOutcome::Succeeded,
                        rate_limit_retries: retries,
                        error: None,
                    });
                    return Ok(Optimization {
                        provider: spec.name.to_string(),
                        profile,
                        attempts,
                    });
                }
                Err(e) => {
                    warn!("Provider {} failed: {}", spec.name, e);
                    if let ProviderError::InvalidStructure { source, .. } = &e {
                        debug!(
                            "Unusable response from {}: {}",
                            spec.name,
                            source.raw().chars().take(RAW_PREVIEW_CHARS).collect::<String>()
                        );
                    }
                    attempts.push(ProviderAttempt {
                        provider: spec.name.to_string(),
                        outcome: AttemptOutcome::Failed,
                        rate_limit_retries: retries,
                        error: Some(e.to_string()),
                    });
                    last_error = Some(e);
                }
            }
        }

        let skipped = attempts
            .iter()
            .filter(|a| a.outcome == AttemptOutcome::Skipped)
            .count();
        let attempted = attempts.len() - skipped;
        error!(
            "All AI providers exhausted: {} attempted, {} skipped (last failure: {})",
            attempted,
            skipped,
            last_error
                .as_ref()
                .map(ProviderError::provider)
                .unwrap_or("none")
        );

        Err(OptimizeError::AllProvidersExhausted {
            attempted,
            skipped,
            attempts,
            last_error,
        })
    }

    /// Sends the connectivity prompt to one provider through the regular retry path.
    /// The reply is reported as-is; it is not normalized into a résumé.
    pub async fn check(&self, spec: &ProviderSpec) -> ConnectionCheck {
        let mut attempt = ProviderAttempt {
            provider: spec.name.to_string(),
            outcome: AttemptOutcome::Skipped,
            rate_limit_retries: 0,
            error: None,
        };

        if !spec.is_configured() {
            info!("{}: {} not configured, skipping check", spec.name, spec.credential_env);
            attempt.error = Some(format!("{} is not set", spec.credential_env));
            return ConnectionCheck {
                attempt,
                reply: None,
            };
        }

        let conversation = [ChatMessage::user(CONNECTION_CHECK_PROMPT)];
        let result = self
            .call_provider(spec, &conversation, &mut attempt.rate_limit_retries)
            .await;

        match result {
            Ok(text) => {
                info!("Connection check against {} succeeded", spec.name);
                attempt.outcome = AttemptOutcome::Succeeded;
                ConnectionCheck {
                    attempt,
                    reply: Some(text.trim().chars().take(RAW_PREVIEW_CHARS).collect()),
                }
            }
            Err(e) => {
                warn!("Connection check against {} failed: {}", spec.name, e);
                attempt.outcome = AttemptOutcome::Failed;
                attempt.error = Some(e.to_string());
                ConnectionCheck {
                    attempt,
                    reply: None,
                }
            }
        }
    }

    /// Calls one provider, retrying on 429 up to the policy bound with a fixed delay.
    /// A 429 that outlives its retries becomes an ordinary HTTP failure.
    async fn call_provider(
        &self,
        spec: &ProviderSpec,
        conversation: &[ChatMessage],
        retries: &mut u32,
    ) -> Result<String, ProviderError> {
        let body = spec.request_body(conversation);

        loop {
            match self.send_once(spec, &body).await {
                Err(ProviderError::RateLimited { .. }) if *retries < self.retry.max_retries => {
                    *retries += 1;
                    warn!(
                        "Rate limited by {}, retrying in {}ms ({}/{})",
                        spec.name,
                        self.retry.delay.as_millis(),
                        retries,
                        self.retry.max_retries
                    );
                    tokio::time::sleep(self.retry.delay).await;
                }
                Err(ProviderError::RateLimited { provider }) => {
                    return Err(ProviderError::http(
                        &provider,
                        StatusCode::TOO_MANY_REQUESTS.as_u16(),
                        "rate limit persisted after retries",
                    ));
                }
                other => return other,
            }
        }
    }

    async fn send_once(&self, spec: &ProviderSpec, body: &Value) -> Result<String, ProviderError> {
        let transport = |source: reqwest::Error| ProviderError::Transport {
            provider: spec.name.to_string(),
            source,
        };

        let request = spec.authorize(self.client.post(&spec.endpoint).json(body))?;
        let response = request.send().await.map_err(transport)?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited {
                provider: spec.name.to_string(),
            });
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::http(spec.name, status.as_u16(), &text));
        }

        // Some gateways answer 2xx with a text/plain body; hand that to the normalizer as-is.
        let raw = response.text().await.map_err(transport)?;
        let text = match serde_json::from_str::<Value>(&raw) {
            Ok(decoded) => spec.extract_text(&decoded),
            Err(_) => raw,
        };
        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse {
                provider: spec.name.to_string(),
            });
        }

        Ok(text)
    }
}

#[async_trait]
impl ResumeOptimizer for Orchestrator {
    async fn optimize(
        &self,
        resume_text: &str,
        job_text: &str,
    ) -> Result<Optimization, OptimizeError> {
        self.run(resume_text, job_text).await
    }

    async fn check_provider(&self, name: &str) -> Option<ConnectionCheck> {
        let spec = self.registry.get(name)?;
        Some(self.check(spec).await)
    }
}

/// Fills gaps the provider left that the local job analysis can answer.
fn apply_job_hints(profile: &mut ResumeProfile, analysis: &JobAnalysis) {
    if profile.keywords.is_empty() {
        profile.keywords = analysis.keywords.clone();
    }
    if profile.position == PLACEHOLDER_POSITION && analysis.has_title() {
        profile.position = analysis.title.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{AuthScheme, ProviderSpec};
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;

    const RESUME_JSON: &str = r#"{
        "name": "Ana Souza",
        "position": "Senior Backend Engineer",
        "email": "ana@example.com",
        "summary": "Backend engineer with 8 years of Rust and Python.",
        "skills": {"programming": ["Rust", "Python"]},
        "experience": [{"company": "PayCo", "position": "Staff Engineer", "period": "2021 - Present"}],
        "education": [],
        "keywords": ["rust", "kubernetes"]
    }"#;

    const JOB: &str = "Cargo: Senior Backend Engineer\nExperience with Rust and Kubernetes required";

    fn chat_request(messages: &[ChatMessage]) -> Value {
        json!({ "model": "test-model", "messages": messages })
    }

    fn chat_response(body: &Value) -> Option<String> {
        crate::providers::text_at(body, "/choices/0/message/content")
    }

    fn chat_body(content: &str) -> String {
        json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] })
            .to_string()
    }

    fn provider(
        server: &ServerGuard,
        name: &'static str,
        path: &str,
        key: Option<&str>,
    ) -> ProviderSpec {
        ProviderSpec::new(
            name,
            "TEST_API_KEY",
            format!("{}{}", server.url(), path),
            AuthScheme::Bearer,
            chat_request,
            chat_response,
        )
        .with_credential(key.map(String::from))
    }

    fn orchestrator(registry: ProviderRegistry) -> Orchestrator {
        Orchestrator::new(
            Arc::new(registry),
            Duration::from_secs(5),
            RetryPolicy {
                max_retries: MAX_RATE_LIMIT_RETRIES,
                delay: Duration::from_millis(10),
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_unconfigured_provider_is_never_called() {
        let mut server = Server::new_async().await;
        let first = server
            .mock("POST", "/first")
            .expect(0)
            .create_async()
            .await;
        let second = server
            .mock("POST", "/second")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body(RESUME_JSON))
            .expect(1)
            .create_async()
            .await;

        let registry = ProviderRegistry::new()
            .register(provider(&server, "First", "/first", None))
            .register(provider(&server, "Second", "/second", Some("k2")));

        let result = orchestrator(registry).run("Ana Souza", JOB).await.unwrap();

        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(result.provider, "Second");
        assert_eq!(result.profile.name, "Ana Souza");
        assert_eq!(result.attempts[0].outcome, AttemptOutcome::Skipped);
        assert_eq!(result.attempts[1].outcome, AttemptOutcome::Succeeded);
    }

    #[tokio::test]
    async fn test_rate_limit_then_success_retries_once() {
        let mut server = Server::new_async().await;
        let limited = server
            .mock("POST", "/llm")
            .with_status(429)
            .with_body("slow down")
            .expect(1)
            .create_async()
            .await;
        let ok = server
            .mock("POST", "/llm")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body(RESUME_JSON))
            .expect(1)
            .create_async()
            .await;

        let registry = ProviderRegistry::new().register(provider(&server, "Only", "/llm", Some("k")));
        let result = orchestrator(registry).run("resume", JOB).await.unwrap();

        limited.assert_async().await;
        ok.assert_async().await;
        assert_eq!(result.attempts.len(), 1);
        assert_eq!(result.attempts[0].rate_limit_retries, 1);
        assert_eq!(result.attempts[0].outcome, AttemptOutcome::Succeeded);
    }

    #[tokio::test]
    async fn test_persistent_rate_limit_falls_through_after_two_retries() {
        let mut server = Server::new_async().await;
        let limited = server
            .mock("POST", "/limited")
            .with_status(429)
            .expect(3)
            .create_async()
            .await;
        let backup = server
            .mock("POST", "/backup")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body(RESUME_JSON))
            .expect(1)
            .create_async()
            .await;

        let registry = ProviderRegistry::new()
            .register(provider(&server, "Limited", "/limited", Some("k1")))
            .register(provider(&server, "Backup", "/backup", Some("k2")));
        let result = orchestrator(registry).run("resume", JOB).await.unwrap();

        limited.assert_async().await;
        backup.assert_async().await;
        assert_eq!(result.provider, "Backup");
        let first = &result.attempts[0];
        assert_eq!(first.outcome, AttemptOutcome::Failed);
        assert_eq!(first.rate_limit_retries, MAX_RATE_LIMIT_RETRIES);
        assert!(first.error.as_deref().unwrap().contains("HTTP 429"));
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let mut server = Server::new_async().await;
        let broken = server
            .mock("POST", "/broken")
            .with_status(500)
            .with_body("internal")
            .expect(1)
            .create_async()
            .await;
        let backup = server
            .mock("POST", "/backup")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body(RESUME_JSON))
            .create_async()
            .await;

        let registry = ProviderRegistry::new()
            .register(provider(&server, "Broken", "/broken", Some("k1")))
            .register(provider(&server, "Backup", "/backup", Some("k2")));
        let result = orchestrator(registry).run("resume", JOB).await.unwrap();

        broken.assert_async().await;
        backup.assert_async().await;
        assert_eq!(result.attempts[0].rate_limit_retries, 0);
        assert!(result.attempts[0]
            .error
            .as_deref()
            .unwrap()
            .contains("HTTP 500"));
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let mut server = Server::new_async().await;
        let primary = server
            .mock("POST", "/primary")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body(&format!("Here is the JSON: {RESUME_JSON} Hope that helps!")))
            .expect(1)
            .create_async()
            .await;
        let secondary = server
            .mock("POST", "/secondary")
            .expect(0)
            .create_async()
            .await;

        let registry = ProviderRegistry::new()
            .register(provider(&server, "Primary", "/primary", Some("k1")))
            .register(provider(&server, "Secondary", "/secondary", Some("k2")));
        let result = orchestrator(registry).run("resume", JOB).await.unwrap();

        primary.assert_async().await;
        secondary.assert_async().await;
        assert_eq!(result.provider, "Primary");
        assert_eq!(result.attempts.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_structure_falls_through() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/chatty")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body("I'm sorry, I can't produce JSON today."))
            .create_async()
            .await;
        server
            .mock("POST", "/strict")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body(RESUME_JSON))
            .create_async()
            .await;

        let registry = ProviderRegistry::new()
            .register(provider(&server, "Chatty", "/chatty", Some("k1")))
            .register(provider(&server, "Strict", "/strict", Some("k2")));
        let result = orchestrator(registry).run("resume", JOB).await.unwrap();

        assert_eq!(result.provider, "Strict");
        assert!(result.attempts[0]
            .error
            .as_deref()
            .unwrap()
            .contains("invalid résumé structure"));
    }

    #[tokio::test]
    async fn test_sends_bearer_credential_and_conversation() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/auth")
            .match_header("authorization", "Bearer secret-key")
            .match_body(Matcher::PartialJson(json!({
                "messages": [{"role": "system"}, {"role": "user"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body(RESUME_JSON))
            .expect(1)
            .create_async()
            .await;

        let registry =
            ProviderRegistry::new().register(provider(&server, "Auth", "/auth", Some("secret-key")));
        orchestrator(registry).run("resume", JOB).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_all_failures_exhaust_with_last_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/down")
            .with_status(503)
            .create_async()
            .await;
        server
            .mock("POST", "/empty")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body("   "))
            .create_async()
            .await;

        let registry = ProviderRegistry::new()
            .register(provider(&server, "Down", "/down", Some("k1")))
            .register(provider(&server, "Unset", "/unset", None))
            .register(provider(&server, "Empty", "/empty", Some("k3")));
        let err = orchestrator(registry).run("resume", JOB).await.unwrap_err();

        match err {
            OptimizeError::AllProvidersExhausted {
                attempted,
                skipped,
                attempts,
                last_error,
            } => {
                assert_eq!(attempted, 2);
                assert_eq!(skipped, 1);
                assert_eq!(attempts.len(), 3);
                assert!(matches!(
                    last_error,
                    Some(ProviderError::EmptyResponse { ref provider }) if provider == "Empty"
                ));
            }
        }
    }

    #[tokio::test]
    async fn test_no_configured_provider_exhausts_without_network() {
        let server = Server::new_async().await;
        let registry = ProviderRegistry::new()
            .register(provider(&server, "A", "/a", None))
            .register(provider(&server, "B", "/b", None));
        let err = orchestrator(registry).run("resume", JOB).await.unwrap_err();

        let message = err.to_string();
        assert!(message.contains("0 attempted, 2 without credentials"));
        let OptimizeError::AllProvidersExhausted { last_error, .. } = err;
        assert!(last_error.is_none());
    }

    #[tokio::test]
    async fn test_hanging_provider_times_out_and_falls_through() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let mut server = Server::new_async().await;
        server
            .mock("POST", "/fast")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body(RESUME_JSON))
            .create_async()
            .await;

        let hanging = ProviderSpec::new(
            "Hanging",
            "TEST_API_KEY",
            format!("http://{addr}/generate"),
            AuthScheme::Bearer,
            chat_request,
            chat_response,
        )
        .with_credential(Some("k".to_string()));
        let registry = ProviderRegistry::new()
            .register(hanging)
            .register(provider(&server, "Fast", "/fast", Some("k2")));
        let orchestrator = Orchestrator::new(
            Arc::new(registry),
            Duration::from_millis(200),
            RetryPolicy::default(),
        )
        .unwrap();

        let result = orchestrator.run("resume", JOB).await.unwrap();
        assert_eq!(result.provider, "Fast");
        assert!(result.attempts[0]
            .error
            .as_deref()
            .unwrap()
            .contains("request failed"));
    }

    #[tokio::test]
    async fn test_job_hints_fill_missing_keywords_and_position() {
        let mut server = Server::new_async().await;
        let sparse = r#"{"name": "Ana", "email": "a@b.c", "summary": "s", "experience": [], "education": [], "skills": {}}"#;
        server
            .mock("POST", "/sparse")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body(sparse))
            .create_async()
            .await;

        let registry =
            ProviderRegistry::new().register(provider(&server, "Sparse", "/sparse", Some("k")));
        let result = orchestrator(registry).run("resume", JOB).await.unwrap();

        assert_eq!(result.profile.position, "Senior Backend Engineer");
        assert_eq!(result.profile.keywords, vec!["rust", "kubernetes"]);
    }

    #[tokio::test]
    async fn test_builtin_groq_spec_against_local_endpoint() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/openai/v1/chat/completions")
            .match_header("authorization", "Bearer gsk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "llama-3.1-8b-instant",
                "stream": false
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body(RESUME_JSON))
            .expect(1)
            .create_async()
            .await;

        let groq = crate::providers::catalog::groq(Some("gsk-test".to_string()))
            .with_endpoint(format!("{}/openai/v1/chat/completions", server.url()));
        let registry = ProviderRegistry::new().register(groq);
        let result = orchestrator(registry).run("resume", JOB).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.provider, "Groq");
    }

    #[tokio::test]
    async fn test_plain_text_success_body_is_normalized() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/plain")
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body(format!("Sure! Here is the résumé:\n{RESUME_JSON}\nGood luck."))
            .create_async()
            .await;

        let registry =
            ProviderRegistry::new().register(provider(&server, "Plain", "/plain", Some("k")));
        let result = orchestrator(registry).run("resume", JOB).await.unwrap();

        assert_eq!(result.provider, "Plain");
        assert_eq!(result.profile.name, "Ana Souza");
    }

    #[tokio::test]
    async fn test_blank_plain_text_body_is_empty_response() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/blank")
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body("  \n ")
            .create_async()
            .await;

        let registry =
            ProviderRegistry::new().register(provider(&server, "Blank", "/blank", Some("k")));
        let err = orchestrator(registry).run("resume", JOB).await.unwrap_err();

        let OptimizeError::AllProvidersExhausted { last_error, .. } = err;
        assert!(matches!(last_error, Some(ProviderError::EmptyResponse { .. })));
    }

    #[tokio::test]
    async fn test_connection_check_sends_minimal_prompt() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/check")
            .match_header("authorization", "Bearer k")
            .match_body(Matcher::PartialJson(json!({
                "messages": [{"role": "user", "content": CONNECTION_CHECK_PROMPT}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body("connection OK"))
            .expect(1)
            .create_async()
            .await;

        let registry =
            ProviderRegistry::new().register(provider(&server, "Check", "/check", Some("k")));
        let check = orchestrator(registry).check_provider("check").await.unwrap();

        mock.assert_async().await;
        assert_eq!(check.attempt.provider, "Check");
        assert_eq!(check.attempt.outcome, AttemptOutcome::Succeeded);
        assert_eq!(check.reply.as_deref(), Some("connection OK"));
    }

    #[tokio::test]
    async fn test_connection_check_retries_rate_limit_then_reports_failure() {
        let mut server = Server::new_async().await;
        let limited = server
            .mock("POST", "/busy")
            .with_status(429)
            .expect(3)
            .create_async()
            .await;

        let registry =
            ProviderRegistry::new().register(provider(&server, "Busy", "/busy", Some("k")));
        let check = orchestrator(registry).check_provider("Busy").await.unwrap();

        limited.assert_async().await;
        assert_eq!(check.attempt.outcome, AttemptOutcome::Failed);
        assert_eq!(check.attempt.rate_limit_retries, MAX_RATE_LIMIT_RETRIES);
        assert!(check.attempt.error.as_deref().unwrap().contains("HTTP 429"));
        assert!(check.reply.is_none());
    }

    #[tokio::test]
    async fn test_connection_check_skips_unconfigured_provider() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/unset")
            .expect(0)
            .create_async()
            .await;

        let registry = ProviderRegistry::new().register(provider(&server, "Unset", "/unset", None));
        let check = orchestrator(registry).check_provider("Unset").await.unwrap();

        mock.assert_async().await;
        assert_eq!(check.attempt.outcome, AttemptOutcome::Skipped);
        assert_eq!(check.attempt.error.as_deref(), Some("TEST_API_KEY is not set"));
    }

    #[tokio::test]
    async fn test_connection_check_unknown_provider() {
        let server = Server::new_async().await;
        let registry = ProviderRegistry::new().register(provider(&server, "Known", "/k", Some("k")));
        assert!(orchestrator(registry).check_provider("unknown").await.is_none());
    }

    #[test]
    fn test_default_retry_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.delay, Duration::from_secs(5));
    }
}
