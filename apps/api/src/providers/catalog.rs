//! Built-in provider definitions, in priority order of declaration.

use serde_json::{json, Value};

use crate::providers::{flatten_conversation, text_at, AuthScheme, ChatMessage, ProviderSpec};

pub const HUGGINGFACE_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/mistralai/Mistral-7B-Instruct-v0.3";
pub const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash-latest:generateContent";
pub const OPENROUTER_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const GROQ_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";

pub const OPENROUTER_MODEL: &str = "microsoft/wizardlm-2-8x22b";
pub const GROQ_MODEL: &str = "llama-3.1-8b-instant";

/// Shown on the OpenRouter dashboard next to the traffic we send.
const OPENROUTER_APP_TITLE: &str = "CV Optimizer AI";

pub fn huggingface(credential: Option<String>) -> ProviderSpec {
    ProviderSpec::new(
        "HuggingFace",
        "HUGGINGFACE_API_KEY",
        HUGGINGFACE_ENDPOINT,
        AuthScheme::Bearer,
        huggingface_request,
        huggingface_response,
    )
    .with_credential(credential)
}

pub fn gemini(credential: Option<String>) -> ProviderSpec {
    ProviderSpec::new(
        "Gemini",
        "GEMINI_API_KEY",
        GEMINI_ENDPOINT,
        AuthScheme::Header("x-goog-api-key"),
        gemini_request,
        gemini_response,
    )
    .with_credential(credential)
}

pub fn openrouter(credential: Option<String>, public_origin: &str) -> ProviderSpec {
    ProviderSpec::new(
        "OpenRouter",
        "OPENROUTER_API_KEY",
        OPENROUTER_ENDPOINT,
        AuthScheme::Bearer,
        openrouter_request,
        chat_completion_response,
    )
    .with_credential(credential)
    .with_header("HTTP-Referer", public_origin)
    .with_header("X-Title", OPENROUTER_APP_TITLE)
}

pub fn groq(credential: Option<String>) -> ProviderSpec {
    ProviderSpec::new(
        "Groq",
        "GROQ_API_KEY",
        GROQ_ENDPOINT,
        AuthScheme::Bearer,
        groq_request,
        chat_completion_response,
    )
    .with_credential(credential)
}

fn huggingface_request(messages: &[ChatMessage]) -> Value {
    json!({
        "inputs": flatten_conversation(messages),
        "parameters": {
            "max_new_tokens": 2000,
            "temperature": 0.3,
            "do_sample": true,
            "return_full_text": false
        }
    })
}

fn huggingface_response(body: &Value) -> Option<String> {
    text_at(body, "/0/generated_text")
}

fn gemini_request(messages: &[ChatMessage]) -> Value {
    json!({
        "contents": [{
            "parts": [{ "text": flatten_conversation(messages) }]
        }],
        "generationConfig": {
            "temperature": 0.3,
            "topK": 1,
            "topP": 1,
            "maxOutputTokens": 4096
        }
    })
}

fn gemini_response(body: &Value) -> Option<String> {
    text_at(body, "/candidates/0/content/parts/0/text")
}

fn openrouter_request(messages: &[ChatMessage]) -> Value {
    json!({
        "model": OPENROUTER_MODEL,
        "messages": messages,
        "temperature": 0.3,
        "max_tokens": 2000
    })
}

fn groq_request(messages: &[ChatMessage]) -> Value {
    json!({
        "model": GROQ_MODEL,
        "messages": messages,
        "max_tokens": 4000,
        "temperature": 0.1,
        "stream": false
    })
}

fn chat_completion_response(body: &Value) -> Option<String> {
    text_at(body, "/choices/0/message/content")
}
