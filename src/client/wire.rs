// File: src/client/wire.rs
//! Request and response bodies for the upstream model APIs.
use serde::{Deserialize, Serialize};

// --- Gemini generateContent ---

#[derive(Serialize, Debug)]
pub struct GeminiRequest<'a> {
    pub contents: Vec<GeminiContent<'a>>,
}

#[derive(Serialize, Debug)]
pub struct GeminiContent<'a> {
    pub parts: Vec<GeminiPartOut<'a>>,
}

#[derive(Serialize, Debug)]
pub struct GeminiPartOut<'a> {
    pub text: &'a str,
}

impl<'a> GeminiRequest<'a> {
    pub fn new(prompt: &'a str) -> Self {
        Self {
            contents: vec![GeminiContent {
                parts: vec![GeminiPartOut { text: prompt }],
            }],
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize, Debug, Default)]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiReplyContent>,
}

#[derive(Deserialize, Debug, Default)]
pub struct GeminiReplyContent {
    #[serde(default)]
    pub parts: Vec<GeminiPartIn>,
}

#[derive(Deserialize, Debug, Default)]
pub struct GeminiPartIn {
    #[serde(default)]
    pub text: Option<String>,
}

// --- OpenAI-compatible chat completions (OpenAI, Groq) ---

#[derive(Serialize, Debug)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessageOut<'a>>,
    pub temperature: f32,
}

#[derive(Serialize, Debug)]
pub struct ChatMessageOut<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

impl<'a> ChatRequest<'a> {
    pub fn new(model: &'a str, prompt: &'a str, temperature: f32) -> Self {
        Self {
            model,
            messages: vec![ChatMessageOut {
                role: "user",
                content: prompt,
            }],
            temperature,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChatMessageIn>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ChatMessageIn {
    #[serde(default)]
    pub content: Option<String>,
}

// --- Errors (both APIs wrap them in {"error": {"message": ...}}) ---

#[derive(Deserialize, Debug)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Deserialize, Debug)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
}

/// Upstream error message, or the raw body when it isn't the usual envelope.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(env) if !env.error.message.is_empty() => env.error.message,
        _ => body.trim().to_string(),
    }
}

/// A decoded upstream reply.
#[derive(Debug)]
pub enum UpstreamReply {
    Gemini(GeminiResponse),
    Chat(ChatResponse),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Empty,
}

impl UpstreamReply {
    /// First candidate/choice text; blank text counts as empty.
    pub fn normalize(self) -> Reply {
        let text = match self {
            UpstreamReply::Gemini(r) => r
                .candidates
                .into_iter()
                .next()
                .and_then(|c| c.content)
                .and_then(|c| c.parts.into_iter().next())
                .and_then(|p| p.text),
            UpstreamReply::Chat(r) => r
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message)
                .and_then(|m| m.content),
        };
        match text {
            Some(t) if !t.trim().is_empty() => Reply::Text(t),
            _ => Reply::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_empty_candidates_normalize_to_empty() {
        let r: GeminiResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(UpstreamReply::Gemini(r).normalize(), Reply::Empty);
        let r: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(UpstreamReply::Gemini(r).normalize(), Reply::Empty);
    }

    #[test]
    fn test_error_message_falls_back_to_body() {
        assert_eq!(
            error_message(r#"{"error":{"message":"bad key","code":401}}"#),
            "bad key"
        );
        assert_eq!(error_message("Service Unavailable\n"), "Service Unavailable");
    }

    #[test]
    fn test_chat_request_shape() {
        let json = serde_json::to_value(ChatRequest::new("gpt-4o", "hi", 0.5)).unwrap();
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hi");
        assert_eq!(json["temperature"], 0.5);
    }
}
