// File: src/client/dispatch.rs
use crate::client::core::{ChatTransport, HttpsTransport, InboundResponse, OutboundRequest};
use crate::client::wire::{
    ChatRequest, ChatResponse, GeminiRequest, GeminiResponse, Reply, UpstreamReply, error_message,
};
use crate::config::{Config, Endpoints, Settings};
use crate::provider::{self, Route};
use thiserror::Error;

pub const MISSING_KEY_MESSAGE: &str = "API key not found. Please add your API key in Settings \
to start chatting with the assistant.";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("{}", MISSING_KEY_MESSAGE)]
    MissingApiKey,
    #[error("{provider} API error ({status}): {message}")]
    Upstream {
        provider: &'static str,
        status: u16,
        message: String,
    },
    #[error("Failed to reach {provider}: {reason}")]
    Transport {
        provider: &'static str,
        reason: String,
    },
}

/// Lifecycle of a single model call. There is no retry: a call ends in
/// `Success` or `Failed` and a new call starts from `Idle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallState {
    Idle,
    Sending,
    Success(String),
    Failed(String),
}

impl CallState {
    pub fn is_sending(&self) -> bool {
        matches!(self, CallState::Sending)
    }
}

impl From<&Result<String, DispatchError>> for CallState {
    fn from(result: &Result<String, DispatchError>) -> Self {
        match result {
            Ok(text) => CallState::Success(text.clone()),
            Err(e) => CallState::Failed(e.to_string()),
        }
    }
}

fn no_response(provider: &str) -> String {
    format!("No response from {}.", provider)
}

/// Stub reply for models listed in the registry but not wired to an API.
pub fn unsupported_reply(model_id: &str) -> String {
    match provider::provider_for_model(model_id) {
        Some(p) => format!(
            "The {} model \"{}\" isn't connected yet. Pick a Google, OpenAI, Groq or Meta model in Settings.",
            p.name, model_id
        ),
        None => format!(
            "Unknown model \"{}\". Pick one of the available models in Settings.",
            model_id
        ),
    }
}

/// Routes prompts to the provider owning the selected model.
pub struct Dispatcher<T: ChatTransport = HttpsTransport> {
    transport: T,
    endpoints: Endpoints,
    temperature: f32,
}

impl Dispatcher<HttpsTransport> {
    pub fn from_config(config: &Config) -> Result<Self, String> {
        Ok(Self::new(
            HttpsTransport::new()?,
            config.endpoints.clone(),
            config.temperature,
        ))
    }
}

impl<T: ChatTransport> Dispatcher<T> {
    pub fn new(transport: T, endpoints: Endpoints, temperature: f32) -> Self {
        Self {
            transport,
            endpoints,
            temperature,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends `prompt` to `model_id`. A blank or absent key fails before any
    /// request is made.
    pub async fn dispatch(
        &self,
        model_id: &str,
        prompt: &str,
        api_key: Option<&str>,
    ) -> Result<String, DispatchError> {
        let Some(key) = api_key.map(str::trim).filter(|k| !k.is_empty()) else {
            log::debug!("No API key for {}; not dispatching", model_id);
            return Err(DispatchError::MissingApiKey);
        };

        let route = provider::route_for_model(model_id);
        log::debug!("Dispatching to {} via {:?}", model_id, route);
        match route {
            Route::Gemini => self.call_gemini(model_id, prompt, key).await,
            Route::OpenAi => {
                self.call_chat("OpenAI", &self.endpoints.openai, model_id, prompt, key)
                    .await
            }
            Route::Groq => {
                self.call_chat("Groq", &self.endpoints.groq, model_id, prompt, key)
                    .await
            }
            Route::Unsupported => Ok(unsupported_reply(model_id)),
        }
    }

    /// Dispatches to the selected model using the settings' key for its provider.
    pub async fn dispatch_with(
        &self,
        settings: &dyn Settings,
        prompt: &str,
    ) -> Result<String, DispatchError> {
        let model_id = settings.selected_model();
        self.dispatch(model_id, prompt, key_for_model(settings, model_id))
            .await
    }

    /// Like [`Self::dispatch_with`], with every failure rendered as transcript text.
    pub async fn respond(&self, settings: &dyn Settings, prompt: &str) -> String {
        match self.dispatch_with(settings, prompt).await {
            Ok(text) => text,
            Err(e) => {
                if !matches!(e, DispatchError::MissingApiKey) {
                    log::warn!("Model call failed: {}", e);
                }
                e.to_string()
            }
        }
    }

    async fn call_gemini(
        &self,
        model_id: &str,
        prompt: &str,
        key: &str,
    ) -> Result<String, DispatchError> {
        const PROVIDER: &str = "Gemini";
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoints.gemini.trim_end_matches('/'),
            encode_component(model_id),
            encode_component(key)
        );
        let body = serde_json::to_string(&GeminiRequest::new(prompt)).map_err(|e| {
            DispatchError::Transport {
                provider: PROVIDER,
                reason: e.to_string(),
            }
        })?;
        let resp = self
            .send(
                PROVIDER,
                OutboundRequest {
                    url,
                    bearer: None,
                    body,
                },
            )
            .await?;
        let reply = serde_json::from_str::<GeminiResponse>(&resp.body)
            .map(UpstreamReply::Gemini)
            .ok();
        Ok(render(PROVIDER, reply))
    }

    async fn call_chat(
        &self,
        provider: &'static str,
        base: &str,
        model_id: &str,
        prompt: &str,
        key: &str,
    ) -> Result<String, DispatchError> {
        let url = format!("{}/chat/completions", base.trim_end_matches('/'));
        let body = serde_json::to_string(&ChatRequest::new(model_id, prompt, self.temperature))
            .map_err(|e| DispatchError::Transport {
                provider,
                reason: e.to_string(),
            })?;
        let resp = self
            .send(
                provider,
                OutboundRequest {
                    url,
                    bearer: Some(key.to_string()),
                    body,
                },
            )
            .await?;
        let reply = serde_json::from_str::<ChatResponse>(&resp.body)
            .map(UpstreamReply::Chat)
            .ok();
        Ok(render(provider, reply))
    }

    /// Performs the request and turns non-2xx statuses into errors.
    async fn send(
        &self,
        provider: &'static str,
        request: OutboundRequest,
    ) -> Result<InboundResponse, DispatchError> {
        let resp = self
            .transport
            .post_json(request)
            .await
            .map_err(|reason| DispatchError::Transport { provider, reason })?;
        if !resp.is_success() {
            return Err(DispatchError::Upstream {
                provider,
                status: resp.status,
                message: error_message(&resp.body),
            });
        }
        log::debug!("{} replied with status {}", provider, resp.status);
        Ok(resp)
    }
}

/// Percent-encodes everything outside the RFC 3986 unreserved set.
fn encode_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

fn render(provider: &str, reply: Option<UpstreamReply>) -> String {
    match reply.map(UpstreamReply::normalize) {
        Some(Reply::Text(text)) => text,
        Some(Reply::Empty) | None => no_response(provider),
    }
}

/// The owning provider's key; Groq-served models also accept the Groq key.
pub fn key_for_model<'a>(settings: &'a dyn Settings, model_id: &str) -> Option<&'a str> {
    let Some(p) = provider::provider_for_model(model_id) else {
        return settings.api_key_for("");
    };
    settings.api_key_for(p.key).or_else(|| match p.route() {
        Route::Groq => settings.api_key_for("groq"),
        _ => None,
    })
}
