// File: ./src/provider.rs
// Static table of AI providers and the models they own.
use std::fmt;

/// Which upstream request shape a provider speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Gemini,
    OpenAi,
    Groq,
    /// Listed for selection but not wired to an upstream API.
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provider {
    pub name: &'static str,
    /// Stable identifier used for icon lookup and for per-provider API keys.
    pub key: &'static str,
    pub models: &'static [&'static str],
    route: Route,
}

impl Provider {
    pub fn route(&self) -> Route {
        self.route
    }

    pub fn owns(&self, model_id: &str) -> bool {
        self.models.contains(&model_id)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

pub static PROVIDERS: &[Provider] = &[
    Provider {
        name: "Google",
        key: "google",
        models: &["gemini-1.5-flash", "gemini-1.5-pro", "gemini-2.0-flash"],
        route: Route::Gemini,
    },
    Provider {
        name: "OpenAI",
        key: "openai",
        models: &["gpt-4o-mini", "gpt-4o"],
        route: Route::OpenAi,
    },
    Provider {
        name: "Groq",
        key: "groq",
        models: &["mixtral-8x7b-32768", "gemma2-9b-it"],
        route: Route::Groq,
    },
    // Llama models are served through Groq.
    Provider {
        name: "Meta",
        key: "meta",
        models: &["llama-3.3-70b-versatile", "llama-3.1-8b-instant"],
        route: Route::Groq,
    },
    Provider {
        name: "Anthropic",
        key: "anthropic",
        models: &["claude-3-5-sonnet", "claude-3-haiku"],
        route: Route::Unsupported,
    },
    Provider {
        name: "DeepSeek",
        key: "deepseek",
        models: &["deepseek-chat"],
        route: Route::Unsupported,
    },
];

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

pub fn all_providers() -> &'static [Provider] {
    PROVIDERS
}

/// Which provider owns `model_id`.
pub fn provider_for_model(model_id: &str) -> Option<&'static Provider> {
    PROVIDERS.iter().find(|p| p.owns(model_id))
}

pub fn provider_by_key(key: &str) -> Option<&'static Provider> {
    PROVIDERS.iter().find(|p| p.key.eq_ignore_ascii_case(key))
}

/// Routing for a model id; unknown ids are `Unsupported`.
pub fn route_for_model(model_id: &str) -> Route {
    provider_for_model(model_id)
        .map(Provider::route)
        .unwrap_or(Route::Unsupported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_model_ids_are_unique() {
        let mut seen = HashSet::new();
        for p in all_providers() {
            for m in p.models {
                assert!(seen.insert(*m), "duplicate model id {}", m);
            }
        }
    }

    #[test]
    fn test_llama_routes_through_groq() {
        assert_eq!(route_for_model("llama-3.1-8b-instant"), Route::Groq);
        assert_eq!(provider_for_model("llama-3.1-8b-instant").map(|p| p.key), Some("meta"));
        assert_eq!(route_for_model("no-such-model"), Route::Unsupported);
        assert!(provider_for_model(DEFAULT_MODEL).is_some());
    }
}
