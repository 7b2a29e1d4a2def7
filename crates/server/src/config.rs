//! Server configuration

/// Upstream API base URLs (no trailing slash)
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub open_meteo: String,
    pub google_search: String,
    pub duckduckgo: String,
    pub gemini: String,
    pub groq: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            open_meteo: "https://api.open-meteo.com".into(),
            google_search: "https://www.googleapis.com".into(),
            duckduckgo: "https://html.duckduckgo.com".into(),
            gemini: "https://generativelanguage.googleapis.com".into(),
            groq: "https://api.groq.com".into(),
        }
    }
}

/// Provider credentials. Every one is optional; a missing key disables
/// the strategies that need it.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub google_search_api_key: Option<String>,
    pub google_search_engine_id: Option<String>,
    pub gemini_api_key: Option<String>,
    pub groq_api_key: Option<String>,
}

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub cors_origins: Vec<String>,
    pub credentials: Credentials,
    pub endpoints: Endpoints,
    pub gemini_model: String,
    pub groq_model: String,
    pub upstream_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Endpoints::default();

        Self {
            bind_address: get("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:8000".into()),
            cors_origins: get("CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_else(|| vec!["*".to_string()]),
            credentials: Credentials {
                google_search_api_key: get("GOOGLE_SEARCH_API_KEY"),
                google_search_engine_id: get("GOOGLE_SEARCH_ENGINE_ID"),
                gemini_api_key: get("GEMINI_API_KEY"),
                groq_api_key: get("GROQ_API_KEY"),
            },
            endpoints: Endpoints {
                open_meteo: base_url(get("OPEN_METEO_BASE_URL"), defaults.open_meteo),
                google_search: base_url(get("GOOGLE_SEARCH_BASE_URL"), defaults.google_search),
                duckduckgo: base_url(get("DUCKDUCKGO_BASE_URL"), defaults.duckduckgo),
                gemini: base_url(get("GEMINI_BASE_URL"), defaults.gemini),
                groq: base_url(get("GROQ_BASE_URL"), defaults.groq),
            },
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| "gemini-1.5-flash".into()),
            groq_model: get("GROQ_MODEL").unwrap_or_else(|| "llama-3.3-70b-versatile".into()),
            upstream_timeout_secs: get("UPSTREAM_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(30),
        }
    }

    /// Keyed search needs both the API key and the engine id
    pub fn has_keyed_search(&self) -> bool {
        self.credentials.google_search_api_key.is_some()
            && self.credentials.google_search_engine_id.is_some()
    }
}

fn base_url(value: Option<String>, default: String) -> String {
    value
        .map(|v| v.trim_end_matches('/').to_string())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bind_address, "0.0.0.0:8000");
        assert_eq!(config.cors_origins, vec!["*"]);
        assert!(config.credentials.gemini_api_key.is_none());
        assert!(!config.has_keyed_search());
        assert_eq!(config.endpoints.open_meteo, "https://api.open-meteo.com");
        assert_eq!(config.endpoints.duckduckgo, "https://html.duckduckgo.com");
        assert_eq!(config.upstream_timeout_secs, 30);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "gm-key"),
            ("GOOGLE_SEARCH_API_KEY", "cse-key"),
            ("GOOGLE_SEARCH_ENGINE_ID", "cse-id"),
            ("CORS_ORIGINS", "https://a.example, https://b.example,"),
            ("GROQ_BASE_URL", "http://127.0.0.1:9999/"),
            ("UPSTREAM_TIMEOUT_SECS", "5"),
        ]));

        assert_eq!(config.credentials.gemini_api_key.as_deref(), Some("gm-key"));
        assert!(config.has_keyed_search());
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.endpoints.groq, "http://127.0.0.1:9999");
        assert_eq!(config.upstream_timeout_secs, 5);
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = Config::from_lookup(lookup(&[
            ("GROQ_API_KEY", "   "),
            ("GOOGLE_SEARCH_API_KEY", "cse-key"),
            ("UPSTREAM_TIMEOUT_SECS", "0"),
        ]));

        assert!(config.credentials.groq_api_key.is_none());
        // engine id missing
        assert!(!config.has_keyed_search());
        assert_eq!(config.upstream_timeout_secs, 30);
    }
}
