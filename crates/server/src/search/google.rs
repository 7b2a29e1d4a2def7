//! Google Programmable Search (Custom Search JSON API)

use async_trait::async_trait;
use medsupply_core::{ProviderError, SearchResultItem};
use serde::Deserialize;

use super::SearchProvider;
use crate::config::Config;

/// The API refuses `num` above 10
const MAX_RESULTS: usize = 10;

/// Keyed search provider; needs an API key and a search engine id
#[derive(Clone)]
pub struct GoogleSearchClient {
    http: reqwest::Client,
    api_key: Option<String>,
    engine_id: Option<String>,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct CseResponse {
    #[serde(default)]
    items: Vec<CseItem>,
}

#[derive(Debug, Deserialize)]
struct CseItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    link: String,
}

impl GoogleSearchClient {
    pub fn new(config: &Config, http: reqwest::Client) -> Self {
        Self {
            http,
            api_key: config.credentials.google_search_api_key.clone(),
            engine_id: config.credentials.google_search_engine_id.clone(),
            base_url: config.endpoints.google_search.clone(),
        }
    }
}

#[async_trait]
impl SearchProvider for GoogleSearchClient {
    fn name(&self) -> &'static str {
        "google_cse"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.engine_id.is_some()
    }

    async fn try_search(
        &self,
        query: &str,
        count: usize,
    ) -> Result<Vec<SearchResultItem>, ProviderError> {
        let (Some(key), Some(cx)) = (self.api_key.as_deref(), self.engine_id.as_deref()) else {
            return Err(ProviderError::credential_missing(
                "GOOGLE_SEARCH_API_KEY/GOOGLE_SEARCH_ENGINE_ID",
            ));
        };

        let num = count.clamp(1, MAX_RESULTS).to_string();
        let response = self
            .http
            .get(format!("{}/customsearch/v1", self.base_url))
            .query(&[("key", key), ("cx", cx), ("q", query), ("num", num.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::transport(format!("Google CSE request failed: {e}")))?;

        if !response.status().is_success() {
            let message = crate::http::error_message("Google CSE", response).await;
            return Err(ProviderError::Transport(message));
        }

        let body = response
            .json::<CseResponse>()
            .await
            .map_err(|e| ProviderError::parse(format!("Google CSE response: {e}")))?;

        Ok(body
            .items
            .into_iter()
            .map(|item| SearchResultItem::new(item.title, item.snippet, item.link))
            .collect())
    }
}
