//! DuckDuckGo HTML results page
//!
//! No credentials required. Used as the last-resort search backend, with
//! small result counts to keep prompt context short. The page is parsed
//! with CSS selectors; result links go through a `/l/?uddg=` redirect that
//! is unwrapped to the target URL.

use async_trait::async_trait;
use medsupply_core::{ProviderError, SearchResultItem};
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use super::SearchProvider;
use crate::config::Config;

const RESULT: &str = "div.result:not(.result--ad)";
const TITLE: &str = "a.result__a";
const SNIPPET: &str = ".result__snippet";

/// Unauthenticated search provider
#[derive(Clone)]
pub struct DuckDuckGoClient {
    http: reqwest::Client,
    base_url: String,
}

impl DuckDuckGoClient {
    pub fn new(config: &Config, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: config.endpoints.duckduckgo.clone(),
        }
    }
}

fn selector(css: &str) -> Result<Selector, ProviderError> {
    Selector::parse(css).map_err(|e| ProviderError::parse(format!("selector {css}: {e:?}")))
}

fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve a result href, following the `uddg` redirect parameter if present.
fn result_url(href: &str) -> Option<String> {
    let url = Url::parse("https://duckduckgo.com/").ok()?.join(href).ok()?;
    if let Some((_, target)) = url.query_pairs().find(|(key, _)| key == "uddg") {
        return Some(target.into_owned());
    }
    Some(url.to_string())
}

/// Extract at most `limit` organic results from a results page.
fn to_hits(page: &str, limit: usize) -> Result<Vec<SearchResultItem>, ProviderError> {
    let result = selector(RESULT)?;
    let title = selector(TITLE)?;
    let snippet = selector(SNIPPET)?;

    let document = Html::parse_document(page);
    let hits = document
        .select(&result)
        .filter_map(|node| {
            let link = node.select(&title).next()?;
            let url = result_url(link.value().attr("href")?)?;
            let heading = text_of(link);
            if heading.is_empty() {
                return None;
            }
            let summary = node.select(&snippet).next().map(text_of).unwrap_or_default();
            Some(SearchResultItem::new(heading, summary, url))
        })
        .take(limit)
        .collect();
    Ok(hits)
}

#[async_trait]
impl SearchProvider for DuckDuckGoClient {
    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn try_search(
        &self,
        query: &str,
        count: usize,
    ) -> Result<Vec<SearchResultItem>, ProviderError> {
        let response = self
            .http
            .get(format!("{}/html/", self.base_url))
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| ProviderError::transport(format!("DuckDuckGo request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ProviderError::transport(format!(
                "DuckDuckGo returned status {}",
                response.status()
            )));
        }

        let page = response
            .text()
            .await
            .map_err(|e| ProviderError::parse(format!("DuckDuckGo response: {e}")))?;

        to_hits(&page, count)
    }
}
