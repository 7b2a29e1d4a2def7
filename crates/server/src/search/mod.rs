//! Web search providers

pub mod duckduckgo;
pub mod google;

use async_trait::async_trait;
use medsupply_core::{ProviderError, SearchResultItem};

pub use duckduckgo::DuckDuckGoClient;
pub use google::GoogleSearchClient;

/// A web search backend returning normalized hits.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the provider has what it needs to make a call
    fn is_configured(&self) -> bool;

    /// Run a query, surfacing the failure reason.
    async fn try_search(
        &self,
        query: &str,
        count: usize,
    ) -> Result<Vec<SearchResultItem>, ProviderError>;

    /// Run a query; every failure collapses into an empty list.
    async fn search(&self, query: &str, count: usize) -> Vec<SearchResultItem> {
        match self.try_search(query, count).await {
            Ok(hits) => {
                tracing::debug!(provider = self.name(), query, hits = hits.len(), "Search done");
                hits
            }
            Err(e) => {
                tracing::warn!(provider = self.name(), query, error = %e, "Search failed");
                Vec::new()
            }
        }
    }
}
