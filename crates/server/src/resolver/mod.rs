//! Ordered fallback chains over the upstream providers
//!
//! A resolver is a list of [`Strategy`] values tried in order. The first
//! strategy that returns `Ok` wins; any `Err` (including
//! [`ProviderError::EmptyResult`]) moves on to the next one.

pub mod hospitals;
pub mod insights;

use std::sync::Arc;

use async_trait::async_trait;
use medsupply_core::ProviderError;

use crate::ai::{GeminiClient, GroqClient, LlmProvider};
use crate::config::Config;
use crate::search::{DuckDuckGoClient, GoogleSearchClient, SearchProvider};

pub use hospitals::HospitalResolver;
pub use insights::HealthInsightResolver;

/// One step of a fallback chain
#[async_trait]
pub trait Strategy<I: Sync, O>: Send + Sync {
    fn name(&self) -> &'static str;

    async fn attempt(&self, input: &I) -> Result<O, ProviderError>;
}

/// Strategies tried strictly in sequence, short-circuiting on first success
pub struct Chain<I: Sync, O> {
    resolver: &'static str,
    strategies: Vec<Box<dyn Strategy<I, O>>>,
}

impl<I: Sync, O> Chain<I, O> {
    pub fn new(resolver: &'static str, strategies: Vec<Box<dyn Strategy<I, O>>>) -> Self {
        Self {
            resolver,
            strategies,
        }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run the chain. `None` means every strategy came up empty.
    pub async fn run(&self, input: &I) -> Option<O> {
        for strategy in &self.strategies {
            match strategy.attempt(input).await {
                Ok(output) => {
                    tracing::info!(
                        resolver = self.resolver,
                        strategy = strategy.name(),
                        "Strategy succeeded"
                    );
                    record_outcome(self.resolver, strategy.name(), "success");
                    return Some(output);
                }
                Err(e) => {
                    tracing::warn!(
                        resolver = self.resolver,
                        strategy = strategy.name(),
                        error = %e,
                        "Strategy failed, trying next"
                    );
                    record_outcome(self.resolver, strategy.name(), e.kind());
                }
            }
        }

        tracing::warn!(resolver = self.resolver, "All strategies exhausted");
        None
    }
}

fn record_outcome(resolver: &'static str, strategy: &'static str, outcome: &'static str) {
    metrics::counter!(
        "strategy_outcomes_total",
        "resolver" => resolver,
        "strategy" => strategy,
        "outcome" => outcome
    )
    .increment(1);
}

/// The four text providers, shared by both resolvers
#[derive(Clone)]
pub struct Providers {
    pub keyed_search: Arc<dyn SearchProvider>,
    pub open_search: Arc<dyn SearchProvider>,
    pub primary_llm: Arc<dyn LlmProvider>,
    pub fallback_llm: Arc<dyn LlmProvider>,
}

impl Providers {
    pub fn from_config(config: &Config, http: reqwest::Client) -> Self {
        Self {
            keyed_search: Arc::new(GoogleSearchClient::new(config, http.clone())),
            open_search: Arc::new(DuckDuckGoClient::new(config, http.clone())),
            primary_llm: Arc::new(GeminiClient::new(config, http.clone())),
            fallback_llm: Arc::new(GroqClient::new(config, http)),
        }
    }
}
