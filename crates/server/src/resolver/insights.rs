//! Health-trend summary for a city
//!
//! News context is gathered once up front from keyed search. The primary
//! model is tried first (grounded only when that context is empty), then
//! the fallback model (which backfills context from unauthenticated search
//! when needed). If both fail, a deterministic synthetic insight is
//! returned, so this resolver always produces a result.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, Local, NaiveDate};
use medsupply_core::repair::repair;
use medsupply_core::synthetic::synthetic_insight;
use medsupply_core::{HealthInsight, ProviderError};

use super::{Chain, Providers, Strategy};
use crate::ai::{GenerateOptions, LlmProvider};
use crate::search::SearchProvider;

const NEWS_HITS: usize = 5;
const BACKFILL_HITS: usize = 3;
const CONTEXT_MARKER: &str = "Context from News:";

/// Everything a strategy needs to build its prompt
#[derive(Debug, Clone)]
pub struct InsightRequest {
    pub city: String,
    pub region: String,
    pub today: NaiveDate,
    /// Joined keyed-search titles and snippets; empty if unavailable
    pub news_context: String,
}

pub fn news_query(city: &str, region: &str, year: i32) -> String {
    format!("latest disease outbreak health news {city} {region} India {year}")
}

pub fn backfill_query(city: &str, region: &str) -> String {
    format!("disease outbreak {city} {region} latest")
}

pub fn insight_prompt(city: &str, region: &str, today: NaiveDate, context: &str) -> String {
    let month = today.format("%B");
    let year = today.year();

    format!(
        r#"Analyze the current health situation in {city}, {region} for {month} {year}.

{CONTEXT_MARKER}
{context}

Task:
1. Identify the 3 MOST LIKELY prevalent diseases or outbreaks right now (e.g. Dengue, Malaria, Flu, Pollution-related).
2. Recommend 3 specific HIGH-PRIORITY medicines or supplies for them (NOT just Paracetamol).
3. Write a short 1-sentence health alert.

Return strict JSON with exactly these keys:
{{
    "prevalent_diseases": ["Disease 1", "Disease 2", "Disease 3"],
    "high_demand_medicines": ["Specific Med 1", "Specific Med 2", "Specific Med 3"],
    "health_alert": "Alert message."
}}"#
    )
}

fn parse_insight(raw: &str) -> Result<HealthInsight, ProviderError> {
    HealthInsight::from_value(repair(raw)?)
}

/// Primary model; grounding substitutes for missing news context
struct PrimaryInsight {
    llm: Arc<dyn LlmProvider>,
}

#[async_trait]
impl Strategy<InsightRequest, HealthInsight> for PrimaryInsight {
    fn name(&self) -> &'static str {
        "primary_llm"
    }

    async fn attempt(&self, req: &InsightRequest) -> Result<HealthInsight, ProviderError> {
        if !self.llm.is_configured() {
            return Err(ProviderError::credential_missing(self.llm.name()));
        }

        let prompt = insight_prompt(&req.city, &req.region, req.today, &req.news_context);
        let options = GenerateOptions {
            grounding: req.news_context.is_empty(),
            json_mode: true,
        };
        let raw = self.llm.generate(&prompt, options).await?;
        parse_insight(&raw)
    }
}

/// Fallback model; backfills context itself when keyed search gave nothing
struct FallbackInsight {
    llm: Arc<dyn LlmProvider>,
    search: Arc<dyn SearchProvider>,
}

#[async_trait]
impl Strategy<InsightRequest, HealthInsight> for FallbackInsight {
    fn name(&self) -> &'static str {
        "fallback_llm"
    }

    async fn attempt(&self, req: &InsightRequest) -> Result<HealthInsight, ProviderError> {
        if !self.llm.is_configured() {
            return Err(ProviderError::credential_missing(self.llm.name()));
        }

        let context = if req.news_context.is_empty() {
            self.search
                .search(&backfill_query(&req.city, &req.region), BACKFILL_HITS)
                .await
                .iter()
                .map(|hit| hit.snippet.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            req.news_context.clone()
        };

        let prompt = insight_prompt(&req.city, &req.region, req.today, &context);
        let raw = self.llm.generate(&prompt, GenerateOptions::json()).await?;
        parse_insight(&raw)
    }
}

/// Resolves the health-trend summary for a city
pub struct HealthInsightResolver {
    keyed_search: Arc<dyn SearchProvider>,
    chain: Chain<InsightRequest, HealthInsight>,
}

impl HealthInsightResolver {
    pub fn new(providers: &Providers) -> Self {
        let chain = Chain::new(
            "insights",
            vec![
                Box::new(PrimaryInsight {
                    llm: providers.primary_llm.clone(),
                }),
                Box::new(FallbackInsight {
                    llm: providers.fallback_llm.clone(),
                    search: providers.open_search.clone(),
                }),
            ],
        );
        Self {
            keyed_search: providers.keyed_search.clone(),
            chain,
        }
    }

    pub async fn resolve(&self, city: &str, district: &str, region: &str) -> HealthInsight {
        self.resolve_on(city, district, region, Local::now().date_naive())
            .await
    }

    /// Resolve as of `today`; the date drives the prompt and the synthetic seed.
    ///
    /// `district` is only logged; callers currently pass the city.
    pub async fn resolve_on(
        &self,
        city: &str,
        district: &str,
        region: &str,
        today: NaiveDate,
    ) -> HealthInsight {
        tracing::info!(city, district, region, "Resolving health insights");

        let request = InsightRequest {
            city: city.to_string(),
            region: region.to_string(),
            today,
            news_context: self.news_context(city, region, today.year()).await,
        };

        match self.chain.run(&request).await {
            Some(insight) => insight,
            None => {
                tracing::info!(city, %today, "Falling back to synthetic insight");
                synthetic_insight(city, today)
            }
        }
    }

    async fn news_context(&self, city: &str, region: &str, year: i32) -> String {
        if !self.keyed_search.is_configured() {
            return String::new();
        }

        self.keyed_search
            .search(&news_query(city, region, year), NEWS_HITS)
            .await
            .iter()
            .map(|hit| format!("- {}: {}", hit.title, hit.snippet))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
