//! Hospital directory lookup for a state or province
//!
//! Strategies, in order:
//! 1. keyed web search, refined by the primary then the fallback model
//!    (raw hits are returned if both refinements fail)
//! 2. primary model alone, with its own search grounding
//! 3. unauthenticated search, refined by the fallback model
//!
//! If all three come up empty the result is an empty list.

use std::sync::Arc;

use async_trait::async_trait;
use medsupply_core::repair::{repair, unwrap_list};
use medsupply_core::{HospitalRecord, ProviderError, SearchResultItem};

use super::{Chain, Providers, Strategy};
use crate::ai::{GenerateOptions, LlmProvider};
use crate::search::SearchProvider;

const KEYED_SEARCH_HITS: usize = 8;
const OPEN_SEARCH_HITS: usize = 6;
const RAW_RECORD_LIMIT: usize = 5;

pub fn keyed_search_query(region: &str) -> String {
    format!("top 5 best hospitals in {region} India names")
}

pub fn open_search_query(region: &str) -> String {
    format!("list of major government and private hospitals in {region} India")
}

fn provenance(provider: &str) -> String {
    format!("Verified via {provider}")
}

/// Prompt asking a model to turn search hits into five hospital records
pub fn refine_prompt(region: &str, hits: &[SearchResultItem], provider: &str) -> String {
    let context = hits
        .iter()
        .map(|hit| {
            format!(
                "- Title: {}\n  Snippet: {}\n  URL: {}",
                hit.title, hit.snippet, hit.url
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let last_updated = provenance(provider);

    format!(
        r#"You are a data extraction bot.
Below are web search results about hospitals in "{region}", India.
Identify 5 DISTINCT, REAL HOSPITAL NAMES from this text.

Rules:
1. Ignore listicle titles such as "Top 10 hospitals"; take the actual hospital names mentioned in the snippets.
2. If a snippet names several hospitals (e.g. "AIIMS, Apollo, Fortis"), return each one as a separate entry.
3. If fewer than 5 names appear in the text, fill the gap from your own knowledge of major real hospitals in {region}.
4. Return valid JSON only.

Search Context:
{context}

Return a strict JSON array:
[
    {{
        "name": "Actual Hospital Name",
        "location": "City, {region}",
        "type": "Government or Private",
        "source_url": "url from context or google.com",
        "medicine_stock": {{
            "Paracetamol": "2500 units",
            "Antibiotics": "1000 units",
            "Insulin": "500 units",
            "Start-IV Fluids": "1000 units",
            "O2 Cylinders": "50 units"
        }},
        "last_updated": "{last_updated}"
    }}
]"#
    )
}

/// Prompt for the grounded, search-free strategy
pub fn grounded_prompt(region: &str) -> String {
    format!(
        r#"List 5 MAJOR, REAL Government and Private hospitals in the state of "{region}", India.
Return a JSON array with strict keys: name, location, type, source_url, medicine_stock, last_updated."#
    )
}

/// Repair a model answer and normalize it into records.
fn parse_records(
    raw: &str,
    region: &str,
    provenance: &str,
) -> Result<Vec<HospitalRecord>, ProviderError> {
    let records: Vec<HospitalRecord> = unwrap_list(repair(raw)?)
        .iter()
        .filter_map(|entry| HospitalRecord::from_model_value(entry, region, provenance))
        .collect();

    if records.is_empty() {
        return Err(ProviderError::empty("no named hospitals in model output"));
    }
    Ok(records)
}

/// Refine search hits through one model; failures collapse to an empty list.
async fn refine(llm: &dyn LlmProvider, region: &str, hits: &[SearchResultItem]) -> Vec<HospitalRecord> {
    let prompt = refine_prompt(region, hits, llm.name());
    let result = match llm.generate(&prompt, GenerateOptions::json()).await {
        Ok(raw) => parse_records(&raw, region, &provenance(llm.name())),
        Err(e) => Err(e),
    };

    match result {
        Ok(records) => {
            tracing::info!(provider = llm.name(), count = records.len(), "Refined search hits");
            records
        }
        Err(e) => {
            tracing::warn!(provider = llm.name(), error = %e, "Refinement failed");
            Vec::new()
        }
    }
}

/// Strategy 1: keyed search, then primary/fallback refinement, then raw hits
struct KeyedSearchRefine {
    search: Arc<dyn SearchProvider>,
    primary: Arc<dyn LlmProvider>,
    fallback: Arc<dyn LlmProvider>,
}

#[async_trait]
impl Strategy<String, Vec<HospitalRecord>> for KeyedSearchRefine {
    fn name(&self) -> &'static str {
        "keyed_search_refine"
    }

    async fn attempt(&self, region: &String) -> Result<Vec<HospitalRecord>, ProviderError> {
        if !self.search.is_configured() {
            return Err(ProviderError::credential_missing(
                "GOOGLE_SEARCH_API_KEY/GOOGLE_SEARCH_ENGINE_ID",
            ));
        }

        let hits = self
            .search
            .search(&keyed_search_query(region), KEYED_SEARCH_HITS)
            .await;
        if hits.is_empty() {
            return Err(ProviderError::empty("keyed search returned no hits"));
        }

        let mut refined = Vec::new();
        if self.primary.is_configured() {
            refined = refine(self.primary.as_ref(), region, &hits).await;
        }
        if refined.is_empty() && self.fallback.is_configured() {
            refined = refine(self.fallback.as_ref(), region, &hits).await;
        }
        if !refined.is_empty() {
            return Ok(refined);
        }

        tracing::info!(region = %region, "Refinement returned nothing, using raw search hits");
        Ok(hits
            .iter()
            .take(RAW_RECORD_LIMIT)
            .map(|hit| HospitalRecord::from_search_hit(hit, region))
            .collect())
    }
}

/// Strategy 2: primary model with built-in search grounding
struct GroundedLlm {
    primary: Arc<dyn LlmProvider>,
}

#[async_trait]
impl Strategy<String, Vec<HospitalRecord>> for GroundedLlm {
    fn name(&self) -> &'static str {
        "grounded_llm"
    }

    async fn attempt(&self, region: &String) -> Result<Vec<HospitalRecord>, ProviderError> {
        if !self.primary.is_configured() {
            return Err(ProviderError::credential_missing(self.primary.name()));
        }

        let raw = self
            .primary
            .generate(&grounded_prompt(region), GenerateOptions::grounded_json())
            .await?;
        parse_records(&raw, region, &provenance(self.primary.name()))
    }
}

/// Strategy 3: unauthenticated search refined by the fallback model
struct OpenSearchRefine {
    search: Arc<dyn SearchProvider>,
    fallback: Arc<dyn LlmProvider>,
}

#[async_trait]
impl Strategy<String, Vec<HospitalRecord>> for OpenSearchRefine {
    fn name(&self) -> &'static str {
        "open_search_refine"
    }

    async fn attempt(&self, region: &String) -> Result<Vec<HospitalRecord>, ProviderError> {
        // refinement is the only consumer of these hits
        if !self.fallback.is_configured() {
            return Err(ProviderError::credential_missing(self.fallback.name()));
        }

        let hits = self
            .search
            .search(&open_search_query(region), OPEN_SEARCH_HITS)
            .await;
        if hits.is_empty() {
            return Err(ProviderError::empty("open search returned no hits"));
        }

        let records = refine(self.fallback.as_ref(), region, &hits).await;
        if records.is_empty() {
            return Err(ProviderError::empty("fallback refinement returned nothing"));
        }
        Ok(records)
    }
}

/// Resolves the hospital list for a region
pub struct HospitalResolver {
    chain: Chain<String, Vec<HospitalRecord>>,
}

impl HospitalResolver {
    pub fn new(providers: &Providers) -> Self {
        let chain = Chain::new(
            "hospitals",
            vec![
                Box::new(KeyedSearchRefine {
                    search: providers.keyed_search.clone(),
                    primary: providers.primary_llm.clone(),
                    fallback: providers.fallback_llm.clone(),
                }),
                Box::new(GroundedLlm {
                    primary: providers.primary_llm.clone(),
                }),
                Box::new(OpenSearchRefine {
                    search: providers.open_search.clone(),
                    fallback: providers.fallback_llm.clone(),
                }),
            ],
        );
        Self { chain }
    }

    /// Hospitals for `region`; empty when every strategy fails.
    pub async fn search(&self, region: &str) -> Vec<HospitalRecord> {
        tracing::info!(region, "Resolving hospitals");
        self.chain
            .run(&region.to_string())
            .await
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::testing::{FakeLlm, FakeSearch, hit};
    use medsupply_core::HospitalType;
    use medsupply_core::hospital::RAW_SEARCH_PROVENANCE;

    fn providers(
        keyed: Arc<FakeSearch>,
        open: Arc<FakeSearch>,
        primary: Arc<FakeLlm>,
        fallback: Arc<FakeLlm>,
    ) -> Providers {
        Providers {
            keyed_search: keyed,
            open_search: open,
            primary_llm: primary,
            fallback_llm: fallback,
        }
    }

    fn five_hospitals_json() -> String {
        r#"```json
[
  {"name": "AIIMS New Delhi", "location": "New Delhi, Delhi", "type": "Government", "source_url": "https://aiims.edu", "medicine_stock": {"Paracetamol": "2500 units"}, "last_updated": "Verified via gemini"},
  {"name": "Safdarjung Hospital", "location": "New Delhi, Delhi", "type": "Government"},
  {"name": "Sir Ganga Ram Hospital", "type": "Private"},
  {"name": "Max Super Speciality Hospital, Saket", "type": "Private"},
  {"name": "Indraprastha Apollo Hospital", "type": "Private"}
]
```"#
        .to_string()
    }

    fn listicle_hits() -> Vec<SearchResultItem> {
        (1..=10)
            .map(|i| hit(&format!("Top hospitals list {i}"), "AIIMS, Apollo, Fortis"))
            .collect()
    }

    #[tokio::test]
    async fn test_no_credentials_yields_empty_without_calls() {
        let keyed = FakeSearch::unconfigured();
        let open = FakeSearch::new(vec![hit("AIIMS", "")]);
        let primary = FakeLlm::unconfigured("gemini");
        let fallback = FakeLlm::unconfigured("groq");
        let resolver =
            HospitalResolver::new(&providers(keyed, open.clone(), primary, fallback));

        assert!(resolver.search("Delhi").await.is_empty());
        assert!(open.queries().is_empty());
    }

    #[tokio::test]
    async fn test_keyed_search_refined_by_primary() {
        let keyed = FakeSearch::new(listicle_hits());
        let primary = FakeLlm::new("gemini", vec![Ok(five_hospitals_json())]);
        let fallback = FakeLlm::new("groq", vec![]);
        let resolver = HospitalResolver::new(&providers(
            keyed.clone(),
            FakeSearch::new(vec![]),
            primary.clone(),
            fallback.clone(),
        ));

        let hospitals = resolver.search("Delhi").await;

        assert_eq!(hospitals.len(), 5);
        assert_eq!(hospitals[0].name, "AIIMS New Delhi");
        assert_eq!(hospitals[0].hospital_type, HospitalType::Government);
        assert_eq!(hospitals[2].location, "Delhi");
        assert_eq!(hospitals[2].last_updated, "Verified via gemini");
        assert_eq!(
            keyed.queries(),
            vec![("top 5 best hospitals in Delhi India names".to_string(), 8)]
        );
        assert_eq!(fallback.call_count(), 0);

        let (prompt, options) = primary.last_call();
        assert!(prompt.contains("Snippet: AIIMS, Apollo, Fortis"));
        assert!(!options.grounding);
        assert!(options.json_mode);
    }

    #[tokio::test]
    async fn test_fallback_refines_when_primary_fails() {
        let keyed = FakeSearch::new(listicle_hits());
        let primary = FakeLlm::new("gemini", vec![Ok("I cannot help with that.".into())]);
        let fallback = FakeLlm::new(
            "groq",
            vec![Ok(r#"{"hospitals": [{"name": "PGIMER Chandigarh", "type": "Government"}]}"#.into())],
        );
        let resolver = HospitalResolver::new(&providers(
            keyed,
            FakeSearch::new(vec![]),
            primary.clone(),
            fallback.clone(),
        ));

        let hospitals = resolver.search("Punjab").await;

        assert_eq!(hospitals.len(), 1);
        assert_eq!(hospitals[0].name, "PGIMER Chandigarh");
        assert_eq!(hospitals[0].last_updated, "Verified via groq");
        assert_eq!(primary.call_count(), 1);
        assert_eq!(fallback.call_count(), 1);
    }

    #[tokio::test]
    async fn test_raw_hits_win_over_later_strategies() {
        let keyed = FakeSearch::new(listicle_hits());
        let open = FakeSearch::new(vec![hit("should not be used", "")]);
        let primary = FakeLlm::new(
            "gemini",
            vec![
                Err(ProviderError::transport("timeout")),
                Ok(five_hospitals_json()),
            ],
        );
        let fallback = FakeLlm::new("groq", vec![Ok("[]".into())]);
        let resolver = HospitalResolver::new(&providers(
            keyed,
            open.clone(),
            primary.clone(),
            fallback,
        ));

        let hospitals = resolver.search("Kerala").await;

        assert_eq!(hospitals.len(), 5);
        assert!(hospitals.iter().all(|h| h.last_updated == RAW_SEARCH_PROVENANCE));
        assert!(hospitals.iter().all(|h| h.location == "Kerala"));
        assert_eq!(hospitals[0].medicine_stock["Paracetamol"], "Unknown");
        // grounded strategy never ran
        assert_eq!(primary.call_count(), 1);
        assert!(open.queries().is_empty());
    }

    #[tokio::test]
    async fn test_grounded_strategy_when_search_unconfigured() {
        let primary = FakeLlm::new("gemini", vec![Ok(five_hospitals_json())]);
        let resolver = HospitalResolver::new(&providers(
            FakeSearch::unconfigured(),
            FakeSearch::new(vec![]),
            primary.clone(),
            FakeLlm::unconfigured("groq"),
        ));

        let hospitals = resolver.search("Delhi").await;

        assert_eq!(hospitals.len(), 5);
        let (prompt, options) = primary.last_call();
        assert!(prompt.contains(r#"state of "Delhi""#));
        assert!(options.grounding);
    }

    #[tokio::test]
    async fn test_open_search_strategy_is_last_resort() {
        let open = FakeSearch::new(vec![
            hit("Hospitals in Assam", "GMCH Guwahati, AIIMS Guwahati"),
            hit("Health dept", "Silchar Medical College"),
        ]);
        let primary = FakeLlm::new("gemini", vec![Err(ProviderError::parse("garbage"))]);
        let fallback = FakeLlm::new(
            "groq",
            vec![Ok(r#"{"data": [{"name": "GMCH Guwahati"}, {"name": "AIIMS Guwahati"}, {"location": "no name"}]}"#.into())],
        );
        let resolver = HospitalResolver::new(&providers(
            FakeSearch::unconfigured(),
            open.clone(),
            primary,
            fallback.clone(),
        ));

        let hospitals = resolver.search("Assam").await;

        assert_eq!(hospitals.len(), 2);
        assert!(hospitals.iter().all(|h| !h.name.is_empty()));
        assert_eq!(
            open.queries(),
            vec![("list of major government and private hospitals in Assam India".to_string(), 6)]
        );
        let (prompt, _) = fallback.last_call();
        assert!(prompt.contains("Silchar Medical College"));
    }

    #[tokio::test]
    async fn test_everything_fails_yields_empty() {
        let resolver = HospitalResolver::new(&providers(
            FakeSearch::new(vec![]),
            FakeSearch::new(vec![]),
            FakeLlm::new("gemini", vec![Err(ProviderError::transport("down"))]),
            FakeLlm::new("groq", vec![]),
        ));

        assert!(resolver.search("Goa").await.is_empty());
    }

    #[test]
    fn test_refine_prompt_lists_every_hit() {
        let hits = vec![hit("A", "first"), hit("B", "second")];
        let prompt = refine_prompt("Bihar", &hits, "groq");

        assert!(prompt.contains("- Title: A\n  Snippet: first\n  URL: https://example.com/A"));
        assert!(prompt.contains("- Title: B"));
        assert!(prompt.contains(r#""last_updated": "Verified via groq""#));
        assert!(prompt.contains(r#""location": "City, Bihar""#));
    }

    #[test]
    fn test_parse_records_rejects_nameless_output() {
        assert!(parse_records(r#"[{"location": "x"}]"#, "r", "p").is_err());
        assert!(parse_records("no json here", "r", "p").is_err());
        assert_eq!(parse_records(r#"{"name": "Solo"}"#, "r", "p").unwrap().len(), 1);
    }
}
