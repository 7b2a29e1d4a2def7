use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::ProviderError;

/// Number of diseases and of medicines every insight carries
pub const INSIGHT_LIST_LEN: usize = 3;

/// Health-trend summary for a city
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthInsight {
    pub prevalent_diseases: Vec<String>,
    pub high_demand_medicines: Vec<String>,
    pub health_alert: String,
}

impl HealthInsight {
    /// Coerce a parsed model answer into an insight.
    ///
    /// Anything that does not carry exactly three diseases, three medicines
    /// and a non-empty alert is rejected.
    pub fn from_value(value: JsonValue) -> Result<Self, ProviderError> {
        let insight: HealthInsight = serde_json::from_value(value)
            .map_err(|e| ProviderError::parse(format!("insight shape mismatch: {e}")))?;
        insight.validate()?;
        Ok(insight)
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        check_list("prevalent_diseases", &self.prevalent_diseases)?;
        check_list("high_demand_medicines", &self.high_demand_medicines)?;
        if self.health_alert.trim().is_empty() {
            return Err(ProviderError::parse("health_alert is empty"));
        }
        Ok(())
    }
}

fn check_list(field: &str, entries: &[String]) -> Result<(), ProviderError> {
    if entries.len() != INSIGHT_LIST_LEN {
        return Err(ProviderError::parse(format!(
            "{field} has {} entries, expected {INSIGHT_LIST_LEN}",
            entries.len()
        )));
    }
    if entries.iter().any(|e| e.trim().is_empty()) {
        return Err(ProviderError::parse(format!("{field} contains a blank entry")));
    }
    Ok(())
}
