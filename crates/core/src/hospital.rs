use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

use crate::search::SearchResultItem;

/// Provenance tag for records built straight from search hits
pub const RAW_SEARCH_PROVENANCE: &str = "Raw Search Result";

/// Ownership category of a hospital
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum HospitalType {
    Government,
    Private,
    #[default]
    General,
}

impl HospitalType {
    /// Lenient mapping from model output ("Government hospital", "private", ...)
    pub fn from_label(label: &str) -> Self {
        let lower = label.to_ascii_lowercase();
        if lower.contains("government") || lower.contains("govt") {
            HospitalType::Government
        } else if lower.contains("private") {
            HospitalType::Private
        } else {
            HospitalType::General
        }
    }
}

/// A hospital entry as returned by `GET /api/hospitals/{state}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HospitalRecord {
    pub name: String,
    pub location: String,
    #[serde(rename = "type")]
    pub hospital_type: HospitalType,
    pub source_url: String,
    pub medicine_stock: BTreeMap<String, String>,
    pub last_updated: String,
}

impl HospitalRecord {
    /// Build an unrefined record from a search hit.
    pub fn from_search_hit(hit: &SearchResultItem, region: &str) -> Self {
        let name = if hit.title.trim().is_empty() {
            "Hospital".to_string()
        } else {
            hit.title.clone()
        };

        Self {
            name,
            location: region.to_string(),
            hospital_type: HospitalType::General,
            source_url: hit.url.clone(),
            medicine_stock: BTreeMap::from([("Paracetamol".to_string(), "Unknown".to_string())]),
            last_updated: RAW_SEARCH_PROVENANCE.to_string(),
        }
    }

    /// Normalize one element of a model's JSON answer into a record.
    ///
    /// Missing fields get defaults. Returns `None` for non-objects and for
    /// entries without a usable name.
    pub fn from_model_value(value: &JsonValue, region: &str, provenance: &str) -> Option<Self> {
        let obj = value.as_object()?;

        let name = obj.get("name").and_then(JsonValue::as_str)?.trim();
        if name.is_empty() {
            return None;
        }

        let text = |key: &str| {
            obj.get(key)
                .and_then(JsonValue::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
        };

        let medicine_stock = obj
            .get("medicine_stock")
            .and_then(JsonValue::as_object)
            .map(|stock| {
                stock
                    .iter()
                    .filter_map(|(item, qty)| scalar_text(qty).map(|q| (item.clone(), q)))
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            name: name.to_string(),
            location: text("location").unwrap_or(region).to_string(),
            hospital_type: text("type")
                .map(HospitalType::from_label)
                .unwrap_or_default(),
            source_url: text("source_url").unwrap_or_default().to_string(),
            medicine_stock,
            last_updated: text("last_updated").unwrap_or(provenance).to_string(),
        })
    }
}

fn scalar_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_record_from_hit() {
        let hit = SearchResultItem::new("AIIMS Delhi", "Premier institute", "https://aiims.edu");
        let record = HospitalRecord::from_search_hit(&hit, "Delhi");

        assert_eq!(record.name, "AIIMS Delhi");
        assert_eq!(record.location, "Delhi");
        assert_eq!(record.hospital_type, HospitalType::General);
        assert_eq!(record.medicine_stock.get("Paracetamol").unwrap(), "Unknown");
        assert_eq!(record.last_updated, RAW_SEARCH_PROVENANCE);
    }

    #[test]
    fn test_raw_record_blank_title_gets_placeholder_name() {
        let hit = SearchResultItem::new("  ", "", "");
        let record = HospitalRecord::from_search_hit(&hit, "Goa");
        assert_eq!(record.name, "Hospital");
    }

    #[test]
    fn test_model_value_full() {
        let value = json!({
            "name": "Apollo Hospital",
            "location": "Chennai, Tamil Nadu",
            "type": "Private",
            "source_url": "https://apollohospitals.com",
            "medicine_stock": {"Paracetamol": "2500 units", "O2 Cylinders": 50},
            "last_updated": "Verified via gemini"
        });

        let record = HospitalRecord::from_model_value(&value, "Tamil Nadu", "x").unwrap();
        assert_eq!(record.hospital_type, HospitalType::Private);
        assert_eq!(record.location, "Chennai, Tamil Nadu");
        assert_eq!(record.medicine_stock["O2 Cylinders"], "50");
        assert_eq!(record.last_updated, "Verified via gemini");
    }

    #[test]
    fn test_model_value_defaults() {
        let value = json!({"name": "Civil Hospital", "type": "Government or Private"});

        let record =
            HospitalRecord::from_model_value(&value, "Punjab", "Verified via groq").unwrap();
        assert_eq!(record.location, "Punjab");
        assert_eq!(record.hospital_type, HospitalType::Government);
        assert_eq!(record.source_url, "");
        assert!(record.medicine_stock.is_empty());
        assert_eq!(record.last_updated, "Verified via groq");
    }

    #[test]
    fn test_model_value_rejects_nameless() {
        assert!(HospitalRecord::from_model_value(&json!({"location": "x"}), "r", "p").is_none());
        assert!(HospitalRecord::from_model_value(&json!({"name": ""}), "r", "p").is_none());
        assert!(HospitalRecord::from_model_value(&json!("AIIMS"), "r", "p").is_none());
    }

    #[test]
    fn test_serializes_type_field() {
        let hit = SearchResultItem::new("Fortis", "", "https://fortis.in");
        let value = serde_json::to_value(HospitalRecord::from_search_hit(&hit, "Haryana")).unwrap();
        assert_eq!(value["type"], "General");
        assert_eq!(value["medicine_stock"]["Paracetamol"], "Unknown");
    }
}
