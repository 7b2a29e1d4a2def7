use serde::{Deserialize, Serialize};

/// A single web-search hit, normalized across search backends.
///
/// Only used as context for model prompts; never returned to API clients.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResultItem {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

impl SearchResultItem {
    pub fn new(
        title: impl Into<String>,
        snippet: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            url: url.into(),
        }
    }
}
