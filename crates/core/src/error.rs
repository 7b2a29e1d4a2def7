use thiserror::Error;

/// Failure modes of an upstream provider call.
///
/// Every variant is absorbed by the resolvers; none of them ever reaches
/// the HTTP layer.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Credential missing: {0}")]
    CredentialMissing(String),

    #[error("Empty result: {0}")]
    EmptyResult(String),
}

impl ProviderError {
    pub fn transport(msg: impl std::fmt::Display) -> Self {
        Self::Transport(msg.to_string())
    }

    pub fn parse(msg: impl std::fmt::Display) -> Self {
        Self::Parse(msg.to_string())
    }

    pub fn credential_missing(what: &str) -> Self {
        Self::CredentialMissing(what.to_string())
    }

    pub fn empty(what: &str) -> Self {
        Self::EmptyResult(what.to_string())
    }

    /// Short label used for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Transport(_) => "transport",
            ProviderError::Parse(_) => "parse",
            ProviderError::CredentialMissing(_) => "credential_missing",
            ProviderError::EmptyResult(_) => "empty",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(ProviderError::transport("boom").kind(), "transport");
        assert_eq!(ProviderError::parse("bad json").kind(), "parse");
        assert_eq!(
            ProviderError::credential_missing("GROQ_API_KEY").kind(),
            "credential_missing"
        );
        assert_eq!(ProviderError::empty("no hits").kind(), "empty");
    }

    #[test]
    fn test_display() {
        let err = ProviderError::credential_missing("GEMINI_API_KEY");
        assert_eq!(err.to_string(), "Credential missing: GEMINI_API_KEY");
    }
}
