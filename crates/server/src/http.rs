//! Shared HTTP client construction for upstream providers

use std::time::Duration;

use crate::config::Config;

const USER_AGENT: &str = concat!("medsupply/", env!("CARGO_PKG_VERSION"));

/// Build a client that gives up after the configured upstream timeout.
///
/// There is no untimed fallback: if the client cannot be built, startup fails.
pub fn upstream_client(config: &Config) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.upstream_timeout_secs))
        .user_agent(USER_AGENT)
        .build()
}

/// Read a non-success response into an error message, preferring the
/// `{"error": {"message": ...}}` shape that Google and OpenAI-style APIs use.
pub async fn error_message(provider: &str, response: reqwest::Response) -> String {
    #[derive(serde::Deserialize)]
    struct ApiError {
        error: ApiErrorDetail,
    }

    #[derive(serde::Deserialize)]
    struct ApiErrorDetail {
        message: String,
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ApiError>(&body) {
        Ok(api_err) => format!("{provider} API error ({status}): {}", api_err.error.message),
        Err(_) => format!("{provider} API error ({status}): {body}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let mut config = Config::default();
        config.upstream_timeout_secs = 1;
        let client = upstream_client(&config).unwrap();

        let err = client.get(server.uri()).send().await.unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_user_agent_is_set() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = upstream_client(&Config::default()).unwrap();
        let response = client.get(server.uri()).send().await.unwrap();
        assert_eq!(response.status(), 204);
    }

    #[tokio::test]
    async fn test_error_message_prefers_api_shape() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(serde_json::json!({"error": {"message": "key revoked"}})),
            )
            .mount(&server)
            .await;

        let response = reqwest::get(server.uri()).await.unwrap();
        let message = error_message("Gemini", response).await;
        assert_eq!(message, "Gemini API error (403 Forbidden): key revoked");
    }
}
