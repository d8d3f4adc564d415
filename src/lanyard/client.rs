//! Lanyard API client
//!
//! Issues exactly one GET per lookup and classifies the outcome. No retries,
//! no caching.

use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;

use crate::config::Config;
use crate::error::{LanyardApiError, LanyardMcpError, Result};
use crate::lanyard::types::{LanyardResponse, Presence};
use crate::lanyard::utils::truncate_message;

/// Upper bound on how much of an upstream error body is echoed back
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Upper bound on how much of any upstream body is read
pub const MAX_BODY_BYTES: usize = 256 * 1024;

/// Lanyard REST client
pub struct LanyardClient {
    /// HTTP client
    http_client: reqwest::Client,

    /// Client configuration
    config: Config,
}

impl LanyardClient {
    /// Create a new Lanyard client
    pub fn new(config: Config) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Client configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch the presence of an already validated user ID
    pub async fn get_presence(&self, user_id: &str) -> Result<Presence> {
        let url = self.config.user_url(user_id);
        tracing::debug!(%url, "Fetching Lanyard presence");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| classify_transport_error(user_id, e))?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(LanyardApiError::NotFound {
                user_id: user_id.to_string(),
            }
            .into());
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok());
            return Err(LanyardApiError::RateLimited { retry_after_secs }.into());
        }

        let (bytes, truncated) = read_capped_body(user_id, response).await?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes);
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("no response body").to_string()
            } else {
                truncate_message(&body, MAX_ERROR_BODY_CHARS)
            };
            return Err(LanyardApiError::RequestFailed {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        if truncated {
            return Err(LanyardApiError::MalformedResponse {
                message: format!("response body exceeds {} bytes", MAX_BODY_BYTES),
            }
            .into());
        }

        parse_presence(user_id, &bytes)
    }
}

/// Read at most `MAX_BODY_BYTES` of the body; the flag is set when more was available
async fn read_capped_body(user_id: &str, mut response: reqwest::Response) -> Result<(Vec<u8>, bool)> {
    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| classify_transport_error(user_id, e))?
    {
        let room = MAX_BODY_BYTES - body.len();
        if chunk.len() > room {
            body.extend_from_slice(&chunk[..room]);
            return Ok((body, true));
        }
        body.extend_from_slice(&chunk);
    }

    Ok((body, false))
}

/// Decode a 2xx body into a presence record
fn parse_presence(user_id: &str, body: &[u8]) -> Result<Presence> {
    let envelope: LanyardResponse =
        serde_json::from_slice(body).map_err(|e| LanyardApiError::MalformedResponse {
            message: e.to_string(),
        })?;

    if !envelope.success {
        if let Some(error) = &envelope.error {
            tracing::debug!(
                user_id,
                code = error.code.as_deref().unwrap_or(""),
                message = error.message.as_deref().unwrap_or(""),
                "Lanyard reported an unsuccessful lookup"
            );
        }
        return Err(LanyardApiError::NotFound {
            user_id: user_id.to_string(),
        }
        .into());
    }

    envelope.data.ok_or_else(|| {
        LanyardApiError::MalformedResponse {
            message: "missing data object".to_string(),
        }
        .into()
    })
}

fn classify_transport_error(user_id: &str, err: reqwest::Error) -> LanyardMcpError {
    if err.is_timeout() {
        LanyardApiError::Timeout {
            user_id: user_id.to_string(),
        }
        .into()
    } else if err.is_decode() {
        LanyardApiError::MalformedResponse {
            message: err.to_string(),
        }
        .into()
    } else {
        LanyardApiError::Network {
            message: err.to_string(),
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lanyard::types::DiscordStatus;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const USER_ID: &str = "94490510688792576";

    fn client_for(server: &MockServer) -> LanyardClient {
        let config = Config::default()
            .with_api_base_url(format!("{}/v1", server.uri()))
            .unwrap()
            .with_request_timeout(Duration::from_millis(300))
            .unwrap();
        LanyardClient::new(config).unwrap()
    }

    async fn mount(server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(format!("/v1/users/{}", USER_ID)))
            .respond_with(response)
            .expect(1)
            .mount(server)
            .await;
    }

    fn api_error(result: Result<Presence>) -> LanyardApiError {
        match result {
            Err(LanyardMcpError::Lanyard(e)) => e,
            other => panic!("expected a Lanyard API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_success() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "discord_status": "online",
                    "active_on_discord_mobile": false,
                    "activities": [],
                    "kv": {}
                }
            })),
        )
        .await;

        let presence = client_for(&server).get_presence(USER_ID).await.unwrap();
        assert_eq!(presence.discord_status, DiscordStatus::Online);
        assert!(presence.activities.is_empty());
        assert!(presence.kv.is_empty());
    }

    #[tokio::test]
    async fn test_not_found() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(404).set_body_json(json!({
                "success": false,
                "error": {"code": "user_not_monitored", "message": "User is not being monitored by Lanyard"}
            })),
        )
        .await;

        let err = api_error(client_for(&server).get_presence(USER_ID).await);
        assert!(matches!(err, LanyardApiError::NotFound { ref user_id } if user_id == USER_ID));
    }

    #[tokio::test]
    async fn test_unsuccessful_envelope_is_not_found() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"success": false})),
        )
        .await;

        let err = api_error(client_for(&server).get_presence(USER_ID).await);
        assert!(matches!(err, LanyardApiError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(429).insert_header("Retry-After", "12"),
        )
        .await;

        let err = api_error(client_for(&server).get_presence(USER_ID).await);
        assert!(matches!(
            err,
            LanyardApiError::RateLimited {
                retry_after_secs: Some(12)
            }
        ));
    }

    #[tokio::test]
    async fn test_server_error_preserves_status_and_body() {
        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(503).set_body_string("upstream down")).await;

        let err = api_error(client_for(&server).get_presence(USER_ID).await);
        match err {
            LanyardApiError::RequestFailed { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "upstream down");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(200).set_body_string("<html>oops</html>")).await;

        let err = api_error(client_for(&server).get_presence(USER_ID).await);
        assert!(matches!(err, LanyardApiError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_partial_payload_is_malformed() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"activities": "not a list"}
            })),
        )
        .await;

        let err = api_error(client_for(&server).get_presence(USER_ID).await);
        assert!(matches!(err, LanyardApiError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_missing_data_is_malformed() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"success": true})),
        )
        .await;

        let err = api_error(client_for(&server).get_presence(USER_ID).await);
        assert!(matches!(err, LanyardApiError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "data": {"discord_status": "online"}}))
                .set_delay(Duration::from_secs(2)),
        )
        .await;

        let err = api_error(client_for(&server).get_presence(USER_ID).await);
        assert!(matches!(err, LanyardApiError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_oversized_body_is_malformed() {
        let server = MockServer::start().await;
        let padding = "x".repeat(MAX_BODY_BYTES + 1);
        mount(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"discord_status": "online", "kv": {"padding": padding}}
            })),
        )
        .await;

        let err = api_error(client_for(&server).get_presence(USER_ID).await);
        match err {
            LanyardApiError::MalformedResponse { message } => {
                assert!(message.contains("exceeds"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_oversized_error_body_is_truncated() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(502).set_body_string("e".repeat(MAX_BODY_BYTES * 2)),
        )
        .await;

        let err = api_error(client_for(&server).get_presence(USER_ID).await);
        match err {
            LanyardApiError::RequestFailed { status, message } => {
                assert_eq!(status, 502);
                assert!(message.chars().count() <= MAX_ERROR_BODY_CHARS + 3);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_config_accessor() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        assert_eq!(client.config().api_base_url, format!("{}/v1", server.uri()));
        assert_eq!(client.config().request_timeout, Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_network_error() {
        // Bind then drop so the port refuses connections
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = Config::default()
            .with_api_base_url(format!("http://127.0.0.1:{}/v1", port))
            .unwrap()
            .with_request_timeout(Duration::from_secs(5))
            .unwrap();
        let client = LanyardClient::new(config).unwrap();

        let err = api_error(client.get_presence(USER_ID).await);
        assert!(matches!(err, LanyardApiError::Network { .. }), "got {:?}", err);
    }
}
