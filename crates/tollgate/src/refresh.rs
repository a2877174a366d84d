//! Background feature refresh.
//!
//! A best-effort refinement channel: it updates the active feature set of
//! an already-verified installation. It never re-verifies the signature
//! and never re-checks expiration.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{LicenseError, LicenseResult};
use crate::store::LicenseStore;
use crate::types::FeaturesResponse;

/// User agent for refresh requests.
const USER_AGENT_VALUE: &str = concat!("tollgate/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the remote entitlement endpoint.
#[derive(Debug, Clone)]
pub(crate) struct RefreshClient {
    client: reqwest::Client,
    url: String,
}

impl RefreshClient {
    /// Create a client with a bounded per-request timeout.
    pub fn new(url: String, timeout: Duration) -> LicenseResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|e| LicenseError::Network {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self { client, url })
    }

    /// Fetch the current feature list. Any non-2xx status, timeout, or
    /// malformed body is a fetch failure.
    pub async fn fetch_features(&self) -> LicenseResult<Vec<String>> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LicenseError::Network {
                message: format!("feature endpoint returned {status}"),
            });
        }

        let body: FeaturesResponse =
            response
                .json()
                .await
                .map_err(|e| LicenseError::InvalidResponse {
                    message: format!("failed to parse feature response: {e}"),
                })?;

        Ok(body.features)
    }
}

/// Spawn the periodic refresh loop on `handle`.
///
/// On success the whole feature set is swapped; on failure the previous
/// set is retained and the loop keeps retrying on the next tick. The loop
/// runs until the returned handle is aborted at shutdown.
pub(crate) fn spawn(
    handle: &tokio::runtime::Handle,
    store: Arc<LicenseStore>,
    client: RefreshClient,
    period: Duration,
) -> JoinHandle<()> {
    handle.spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick fires immediately; the initial verdict already
        // carries a fresh feature set.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match client.fetch_features().await {
                Ok(features) => {
                    debug!(count = features.len(), "feature set refreshed");
                    store.replace_features(features);
                }
                Err(e) => {
                    warn!(error = %e, "feature refresh failed; keeping previous feature set");
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> RefreshClient {
        RefreshClient::new(
            format!("{}/features", server.uri()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn fetch_features_parses_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/features"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "features": ["sso", "audit-log"]
            })))
            .mount(&server)
            .await;

        let features = client_for(&server).fetch_features().await.unwrap();
        assert_eq!(features, vec!["sso", "audit-log"]);
    }

    #[tokio::test]
    async fn fetch_features_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/features"))
            .and(header("user-agent", USER_AGENT_VALUE))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "features": [] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let features = client_for(&server).fetch_features().await.unwrap();
        assert!(features.is_empty());
    }

    #[tokio::test]
    async fn non_2xx_is_a_fetch_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/features"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_features().await;
        assert!(matches!(result, Err(LicenseError::Network { .. })));
    }

    #[tokio::test]
    async fn malformed_body_is_a_fetch_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/features"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_features().await;
        assert!(matches!(result, Err(LicenseError::InvalidResponse { .. })));
    }

    #[tokio::test]
    async fn missing_features_field_is_a_fetch_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/features"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "flags": [] })),
            )
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_features().await;
        assert!(matches!(result, Err(LicenseError::InvalidResponse { .. })));
    }

    #[tokio::test]
    async fn hang_is_bounded_by_the_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/features"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "features": [] }))
                    .set_delay(Duration::from_secs(30)),
            )
            .mount(&server)
            .await;

        let client = RefreshClient::new(
            format!("{}/features", server.uri()),
            Duration::from_millis(200),
        )
        .unwrap();

        let result = client.fetch_features().await;
        assert!(matches!(result, Err(LicenseError::Network { .. })));
    }
}
