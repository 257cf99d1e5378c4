//! Outbound HTTP Client
//!
//! All inter-node communication (announce, heartbeat, increment propagation)
//! goes through the [`Transport`] trait. The production implementation wraps a
//! shared `reqwest::Client`; tests substitute a recording mock so cluster and
//! counter logic can be exercised without a network.

use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;

/// Baseline timeout applied to every outbound request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Minimal request/response seam for inter-node calls.
///
/// Every call posts a JSON body and returns the decoded JSON response, or
/// `Value::Null` when the peer replied with an empty body. Any non-2xx status
/// is reported as an error so callers treat it like a transport failure.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value>;
}

/// `reqwest`-backed [`Transport`] shared by the registry and the counter.
pub struct HttpClient {
    http_client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            http_client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        let response = self
            .http_client
            .post(url)
            .json(body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("received non-OK status {} from {}", status, url));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}


#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;
    use std::net::SocketAddr;

    use super::*;

    async fn serve(router: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn test_post_json_decodes_response() {
        let router = Router::new().route(
            "/echo",
            post(|Json(value): Json<Value>| async move { Json(value) }),
        );
        let addr = serve(router).await;

        let client = HttpClient::new();
        let body = json!({ "id": "node:8080" });
        let response = client
            .post_json(&format!("http://{}/echo", addr), &body)
            .await
            .expect("request failed");

        assert_eq!(response, body);
    }

    #[tokio::test]
    async fn test_post_json_empty_body_is_null() {
        let router = Router::new().route("/ok", post(|| async { StatusCode::OK }));
        let addr = serve(router).await;

        let client = HttpClient::new();
        let response = client
            .post_json(&format!("http://{}/ok", addr), &json!({}))
            .await
            .expect("request failed");

        assert_eq!(response, Value::Null);
    }

    #[tokio::test]
    async fn test_post_json_non_ok_status_is_error() {
        let router = Router::new().route(
            "/fail",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let addr = serve(router).await;

        let client = HttpClient::new();
        let result = client
            .post_json(&format!("http://{}/fail", addr), &json!({}))
            .await;

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("non-OK"));
    }

    #[tokio::test]
    async fn test_post_json_connection_refused_is_error() {
        let client = HttpClient::new();
        let result = client
            .post_json("http://127.0.0.1:1/unreachable", &json!({}))
            .await;

        assert!(result.is_err());
    }
}
