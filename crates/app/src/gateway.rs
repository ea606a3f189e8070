//! Razorpay orders client.

use std::time::Duration;

use async_trait::async_trait;
use cinemates::payment::{GatewayOrder, OrderRequest};
use mockall::automock;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Default public API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.razorpay.com";

/// Connection settings for the Razorpay API.
#[derive(Clone)]
pub struct RazorpayConfig {
    /// API base URL, without a trailing slash.
    pub api_base: String,

    /// Public key id, also handed to the checkout widget.
    pub key_id: String,

    /// Secret used for API basic auth and payment signatures.
    pub key_secret: String,

    /// Deadline for each API call.
    pub timeout: Duration,
}

impl std::fmt::Debug for RazorpayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayConfig")
            .field("api_base", &self.api_base)
            .field("key_id", &self.key_id)
            .field("key_secret", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Errors that can occur when talking to the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The gateway could not be reached before the deadline.
    #[error("payment gateway unavailable: {0}")]
    Unavailable(#[source] reqwest::Error),

    /// Transport or decoding failure after the gateway answered.
    #[error("http error: {0}")]
    Http(#[source] reqwest::Error),

    /// The gateway refused the request.
    #[error("gateway rejected request with status {status}: {body}")]
    Rejected { status: StatusCode, body: String },
}

impl From<reqwest::Error> for GatewayError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() || error.is_connect() {
            Self::Unavailable(error)
        } else {
            Self::Http(error)
        }
    }
}

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an order the checkout widget can collect payment for.
    async fn create_order(&self, request: &OrderRequest) -> Result<GatewayOrder, GatewayError>;
}

/// HTTP client for the Razorpay orders API.
#[derive(Debug, Clone)]
pub struct RazorpayGateway {
    config: RazorpayConfig,
    http: Client,
}

impl RazorpayGateway {
    /// Create a client whose requests carry the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(config: RazorpayConfig) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(GatewayError::Http)?;

        Ok(Self { config, http })
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(&self, request: &OrderRequest) -> Result<GatewayOrder, GatewayError> {
        let url = format!("{}/v1/orders", self.config.api_base.trim_end_matches('/'));

        let body = CreateOrderBody {
            amount: request.amount_minor_units,
            currency: &request.currency,
            receipt: &request.receipt_ref,
        };

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            warn!(%status, receipt = %request.receipt_ref, "gateway rejected order");

            return Err(GatewayError::Rejected { status, body });
        }

        let order: OrderResponse = response.json().await.map_err(GatewayError::Http)?;

        debug!(order = %order.id, amount = order.amount, "gateway order created");

        Ok(GatewayOrder {
            order_id: order.id,
            amount_minor_units: order.amount,
        })
    }
}

#[derive(Debug, Serialize)]
struct CreateOrderBody<'a> {
    amount: u64,
    currency: &'a str,
    receipt: &'a str,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
    amount: u64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{basic_auth, body_json, method, path},
    };

    use super::*;

    fn config(api_base: String, timeout: Duration) -> RazorpayConfig {
        RazorpayConfig {
            api_base,
            key_id: "rzp_test_key".to_string(),
            key_secret: "rzp_test_secret".to_string(),
            timeout,
        }
    }

    fn request() -> OrderRequest {
        OrderRequest {
            amount_minor_units: 2_500_00,
            currency: "INR".to_string(),
            receipt_ref: "rcpt_1".to_string(),
        }
    }

    #[tokio::test]
    async fn create_order_posts_amount_and_reads_order_id() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/orders"))
            .and(basic_auth("rzp_test_key", "rzp_test_secret"))
            .and(body_json(json!({
                "amount": 250_000,
                "currency": "INR",
                "receipt": "rcpt_1",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "order_Nx1",
                "entity": "order",
                "amount": 250_000,
                "currency": "INR",
                "receipt": "rcpt_1",
                "status": "created",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = RazorpayGateway::new(config(server.uri(), Duration::from_secs(5)))?;

        let order = gateway.create_order(&request()).await?;

        assert_eq!(
            order,
            GatewayOrder {
                order_id: "order_Nx1".to_string(),
                amount_minor_units: 2_500_00,
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn rejected_order_keeps_status_and_body() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/orders"))
            .respond_with(ResponseTemplate::new(400).set_body_string("amount too small"))
            .mount(&server)
            .await;

        let gateway = RazorpayGateway::new(config(server.uri(), Duration::from_secs(5)))?;

        let result = gateway.create_order(&request()).await;

        match result {
            Err(GatewayError::Rejected { status, body }) => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(body, "amount too small");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }

        Ok(())
    }

    #[tokio::test]
    async fn slow_gateway_is_unavailable() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/orders"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "id": "order_late", "amount": 250_000 }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let gateway = RazorpayGateway::new(config(server.uri(), Duration::from_millis(100)))?;

        let result = gateway.create_order(&request()).await;

        assert!(
            matches!(result, Err(GatewayError::Unavailable(_))),
            "expected Unavailable, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unreachable_gateway_is_unavailable() -> TestResult {
        let gateway = RazorpayGateway::new(config(
            "http://127.0.0.1:9".to_string(),
            Duration::from_secs(1),
        ))?;

        let result = gateway.create_order(&request()).await;

        assert!(
            matches!(result, Err(GatewayError::Unavailable(_))),
            "expected Unavailable, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn debug_output_hides_secret() {
        let config = config(DEFAULT_API_BASE.to_string(), Duration::from_secs(10));

        let rendered = format!("{config:?}");

        assert!(rendered.contains("rzp_test_key"));
        assert!(!rendered.contains("rzp_test_secret"));
    }
}
