//! Create Payment Order Handler

use std::sync::Arc;

use cinemates::payment::OrderRequest;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use cinemates_app::domain::payments::models::{NewPaymentOrder, PaymentOrder};

use crate::{
    extensions::*,
    payments::{errors::into_status_error, models::DraftRequest},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    /// Amount to charge, in paise
    pub amount_minor_units: u64,

    /// Defaults to a fresh reference
    #[serde(default)]
    pub receipt_ref: Option<String>,

    pub draft: DraftRequest,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentOrderResponse {
    pub order_id: String,
    pub amount_minor_units: u64,
    pub currency: String,
    pub receipt_ref: String,

    /// Public key to open the checkout widget with
    pub key_id: String,
}

impl From<PaymentOrder> for PaymentOrderResponse {
    fn from(order: PaymentOrder) -> Self {
        Self {
            order_id: order.order_id,
            amount_minor_units: order.amount_minor_units,
            currency: order.currency,
            receipt_ref: order.receipt_ref,
            key_id: order.key_id,
        }
    }
}

/// Create Payment Order Handler
///
/// Prices the draft from the catalog and refuses amounts that do not match before asking the
/// gateway for an order.
#[endpoint(
    tags("payments"),
    summary = "Create Payment Order",
    responses(
        (status_code = StatusCode::CREATED, description = "Gateway order created"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Amount does not match the draft"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment gateway unavailable"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<PaymentOrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let mut order = OrderRequest::new(request.amount_minor_units);

    if let Some(receipt_ref) = request
        .receipt_ref
        .map(|receipt_ref| receipt_ref.trim().to_string())
        .filter(|receipt_ref| !receipt_ref.is_empty())
    {
        order.receipt_ref = receipt_ref;
    }

    let created = state
        .payments
        .create_order(NewPaymentOrder {
            request: order,
            snapshot: request.draft.into_snapshot()?,
        })
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(created.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;
    use uuid::Uuid;

    use cinemates_app::domain::payments::PaymentsServiceError;

    use crate::test_helpers::Mocks;

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        mocks.service(Router::with_path("payment-orders").post(handler))
    }

    fn body(amount: u64) -> Value {
        json!({
            "amount_minor_units": amount,
            "draft": {
                "customer_uuid": Uuid::now_v7(),
                "location_uuid": Uuid::now_v7(),
                "theater_uuid": Uuid::now_v7(),
                "booked_date": "2026-12-24",
                "booked_slot": "Evening",
                "final_price": amount,
            },
        })
    }

    #[tokio::test]
    async fn test_create_order_returns_gateway_order() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .payments
            .expect_create_order()
            .once()
            .withf(|order| {
                order.request.amount_minor_units == 2_499_00
                    && order.request.currency == "INR"
                    && order.request.receipt_ref.starts_with("rcpt_")
                    && order.snapshot.booked_slot == "Evening"
            })
            .returning(|order| {
                Ok(PaymentOrder {
                    order_id: "order_Q1".to_string(),
                    amount_minor_units: order.request.amount_minor_units,
                    currency: order.request.currency,
                    receipt_ref: order.request.receipt_ref,
                    key_id: "rzp_test_key".to_string(),
                })
            });

        let mut res = TestClient::post("http://example.com/payment-orders")
            .json(&body(2_499_00))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let order: PaymentOrderResponse = res.take_json().await?;

        assert_eq!(order.order_id, "order_Q1");
        assert_eq!(order.amount_minor_units, 2_499_00);
        assert_eq!(order.key_id, "rzp_test_key");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_keeps_client_receipt_ref() {
        let mut mocks = Mocks::default();

        mocks
            .payments
            .expect_create_order()
            .once()
            .withf(|order| order.request.receipt_ref == "rcpt_client")
            .returning(|order| {
                Ok(PaymentOrder {
                    order_id: "order_Q2".to_string(),
                    amount_minor_units: order.request.amount_minor_units,
                    currency: order.request.currency,
                    receipt_ref: order.request.receipt_ref,
                    key_id: "rzp_test_key".to_string(),
                })
            });

        let mut request = body(1_000_00);
        request["receipt_ref"] = json!("rcpt_client");

        let res = TestClient::post("http://example.com/payment-orders")
            .json(&request)
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
    }

    #[tokio::test]
    async fn test_create_order_tampered_amount_returns_422() {
        let mut mocks = Mocks::default();

        mocks.payments.expect_create_order().once().returning(|_| {
            Err(PaymentsServiceError::PriceMismatch {
                expected: 2_499_00,
                submitted: 1_00,
            })
        });

        let res = TestClient::post("http://example.com/payment-orders")
            .json(&body(1_00))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));
    }

    #[tokio::test]
    async fn test_create_order_invalid_draft_date_returns_400() {
        let mut request = body(1_000_00);
        request["draft"]["booked_date"] = json!("tomorrow");

        let res = TestClient::post("http://example.com/payment-orders")
            .json(&request)
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
