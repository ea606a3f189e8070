//! App Router

use salvo::Router;

use crate::{bookings, catalog, coupons, customers, payments, slots};

pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("locations").get(catalog::locations::handler))
        .push(Router::with_path("theaters").get(catalog::theaters::handler))
        .push(Router::with_path("occasions").get(catalog::occasions::handler))
        .push(Router::with_path("cakes").get(catalog::cakes::handler))
        .push(Router::with_path("addons").get(catalog::addons::handler))
        .push(Router::with_path("coupons").get(coupons::index::handler))
        .push(Router::with_path("coupon-types").get(coupons::types::handler))
        .push(
            Router::with_path("bookings")
                .get(bookings::index::handler)
                .post(customers::create::handler),
        )
        .push(Router::with_path("occasion").post(customers::occasion::handler))
        .push(Router::with_path("cake-line-item").post(customers::cake::handler))
        .push(Router::with_path("addon-line-item").post(customers::addon::handler))
        .push(Router::with_path("booked-slots").get(slots::booked::handler))
        .push(Router::with_path("slots/check-and-reserve").post(slots::reserve::handler))
        .push(Router::with_path("payment-orders").post(payments::orders::handler))
        .push(Router::with_path("payment-verify").post(payments::verify::handler))
}

#[cfg(test)]
mod tests {
    use salvo::{
        http::StatusCode,
        test::{ResponseExt, TestClient},
    };
    use serde_json::Value;
    use testresult::TestResult;

    use crate::test_helpers::Mocks;

    use super::*;

    #[tokio::test]
    async fn test_routes_reach_their_handlers() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .catalog
            .expect_list_locations()
            .once()
            .return_once(|| Ok(Vec::new()));

        mocks
            .coupons
            .expect_list_coupon_types()
            .once()
            .return_once(|| Ok(vec!["festive".to_string()]));

        let service = mocks.service(app_router());

        let mut locations = TestClient::get("http://example.com/locations")
            .send(&service)
            .await;

        let body: Value = locations.take_json().await?;

        assert_eq!(locations.status_code, Some(StatusCode::OK));
        assert_eq!(body["locations"], Value::Array(Vec::new()));

        let types = TestClient::get("http://example.com/coupon-types")
            .send(&service)
            .await;

        assert_eq!(types.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_bookings_get_without_phone_is_rejected_before_services() {
        let service = Mocks::default().service(app_router());

        let res = TestClient::get("http://example.com/bookings")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn test_unknown_route_returns_404() {
        let service = Mocks::default().service(app_router());

        let res = TestClient::get("http://example.com/carts")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }
}
