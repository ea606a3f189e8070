//! Coupon Index Handler

use std::sync::Arc;

use cinemates::coupons::CouponKind;
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use cinemates_app::domain::coupons::models::CouponRecord;

use crate::{coupons::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponResponse {
    pub code: String,

    #[serde(rename = "type")]
    pub coupon_type: String,

    pub description: String,

    /// "percentage" or "flat"
    pub kind: String,

    /// Discount in basis points, for percentage coupons
    pub percent_basis_points: Option<u32>,

    /// Discount in paise, for flat coupons
    pub flat_amount: Option<u64>,

    /// First valid day, YYYY-MM-DD
    pub valid_from: String,

    /// Last valid day, inclusive
    pub valid_until: String,
}

impl From<CouponRecord> for CouponResponse {
    fn from(coupon: CouponRecord) -> Self {
        let (kind, percent_basis_points, flat_amount) = match coupon.kind {
            CouponKind::Percentage { basis_points } => ("percentage", Some(basis_points), None),
            CouponKind::FlatAmount { amount } => ("flat", None, Some(amount)),
        };

        Self {
            code: coupon.code,
            coupon_type: coupon.coupon_type,
            description: coupon.description,
            kind: kind.to_string(),
            percent_basis_points,
            flat_amount,
            valid_from: coupon.valid_from.to_string(),
            valid_until: coupon.valid_until.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponsResponse {
    pub coupons: Vec<CouponResponse>,
}

/// Coupon Index Handler
///
/// Returns active coupons, optionally of one `type`.
#[endpoint(tags("coupons"), summary = "List Coupons")]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<CouponsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let coupon_type = req
        .query::<String>("type")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    let coupons = state
        .coupons
        .list_coupons(coupon_type)
        .await
        .map_err(into_status_error)?;

    Ok(Json(CouponsResponse {
        coupons: coupons.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use cinemates_app::domain::coupons::models::CouponUuid;

    use crate::test_helpers::Mocks;

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        mocks.service(Router::with_path("coupons").get(handler))
    }

    fn festive(code: &str, kind: CouponKind) -> CouponRecord {
        CouponRecord {
            uuid: CouponUuid::new(),
            code: code.to_string(),
            coupon_type: "festive".to_string(),
            description: String::new(),
            kind,
            valid_from: date(2026, 10, 1),
            valid_until: date(2026, 11, 15),
            active: true,
        }
    }

    #[tokio::test]
    async fn test_index_filters_by_type() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .coupons
            .expect_list_coupons()
            .once()
            .withf(|t| t.as_deref() == Some("festive"))
            .return_once(|_| {
                Ok(vec![
                    festive("DIWALI10", CouponKind::Percentage { basis_points: 1000 }),
                    festive("FLAT500", CouponKind::FlatAmount { amount: 500_00 }),
                ])
            });

        let mut res = TestClient::get("http://example.com/coupons?type=festive")
            .send(&make_service(mocks))
            .await;

        let body: CouponsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(
            body.coupons
                .iter()
                .map(|c| (c.kind.as_str(), c.percent_basis_points, c.flat_amount))
                .collect::<Vec<_>>(),
            vec![
                ("percentage", Some(1000), None),
                ("flat", None, Some(500_00))
            ]
        );
        assert_eq!(
            body.coupons.first().map(|c| c.valid_until.as_str()),
            Some("2026-11-15")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_index_blank_type_lists_all() {
        let mut mocks = Mocks::default();

        mocks
            .coupons
            .expect_list_coupons()
            .once()
            .withf(Option::is_none)
            .return_once(|_| Ok(vec![]));

        let res = TestClient::get("http://example.com/coupons?type=")
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
    }
}
