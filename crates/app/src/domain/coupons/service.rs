//! Coupons service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::coupons::{
        errors::CouponsServiceError,
        models::{CouponRecord, NewCoupon},
        repository::PgCouponsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCouponsService {
    db: Db,
    repository: PgCouponsRepository,
}

impl PgCouponsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCouponsRepository::new(),
        }
    }
}

#[async_trait]
impl CouponsService for PgCouponsService {
    async fn list_coupons(
        &self,
        coupon_type: Option<String>,
    ) -> Result<Vec<CouponRecord>, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let coupons = self
            .repository
            .list_coupons(&mut tx, coupon_type.as_deref())
            .await?;

        tx.commit().await?;

        Ok(coupons)
    }

    async fn list_coupon_types(&self) -> Result<Vec<String>, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let types = self.repository.list_coupon_types(&mut tx).await?;

        tx.commit().await?;

        Ok(types)
    }

    async fn find_by_code(&self, code: &str) -> Result<CouponRecord, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let coupon = self.repository.find_by_code(&mut tx, code).await?;

        tx.commit().await?;

        Ok(coupon)
    }

    async fn create_coupon(&self, coupon: NewCoupon) -> Result<CouponRecord, CouponsServiceError> {
        // Reject rules pricing would refuse before they reach storage.
        cinemates::coupons::Coupon::new(
            coupon.code.clone(),
            coupon.kind,
            coupon.valid_from,
            coupon.valid_until,
        )?;

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_coupon(&mut tx, coupon).await?;

        tx.commit().await?;

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Active coupons, optionally of one type.
    async fn list_coupons(
        &self,
        coupon_type: Option<String>,
    ) -> Result<Vec<CouponRecord>, CouponsServiceError>;

    /// Distinct types of active coupons.
    async fn list_coupon_types(&self) -> Result<Vec<String>, CouponsServiceError>;

    /// Active coupon with `code`, compared case-insensitively.
    async fn find_by_code(&self, code: &str) -> Result<CouponRecord, CouponsServiceError>;

    /// Creates a coupon.
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<CouponRecord, CouponsServiceError>;
}

#[cfg(test)]
mod tests {
    use cinemates::coupons::{CouponError, CouponKind};
    use jiff::civil::date;
    use testresult::TestResult;

    use crate::{
        domain::coupons::models::CouponUuid,
        test::{TestContext, helpers},
    };

    use super::*;

    fn new_coupon(code: &str, coupon_type: &str, kind: CouponKind) -> NewCoupon {
        NewCoupon {
            uuid: CouponUuid::new(),
            code: code.to_string(),
            coupon_type: coupon_type.to_string(),
            description: String::new(),
            kind,
            valid_from: date(2026, 1, 1),
            valid_until: date(2026, 12, 31),
        }
    }

    #[tokio::test]
    async fn create_and_find_coupon_ignores_case() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx
            .coupons
            .create_coupon(new_coupon(
                "Diwali10",
                "festive",
                CouponKind::Percentage { basis_points: 1000 },
            ))
            .await?;

        let found = ctx.coupons.find_by_code("  DIWALI10 ").await?;

        assert_eq!(found, created);
        assert_eq!(found.kind, CouponKind::Percentage { basis_points: 1000 });
        assert_eq!(found.to_coupon()?.code, "Diwali10");

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_code_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.coupons
            .create_coupon(new_coupon(
                "FLAT500",
                "flat",
                CouponKind::FlatAmount { amount: 500_00 },
            ))
            .await?;

        let result = ctx
            .coupons
            .create_coupon(new_coupon(
                "flat500",
                "flat",
                CouponKind::FlatAmount { amount: 100_00 },
            ))
            .await;

        assert!(
            matches!(result, Err(CouponsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_coupon_rejects_invalid_rule() {
        let ctx = TestContext::new().await;

        let result = ctx
            .coupons
            .create_coupon(new_coupon(
                "TOO_MUCH",
                "festive",
                CouponKind::Percentage {
                    basis_points: 20_000,
                },
            ))
            .await;

        assert!(
            matches!(
                result,
                Err(CouponsServiceError::InvalidCoupon(
                    CouponError::PercentageTooLarge { .. }
                ))
            ),
            "expected InvalidCoupon, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_coupons_filters_by_type_and_lists_types() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.coupons
            .create_coupon(new_coupon(
                "DIWALI10",
                "festive",
                CouponKind::Percentage { basis_points: 1000 },
            ))
            .await?;
        ctx.coupons
            .create_coupon(new_coupon(
                "FIRST200",
                "welcome",
                CouponKind::FlatAmount { amount: 200_00 },
            ))
            .await?;
        helpers::deactivate_coupon(&ctx, "FIRST200").await?;

        let festive = ctx.coupons.list_coupons(Some("festive".to_string())).await?;
        let types = ctx.coupons.list_coupon_types().await?;

        assert_eq!(
            festive.iter().map(|c| c.code.as_str()).collect::<Vec<_>>(),
            vec!["DIWALI10"]
        );
        assert_eq!(types, vec!["festive".to_string()]);

        Ok(())
    }

    #[tokio::test]
    async fn inactive_coupon_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.coupons
            .create_coupon(new_coupon(
                "OLD",
                "festive",
                CouponKind::FlatAmount { amount: 100_00 },
            ))
            .await?;
        helpers::deactivate_coupon(&ctx, "OLD").await?;

        let result = ctx.coupons.find_by_code("OLD").await;

        assert!(
            matches!(result, Err(CouponsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }
}
