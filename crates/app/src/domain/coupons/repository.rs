//! Coupons Repository

use cinemates::coupons::CouponKind;
use jiff_sqlx::Date as SqlxDate;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};

use crate::{
    database::{amount_param, try_get_amount},
    domain::coupons::models::{CouponRecord, CouponUuid, NewCoupon},
};

const LIST_COUPONS_SQL: &str = include_str!("sql/list_coupons.sql");
const LIST_COUPON_TYPES_SQL: &str = include_str!("sql/list_coupon_types.sql");
const FIND_COUPON_BY_CODE_SQL: &str = include_str!("sql/find_coupon_by_code.sql");
const CREATE_COUPON_SQL: &str = include_str!("sql/create_coupon.sql");

const KIND_PERCENTAGE: &str = "percentage";
const KIND_FLAT: &str = "flat";

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCouponsRepository;

impl PgCouponsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_coupons(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon_type: Option<&str>,
    ) -> Result<Vec<CouponRecord>, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(LIST_COUPONS_SQL)
            .bind(coupon_type)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_coupon_types(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<String>, sqlx::Error> {
        query_scalar::<Postgres, String>(LIST_COUPON_TYPES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn find_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<CouponRecord, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(FIND_COUPON_BY_CODE_SQL)
            .bind(code.trim())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: NewCoupon,
    ) -> Result<CouponRecord, sqlx::Error> {
        let (kind, basis_points, flat_amount) = match coupon.kind {
            CouponKind::Percentage { basis_points } => (
                KIND_PERCENTAGE,
                Some(i32::try_from(basis_points).map_err(|e| sqlx::Error::ColumnDecode {
                    index: "percent_basis_points".to_string(),
                    source: Box::new(e),
                })?),
                None,
            ),
            CouponKind::FlatAmount { amount } => {
                (KIND_FLAT, None, Some(amount_param(amount, "flat_amount")?))
            }
        };

        query_as::<Postgres, CouponRecord>(CREATE_COUPON_SQL)
            .bind(coupon.uuid.into_uuid())
            .bind(coupon.code.trim())
            .bind(coupon.coupon_type)
            .bind(coupon.description)
            .bind(kind)
            .bind(basis_points)
            .bind(flat_amount)
            .bind(SqlxDate::from(coupon.valid_from))
            .bind(SqlxDate::from(coupon.valid_until))
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for CouponRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let kind: String = row.try_get("kind")?;

        let kind = match kind.as_str() {
            KIND_PERCENTAGE => {
                let basis_points: i32 = row.try_get("percent_basis_points")?;

                CouponKind::Percentage {
                    basis_points: u32::try_from(basis_points).map_err(|e| {
                        sqlx::Error::ColumnDecode {
                            index: "percent_basis_points".to_string(),
                            source: Box::new(e),
                        }
                    })?,
                }
            }
            KIND_FLAT => CouponKind::FlatAmount {
                amount: try_get_amount(row, "flat_amount")?,
            },
            other => {
                return Err(sqlx::Error::Decode(
                    format!("unknown coupon kind {other:?}").into(),
                ));
            }
        };

        Ok(Self {
            uuid: CouponUuid::from_uuid(row.try_get("uuid")?),
            code: row.try_get("code")?,
            coupon_type: row.try_get("coupon_type")?,
            description: row.try_get("description")?,
            kind,
            valid_from: row.try_get::<SqlxDate, _>("valid_from")?.to_jiff(),
            valid_until: row.try_get::<SqlxDate, _>("valid_until")?.to_jiff(),
            active: row.try_get("active")?,
        })
    }
}
