//! Customer Selections Repository

use cinemates::cakes::Weight;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::{count_param, try_get_amount, try_get_count},
    domain::{
        catalog::models::{AddonUuid, CakeUuid},
        customers::models::{
            AddonSelection, CakeSelection, CustomerUuid, NewAddonSelection, NewCakeSelection,
            OccasionSelection,
        },
    },
};

const UPSERT_OCCASION_SQL: &str = include_str!("../sql/upsert_occasion.sql");
const GET_OCCASION_SQL: &str = include_str!("../sql/get_occasion.sql");
const UPSERT_CAKE_SQL: &str = include_str!("../sql/upsert_cake.sql");
const DELETE_CAKE_SQL: &str = include_str!("../sql/delete_cake.sql");
const LIST_CAKES_SQL: &str = include_str!("../sql/list_cakes.sql");
const UPSERT_ADDON_SQL: &str = include_str!("../sql/upsert_addon.sql");
const DELETE_ADDON_SQL: &str = include_str!("../sql/delete_addon.sql");
const LIST_ADDONS_SQL: &str = include_str!("../sql/list_addons.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgSelectionsRepository;

impl PgSelectionsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn upsert_occasion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        occasion: OccasionSelection,
    ) -> Result<OccasionSelection, sqlx::Error> {
        query_as::<Postgres, OccasionSelection>(UPSERT_OCCASION_SQL)
            .bind(customer.into_uuid())
            .bind(occasion.occasion_name)
            .bind(occasion.nickname)
            .bind(occasion.partner_nickname)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_occasion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<Option<OccasionSelection>, sqlx::Error> {
        query_as::<Postgres, OccasionSelection>(GET_OCCASION_SQL)
            .bind(customer.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Insert or update a cake line, pricing it from the catalog.
    ///
    /// Fails with `RowNotFound` when the cake does not exist or is not sold at
    /// the requested weight.
    pub(crate) async fn upsert_cake(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        cake: NewCakeSelection,
    ) -> Result<CakeSelection, sqlx::Error> {
        query_as::<Postgres, CakeSelection>(UPSERT_CAKE_SQL)
            .bind(customer.into_uuid())
            .bind(cake.cake_uuid.into_uuid())
            .bind(count_param(cake.weight.grams(), "weight_grams")?)
            .bind(count_param(cake.quantity, "quantity")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_cake(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        cake: CakeUuid,
        weight: Weight,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CAKE_SQL)
            .bind(customer.into_uuid())
            .bind(cake.into_uuid())
            .bind(count_param(weight.grams(), "weight_grams")?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn list_cakes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<Vec<CakeSelection>, sqlx::Error> {
        query_as::<Postgres, CakeSelection>(LIST_CAKES_SQL)
            .bind(customer.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn upsert_addon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        addon: NewAddonSelection,
    ) -> Result<AddonSelection, sqlx::Error> {
        query_as::<Postgres, AddonSelection>(UPSERT_ADDON_SQL)
            .bind(customer.into_uuid())
            .bind(addon.addon_uuid.into_uuid())
            .bind(count_param(addon.quantity, "quantity")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_addon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        addon: AddonUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ADDON_SQL)
            .bind(customer.into_uuid())
            .bind(addon.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn list_addons(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<Vec<AddonSelection>, sqlx::Error> {
        query_as::<Postgres, AddonSelection>(LIST_ADDONS_SQL)
            .bind(customer.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OccasionSelection {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            occasion_name: row.try_get("occasion_name")?,
            nickname: row.try_get("nickname")?,
            partner_nickname: row.try_get("partner_nickname")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CakeSelection {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let weight = Weight::from_grams(try_get_count(row, "weight_grams")?).map_err(|e| {
            sqlx::Error::ColumnDecode {
                index: "weight_grams".to_string(),
                source: Box::new(e),
            }
        })?;

        Ok(Self {
            cake_uuid: CakeUuid::from_uuid(row.try_get("cake_uuid")?),
            weight,
            quantity: try_get_count(row, "quantity")?,
            unit_price: try_get_amount(row, "unit_price")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for AddonSelection {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            addon_uuid: AddonUuid::from_uuid(row.try_get("addon_uuid")?),
            quantity: try_get_count(row, "quantity")?,
            unit_price: try_get_amount(row, "unit_price")?,
        })
    }
}
