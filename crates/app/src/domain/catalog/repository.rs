//! Catalog Repository

use cinemates::cakes::Weight;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::{try_get_amount, try_get_count},
    domain::catalog::models::{
        Addon, AddonUuid, Cake, CakeUuid, Location, LocationUuid, Occasion, OccasionUuid, Theater,
        TheaterUuid,
    },
};

const LIST_LOCATIONS_SQL: &str = include_str!("sql/list_locations.sql");
const LIST_THEATERS_SQL: &str = include_str!("sql/list_theaters.sql");
const GET_THEATER_SQL: &str = include_str!("sql/get_theater.sql");
const LIST_OCCASIONS_SQL: &str = include_str!("sql/list_occasions.sql");
const LIST_CAKES_SQL: &str = include_str!("sql/list_cakes.sql");
const GET_CAKE_SQL: &str = include_str!("sql/get_cake.sql");
const LIST_ADDONS_SQL: &str = include_str!("sql/list_addons.sql");
const GET_ADDON_SQL: &str = include_str!("sql/get_addon.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_locations(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Location>, sqlx::Error> {
        query_as::<Postgres, Location>(LIST_LOCATIONS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_theaters(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        location: LocationUuid,
    ) -> Result<Vec<Theater>, sqlx::Error> {
        query_as::<Postgres, Theater>(LIST_THEATERS_SQL)
            .bind(location.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_theater(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        theater: TheaterUuid,
    ) -> Result<Theater, sqlx::Error> {
        query_as::<Postgres, Theater>(GET_THEATER_SQL)
            .bind(theater.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_occasions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Occasion>, sqlx::Error> {
        query_as::<Postgres, Occasion>(LIST_OCCASIONS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_cakes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        eggless: Option<bool>,
    ) -> Result<Vec<Cake>, sqlx::Error> {
        query_as::<Postgres, Cake>(LIST_CAKES_SQL)
            .bind(eggless)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_cake(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cake: CakeUuid,
    ) -> Result<Cake, sqlx::Error> {
        query_as::<Postgres, Cake>(GET_CAKE_SQL)
            .bind(cake.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_addons(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Addon>, sqlx::Error> {
        query_as::<Postgres, Addon>(LIST_ADDONS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_addon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        addon: AddonUuid,
    ) -> Result<Addon, sqlx::Error> {
        query_as::<Postgres, Addon>(GET_ADDON_SQL)
            .bind(addon.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Location {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: LocationUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            address: row.try_get("address")?,
            parking_available: row.try_get("parking_available")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Theater {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: TheaterUuid::from_uuid(row.try_get("uuid")?),
            location_uuid: LocationUuid::from_uuid(row.try_get("location_uuid")?),
            name: row.try_get("name")?,
            cost: try_get_amount(row, "cost")?,
            decoration_price: try_get_amount(row, "decoration_price")?,
            base_persons: try_get_count(row, "base_persons")?,
            max_persons: try_get_count(row, "max_persons")?,
            slots: row.try_get("slots")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Occasion {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OccasionUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            image_url: row.try_get("image_url")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Cake {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let tiers: Vec<i32> = row.try_get("weight_tiers_grams")?;

        let weight_tiers = tiers
            .into_iter()
            .map(|grams| {
                u32::try_from(grams)
                    .map_err(|e| sqlx::Error::ColumnDecode {
                        index: "weight_tiers_grams".to_string(),
                        source: Box::new(e),
                    })
                    .and_then(|grams| {
                        Weight::from_grams(grams).map_err(|e| sqlx::Error::ColumnDecode {
                            index: "weight_tiers_grams".to_string(),
                            source: Box::new(e),
                        })
                    })
            })
            .collect::<sqlx::Result<_>>()?;

        Ok(Self {
            uuid: CakeUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            image_url: row.try_get("image_url")?,
            eggless: row.try_get("eggless")?,
            reference_price: try_get_amount(row, "reference_price")?,
            weight_tiers,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Addon {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: AddonUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            category: row.try_get("category")?,
            image_url: row.try_get("image_url")?,
            price: try_get_amount(row, "price")?,
        })
    }
}
