//! Catalog service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::catalog::{
        errors::CatalogServiceError,
        models::{
            Addon, AddonUuid, Cake, CakeUuid, Location, LocationUuid, Occasion, Theater,
            TheaterUuid,
        },
        repository::PgCatalogRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    async fn list_locations(&self) -> Result<Vec<Location>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let locations = self.repository.list_locations(&mut tx).await?;

        tx.commit().await?;

        Ok(locations)
    }

    async fn list_theaters(
        &self,
        location: LocationUuid,
    ) -> Result<Vec<Theater>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let theaters = self.repository.list_theaters(&mut tx, location).await?;

        tx.commit().await?;

        Ok(theaters)
    }

    async fn get_theater(&self, theater: TheaterUuid) -> Result<Theater, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let theater = self.repository.get_theater(&mut tx, theater).await?;

        tx.commit().await?;

        Ok(theater)
    }

    async fn list_occasions(&self) -> Result<Vec<Occasion>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let occasions = self.repository.list_occasions(&mut tx).await?;

        tx.commit().await?;

        Ok(occasions)
    }

    async fn list_cakes(&self, eggless: Option<bool>) -> Result<Vec<Cake>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let cakes = self.repository.list_cakes(&mut tx, eggless).await?;

        tx.commit().await?;

        Ok(cakes)
    }

    async fn get_cake(&self, cake: CakeUuid) -> Result<Cake, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let cake = self.repository.get_cake(&mut tx, cake).await?;

        tx.commit().await?;

        Ok(cake)
    }

    async fn list_addons(&self) -> Result<Vec<Addon>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let addons = self.repository.list_addons(&mut tx).await?;

        tx.commit().await?;

        Ok(addons)
    }

    async fn get_addon(&self, addon: AddonUuid) -> Result<Addon, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let addon = self.repository.get_addon(&mut tx, addon).await?;

        tx.commit().await?;

        Ok(addon)
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Public locations, by name.
    async fn list_locations(&self) -> Result<Vec<Location>, CatalogServiceError>;

    /// Theaters at a location.
    async fn list_theaters(
        &self,
        location: LocationUuid,
    ) -> Result<Vec<Theater>, CatalogServiceError>;

    /// A single theater.
    async fn get_theater(&self, theater: TheaterUuid) -> Result<Theater, CatalogServiceError>;

    /// All occasions.
    async fn list_occasions(&self) -> Result<Vec<Occasion>, CatalogServiceError>;

    /// Cakes, optionally only eggless or only non-eggless ones.
    async fn list_cakes(&self, eggless: Option<bool>) -> Result<Vec<Cake>, CatalogServiceError>;

    /// A single cake.
    async fn get_cake(&self, cake: CakeUuid) -> Result<Cake, CatalogServiceError>;

    /// All add-ons, grouped by category.
    async fn list_addons(&self) -> Result<Vec<Addon>, CatalogServiceError>;

    /// A single add-on.
    async fn get_addon(&self, addon: AddonUuid) -> Result<Addon, CatalogServiceError>;
}
