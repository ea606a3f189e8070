//! Customers service.

use async_trait::async_trait;
use mockall::automock;
use tracing::debug;

use crate::{
    database::Db,
    domain::customers::{
        errors::CustomersServiceError,
        models::{
            AddonSelection, CakeSelection, Customer, CustomerSelections, CustomerUuid,
            NewAddonSelection, NewCakeSelection, NewCustomer, OccasionSelection,
        },
        repositories::{PgCustomersRepository, PgSelectionsRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgCustomersService {
    db: Db,
    customers: PgCustomersRepository,
    selections: PgSelectionsRepository,
}

impl PgCustomersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            customers: PgCustomersRepository::new(),
            selections: PgSelectionsRepository::new(),
        }
    }
}

#[async_trait]
impl CustomersService for PgCustomersService {
    async fn create_customer(
        &self,
        customer: NewCustomer,
    ) -> Result<Customer, CustomersServiceError> {
        let mut tx = self.db.begin().await?;

        let max_persons = match customer.theater_uuid {
            Some(theater) => Some(
                self.customers
                    .theater_capacity(&mut tx, theater)
                    .await
                    .map_err(|error| match error {
                        sqlx::Error::RowNotFound => CustomersServiceError::InvalidReference,
                        other => other.into(),
                    })?,
            ),
            None => None,
        };

        customer.validate(max_persons)?;

        let created = self.customers.create_customer(&mut tx, customer).await?;

        tx.commit().await?;

        debug!(customer = %created.uuid, "created customer");

        Ok(created)
    }

    async fn get_customer(
        &self,
        customer: CustomerUuid,
    ) -> Result<Customer, CustomersServiceError> {
        let mut tx = self.db.begin().await?;

        let customer = self.customers.get_customer(&mut tx, customer).await?;

        tx.commit().await?;

        Ok(customer)
    }

    async fn save_occasion(
        &self,
        customer: CustomerUuid,
        occasion: OccasionSelection,
    ) -> Result<OccasionSelection, CustomersServiceError> {
        if occasion.occasion_name.trim().is_empty() {
            return Err(CustomersServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        let saved = self
            .selections
            .upsert_occasion(&mut tx, customer, occasion)
            .await?;

        tx.commit().await?;

        Ok(saved)
    }

    async fn save_cake(
        &self,
        customer: CustomerUuid,
        cake: NewCakeSelection,
    ) -> Result<Option<CakeSelection>, CustomersServiceError> {
        let mut tx = self.db.begin().await?;

        let saved = if cake.quantity == 0 {
            self.selections
                .delete_cake(&mut tx, customer, cake.cake_uuid, cake.weight)
                .await?;

            None
        } else {
            Some(self.selections.upsert_cake(&mut tx, customer, cake).await?)
        };

        tx.commit().await?;

        Ok(saved)
    }

    async fn save_addon(
        &self,
        customer: CustomerUuid,
        addon: NewAddonSelection,
    ) -> Result<Option<AddonSelection>, CustomersServiceError> {
        let mut tx = self.db.begin().await?;

        let saved = if addon.quantity == 0 {
            self.selections
                .delete_addon(&mut tx, customer, addon.addon_uuid)
                .await?;

            None
        } else {
            Some(self.selections.upsert_addon(&mut tx, customer, addon).await?)
        };

        tx.commit().await?;

        Ok(saved)
    }

    async fn selections(
        &self,
        customer: CustomerUuid,
    ) -> Result<CustomerSelections, CustomersServiceError> {
        let mut tx = self.db.begin().await?;

        // Unknown customers surface as NotFound rather than an empty selection.
        self.customers.get_customer(&mut tx, customer).await?;

        let occasion = self.selections.get_occasion(&mut tx, customer).await?;
        let cakes = self.selections.list_cakes(&mut tx, customer).await?;
        let addons = self.selections.list_addons(&mut tx, customer).await?;

        tx.commit().await?;

        Ok(CustomerSelections {
            occasion,
            cakes,
            addons,
        })
    }
}

#[automock]
#[async_trait]
pub trait CustomersService: Send + Sync {
    /// Register the contact details that start a booking.
    async fn create_customer(
        &self,
        customer: NewCustomer,
    ) -> Result<Customer, CustomersServiceError>;

    /// A single customer.
    async fn get_customer(&self, customer: CustomerUuid)
    -> Result<Customer, CustomersServiceError>;

    /// Append or replace the customer's occasion.
    async fn save_occasion(
        &self,
        customer: CustomerUuid,
        occasion: OccasionSelection,
    ) -> Result<OccasionSelection, CustomersServiceError>;

    /// Append or replace a cake line. Zero quantity removes it and returns `None`.
    async fn save_cake(
        &self,
        customer: CustomerUuid,
        cake: NewCakeSelection,
    ) -> Result<Option<CakeSelection>, CustomersServiceError>;

    /// Append or replace an add-on line. Zero quantity removes it and returns `None`.
    async fn save_addon(
        &self,
        customer: CustomerUuid,
        addon: NewAddonSelection,
    ) -> Result<Option<AddonSelection>, CustomersServiceError>;

    /// Everything the customer has saved so far.
    async fn selections(
        &self,
        customer: CustomerUuid,
    ) -> Result<CustomerSelections, CustomersServiceError>;
}
