//! Test Helpers

use sqlx::query;

use crate::{
    domain::{
        catalog::models::{AddonUuid, CakeUuid, LocationUuid, OccasionUuid, TheaterUuid},
        customers::{
            CustomersService, CustomersServiceError,
            models::{CustomerUuid, NewCustomer},
        },
    },
    test::TestContext,
};

pub(crate) async fn seed_location(
    ctx: &TestContext,
    name: &str,
    public: bool,
) -> Result<LocationUuid, sqlx::Error> {
    let uuid = LocationUuid::new();

    query("INSERT INTO locations (uuid, name, address, public) VALUES ($1, $2, $3, $4)")
        .bind(uuid.into_uuid())
        .bind(name)
        .bind(format!("1 {name} Road"))
        .bind(public)
        .execute(ctx.db.pool())
        .await?;

    Ok(uuid)
}

/// Theater costing ₹1999 a slot plus ₹500 decoration, for 4 to 8 guests.
pub(crate) async fn seed_theater(
    ctx: &TestContext,
    location: LocationUuid,
    name: &str,
    slots: &[&str],
) -> Result<TheaterUuid, sqlx::Error> {
    let uuid = TheaterUuid::new();

    query(
        "INSERT INTO theaters \
           (uuid, location_uuid, name, cost, decoration_price, base_persons, max_persons, slots) \
         VALUES ($1, $2, $3, 199900, 50000, 4, 8, $4)",
    )
    .bind(uuid.into_uuid())
    .bind(location.into_uuid())
    .bind(name)
    .bind(slots.iter().map(ToString::to_string).collect::<Vec<_>>())
    .execute(ctx.db.pool())
    .await?;

    Ok(uuid)
}

pub(crate) async fn seed_occasion(
    ctx: &TestContext,
    name: &str,
) -> Result<OccasionUuid, sqlx::Error> {
    let uuid = OccasionUuid::new();

    query("INSERT INTO occasions (uuid, name) VALUES ($1, $2)")
        .bind(uuid.into_uuid())
        .bind(name)
        .execute(ctx.db.pool())
        .await?;

    Ok(uuid)
}

/// Cake sold at 500 g and 1 kg.
pub(crate) async fn seed_cake(
    ctx: &TestContext,
    name: &str,
    eggless: bool,
    reference_price: i64,
) -> Result<CakeUuid, sqlx::Error> {
    let uuid = CakeUuid::new();

    query("INSERT INTO cakes (uuid, name, eggless, reference_price) VALUES ($1, $2, $3, $4)")
        .bind(uuid.into_uuid())
        .bind(name)
        .bind(eggless)
        .bind(reference_price)
        .execute(ctx.db.pool())
        .await?;

    Ok(uuid)
}

pub(crate) async fn seed_addon(
    ctx: &TestContext,
    name: &str,
    price: i64,
) -> Result<AddonUuid, sqlx::Error> {
    let uuid = AddonUuid::new();

    query("INSERT INTO addons (uuid, name, category, price) VALUES ($1, $2, 'Effects', $3)")
        .bind(uuid.into_uuid())
        .bind(name)
        .bind(price)
        .execute(ctx.db.pool())
        .await?;

    Ok(uuid)
}

pub(crate) async fn deactivate_coupon(ctx: &TestContext, code: &str) -> Result<(), sqlx::Error> {
    query("UPDATE coupons SET active = FALSE WHERE lower(code) = lower($1)")
        .bind(code)
        .execute(ctx.db.pool())
        .await?;

    Ok(())
}

/// Contact details for a party of four with no theater chosen yet.
pub(crate) fn new_customer(phone: &str) -> NewCustomer {
    NewCustomer {
        uuid: CustomerUuid::new(),
        booking_name: "Asha".to_string(),
        number_of_persons: 4,
        email: "asha@example.com".to_string(),
        phone: phone.to_string(),
        alternate_phone: None,
        decoration_needed: true,
        theater_uuid: None,
    }
}

pub(crate) async fn seed_customer(
    ctx: &TestContext,
    phone: &str,
) -> Result<CustomerUuid, CustomersServiceError> {
    let customer = ctx.customers.create_customer(new_customer(phone)).await?;

    Ok(customer.uuid)
}

pub(crate) async fn set_alternate_phone(
    ctx: &TestContext,
    customer: CustomerUuid,
    phone: &str,
) -> Result<(), sqlx::Error> {
    query("UPDATE customers SET alternate_phone = $2 WHERE uuid = $1")
        .bind(customer.into_uuid())
        .bind(phone)
        .execute(ctx.db.pool())
        .await?;

    Ok(())
}
