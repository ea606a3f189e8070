//! Booked Slots Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{extensions::*, slots::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BookedSlotResponse {
    pub theater_uuid: Uuid,
    pub location_uuid: Uuid,
    pub slot: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BookedSlotsResponse {
    pub date: String,
    pub booked: Vec<BookedSlotResponse>,
}

/// Booked Slots Handler
///
/// Returns every reserved slot on a date, so taken windows can be shown before a reservation is
/// attempted.
#[endpoint(tags("slots"), summary = "List Booked Slots")]
pub(crate) async fn handler(
    date: QueryParam<String, true>,
    depot: &mut Depot,
) -> Result<Json<BookedSlotsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let date = date.into_date()?;

    let reservations = state
        .slots
        .list_reservations(date)
        .await
        .map_err(into_status_error)?;

    Ok(Json(BookedSlotsResponse {
        date: date.to_string(),
        booked: reservations
            .into_iter()
            .map(|reservation| BookedSlotResponse {
                theater_uuid: reservation.theater_uuid.into(),
                location_uuid: reservation.location_uuid.into(),
                slot: reservation.booked_slot,
            })
            .collect(),
    }))
}

#[cfg(test)]
mod tests {
    use jiff::{Timestamp, civil::date};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use cinemates_app::domain::{
        catalog::models::{LocationUuid, TheaterUuid},
        slots::models::{SlotReservation, SlotReservationUuid},
    };

    use crate::test_helpers::Mocks;

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        mocks.service(Router::with_path("booked-slots").get(handler))
    }

    #[tokio::test]
    async fn test_booked_lists_reservations_for_date() -> TestResult {
        let theater = TheaterUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .slots
            .expect_list_reservations()
            .once()
            .withf(|d| *d == date(2026, 12, 24))
            .return_once(move |d| {
                Ok(vec![SlotReservation {
                    uuid: SlotReservationUuid::new(),
                    theater_uuid: theater,
                    location_uuid: LocationUuid::new(),
                    booked_date: d,
                    booked_slot: "Evening".to_string(),
                    created_at: Timestamp::UNIX_EPOCH,
                }])
            });

        let mut res = TestClient::get("http://example.com/booked-slots?date=2026-12-24")
            .send(&make_service(mocks))
            .await;

        let body: BookedSlotsResponse = res.take_json().await?;

        assert_eq!(body.date, "2026-12-24");
        assert_eq!(
            body.booked
                .iter()
                .map(|b| (b.theater_uuid, b.slot.as_str()))
                .collect::<Vec<_>>(),
            vec![(theater.into_uuid(), "Evening")]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_booked_invalid_date_returns_400() {
        let res = TestClient::get("http://example.com/booked-slots?date=2026-02-30")
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn test_booked_without_date_returns_400() {
        let res = TestClient::get("http://example.com/booked-slots")
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
