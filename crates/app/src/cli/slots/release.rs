use cinemates_app::{
    database::{self, Db},
    domain::slots::{PgSlotsService, SlotsService, SlotsServiceError, models::SlotReservationUuid},
};
use clap::Args;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct ReleaseSlotArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Reservation to delete
    #[arg(long)]
    uuid: Uuid,
}

pub(crate) async fn run(args: ReleaseSlotArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    PgSlotsService::new(Db::new(pool))
        .release(SlotReservationUuid::from_uuid(args.uuid))
        .await
        .map_err(|error| match error {
            SlotsServiceError::NotFound => format!("no reservation {}", args.uuid),
            other => format!("failed to release reservation: {other}"),
        })?;

    println!("released reservation {}", args.uuid);

    Ok(())
}
