use cinemates::slots::parse_date;
use cinemates_app::{
    database::{self, Db},
    domain::slots::{PgSlotsService, SlotsService},
};
use clap::Args;

#[derive(Debug, Args)]
pub(crate) struct ListSlotsArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Day to list (YYYY-MM-DD)
    #[arg(long)]
    date: String,
}

pub(crate) async fn run(args: ListSlotsArgs) -> Result<(), String> {
    let date = parse_date(&args.date).map_err(|error| error.to_string())?;

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let reservations = PgSlotsService::new(Db::new(pool))
        .list_reservations(date)
        .await
        .map_err(|error| format!("failed to list reservations: {error}"))?;

    if reservations.is_empty() {
        println!("no reservations on {date}");
        return Ok(());
    }

    for reservation in reservations {
        println!("reservation_uuid: {}", reservation.uuid);
        println!("theater_uuid: {}", reservation.theater_uuid);
        println!("location_uuid: {}", reservation.location_uuid);
        println!("slot: {}", reservation.booked_slot);
        println!("reserved_at: {}", reservation.created_at);
        println!();
    }

    Ok(())
}
