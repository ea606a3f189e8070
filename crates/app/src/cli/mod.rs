use clap::{Parser, Subcommand};

mod coupon;
mod slots;

#[derive(Debug, Parser)]
#[command(name = "cinemates-app", about = "Cinemates administration", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Coupon(coupon::CouponCommand),
    Slots(slots::SlotsCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Coupon(command) => coupon::run(command).await,
            Commands::Slots(command) => slots::run(command).await,
        }
    }
}
