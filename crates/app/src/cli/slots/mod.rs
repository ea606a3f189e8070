use clap::{Args, Subcommand};

mod list;
mod release;

#[derive(Debug, Args)]
pub(crate) struct SlotsCommand {
    #[command(subcommand)]
    command: SlotsSubcommand,
}

#[derive(Debug, Subcommand)]
enum SlotsSubcommand {
    List(list::ListSlotsArgs),
    Release(release::ReleaseSlotArgs),
}

pub(crate) async fn run(command: SlotsCommand) -> Result<(), String> {
    match command.command {
        SlotsSubcommand::List(args) => list::run(args).await,
        SlotsSubcommand::Release(args) => release::run(args).await,
    }
}
