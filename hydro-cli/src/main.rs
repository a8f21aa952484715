//! Hydro CLI - query yearly and monthly river gauge statistics.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "hydro-cli",
    version,
    about = "River gauge yearly statistics toolkit"
)]
struct Cli {
    #[command(flatten)]
    data: hydro_cmd::DataArgs,

    #[command(subcommand)]
    command: hydro_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("Running {:?}", cli.command);
    hydro_cmd::run(cli.data, cli.command)
}
