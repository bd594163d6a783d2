mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use graphdump::observability::init_tracing;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match cli.command {
        Commands::Export(args) => commands::export(cli.config, args)?,
        Commands::Load(args) => commands::load(args)?,
        Commands::ShowConfig => commands::show_config(cli.config)?,
    }

    Ok(())
}
