use anyhow::Result;
use clap::Parser;

use kc_deploy::{
    cli::{handle_command, Cli},
    utils::init_logger,
};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_logger(cli.verbose);

    handle_command(&cli)
}
