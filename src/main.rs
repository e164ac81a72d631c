// Simple HD wallet - CLI

use clap::Parser;
use simple_wallet::{Cli, CliHandler};

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let handler = CliHandler::new(&cli.data_dir, cli.network);

    if let Err(e) = handler.handle(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
