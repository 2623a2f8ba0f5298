use anyhow::Context;
use tracing::{error, info};

use tictactoe_server::configuration::{Configuration, ConnectionConfig};
use tictactoe_server::logger::init_logger;
use tictactoe_server::server::Matchmaker;

/// Usage: `server [CONNECTION_FILE]` (default `config`).
///
/// Session pacing and logging are read from the environment, see
/// [`Configuration::from_env`].
fn main() {
    let config = Configuration::from_env();
    if let Err(e) = init_logger(&config) {
        eprintln!("could not initialize logging: {e:#}");
        std::process::exit(1);
    }

    if let Err(e) = serve(config) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn serve(config: Configuration) -> anyhow::Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "config".to_owned());
    let connection = ConnectionConfig::from_file(&path)?;

    info!("server running...");
    let matchmaker = Matchmaker::bind(&connection, config).context("could not start server")?;
    matchmaker.run()
}
