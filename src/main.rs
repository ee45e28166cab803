use std::env;
use std::error::Error;
use std::process::ExitCode;

use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use vend_eng::csv::{read_catalog, read_coins, read_session};
use vend_eng::{Engine, StartupConfig, StdoutNotifier, TieBreak};

const USAGE: &str = "usage: vend-eng <session.csv> [<catalog.csv> <coins.csv>]";

/// Factory catalog unless both a catalog and a coin file are given.
fn load_config(
    catalog: Option<String>,
    coins: Option<String>,
) -> Result<StartupConfig, Box<dyn Error>> {
    let config = match (catalog, coins) {
        (Some(catalog), Some(coins)) => {
            let products = read_catalog(catalog)?;
            let coins = read_coins(coins)?;
            StartupConfig::new(products, coins.iter().copied().collect())
                .with_coin_order(coins.iter().map(|&(denomination, _)| denomination))
        }
        (None, None) => StartupConfig::default(),
        _ => return Err(USAGE.into()),
    };

    match env::var("VEND_TIE_BREAK") {
        Ok(value) => Ok(config.with_tie_break(value.parse::<TieBreak>()?)),
        Err(_) => Ok(config),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse().unwrap()))
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let Some(session) = args.next() else {
        error!("{USAGE}");
        return ExitCode::FAILURE;
    };

    let config = match load_config(args.next(), args.next()) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut engine = match Engine::new(&config, StdoutNotifier) {
        Ok(engine) => engine,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let commands = match read_session(session) {
        Ok(commands) => commands,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let (command_sender, command_receiver) = tokio::sync::mpsc::channel(16);

    tokio::spawn(async move {
        for result in commands {
            match result {
                Ok(command) => {
                    if command_sender.send(command).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    engine.run(ReceiverStream::new(command_receiver)).await;

    info!(
        coins = engine.inventory().total_coin_count(),
        value = %engine.inventory().total_coin_value(),
        "session finished"
    );
    ExitCode::SUCCESS
}
