use anyhow::Context as _;
use clap::Parser;
use thisslime::TracingError;
use tracing::{debug, info};

use wordwave::{cli::Cli, commands, framework};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    framework::logging::init_tracing();

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env file"),
        Err(err) if err.not_found() => (),
        Err(err) => return Err(err).context("couldn't read .env file"),
    }

    let config = framework::Config::load(cli.config.as_deref())
        .inspect_err(|err| err.trace())
        .context("couldn't load config")?;

    let command = cli.command.unwrap_or_default();
    info!(?command, "starting");

    commands::run(config, command)
        .await
        .inspect_err(|err| err.trace())?;

    Ok(())
}
