//! What each subcommand does, on top of a shared [`Context`].

mod context;
pub use context::Context;

mod account;
mod dev;
mod play;
mod render;
mod settings;
mod stats;
mod words;

use tracing::{info, instrument};

use crate::{
    cli::{Command, WordsCommand},
    framework::Config,
    proxy::{self, ProxyState},
    sync::GithubClient,
    Result,
};

#[instrument(skip(config))]
pub async fn run(config: Config, command: Command) -> Result<()> {
    if command.is_serve() {
        return serve(&config).await;
    }

    let mut ctx = Context::new(config)?;

    match command {
        Command::Play => play::play(&mut ctx).await,
        Command::Stats => stats::stats(&ctx),
        Command::Share => stats::share(&mut ctx).await,
        Command::Countdown => stats::countdown().await,
        Command::ResetStats => stats::reset_stats(&mut ctx).await,
        Command::Login { code } => account::login(&mut ctx, code).await,
        Command::Logout => account::logout(&mut ctx),
        Command::Sync => account::sync(&mut ctx).await,
        Command::Leaderboard { limit } => account::leaderboard(&ctx, limit).await,
        Command::Settings {
            dark_mode,
            color_blind,
            hard_mode,
        } => settings::settings(&mut ctx, dark_mode, color_blind, hard_mode).await,
        Command::Dev(command) => dev::dev(&mut ctx, command).await,
        Command::Words(WordsCommand::Push { file }) => words::push(&mut ctx, &file).await,
        Command::Serve => serve(ctx.config()).await,
    }
}

async fn serve(config: &Config) -> Result<()> {
    let secret = config.proxy.client_secret()?;
    let github = GithubClient::new(config.github.api_url.clone(), config.github.timeout())?;

    let mut state = ProxyState::new(github, config.proxy.token_url.clone(), secret);
    if let Some((gist_id, token)) = config.proxy.leaderboard() {
        info!(gist_id, "serving leaderboard updates");
        state = state.with_leaderboard(gist_id, token);
    }

    proxy::serve(config.proxy.bind, state).await?;

    Ok(())
}
