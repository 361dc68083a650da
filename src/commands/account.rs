use std::io::Write;

use thisslime::TracingError;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, instrument};

use super::{render, Context};
use crate::{
    sync::{oauth, RemoteStore, SyncError},
    Result,
};

const LOGIN_FAILED: &str = "Login failed. Please try again.";

#[instrument(skip_all)]
pub async fn login(ctx: &mut Context, code: Option<String>) -> Result<()> {
    let github = &ctx.config().github;
    let client_id = github.client_id()?.to_owned();
    let redirect_uri = github.redirect_uri()?.clone();
    let proxy_url = github.proxy_url()?.clone();

    let code = match code {
        Some(code) => code,
        None => {
            let url = oauth::authorize_url(&client_id, &redirect_uri).map_err(SyncError::from)?;
            println!("Open this page and authorize Word Wave:\n\n  {url}\n");
            print!("Then paste the `code` from the page you land on: ");
            std::io::stdout().flush()?;

            BufReader::new(tokio::io::stdin())
                .lines()
                .next_line()
                .await?
                .unwrap_or_default()
        }
    };

    let exchanged = oauth::exchange_code(
        ctx.github().http(),
        &proxy_url,
        &client_id,
        &redirect_uri,
        &code,
    )
    .await;

    let token = match exchanged {
        Ok(token) => token,
        Err(err) => {
            err.trace();
            println!("{LOGIN_FAILED}");
            return Ok(());
        }
    };

    ctx.set_token(&token)?;

    let Some(mut cloud) = ctx.cloud().await? else {
        println!("{LOGIN_FAILED}");
        return Ok(());
    };

    info!(login = %cloud.user().login, "logged in");
    println!("Logged in as {}.", cloud.user().login);

    let today = ctx.today();
    if let Err(err) = cloud.pull(ctx.store_mut(), today).await {
        err.trace();
    }
    println!("Sync status: {}", cloud.status());

    Ok(())
}

pub fn logout(ctx: &mut Context) -> Result<()> {
    ctx.logout()?;
    println!("Logged out.");
    Ok(())
}

pub async fn sync(ctx: &mut Context) -> Result<()> {
    let Some(mut cloud) = ctx.cloud().await? else {
        println!("Not logged in. Run `wordwave login` to sync your stats.");
        return Ok(());
    };

    let today = ctx.today();
    if let Err(err) = cloud.pull(ctx.store_mut(), today).await {
        err.trace();
    }

    println!("Sync status: {}", cloud.status());
    println!("{}", render::summary(&ctx.store().stats()));

    Ok(())
}

pub async fn leaderboard(ctx: &Context, limit: usize) -> Result<()> {
    let board = ctx.leaderboard().load().await?;
    let top = board.top_players(limit);

    if top.is_empty() {
        println!("No players yet.");
        return Ok(());
    }

    for (rank, player) in top.iter().enumerate() {
        println!(
            "{:>2}. {:<20} {:>3}%  {} played  {} won",
            rank + 1,
            player.username,
            player.stats.win_percentage(),
            player.stats.games_played,
            player.stats.games_won,
        );
    }

    Ok(())
}
