use std::{io::Write, ops::ControlFlow};

use chrono::Local;
use thisslime::TracingError;
use tracing::{info, instrument};

use super::{render, Context};
use crate::{
    utils::format_duration::FormatDuration,
    wordle::{Countdown, Stats},
    Result,
};

pub fn stats(ctx: &Context) -> Result<()> {
    let stats = ctx.store().stats();

    println!("{}\n", render::summary(&stats));
    println!("Guess distribution");
    for line in render::distribution(&stats, None) {
        println!("{line}");
    }

    Ok(())
}

pub async fn share(ctx: &mut Context) -> Result<()> {
    let session = ctx.session().await;
    let game = session.game();

    if game.is_over() && game.has_started() {
        println!("{}", game.share_text());
    } else {
        println!("Finish today's puzzle to share it.");
    }

    Ok(())
}

/// Ticks until midnight or ctrl-c.
pub async fn countdown() -> Result<()> {
    let countdown = Countdown::to_next_puzzle(Local::now().naive_local());

    let ticking = countdown.run(|remaining| {
        print!("\rNext puzzle in {}", remaining.format_clock());

        match std::io::stdout().flush() {
            Ok(()) => ControlFlow::Continue(()),
            Err(_) => ControlFlow::Break(()),
        }
    });

    tokio::select! {
        () = ticking => println!("\nA new puzzle is ready!"),
        _ = tokio::signal::ctrl_c() => println!(),
    }

    Ok(())
}

#[instrument(skip_all)]
pub async fn reset_stats(ctx: &mut Context) -> Result<()> {
    let store = ctx.store_mut();
    store.set_stats(&Stats::default())?;
    store.clear_last_played()?;

    info!("local stats reset");

    if let Some(mut cloud) = ctx.cloud().await? {
        if let Err(err) = cloud.reset().await {
            err.trace();
        }
    }

    println!("Statistics reset.");

    Ok(())
}
