use std::io::Write;

use chrono::Local;
use thisslime::TracingError;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, instrument};

use super::{render, Context};
use crate::{
    utils::format_duration::FormatDuration,
    wordle::{session::Start, Countdown, GuessError, Session, Submission},
    Result,
};

#[instrument(skip_all)]
pub async fn play(ctx: &mut Context) -> Result<()> {
    let mut cloud = ctx.cloud().await?;
    if let Some(cloud) = cloud.as_mut() {
        let today = ctx.today();
        if let Err(err) = cloud.pull(ctx.store_mut(), today).await {
            err.trace();
        }
    }

    let mut session = ctx.session().await;
    let palette = render::Palette::new(&ctx.store().settings());

    match session.start() {
        Start::Locked => {
            println!("{}\n", GuessError::AlreadyPlayed);
            println!("{}\n", palette.board(session.game()));
            finish(&session);
            return Ok(());
        }
        Start::Resumed => println!("Picking up where you left off.\n"),
        Start::Fresh => (),
    }

    println!("{}\n", palette.board(session.game()));
    println!("{}\n", palette.keyboard(session.game().keyboard()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while !session.game().is_over() {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            info!("input closed, game saved");
            break;
        };

        match enter(&mut session, &line) {
            Ok(_) => session.save(ctx.store_mut())?,
            Err(err) => {
                println!("{err}");
                continue;
            }
        }

        println!("\n{}\n", palette.board(session.game()));
        if !session.game().is_over() {
            println!("{}\n", palette.keyboard(session.game().keyboard()));
        }
    }

    if !session.game().is_over() {
        return Ok(());
    }

    let game = session.game();
    if game.is_win() {
        println!("You got it!\n");
    } else {
        println!("The word was {}.\n", game.target());
    }

    for line in render::distribution(session.stats(), game.attempts().map(|n| n - 1)) {
        println!("{line}");
    }
    println!();

    if let Some(cloud) = cloud.as_mut() {
        if let Err(err) = cloud.push_result(&session).await {
            err.trace();
        }
    }

    finish(&session);

    Ok(())
}

/// Types a whole line and submits it. A rejected guess leaves the row empty.
fn enter(session: &mut Session, line: &str) -> std::result::Result<Submission, GuessError> {
    for letter in line.trim().chars() {
        session.type_letter(letter);
    }

    session.submit().inspect_err(|_| {
        while session.delete_letter() {}
    })
}

fn finish(session: &Session) {
    let game = session.game();
    if game.is_over() && game.has_started() {
        println!("{}\n", game.share_text());
    }

    let countdown = Countdown::to_next_puzzle(Local::now().naive_local());
    let remaining = countdown.remaining(Local::now().naive_local());
    println!("Next puzzle in {}", remaining.format_clock());
}
