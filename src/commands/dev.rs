use std::str::FromStr;

use chrono::Days;
use tracing::{info, instrument};

use super::Context;
use crate::{
    cli::DevCommand,
    wordle::daily::{format_date, parse_date},
    wordle::Word,
    Result,
};

#[instrument(skip(ctx))]
pub async fn dev(ctx: &mut Context, command: DevCommand) -> Result<()> {
    let admin = ctx.require_admin().await?;
    info!(login = %admin.login, "developer command");

    apply(ctx, command).await
}

async fn apply(ctx: &mut Context, command: DevCommand) -> Result<()> {
    match command {
        DevCommand::SetDate { date } => {
            let date = parse_date(&date)?;
            ctx.set_dev_date(Some(date))?;
            println!("Date set to {}.", format_date(date));
        }
        DevCommand::SkipDay => {
            let today = ctx.today();
            let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
            ctx.set_dev_date(Some(tomorrow))?;
            println!("Skipped to {}.", format_date(tomorrow));
        }
        DevCommand::ResetDate => {
            ctx.set_dev_date(None)?;
            println!("Back to {}.", format_date(ctx.today()));
        }
        DevCommand::SetWord { word } => {
            let word = Word::from_str(&word)?;
            let mut session = ctx.session().await;
            session.set_word(word.clone())?;
            session.save(ctx.store_mut())?;
            println!("Today's word is now {word}.");
        }
        DevCommand::Info => {
            let words = ctx.words().await;
            let today = ctx.today();
            let store = ctx.store();

            println!("Date:        {}", format_date(today));
            println!("Overridden:  {}", ctx.calendar().is_overridden());
            println!("Word:        {}", words.for_date(today));
            println!("Word list:   {} words", words.len());
            println!(
                "Last played: {}",
                store.last_played().map_or_else(|| "never".to_owned(), format_date)
            );
            println!("Data file:   {}", store.storage().path().display());
        }
    }

    Ok(())
}
