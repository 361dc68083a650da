use super::Context;
use crate::{wordle::Settings, Result};

/// Applies whichever flags were given, then prints the result.
///
/// A refused hard-mode switch still saves the other changes.
pub async fn settings(
    ctx: &mut Context,
    dark_mode: Option<bool>,
    color_blind: Option<bool>,
    hard_mode: Option<bool>,
) -> Result<()> {
    let mut settings = ctx.store().settings();

    if let Some(enabled) = dark_mode {
        settings.set_dark_mode(enabled);
    }
    if let Some(enabled) = color_blind {
        settings.set_color_blind(enabled);
    }

    let hard_mode = match hard_mode {
        Some(enabled) => {
            let started = ctx.session().await.game().has_started();
            settings.set_hard_mode(enabled, started)
        }
        None => Ok(()),
    };

    ctx.store_mut().set_settings(&settings)?;
    print(&settings);

    hard_mode?;
    Ok(())
}

fn print(settings: &Settings) {
    let on_off = |flag: bool| if flag { "on" } else { "off" };

    println!("Dark mode:        {}", on_off(settings.dark_mode));
    println!("Color blind mode: {}", on_off(settings.color_blind));
    println!("Hard mode:        {}", on_off(settings.hard_mode));
}
