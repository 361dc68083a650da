use std::path::PathBuf;

use crate::{framework::config::FILE_VAR, sync::leaderboard::DEFAULT_LIMIT};

#[derive(clap::Parser)]
#[command(version, about = "A daily five-letter word game")]
pub struct Cli {
    /// TOML config file. Defaults to `wordwave.toml` if it exists.
    #[arg(long, env = FILE_VAR)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(clap::Subcommand, Debug, Default, Clone, PartialEq, Eq)]
pub enum Command {
    /// Play today's puzzle.
    #[default]
    Play,

    /// Show your statistics.
    Stats,

    /// Print the emoji summary of today's game.
    Share,

    /// Count down to the next puzzle.
    Countdown,

    /// Zero your statistics, locally and in the cloud.
    ResetStats,

    /// Connect a GitHub account to sync stats.
    Login {
        /// Authorization code from the redirect, if you already have one.
        #[arg(long)]
        code: Option<String>,
    },

    Logout,

    /// Merge local and cloud stats.
    Sync,

    Leaderboard {
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },

    /// Show or change preferences.
    Settings {
        #[arg(long)]
        dark_mode: Option<bool>,

        #[arg(long)]
        color_blind: Option<bool>,

        #[arg(long)]
        hard_mode: Option<bool>,
    },

    #[command(subcommand)]
    Dev(DevCommand),

    #[command(subcommand)]
    Words(WordsCommand),

    /// Run the OAuth token-exchange proxy.
    Serve,
}

/// Developer overrides. Admins only.
#[derive(clap::Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum DevCommand {
    /// Pretend today is DATE (YYYY-MM-DD).
    SetDate { date: String },

    /// Move the date override one day forward.
    SkipDay,

    /// Go back to the real date.
    ResetDate,

    /// Replace today's answer.
    SetWord { word: String },

    Info,
}

#[derive(clap::Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum WordsCommand {
    /// Upload a word list (one word per line) to the word list gist.
    Push { file: PathBuf },
}

impl Command {
    pub fn is_serve(&self) -> bool {
        matches!(self, Self::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, DevCommand};
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[test]
    fn play_is_the_default() {
        let cli = Cli::try_parse_from(["wordwave"]).unwrap();
        assert_eq!(cli.command.unwrap_or_default(), Command::Play);
    }

    #[test]
    fn parses_settings_flags() {
        let cli =
            Cli::try_parse_from(["wordwave", "settings", "--hard-mode", "true"]).unwrap();

        assert_eq!(
            cli.command,
            Some(Command::Settings {
                dark_mode: None,
                color_blind: None,
                hard_mode: Some(true),
            })
        );
    }

    #[test]
    fn parses_dev_commands() {
        let cli = Cli::try_parse_from(["wordwave", "dev", "set-date", "2025-03-14"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Dev(DevCommand::SetDate {
                date: "2025-03-14".to_owned()
            }))
        );

        let cli = Cli::try_parse_from(["wordwave", "leaderboard"]).unwrap();
        assert_eq!(cli.command, Some(Command::Leaderboard { limit: 10 }));
    }
}
