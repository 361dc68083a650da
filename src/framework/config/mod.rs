use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use thisslime::TracingError;
use tracing::{debug, instrument, trace, warn};

mod github;
pub use github::GithubConfig;

mod proxy;
pub use proxy::ProxyConfig;

pub const DEFAULT_FILE: &str = "wordwave.toml";
pub const FILE_VAR: &str = "WORDWAVE_CONFIG";
pub const ENV_PREFIX: &str = "WORDWAVE";

#[derive(Debug, thiserror::Error, TracingError)]
pub enum Error {
    #[error("file read error: {0}")]
    #[event(level = ERROR)]
    Read(::config::ConfigError),

    #[error("parsing error: {0}")]
    #[event(level = ERROR)]
    Parse(::config::ConfigError),

    #[error("`{0}` is not configured")]
    #[event(level = ERROR)]
    Missing(&'static str),
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct AppConfig {
    data_dir: Option<PathBuf>,

    #[serde(default)]
    pub github: GithubConfig,

    #[serde(default)]
    pub proxy: ProxyConfig,

    #[serde(default)]
    pub dev: DevConfig,
}

/// Developer tools are limited to these GitHub logins.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct DevConfig {
    #[serde(default)]
    admins: Vec<String>,
}

impl DevConfig {
    pub fn is_admin(&self, login: &str) -> bool {
        self.admins
            .iter()
            .any(|admin| admin.eq_ignore_ascii_case(login))
    }
}

impl AppConfig {
    /// Layers the TOML file (if any) and `WORDWAVE__*` variables.
    ///
    /// An explicitly given file must exist; the default `wordwave.toml` may not.
    #[instrument(skip_all, name = "config")]
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let (file, required) = match path {
            Some(path) => (path.to_owned(), true),
            None => (PathBuf::from(DEFAULT_FILE), false),
        };

        debug!(file = %file.display(), required, "loading config");

        let config: Self = ::config::Config::builder()
            .add_source(
                ::config::File::from(file)
                    .format(::config::FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(Error::Read)?
            .try_deserialize()
            .map_err(Error::Parse)?;

        trace!(?config, "config loaded");

        Ok(config)
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Where local data is kept: the configured directory, else the platform
    /// config directory, else `./.wordwave`.
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }

        match ProjectDirs::from("", "", "wordwave") {
            Some(dirs) => dirs.config_dir().to_path_buf(),
            None => {
                warn!("no home directory found, storing data in ./.wordwave");
                PathBuf::from(".wordwave")
            }
        }
    }
}
