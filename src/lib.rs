#![warn(clippy::perf)]
#![warn(clippy::unwrap_used)]

pub mod cli;
pub mod commands;

mod errors;
pub use errors::{Error, NotAdminError};

pub mod framework;
pub mod proxy;
pub mod storage;
pub mod sync;
pub mod utils;
pub mod wordle;

pub type Result<T, E = Error> = std::result::Result<T, E>;
