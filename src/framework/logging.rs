use tracing::{instrument, trace};
use tracing_subscriber::{
    prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use tracing_unwrap::ResultExt;

pub const DEFAULT_FILTER: &str = "wordwave=info";

/// Logs go to stderr so they never mix with the game board on stdout.
/// `RUST_LOG` replaces the default filter when set.
#[instrument]
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .expect_or_log("hard-coded env filter should be valid");

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    trace!("finished");
}
