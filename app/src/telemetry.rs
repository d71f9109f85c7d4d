//! Tracing setup for the binary.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a global `fmt` subscriber filtered by `directives`.
///
/// # Errors
///
/// Returns an error if the directives do not parse or a global subscriber
/// is already installed.
pub fn init(directives: &str) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(directives)?)
        .with(fmt::layer().with_target(true))
        .try_init()?;
    Ok(())
}
