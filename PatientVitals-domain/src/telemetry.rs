//! Process-level setup shared by anything embedding the checker

use anyhow::Context;
use dotenv::dotenv;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Load variables from a `.env` file if one is present
///
/// Returns whether a file was found. Existing environment variables win.
pub fn load_env() -> bool {
    match dotenv() {
        Ok(path) => {
            debug!("Loaded environment from {:?}", path);
            true
        }
        Err(_) => false,
    }
}

/// Install the global tracing subscriber
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Calling this again
/// after a subscriber is installed is an error, which callers may ignore.
pub fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr))
        .with(env_filter)
        .try_init()
        .context("tracing subscriber already installed")?;

    info!("Tracing initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice_is_an_error_not_a_panic() {
        let _ = init_tracing();
        assert!(init_tracing().is_err());
    }
}
