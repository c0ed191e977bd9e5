//! Logger installation for the command-line adapter.
//!
//! The HUD goes to stdout, so log records are written to stderr without
//! timestamps to keep replays of the same seed diffable.

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Default filter for the number of `--verbose` flags given.
pub(crate) fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs the global logger. `RUST_LOG` takes precedence over `verbosity`.
pub(crate) fn install(verbosity: u8) -> Result<()> {
    let env = Env::default().default_filter_or(level_for(verbosity).to_string());
    Builder::from_env(env)
        .target(Target::Stderr)
        .format_timestamp(None)
        .try_init()
        .context("a global logger is already installed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_the_default_filter() {
        assert_eq!(level_for(0), LevelFilter::Info);
        assert_eq!(level_for(1), LevelFilter::Debug);
        assert_eq!(level_for(2), LevelFilter::Trace);
        assert_eq!(level_for(u8::MAX), LevelFilter::Trace);
    }

    #[test]
    fn second_install_is_reported() {
        let _ = install(0);

        assert!(install(1).is_err());
    }
}
