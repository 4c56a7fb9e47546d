//! Logging utilities for the agrimarket crates.
//!
//! Every binary calls `init_from_str` or `init_with_level` once at startup. Library
//! code only emits `tracing` events and never installs a subscriber itself.

use std::str::FromStr;
use tracing::level_filters::LevelFilter;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber from a level name such as `"debug"`.
///
/// Unknown names fall back to INFO.
pub fn init_from_str(level: &str) {
    init_with_level(parse_level(level));
}

/// Initialize the tracing subscriber with a specific log level.
///
/// `RUST_LOG` directives are honoured in addition to `level`. Calling this
/// more than once is harmless: later calls leave the first subscriber in place.
pub fn init_with_level(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(LevelFilter::from_level(level).into());

    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

pub fn parse_level(level: &str) -> Level {
    Level::from_str(level.trim()).unwrap_or(Level::INFO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_level_names() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level(" WARN "), Level::WARN);
        assert_eq!(parse_level("chatty"), Level::INFO);
    }
}
