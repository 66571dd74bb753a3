//! Logger initialization.

use std::io::Write;

use anyhow::{Context as _, Result};
use log::LevelFilter;

const RUST_LOG_VAR: &str = "RUST_LOG";

/// Initialize `env_logger` on stderr.
///
/// An explicit `level` (from `--log-level`) wins for this crate. Without one,
/// `RUST_LOG` decides, and this crate logs at info when `RUST_LOG` is unset.
/// Stdout is left to the emitted config.
pub fn init_logger(level: Option<LevelFilter>) -> Result<()> {
    let mut builder = env_logger::Builder::from_default_env();

    match level {
        Some(level) => {
            builder.filter_module("deploycfg", level);
        }
        None if std::env::var_os(RUST_LOG_VAR).is_none() => {
            builder.filter_module("deploycfg", LevelFilter::Info);
        }
        None => {}
    }
    builder.target(env_logger::Target::Stderr);
    builder.format(|buf, record| {
        writeln!(
            buf,
            "[{} {}] {}",
            record.level(),
            record.target(),
            record.args()
        )
    });

    // try_init: tests may initialize more than once
    builder.try_init().context("failed to initialize logger")?;
    Ok(())
}
