//! Process logger built from the resolved configuration.
//!
//! Boot-critical events log at `info`; everything else logs at `debug` and is
//! only shown when `--debug` is set.

use log::LevelFilter;

use crate::config::ServerConfig;

/// Level filter for a configuration: `Debug` with `--debug`, `Info` otherwise.
pub fn level_for(config: &ServerConfig) -> LevelFilter {
    if config.debug() {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Build an `env_logger` logger for `config` without installing it.
pub fn builder(config: &ServerConfig) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level_for(config)).format_target(false);
    if config.log_timestamps() {
        builder.format_timestamp_secs();
    } else {
        builder.format_timestamp(None);
    }
    builder
}

/// Install the process logger. A logger that is already installed is kept.
pub fn init(config: &ServerConfig) {
    if builder(config).try_init().is_err() {
        log::set_max_level(level_for(config));
    }
}
