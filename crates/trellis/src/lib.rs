//! Small, independent utilities.
//!
//! Every module in this crate stands on its own:
//!
//! - [`ini`]: reading and writing INI configuration files.
//! - [`flags`]: a command-line flag parser.
//! - [`debug`]: severity-tagged diagnostics with pluggable sinks and crash hooks.
//! - [`event`]: single-threaded signals and slots.
//! - [`semver`]: semantic version numbers.
//! - [`graph`]: shortest paths and topological sorting.
//! - [`profile`]: lightweight timers.
//! - [`num`]: totally ordered floats.

pub mod debug;
pub mod event;
pub mod flags;
pub mod graph;
pub mod ini;
pub mod num;
pub mod profile;
pub mod semver;

use log::LevelFilter;

#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    env_logger::Builder::new()
        .filter(Some(calling_crate), LevelFilter::Debug)
        .filter(Some(env!("CARGO_CRATE_NAME")), LevelFilter::Debug)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// The calling crate and `trellis` log at *debug* level. Everything else can be configured with
/// the `RUST_LOG` environment variable. Calling this more than once has no effect.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
