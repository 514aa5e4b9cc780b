//! Severity-tagged diagnostics with replaceable sinks.
//!
//! By default, messages emitted with [`log_at!`][crate::log_at] are forwarded to the [`log`]
//! crate, and failed [`verify!`][crate::verify] checks panic. Both behaviors can be replaced at
//! runtime with [`set_sink`] and [`set_crash_handler`], for example to route diagnostics into an
//! in-game console or to write a crash dump before aborting.
//!
//! ```
//! use trellis::debug::Severity;
//!
//! trellis::log_at!(Severity::Info, "loaded {} assets", 12);
//! trellis::verify!(1 + 1 == 2);
//! trellis::debug_verify!(true, "only checked in debug builds");
//! ```

use std::{
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

use once_cell::sync::Lazy;

/// How important a diagnostic message is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
    /// An unrecoverable error. Emitted by failed [`verify!`][crate::verify] checks.
    Fatal,
}

impl Severity {
    /// Returns the [`log::Level`] messages of this severity are logged at.
    ///
    /// [`Severity::Fatal`] has no direct equivalent and maps to [`log::Level::Error`].
    pub fn level(self) -> log::Level {
        match self {
            Severity::Trace => log::Level::Trace,
            Severity::Debug => log::Level::Debug,
            Severity::Info => log::Level::Info,
            Severity::Warning => log::Level::Warn,
            Severity::Error | Severity::Fatal => log::Level::Error,
        }
    }
}

impl From<Severity> for log::Level {
    fn from(severity: Severity) -> Self {
        severity.level()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        })
    }
}

/// A diagnostic message, as passed to the sink.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    pub severity: Severity,
    /// Path of the module that emitted the message.
    pub module: &'a str,
    pub file: &'a str,
    pub line: u32,
    pub message: fmt::Arguments<'a>,
}

type Sink = dyn Fn(&Record<'_>) + Send + Sync;

static SINK: Lazy<RwLock<Arc<Sink>>> = Lazy::new(|| RwLock::new(Arc::new(forward_to_log)));

static CRASH_HANDLER: RwLock<Option<fn(&Record<'_>)>> = RwLock::new(None);

/// Replaces the function that receives all diagnostic messages.
pub fn set_sink<F>(sink: F)
where
    F: Fn(&Record<'_>) + Send + Sync + 'static,
{
    *SINK.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(sink);
}

/// Restores the default sink, which forwards messages to the [`log`] crate.
pub fn reset_sink() {
    set_sink(forward_to_log);
}

/// Sets a function that is invoked when a [`verify!`][crate::verify] check fails.
///
/// The handler receives the [`Severity::Fatal`] record describing the failure. If it returns,
/// the thread panics with the failure message afterwards.
pub fn set_crash_handler(handler: fn(&Record<'_>)) {
    *CRASH_HANDLER
        .write()
        .unwrap_or_else(PoisonError::into_inner) = Some(handler);
}

/// Removes the crash handler installed with [`set_crash_handler`].
pub fn reset_crash_handler() {
    *CRASH_HANDLER
        .write()
        .unwrap_or_else(PoisonError::into_inner) = None;
}

fn forward_to_log(record: &Record<'_>) {
    let level = record.severity.level();
    if level > log::max_level() {
        return;
    }

    log::logger().log(
        &log::Record::builder()
            .args(record.message)
            .level(level)
            .target(record.module)
            .module_path(Some(record.module))
            .file(Some(record.file))
            .line(Some(record.line))
            .build(),
    );
}

/// Passes a message to the current sink. Use [`log_at!`][crate::log_at] instead of calling this.
#[doc(hidden)]
pub fn emit(severity: Severity, module: &str, file: &str, line: u32, message: fmt::Arguments<'_>) {
    // Clone the sink out of the lock, so that it may log or replace itself.
    let sink = SINK
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    sink(&Record {
        severity,
        module,
        file,
        line,
        message,
    });
}

/// Reports a fatal error and diverges.
///
/// Emits a [`Severity::Fatal`] record, invokes the crash handler, and panics if the handler
/// returns.
#[doc(hidden)]
#[cold]
#[track_caller]
pub fn crash(module: &str, file: &str, line: u32, message: fmt::Arguments<'_>) -> ! {
    let record = Record {
        severity: Severity::Fatal,
        module,
        file,
        line,
        message,
    };
    emit(Severity::Fatal, module, file, line, message);

    let handler = *CRASH_HANDLER.read().unwrap_or_else(PoisonError::into_inner);
    if let Some(handler) = handler {
        handler(&record);
    }
    panic!("{message}");
}

/// Emits a diagnostic message with the given [`Severity`][crate::debug::Severity].
#[macro_export]
macro_rules! log_at {
    ($severity:expr, $($arg:tt)+) => {
        $crate::debug::emit(
            $severity,
            ::std::module_path!(),
            ::std::file!(),
            ::std::line!(),
            ::std::format_args!($($arg)+),
        )
    };
}

/// Checks a condition, reporting a fatal error if it is false.
///
/// Unlike [`assert!`], a failing check first emits a [`Severity::Fatal`] record and runs the
/// crash handler (see [`set_crash_handler`]).
///
/// [`Severity::Fatal`]: crate::debug::Severity::Fatal
/// [`set_crash_handler`]: crate::debug::set_crash_handler
#[macro_export]
macro_rules! verify {
    ($cond:expr $(,)?) => {
        $crate::verify!($cond, "verification failed: {}", ::std::stringify!($cond))
    };
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            $crate::debug::crash(
                ::std::module_path!(),
                ::std::file!(),
                ::std::line!(),
                ::std::format_args!($($arg)+),
            )
        }
    };
}

/// Like [`verify!`][crate::verify], but only checked when `debug_assertions` are enabled.
#[macro_export]
macro_rules! debug_verify {
    ($($arg:tt)+) => {
        if ::std::cfg!(debug_assertions) {
            $crate::verify!($($arg)+);
        }
    };
}

#[cfg(test)]
mod tests {
    use std::{
        panic,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex,
        },
    };

    use super::*;

    #[test]
    fn levels() {
        assert_eq!(Severity::Warning.level(), log::Level::Warn);
        assert_eq!(log::Level::from(Severity::Fatal), log::Level::Error);
        assert!(Severity::Trace < Severity::Fatal);
        assert_eq!(Severity::Warning.to_string(), "WARNING");
    }

    // Sinks and crash handlers are process-wide, so they're tested together.
    #[test]
    fn sink_and_crash_handler() {
        static RECORDS: Mutex<Vec<(Severity, u32, String)>> = Mutex::new(Vec::new());
        static CRASHES: AtomicUsize = AtomicUsize::new(0);

        set_sink(|r| {
            let msg = r.message.to_string();
            if msg.contains("sink-test") {
                assert!(r.file.ends_with("debug.rs"));
                assert!(r.module.ends_with("debug::tests"));
                RECORDS.lock().unwrap().push((r.severity, r.line, msg));
            }
        });
        set_crash_handler(|r| {
            assert_eq!(r.severity, Severity::Fatal);
            if r.message.to_string().contains("sink-test") {
                CRASHES.fetch_add(1, Ordering::SeqCst);
            }
        });

        let line = line!() + 1;
        crate::log_at!(Severity::Debug, "sink-test {}", 1);
        crate::verify!(true, "sink-test never");
        let result = panic::catch_unwind(|| {
            crate::verify!(1 > 2, "sink-test {} > {}", 1, 2);
        });
        let msg = *result.unwrap_err().downcast::<String>().unwrap();
        assert_eq!(msg, "sink-test 1 > 2");

        reset_sink();
        reset_crash_handler();
        crate::log_at!(Severity::Error, "sink-test after reset");

        let records = RECORDS.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], (Severity::Debug, line, "sink-test 1".to_string()));
        assert_eq!(records[1].0, Severity::Fatal);
        assert_eq!(records[1].2, "sink-test 1 > 2");
        assert_eq!(CRASHES.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[should_panic(expected = "verification failed: 1 + 1 == 3")]
    fn verify_default_message() {
        crate::verify!(1 + 1 == 3);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "checked in debug"))]
    fn debug_verify() {
        crate::debug_verify!(false, "checked in debug");
    }
}
