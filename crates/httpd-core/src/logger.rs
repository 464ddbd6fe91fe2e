//! Severity-leveled logging with an interactive/daemon sink split.
//!
//! The original C source expresses the interactive-vs-daemon switch as
//! a mutable function pointer initialized to stderr and swapped to
//! syslog during startup. We keep the same externally observable
//! contract — one of two sinks selected once, before any fallible
//! startup step — via a `OnceLock<Sink>` instead.

use std::io::Write;
use std::sync::{Mutex, OnceLock};

/// Log severities, in the order the original source defines them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Notice,
    Warn,
    Error,
    Fatal,
}

impl Severity {
    /// Per-severity glyph prefix used by the interactive sink, mirroring
    /// the source's `.`, ` `, ` + `, `--`, `!!` convention.
    const fn glyph(self) -> &'static str {
        match self {
            Self::Debug => ".",
            Self::Info => " ",
            Self::Notice => " + ",
            Self::Warn => "--",
            Self::Error | Self::Fatal => "!!",
        }
    }
}

enum Sink {
    Interactive(Mutex<std::io::Stderr>),
    Daemon(Mutex<syslog::Logger<syslog::LoggerBackend, syslog::Formatter3164>>),
}

static SINK: OnceLock<Sink> = OnceLock::new();

/// Select the interactive (stderr) sink. Called once at startup when
/// running in the foreground.
pub fn use_interactive() {
    let _ = SINK.set(Sink::Interactive(Mutex::new(std::io::stderr())));
}

/// Select the daemon (syslog) sink under the process tag `httpd`.
/// Called once at startup when not running in the foreground.
///
/// Falls back to the interactive sink if the syslog stream cannot be
/// opened (logged as a warning once the fallback is in place).
pub fn use_daemon() {
    let formatter = syslog::Formatter3164 {
        facility: syslog::Facility::LOG_DAEMON,
        hostname: None,
        process: "httpd".into(),
        pid: std::process::id() as i32,
    };

    match syslog::unix(formatter) {
        Ok(logger) => {
            let _ = SINK.set(Sink::Daemon(Mutex::new(logger)));
        }
        Err(_) => {
            use_interactive();
            log(
                Severity::Warn,
                &format_args!("failed to open syslog stream, falling back to stderr"),
            );
        }
    }
}

/// Emit a single log record at the given severity. `fatal` additionally
/// terminates the process with exit code 1 after the record is
/// written.
pub fn log(severity: Severity, message: &std::fmt::Arguments<'_>) {
    match SINK.get() {
        Some(Sink::Interactive(stderr)) => {
            if let Ok(mut out) = stderr.lock() {
                let _ = writeln!(out, "{} {}", severity.glyph(), message);
            }
        }
        Some(Sink::Daemon(logger)) => {
            if let Ok(mut logger) = logger.lock() {
                let _ = match severity {
                    Severity::Debug => logger.debug(message.to_string()),
                    Severity::Info => logger.info(message.to_string()),
                    Severity::Notice => logger.notice(message.to_string()),
                    Severity::Warn => logger.warning(message.to_string()),
                    Severity::Error => logger.err(message.to_string()),
                    Severity::Fatal => logger.crit(message.to_string()),
                };
            }
        }
        None => {
            // No sink selected yet: fall back to stderr directly so
            // pre-startup diagnostics are never silently dropped.
            eprintln!("{} {}", severity.glyph(), message);
        }
    }

    if severity == Severity::Fatal {
        std::process::exit(1);
    }
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::Severity::Debug, &format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::Severity::Info, &format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! notice {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::Severity::Notice, &format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::Severity::Warn, &format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::Severity::Error, &format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! fatal {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::Severity::Fatal, &format_args!($($arg)*))
    };
}
