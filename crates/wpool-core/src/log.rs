//! Kernel-style leveled logging for the pool.
//!
//! A small, dependency-free logging facade in the spirit of a `printk`:
//! a global atomic level filter plus `error!`/`warn!`/`info!`/`debug!`/
//! `trace!` macros that print to stderr with a level tag. The default
//! level can be overridden with the `WPOOL_LOG` environment variable
//! (`off`, `error`, `warn`, `info`, `debug`, `trace`, or the matching
//! digit 0-5).
//!
//! This is a real runtime threshold: a message logs when its level is at
//! or below the configured level, not the inverted comparison a naive
//! `level < HIGHEST_LEVEL` check would produce (which would always fire
//! for `ERROR`/`WARN` and never for `DEBUG`, regardless of the configured
//! threshold).

use crate::env::env_get_str;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::OnceLock;

/// Log verbosity levels, most to least severe.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    fn from_str(s: &str) -> Option<Self> {
        Some(match s.to_lowercase().as_str() {
            "off" | "0" => LogLevel::Off,
            "error" | "1" => LogLevel::Error,
            "warn" | "2" => LogLevel::Warn,
            "info" | "3" => LogLevel::Info,
            "debug" | "4" => LogLevel::Debug,
            "trace" | "5" => LogLevel::Trace,
            _ => return None,
        })
    }

    fn tag(self) -> &'static str {
        match self {
            LogLevel::Off => "",
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN ",
            LogLevel::Info => "INFO ",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

static LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);
static INIT: OnceLock<()> = OnceLock::new();

fn ensure_init() {
    INIT.get_or_init(|| {
        let raw = env_get_str("WPOOL_LOG", "info");
        if let Some(level) = LogLevel::from_str(&raw) {
            LEVEL.store(level as u8, Ordering::Relaxed);
        }
    });
}

/// Set the log level programmatically, overriding `WPOOL_LOG`.
pub fn set_level(level: LogLevel) {
    ensure_init();
    LEVEL.store(level as u8, Ordering::Relaxed);
}

/// Whether a message at `level` would currently be emitted.
#[inline]
pub fn enabled(level: LogLevel) -> bool {
    ensure_init();
    (level as u8) <= LEVEL.load(Ordering::Relaxed)
}

#[doc(hidden)]
pub fn emit(level: LogLevel, target: &str, args: fmt::Arguments<'_>) {
    if enabled(level) {
        eprintln!("[{}] {}: {}", level.tag(), target, args);
    }
}

use std::fmt;

#[macro_export]
macro_rules! werror {
    ($($arg:tt)*) => {
        $crate::log::emit($crate::log::LogLevel::Error, module_path!(), format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! wwarn {
    ($($arg:tt)*) => {
        $crate::log::emit($crate::log::LogLevel::Warn, module_path!(), format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! winfo {
    ($($arg:tt)*) => {
        $crate::log::emit($crate::log::LogLevel::Info, module_path!(), format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! wdebug {
    ($($arg:tt)*) => {
        $crate::log::emit($crate::log::LogLevel::Debug, module_path!(), format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! wtrace {
    ($($arg:tt)*) => {
        $crate::log::emit($crate::log::LogLevel::Trace, module_path!(), format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    fn test_set_level_gates_enabled() {
        set_level(LogLevel::Warn);
        assert!(enabled(LogLevel::Error));
        assert!(enabled(LogLevel::Warn));
        assert!(!enabled(LogLevel::Info));
        set_level(LogLevel::Info);
    }
}
