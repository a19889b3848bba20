//! Crate-local logging sink.
//!
//! Presentation code drives the controller synchronously from its own
//! thread and is free to install any `log` backend it likes before calling
//! into this crate. [`init`] installs a small default backend so the crate
//! is useful stand-alone (tests, the `xiangqi` demo binary) without forcing
//! a dependency on a particular logging ecosystem.

use std::io::{Write, stderr, stdout};
use std::sync::RwLock;

pub use log::{Level, LevelFilter, Record};

pub static OUT: OutputManager = OutputManager::default();

/// Installs [`OUT`] as the global `log` backend. Idempotent: a second call
/// after another backend has already won returns the `SetLoggerError`
/// rather than panicking.
pub fn init() -> Result<(), log::SetLoggerError> {
    log::set_logger(&OUT).map(|()| log::set_max_level(LevelFilter::Info))
}

#[cfg(feature = "error_backtrace")]
const LOG_LEVEL: Level = Level::Trace;

#[cfg(not(feature = "error_backtrace"))]
#[cfg(debug_assertions)]
const LOG_LEVEL: Level = Level::Debug;

#[cfg(not(debug_assertions))]
const LOG_LEVEL: Level = Level::Info;

/// A single global `log::Log` backend with a runtime-toggleable verbose
/// mode, so presentation code can flip on debug output (e.g. from a
/// settings screen) without relinking.
pub struct OutputManager {
    runtime_debug: RwLock<bool>,
}

impl OutputManager {
    const fn default() -> Self {
        Self {
            runtime_debug: RwLock::new(cfg!(debug_assertions)),
        }
    }

    /// Enables or disables debug-level output regardless of build profile.
    pub fn set_verbose(&self, verbose: bool) {
        *self.runtime_debug.write().expect("poisoned") = verbose;
    }
}

impl log::Log for OutputManager {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= LOG_LEVEL
            || (*self.runtime_debug.read().expect("poisoned") && metadata.level() == Level::Debug)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match record.metadata().level() {
            Level::Trace => println!(
                "[trace {}:{}] {}",
                record.file().unwrap_or("?"),
                record.line().unwrap_or(0),
                record.args()
            ),
            Level::Debug => println!("[debug] {}", record.args()),
            Level::Info => println!("[info] {}", record.args()),
            Level::Warn => eprintln!(
                "[warn {}:{}] {}",
                record.file().unwrap_or("?"),
                record.line().unwrap_or(0),
                record.args()
            ),
            Level::Error => eprintln!(
                "[error {}:{}] {}",
                record.file().unwrap_or("?"),
                record.line().unwrap_or(0),
                record.args()
            ),
        }
    }

    fn flush(&self) {
        let _ = stdout().flush();
        let _ = stderr().flush();
    }
}
