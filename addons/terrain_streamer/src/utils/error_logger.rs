// src/utils/error_logger.rs
use godot::prelude::*;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::collections::VecDeque;
use std::sync::Mutex;

// Maximum number of warnings/errors to keep in history
pub const MAX_ERROR_HISTORY: usize = 100;

/// Bounded, thread-safe list of the most recent warnings and errors.
pub struct ErrorHistory {
    entries: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl ErrorHistory {
    pub const fn new(capacity: usize) -> Self {
        ErrorHistory {
            entries: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    pub fn record(&self, message: String) {
        if let Ok(mut log) = self.entries.lock() {
            log.push_back(message);

            // Remove oldest if exceeding capacity
            while log.len() > self.capacity {
                log.pop_front();
            }
        }
    }

    pub fn snapshot(&self) -> Vec<String> {
        match self.entries.lock() {
            Ok(log) => log.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn clear(&self) {
        if let Ok(mut log) = self.entries.lock() {
            log.clear();
        }
    }
}

/// `log` backend that prints through Godot's output panel.
pub struct GodotLogger {
    history: ErrorHistory,
}

static GODOT_LOGGER: GodotLogger = GodotLogger {
    history: ErrorHistory::new(MAX_ERROR_HISTORY),
};

impl GodotLogger {
    /// Registers the logger. Safe to call more than once; later calls only
    /// adjust the level.
    pub fn install(level: LevelFilter) {
        if log::set_logger(&GODOT_LOGGER).is_err() {
            log::debug!("GodotLogger: logger already installed");
        }
        log::set_max_level(level);
    }

    pub fn history() -> &'static ErrorHistory {
        &GODOT_LOGGER.history
    }
}

pub fn get_error_history() -> Vec<String> {
    GodotLogger::history().snapshot()
}

impl Log for GodotLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = format!("[{}] {}", record.target(), record.args());
        match record.level() {
            Level::Error => {
                godot_error!("{}", message);
                self.history.record(message);
            }
            Level::Warn => {
                godot_warn!("{}", message);
                self.history.record(message);
            }
            _ => godot_print!("{}", message),
        }
    }

    fn flush(&self) {}
}
