use chrono::Local;
use log::{LevelFilter, Metadata, Record, SetLoggerError};
use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::OnceLock;

/// Log topics understood by `--debug-filter`.
pub const TOPICS: [&str; 3] = ["vm", "instructions", "io"];

// Custom logger structure
#[derive(Debug)]
struct VmLogger {
    level: LevelFilter,
    debug_filters: Option<HashSet<String>>,
}

impl log::Log for VmLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.level() <= self.level {
            // Debug and trace records are limited to the requested topics
            if let Some(filters) = &self.debug_filters {
                if metadata.level() == log::Level::Debug || metadata.level() == log::Level::Trace {
                    return filters.contains(metadata.target())
                        || filters.iter().any(|f| metadata.target().starts_with(f));
                }
            }
            return true;
        }
        false
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level_color = match record.level() {
            log::Level::Error => "\x1B[31m", // Red
            log::Level::Warn => "\x1B[33m",  // Yellow
            log::Level::Info => "\x1B[32m",  // Green
            log::Level::Debug => "\x1B[36m", // Cyan
            log::Level::Trace => "\x1B[35m", // Magenta
        };
        let reset = "\x1B[0m";
        let timestamp = Local::now().format("%H:%M:%S%.3f");

        // Instruction records carry an "[@NNNNN]" address prefix, lift it into the context column
        let message = record.args().to_string();
        let (context, message) = match split_address(&message) {
            Some((address, rest)) => (format!("[@{:05}] ", address), rest),
            None => (String::new(), message.as_str()),
        };

        let mut output = format!(
            "{timestamp} {level_color}{level:5}{reset} {context}{target}: {message}",
            level = record.level(),
            target = record.target(),
        );

        if let Some(module_path) = record.module_path() {
            if module_path != record.target() {
                output.push_str(&format!(" [{}]", module_path));
            }
        }

        // stdout belongs to the running program
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "{}", output);
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

fn split_address(message: &str) -> Option<(u16, &str)> {
    let rest = message.strip_prefix("[@")?;
    let end = rest.find(']')?;
    let address = rest[..end].parse::<u16>().ok()?;
    Some((address, rest[end + 1..].trim_start()))
}

static LOGGER: OnceLock<VmLogger> = OnceLock::new();

/// Initialize the logger with optional comma-separated debug topics
pub fn init_logger(level: LevelFilter, debug_filter: Option<String>) -> Result<(), SetLoggerError> {
    let debug_filters = debug_filter.map(|filter_str| {
        filter_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<HashSet<String>>()
    });

    let unknown: Vec<String> = debug_filters
        .iter()
        .flatten()
        .filter(|f| !TOPICS.iter().any(|t| t.starts_with(f.as_str())))
        .cloned()
        .collect();

    let logger = LOGGER.get_or_init(|| VmLogger {
        level,
        debug_filters,
    });

    log::set_logger(logger).map(|()| log::set_max_level(level))?;
    if !unknown.is_empty() {
        log::warn!("Unknown debug topics {:?}, expected some of {:?}", unknown, TOPICS);
    }
    Ok(())
}

/// Parse a `--log-level` value, falling back to `Info` for unknown names
pub fn parse_level(name: &str) -> LevelFilter {
    match name.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

// Helper macros for specific debug topics
#[macro_export]
macro_rules! debug_vm {
    ($($arg:tt)*) => {
        log::debug!(target: "vm", "{}", format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_instructions {
    (@$ip:expr, $($arg:tt)*) => {
        log::debug!(target: "instructions", "[@{:05}] {}", $ip, format_args!($($arg)*))
    };
    ($($arg:tt)*) => {
        log::debug!(target: "instructions", "{}", format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_io {
    ($($arg:tt)*) => {
        log::debug!(target: "io", "{}", format_args!($($arg)*))
    };
}
