use chrono::Local;
use log::{LevelFilter, Metadata, Record, SetLoggerError};
use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::OnceLock;

// Debug topics understood by --debug-filter
pub const TOPICS: [&str; 4] = ["ai", "move", "ability", "report"];

#[derive(Debug)]
struct CrewLogger {
    level: LevelFilter,
    debug_filters: Option<HashSet<String>>,
}

impl CrewLogger {
    fn passes(&self, metadata: &Metadata) -> bool {
        if metadata.level() > self.level {
            return false;
        }
        // Debug and trace output is limited to the requested topics
        match &self.debug_filters {
            Some(filters)
                if metadata.level() == log::Level::Debug
                    || metadata.level() == log::Level::Trace =>
            {
                filters.contains(metadata.target())
                    || filters.iter().any(|f| metadata.target().starts_with(f.as_str()))
            }
            _ => true,
        }
    }
}

impl log::Log for CrewLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.passes(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level_color = match record.level() {
            log::Level::Error => "\x1B[31m",
            log::Level::Warn => "\x1B[33m",
            log::Level::Info => "\x1B[32m",
            log::Level::Debug => "\x1B[36m",
            log::Level::Trace => "\x1B[35m",
        };
        let reset = "\x1B[0m";
        let timestamp = Local::now().format("%H:%M:%S%.3f");

        let mut output = format!(
            "{timestamp} {level_color}{level:5}{reset} {target}: {message}",
            level = record.level(),
            target = record.target(),
            message = record.args()
        );
        if let Some(module_path) = record.module_path() {
            if module_path != record.target() {
                output.push_str(&format!(" [{}]", module_path));
            }
        }

        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", output);
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

static LOGGER: OnceLock<CrewLogger> = OnceLock::new();

fn parse_filters(debug_filter: Option<String>) -> Option<HashSet<String>> {
    debug_filter.map(|filter_str| {
        filter_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<HashSet<String>>()
    })
}

/// Maps a --log-level string to a filter, defaulting to info.
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

// Initialize the logger with optional topic filters
pub fn init_logger(level: LevelFilter, debug_filter: Option<String>) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(|| CrewLogger {
        level,
        debug_filters: parse_filters(debug_filter),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);

    if let Some(filters) = &logger.debug_filters {
        for unknown in filters.iter().filter(|f| !TOPICS.contains(&f.as_str())) {
            let available = TOPICS.join(", ");
            log::warn!("Unknown debug topic '{}' (available: {})", unknown, available);
        }
    }
    Ok(())
}

#[macro_export]
macro_rules! debug_ai {
    ($($arg:tt)*) => {
        log::debug!(target: "ai", "{}", format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_move {
    ($($arg:tt)*) => {
        log::debug!(target: "move", "{}", format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_ability {
    ($($arg:tt)*) => {
        log::debug!(target: "ability", "{}", format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_report {
    ($($arg:tt)*) => {
        log::debug!(target: "report", "{}", format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, MetadataBuilder};

    fn metadata(level: Level, target: &str) -> Metadata<'_> {
        MetadataBuilder::new().level(level).target(target).build()
    }

    #[test]
    fn test_topic_filter_only_limits_debug() {
        let logger = CrewLogger {
            level: LevelFilter::Debug,
            debug_filters: parse_filters(Some("ai, report".to_string())),
        };
        assert!(logger.passes(&metadata(Level::Debug, "ai")));
        assert!(logger.passes(&metadata(Level::Debug, "report")));
        assert!(!logger.passes(&metadata(Level::Debug, "move")));
        assert!(logger.passes(&metadata(Level::Info, "move")));
        assert!(!logger.passes(&metadata(Level::Trace, "ai")));
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_level("off"), LevelFilter::Off);
        assert_eq!(parse_level("bogus"), LevelFilter::Info);
    }
}
