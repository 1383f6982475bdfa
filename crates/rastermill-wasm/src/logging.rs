//! Browser console logger.
//!
//! Forwards `log` records from rastermill-core to `console.error/warn/info/debug`.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;
use web_sys::console;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => console::error_1(&line),
            Level::Warn => console::warn_1(&line),
            Level::Info => console::info_1(&line),
            Level::Debug | Level::Trace => console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Parse a level name ("off", "error", "warn", "info", "debug", "trace").
///
/// Unknown names fall back to `info`.
pub(crate) fn parse_level(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or(LevelFilter::Info)
}

/// Route rastermill log output to the browser console.
///
/// May be called again to change the level.
///
/// # Example (TypeScript)
///
/// ```typescript
/// init_logging('debug');
/// ```
#[wasm_bindgen]
pub fn init_logging(level: &str) {
    // Only the first call installs the logger; later calls just move the level
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(parse_level(level));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_names() {
        assert_eq!(parse_level("off"), LevelFilter::Off);
        assert_eq!(parse_level("warn"), LevelFilter::Warn);
        assert_eq!(parse_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_level(" trace "), LevelFilter::Trace);
    }

    #[test]
    fn test_parse_level_unknown_defaults_to_info() {
        assert_eq!(parse_level("verbose"), LevelFilter::Info);
        assert_eq!(parse_level(""), LevelFilter::Info);
    }
}
