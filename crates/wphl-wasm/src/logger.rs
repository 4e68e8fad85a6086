use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;
use web_sys::console;

/// Forwards `log` records to the browser console.
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
        let message = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => console::error_1(&message),
            Level::Warn => console::warn_1(&message),
            Level::Info => console::info_1(&message),
            Level::Debug | Level::Trace => console::debug_1(&message),
        }
    }

    fn flush(&self) {}
}

/// Parse a level name such as `"debug"`; `None` means the default, warn.
pub fn level_filter(name: Option<&str>) -> Option<LevelFilter> {
    match name {
        None => Some(LevelFilter::Warn),
        Some(name) => name.parse().ok(),
    }
}

/// Route library logging to the console at the given level.
///
/// Can be called again to change the level.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: Option<String>) -> Result<(), JsError> {
    let filter = level_filter(level.as_deref())
        .ok_or_else(|| JsError::new(&format!("unknown log level: {level:?}")))?;
    // A second call finds the logger already installed.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(filter);
    Ok(())
}
