use std::io::Write;

use log::{Level, LevelFilter, Metadata, Record};

/// Installs the stderr logger. The level comes from `RESTAURANT_LOG`
/// (`error`, `warn`, `info`, `debug` or `trace`), `info` when unset.
pub fn init() {
    static LOGGER: Logger = Logger;
    let level = std::env::var("RESTAURANT_LOG")
        .ok()
        .and_then(|v| v.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);

    // a second call keeps the first logger
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

struct Logger;

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let symbol = match record.level() {
            Level::Error => "\x1b[31m[X]\x1b[0m",
            Level::Warn => "\x1b[33m[!]\x1b[0m",
            Level::Info => "\x1b[34m[+]\x1b[0m",
            Level::Debug => "\x1b[36m[#]\x1b[0m",
            Level::Trace => "\x1b[32m[%]\x1b[0m",
        };
        let mut err = std::io::stderr().lock();
        let _ = writeln!(
            err,
            "{} {:<5} {}:{} - {}",
            symbol,
            record.level(),
            record.file().unwrap_or("unknown"),
            record.line().unwrap_or(0),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
