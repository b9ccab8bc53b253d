use std::io::{self, Write};

use colored::Colorize;
use log::{Level, LevelFilter, Log, Metadata, Record};

/// Console logger: progress on stdout, problems on stderr.
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

fn colorize(level: Level, message: &str) -> String {
    match level {
        Level::Error => message.red().bold().to_string(),
        Level::Warn => message.yellow().bold().to_string(),
        Level::Info => message.normal().to_string(),
        Level::Debug | Level::Trace => message.cyan().to_string(),
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = colorize(record.level(), &record.args().to_string());
        let _ = match record.level() {
            Level::Error | Level::Warn => writeln!(io::stderr(), "{line}"),
            _ => writeln!(io::stdout(), "{line}"),
        };
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
    }
}

/// Level from `-v`/`-q`: quiet wins, then info, debug, trace.
pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Warn;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
