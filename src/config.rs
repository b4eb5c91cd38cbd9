//! Logging setup

use tracing::log::LevelFilter;

/// Crates that are chatty at debug level, and the most they may log when
/// debug logging is off.
const QUIET_MODULES: &[(&str, LevelFilter)] = &[
    ("tracing", LevelFilter::Warn),
    ("reqwest", LevelFilter::Info),
    ("rustls", LevelFilter::Info),
    ("hyper_util", LevelFilter::Info),
    ("h2", LevelFilter::Info),
    ("png", LevelFilter::Warn),
    ("zune_jpeg", LevelFilter::Warn),
];

/// Global level for the debug flag.
pub fn log_level(debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Per-module overrides for the debug flag, none when debugging.
pub fn module_levels(debug: bool) -> &'static [(&'static str, LevelFilter)] {
    if debug { &[] } else { QUIET_MODULES }
}

/// Installs the global logger. Fails if one is already installed.
pub fn setup_logging(debug: bool) -> Result<(), Box<std::io::Error>> {
    let logger = module_levels(debug).iter().fold(
        simple_logger::SimpleLogger::new().with_level(log_level(debug)),
        |logger, (module, level)| logger.with_module_level(module, *level),
    );
    logger.init().map_err(|err| {
        eprintln!("Failed to initialize logger: {}", err);
        Box::new(std::io::Error::other(err))
    })
}
