use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

/// Sets up the global logger. The level defaults to `info` and can be
/// overridden with the `LOG_LEVEL` environment variable.
pub fn init() -> Result<(), fern::InitError> {
    let level = std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(LevelFilter::Info);

    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .level(level)
        // serenity is chatty at debug; keep its noise down unless asked for.
        .level_for("serenity", LevelFilter::Warn)
        .level_for("tracing::span", LevelFilter::Warn)
        .chain(std::io::stdout())
        .apply()?;

    Ok(())
}
