use env_logger::{Builder, Target};
use log::LevelFilter;

/// Initialise the global logger for an embedding application.
///
/// `RUST_LOG` is honoured when set; otherwise everything logs at `warn` and
/// this crate at `debug`. Calling this more than once is harmless.
pub fn init_logger() {
    let result = if std::env::var("RUST_LOG").is_err() {
        Builder::new()
            .target(Target::Stdout)
            .filter_level(LevelFilter::Warn)
            .filter_module("keystone_client", LevelFilter::Debug)
            .try_init()
    } else {
        env_logger::try_init()
    };

    if result.is_err() {
        log::debug!("Logger already initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialisation_is_harmless() {
        init_logger();
        init_logger();
        log::debug!("logger ready");
    }
}
