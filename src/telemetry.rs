use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a fmt subscriber for the test process.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` applies. Ex:
/// RUST_LOG=info,handler_test_driver=debug cargo test
///
/// Safe to call from every test: only the first call installs anything.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("tracing initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialisation_is_harmless() {
        init_tracing("debug");
        init_tracing("info");
        tracing::info!("still logging");
    }
}
