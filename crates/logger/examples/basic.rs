//! Minimal setup: console + file logging configured from the environment
//!
//! ```sh
//! NEBULA_LOG_CONSOLE=1 NEBULA_LOG_LEVEL=debug cargo run -p nebula-logger --example basic
//! ```

use nebula_logger::prelude::*;

#[derive(Debug, thiserror::Error)]
#[error("payment gateway rejected the charge")]
struct GatewayError {
    #[source]
    source: std::io::Error,
}

fn main() -> LogResult<()> {
    let handle = nebula_logger::initialize(Config::from_env())?;
    let logger = handle.logger();

    logger.info_with("checkout started", fields!(order_id = 42, items = 3))?;
    logger.debug("loading cart")?;

    let err = GatewayError {
        source: std::io::Error::new(std::io::ErrorKind::TimedOut, "connection timed out"),
    };
    logger.error_with(
        "checkout failed",
        Fields::new()
            .with("order_id", 42)
            .with_error("cause", &err),
    )?;

    // Drains the background file worker before exit
    drop(handle);
    Ok(())
}
