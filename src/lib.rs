#![doc(test(attr(deny(warnings))))]

//! budgetbox keeps named spending boxes that refill every day, week or month.
//! The library hosts the shell frontend; accounting lives in `budgetbox-core`.

pub mod cli;
pub mod core;
pub mod utils;

pub use budgetbox_config as config;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("budgetbox tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
