#![doc(test(attr(deny(warnings))))]

//! Fintrack Core holds the calculation engine behind a personal-finance tracker:
//! debt amortization, savings-goal projection, budget summaries and the
//! recurring-payment scheduler, plus a small shell to drive them.

pub mod cli;
pub mod config;
pub mod currency;
pub mod errors;
pub mod planning;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Fintrack Core tracing initialized.");
    });
}
