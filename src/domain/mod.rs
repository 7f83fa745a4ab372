//! Pure domain layer: no browser calls, testable on the host.

pub mod chart;
pub mod clock;
pub mod errors;
pub mod logging;
pub mod market_data;
