pub mod analog_clock;
pub mod price_dashboard;

pub use analog_clock::*;
pub use price_dashboard::*;
