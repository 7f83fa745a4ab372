//! Chart aggregate: rows derived from a snapshot, axis scaling and pixel layout.

pub mod entities;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use services::*;
pub use value_objects::*;
