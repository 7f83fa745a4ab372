//! Market data aggregate: price rows, the feed ports and the snapshot container.

pub mod entities;
pub mod repositories;
pub mod snapshot;

pub use entities::*;
pub use repositories::*;
pub use snapshot::*;
