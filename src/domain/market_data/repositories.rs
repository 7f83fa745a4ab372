use futures::future::LocalBoxFuture;

use super::entities::PriceSample;
use crate::domain::errors::FeedResult;

/// Read side of the price feed
pub trait PriceFeed {
    /// Every sample, ordered by creation time ascending.
    fn fetch_all(&self) -> LocalBoxFuture<'static, FeedResult<Vec<PriceSample>>>;
}

/// Notification pushed by the change channel. The payload is never
/// interpreted, it only signals that the table moved.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub payload: Option<serde_json::Value>,
}

impl ChangeEvent {
    pub fn empty() -> Self {
        Self { payload: None }
    }
}

/// Push side of the price feed
pub trait ChangeFeed {
    type Subscription: Subscription;

    fn subscribe(&self, on_change: Box<dyn FnMut(ChangeEvent)>) -> FeedResult<Self::Subscription>;
}

/// Live channel handle; after `close` the callback never runs again.
pub trait Subscription {
    fn close(&mut self);
    fn is_closed(&self) -> bool;
}
