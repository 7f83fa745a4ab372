//! Price view orchestration.
//!
//! Owns the snapshot and drives it from two inputs: the initial read on
//! mount and one full re-read per change notification. Every read goes
//! through `SnapshotStore`, so completions are applied in issue order and
//! never after close. The initial read does not depend on the change
//! channel opening; a channel failure is kept apart from read errors.

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::domain::{
    logging::{LogComponent, get_logger},
    market_data::{ApplyOutcome, ChangeEvent, ChangeFeed, FetchTicket, PriceFeed, PriceSample, SnapshotStore, Subscription},
};

/// Runs a detached local task. `spawn_local` in the browser, a `LocalPool`
/// spawner in tests.
pub type Spawner = Rc<dyn Fn(LocalBoxFuture<'static, ()>)>;

pub fn browser_spawner() -> Spawner {
    Rc::new(|task: LocalBoxFuture<'static, ()>| wasm_bindgen_futures::spawn_local(task))
}

/// What the view needs after each applied read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotUpdate {
    pub samples: Rc<[PriceSample]>,
    /// Last read failure; cleared by the next successful read
    pub error: Option<String>,
    /// Change channel could not be opened
    pub channel_error: Option<String>,
}

impl SnapshotUpdate {
    fn of(store: &SnapshotStore) -> Self {
        Self {
            samples: store.samples(),
            error: store.error().map(str::to_string),
            channel_error: store.channel_error().map(str::to_string),
        }
    }
}

pub type SnapshotListener = Rc<dyn Fn(SnapshotUpdate)>;

#[derive(Clone)]
pub struct PriceDashboard {
    feed: Rc<dyn PriceFeed>,
    store: Rc<RefCell<SnapshotStore>>,
    spawner: Spawner,
    listener: SnapshotListener,
}

impl PriceDashboard {
    pub fn new(feed: Rc<dyn PriceFeed>, spawner: Spawner, listener: SnapshotListener) -> Self {
        Self {
            feed,
            store: Rc::new(RefCell::new(SnapshotStore::new())),
            spawner,
            listener,
        }
    }

    /// Issue one full read. `None` once the dashboard is closed.
    pub fn refresh(&self) -> Option<FetchTicket> {
        let ticket = self.store.borrow_mut().begin_fetch()?;
        get_logger().debug(
            LogComponent::Application("PriceDashboard"),
            &format!("📡 Fetch #{} issued", ticket.sequence()),
        );

        let read = self.feed.fetch_all();
        let store = Rc::clone(&self.store);
        let listener = Rc::clone(&self.listener);
        (self.spawner)(Box::pin(async move {
            let result = read.await;
            let outcome = store.borrow_mut().apply(ticket, result);
            match outcome {
                ApplyOutcome::Replaced { samples } => {
                    get_logger().info(
                        LogComponent::Application("PriceDashboard"),
                        &format!("✅ Snapshot #{} applied: {samples} samples", ticket.sequence()),
                    );
                }
                ApplyOutcome::Failed => {
                    get_logger().error(
                        LogComponent::Application("PriceDashboard"),
                        &format!("❌ Fetch #{} failed: {}", ticket.sequence(), store.borrow().error().unwrap_or_default()),
                    );
                }
                ApplyOutcome::Stale => {
                    get_logger().debug(
                        LogComponent::Application("PriceDashboard"),
                        &format!("Fetch #{} superseded, dropped", ticket.sequence()),
                    );
                    return;
                }
                ApplyOutcome::Closed => return,
            }
            let update = SnapshotUpdate::of(&store.borrow());
            listener(update);
        }));
        Some(ticket)
    }

    /// The payload is only a trigger; its content is never read.
    pub fn handle_change(&self, _event: ChangeEvent) -> Option<FetchTicket> {
        self.refresh()
    }

    /// Subscribe for changes, then issue the initial read. The read is
    /// issued even when the subscription fails; the failure is kept as
    /// `channel_error` and pushed to the listener right away.
    pub fn mount<C: ChangeFeed>(&self, changes: &C) -> MountedDashboard<C::Subscription> {
        let on_change = self.clone();
        let subscription = match changes.subscribe(Box::new(move |event| {
            on_change.handle_change(event);
        })) {
            Ok(subscription) => Some(subscription),
            Err(e) => {
                get_logger().error(
                    LogComponent::Application("PriceDashboard"),
                    &format!("❌ Change channel unavailable, showing a one-off snapshot: {e}"),
                );
                self.store.borrow_mut().set_channel_error(e.message());
                let update = SnapshotUpdate::of(&self.store.borrow());
                (self.listener)(update);
                None
            }
        };
        self.refresh();
        MountedDashboard { dashboard: self.clone(), subscription }
    }

    pub fn close(&self) {
        self.store.borrow_mut().close();
    }

    pub fn is_closed(&self) -> bool {
        self.store.borrow().is_closed()
    }

    pub fn samples(&self) -> Rc<[PriceSample]> {
        self.store.borrow().samples()
    }

    pub fn error(&self) -> Option<String> {
        self.store.borrow().error().map(str::to_string)
    }

    pub fn replacements(&self) -> u64 {
        self.store.borrow().replacements()
    }

    pub fn channel_error(&self) -> Option<String> {
        self.store.borrow().channel_error().map(str::to_string)
    }
}

/// Dashboard plus its live subscription, if one opened. Closing (or
/// dropping) it closes the channel and freezes the snapshot.
pub struct MountedDashboard<S: Subscription> {
    dashboard: PriceDashboard,
    subscription: Option<S>,
}

impl<S: Subscription> MountedDashboard<S> {
    pub fn dashboard(&self) -> &PriceDashboard {
        &self.dashboard
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.as_ref().is_some_and(|subscription| !subscription.is_closed())
    }

    /// Closes the channel and the dashboard. Safe to repeat, and still
    /// closes the channel if the dashboard was closed on its own.
    pub fn close(&mut self) {
        if self.is_closed() {
            return;
        }
        if let Some(subscription) = self.subscription.as_mut() {
            subscription.close();
        }
        self.dashboard.close();
        get_logger().info(LogComponent::Application("PriceDashboard"), "🛑 Dashboard closed");
    }

    pub fn is_closed(&self) -> bool {
        self.dashboard.is_closed() && !self.is_subscribed()
    }
}

impl<S: Subscription> Drop for MountedDashboard<S> {
    fn drop(&mut self) {
        self.close();
    }
}
