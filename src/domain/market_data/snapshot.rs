//! Snapshot container for the price view.
//!
//! Every fetch is stamped with a sequence number when it is issued. A
//! completion is applied only if it is newer than the last applied one, so
//! a slow read that finishes after a faster, later read cannot overwrite
//! fresher data. Once closed, nothing is applied.

use std::rc::Rc;

use super::entities::PriceSample;
use crate::domain::errors::FeedResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Replaced { samples: usize },
    Failed,
    Stale,
    Closed,
}

#[derive(Debug, Default)]
pub struct SnapshotStore {
    samples: Rc<[PriceSample]>,
    error: Option<String>,
    channel_error: Option<String>,
    issued: u64,
    applied: u64,
    replacements: u64,
    closed: bool,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` once the store is closed.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        if self.closed {
            return None;
        }
        self.issued += 1;
        Some(FetchTicket(self.issued))
    }

    pub fn apply(&mut self, ticket: FetchTicket, result: FeedResult<Vec<PriceSample>>) -> ApplyOutcome {
        if self.closed {
            return ApplyOutcome::Closed;
        }
        if ticket.0 <= self.applied {
            return ApplyOutcome::Stale;
        }
        self.applied = ticket.0;
        match result {
            Ok(samples) => {
                let count = samples.len();
                self.samples = samples.into();
                self.error = None;
                self.replacements += 1;
                ApplyOutcome::Replaced { samples: count }
            }
            Err(err) => {
                // previous samples stay on screen
                self.error = Some(err.message().to_string());
                ApplyOutcome::Failed
            }
        }
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Shared handle to the current snapshot; cloning never copies rows.
    pub fn samples(&self) -> Rc<[PriceSample]> {
        Rc::clone(&self.samples)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn replacements(&self) -> u64 {
        self.replacements
    }

    /// Why the change channel is not open. Reads never clear it.
    pub fn set_channel_error(&mut self, message: impl Into<String>) {
        self.channel_error = Some(message.into());
    }

    pub fn channel_error(&self) -> Option<&str> {
        self.channel_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::AppError;

    fn rows(prices: &[f64]) -> Vec<PriceSample> {
        prices.iter().enumerate().map(|(i, p)| PriceSample::at_epoch(i as i64 * 60, *p)).collect()
    }

    #[test]
    fn later_ticket_wins_over_slow_earlier_one() {
        let mut store = SnapshotStore::new();
        let first = store.begin_fetch().unwrap();
        let second = store.begin_fetch().unwrap();

        assert_eq!(store.apply(second, Ok(rows(&[2.0, 3.0]))), ApplyOutcome::Replaced { samples: 2 });
        assert_eq!(store.apply(first, Ok(rows(&[1.0]))), ApplyOutcome::Stale);
        assert_eq!(store.samples().len(), 2);
        assert_eq!(store.replacements(), 1);
    }

    #[test]
    fn failure_keeps_previous_rows_and_records_message() {
        let mut store = SnapshotStore::new();
        let ok = store.begin_fetch().unwrap();
        store.apply(ok, Ok(rows(&[80.0])));

        let bad = store.begin_fetch().unwrap();
        let outcome = store.apply(bad, Err(AppError::NetworkError("offline".into())));

        assert_eq!(outcome, ApplyOutcome::Failed);
        assert_eq!(store.error(), Some("offline"));
        assert_eq!(store.samples().len(), 1);
    }

    #[test]
    fn success_clears_error() {
        let mut store = SnapshotStore::new();
        let bad = store.begin_fetch().unwrap();
        store.apply(bad, Err(AppError::FeedError("denied".into())));
        let ok = store.begin_fetch().unwrap();
        store.apply(ok, Ok(Vec::new()));
        assert_eq!(store.error(), None);
    }

    #[test]
    fn closed_store_ignores_everything() {
        let mut store = SnapshotStore::new();
        let pending = store.begin_fetch().unwrap();
        store.close();

        assert_eq!(store.apply(pending, Ok(rows(&[1.0]))), ApplyOutcome::Closed);
        assert!(store.begin_fetch().is_none());
        assert!(store.samples().is_empty());
    }

    #[test]
    fn channel_error_survives_successful_reads() {
        let mut store = SnapshotStore::new();
        store.set_channel_error("socket refused");
        let ticket = store.begin_fetch().unwrap();

        assert_eq!(store.apply(ticket, Ok(rows(&[80.1]))), ApplyOutcome::Replaced { samples: 1 });
        assert_eq!(store.error(), None);
        assert_eq!(store.channel_error(), Some("socket refused"));
    }
}
