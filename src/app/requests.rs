//! Bookkeeping of in-flight requests and the tracking subscription.
//!
//! Network calls cannot be cancelled once issued, so the coordinator instead
//! remembers the latest request id per operation. A response is applied only
//! if its id is still the latest; anything older is dropped on arrival.

use crate::domain::Coordinate;
use crate::worker::{RequestId, SubscriptionId};
use std::collections::HashMap;

/// Operations whose responses follow "last request wins".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    LocationFix,
    Route,
    Search,
    Nearby,
    Weather,
}

/// Issued request ids and the active tracking subscription.
#[derive(Debug, Default)]
pub struct RequestLedger {
    next_request: u64,
    next_subscription: u64,
    latest: HashMap<Operation, RequestId>,
    /// Reverse-geocode requests for favorites still waiting on a name. Each
    /// one is independent, so none supersedes another.
    pending_favorites: HashMap<RequestId, Coordinate>,
    tracking: Option<SubscriptionId>,
}

impl RequestLedger {
    /// Allocates a fresh request id without tying it to an operation.
    pub fn issue(&mut self) -> RequestId {
        self.next_request += 1;
        RequestId(self.next_request)
    }

    /// Allocates an id for `operation`, superseding any earlier one.
    pub fn begin(&mut self, operation: Operation) -> RequestId {
        let id = self.issue();
        if let Some(previous) = self.latest.insert(operation, id) {
            tracing::trace!(?operation, superseded = %previous, by = %id, "request superseded");
        }
        id
    }

    #[must_use]
    pub fn is_latest(&self, operation: Operation, id: RequestId) -> bool {
        self.latest.get(&operation) == Some(&id)
    }

    #[must_use]
    pub fn is_pending(&self, operation: Operation) -> bool {
        self.latest.contains_key(&operation)
    }

    /// Marks `id` as answered. Returns `false` when the response is stale and
    /// must be discarded.
    pub fn settle(&mut self, operation: Operation, id: RequestId) -> bool {
        if self.is_latest(operation, id) {
            self.latest.remove(&operation);
            true
        } else {
            tracing::debug!(?operation, id = %id, "discarding stale response");
            false
        }
    }

    /// Forgets the outstanding request for `operation`; its response, if it
    /// still arrives, will be discarded.
    pub fn abandon(&mut self, operation: Operation) {
        self.latest.remove(&operation);
    }

    pub fn await_favorite_name(&mut self, coordinate: Coordinate) -> RequestId {
        let id = self.issue();
        self.pending_favorites.insert(id, coordinate);
        id
    }

    /// Coordinate of the favorite waiting on `id`, if any.
    pub fn take_favorite(&mut self, id: RequestId) -> Option<Coordinate> {
        self.pending_favorites.remove(&id)
    }

    /// Registers a new tracking subscription and returns it together with the
    /// one it replaces.
    pub fn replace_tracking(&mut self) -> (SubscriptionId, Option<SubscriptionId>) {
        self.next_subscription += 1;
        let subscription = SubscriptionId(self.next_subscription);
        (subscription, self.tracking.replace(subscription))
    }

    /// Drops the active subscription, returning it for cancellation.
    pub fn take_tracking(&mut self) -> Option<SubscriptionId> {
        self.tracking.take()
    }

    #[must_use]
    pub fn tracking(&self) -> Option<SubscriptionId> {
        self.tracking
    }
}
