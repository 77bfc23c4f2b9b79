//! Order store
//!
//! The [`OrderRepository`] trait is the seam between the lifecycle and
//! storage so tests can swap in their own store. The in-memory
//! implementation keys orders by ID in a [`DashMap`] and serializes
//! concurrent mutations of one order through its shard entry lock;
//! [`OrderRepository::transition`] re-checks the expected status under that
//! lock, which is what makes duplicate triggers harmless.
//!
//! Lock discipline: every operation holds at most one shard guard at a
//! time, and the payment index is only touched after the order guard has
//! been released.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use shared::order::{OrderChanges, OrderRecord, OrderStatus};
use shared::util::now_millis;
use std::sync::atomic::{AtomicU64, Ordering};

/// Result of a guarded status transition
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    /// The order was in the expected status and the changes were applied
    Applied(OrderRecord),
    /// The order had already moved on; nothing was changed
    StatusMismatch(OrderRecord),
    /// No order with that ID
    NotFound,
}

/// Order storage operations
pub trait OrderRepository: Send + Sync {
    /// Insert or replace an order
    fn save(&self, record: OrderRecord);

    /// Fetch a snapshot of one order
    fn get(&self, order_id: &str) -> Option<OrderRecord>;

    /// Merge changes into an order unconditionally and stamp `updated_at`
    fn update(&self, order_id: &str, changes: &OrderChanges) -> Option<OrderRecord>;

    /// Merge changes only if the order is still in `expected` status
    ///
    /// The check and the merge happen under the same lock, so two
    /// concurrent triggers for the same order cannot both apply.
    fn transition(
        &self,
        order_id: &str,
        expected: OrderStatus,
        changes: &OrderChanges,
    ) -> TransitionOutcome;

    /// All orders, newest first
    fn list_all(&self) -> Vec<OrderRecord>;

    /// Look up the order a payment callback belongs to
    fn find_by_payment_request(&self, request_id: &str) -> Option<OrderRecord>;

    /// The most recently created order still awaiting owner approval
    fn latest_pending(&self) -> Option<OrderRecord>;
}

struct Stored {
    record: OrderRecord,
    /// Insertion sequence, breaks `created_at` ties
    seq: u64,
}

/// DashMap-backed store
#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: DashMap<String, Stored>,
    /// payment request ID -> order ID
    payment_index: DashMap<String, String>,
    next_seq: AtomicU64,
}

/// Next `updated_at` stamp. Strictly greater than the previous one even
/// when the wall clock has not ticked between merges.
fn monotonic_stamp(prev: i64) -> i64 {
    now_millis().max(prev + 1)
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn save(&self, record: OrderRecord) {
        let order_id = record.id.clone();
        let request_id = record.payment_request_id.clone();
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        match self.orders.entry(order_id.clone()) {
            Entry::Occupied(mut entry) => entry.get_mut().record = record,
            Entry::Vacant(entry) => {
                entry.insert(Stored { record, seq });
            }
        }
        if let Some(request_id) = request_id {
            self.payment_index.insert(request_id, order_id);
        }
    }

    fn get(&self, order_id: &str) -> Option<OrderRecord> {
        self.orders.get(order_id).map(|entry| entry.record.clone())
    }

    fn update(&self, order_id: &str, changes: &OrderChanges) -> Option<OrderRecord> {
        let updated = {
            let mut entry = self.orders.get_mut(order_id)?;
            entry.record.apply(changes);
            entry.record.updated_at = monotonic_stamp(entry.record.updated_at);
            entry.record.clone()
        };
        if let Some(request_id) = &changes.payment_request_id {
            self.payment_index
                .insert(request_id.clone(), order_id.to_string());
        }
        Some(updated)
    }

    fn transition(
        &self,
        order_id: &str,
        expected: OrderStatus,
        changes: &OrderChanges,
    ) -> TransitionOutcome {
        let updated = match self.orders.get_mut(order_id) {
            None => return TransitionOutcome::NotFound,
            Some(mut entry) => {
                if entry.record.status != expected {
                    return TransitionOutcome::StatusMismatch(entry.record.clone());
                }
                entry.record.apply(changes);
                entry.record.updated_at = monotonic_stamp(entry.record.updated_at);
                entry.record.clone()
            }
        };
        if let Some(request_id) = &changes.payment_request_id {
            self.payment_index
                .insert(request_id.clone(), order_id.to_string());
        }
        TransitionOutcome::Applied(updated)
    }

    fn list_all(&self) -> Vec<OrderRecord> {
        let mut orders: Vec<(i64, u64, OrderRecord)> = self
            .orders
            .iter()
            .map(|entry| (entry.record.created_at, entry.seq, entry.record.clone()))
            .collect();
        orders.sort_by(|a, b| (b.0, b.1).cmp(&(a.0, a.1)));
        orders.into_iter().map(|(_, _, record)| record).collect()
    }

    fn find_by_payment_request(&self, request_id: &str) -> Option<OrderRecord> {
        let order_id = self.payment_index.get(request_id)?.clone();
        self.get(&order_id)
    }

    fn latest_pending(&self) -> Option<OrderRecord> {
        let mut best: Option<(i64, u64, OrderRecord)> = None;
        for entry in self.orders.iter() {
            if entry.record.status != OrderStatus::PendingOwnerApproval {
                continue;
            }
            let key = (entry.record.created_at, entry.seq);
            if best.as_ref().is_none_or(|(c, s, _)| key > (*c, *s)) {
                best = Some((key.0, key.1, entry.record.clone()));
            }
        }
        best.map(|(_, _, record)| record)
    }
}
