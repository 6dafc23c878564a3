//! Batch completion barriers.

use std::collections::HashMap;
use std::fmt;

use crate::error::LoadError;
use crate::request::AssetKind;

/// Identifier of an async batch, minted by [`BarrierSet::insert`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BatchId(u64);

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "batch#{}", self.0)
    }
}

/// Outcome of one item of a batch. Carries the pool name rather than a
/// handle: handles are typed per pooled value, so a mixed-kind report
/// could not hold them uniformly. Re-fetch by name after the callback.
#[derive(Debug)]
pub struct LoadOutcome {
    pub name: String,
    pub kind: AssetKind,
    pub result: Result<(), LoadError>,
}

/// Delivered to a batch callback once every item is accounted for, in
/// completion order.
#[derive(Debug)]
pub struct BatchReport {
    pub items: Vec<LoadOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed() == 0
    }
}

type DoneFn = Box<dyn FnOnce(BatchReport)>;

struct Barrier {
    total: usize,
    outcomes: Vec<LoadOutcome>,
    on_all_done: DoneFn,
}

/// Table of outstanding batch barriers, keyed by [`BatchId`].
///
/// Barriers are referenced by id, never by address, so registering new
/// batches while earlier ones are outstanding cannot invalidate anything.
/// Consumer-thread state: every notify runs on the single thread that owns
/// the loader, so the counters need no synchronization.
pub struct BarrierSet {
    pending: HashMap<u64, Barrier>,
    next_id: u64,
}

impl BarrierSet {
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
            next_id: 0,
        }
    }

    /// Register a barrier expecting `total` notifications. A zero-item
    /// batch has nothing to wait for and fires immediately.
    pub fn insert(
        &mut self,
        total: usize,
        on_all_done: impl FnOnce(BatchReport) + 'static,
    ) -> BatchId {
        let id = BatchId(self.next_id);
        self.next_id += 1;

        if total == 0 {
            on_all_done(BatchReport { items: Vec::new() });
            return id;
        }

        self.pending.insert(
            id.0,
            Barrier {
                total,
                outcomes: Vec::with_capacity(total),
                on_all_done: Box::new(on_all_done),
            },
        );
        id
    }

    /// Record one finished item. When the last item lands, the barrier is
    /// removed and its callback fires exactly once, with all outcomes.
    /// Panics if `id` is not outstanding (programmer error: a notify
    /// without a matching insert, or after the barrier already fired).
    pub fn notify(&mut self, id: BatchId, outcome: LoadOutcome) {
        let barrier = self
            .pending
            .get_mut(&id.0)
            .unwrap_or_else(|| panic!("notify for {id}, which is not outstanding"));
        barrier.outcomes.push(outcome);

        if barrier.outcomes.len() == barrier.total {
            let barrier = self.pending.remove(&id.0).expect("barrier was just seen");
            (barrier.on_all_done)(BatchReport {
                items: barrier.outcomes,
            });
        }
    }

    /// Number of batches still waiting for items.
    pub fn outstanding(&self) -> usize {
        self.pending.len()
    }
}

impl Default for BarrierSet {
    fn default() -> Self {
        Self::new()
    }
}
