//! Worker → consumer completion handoff.

use std::mem;

use parking_lot::Mutex;

use crate::barrier::BatchId;
use crate::error::DecodeError;
use crate::request::{AssetKind, DecodedAsset};

/// One finished (or failed) decode travelling from a worker to the
/// consumer thread. Owned exclusively by whichever side currently holds
/// it: the producing worker until `submit` returns, the drain loop
/// afterwards.
#[derive(Debug)]
pub struct Completion {
    pub batch: BatchId,
    pub name: String,
    pub kind: AssetKind,
    pub payload: Result<DecodedAsset, DecodeError>,
}

/// Thread-safe FIFO handoff point between decode workers and the single
/// consumer thread.
///
/// The lock covers only the enqueue in [`submit`](Self::submit) and the
/// detach-swap in [`drain`](Self::drain). Installing drained records
/// (GPU construction included) happens outside it, so an expensive
/// install can never stall a producer.
pub struct CompletionQueue {
    records: Mutex<Vec<Completion>>,
}

impl CompletionQueue {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Append a record. Callable from any thread; returns immediately
    /// without running anything.
    pub fn submit(&self, record: Completion) {
        self.records.lock().push(record);
        log::trace!("completion submitted");
    }

    /// Detach and return everything queued so far, in submission order.
    /// Consumer thread only. Each record is yielded exactly once; an empty
    /// queue yields an empty vec and touches nothing else.
    pub fn drain(&self) -> Vec<Completion> {
        mem::take(&mut *self.records.lock())
    }

    /// Records currently waiting. Snapshot only; other threads may be
    /// submitting concurrently.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CompletionQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::barrier::BarrierSet;

    fn record(name: &str, batch: BatchId) -> Completion {
        Completion {
            batch,
            name: name.to_string(),
            kind: AssetKind::Shader,
            payload: Err(DecodeError::Malformed("test record".into())),
        }
    }

    fn some_batch() -> BatchId {
        // Ids come only from a BarrierSet; mint a throwaway one.
        BarrierSet::new().insert(0, |_| {})
    }

    #[test]
    fn drain_preserves_submission_order() {
        let queue = CompletionQueue::new();
        let batch = some_batch();
        queue.submit(record("first", batch));
        queue.submit(record("second", batch));

        let drained = queue.drain();
        let names: Vec<&str> = drained.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn drain_yields_each_record_once() {
        let queue = CompletionQueue::new();
        queue.submit(record("only", some_batch()));
        assert_eq!(queue.drain().len(), 1);
        assert!(queue.drain().is_empty());
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn drain_on_empty_queue_is_a_noop() {
        let queue = CompletionQueue::new();
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn submissions_cross_threads() {
        let queue = Arc::new(CompletionQueue::new());
        let batch = some_batch();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || queue.submit(record(&format!("worker-{i}"), batch)))
            })
            .collect();
        for handle in handles {
            handle.join().expect("submitter panicked");
        }

        let drained = queue.drain();
        assert_eq!(drained.len(), 4);
    }
}
