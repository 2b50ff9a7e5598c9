//! The per-worker bounded ring queue — the concurrency engine's core.
//!
//! One [`WorkQueue`] exists per worker. In the steady state it behaves as
//! a single-producer/single-consumer ring buffer: the controller writes
//! `head`, the owning worker writes `tail`. During migration (grow-path
//! rebalance) a second consumer — the controller itself — may claim items
//! concurrently with the owning worker, which is the one place this
//! queue behaves as SPMC.

use crate::work_item::Job;
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicU32, Ordering};

/// A bounded, power-of-two-capacity ring queue of [`Job`]s.
///
/// `Q` must be a power of two; [`WorkQueue::new`] asserts this.
pub struct WorkQueue<const Q: usize> {
    slots: Box<[UnsafeCell<MaybeUninit<Job>>]>,
    /// Slot index the controller will write next. Single-writer
    /// (the controller); published with `Release` so a consumer's
    /// `Acquire` load observes a fully initialized slot.
    head: AtomicU32,
    /// Slot index the next claimed item will be read from. Every claim —
    /// by the owning worker or, during migration, by the controller — is
    /// arbitrated by a compare-and-swap on this counter.
    ///
    /// A plain-old-data work item could let the owning worker advance
    /// `tail` with an ordinary store, reserving the CAS for the rare
    /// migration path, since reading one twice under a race would be
    /// merely stale, not unsound. `Job` is a `Box`, an owning pointer —
    /// reading it twice would double-free. So here, *every* claim
    /// (steady-state dequeue included) goes through the same CAS; the
    /// owner's claim almost never contends in practice, so the cost is
    /// indistinguishable from a plain store.
    tail: AtomicU32,
}

enum Claim {
    Claimed(Job),
    Empty,
    Contended,
}

impl<const Q: usize> WorkQueue<Q> {
    const MASK: usize = Q - 1;

    /// Create an empty queue of capacity `Q`.
    ///
    /// # Panics
    ///
    /// Panics if `Q` is zero or not a power of two.
    pub fn new() -> Self {
        assert!(Q > 0 && Q.is_power_of_two(), "queue capacity must be a power of two");
        let mut slots = Vec::with_capacity(Q);
        for _ in 0..Q {
            slots.push(UnsafeCell::new(MaybeUninit::uninit()));
        }
        Self {
            slots: slots.into_boxed_slice(),
            head: AtomicU32::new(0),
            tail: AtomicU32::new(0),
        }
    }

    /// Number of items currently queued (approximate if a concurrent
    /// claim is in flight, exact otherwise).
    #[inline]
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        head.wrapping_sub(tail) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() >= Q
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        Q
    }

    /// Append `job`, returning it back on failure if the queue is full.
    ///
    /// Single-producer: only ever called by the controller thread.
    pub fn enqueue(&self, job: Job) -> Result<(), Job> {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        if head.wrapping_sub(tail) as usize >= Q {
            return Err(job);
        }
        let idx = (head as usize) & Self::MASK;
        unsafe {
            (*self.slots[idx].get()).write(job);
        }
        self.head.store(head.wrapping_add(1), Ordering::Release);
        Ok(())
    }

    fn claim_one(&self) -> Claim {
        let tail = self.tail.load(Ordering::Acquire);
        let head = self.head.load(Ordering::Acquire);
        if head.wrapping_sub(tail) == 0 {
            return Claim::Empty;
        }
        match self.tail.compare_exchange(
            tail,
            tail.wrapping_add(1),
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => {
                let idx = (tail as usize) & Self::MASK;
                let job = unsafe { (*self.slots[idx].get()).assume_init_read() };
                Claim::Claimed(job)
            }
            Err(_) => Claim::Contended,
        }
    }

    /// Steady-state dequeue: one claim attempt.
    ///
    /// A `None` result means either the queue was empty, or a concurrent
    /// migrator won the race for the head item — indistinguishable from
    /// the caller's point of view, and harmless: the worker's loop simply
    /// re-checks its predicate on the next iteration.
    pub fn dequeue(&self) -> Option<Job> {
        match self.claim_one() {
            Claim::Claimed(job) => Some(job),
            Claim::Empty | Claim::Contended => None,
        }
    }

    /// Migration-only dequeue: retries the CAS until an item is claimed
    /// or the queue is observed empty. May be called from a thread other
    /// than the owning worker.
    pub fn concurrent_dequeue(&self) -> Option<Job> {
        loop {
            match self.claim_one() {
                Claim::Claimed(job) => return Some(job),
                Claim::Empty => return None,
                Claim::Contended => continue,
            }
        }
    }
}

impl<const Q: usize> Default for WorkQueue<Q> {
    fn default() -> Self {
        Self::new()
    }
}

// Safety: access to `slots` is arbitrated entirely through `head`/`tail`;
// no two threads ever read or write the same slot without first winning
// the corresponding atomic handoff.
unsafe impl<const Q: usize> Send for WorkQueue<Q> {}
unsafe impl<const Q: usize> Sync for WorkQueue<Q> {}

impl<const Q: usize> Drop for WorkQueue<Q> {
    fn drop(&mut self) {
        // Drain and drop any items abandoned by a `destroy(Drop)` shutdown
        // so their resources are released instead of leaked.
        while self.concurrent_dequeue().is_some() {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[test]
    fn test_enqueue_dequeue_fifo() {
        let q: WorkQueue<8> = WorkQueue::new();
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        for i in 0..5 {
            let order = order.clone();
            q.enqueue(Box::new(move || order.lock().unwrap().push(i)))
                .unwrap();
        }
        assert_eq!(q.len(), 5);
        for _ in 0..5 {
            let job = q.dequeue().unwrap();
            job();
        }
        assert!(q.is_empty());
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_full_rejects() {
        let q: WorkQueue<2> = WorkQueue::new();
        q.enqueue(Box::new(|| {})).unwrap();
        q.enqueue(Box::new(|| {})).unwrap();
        assert!(q.is_full());
        assert!(q.enqueue(Box::new(|| {})).is_err());
    }

    #[test]
    fn test_wraparound() {
        let q: WorkQueue<4> = WorkQueue::new();
        let count = Arc::new(AtomicUsize::new(0));
        for _ in 0..100 {
            let count = count.clone();
            q.enqueue(Box::new(move || {
                count.fetch_add(1, Ordering::Relaxed);
            }))
            .unwrap();
            q.dequeue().unwrap()();
        }
        assert_eq!(count.load(Ordering::Relaxed), 100);
    }

    #[test]
    fn test_concurrent_dequeue_exactly_once() {
        let q: Arc<WorkQueue<256>> = Arc::new(WorkQueue::new());
        let executed = Arc::new(AtomicUsize::new(0));
        for _ in 0..200 {
            let executed = executed.clone();
            q.enqueue(Box::new(move || {
                executed.fetch_add(1, Ordering::Relaxed);
            }))
            .unwrap();
        }

        let claimed = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::new();
        for _ in 0..4 {
            let q = q.clone();
            let claimed = claimed.clone();
            handles.push(std::thread::spawn(move || {
                while let Some(job) = q.concurrent_dequeue() {
                    job();
                    claimed.fetch_add(1, Ordering::Relaxed);
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(claimed.load(Ordering::Relaxed), 200);
        assert_eq!(executed.load(Ordering::Relaxed), 200);
        assert!(q.is_empty());
    }

    #[test]
    fn test_drop_releases_abandoned_jobs() {
        let dropped = Arc::new(AtomicUsize::new(0));
        {
            let q: WorkQueue<8> = WorkQueue::new();
            for _ in 0..3 {
                let dropped = dropped.clone();
                struct MarkOnDrop(Arc<AtomicUsize>);
                impl Drop for MarkOnDrop {
                    fn drop(&mut self) {
                        self.0.fetch_add(1, Ordering::Relaxed);
                    }
                }
                let marker = MarkOnDrop(dropped);
                q.enqueue(Box::new(move || {
                    let _ = &marker;
                }))
                .unwrap();
            }
        }
        assert_eq!(dropped.load(Ordering::Relaxed), 3);
    }
}
