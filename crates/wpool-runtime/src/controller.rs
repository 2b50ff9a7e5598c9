//! The pool controller: creates/joins workers, resizes, migrates queued
//! work, and coordinates drain/drop shutdown.

use crate::config::PoolConfig;
use crate::dispatch::{least_load_index, DispatchPolicy, RoundRobinCursor};
use crate::parking::{new_parking, WorkerParking};
use crate::worker::WorkerHandle;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wpool_core::error::{PoolError, PoolResult};
use wpool_core::work_item::Job;
use wpool_core::{wdebug, winfo, wwarn};

/// How [`Pool::destroy`] handles work still queued at shutdown time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyMode {
    /// Wait for every worker queue to empty before shutting down.
    Drain,
    /// Shut down immediately; abandon queued-but-unstarted items.
    Drop,
}

/// A fixed-capacity worker thread pool with `Q`-slot per-worker queues.
///
/// `Pool` is a strongly typed handle, driven by a single controller
/// thread: `submit`, `inc_threads`, `dec_threads`, `set_policy`, and
/// `destroy` all take `&mut self`, so Rust's borrow checker enforces
/// exclusive access at compile time — no two of these calls can race
/// against each other.
pub struct Pool<const Q: usize> {
    workers: Vec<WorkerHandle<Q>>,
    policy: DispatchPolicy,
    cursor: RoundRobinCursor,
    controller_parker: Arc<dyn WorkerParking>,
    config: PoolConfig,
    destroyed: bool,
}

impl<const Q: usize> Pool<Q> {
    /// Spawn `n` workers and block until every one has registered.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `n == 0`. `ResourceExhausted` if the OS
    /// refuses to create a worker thread (already-spawned workers are
    /// shut down and joined before returning the error).
    pub fn init(n: usize, config: PoolConfig) -> PoolResult<Self> {
        if n == 0 {
            return Err(PoolError::InvalidArgument);
        }

        let controller_parker: Arc<dyn WorkerParking> = Arc::new(new_parking());
        let mut pool = Self {
            workers: Vec::with_capacity(n),
            policy: config.policy,
            cursor: RoundRobinCursor::default(),
            controller_parker,
            config,
            destroyed: false,
        };

        if let Err(e) = pool.spawn_workers(n) {
            // Any workers spawned before the failing one are still alive
            // and parked; shut them down and join them rather than
            // leaking them.
            pool.destroy(DestroyMode::Drop);
            return Err(e);
        }
        winfo!("pool initialized with {} workers", n);
        Ok(pool)
    }

    fn spawn_workers(&mut self, count: usize) -> PoolResult<()> {
        let base_id = self.workers.len();
        let registered = Arc::new(AtomicUsize::new(0));
        let target = count;

        for i in 0..count {
            let id = base_id + i;
            let name = format!("{}-{}", self.config.thread_name_prefix, id);
            match WorkerHandle::<Q>::spawn(
                id,
                self.config.idle_spins,
                self.config.park_timeout,
                name,
                Arc::clone(&self.controller_parker),
                Arc::clone(&registered),
            ) {
                Ok(handle) => self.workers.push(handle),
                Err(_) => return Err(PoolError::ResourceExhausted),
            }
        }

        while registered.load(Ordering::Acquire) < target {
            self.controller_parker.park(Some(Duration::from_millis(50)));
        }
        Ok(())
    }

    #[inline]
    pub fn num_threads(&self) -> usize {
        self.workers.len()
    }

    #[inline]
    pub fn policy(&self) -> DispatchPolicy {
        self.policy
    }

    /// Current queue length of each worker, in worker order. Intended for
    /// diagnostics and tests; each value is a momentary snapshot.
    pub fn queue_lengths(&self) -> Vec<usize> {
        self.workers.iter().map(|w| w.worker.queue_len()).collect()
    }

    /// Completed-item count of each worker, in worker order.
    pub fn completed_counts(&self) -> Vec<u64> {
        self.workers.iter().map(|w| w.worker.completed_count()).collect()
    }

    /// Change the dispatch policy. Takes effect on the very next
    /// `submit`.
    pub fn set_policy(&mut self, policy: DispatchPolicy) {
        self.policy = policy;
    }

    fn select_worker(&mut self) -> usize {
        match self.policy {
            DispatchPolicy::RoundRobin => self.cursor.next(self.workers.len()),
            DispatchPolicy::LeastLoad => {
                let refs: Vec<Arc<crate::worker::Worker<Q>>> =
                    self.workers.iter().map(|w| Arc::clone(&w.worker)).collect();
                least_load_index(&refs)
            }
        }
    }

    /// Enqueue `job` onto the worker the active policy selects.
    ///
    /// Does not retry on another worker if the chosen queue is full —
    /// the policy is authoritative for this submission.
    pub fn submit<F>(&mut self, job: F) -> PoolResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let idx = self.select_worker();
        let worker = &self.workers[idx].worker;
        match worker.queue().enqueue(Box::new(job) as Job) {
            Ok(()) => {
                worker.wake();
                Ok(())
            }
            Err(_) => Err(PoolError::SubmitRejected),
        }
    }

    /// Spawn `k` new workers, wait for registration, then rebalance
    /// queued work across the resulting `num_threads() + k` workers.
    pub fn inc_threads(&mut self, k: usize) -> PoolResult<()> {
        if k == 0 {
            return Err(PoolError::InvalidArgument);
        }
        self.spawn_workers(k)?;
        self.rebalance();
        winfo!("pool grown to {} workers", self.workers.len());
        Ok(())
    }

    /// Rebalance (grow path): move items from over-full queues toward
    /// under-full ones via `concurrent_dequeue`, since the source
    /// worker may still be consuming concurrently.
    fn rebalance(&mut self) {
        let n = self.workers.len();
        if n == 0 {
            return;
        }
        let lengths: Vec<i64> = self.workers.iter().map(|w| w.worker.queue_len() as i64).collect();
        let sum: i64 = lengths.iter().sum();
        if sum == 0 {
            return;
        }
        let avg = sum / n as i64;
        let mut deltas: Vec<i64> = lengths.iter().map(|&l| l - avg).collect();

        loop {
            let short = deltas.iter().position(|&d| d < 0);
            let long = deltas.iter().position(|&d| d > 0);
            let (Some(i), Some(j)) = (short, long) else {
                break;
            };
            let want = (-deltas[i]).min(deltas[j]);
            let mut moved = 0i64;
            for _ in 0..want {
                if self.workers[i].worker.queue_len() >= self.workers[i].worker.queue().capacity() {
                    wwarn!("rebalance: target queue {} full, skipping remaining transfers", i);
                    break;
                }
                match self.workers[j].worker.queue().concurrent_dequeue() {
                    Some(job) => match self.workers[i].worker.queue().enqueue(job) {
                        Ok(()) => {
                            self.workers[i].worker.wake();
                            moved += 1;
                        }
                        Err(job) => {
                            // Target filled between the check above and the
                            // enqueue; put the item back on its source queue
                            // rather than destroying it.
                            if self.workers[j].worker.queue().enqueue(job).is_err() {
                                wwarn!(
                                    "rebalance: lost a work item, both source queue {} and target queue {} were full",
                                    j, i
                                );
                            } else {
                                wwarn!("rebalance: target queue {} full, dropping a transfer", i);
                            }
                            break;
                        }
                    },
                    None => break,
                }
            }
            deltas[i] += moved;
            deltas[j] -= moved;
            if moved == 0 {
                break;
            }
        }

        // Approximate second pass: drain the single largest remaining
        // surplus queue evenly across workers still below average. This
        // is a best-effort fairness pass, not an exact invariant.
        if let Some((surplus_idx, _)) = deltas
            .iter()
            .enumerate()
            .max_by_key(|(_, &d)| d)
            .filter(|(_, &d)| d > 0)
        {
            let under: Vec<usize> = deltas
                .iter()
                .enumerate()
                .filter(|(i, &d)| *i != surplus_idx && d < 0)
                .map(|(i, _)| i)
                .collect();
            let mut target_cycle = under.iter().cycle();
            while deltas[surplus_idx] > 0 {
                let Some(&target) = target_cycle.next() else {
                    break;
                };
                if self.workers[target].worker.queue_len() >= self.workers[target].worker.queue().capacity() {
                    wwarn!("rebalance: target queue {} full, skipping remaining transfers", target);
                    break;
                }
                match self.workers[surplus_idx].worker.queue().concurrent_dequeue() {
                    Some(job) => match self.workers[target].worker.queue().enqueue(job) {
                        Ok(()) => {
                            self.workers[target].worker.wake();
                            deltas[surplus_idx] -= 1;
                        }
                        Err(job) => {
                            if self.workers[surplus_idx].worker.queue().enqueue(job).is_err() {
                                wwarn!(
                                    "rebalance: lost a work item, both source queue {} and target queue {} were full",
                                    surplus_idx, target
                                );
                            } else {
                                wwarn!("rebalance: target queue {} full, dropping a transfer", target);
                            }
                            break;
                        }
                    },
                    None => break,
                }
            }
        }
    }

    /// Shut down and join the last `k` workers, then migrate any
    /// residual queued items onto the survivors.
    ///
    /// Refuses to remove the last worker, returning `InvalidArgument` —
    /// a pool with zero workers but a live `submit` entry point is a
    /// degenerate state with no sensible behavior to fall back to.
    pub fn dec_threads(&mut self, k: usize) -> PoolResult<()> {
        if k == 0 {
            return Err(PoolError::InvalidArgument);
        }
        let k = k.min(self.workers.len().saturating_sub(1));
        if k == 0 {
            return Err(PoolError::InvalidArgument);
        }

        let mut retired = Vec::with_capacity(k);
        for _ in 0..k {
            let handle = self.workers.pop().expect("checked k against len above");
            handle.worker.request_shutdown();
            handle.worker.wake();
            retired.push(handle);
        }
        for handle in retired.drain(..) {
            let worker = Arc::clone(&handle.worker);
            handle.join();
            // Past this point the worker thread is gone; the queue has
            // exactly one reader left (us), so a plain scan is safe.
            let mut lost = 0usize;
            while let Some(job) = worker.queue().concurrent_dequeue() {
                if self.dispatch_migrated(job).is_err() {
                    lost += 1;
                }
            }
            if lost > 0 {
                wwarn!("dec_threads: {} item(s) lost, no surviving queue had room", lost);
            }
        }
        winfo!("pool shrunk to {} workers", self.workers.len());
        Ok(())
    }

    fn dispatch_migrated(&mut self, job: Job) -> Result<(), Job> {
        let idx = self.select_worker();
        let worker = &self.workers[idx].worker;
        match worker.queue().enqueue(job) {
            Ok(()) => {
                worker.wake();
                Ok(())
            }
            Err(job) => Err(job),
        }
    }

    fn all_queues_empty(&self) -> bool {
        self.workers.iter().all(|w| w.worker.queue_len() == 0)
    }

    /// Shut down the pool. In `Drain` mode, blocks until every worker
    /// queue is empty before signaling shutdown; in `Drop` mode,
    /// shuts down immediately, abandoning queued-but-unstarted items.
    pub fn destroy(&mut self, mode: DestroyMode) {
        if self.destroyed {
            return;
        }
        if mode == DestroyMode::Drain {
            wdebug!("destroy(drain): waiting for all queues to empty");
            while !self.all_queues_empty() {
                self.controller_parker.park(Some(Duration::from_millis(50)));
            }
        }

        for handle in &self.workers {
            handle.worker.request_shutdown();
            handle.worker.wake();
        }
        for handle in self.workers.drain(..) {
            handle.join();
        }
        self.destroyed = true;
    }
}

impl<const Q: usize> Drop for Pool<Q> {
    fn drop(&mut self) {
        // A safety net for callers who never call `destroy` explicitly:
        // never leak worker threads. Mirrors `Drop` mode since blocking
        // a destructor on unrelated work finishing would be surprising.
        self.destroy(DestroyMode::Drop);
    }
}
