//! Long-lived worker threads.

use crate::parking::{new_parking, WorkerParking};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use wpool_core::queue::WorkQueue;
use wpool_core::{wdebug, werror};

/// Shared state for one worker: its queue, shutdown flag, parker, and a
/// completed-item counter. Held behind an `Arc` so both the controller
/// and the worker's own thread can reach it.
pub struct Worker<const Q: usize> {
    pub id: usize,
    queue: WorkQueue<Q>,
    shutdown: AtomicBool,
    parker: Box<dyn WorkerParking>,
    completed: AtomicU64,
}

impl<const Q: usize> Worker<Q> {
    fn new(id: usize) -> Arc<Self> {
        Arc::new(Self {
            id,
            queue: WorkQueue::new(),
            shutdown: AtomicBool::new(false),
            parker: Box::new(new_parking()),
            completed: AtomicU64::new(0),
        })
    }

    #[inline]
    pub fn queue(&self) -> &WorkQueue<Q> {
        &self.queue
    }

    #[inline]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    #[inline]
    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    #[inline]
    pub fn wake(&self) {
        self.parker.wake_one();
    }

    #[inline]
    pub fn completed_count(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }
}

/// A spawned worker: its shared state plus the OS thread handle.
pub struct WorkerHandle<const Q: usize> {
    pub worker: Arc<Worker<Q>>,
    handle: Option<JoinHandle<()>>,
}

impl<const Q: usize> WorkerHandle<Q> {
    /// Spawn worker `id`, running its dequeue/execute loop until shutdown.
    /// The worker registers with `registered`/`controller_parker` as soon
    /// as its thread starts.
    pub fn spawn(
        id: usize,
        idle_spins: u32,
        park_timeout: Duration,
        thread_name: String,
        controller_parker: Arc<dyn WorkerParking>,
        registered: Arc<std::sync::atomic::AtomicUsize>,
    ) -> std::io::Result<Self> {
        let worker = Worker::<Q>::new(id);
        let loop_worker = Arc::clone(&worker);

        let handle = std::thread::Builder::new()
            .name(thread_name)
            .spawn(move || {
                registered.fetch_add(1, Ordering::Release);
                controller_parker.wake_one();
                worker_loop(&loop_worker, idle_spins, park_timeout, &*controller_parker);
            })?;

        Ok(Self {
            worker,
            handle: Some(handle),
        })
    }

    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                werror!("worker thread panicked during join");
            }
        }
    }
}

fn worker_loop<const Q: usize>(
    worker: &Arc<Worker<Q>>,
    idle_spins: u32,
    park_timeout: Duration,
    controller_parker: &dyn WorkerParking,
) {
    loop {
        if let Some(job) = worker.queue.dequeue() {
            if catch_unwind(AssertUnwindSafe(job)).is_err() {
                werror!("work item panicked on worker {}", worker.id);
            }
            worker.completed.fetch_add(1, Ordering::Relaxed);
            if worker.queue.is_empty() {
                controller_parker.wake_one();
            }
            continue;
        }

        if worker.is_shutdown() {
            wdebug!("worker {} exiting", worker.id);
            return;
        }

        let mut spun = 0u32;
        while spun < idle_spins && worker.queue.is_empty() && !worker.is_shutdown() {
            std::hint::spin_loop();
            spun += 1;
        }

        if worker.is_shutdown() {
            return;
        }
        if worker.queue.is_empty() {
            worker.parker.park(Some(park_timeout));
        }
    }
}
