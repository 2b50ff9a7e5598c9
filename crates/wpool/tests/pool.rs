//! End-to-end integration tests exercising the public `Pool` API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wpool::{DestroyMode, DispatchPolicy, Pool, PoolConfig, PoolError};

const Q: usize = 256;

fn light() {}

#[test]
fn init_rejects_zero_threads() {
    let result = Pool::<Q>::init(0, PoolConfig::default());
    assert_eq!(result.unwrap_err(), PoolError::InvalidArgument);
}

#[test]
fn submit_runs_every_item_exactly_once() {
    let mut pool = Pool::<Q>::init(4, PoolConfig::default()).unwrap();
    let counts = Arc::new(AtomicUsize::new(0));
    for _ in 0..200 {
        let counts = Arc::clone(&counts);
        pool.submit(move || {
            counts.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
    }
    pool.destroy(DestroyMode::Drain);
    assert_eq!(counts.load(Ordering::Relaxed), 200);
}

#[test]
fn drop_destroy_never_double_invokes() {
    let mut pool = Pool::<Q>::init(4, PoolConfig::default()).unwrap();
    let invocations = Arc::new(AtomicUsize::new(0));
    for _ in 0..500 {
        let invocations = Arc::clone(&invocations);
        let _ = pool.submit(move || {
            invocations.fetch_add(1, Ordering::Relaxed);
        });
    }
    pool.destroy(DestroyMode::Drop);
    assert!(invocations.load(Ordering::Relaxed) <= 500);
}

#[test]
fn dropping_pool_without_explicit_destroy_does_not_leak_threads() {
    let mut pool = Pool::<Q>::init(4, PoolConfig::default()).unwrap();
    pool.submit(light).unwrap();
    drop(pool);
    // If the Drop impl failed to join workers, the process would hang on
    // exit; reaching this point is the assertion.
}

#[test]
fn grow_redistributes_queued_work() {
    let mut pool = Pool::<Q>::init(2, PoolConfig::default()).unwrap();
    let completed = Arc::new(AtomicUsize::new(0));
    for _ in 0..100 {
        let completed = Arc::clone(&completed);
        pool.submit(move || {
            completed.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
    }
    pool.inc_threads(3).unwrap();
    assert_eq!(pool.num_threads(), 5);
    for _ in 0..100 {
        let completed = Arc::clone(&completed);
        pool.submit(move || {
            completed.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
    }
    pool.destroy(DestroyMode::Drain);
    assert_eq!(completed.load(Ordering::Relaxed), 200);
}

#[test]
fn shrink_refuses_to_remove_last_worker() {
    let mut pool = Pool::<Q>::init(1, PoolConfig::default()).unwrap();
    assert_eq!(pool.dec_threads(1).unwrap_err(), PoolError::InvalidArgument);
    assert_eq!(pool.num_threads(), 1);
    pool.destroy(DestroyMode::Drain);
}

#[test]
fn shrink_migrates_most_residual_work() {
    let mut pool = Pool::<Q>::init(6, PoolConfig::default()).unwrap();
    let completed = Arc::new(AtomicUsize::new(0));
    for _ in 0..150 {
        let completed = Arc::clone(&completed);
        let _ = pool.submit(move || {
            completed.fetch_add(1, Ordering::Relaxed);
        });
    }
    pool.dec_threads(3).unwrap();
    assert_eq!(pool.num_threads(), 3);
    pool.destroy(DestroyMode::Drain);
    assert!(completed.load(Ordering::Relaxed) >= 140);
}

#[test]
fn least_load_policy_completes_all_work() {
    let mut pool =
        Pool::<Q>::init(4, PoolConfig::default().policy(DispatchPolicy::LeastLoad)).unwrap();
    assert_eq!(pool.policy(), DispatchPolicy::LeastLoad);
    let completed = Arc::new(AtomicUsize::new(0));
    for _ in 0..120 {
        let completed = Arc::clone(&completed);
        pool.submit(move || {
            completed.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
    }
    pool.destroy(DestroyMode::Drain);
    assert_eq!(completed.load(Ordering::Relaxed), 120);
}

#[test]
fn set_policy_affects_next_submit_only() {
    let mut pool = Pool::<Q>::init(3, PoolConfig::default()).unwrap();
    assert_eq!(pool.policy(), DispatchPolicy::RoundRobin);
    pool.set_policy(DispatchPolicy::LeastLoad);
    assert_eq!(pool.policy(), DispatchPolicy::LeastLoad);
    pool.destroy(DestroyMode::Drain);
}

#[test]
fn full_queue_rejects_submission() {
    // A single-worker pool with a tiny queue and no consumer progress
    // (heavy first item) should eventually reject a submission.
    let mut pool = Pool::<4>::init(1, PoolConfig::default()).unwrap();
    pool.submit(|| std::thread::sleep(std::time::Duration::from_millis(200)))
        .unwrap();
    let mut saw_rejection = false;
    for _ in 0..16 {
        if pool.submit(light).is_err() {
            saw_rejection = true;
            break;
        }
    }
    pool.destroy(DestroyMode::Drain);
    assert!(saw_rejection);
}
