//! TAP-style demonstration/test harness for the pool library.
//!
//! Runs a fixed set of named scenarios in order, printing
//! `ok N - <name>    time: <us>us` or `not ok N - <name>` per the usual TAP
//! convention, then exits 0 if all scenarios passed, 1 otherwise.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use wpool::{DestroyMode, DispatchPolicy, Pool, PoolConfig};

const WORK_NUM: usize = 50;
const QUEUE_CAPACITY: usize = 4096;

fn heavy_work() {
    let mut acc: u64 = 0;
    for i in 0..20_000u64 {
        for j in 0..2_000u64 {
            acc = acc.wrapping_add(i ^ j);
        }
    }
    std::hint::black_box(acc);
}

fn light_work() {}

fn cpu_count() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
}

enum TestResult {
    Pass,
    Fail,
}

fn test_one_thread() -> TestResult {
    let Ok(mut pool) = Pool::<QUEUE_CAPACITY>::init(1, PoolConfig::default()) else {
        return TestResult::Fail;
    };
    let completed = Arc::new(AtomicUsize::new(0));
    for _ in 0..WORK_NUM {
        let completed = Arc::clone(&completed);
        if pool.submit(move || {
            heavy_work();
            completed.fetch_add(1, Ordering::Relaxed);
        })
        .is_err()
        {
            pool.destroy(DestroyMode::Drop);
            return TestResult::Fail;
        }
    }
    pool.destroy(DestroyMode::Drain);
    if completed.load(Ordering::Relaxed) == WORK_NUM {
        TestResult::Pass
    } else {
        TestResult::Fail
    }
}

fn test_heavy_work() -> TestResult {
    let Ok(mut pool) = Pool::<QUEUE_CAPACITY>::init(cpu_count(), PoolConfig::default()) else {
        return TestResult::Fail;
    };
    let completed = Arc::new(AtomicUsize::new(0));
    for _ in 0..WORK_NUM {
        let completed = Arc::clone(&completed);
        if pool.submit(move || {
            heavy_work();
            completed.fetch_add(1, Ordering::Relaxed);
        })
        .is_err()
        {
            pool.destroy(DestroyMode::Drop);
            return TestResult::Fail;
        }
    }
    pool.destroy(DestroyMode::Drain);
    if completed.load(Ordering::Relaxed) == WORK_NUM {
        TestResult::Pass
    } else {
        TestResult::Fail
    }
}

fn test_light_work() -> TestResult {
    let Ok(mut pool) = Pool::<QUEUE_CAPACITY>::init(cpu_count(), PoolConfig::default()) else {
        return TestResult::Fail;
    };
    let completed = Arc::new(AtomicUsize::new(0));
    for _ in 0..WORK_NUM {
        let completed = Arc::clone(&completed);
        if pool.submit(move || {
            light_work();
            completed.fetch_add(1, Ordering::Relaxed);
        })
        .is_err()
        {
            pool.destroy(DestroyMode::Drop);
            return TestResult::Fail;
        }
    }
    pool.destroy(DestroyMode::Drain);
    if completed.load(Ordering::Relaxed) == WORK_NUM {
        TestResult::Pass
    } else {
        TestResult::Fail
    }
}

/// Drop-mode destroy must never crash or double-invoke an item, even
/// though some submitted items may never run.
fn test_drop_destroy() -> TestResult {
    let Ok(mut pool) = Pool::<QUEUE_CAPACITY>::init(cpu_count(), PoolConfig::default()) else {
        return TestResult::Fail;
    };
    let invocations = Arc::new(AtomicUsize::new(0));
    for _ in 0..WORK_NUM {
        let invocations = Arc::clone(&invocations);
        let _ = pool.submit(move || {
            heavy_work();
            invocations.fetch_add(1, Ordering::Relaxed);
        });
    }
    pool.destroy(DestroyMode::Drop);
    let count = invocations.load(Ordering::Relaxed);
    if count <= WORK_NUM {
        TestResult::Pass
    } else {
        TestResult::Fail
    }
}

fn test_inc_threads() -> TestResult {
    let Ok(mut pool) = Pool::<QUEUE_CAPACITY>::init(5, PoolConfig::default()) else {
        return TestResult::Fail;
    };
    let completed = Arc::new(AtomicUsize::new(0));
    let submit_batch = |pool: &mut Pool<QUEUE_CAPACITY>, completed: &Arc<AtomicUsize>| -> bool {
        for _ in 0..WORK_NUM {
            let completed = Arc::clone(completed);
            if pool.submit(move || {
                light_work();
                completed.fetch_add(1, Ordering::Relaxed);
            })
            .is_err()
            {
                return false;
            }
        }
        true
    };

    if !submit_batch(&mut pool, &completed) {
        pool.destroy(DestroyMode::Drop);
        return TestResult::Fail;
    }
    if pool.inc_threads(5).is_err() {
        pool.destroy(DestroyMode::Drop);
        return TestResult::Fail;
    }
    if pool.num_threads() != 10 {
        pool.destroy(DestroyMode::Drop);
        return TestResult::Fail;
    }
    if !submit_batch(&mut pool, &completed) {
        pool.destroy(DestroyMode::Drop);
        return TestResult::Fail;
    }
    pool.destroy(DestroyMode::Drain);

    if completed.load(Ordering::Relaxed) == WORK_NUM * 2 {
        TestResult::Pass
    } else {
        TestResult::Fail
    }
}

fn test_dec_threads() -> TestResult {
    let Ok(mut pool) = Pool::<QUEUE_CAPACITY>::init(10, PoolConfig::default()) else {
        return TestResult::Fail;
    };
    let completed = Arc::new(AtomicUsize::new(0));
    for _ in 0..WORK_NUM {
        let completed = Arc::clone(&completed);
        let _ = pool.submit(move || {
            light_work();
            completed.fetch_add(1, Ordering::Relaxed);
        });
    }
    if pool.dec_threads(5).is_err() {
        pool.destroy(DestroyMode::Drop);
        return TestResult::Fail;
    }
    if pool.num_threads() != 5 {
        pool.destroy(DestroyMode::Drop);
        return TestResult::Fail;
    }
    for _ in 0..WORK_NUM {
        let completed = Arc::clone(&completed);
        let _ = pool.submit(move || {
            light_work();
            completed.fetch_add(1, Ordering::Relaxed);
        });
    }
    pool.destroy(DestroyMode::Drain);

    // Migration is best-effort on shrink; a handful of items may be
    // logged as lost if a target queue happened to be full, but the
    // overwhelming majority must land.
    let count = completed.load(Ordering::Relaxed);
    if count >= WORK_NUM * 2 - WORK_NUM / 10 {
        TestResult::Pass
    } else {
        TestResult::Fail
    }
}

fn test_least_load() -> TestResult {
    let n = cpu_count();
    let Ok(mut pool) = Pool::<QUEUE_CAPACITY>::init(n, PoolConfig::default().policy(DispatchPolicy::LeastLoad))
    else {
        return TestResult::Fail;
    };
    let completed = Arc::new(AtomicU64::new(0));
    for _ in 0..WORK_NUM {
        let completed = Arc::clone(&completed);
        if pool.submit(move || {
            heavy_work();
            completed.fetch_add(1, Ordering::Relaxed);
        })
        .is_err()
        {
            pool.destroy(DestroyMode::Drop);
            return TestResult::Fail;
        }
    }
    pool.destroy(DestroyMode::Drain);
    if completed.load(Ordering::Relaxed) == WORK_NUM as u64 {
        TestResult::Pass
    } else {
        TestResult::Fail
    }
}

struct Testcase {
    description: &'static str,
    function: fn() -> TestResult,
}

fn main() {
    let testcases: &[Testcase] = &[
        Testcase { description: "one thread in thread pool", function: test_one_thread },
        Testcase { description: "heavy work", function: test_heavy_work },
        Testcase { description: "light work", function: test_light_work },
        Testcase { description: "drop remaining works and exit directly", function: test_drop_destroy },
        Testcase { description: "increase thread num", function: test_inc_threads },
        Testcase { description: "decrease thread num", function: test_dec_threads },
        Testcase { description: "set least load algorithm", function: test_least_load },
    ];

    let mut exitcode = 0;
    for (i, tc) in testcases.iter().enumerate() {
        let start = Instant::now();
        let result = (tc.function)();
        let elapsed = start.elapsed();
        match result {
            TestResult::Pass => {
                println!("ok {} - {}    time: {}us", i + 1, tc.description, elapsed.as_micros());
            }
            TestResult::Fail => {
                println!("not ok {} - {}", i + 1, tc.description);
                exitcode = 1;
            }
        }
    }
    std::process::exit(exitcode);
}
