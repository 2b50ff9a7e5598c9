//! Park/wake mechanism for workers and the controller.
//!
//! Provides efficient sleep/wake so an idle worker (or a controller
//! waiting on drain/registration) doesn't spin-burn a core. Wake sources
//! call `wake_one()`; the parked side calls `park()`.
//!
//! Unlike a one-shot OS condition signal, a wake that arrives before the
//! corresponding `park()` call is never lost: each implementation
//! represents "a wake happened" as persistent state (a counter or a
//! flag), consumed by the next `park()`.

use std::time::Duration;

/// Park/wake primitive owned by exactly one thread (a worker or the
/// controller) and woken by others.
pub trait WorkerParking: Send + Sync {
    /// Park the current thread until woken or `timeout` elapses.
    ///
    /// Returns `true` if woken by a pending or delivered wake, `false` on
    /// timeout. Callers should re-check their predicate after return
    /// regardless of the result — a `false` does not imply the predicate
    /// is still unmet, and a `true` does not guarantee it is met.
    fn park(&self, timeout: Option<Duration>) -> bool;

    /// Wake the parked thread, or leave a pending wake for its next
    /// `park()` call if it isn't currently parked.
    fn wake_one(&self);
}

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        mod futex_linux;
        pub use futex_linux::FutexParking as PlatformParking;
    } else {
        mod fallback;
        pub use fallback::CondvarParking as PlatformParking;
    }
}

/// Construct a new platform-appropriate parker.
pub fn new_parking() -> PlatformParking {
    PlatformParking::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_park_timeout() {
        let parking = new_parking();
        let start = std::time::Instant::now();
        let result = parking.park(Some(Duration::from_millis(30)));
        let elapsed = start.elapsed();
        assert!(!result);
        assert!(elapsed >= Duration::from_millis(25));
    }

    #[test]
    fn test_wake_before_park_is_not_lost() {
        let parking = new_parking();
        parking.wake_one();
        // The pending wake from before `park()` must still be observed.
        assert!(parking.park(Some(Duration::from_millis(100))));
    }

    #[test]
    fn test_wake_wakes_parked_thread() {
        let parking = Arc::new(new_parking());
        let parking2 = Arc::clone(&parking);

        let handle = thread::spawn(move || parking2.park(Some(Duration::from_secs(5))));

        thread::sleep(Duration::from_millis(50));
        parking.wake_one();

        assert!(handle.join().unwrap());
    }
}
