//! Linux futex-based parking.
//!
//! The futex word is a count of pending wakes: `wake_one` increments and
//! wakes, `park` consumes a pending wake if any, otherwise sleeps.

use super::WorkerParking;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

pub struct FutexParking {
    futex: AtomicU32,
}

impl FutexParking {
    pub fn new() -> Self {
        Self {
            futex: AtomicU32::new(0),
        }
    }

    fn try_consume(&self) -> bool {
        loop {
            let current = self.futex.load(Ordering::Acquire);
            if current == 0 {
                return false;
            }
            if self
                .futex
                .compare_exchange_weak(current, current - 1, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return true;
            }
        }
    }
}

impl Default for FutexParking {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerParking for FutexParking {
    fn park(&self, timeout: Option<Duration>) -> bool {
        if self.try_consume() {
            return true;
        }

        let timespec = timeout.map(|d| libc::timespec {
            tv_sec: d.as_secs() as i64,
            tv_nsec: d.subsec_nanos() as i64,
        });
        let timespec_ptr = timespec
            .as_ref()
            .map_or(std::ptr::null(), |ts| ts as *const libc::timespec);

        let result = unsafe {
            libc::syscall(
                libc::SYS_futex,
                self.futex.as_ptr(),
                libc::FUTEX_WAIT | libc::FUTEX_PRIVATE_FLAG,
                0u32,
                timespec_ptr,
                std::ptr::null::<u32>(),
                0u32,
            )
        };

        if result != 0 {
            // EAGAIN (futex word changed before we waited) or EINTR: the
            // wake may already be pending, try to consume it.
            return self.try_consume();
        }

        self.try_consume()
    }

    fn wake_one(&self) {
        self.futex.fetch_add(1, Ordering::Release);
        unsafe {
            libc::syscall(
                libc::SYS_futex,
                self.futex.as_ptr(),
                libc::FUTEX_WAKE | libc::FUTEX_PRIVATE_FLAG,
                1i32,
                std::ptr::null::<libc::timespec>(),
                std::ptr::null::<u32>(),
                0u32,
            );
        }
    }
}

// Safety: FutexParking only contains an atomic.
unsafe impl Send for FutexParking {}
unsafe impl Sync for FutexParking {}
