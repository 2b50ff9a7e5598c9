//! Condvar-based parking fallback for non-Linux targets.

use super::WorkerParking;
use std::sync::{Condvar, Mutex};
use std::time::Duration;

pub struct CondvarParking {
    pending: Mutex<bool>,
    condvar: Condvar,
}

impl CondvarParking {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(false),
            condvar: Condvar::new(),
        }
    }
}

impl Default for CondvarParking {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerParking for CondvarParking {
    fn park(&self, timeout: Option<Duration>) -> bool {
        let mut guard = self.pending.lock().unwrap();
        if *guard {
            *guard = false;
            return true;
        }

        let woken = match timeout {
            Some(t) => {
                let (g, result) = self.condvar.wait_timeout(guard, t).unwrap();
                guard = g;
                !result.timed_out()
            }
            None => {
                guard = self.condvar.wait(guard).unwrap();
                true
            }
        };

        if *guard {
            *guard = false;
            return true;
        }
        woken
    }

    fn wake_one(&self) {
        {
            let mut guard = self.pending.lock().unwrap();
            *guard = true;
        }
        self.condvar.notify_one();
    }
}
