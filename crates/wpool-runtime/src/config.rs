//! Pool configuration: compile-time defaults with environment overrides.
//!
//! # Example
//!
//! ```
//! use wpool_runtime::PoolConfig;
//!
//! let config = PoolConfig::from_env()
//!     .idle_spins(200)
//!     .park_timeout(std::time::Duration::from_millis(50));
//! ```

use crate::dispatch::DispatchPolicy;
use std::time::Duration;
use wpool_core::env::{env_get, env_get_str};

/// Runtime-tunable knobs for a [`crate::controller::Pool`].
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Dispatch policy new pools start with.
    pub policy: DispatchPolicy,
    /// Times a worker spins checking its queue before parking.
    pub idle_spins: u32,
    /// Bound on a single park call; the worker re-checks its predicate
    /// and parks again if still idle, so this only controls wake
    /// latency, not correctness.
    pub park_timeout: Duration,
    /// Prefix used for named worker threads (`"{prefix}-{id}"`).
    pub thread_name_prefix: String,
}

impl PoolConfig {
    /// Compile-time defaults with `WPOOL_*` environment overrides applied.
    ///
    /// Recognized variables (all optional):
    /// - `WPOOL_POLICY` — `round-robin` or `least-load`
    /// - `WPOOL_IDLE_SPINS` — spin count before parking
    /// - `WPOOL_PARK_TIMEOUT_MS` — park timeout in milliseconds
    /// - `WPOOL_THREAD_NAME` — worker thread name prefix
    pub fn from_env() -> Self {
        let policy = match env_get_str("WPOOL_POLICY", "round-robin").as_str() {
            "least-load" | "least_load" => DispatchPolicy::LeastLoad,
            _ => DispatchPolicy::RoundRobin,
        };
        Self {
            policy,
            idle_spins: env_get("WPOOL_IDLE_SPINS", 100u32),
            park_timeout: Duration::from_millis(env_get("WPOOL_PARK_TIMEOUT_MS", 50u64)),
            thread_name_prefix: env_get_str("WPOOL_THREAD_NAME", "wpool-worker"),
        }
    }

    pub fn policy(mut self, policy: DispatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn idle_spins(mut self, spins: u32) -> Self {
        self.idle_spins = spins;
        self
    }

    pub fn park_timeout(mut self, timeout: Duration) -> Self {
        self.park_timeout = timeout;
        self
    }

    pub fn thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_round_robin() {
        std::env::remove_var("WPOOL_POLICY");
        assert_eq!(PoolConfig::from_env().policy, DispatchPolicy::RoundRobin);
    }

    #[test]
    fn test_builder_overrides() {
        let config = PoolConfig::default()
            .idle_spins(7)
            .thread_name_prefix("custom");
        assert_eq!(config.idle_spins, 7);
        assert_eq!(config.thread_name_prefix, "custom");
    }
}
