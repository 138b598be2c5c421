//! Bounded retry for idempotent control-plane reads

use std::thread;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::domain::ports::{ControlPlaneError, ControlPlaneResult};
use crate::error::{DeployError, DeployResult};

/// How transient failures of read operations are retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included
    pub max_attempts: u32,
    /// Pause between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no retry
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Run `call`, retrying transient failures until the budget runs out
    ///
    /// Non-transient failures escalate on the first attempt.
    pub fn run<T>(
        &self,
        operation: &str,
        call: impl FnMut() -> ControlPlaneResult<T>,
    ) -> DeployResult<T> {
        self.run_until(operation, None, call)
    }

    /// Like [`run`](Self::run), but never sleeps or retries past `deadline`
    pub fn run_until<T>(
        &self,
        operation: &str,
        deadline: Option<Instant>,
        mut call: impl FnMut() -> ControlPlaneResult<T>,
    ) -> DeployResult<T> {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match call() {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    let pause = match deadline {
                        Some(deadline) => {
                            let now = Instant::now();
                            if now >= deadline {
                                return Err(transport_error(operation, attempt, &err));
                            }
                            self.delay.min(deadline - now)
                        }
                        None => self.delay,
                    };
                    warn!(operation, attempt, error = %err, "retrying control-plane call");
                    thread::sleep(pause);
                    attempt += 1;
                }
                Err(err) => return Err(transport_error(operation, attempt, &err)),
            }
        }
    }
}

pub(crate) fn transport_error(operation: &str, attempts: u32, err: &ControlPlaneError) -> DeployError {
    DeployError::Transport {
        operation: operation.to_string(),
        attempts,
        message: err.message().to_string(),
    }
}
