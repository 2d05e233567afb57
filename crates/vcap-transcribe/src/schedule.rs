//! Poll schedule with exponential backoff and a bounded budget.
//!
//! The schedule is a finite iterator of attempts. The first attempt is
//! immediate; each following one waits twice as long as the previous wait,
//! starting from `initial_delay` and capped at `max_delay`. Iteration ends
//! once `max_attempts` have been handed out or `max_wait` has elapsed since
//! the schedule was created. Waits are clamped so no attempt is scheduled
//! past the deadline.

use std::iter::FusedIterator;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::clock::Clock;

/// Backoff and budget settings for transcript polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Wait before the second poll.
    pub initial_delay: Duration,
    /// Upper bound for any single wait.
    pub max_delay: Duration,
    /// Maximum number of status requests.
    pub max_attempts: u32,
    /// Wall-clock budget measured from the start of polling.
    pub max_wait: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_attempts: 40,
            max_wait: Duration::from_secs(600),
        }
    }
}

impl PollPolicy {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    /// Delay after `completed` non-terminal polls (1-based).
    fn delay_after(&self, completed: u32) -> Duration {
        let exponent = completed.saturating_sub(1).min(31);
        self.initial_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }
}

/// One scheduled poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollAttempt {
    /// 1-based attempt number.
    pub number: u32,
    /// How long to wait before issuing this poll.
    pub wait: Duration,
}

/// Lazy, time-gated sequence of poll attempts. Not restartable.
pub struct PollSchedule {
    policy: PollPolicy,
    clock: Arc<dyn Clock>,
    started: Instant,
    issued: u32,
    done: bool,
}

impl PollSchedule {
    pub fn new(policy: PollPolicy, clock: Arc<dyn Clock>) -> Self {
        let started = clock.now();
        Self {
            policy,
            clock,
            started,
            issued: 0,
            done: false,
        }
    }

    /// Attempts handed out so far.
    pub fn attempts(&self) -> u32 {
        self.issued
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.now().saturating_duration_since(self.started)
    }

    /// Time left before the wall-clock budget runs out.
    pub fn remaining(&self) -> Duration {
        self.policy.max_wait.saturating_sub(self.elapsed())
    }
}

impl Iterator for PollSchedule {
    type Item = PollAttempt;

    fn next(&mut self) -> Option<PollAttempt> {
        if self.done {
            return None;
        }

        let elapsed = self.elapsed();
        if self.issued >= self.policy.max_attempts || elapsed >= self.policy.max_wait {
            self.done = true;
            return None;
        }

        let wait = if self.issued == 0 {
            Duration::ZERO
        } else {
            let remaining = self.policy.max_wait - elapsed;
            self.policy.delay_after(self.issued).min(remaining)
        };

        self.issued += 1;
        Some(PollAttempt {
            number: self.issued,
            wait,
        })
    }
}

impl FusedIterator for PollSchedule {}
