//! Search limits for the pairing solver: step budget, wall-clock budget and cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How often (in steps) the solver reads the clock.
pub const CLOCK_CHECK_INTERVAL: u64 = 1024;

/// Default step budget used by the web service.
pub const DEFAULT_MAX_STEPS: u64 = 1_000_000;

/// Default wall-clock budget used by the web service.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(5);

/// Shared cancellation flag. Cheap to clone; clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every search holding a clone of this token to stop.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// True when both tokens are clones of one another.
    pub fn same_flag(&self, other: &CancelToken) -> bool {
        Arc::ptr_eq(&self.cancelled, &other.cancelled)
    }
}

/// Why a search stopped before proving anything.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AbortReason {
    StepLimit,
    Deadline,
    Cancelled,
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbortReason::StepLimit => write!(f, "step limit reached"),
            AbortReason::Deadline => write!(f, "time limit reached"),
            AbortReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Bounds for one pairing search. `None` means unbounded for that dimension.
#[derive(Clone, Debug, Default)]
pub struct SearchLimits {
    pub max_steps: Option<u64>,
    pub time_limit: Option<Duration>,
    pub cancel: CancelToken,
}

impl SearchLimits {
    /// No step or time bound; only cancellation can stop the search.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn steps(max_steps: u64) -> Self {
        Self {
            max_steps: Some(max_steps),
            ..Self::default()
        }
    }

    pub fn new(max_steps: Option<u64>, time_limit: Option<Duration>) -> Self {
        Self {
            max_steps,
            time_limit,
            cancel: CancelToken::new(),
        }
    }

    /// Replace the cancel token (e.g. with one registered by the caller).
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Start the clock for a search run.
    pub(crate) fn start(&self) -> Budget<'_> {
        Budget {
            limits: self,
            started: Instant::now(),
            steps: 0,
        }
    }
}

/// Running counters for one search.
pub(crate) struct Budget<'a> {
    limits: &'a SearchLimits,
    started: Instant,
    steps: u64,
}

impl Budget<'_> {
    /// Count one recursive entry and check every bound.
    pub(crate) fn step(&mut self) -> Result<(), AbortReason> {
        self.steps += 1;
        if self.limits.cancel.is_cancelled() {
            return Err(AbortReason::Cancelled);
        }
        if let Some(max) = self.limits.max_steps {
            if self.steps > max {
                return Err(AbortReason::StepLimit);
            }
        }
        if let Some(limit) = self.limits.time_limit {
            if self.steps % CLOCK_CHECK_INTERVAL == 0 && self.started.elapsed() >= limit {
                return Err(AbortReason::Deadline);
            }
        }
        Ok(())
    }

    pub(crate) fn steps(&self) -> u64 {
        self.steps
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}
