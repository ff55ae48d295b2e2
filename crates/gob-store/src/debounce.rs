//! Leading + trailing debounce with a max-wait ceiling, as an explicit state
//! machine driven by caller-supplied instants.
//!
//! ```text
//!          call (leading fires)            call
//!   Idle ─────────────────────▶ Waiting ─────────▶ PendingTrailing
//!    ▲                            │                  │     ▲  │
//!    │      deadline passed       │                  │     └──┘ call (deadline pushed,
//!    ├────────────────────────────┘                  │          capped at max_deadline)
//!    │      deadline passed (trailing fires)         │
//!    └───────────────────────────────────────────────┘
//! ```
//!
//! The debouncer never holds the value being debounced. It only answers "fire
//! now?" so the owner always flushes its latest state, which means a trailing
//! flush can never write something older than what a previous flush wrote.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceOptions {
    /// Quiet period after the last call before the trailing edge fires.
    pub wait: Duration,
    /// Longest a burst of calls can postpone the trailing edge.
    pub max_wait: Option<Duration>,
    /// Fire synchronously on the first call of a burst.
    pub leading: bool,
    /// Fire once more when the burst settles, if calls arrived after the
    /// leading edge.
    pub trailing: bool,
}

impl DebounceOptions {
    /// Leading and trailing edges, no max-wait.
    #[must_use]
    pub const fn new(wait: Duration) -> Self {
        Self {
            wait,
            max_wait: None,
            leading: true,
            trailing: true,
        }
    }

    #[must_use]
    pub const fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    #[must_use]
    pub const fn trailing_only(mut self) -> Self {
        self.leading = false;
        self.trailing = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    /// The leading edge fired and no call has arrived since.
    Waiting {
        deadline: Instant,
        max_deadline: Option<Instant>,
    },
    /// Calls arrived that the trailing edge still has to flush.
    PendingTrailing {
        deadline: Instant,
        max_deadline: Option<Instant>,
    },
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    options: DebounceOptions,
    state: DebounceState,
}

impl Debouncer {
    /// A debouncer with neither edge enabled would never fire; it is treated
    /// as trailing-only.
    #[must_use]
    pub const fn new(mut options: DebounceOptions) -> Self {
        if !options.leading && !options.trailing {
            options.trailing = true;
        }
        Self {
            options,
            state: DebounceState::Idle,
        }
    }

    #[must_use]
    pub const fn options(&self) -> DebounceOptions {
        self.options
    }

    #[must_use]
    pub const fn state(&self) -> DebounceState {
        self.state
    }

    /// Register a call at `now`. Returns `true` when the owner must flush
    /// immediately.
    pub fn call(&mut self, now: Instant) -> bool {
        // A trailing edge whose deadline already passed without a poll is
        // flushed by this call instead.
        let overdue = self.poll(now);

        match self.state {
            DebounceState::Idle => {
                let max_deadline = self.options.max_wait.map(|max| now + max);
                let deadline = cap(now + self.options.wait, max_deadline);
                if overdue || self.options.leading {
                    self.state = DebounceState::Waiting {
                        deadline,
                        max_deadline,
                    };
                    true
                } else {
                    self.state = DebounceState::PendingTrailing {
                        deadline,
                        max_deadline,
                    };
                    false
                }
            }
            DebounceState::Waiting { max_deadline, .. }
            | DebounceState::PendingTrailing { max_deadline, .. } => {
                let deadline = cap(now + self.options.wait, max_deadline);
                self.state = if self.options.trailing {
                    DebounceState::PendingTrailing {
                        deadline,
                        max_deadline,
                    }
                } else {
                    DebounceState::Waiting {
                        deadline,
                        max_deadline,
                    }
                };
                false
            }
        }
    }

    /// Advance timers to `now`. Returns `true` when the trailing edge fires.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.state {
            DebounceState::Waiting { deadline, .. } if now >= deadline => {
                self.state = DebounceState::Idle;
                false
            }
            DebounceState::PendingTrailing { deadline, .. } if now >= deadline => {
                self.state = DebounceState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Drop any scheduled flush. A later call starts a fresh burst.
    pub fn cancel(&mut self) {
        self.state = DebounceState::Idle;
    }

    /// Whether a trailing flush is scheduled.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.state, DebounceState::PendingTrailing { .. })
    }

    /// When the scheduled trailing flush is due, if any.
    #[must_use]
    pub const fn pending_deadline(&self) -> Option<Instant> {
        match self.state {
            DebounceState::PendingTrailing { deadline, .. } => Some(deadline),
            _ => None,
        }
    }
}

fn cap(deadline: Instant, max_deadline: Option<Instant>) -> Instant {
    max_deadline.map_or(deadline, |max| deadline.min(max))
}
