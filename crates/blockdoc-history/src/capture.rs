//! Capture Controller: decides where one undo step ends and the next begins.
//!
//! | state             | event                  | next                | effect                               |
//! |-------------------|------------------------|---------------------|--------------------------------------|
//! | `Idle`            | mutation               | `Capturing`         | open transaction, arm both timers    |
//! | `Capturing`       | mutation               | `Capturing`         | re-arm pause timer                   |
//! | `Capturing`       | pause or debounce due  | `Idle`              | close transaction                    |
//! | `Capturing`       | `stop_capturing`       | `Idle`              | close transaction, cancel timers     |
//! | `Idle`/`Capturing`| enter atomic scope     | `AtomicCapturing`   | remember state, cancel timers        |
//! | `AtomicCapturing` | enter atomic scope     | `AtomicCapturing`   | depth + 1                            |
//! | `AtomicCapturing` | mutation               | `AtomicCapturing`   | open transaction if none is open     |
//! | `AtomicCapturing` | `stop_capturing`       | `AtomicCapturing`   | close transaction                    |
//! | `AtomicCapturing` | exit outermost scope   | `Capturing`/`Idle`  | resume typing group, or close        |
//!
//! Timers are deadlines, not threads. No timer is armed while atomic.

use crate::error::TimerError;
use crate::time::Millis;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Capturing,
    AtomicCapturing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Closes the group after `newGroupDelay` without input.
    Pause,
    /// Closes the group `historyDebounceTime` after it opened.
    Debounce,
}

/// Why a transaction was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryCause {
    Pause,
    Debounce,
    Explicit,
    ScopeExit,
    Replay,
}

impl From<TimerKind> for BoundaryCause {
    fn from(kind: TimerKind) -> Self {
        match kind {
            TimerKind::Pause => BoundaryCause::Pause,
            TimerKind::Debounce => BoundaryCause::Debounce,
        }
    }
}

/// Handle to one arming of a timer. Re-arming or cancelling the timer makes
/// every older token stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    pub kind: TimerKind,
    generation: u64,
}

#[derive(Debug, Clone, Copy, Default)]
struct TimerSlot {
    deadline: Option<Millis>,
    generation: u64,
}

/// What the caller must do after the outermost atomic scope exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeExit {
    /// An outer scope is still active.
    Nested,
    /// Close the open transaction.
    Close,
    /// Keep the open transaction; typing continues to extend it.
    Resume,
}

#[derive(Debug, Clone)]
pub struct CaptureController {
    state: CaptureState,
    atomic_depth: usize,
    resume: CaptureState,
    pause: TimerSlot,
    debounce: TimerSlot,
    generation: u64,
    new_group_delay: Millis,
    debounce_time: Millis,
}

impl CaptureController {
    pub fn new(new_group_delay: Millis, debounce_time: Millis) -> Self {
        Self {
            state: CaptureState::Idle,
            atomic_depth: 0,
            resume: CaptureState::Idle,
            pause: TimerSlot::default(),
            debounce: TimerSlot::default(),
            generation: 0,
            new_group_delay,
            debounce_time,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn atomic_depth(&self) -> usize {
        self.atomic_depth
    }

    /// Registers an incoming mutation. Returns `true` when a new transaction
    /// must be opened for it.
    pub fn on_mutation(&mut self, now: Millis, has_open: bool) -> bool {
        match self.state {
            CaptureState::Idle => {
                self.state = CaptureState::Capturing;
                self.arm(TimerKind::Debounce, now + self.debounce_time);
                self.arm(TimerKind::Pause, now + self.new_group_delay);
                true
            }
            CaptureState::Capturing => {
                self.arm(TimerKind::Pause, now + self.new_group_delay);
                if !has_open {
                    self.arm(TimerKind::Debounce, now + self.debounce_time);
                }
                !has_open
            }
            CaptureState::AtomicCapturing => !has_open,
        }
    }

    /// The earliest timer due at `now`, with its deadline. When both are due
    /// the debounce cap wins; either way the caller closes only once.
    pub fn due(&self, now: Millis) -> Option<(TimerKind, Millis)> {
        let debounce = self.debounce.deadline.filter(|d| *d <= now);
        let pause = self.pause.deadline.filter(|d| *d <= now);
        match (debounce, pause) {
            (Some(d), Some(p)) => Some((TimerKind::Debounce, d.min(p))),
            (Some(d), None) => Some((TimerKind::Debounce, d)),
            (None, Some(p)) => Some((TimerKind::Pause, p)),
            (None, None) => None,
        }
    }

    /// The next armed timer, earliest first.
    pub fn next_timer(&self) -> Option<(TimerToken, Millis)> {
        [
            (TimerKind::Debounce, self.debounce),
            (TimerKind::Pause, self.pause),
        ]
        .into_iter()
        .filter_map(|(kind, slot)| {
            slot.deadline.map(|deadline| {
                (
                    TimerToken {
                        kind,
                        generation: slot.generation,
                    },
                    deadline,
                )
            })
        })
        .min_by_key(|(_, deadline)| *deadline)
    }

    /// Checks that `token` is still the live arming of its timer and that
    /// its deadline has passed.
    pub fn check(&self, token: TimerToken, now: Millis) -> Result<(), TimerError> {
        let slot = self.slot(token.kind);
        match slot.deadline {
            Some(deadline) if slot.generation == token.generation => {
                if now < deadline {
                    Err(TimerError::Early)
                } else {
                    Ok(())
                }
            }
            _ => Err(TimerError::Stale),
        }
    }

    /// The open transaction was closed, for whatever reason.
    pub fn on_boundary(&mut self) {
        self.cancel(TimerKind::Pause);
        self.cancel(TimerKind::Debounce);
        if self.state == CaptureState::Capturing {
            self.state = CaptureState::Idle;
        }
    }

    /// Enters an atomic scope. Nested scopes only bump the depth.
    pub fn enter_atomic(&mut self) {
        self.atomic_depth += 1;
        if self.atomic_depth > 1 {
            return;
        }
        self.resume = self.state;
        self.state = CaptureState::AtomicCapturing;
        self.cancel(TimerKind::Pause);
        self.cancel(TimerKind::Debounce);
    }

    /// Leaves an atomic scope. Only the outermost exit changes state.
    pub fn exit_atomic(&mut self, now: Millis, has_open: bool) -> ScopeExit {
        match self.atomic_depth {
            0 => return ScopeExit::Nested,
            1 => {}
            _ => {
                self.atomic_depth -= 1;
                return ScopeExit::Nested;
            }
        }
        self.atomic_depth = 0;
        if self.resume == CaptureState::Capturing && has_open {
            self.state = CaptureState::Capturing;
            self.arm(TimerKind::Debounce, now + self.debounce_time);
            self.arm(TimerKind::Pause, now + self.new_group_delay);
            ScopeExit::Resume
        } else {
            self.state = CaptureState::Idle;
            ScopeExit::Close
        }
    }

    /// Drops all state, including any atomic nesting.
    pub fn reset(&mut self) {
        self.state = CaptureState::Idle;
        self.atomic_depth = 0;
        self.resume = CaptureState::Idle;
        self.cancel(TimerKind::Pause);
        self.cancel(TimerKind::Debounce);
    }

    fn slot(&self, kind: TimerKind) -> &TimerSlot {
        match kind {
            TimerKind::Pause => &self.pause,
            TimerKind::Debounce => &self.debounce,
        }
    }

    fn slot_mut(&mut self, kind: TimerKind) -> &mut TimerSlot {
        match kind {
            TimerKind::Pause => &mut self.pause,
            TimerKind::Debounce => &mut self.debounce,
        }
    }

    fn arm(&mut self, kind: TimerKind, deadline: Millis) {
        self.generation += 1;
        let generation = self.generation;
        *self.slot_mut(kind) = TimerSlot {
            deadline: Some(deadline),
            generation,
        };
    }

    fn cancel(&mut self, kind: TimerKind) {
        self.generation += 1;
        let generation = self.generation;
        *self.slot_mut(kind) = TimerSlot {
            deadline: None,
            generation,
        };
    }
}
