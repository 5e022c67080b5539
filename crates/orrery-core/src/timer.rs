use tracing::{debug, info};

pub const DEFAULT_POMODORO_SECONDS: u32 = 25 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Completed,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
        }
    }
}

/// What one timer tick asks the caller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerSignal {
    Silent,
    /// Update the countdown display with this `minutes:seconds` text.
    Display(String),
    /// The countdown just finished; deliver the one-shot completion
    /// notification, then acknowledge.
    Completed,
}

/// Process-wide countdown state machine: Idle -> Running -> Completed ->
/// Idle. There is exactly one instance; starting while Running cancels the
/// active countdown without ever emitting its completion.
#[derive(Debug)]
pub struct Pomodoro {
    remaining: u32,
    phase: Phase,
}

impl Default for Pomodoro {
    fn default() -> Self {
        Self::new()
    }
}

impl Pomodoro {
    pub fn new() -> Self {
        Self {
            remaining: 0,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining
    }

    /// Begins a fresh countdown. A countdown already running is cancelled
    /// here, so its completion never fires.
    pub fn start(&mut self, duration_seconds: u32) {
        if self.phase == Phase::Running {
            info!(
                remaining = self.remaining,
                "restart cancels the active countdown"
            );
        }
        self.remaining = duration_seconds;
        self.phase = Phase::Running;
        debug!(duration_seconds, "pomodoro started");
    }

    /// One externally driven 1-second tick. Reaching zero forces the
    /// transition to Completed within this tick; `remaining` never goes
    /// negative.
    pub fn tick(&mut self) -> TimerSignal {
        match self.phase {
            Phase::Idle | Phase::Completed => TimerSignal::Silent,
            Phase::Running => {
                self.remaining = self.remaining.saturating_sub(1);
                if self.remaining == 0 {
                    self.phase = Phase::Completed;
                    info!("pomodoro complete");
                    TimerSignal::Completed
                } else {
                    TimerSignal::Display(format_clock(self.remaining))
                }
            }
        }
    }

    /// Called once the completion notification has been delivered; resets
    /// Completed back to Idle.
    pub fn acknowledge(&mut self) {
        if self.phase == Phase::Completed {
            self.phase = Phase::Idle;
        }
    }
}

/// `minutes:seconds`, seconds zero-padded to width 2.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
