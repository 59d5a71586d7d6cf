//! Timed full-screen chant overlay.

use serde::{Deserialize, Serialize};

use crate::config::{ChantConfig, ChantReentry};
use crate::timeline::{Scheduler, TaskId, TaskKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChantState {
    Idle,
    Active { task: TaskId, deadline_ms: u64 },
}

/// Outcome of [`ChantTimer::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChantStart {
    Started,
    /// A chant was running and its countdown began again.
    Restarted,
    /// A chant was running and re-entry is configured to be ignored.
    AlreadyActive,
    /// There was no prayer to display.
    NoContent,
}

#[derive(Debug)]
pub struct ChantTimer {
    duration_ms: u64,
    reentry: ChantReentry,
    state: ChantState,
}

impl ChantTimer {
    pub fn new(config: &ChantConfig) -> Self {
        Self {
            duration_ms: config.duration_ms,
            reentry: config.reentry,
            state: ChantState::Idle,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn state(&self) -> ChantState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, ChantState::Active { .. })
    }

    /// Milliseconds left before the overlay expires on its own.
    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        match self.state {
            ChantState::Active { deadline_ms, .. } => Some(deadline_ms.saturating_sub(now_ms)),
            ChantState::Idle => None,
        }
    }

    pub fn start(&mut self, has_content: bool, scheduler: &mut Scheduler, now_ms: u64) -> ChantStart {
        if !has_content {
            tracing::debug!("chant requested without prayer content");
            return ChantStart::NoContent;
        }

        let outcome = match (self.state, self.reentry) {
            (ChantState::Idle, _) => ChantStart::Started,
            (ChantState::Active { .. }, ChantReentry::Ignore) => {
                tracing::debug!("chant already active, keeping current deadline");
                return ChantStart::AlreadyActive;
            }
            (ChantState::Active { task, .. }, ChantReentry::Restart) => {
                scheduler.cancel(task);
                ChantStart::Restarted
            }
        };

        let deadline_ms = now_ms.saturating_add(self.duration_ms);
        let task = scheduler.schedule(deadline_ms, TaskKind::ChantExpired);
        self.state = ChantState::Active { task, deadline_ms };
        tracing::info!(deadline_ms, ?outcome, "chant started");
        outcome
    }

    /// Ends the chant early. Calling it while idle is a no-op.
    pub fn complete(&mut self, scheduler: &mut Scheduler) -> bool {
        match self.state {
            ChantState::Active { task, .. } => {
                scheduler.cancel(task);
                self.state = ChantState::Idle;
                tracing::info!("chant completed");
                true
            }
            ChantState::Idle => false,
        }
    }

    /// Handles the expiry timer. Timers from an earlier, replaced countdown
    /// are ignored.
    pub fn expire(&mut self, task: TaskId) -> bool {
        match self.state {
            ChantState::Active { task: current, .. } if current == task => {
                self.state = ChantState::Idle;
                tracing::info!("chant expired");
                true
            }
            _ => false,
        }
    }
}
