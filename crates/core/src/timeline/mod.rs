use serde::{Deserialize, Serialize};

/// Monotonic millisecond clock owned by a session. Time only moves when the
/// owner advances it, which keeps every timer deterministic.
#[derive(Debug, Default, Clone)]
pub struct SessionClock {
    now_ms: u64,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn advance(&mut self, delta_ms: u64) {
        self.now_ms = self.now_ms.saturating_add(delta_ms);
    }

    /// Moves the clock forward to `target_ms`. Never moves backwards.
    pub fn advance_to(&mut self, target_ms: u64) {
        self.now_ms = self.now_ms.max(target_ms);
    }
}

/// Identifier handed out by [`Scheduler::schedule`]. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(u64);

/// What should happen when a scheduled task comes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    /// The in-flight lighting animation has finished.
    LightingComplete,
    /// The chant overlay has reached its deadline.
    ChantExpired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub id: TaskId,
    pub due_ms: u64,
    pub kind: TaskKind,
}

/// Owner of every outstanding timer in a session.
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: Vec<ScheduledTask>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: u64, kind: TaskKind) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(ScheduledTask { id, due_ms, kind });
        tracing::trace!(?id, due_ms, ?kind, "scheduled task");
        id
    }

    /// Cancels a task. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        let removed = self.tasks.len() != before;
        if removed {
            tracing::trace!(?id, "cancelled task");
        }
        removed
    }

    pub fn cancel_all(&mut self) -> usize {
        let count = self.tasks.len();
        self.tasks.clear();
        count
    }

    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Earliest deadline among outstanding tasks.
    pub fn next_due(&self) -> Option<u64> {
        self.tasks.iter().map(|task| task.due_ms).min()
    }

    /// Removes and returns the earliest task due at or before `now_ms`.
    /// Ties resolve in scheduling order.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<ScheduledTask> {
        let index = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.due_ms <= now_ms)
            .min_by_key(|(_, task)| (task.due_ms, task.id))
            .map(|(index, _)| index)?;
        Some(self.tasks.remove(index))
    }
}
