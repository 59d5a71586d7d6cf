//! Lighting queue: turns bursts of "light one stick" requests into a strictly
//! serial sequence of fixed-length animations.

use serde::{Deserialize, Serialize};

use crate::timeline::{Scheduler, TaskId, TaskKind};

/// Animation state of the queue. At most one animation is ever in flight,
/// which is encoded by `Animating` carrying the single timer that finishes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightingState {
    Idle,
    Animating { task: TaskId, started_ms: u64 },
}

#[derive(Debug)]
pub struct LightingQueue {
    animation_ms: u64,
    lit_count: u64,
    pending: u64,
    state: LightingState,
}

impl LightingQueue {
    pub fn new(animation_ms: u64) -> Self {
        debug_assert!(animation_ms > 0, "animation duration must be positive");
        Self {
            animation_ms,
            lit_count: 0,
            pending: 0,
            state: LightingState::Idle,
        }
    }

    pub fn animation_ms(&self) -> u64 {
        self.animation_ms
    }

    pub fn lit_count(&self) -> u64 {
        self.lit_count
    }

    /// Requests queued and not yet completed, including the one animating.
    pub fn pending(&self) -> u64 {
        self.pending
    }

    pub fn state(&self) -> LightingState {
        self.state
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, LightingState::Animating { .. })
    }

    /// Queues one more stick. Never blocks and never starts an animation by
    /// itself; the owner calls [`LightingQueue::pump`] afterwards.
    pub fn request_light(&mut self) {
        self.pending = self.pending.saturating_add(1);
        tracing::debug!(pending = self.pending, "light requested");
    }

    /// Starts the next animation if none is in flight and work is queued.
    /// Returns `true` when an animation was started.
    pub fn pump(&mut self, scheduler: &mut Scheduler, now_ms: u64) -> bool {
        if self.is_animating() || self.pending == 0 {
            return false;
        }

        let task = scheduler.schedule(
            now_ms.saturating_add(self.animation_ms),
            TaskKind::LightingComplete,
        );
        self.state = LightingState::Animating {
            task,
            started_ms: now_ms,
        };
        tracing::debug!(
            pending = self.pending,
            lit = self.lit_count,
            "lighting animation started"
        );
        true
    }

    /// Applies the completion of the animation backed by `task`. Completions
    /// from timers that no longer belong to the queue are ignored.
    pub fn complete(&mut self, task: TaskId) -> bool {
        match self.state {
            LightingState::Animating { task: current, .. } if current == task => {
                self.lit_count = self.lit_count.saturating_add(1);
                self.pending = self.pending.saturating_sub(1);
                self.state = LightingState::Idle;
                tracing::debug!(
                    lit = self.lit_count,
                    pending = self.pending,
                    "lighting animation finished"
                );
                true
            }
            _ => {
                tracing::debug!(?task, "ignoring stale lighting completion");
                false
            }
        }
    }

    /// Clears every counter and cancels the in-flight animation timer.
    pub fn reset(&mut self, scheduler: &mut Scheduler) {
        if let LightingState::Animating { task, .. } = self.state {
            scheduler.cancel(task);
        }
        self.lit_count = 0;
        self.pending = 0;
        self.state = LightingState::Idle;
        tracing::debug!("lighting queue reset");
    }

    /// Fraction of the current animation that has elapsed, if one is running.
    pub fn progress(&self, now_ms: u64) -> Option<f32> {
        match self.state {
            LightingState::Animating { started_ms, .. } => {
                let elapsed = now_ms.saturating_sub(started_ms) as f32;
                Some((elapsed / self.animation_ms as f32).clamp(0.0, 1.0))
            }
            LightingState::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fire_due(queue: &mut LightingQueue, scheduler: &mut Scheduler, now_ms: u64) {
        while let Some(task) = scheduler.pop_due(now_ms) {
            queue.complete(task.id);
            queue.pump(scheduler, task.due_ms);
        }
    }

    #[test]
    fn request_only_queues() {
        let mut queue = LightingQueue::new(1_000);
        queue.request_light();
        queue.request_light();

        assert_eq!(queue.pending(), 2);
        assert_eq!(queue.lit_count(), 0);
        assert!(!queue.is_animating());
    }

    #[test]
    fn only_one_animation_in_flight() {
        let mut scheduler = Scheduler::new();
        let mut queue = LightingQueue::new(1_000);
        for _ in 0..5 {
            queue.request_light();
        }

        assert!(queue.pump(&mut scheduler, 0));
        assert!(!queue.pump(&mut scheduler, 0));
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn animations_run_back_to_back() {
        let mut scheduler = Scheduler::new();
        let mut queue = LightingQueue::new(1_000);
        for _ in 0..3 {
            queue.request_light();
        }
        queue.pump(&mut scheduler, 0);

        fire_due(&mut queue, &mut scheduler, 999);
        assert_eq!(queue.lit_count(), 0);

        fire_due(&mut queue, &mut scheduler, 1_000);
        assert_eq!(queue.lit_count(), 1);
        assert_eq!(queue.pending(), 2);
        assert!(queue.is_animating());

        fire_due(&mut queue, &mut scheduler, 3_000);
        assert_eq!(queue.lit_count(), 3);
        assert_eq!(queue.pending(), 0);
        assert!(!queue.is_animating());
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut scheduler = Scheduler::new();
        let mut queue = LightingQueue::new(1_000);
        queue.request_light();
        queue.pump(&mut scheduler, 0);
        let LightingState::Animating { task, .. } = queue.state() else {
            panic!("queue should be animating");
        };

        queue.reset(&mut scheduler);
        assert!(!scheduler.is_scheduled(task));
        assert!(!queue.complete(task));
        assert_eq!(queue.lit_count(), 0);
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn progress_tracks_elapsed_time() {
        let mut scheduler = Scheduler::new();
        let mut queue = LightingQueue::new(1_000);
        assert_eq!(queue.progress(0), None);

        queue.request_light();
        queue.pump(&mut scheduler, 2_000);
        assert_eq!(queue.progress(2_250), Some(0.25));
        assert_eq!(queue.progress(9_000), Some(1.0));
    }

    #[test]
    fn deadline_saturates_at_end_of_clock() {
        let mut scheduler = Scheduler::new();
        let mut queue = LightingQueue::new(1_000);
        queue.request_light();

        assert!(queue.pump(&mut scheduler, u64::MAX - 10));
        assert_eq!(scheduler.next_due(), Some(u64::MAX));
        assert_eq!(queue.animation_ms(), 1_000);
    }
}
