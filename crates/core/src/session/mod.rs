//! One altar session: the lighting queue, chant timer and prayer store wired
//! to a shared clock and scheduler, behind the user-facing controls.

use serde::{Deserialize, Serialize};

use crate::chant::{ChantStart, ChantTimer};
use crate::config::{AltarConfig, PrayerMode};
use crate::layout::{layout_sticks, StickPosition};
use crate::lighting::LightingQueue;
use crate::prayer::PrayerContent;
use crate::timeline::{Scheduler, SessionClock, TaskKind};

/// User-facing controls. Each one is enabled or disabled from session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Light,
    Reset,
    OpenComposer,
    CloseComposer,
    EditPrayer,
    AddLine,
    RemoveLine,
    LoadSample,
    ClearPrayer,
    StartChant,
    CompleteChant,
}

impl Control {
    pub const ALL: [Control; 11] = [
        Control::Light,
        Control::Reset,
        Control::OpenComposer,
        Control::CloseComposer,
        Control::EditPrayer,
        Control::AddLine,
        Control::RemoveLine,
        Control::LoadSample,
        Control::ClearPrayer,
        Control::StartChant,
        Control::CompleteChant,
    ];

    /// Vietnamese caption shown on the control.
    pub fn label(self) -> &'static str {
        match self {
            Control::Light => "Thắp hương",
            Control::Reset => "Xóa",
            Control::OpenComposer => "Khấn",
            Control::CloseComposer => "Đóng",
            Control::EditPrayer => "Nhập lời cầu nguyện",
            Control::AddLine => "Thêm",
            Control::RemoveLine => "Xóa dòng này",
            Control::LoadSample => "Dùng mẫu",
            Control::ClearPrayer => "Xóa tất cả",
            Control::StartChant => "Bắt đầu khấn",
            Control::CompleteChant => "Hoàn tất",
        }
    }
}

/// Something the user did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Light,
    Reset,
    OpenComposer,
    CloseComposer,
    /// Replaces the composer's draft line.
    SetDraft(String),
    /// Commits the draft line to the prayer.
    AddLine,
    RemoveLine(usize),
    LoadSample,
    ClearPrayer,
    /// Replaces the free-text prayer.
    SetText(String),
    StartChant,
    CompleteChant,
}

impl Action {
    pub fn control(&self) -> Control {
        match self {
            Action::Light => Control::Light,
            Action::Reset => Control::Reset,
            Action::OpenComposer => Control::OpenComposer,
            Action::CloseComposer => Control::CloseComposer,
            Action::SetDraft(_) | Action::SetText(_) => Control::EditPrayer,
            Action::AddLine => Control::AddLine,
            Action::RemoveLine(_) => Control::RemoveLine,
            Action::LoadSample => Control::LoadSample,
            Action::ClearPrayer => Control::ClearPrayer,
            Action::StartChant => Control::StartChant,
            Action::CompleteChant => Control::CompleteChant,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlState {
    pub control: Control,
    pub enabled: bool,
}

/// Everything the presentation layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub now_ms: u64,
    pub lit_count: u64,
    pub pending: u64,
    pub animating: bool,
    pub ritual_progress: Option<f32>,
    pub chanting: bool,
    pub chant_remaining_ms: Option<u64>,
    pub smoke_visible: bool,
    pub smoke_intense: bool,
    pub sticks: Vec<StickPosition>,
    pub composer_open: bool,
    pub draft: String,
    pub prayer_mode: PrayerMode,
    pub prayer_lines: Vec<String>,
    pub controls: Vec<ControlState>,
}

impl SessionSnapshot {
    pub fn is_enabled(&self, control: Control) -> bool {
        self.controls
            .iter()
            .any(|state| state.control == control && state.enabled)
    }
}

#[derive(Debug)]
pub struct AltarSession {
    config: AltarConfig,
    clock: SessionClock,
    scheduler: Scheduler,
    lighting: LightingQueue,
    chant: ChantTimer,
    prayer: PrayerContent,
    composer_open: bool,
    draft: String,
    torn_down: bool,
}

impl AltarSession {
    pub fn new(config: AltarConfig) -> Self {
        let lighting = LightingQueue::new(config.lighting.animation_ms);
        let chant = ChantTimer::new(&config.chant);
        let prayer = PrayerContent::new(config.prayer.mode);
        Self {
            config,
            clock: SessionClock::new(),
            scheduler: Scheduler::new(),
            lighting,
            chant,
            prayer,
            composer_open: false,
            draft: String::new(),
            torn_down: false,
        }
    }

    pub fn config(&self) -> &AltarConfig {
        &self.config
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn lighting(&self) -> &LightingQueue {
        &self.lighting
    }

    pub fn chant(&self) -> &ChantTimer {
        &self.chant
    }

    pub fn prayer(&self) -> &PrayerContent {
        &self.prayer
    }

    pub fn is_chanting(&self) -> bool {
        self.chant.is_active()
    }

    pub fn is_composer_open(&self) -> bool {
        self.composer_open
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Earliest outstanding timer deadline.
    pub fn next_deadline(&self) -> Option<u64> {
        self.scheduler.next_due()
    }

    /// Whether the prayer can be edited right now. With a composer, editing
    /// happens inside it; without one, the prayer is editable until chanting.
    fn editing(&self) -> bool {
        if self.config.controls.composer {
            self.composer_open
        } else {
            !self.is_chanting()
        }
    }

    pub fn is_enabled(&self, control: Control) -> bool {
        if self.torn_down {
            return false;
        }

        let controls = &self.config.controls;
        let chanting = self.is_chanting();
        let line_list = self.prayer.mode() == PrayerMode::LineList;
        let has_content = self.prayer.has_content();

        match control {
            Control::Light => {
                !(chanting && controls.gate_lighting_while_chanting) && !self.composer_open
            }
            Control::Reset => {
                controls.reset && !chanting && !self.composer_open && self.lighting.lit_count() > 0
            }
            Control::OpenComposer => {
                controls.composer
                    && !chanting
                    && !self.composer_open
                    && self.lighting.lit_count() > 0
            }
            Control::CloseComposer => self.composer_open,
            Control::EditPrayer => self.editing(),
            Control::AddLine => self.editing() && line_list && !self.draft.trim().is_empty(),
            Control::RemoveLine => self.editing() && line_list && has_content,
            Control::LoadSample => self.editing(),
            Control::ClearPrayer => self.editing() && has_content,
            Control::StartChant => {
                has_content && (!controls.composer || self.composer_open)
            }
            Control::CompleteChant => chanting,
        }
    }

    pub fn controls(&self) -> Vec<ControlState> {
        Control::ALL
            .iter()
            .map(|&control| ControlState {
                control,
                enabled: self.is_enabled(control),
            })
            .collect()
    }

    /// Applies a user action. Actions on disabled controls are dropped and
    /// `false` is returned, the same as clicking a greyed-out button.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let control = action.control();
        if !self.is_enabled(control) {
            tracing::warn!(?control, "control is disabled, ignoring action");
            return false;
        }

        let now_ms = self.clock.now_ms();
        match action {
            Action::Light => {
                self.lighting.request_light();
                self.lighting.pump(&mut self.scheduler, now_ms);
            }
            Action::Reset => self.lighting.reset(&mut self.scheduler),
            Action::OpenComposer => self.composer_open = true,
            Action::CloseComposer => {
                self.composer_open = false;
                self.draft.clear();
            }
            Action::SetDraft(text) => {
                if self.prayer.mode() != PrayerMode::LineList {
                    return false;
                }
                self.draft = text;
            }
            Action::AddLine => {
                if !self.prayer.add_line(&self.draft) {
                    return false;
                }
                self.draft.clear();
            }
            Action::RemoveLine(index) => return self.prayer.remove_line(index).is_some(),
            Action::LoadSample => self.prayer.load_sample(),
            Action::ClearPrayer => self.prayer.clear(),
            Action::SetText(text) => {
                if self.prayer.mode() != PrayerMode::FreeText {
                    return false;
                }
                self.prayer.set_text(text);
            }
            Action::StartChant => {
                let outcome =
                    self.chant
                        .start(self.prayer.has_content(), &mut self.scheduler, now_ms);
                if outcome == ChantStart::NoContent {
                    return false;
                }
                self.composer_open = false;
            }
            Action::CompleteChant => return self.chant.complete(&mut self.scheduler),
        }
        true
    }

    /// Moves time forward by `delta_ms`, firing every timer that comes due in
    /// deadline order. A finished animation hands over to the next queued one
    /// at the exact instant it completes.
    pub fn advance(&mut self, delta_ms: u64) {
        let target = self.clock.now_ms().saturating_add(delta_ms);
        if self.torn_down {
            self.clock.advance_to(target);
            return;
        }

        while let Some(task) = self.scheduler.pop_due(target) {
            self.clock.advance_to(task.due_ms);
            match task.kind {
                TaskKind::LightingComplete => {
                    if self.lighting.complete(task.id) {
                        self.lighting.pump(&mut self.scheduler, task.due_ms);
                    }
                }
                TaskKind::ChantExpired => {
                    self.chant.expire(task.id);
                }
            }
        }
        self.clock.advance_to(target);
    }

    /// Cancels every outstanding timer. The session stops reacting to time
    /// and actions afterwards.
    pub fn shutdown(&mut self) {
        if self.torn_down {
            return;
        }
        let cancelled = self.scheduler.cancel_all();
        self.torn_down = true;
        tracing::debug!(cancelled, "altar session torn down");
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let now_ms = self.clock.now_ms();
        let lit_count = self.lighting.lit_count();
        let animating = self.lighting.is_animating();
        let chanting = self.is_chanting();

        SessionSnapshot {
            now_ms,
            lit_count,
            pending: self.lighting.pending(),
            animating,
            ritual_progress: self.lighting.progress(now_ms),
            chanting,
            chant_remaining_ms: self.chant.remaining_ms(now_ms),
            smoke_visible: lit_count > 0 || animating,
            smoke_intense: chanting,
            sticks: layout_sticks(lit_count, &self.config.layout),
            composer_open: self.composer_open,
            draft: self.draft.clone(),
            prayer_mode: self.prayer.mode(),
            prayer_lines: self.prayer.display_lines(),
            controls: self.controls(),
        }
    }
}

impl Drop for AltarSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
