//! Core library for the Incense Altar application.
//!
//! The altar is a small event-driven state machine. A [`LightingQueue`]
//! serialises lighting requests into one animation at a time, a
//! [`ChantTimer`] runs the timed prayer overlay, and the [`layout`] functions
//! place the lit sticks in the censer. [`AltarSession`] ties them to a single
//! clock and [`Scheduler`] so every timer can be cancelled deterministically.

pub mod assets;
pub mod chant;
pub mod config;
pub mod error;
pub mod layout;
pub mod lighting;
pub mod prayer;
pub mod render;
pub mod session;
pub mod timeline;

pub use assets::{AssetSlot, AssetStore, DecorAsset};
pub use chant::{ChantStart, ChantState, ChantTimer};
pub use config::{
    AltarConfig, ChantConfig, ChantReentry, ControlsConfig, JitterMode, LayoutConfig, LayoutPolicy,
    LightingConfig, PrayerMode,
};
pub use error::{AltarError, Result};
pub use layout::{layout_sticks, layout_sticks_with_rng, StickPosition};
pub use lighting::{LightingQueue, LightingState};
pub use prayer::{PrayerContent, SAMPLE_PRAYER};
pub use render::FrameRenderer;
pub use session::{Action, AltarSession, Control, ControlState, SessionSnapshot};
pub use timeline::{ScheduledTask, Scheduler, SessionClock, TaskId, TaskKind};
