use serde::{Deserialize, Serialize};

use crate::config::PrayerMode;

/// Built-in example prayer offered by the composer.
pub const SAMPLE_PRAYER: &[&str] = &[
    "Nam mô A Di Đà Phật",
    "Con xin hướng về Phật Tổ",
    "Cầu mong gia đình bình an",
    "Sức khỏe dồi dào",
    "Vạn sự như ý",
];

/// Prayer shown during the chant, either as discrete lines or one free-form
/// text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "content", rename_all = "snake_case")]
pub enum PrayerContent {
    LineList(Vec<String>),
    FreeText(String),
}

impl PrayerContent {
    pub fn new(mode: PrayerMode) -> Self {
        match mode {
            PrayerMode::LineList => Self::LineList(Vec::new()),
            PrayerMode::FreeText => Self::FreeText(String::new()),
        }
    }

    pub fn mode(&self) -> PrayerMode {
        match self {
            Self::LineList(_) => PrayerMode::LineList,
            Self::FreeText(_) => PrayerMode::FreeText,
        }
    }

    /// Whether there is anything worth chanting.
    pub fn has_content(&self) -> bool {
        match self {
            Self::LineList(lines) => !lines.is_empty(),
            Self::FreeText(text) => !text.trim().is_empty(),
        }
    }

    /// Appends a trimmed line. Blank input is rejected and `false` returned.
    pub fn add_line(&mut self, text: &str) -> bool {
        let Self::LineList(lines) = self else {
            debug_assert!(false, "add_line on free-text prayer");
            return false;
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }
        lines.push(trimmed.to_string());
        true
    }

    pub fn remove_line(&mut self, index: usize) -> Option<String> {
        match self {
            Self::LineList(lines) if index < lines.len() => Some(lines.remove(index)),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        match self {
            Self::LineList(lines) => lines.clear(),
            Self::FreeText(text) => text.clear(),
        }
    }

    /// Replaces the content with [`SAMPLE_PRAYER`]. Free text receives the
    /// sample joined by newlines.
    pub fn load_sample(&mut self) {
        match self {
            Self::LineList(lines) => {
                *lines = SAMPLE_PRAYER.iter().map(|line| line.to_string()).collect();
            }
            Self::FreeText(text) => *text = SAMPLE_PRAYER.join("\n"),
        }
    }

    pub fn set_text(&mut self, value: impl Into<String>) {
        let Self::FreeText(text) = self else {
            debug_assert!(false, "set_text on line-list prayer");
            return;
        };
        *text = value.into();
    }

    /// Lines as the overlay displays them. Free text keeps its own line
    /// breaks and drops blank lines.
    pub fn display_lines(&self) -> Vec<String> {
        match self {
            Self::LineList(lines) => lines.clone(),
            Self::FreeText(text) => text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}
