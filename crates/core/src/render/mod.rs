use crate::assets::{AssetSlot, AssetStore, DecorAsset};
use crate::session::{Control, SessionSnapshot};
use crate::Result;

pub const TITLE: &str = "Sống Tình Cảm adidaphat";
pub const SUBTITLE: &str = "Hãy thắp hương để thể hiện lòng thành kính và cầu";
const EMPTY_PRAYER: &str = "Chưa có lời cầu nguyện";

/// Text renderer used by the command line front end. Sticks are drawn on a
/// character grid where one cell spans `cell_width` layout units.
#[derive(Debug)]
pub struct FrameRenderer {
    assets: AssetStore,
    cell_width: f32,
    columns: usize,
}

impl FrameRenderer {
    pub fn new(assets: AssetStore) -> Self {
        Self {
            assets,
            cell_width: 7.0,
            columns: 21,
        }
    }

    pub fn render(&self, snapshot: &SessionSnapshot) -> Result<Vec<String>> {
        let censer = self.assets.resolve("censer")?;
        let mut lines = vec![TITLE.to_string(), SUBTITLE.to_string(), String::new()];

        let left = self.assets.in_slot(AssetSlot::LeftPanel);
        let right = self.assets.in_slot(AssetSlot::RightPanel);
        if !left.is_empty() || !right.is_empty() {
            lines.push(format!("[{}]  ~  [{}]", alt_names(&left), alt_names(&right)));
        }

        if snapshot.smoke_visible {
            lines.push(if snapshot.smoke_intense { " ≋≋≋ " } else { "  ~  " }.to_string());
        }
        lines.extend(self.stick_rows(snapshot));
        lines.push(format!("\\{:_^width$}/", censer.alt, width = self.columns));

        if let Some(progress) = snapshot.ritual_progress {
            let filled = (progress * 10.0).round() as usize;
            lines.push(format!(
                "đang thắp [{}{}]",
                "#".repeat(filled),
                ".".repeat(10 - filled.min(10))
            ));
        }
        lines.push(format!("Đã thắp: {}", snapshot.lit_count));

        if snapshot.composer_open {
            lines.push(String::new());
            lines.push("Soạn lời cầu nguyện".to_string());
            lines.extend(self.prayer_block(snapshot, true));
            lines.push(format!("> {}", snapshot.draft));
        }

        if snapshot.chanting {
            lines.push(String::new());
            lines.push("=".repeat(self.columns));
            lines.extend(self.prayer_block(snapshot, false));
            if let Some(remaining) = snapshot.chant_remaining_ms {
                lines.push(format!("({}s)", remaining.div_ceil(1_000)));
            }
            lines.push("=".repeat(self.columns));
        }

        lines.push(String::new());
        lines.push(self.control_bar(snapshot));
        Ok(lines)
    }

    fn stick_rows(&self, snapshot: &SessionSnapshot) -> Vec<String> {
        if snapshot.sticks.is_empty() {
            return Vec::new();
        }

        let centre = (self.columns / 2) as f32;
        let mut rows: Vec<(i64, Vec<char>)> = Vec::new();
        for stick in &snapshot.sticks {
            let row_key = stick.y.round() as i64;
            let column = (centre + stick.x / self.cell_width).round();
            let column = column.clamp(0.0, (self.columns - 1) as f32) as usize;
            let glyph = match stick.rotation {
                r if r < -2.0 => '\\',
                r if r > 2.0 => '/',
                _ => '|',
            };

            let slot = match rows.iter().position(|(key, _)| *key == row_key) {
                Some(slot) => slot,
                None => {
                    rows.push((row_key, vec![' '; self.columns]));
                    rows.len() - 1
                }
            };
            rows[slot].1[column] = glyph;
        }

        rows.sort_by(|a, b| b.0.cmp(&a.0));
        rows.into_iter()
            .map(|(_, row)| format!(" {} ", row.into_iter().collect::<String>()))
            .collect()
    }

    fn prayer_block(&self, snapshot: &SessionSnapshot, numbered: bool) -> Vec<String> {
        if snapshot.prayer_lines.is_empty() {
            return vec![EMPTY_PRAYER.to_string()];
        }
        snapshot
            .prayer_lines
            .iter()
            .enumerate()
            .map(|(index, line)| {
                if numbered {
                    format!("{index}. {line}")
                } else {
                    line.clone()
                }
            })
            .collect()
    }

    fn control_bar(&self, snapshot: &SessionSnapshot) -> String {
        snapshot
            .controls
            .iter()
            .filter(|state| state.enabled || is_primary(state.control))
            .map(|state| {
                if state.enabled {
                    format!("[{}]", state.control.label())
                } else {
                    format!("({})", state.control.label())
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new(AssetStore::altar_defaults())
    }
}

fn alt_names(assets: &[&DecorAsset]) -> String {
    assets
        .iter()
        .map(|asset| asset.alt.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Controls that stay on screen even while disabled.
fn is_primary(control: Control) -> bool {
    matches!(control, Control::Light | Control::OpenComposer | Control::Reset)
}
