//! Placement of lit sticks inside the censer.
//!
//! Layouts are pure functions of the lit count and configuration. Only the
//! per-frame jitter mode draws from an external random source.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::{ArcConfig, GridConfig, JitterMode, LayoutConfig, LayoutPolicy};

/// Render position of one stick, relative to the centre of the censer mouth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StickPosition {
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
}

/// Number of sticks that get a distinct position.
pub fn visible_count(lit_count: u64, max_sticks: usize) -> usize {
    usize::try_from(lit_count).map_or(max_sticks, |lit| lit.min(max_sticks))
}

/// Lays out the visible sticks for `lit_count`. Per-frame jitter is drawn
/// from the thread-local generator.
pub fn layout_sticks(lit_count: u64, config: &LayoutConfig) -> Vec<StickPosition> {
    layout_sticks_with_rng(lit_count, config, &mut rand::thread_rng())
}

/// Same as [`layout_sticks`], but per-frame jitter comes from `rng`.
pub fn layout_sticks_with_rng<R: Rng>(
    lit_count: u64,
    config: &LayoutConfig,
    rng: &mut R,
) -> Vec<StickPosition> {
    let count = visible_count(lit_count, config.max_sticks);
    match config.policy {
        LayoutPolicy::Grid => (0..count).map(|index| grid_position(index, &config.grid)).collect(),
        LayoutPolicy::Arc => {
            let offsets = band_offsets(count, config.arc.spacing);
            offsets
                .into_iter()
                .enumerate()
                .map(|(index, x)| {
                    let rotation = match config.jitter {
                        JitterMode::PerStick => stick_jitter(index, config.seed, &config.arc),
                        JitterMode::PerFrame => draw_jitter(&mut *rng, config.arc.jitter_degrees),
                    };
                    StickPosition {
                        x,
                        y: config.arc.base_y,
                        rotation,
                    }
                })
                .collect()
        }
    }
}

/// Fixed-column grid centred on x = 0, rows stacking upwards. A zero column
/// count is treated as a single column.
pub fn grid_position(index: usize, grid: &GridConfig) -> StickPosition {
    let columns = grid.columns.max(1);
    let column = index % columns;
    let row = index / columns;
    let grid_width = (columns - 1) as f32 * grid.spacing_x;

    StickPosition {
        x: -grid_width / 2.0 + column as f32 * grid.spacing_x,
        y: grid.base_y + row as f32 * grid.spacing_y,
        rotation: ((index * 7) % 10) as f32 - 5.0,
    }
}

fn band_offsets(count: usize, spacing: f32) -> Vec<f32> {
    if count == 0 {
        return Vec::new();
    }
    let width = (count - 1) as f32 * spacing;
    (0..count)
        .map(|index| -width / 2.0 + index as f32 * spacing)
        .collect()
}

fn stick_jitter(index: usize, seed: u64, arc: &ArcConfig) -> f32 {
    let mut rng = StdRng::seed_from_u64(seed ^ (index as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15));
    draw_jitter(&mut rng, arc.jitter_degrees)
}

fn draw_jitter<R: Rng>(rng: &mut R, amplitude: f32) -> f32 {
    if amplitude <= 0.0 {
        return 0.0;
    }
    rng.gen_range(-amplitude..amplitude)
}
