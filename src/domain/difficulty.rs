//! Difficulty presets and level scaling.
//!
//! Scaling is a pair of step functions of the level: every `target_step`
//! levels add one target, every `grid_step` levels add one row and one
//! column. Both use integer floor division and never decrease.

use crate::config::{RoundSettings, ScalingConfig};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Base round configuration for this preset.
    pub fn settings(self) -> RoundSettings {
        match self {
            Difficulty::Easy => RoundSettings { rows: 3, columns: 4, targets: 2, time: 3, tries: 3 },
            Difficulty::Medium => RoundSettings { rows: 4, columns: 4, targets: 4, time: 2, tries: 3 },
            Difficulty::Hard => RoundSettings { rows: 4, columns: 5, targets: 6, time: 2, tries: 2 },
        }
    }
}

pub fn effective_target_count(base: usize, level: usize, scaling: ScalingConfig) -> usize {
    base + level / scaling.target_step
}

/// `(rows, columns)` for `level`.
pub fn effective_grid_dim(base: (usize, usize), level: usize, scaling: ScalingConfig) -> (usize, usize) {
    let grow = level / scaling.grid_step;
    (base.0 + grow, base.1 + grow)
}
