//! Score and combo bookkeeping

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Receiver for hits and completed combos
pub trait Scorer {
    /// Add `amount` points, returning the running total
    fn add_score(&mut self, amount: u32) -> u64;

    /// Count one fully-hit slider
    fn add_combo(&mut self);
}

/// Plain running totals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    pub score: u64,
    pub combo: u32,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scorer for ScoreBoard {
    fn add_score(&mut self, amount: u32) -> u64 {
        self.score += amount as u64;
        self.score
    }

    fn add_combo(&mut self) {
        self.combo += 1;
    }
}

/// Transient "+score" popup spawned where a beat was hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreMarker {
    pub position: Vec3,
    /// Running total reported by the scorer for this hit
    pub score: u64,
}
