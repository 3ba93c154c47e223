//! Beat timing
//!
//! `BeatAuthority` is whatever owns the song clock; `BeatClock` turns frame
//! deltas into fixed-period beat ticks.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Source of the current beat length
pub trait BeatAuthority {
    /// Seconds per beat
    fn beat_length(&self) -> f32;
}

/// Constant tempo
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tempo {
    beat_length: f32,
}

impl Tempo {
    pub fn from_bpm(bpm: f32) -> Result<Self> {
        Self::from_beat_length(60.0 / bpm)
    }

    pub fn from_beat_length(beat_length: f32) -> Result<Self> {
        if !(beat_length.is_finite() && beat_length > 0.0) {
            return Err(ConfigError::InvalidBeatLength(beat_length));
        }
        Ok(Self { beat_length })
    }

    pub fn bpm(&self) -> f32 {
        60.0 / self.beat_length
    }
}

impl BeatAuthority for Tempo {
    fn beat_length(&self) -> f32 {
        self.beat_length
    }
}

/// Repeating timer: fires once immediately, then every `period` seconds
#[derive(Debug, Clone)]
pub struct BeatClock {
    period: f32,
    elapsed: f32,
    next_tick: f32,
}

impl BeatClock {
    pub fn new(period: f32) -> Result<Self> {
        if !(period.is_finite() && period > 0.0) {
            return Err(ConfigError::InvalidBeatLength(period));
        }
        Ok(Self {
            period,
            elapsed: 0.0,
            next_tick: 0.0,
        })
    }

    pub fn period(&self) -> f32 {
        self.period
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Advance by `dt` and return how many ticks came due
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.elapsed += dt;
        let mut ticks = 0;
        while self.next_tick <= self.elapsed {
            ticks += 1;
            self.next_tick += self.period;
        }
        ticks
    }
}
