//! Boundary-crossing detection for shot clocks.
//!
//! Distinguishes a natural one-frame advance over the edge of a strip's valid
//! interval (which propagates to the master clock) from an arbitrary jump past
//! it (a scrub, which stays local to the shot).

use std::collections::HashMap;
use std::ops::Range;

use contracts::{CrossingDirection, Frame, SceneId};

/// Classification of a new frame value on a monitored clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    /// Inside the valid interval
    Inside,
    /// Single step from the boundary frame to just outside it
    Advance(CrossingDirection),
    /// Left the interval any other way
    Scrub,
}

impl Crossing {
    /// Whether the change should reach the master clock.
    pub fn propagates(&self) -> bool {
        !matches!(self, Self::Scrub)
    }
}

/// Last observed frame per shot clock.
#[derive(Debug, Clone, Default)]
pub struct BoundaryDetector {
    last_frames: HashMap<SceneId, Frame>,
}

impl BoundaryDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `frame` against `valid = [lo, hi)` and record it as the
    /// clock's last observed value.
    pub fn observe(&mut self, clock: &SceneId, frame: Frame, valid: Range<Frame>) -> Crossing {
        let previous = self.last_frames.insert(clock.clone(), frame);
        classify(previous, frame, valid)
    }

    /// Set the clock's origin without classifying (used when the controller
    /// itself moves the clock).
    pub fn reset(&mut self, clock: &SceneId, frame: Frame) {
        self.last_frames.insert(clock.clone(), frame);
    }

    pub fn last_frame(&self, clock: &SceneId) -> Option<Frame> {
        self.last_frames.get(clock).copied()
    }
}

fn classify(previous: Option<Frame>, frame: Frame, valid: Range<Frame>) -> Crossing {
    if valid.contains(&frame) {
        return Crossing::Inside;
    }
    let Some(previous) = previous else {
        return Crossing::Scrub;
    };
    if frame >= valid.end && previous == valid.end - 1 && frame == previous + 1 {
        Crossing::Advance(CrossingDirection::Forward)
    } else if frame < valid.start && previous == valid.start && frame == previous - 1 {
        Crossing::Advance(CrossingDirection::Backward)
    } else {
        Crossing::Scrub
    }
}
