//! Master <-> shot frame remapping.

use std::ops::Range;

use contracts::{Frame, Strip};

/// Affine placement of a shot clock on the master clock for one strip.
///
/// Captures the strip's interval and trim together with the referenced
/// scene's `frame_start`, which is all the mapping depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripMapping {
    pub frame_final_start: Frame,
    pub frame_final_end: Frame,
    pub frame_offset_start: Frame,
    /// `frame_start` of the referenced shot scene
    pub scene_frame_start: Frame,
}

impl StripMapping {
    pub fn new(strip: &Strip, scene_frame_start: Frame) -> Self {
        Self {
            frame_final_start: strip.frame_final_start,
            frame_final_end: strip.frame_final_end,
            frame_offset_start: strip.frame_offset_start,
            scene_frame_start,
        }
    }

    /// Visible interval on the master clock.
    pub fn master_range(&self) -> Range<Frame> {
        self.frame_final_start..self.frame_final_end
    }

    /// The same interval expressed on the shot clock.
    pub fn local_range(&self) -> Range<Frame> {
        master_to_local(self.frame_final_start, self)..master_to_local(self.frame_final_end, self)
    }

    /// Constant added to a master frame to get the local frame.
    fn shift(&self) -> Frame {
        self.frame_offset_start + self.scene_frame_start - self.frame_final_start
    }
}

/// Convert a master frame to the strip's local shot frame.
///
/// Meaningful for `frame_final_start <= master_frame < frame_final_end`; the
/// arithmetic itself is total.
#[inline]
pub fn master_to_local(master_frame: Frame, mapping: &StripMapping) -> Frame {
    master_frame + mapping.shift()
}

/// Convert a local shot frame back to the master clock.
#[inline]
pub fn local_to_master(local_frame: Frame, mapping: &StripMapping) -> Frame {
    local_frame - mapping.shift()
}
