//! Master timeline model: channels of scene strips.
//!
//! Channels are kept ordered by index (higher index = higher priority) and
//! strips within a channel are kept ordered by start frame and non-overlapping.
//! Both invariants are enforced on insertion.

use serde::{Deserialize, Serialize};

use crate::{ContractError, ObjectId, SceneId, StripId};

/// Frame number on any clock (master or shot).
pub type Frame = i64;

/// Inclusive scene frame range (`frame_start..=frame_end`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRange {
    pub start: Frame,
    pub end: Frame,
}

impl FrameRange {
    pub fn new(start: Frame, end: Frame) -> Self {
        Self { start, end }
    }

    /// Number of frames in the range (0 when `end < start`).
    pub fn len(&self) -> Frame {
        (self.end - self.start + 1).max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, frame: Frame) -> bool {
        self.start <= frame && frame <= self.end
    }
}

/// Placement of a shot scene on a channel of the master timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strip {
    pub id: StripId,

    /// Channel index this strip lives on
    pub channel: u32,

    /// First visible master frame
    pub frame_final_start: Frame,

    /// Exclusive end of the visible interval on the master timeline
    pub frame_final_end: Frame,

    /// Frames trimmed from the start of the referenced shot
    pub frame_offset_start: Frame,

    pub mute: bool,

    /// Non-owning reference to the shot scene; `None` once unset
    pub scene: Option<SceneId>,

    /// Camera to make active in the shot scene while this strip is active
    pub scene_camera: Option<ObjectId>,
}

impl Strip {
    /// Visible length on the master timeline.
    pub fn frame_final_duration(&self) -> Frame {
        self.frame_final_end - self.frame_final_start
    }

    /// Whether `frame` lies in `[frame_final_start, frame_final_end)`.
    pub fn contains(&self, frame: Frame) -> bool {
        self.frame_final_start <= frame && frame < self.frame_final_end
    }

    fn overlaps(&self, other: &Strip) -> bool {
        self.frame_final_start < other.frame_final_end
            && other.frame_final_start < self.frame_final_end
    }

    fn check_range(&self) -> Result<(), ContractError> {
        if self.frame_final_start >= self.frame_final_end {
            return Err(ContractError::invalid_strip_range(
                self.id.as_str(),
                self.frame_final_start,
                self.frame_final_end,
            ));
        }
        Ok(())
    }
}

/// One channel of the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub index: u32,
    pub mute: bool,
    strips: Vec<Strip>,
}

impl Channel {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            mute: false,
            strips: Vec::new(),
        }
    }

    /// Strips ordered by start frame.
    pub fn strips(&self) -> &[Strip] {
        &self.strips
    }

    /// The (at most one) strip covering `frame`.
    pub fn strip_at(&self, frame: Frame) -> Option<&Strip> {
        // Strips are sorted and disjoint, so the candidate is the last strip
        // starting at or before `frame`.
        let idx = self
            .strips
            .partition_point(|s| s.frame_final_start <= frame);
        idx.checked_sub(1)
            .map(|i| &self.strips[i])
            .filter(|s| s.contains(frame))
    }

    fn insert(&mut self, strip: Strip) -> Result<(), ContractError> {
        if let Some(existing) = self.strips.iter().find(|s| s.overlaps(&strip)) {
            return Err(ContractError::strip_overlap(
                self.index,
                existing.id.as_str(),
                strip.id.as_str(),
            ));
        }
        let idx = self
            .strips
            .partition_point(|s| s.frame_final_start < strip.frame_final_start);
        self.strips.insert(idx, strip);
        Ok(())
    }
}

/// The channel/strip structure owned by a master scene.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    channels: Vec<Channel>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Channels ordered by ascending index.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channel(&self, index: u32) -> Option<&Channel> {
        self.channels.iter().find(|c| c.index == index)
    }

    /// Get or create the channel with `index`, keeping index order.
    pub fn channel_mut(&mut self, index: u32) -> &mut Channel {
        let pos = self.channels.partition_point(|c| c.index < index);
        if self.channels.get(pos).map(|c| c.index) != Some(index) {
            self.channels.insert(pos, Channel::new(index));
        }
        &mut self.channels[pos]
    }

    /// Insert a strip on its channel.
    ///
    /// # Errors
    /// - empty visible interval
    /// - duplicate strip id
    /// - overlap with another strip on the same channel
    pub fn insert_strip(&mut self, strip: Strip) -> Result<(), ContractError> {
        strip.check_range()?;
        if self.strip(&strip.id).is_some() {
            return Err(ContractError::config_validation(
                format!("timeline.strips[name={}]", strip.id),
                "duplicate strip name",
            ));
        }
        self.channel_mut(strip.channel).insert(strip)
    }

    /// Remove a strip, returning it.
    pub fn remove_strip(&mut self, id: &StripId) -> Option<Strip> {
        for channel in &mut self.channels {
            if let Some(pos) = channel.strips.iter().position(|s| &s.id == id) {
                return Some(channel.strips.remove(pos));
            }
        }
        None
    }

    /// Apply `edit` to a strip, re-validating range and overlap.
    ///
    /// On error the strip is left unchanged.
    pub fn update_strip(
        &mut self,
        id: &StripId,
        edit: impl FnOnce(&mut Strip),
    ) -> Result<(), ContractError> {
        let original = self
            .remove_strip(id)
            .ok_or_else(|| ContractError::Other(format!("strip not found: {id}")))?;
        let mut edited = original.clone();
        edit(&mut edited);
        match self.insert_strip(edited) {
            Ok(()) => Ok(()),
            Err(e) => {
                // Re-inserting the untouched original cannot conflict.
                self.channel_mut(original.channel).strips.push(original);
                self.resort();
                Err(e)
            }
        }
    }

    pub fn strip(&self, id: &StripId) -> Option<&Strip> {
        self.strips().find(|s| &s.id == id)
    }

    /// All strips, channel by channel (ascending), then by start frame.
    pub fn strips(&self) -> impl Iterator<Item = &Strip> {
        self.channels.iter().flat_map(|c| c.strips.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.channels.iter().all(|c| c.strips.is_empty())
    }

    /// Master frame span covered by any strip, as `[start, end)`.
    pub fn bounds(&self) -> Option<(Frame, Frame)> {
        self.strips().fold(None, |acc, s| {
            Some(match acc {
                None => (s.frame_final_start, s.frame_final_end),
                Some((lo, hi)) => (lo.min(s.frame_final_start), hi.max(s.frame_final_end)),
            })
        })
    }

    fn resort(&mut self) {
        for channel in &mut self.channels {
            channel.strips.sort_by_key(|s| s.frame_final_start);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(id: &str, channel: u32, start: Frame, end: Frame) -> Strip {
        Strip {
            id: id.into(),
            channel,
            frame_final_start: start,
            frame_final_end: end,
            frame_offset_start: 0,
            mute: false,
            scene: Some(id.into()),
            scene_camera: None,
        }
    }

    #[test]
    fn test_channels_kept_in_index_order() {
        let mut timeline = Timeline::new();
        timeline.insert_strip(strip("c", 3, 1, 10)).unwrap();
        timeline.insert_strip(strip("a", 1, 1, 10)).unwrap();
        timeline.insert_strip(strip("b", 2, 1, 10)).unwrap();
        let indices: Vec<u32> = timeline.channels().iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_overlap_rejected_within_channel() {
        let mut timeline = Timeline::new();
        timeline.insert_strip(strip("a", 1, 1, 10)).unwrap();
        let err = timeline.insert_strip(strip("b", 1, 9, 20)).unwrap_err();
        assert!(matches!(err, ContractError::StripOverlap { .. }));
        // Adjacent is fine: end is exclusive.
        timeline.insert_strip(strip("c", 1, 10, 20)).unwrap();
    }

    #[test]
    fn test_empty_interval_rejected() {
        let mut timeline = Timeline::new();
        let err = timeline.insert_strip(strip("a", 1, 5, 5)).unwrap_err();
        assert!(matches!(err, ContractError::InvalidStripRange { .. }));
    }

    #[test]
    fn test_strip_at_uses_half_open_interval() {
        let mut timeline = Timeline::new();
        timeline.insert_strip(strip("b", 1, 10, 20)).unwrap();
        timeline.insert_strip(strip("a", 1, 1, 10)).unwrap();
        let channel = timeline.channel(1).unwrap();
        assert_eq!(channel.strip_at(0), None);
        assert_eq!(channel.strip_at(1).unwrap().id, "a");
        assert_eq!(channel.strip_at(9).unwrap().id, "a");
        assert_eq!(channel.strip_at(10).unwrap().id, "b");
        assert_eq!(channel.strip_at(20), None);
    }

    #[test]
    fn test_update_strip_rolls_back_on_overlap() {
        let mut timeline = Timeline::new();
        timeline.insert_strip(strip("a", 1, 1, 10)).unwrap();
        timeline.insert_strip(strip("b", 1, 10, 20)).unwrap();
        let result = timeline.update_strip(&"a".into(), |s| s.frame_final_end = 15);
        assert!(result.is_err());
        assert_eq!(timeline.strip(&"a".into()).unwrap().frame_final_end, 10);
        assert_eq!(timeline.channel(1).unwrap().strips()[0].id, "a");
    }

    #[test]
    fn test_bounds() {
        let mut timeline = Timeline::new();
        assert_eq!(timeline.bounds(), None);
        timeline.insert_strip(strip("a", 1, 5, 10)).unwrap();
        timeline.insert_strip(strip("b", 2, 1, 7)).unwrap();
        assert_eq!(timeline.bounds(), Some((1, 10)));
    }
}
