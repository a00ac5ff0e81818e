//! Active-shot resolution among overlapping channels.

use std::ops::Range;

use contracts::{Frame, SceneId, Strip, StripId, Timeline};

/// Select the active strip at `frame`.
///
/// Channels are scanned from the highest index down; the first unmuted strip
/// covering `frame` wins. Strips on muted channels, muted strips and strips
/// whose scene reference is unset or fails `is_live` never match, even when no
/// lower channel has an alternative.
pub fn resolve<F>(timeline: &Timeline, frame: Frame, is_live: F) -> Option<&Strip>
where
    F: Fn(&SceneId) -> bool,
{
    timeline
        .channels()
        .iter()
        .rev()
        .filter(|channel| !channel.mute)
        .filter_map(|channel| channel.strip_at(frame))
        .find(|strip| !strip.mute && strip.scene.as_ref().is_some_and(&is_live))
}

/// A run of consecutive master frames resolving to the same strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShotSegment {
    pub strip: StripId,
    pub scene: SceneId,
    pub channel: u32,
    pub master_range: Range<Frame>,
}

/// Resolve every frame of `range` and collapse the result into segments.
///
/// Gaps are omitted.
pub fn shot_map<F>(timeline: &Timeline, range: Range<Frame>, is_live: F) -> Vec<ShotSegment>
where
    F: Fn(&SceneId) -> bool,
{
    let mut segments: Vec<ShotSegment> = Vec::new();

    for frame in range {
        let Some(strip) = resolve(timeline, frame, &is_live) else {
            continue;
        };

        match segments.last_mut() {
            Some(last) if last.strip == strip.id && last.master_range.end == frame => {
                last.master_range.end = frame + 1;
            }
            _ => segments.push(ShotSegment {
                strip: strip.id.clone(),
                // `resolve` only returns strips with a scene reference.
                scene: strip.scene.clone().unwrap_or_default(),
                channel: strip.channel,
                master_range: frame..frame + 1,
            }),
        }
    }

    segments
}
