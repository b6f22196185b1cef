use super::loop_frames::*;
use crate::error::*;
use crate::rational::*;
use crate::traits::*;

use itertools::Itertools;
use log::trace;
use serde::{Serialize, Serializer, Deserialize, Deserializer};
use serde::de::{Error as DeError};

///
/// The result of resolving a time against the expanded loop frame sequence
///
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct TimeSearch {
    /// Index into the loop frame sequence of the frame covering the time
    pub frame_index: usize,

    /// Index of the source keyframe that frame plays back
    pub keyframe_index: usize,

    /// How far past the frame the searched time lies
    pub inter_time: RationalTime,

    /// Length of the segment from the frame to the next frame (or the duration)
    pub segment_duration: RationalTime
}

///
/// A keyframe timeline: a sparse ascending keyframe list plus a duration
///
/// The animation owns a derived `loop_frames` sequence, rebuilt eagerly
/// whenever the keyframes or duration change, which flattens any loop
/// regions into explicit playback instances. Time queries run against that
/// sequence and dispatch to an `Animatable` with the keyframe indices and
/// blend parameters that apply; the animation itself never computes an
/// interpolated value.
///
/// Invariants: the keyframe list is never empty, starts at time 0, is
/// strictly ascending, and the duration is later than the last keyframe.
/// All mutators validate before touching anything, so a failed edit leaves
/// the animation unchanged.
///
#[derive(Clone, Debug)]
pub struct Animation {
    /// The source keyframes, ascending with the first at time 0
    pub (super) keyframes: Vec<Keyframe>,

    /// Total length of the animation (later than the last keyframe)
    pub (super) duration: RationalTime,

    /// Selected keyframe indices, sorted and deduplicated
    pub (super) selection: Vec<usize>,

    /// Granularity used when clamping retime operations
    pub (super) base_time_interval: RationalTime,

    /// Cache of the flattened loop frame sequence
    pub (super) loop_frames: Vec<LoopFrame>,

    /// The keyframe the most recent update resolved to
    pub (super) edit_keyframe_index: usize,

    /// Whether the most recent update blended between keyframes
    pub (super) is_interpolated: bool
}

///
/// Checks the keyframe list and duration invariants for an animation
///
fn validate(keyframes: &[Keyframe], duration: RationalTime) -> Result<(), TimelineError> {
    let first   = keyframes.first().ok_or(TimelineError::EmptyKeyframeList)?;
    let last    = keyframes.last().ok_or(TimelineError::EmptyKeyframeList)?;

    if first.time != RationalTime::from(0) {
        return Err(TimelineError::NonMonotonicTime);
    }

    if !keyframes.iter().tuple_windows().all(|(previous, next)| previous.time < next.time) {
        return Err(TimelineError::NonMonotonicTime);
    }

    if duration <= last.time {
        return Err(TimelineError::DurationTooShort);
    }

    Ok(())
}

impl Animation {
    ///
    /// Creates an animation from a keyframe list and a duration
    ///
    pub fn new(keyframes: Vec<Keyframe>, duration: RationalTime) -> Result<Animation, TimelineError> {
        validate(&keyframes, duration)?;

        let loop_frames = expand_loop_frames(&keyframes, duration);

        Ok(Animation {
            keyframes:              keyframes,
            duration:               duration,
            selection:              vec![],
            base_time_interval:     RationalTime::from(1),
            loop_frames:            loop_frames,
            edit_keyframe_index:    0,
            is_interpolated:        false
        })
    }

    /// The source keyframes of this animation
    pub fn keyframes(&self) -> &[Keyframe] { &self.keyframes }

    /// The total length of this animation
    pub fn duration(&self) -> RationalTime { self.duration }

    /// The selected keyframe indices, sorted ascending
    pub fn selection(&self) -> &[usize] { &self.selection }

    /// The flattened loop frame sequence
    pub fn loop_frames(&self) -> &[LoopFrame] { &self.loop_frames }

    /// The granularity used when clamping retime operations
    pub fn base_time_interval(&self) -> RationalTime { self.base_time_interval }

    /// The keyframe index the most recent update resolved to
    pub fn edit_keyframe_index(&self) -> usize { self.edit_keyframe_index }

    /// The keyframe the most recent update resolved to
    pub fn edit_keyframe(&self) -> &Keyframe {
        &self.keyframes[self.edit_keyframe_index.min(self.keyframes.len()-1)]
    }

    /// Whether the most recent update blended between keyframes
    pub fn is_interpolated(&self) -> bool { self.is_interpolated }

    ///
    /// Sets the granularity used when clamping retime operations
    ///
    pub fn set_base_time_interval(&mut self, interval: RationalTime) {
        self.base_time_interval = interval;
    }

    ///
    /// The shortest duration this animation's keyframes allow
    ///
    pub fn min_duration(&self) -> RationalTime {
        self.last_keyframe_time() + RationalTime::from(1)
    }

    ///
    /// The time of the last source keyframe
    ///
    pub fn last_keyframe_time(&self) -> RationalTime {
        self.keyframes.last().map(|keyframe| keyframe.time).unwrap_or_else(|| RationalTime::from(0))
    }

    ///
    /// The time of the last loop frame that plays inside the animation
    ///
    /// A loop that closes the animation can emit a trailing frame at or past
    /// the duration; that frame exists to resolve queries at the duration
    /// itself and is skipped here.
    ///
    pub fn last_loop_frame_time(&self) -> RationalTime {
        let count = self.loop_frames.len();
        if count == 0 {
            return RationalTime::from(0);
        }

        let time = self.loop_frames[count-1].time;
        if time >= self.duration {
            if count >= 2 { self.loop_frames[count-2].time } else { RationalTime::from(0) }
        } else {
            time
        }
    }

    ///
    /// Replaces the keyframe list, rebuilding the loop frame cache
    ///
    pub fn set_keyframes(&mut self, keyframes: Vec<Keyframe>) -> Result<(), TimelineError> {
        validate(&keyframes, self.duration)?;

        self.keyframes = keyframes;
        self.rebuild_loop_frames();
        Ok(())
    }

    ///
    /// Changes the duration, rebuilding the loop frame cache
    ///
    pub fn set_duration(&mut self, duration: RationalTime) -> Result<(), TimelineError> {
        validate(&self.keyframes, duration)?;

        self.duration = duration;
        self.rebuild_loop_frames();
        Ok(())
    }

    ///
    /// Replaces the keyframes and duration together, rebuilding the cache
    ///
    pub fn set_keyframes_and_duration(&mut self, keyframes: Vec<Keyframe>, duration: RationalTime) -> Result<(), TimelineError> {
        validate(&keyframes, duration)?;

        self.keyframes  = keyframes;
        self.duration   = duration;
        self.rebuild_loop_frames();
        Ok(())
    }

    ///
    /// Recomputes the loop frame cache after a mutation
    ///
    pub (super) fn rebuild_loop_frames(&mut self) {
        self.loop_frames = expand_loop_frames(&self.keyframes, self.duration);
        trace!("Rebuilt {} loop frames from {} keyframes", self.loop_frames.len(), self.keyframes.len());
    }

    ///
    /// Finds the loop frame covering a time
    ///
    /// Scans backwards for the last frame at or before the time, so at a
    /// loop seam (where a replayed frame and a source keyframe share a time)
    /// the later frame wins. Times before the first frame resolve to it with
    /// a negative inter time.
    ///
    pub fn locate(&self, time: RationalTime) -> TimeSearch {
        let mut next_time = self.duration;

        for (frame_index, frame) in self.loop_frames.iter().enumerate().rev() {
            if time >= frame.time {
                return TimeSearch {
                    frame_index:        frame_index,
                    keyframe_index:     frame.keyframe_index,
                    inter_time:         time - frame.time,
                    segment_duration:   next_time - frame.time
                };
            }

            next_time = frame.time;
        }

        let first = self.loop_frames[0];
        TimeSearch {
            frame_index:        0,
            keyframe_index:     first.keyframe_index,
            inter_time:         time - first.time,
            segment_duration:   next_time - first.time
        }
    }

    ///
    /// Evaluates the animation at a time, dispatching to the animatable
    ///
    /// Exactly one of the animatable's methods is called per update. The
    /// value is stepped when the time lands exactly on a frame, the segment
    /// has no width, the frame is the final one, or its interpolation is
    /// `Step`; blended linearly when the interpolation is `Linear` (or the
    /// animation is too short for a spline); otherwise blended with a
    /// spline, degrading to the 3-point and 2-point forms when a flanking
    /// neighbour is missing, shares its time with the segment (a loop seam)
    /// or is cut off by a `Bounded` keyframe.
    ///
    pub fn update(&mut self, time: RationalTime, animatable: &mut dyn Animatable) {
        let zero        = RationalTime::from(0);
        let search      = self.locate(time);
        let inter_time  = search.inter_time.max(zero);
        let frame1      = self.loop_frames[search.frame_index];

        self.edit_keyframe_index = frame1.keyframe_index;

        let keyframe1   = self.keyframes[frame1.keyframe_index];

        if inter_time == zero || search.segment_duration == zero
            || search.frame_index+1 >= self.loop_frames.len()
            || keyframe1.interpolation == Interpolation::Step {

            self.is_interpolated = false;
            animatable.step(frame1.keyframe_index);
            return;
        }

        let frame2 = self.loop_frames[search.frame_index+1];
        if frame1.time == frame2.time {
            self.is_interpolated = false;
            animatable.step(frame1.keyframe_index);
            return;
        }

        self.is_interpolated = true;

        let local = (inter_time / search.segment_duration).to_scalar();

        if keyframe1.interpolation == Interpolation::Linear || self.keyframes.len() <= 2 {
            animatable.linear(frame1.keyframe_index, frame2.keyframe_index, keyframe1.easing.convert(local));
            return;
        }

        // Global eased time: continuous across the timeline when the easing is the default curve
        let eased   = keyframe1.easing.convert(local);
        let x       = if keyframe1.easing.is_default() {
            time.to_scalar()
        } else {
            eased * search.segment_duration.to_scalar() + frame1.time.to_scalar()
        };

        let keyframe2   = self.keyframes[frame2.keyframe_index];
        let index1      = search.frame_index;

        let use_prev    = index1 >= 1
            && keyframe1.interpolation != Interpolation::Bounded
            && self.loop_frames[index1-1].time != frame1.time;
        let use_next    = index1+2 < self.loop_frames.len()
            && keyframe2.interpolation != Interpolation::Bounded
            && self.loop_frames[index1+2].time != frame2.time;

        match (use_prev, use_next) {
            (true, true) => {
                let frame0  = self.loop_frames[index1-1];
                let frame3  = self.loop_frames[index1+2];
                let knots   = SplineX::middle(frame0.time.to_scalar(), frame1.time.to_scalar(),
                                              frame2.time.to_scalar(), frame3.time.to_scalar(),
                                              x, eased);
                animatable.spline(frame0.keyframe_index, frame1.keyframe_index,
                                  frame2.keyframe_index, frame3.keyframe_index, knots);
            }

            (true, false) => {
                let frame0  = self.loop_frames[index1-1];
                let knots   = SplineX::last(frame0.time.to_scalar(), frame1.time.to_scalar(),
                                            frame2.time.to_scalar(), x, eased);
                animatable.last_spline(frame0.keyframe_index, frame1.keyframe_index,
                                       frame2.keyframe_index, knots);
            }

            (false, true) => {
                let frame3  = self.loop_frames[index1+2];
                let knots   = SplineX::first(frame1.time.to_scalar(), frame2.time.to_scalar(),
                                             frame3.time.to_scalar(), x, eased);
                animatable.first_spline(frame1.keyframe_index, frame2.keyframe_index,
                                        frame3.keyframe_index, knots);
            }

            (false, false) => {
                animatable.linear(frame1.keyframe_index, frame2.keyframe_index, eased);
            }
        }
    }
}

impl Default for Animation {
    fn default() -> Animation {
        Animation::new(vec![Keyframe::new()], RationalTime::from(1))
            .expect("Default animation is valid")
    }
}

impl PartialEq for Animation {
    fn eq(&self, other: &Animation) -> bool {
        self.keyframes == other.keyframes
            && self.duration == other.duration
            && self.selection == other.selection
    }
}

///
/// Persisted form of an animation: the loop frame cache and the transient
/// editing state are derived, so only the source fields are stored
///
#[derive(Serialize)]
struct AnimationDataRef<'a> {
    keyframes:          &'a [Keyframe],
    duration:           RationalTime,
    selection:          &'a [usize],
    base_time_interval: RationalTime
}

#[derive(Deserialize)]
struct AnimationData {
    keyframes:          Vec<Keyframe>,
    duration:           RationalTime,
    selection:          Vec<usize>,
    base_time_interval: RationalTime
}

impl Serialize for Animation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer {
        AnimationDataRef {
            keyframes:          &self.keyframes,
            duration:           self.duration,
            selection:          &self.selection,
            base_time_interval: self.base_time_interval
        }.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Animation {
    fn deserialize<D>(deserializer: D) -> Result<Animation, D::Error>
    where D: Deserializer<'de> {
        let data            = AnimationData::deserialize(deserializer)?;

        let mut animation   = Animation::new(data.keyframes, data.duration)
            .map_err(|err| D::Error::custom(format!("invalid animation: {}", err)))?;

        animation.set_selection(data.selection)
            .map_err(|err| D::Error::custom(format!("invalid animation: {}", err)))?;
        animation.base_time_interval = data.base_time_interval;

        Ok(animation)
    }
}
