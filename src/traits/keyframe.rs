use crate::easing::*;
use crate::rational::*;

///
/// How the interval starting at a keyframe blends towards the next keyframe
///
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Interpolation {
    /// C1-continuous blend through the neighbouring keyframes
    Spline,

    /// Like `Linear`, but the spline engine never reaches across this keyframe
    /// (marks a hard cut in an otherwise smooth track)
    Bounded,

    /// Straight blend to the next keyframe
    Linear,

    /// The value is frozen until the next keyframe
    Step
}

///
/// Marks a keyframe as opening or closing a loop region
///
/// A `Began` keyframe opens a region that the next `Ended` keyframe closes;
/// regions may nest, with each `Ended` closing the most recently opened one.
///
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum LoopStyle {
    None,
    Began,
    Ended
}

///
/// Descriptive marker carried by a keyframe (sub keyframes are drawn smaller
/// in the timeline editor but behave identically)
///
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum KeyframeLabel {
    Main,
    Sub
}

///
/// A single keyframe on a timeline
///
/// Keyframes are replaced whole when edited rather than mutated field by
/// field, so an edit is always a `(old, new)` pair the surrounding
/// application can record for undo.
///
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct Keyframe {
    /// When this keyframe takes effect
    pub time: RationalTime,

    /// Timing curve for the interval from this keyframe to the next
    pub easing: Easing,

    /// How values blend across that interval
    pub interpolation: Interpolation,

    /// Whether this keyframe opens or closes a loop region
    pub loop_style: LoopStyle,

    /// Descriptive marker (main or sub keyframe)
    pub label: KeyframeLabel
}

///
/// The result of searching a raw keyframe list for the interval enclosing a time
///
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct KeyframeSearch {
    /// Index of the keyframe that starts the enclosing interval
    pub index: usize,

    /// How far past that keyframe the searched time lies
    pub inter_time: RationalTime,

    /// Length of the interval, or 0 for the open interval after the last keyframe
    pub segment_duration: RationalTime
}

impl Keyframe {
    ///
    /// Creates a keyframe at time 0 with default easing and spline interpolation
    ///
    pub fn new() -> Keyframe {
        Keyframe {
            time:           RationalTime::from(0),
            easing:         Easing::default(),
            interpolation:  Interpolation::Spline,
            loop_style:     LoopStyle::None,
            label:          KeyframeLabel::Main
        }
    }

    ///
    /// This keyframe moved to a different time (everything else preserved)
    ///
    pub fn with_time(&self, time: RationalTime) -> Keyframe {
        Keyframe { time, ..*self }
    }

    ///
    /// Finds the keyframe interval enclosing a time in a raw (unexpanded)
    /// keyframe list
    ///
    /// The list must be ascending with its first keyframe at time 0. Times
    /// before the first keyframe resolve to index 0; times after the last
    /// keyframe resolve to the last index with a segment duration of 0, as
    /// the raw list does not know the animation's duration.
    ///
    pub fn index_at(time: RationalTime, keyframes: &[Keyframe]) -> KeyframeSearch {
        let mut next_time = None;

        for (index, keyframe) in keyframes.iter().enumerate().rev() {
            if time >= keyframe.time {
                let segment_duration = next_time
                    .map(|next: RationalTime| next - keyframe.time)
                    .unwrap_or_else(|| RationalTime::from(0));

                return KeyframeSearch {
                    index:              index,
                    inter_time:         time - keyframe.time,
                    segment_duration:   segment_duration
                };
            }

            next_time = Some(keyframe.time);
        }

        KeyframeSearch {
            index:              0,
            inter_time:         RationalTime::from(0),
            segment_duration:   RationalTime::from(0)
        }
    }
}

impl Default for Keyframe {
    fn default() -> Keyframe {
        Keyframe::new()
    }
}
