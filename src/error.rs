use std::error::Error;
use std::fmt;

///
/// Errors that can occur when constructing or editing a timeline
///
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TimelineError {
    /// A rational time was constructed with a denominator of 0
    ZeroDenominator,

    /// An animation must contain at least one keyframe
    EmptyKeyframeList,

    /// Keyframe times must start at 0 and be strictly ascending
    NonMonotonicTime,

    /// The duration of an animation must be later than its last keyframe
    DurationTooShort,

    /// A split point must lie strictly inside a keyframe interval
    InvalidSplitPoint,

    /// The last remaining keyframe of an animation cannot be removed
    RemoveLastKeyframe,

    /// A selection refers to a keyframe index that does not exist
    SelectionIndexOutOfRange,

    /// A keyframe index is out of range for the requested operation
    InvalidIndex
}

impl fmt::Display for TimelineError {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        use self::TimelineError::*;

        match self {
            ZeroDenominator             => write!(formatter, "Rational time denominator cannot be 0"),
            EmptyKeyframeList           => write!(formatter, "An animation must contain at least one keyframe"),
            NonMonotonicTime            => write!(formatter, "Keyframe times must start at 0 and be strictly ascending"),
            DurationTooShort            => write!(formatter, "The animation duration must be later than the last keyframe"),
            InvalidSplitPoint           => write!(formatter, "Keyframes can only be split strictly inside an interval"),
            RemoveLastKeyframe          => write!(formatter, "The last remaining keyframe cannot be removed"),
            SelectionIndexOutOfRange    => write!(formatter, "Selection refers to a keyframe that does not exist"),
            InvalidIndex                => write!(formatter, "Keyframe index is out of range")
        }
    }
}

impl Error for TimelineError { }
