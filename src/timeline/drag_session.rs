use super::animation::*;
use crate::error::*;
use crate::rational::*;
use crate::traits::*;

///
/// An in-progress retime drag against an animation
///
/// A session snapshots the keyframes and duration when the drag begins.
/// Every preview re-applies the current delta to that snapshot (not to the
/// previous preview), so previews are idempotent and a cancel is a plain
/// restore. Committing applies the final delta and hands back the before
/// and after states for the surrounding application's undo records; the
/// engine itself stays undo-agnostic.
///
/// The session holds no reference to the animation it was begun on: the
/// caller passes the animation back in to `preview`, `commit` and `cancel`,
/// and must pass the same one each time. Applying a session to a different
/// animation replaces that animation's keyframes with the session's
/// snapshot.
///
#[derive(Clone, Debug)]
pub struct DragSession {
    /// The keyframe being dragged (the keyframe count means the duration boundary)
    index: usize,

    /// Keyframes as they were when the drag began
    old_keyframes: Vec<Keyframe>,

    /// Duration as it was when the drag began
    old_duration: RationalTime,

    /// Smallest delta the drag may apply
    min_delta: RationalTime
}

///
/// The before and after states produced by committing a drag session
///
#[derive(Clone, PartialEq, Debug)]
pub struct RetimeSnapshot {
    pub old_keyframes:  Vec<Keyframe>,
    pub old_duration:   RationalTime,
    pub new_keyframes:  Vec<Keyframe>,
    pub new_duration:   RationalTime
}

impl Animation {
    ///
    /// Begins a retime drag of the keyframe at an index (or of the duration
    /// boundary, when the index is the keyframe count)
    ///
    pub fn begin_retime(&self, index: usize) -> Result<DragSession, TimelineError> {
        let min_delta = self.min_retime_delta(index)?;

        Ok(DragSession {
            index:          index,
            old_keyframes:  self.keyframes.clone(),
            old_duration:   self.duration,
            min_delta:      min_delta
        })
    }
}

impl DragSession {
    /// The keyframe index this session is dragging
    pub fn index(&self) -> usize { self.index }

    /// The smallest delta this session may apply
    pub fn min_delta(&self) -> RationalTime { self.min_delta }

    ///
    /// The keyframes and duration the snapshot produces for a delta
    ///
    fn apply(&self, delta: RationalTime) -> (Vec<Keyframe>, RationalTime, RationalTime) {
        let applied         = delta.max(self.min_delta);
        let mut keyframes   = self.old_keyframes.clone();

        for keyframe in keyframes[self.index..].iter_mut() {
            *keyframe = keyframe.with_time(keyframe.time + applied);
        }

        (keyframes, self.old_duration + applied, applied)
    }

    ///
    /// Previews the drag at a delta, mutating the animation in place
    ///
    /// Returns the delta that was actually applied after clamping.
    ///
    pub fn preview(&self, animation: &mut Animation, delta: RationalTime) -> RationalTime {
        let (keyframes, duration, applied) = self.apply(delta);

        animation.keyframes = keyframes;
        animation.duration  = duration;
        animation.rebuild_loop_frames();

        applied
    }

    ///
    /// Ends the drag at a final delta, returning the before and after states
    ///
    pub fn commit(self, animation: &mut Animation, delta: RationalTime) -> RetimeSnapshot {
        let (keyframes, duration, _applied) = self.apply(delta);

        animation.keyframes = keyframes.clone();
        animation.duration  = duration;
        animation.rebuild_loop_frames();

        RetimeSnapshot {
            old_keyframes:  self.old_keyframes,
            old_duration:   self.old_duration,
            new_keyframes:  keyframes,
            new_duration:   duration
        }
    }

    ///
    /// Abandons the drag, restoring the animation to its snapshot
    ///
    pub fn cancel(self, animation: &mut Animation) {
        animation.keyframes = self.old_keyframes;
        animation.duration  = self.old_duration;
        animation.rebuild_loop_frames();
    }
}
