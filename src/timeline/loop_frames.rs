use crate::rational::*;
use crate::traits::*;

use log::warn;
use smallvec::SmallVec;

///
/// One playback instance of a source keyframe after loop flattening
///
/// A keyframe inside a loop region appears once at its own time and then
/// again for every replay of the region, so a query never needs to reason
/// about loops: it just finds the loop frame covering its time.
///
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct LoopFrame {
    /// The source keyframe this frame plays back
    pub keyframe_index: usize,

    /// The absolute time this instance plays at
    pub time: RationalTime,

    /// How many loop regions are active at this frame
    pub loop_count: u32,

    /// How many of those regions this frame is a replay of (0 on a first pass)
    pub looping_count: u32
}

///
/// Flattens a keyframe list into the loop frame sequence that plays it back
///
/// Keyframes outside any loop region map to a single frame at their own
/// time. When an `Ended` keyframe closes a region, the frames emitted since
/// the matching `Began` form the loop body, and the body is replayed
/// (preserving its internal time deltas) until it reaches the next source
/// keyframe, or the end of the animation if the `Ended` keyframe is the last
/// one. In the latter case one extra frame is emitted past the boundary so
/// that a query exactly at the animation's duration still lands inside a
/// replayed segment.
///
/// The keyframe list is expected to be strictly ascending; an `Ended` with
/// no open region is treated as an unlooped keyframe.
///
pub fn expand_loop_frames(keyframes: &[Keyframe], duration: RationalTime) -> Vec<LoopFrame> {
    let mut loop_frames: Vec<LoopFrame> = vec![];
    let mut begin_indexes: SmallVec<[usize; 4]> = SmallVec::new();

    for (source_index, keyframe) in keyframes.iter().enumerate() {
        let begin_index = if keyframe.loop_style == LoopStyle::Ended {
            let begin_index = begin_indexes.pop();
            if begin_index.is_none() {
                // Nothing to close, so this keyframe plays as unlooped
                warn!("Loop ended at {} with no loop in progress", keyframe.time);
            }
            begin_index
        } else {
            None
        };

        if let Some(begin_index) = begin_index {
            let loop_count  = (begin_indexes.len() + 1) as u32;
            let end_time    = keyframe.time;
            let body_end    = loop_frames.len();

            // Replays stop at the next source keyframe (or the end of the animation)
            let next_time   = if source_index+1 >= keyframes.len() {
                duration
            } else {
                keyframes[source_index+1].time
            };

            let replayed    = |frame: &LoopFrame, time| LoopFrame {
                keyframe_index: frame.keyframe_index,
                time:           time,
                loop_count:     loop_count,
                looping_count:  loop_count
            };

            if loop_frames[begin_index].time == end_time {
                // A body spanning no time is emitted once and never replayed
                let once = replayed(&loop_frames[begin_index], end_time);
                loop_frames.push(once);
                continue;
            }

            // Walk the body repeatedly, re-emitting each frame at the running time
            let mut time        = end_time;
            let mut reached_end = false;

            while time <= next_time && !reached_end {
                for body_index in begin_index..body_end {
                    let body_frame  = loop_frames[body_index];
                    loop_frames.push(replayed(&body_frame, time));

                    // The frame after the last body frame is the first replayed frame,
                    // which closes the body's final segment back to the loop start
                    let delta       = loop_frames[body_index+1].time - body_frame.time;
                    time           += delta;

                    if time > next_time {
                        if source_index == keyframes.len()-1 {
                            // Trailing frame so a query at the duration itself resolves
                            let next_frame  = loop_frames[body_index+1];
                            loop_frames.push(replayed(&next_frame, time));
                        }

                        reached_end = true;
                        break;
                    }
                }
            }
        } else {
            let depth       = begin_indexes.len()
                + if keyframe.loop_style == LoopStyle::Began { 1 } else { 0 };
            let loop_count  = depth as u32;

            loop_frames.push(LoopFrame {
                keyframe_index: source_index,
                time:           keyframe.time,
                loop_count:     loop_count,
                looping_count:  loop_count.saturating_sub(1)
            });
        }

        if keyframe.loop_style == LoopStyle::Began {
            begin_indexes.push(loop_frames.len()-1);
        }
    }

    loop_frames
}
