use super::animation::*;
use crate::easing::*;
use crate::error::*;
use crate::rational::*;
use crate::traits::*;

///
/// Structural edits to an animation's keyframe list
///
/// Every mutator validates before it touches anything, so a rejected edit
/// leaves the animation (and its loop frame cache) exactly as it was.
/// Selection indices are remapped alongside the keyframes they refer to.
///
impl Animation {
    ///
    /// Inserts a keyframe at an index, keeping times strictly ascending
    ///
    /// Index 0 is not insertable: the first keyframe is pinned to time 0.
    ///
    pub fn insert(&mut self, keyframe: Keyframe, index: usize) -> Result<(), TimelineError> {
        if index == 0 || index > self.keyframes.len() {
            return Err(TimelineError::InvalidIndex);
        }

        if keyframe.time <= self.keyframes[index-1].time {
            return Err(TimelineError::NonMonotonicTime);
        }
        if index < self.keyframes.len() && keyframe.time >= self.keyframes[index].time {
            return Err(TimelineError::NonMonotonicTime);
        }
        if index == self.keyframes.len() && keyframe.time >= self.duration {
            return Err(TimelineError::DurationTooShort);
        }

        self.keyframes.insert(index, keyframe);
        for selected in self.selection.iter_mut() {
            if *selected >= index { *selected += 1; }
        }

        self.rebuild_loop_frames();
        Ok(())
    }

    ///
    /// Removes the keyframe at an index
    ///
    /// Removing index 0 re-bases the whole timeline: the next keyframe
    /// becomes the new start and every later keyframe shifts earlier by the
    /// removed gap (the duration is left alone).
    ///
    pub fn remove(&mut self, index: usize) -> Result<(), TimelineError> {
        if index >= self.keyframes.len() {
            return Err(TimelineError::InvalidIndex);
        }
        if self.keyframes.len() <= 1 {
            return Err(TimelineError::RemoveLastKeyframe);
        }

        if index == 0 {
            let delta       = self.keyframes[1].time;
            self.keyframes  = self.keyframes.iter().skip(1)
                .map(|keyframe| keyframe.with_time(keyframe.time - delta))
                .collect();
        } else {
            self.keyframes.remove(index);
        }

        self.selection.retain(|selected| *selected != index);
        for selected in self.selection.iter_mut() {
            if *selected > index { *selected -= 1; }
        }

        self.rebuild_loop_frames();
        Ok(())
    }

    ///
    /// Splits the keyframe interval enclosing a time, preserving the shape
    /// of the original easing across the two halves
    ///
    /// The enclosing keyframe keeps its time and gets the first half of its
    /// easing; a new keyframe at the split time gets the second half and the
    /// supplied label. The split time must lie strictly inside an interval
    /// (and inside the animation): splitting exactly on a keyframe is
    /// rejected. Returns the index of the new keyframe.
    ///
    pub fn split(&mut self, time: RationalTime, label: KeyframeLabel) -> Result<usize, TimelineError> {
        let zero    = RationalTime::from(0);
        let search  = Keyframe::index_at(time, &self.keyframes);

        if search.inter_time <= zero || time >= self.duration {
            return Err(TimelineError::InvalidSplitPoint);
        }

        let keyframe        = self.keyframes[search.index];
        let (before_easing, after_easing) = if search.segment_duration != zero {
            keyframe.easing.split((search.inter_time / search.segment_duration).to_scalar())
        } else {
            // Open interval after the last keyframe: nothing to apportion
            (keyframe.easing, Easing::default())
        };

        let before = Keyframe {
            time:           keyframe.time,
            easing:         before_easing,
            interpolation:  keyframe.interpolation,
            loop_style:     keyframe.loop_style,
            label:          keyframe.label
        };
        let after = Keyframe {
            time:           time,
            easing:         after_easing,
            interpolation:  keyframe.interpolation,
            loop_style:     keyframe.loop_style,
            label:          label
        };

        self.keyframes[search.index] = before;
        self.keyframes.insert(search.index+1, after);

        // A selected split keyframe stays selected on both sides of the split
        let was_selected = self.selection.contains(&search.index);
        for selected in self.selection.iter_mut() {
            if *selected > search.index { *selected += 1; }
        }
        if was_selected {
            self.selection.push(search.index+1);
            self.selection.sort();
        }

        self.rebuild_loop_frames();
        Ok(search.index+1)
    }

    ///
    /// Shifts the keyframe at an index (and everything after it) later or
    /// earlier by a delta, preserving the gaps between the shifted keyframes
    ///
    /// The delta is clamped so the shifted keyframe never reaches the one
    /// before it; the duration moves by the same amount. Passing the
    /// keyframe count as the index drags the duration boundary alone.
    /// Index 0 is not retimeable (the first keyframe is pinned to time 0).
    /// Returns the delta that was actually applied.
    ///
    pub fn retime(&mut self, index: usize, delta: RationalTime) -> Result<RationalTime, TimelineError> {
        let applied = delta.max(self.min_retime_delta(index)?);

        for keyframe in self.keyframes[index..].iter_mut() {
            *keyframe = keyframe.with_time(keyframe.time + applied);
        }
        self.duration += applied;

        self.rebuild_loop_frames();
        Ok(applied)
    }

    ///
    /// The smallest delta a retime of the given index may apply (one base
    /// time interval past the preceding keyframe, moving earlier)
    ///
    pub (super) fn min_retime_delta(&self, index: usize) -> Result<RationalTime, TimelineError> {
        if index == 0 || index > self.keyframes.len() {
            return Err(TimelineError::InvalidIndex);
        }

        let this_time = if index == self.keyframes.len() {
            self.duration
        } else {
            self.keyframes[index].time
        };

        Ok(self.keyframes[index-1].time - this_time + self.base_time_interval)
    }

    ///
    /// Replaces the selection, validating every index
    ///
    pub fn set_selection(&mut self, selection: Vec<usize>) -> Result<(), TimelineError> {
        if selection.iter().any(|selected| *selected >= self.keyframes.len()) {
            return Err(TimelineError::SelectionIndexOutOfRange);
        }

        let mut selection = selection;
        selection.sort();
        selection.dedup();

        self.selection = selection;
        Ok(())
    }

    ///
    /// Selects every keyframe
    ///
    pub fn select_all(&mut self) {
        self.selection = (0..self.keyframes.len()).collect();
    }

    ///
    /// Clears the selection
    ///
    pub fn deselect_all(&mut self) {
        self.selection = vec![];
    }

    ///
    /// Adds (or removes, when deselecting) every keyframe whose interval
    /// overlaps a time range to the selection
    ///
    pub fn select_time_range(&mut self, start: RationalTime, end: RationalTime, deselect: bool) {
        let (start, end)    = if start <= end { (start, end) } else { (end, start) };
        let first           = Keyframe::index_at(start, &self.keyframes).index;
        let last            = Keyframe::index_at(end, &self.keyframes).index;

        if deselect {
            self.selection.retain(|selected| *selected < first || *selected > last);
        } else {
            let mut selection = self.selection.clone();
            selection.extend(first..=last);
            selection.sort();
            selection.dedup();
            self.selection = selection;
        }
    }
}
