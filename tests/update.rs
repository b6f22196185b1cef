extern crate flo_timeline;

use flo_timeline::*;

///
/// Animatable that records every call the timeline dispatches to it
///
#[derive(Clone, PartialEq, Debug)]
enum Call {
    Step(usize),
    Linear(usize, usize, f64),
    FirstSpline(usize, usize, usize, SplineX),
    Spline(usize, usize, usize, usize, SplineX),
    LastSpline(usize, usize, usize, SplineX)
}

#[derive(Default)]
struct Recorder {
    calls: Vec<Call>
}

impl Animatable for Recorder {
    fn step(&mut self, f0: usize) {
        self.calls.push(Call::Step(f0));
    }

    fn linear(&mut self, f0: usize, f1: usize, t: f64) {
        self.calls.push(Call::Linear(f0, f1, t));
    }

    fn first_spline(&mut self, f1: usize, f2: usize, f3: usize, x: SplineX) {
        self.calls.push(Call::FirstSpline(f1, f2, f3, x));
    }

    fn spline(&mut self, f0: usize, f1: usize, f2: usize, f3: usize, x: SplineX) {
        self.calls.push(Call::Spline(f0, f1, f2, f3, x));
    }

    fn last_spline(&mut self, f0: usize, f1: usize, f2: usize, x: SplineX) {
        self.calls.push(Call::LastSpline(f0, f1, f2, x));
    }
}

fn time(t: i64) -> RationalTime {
    RationalTime::from(t)
}

fn keyframe_at(t: i64, interpolation: Interpolation) -> Keyframe {
    Keyframe {
        time:           time(t),
        interpolation:  interpolation,
        ..Keyframe::new()
    }
}

fn spline_animation() -> Animation {
    // Keyframes at 0, 1, 2 with spline interpolation, duration 3
    Animation::new(vec![
        keyframe_at(0, Interpolation::Spline),
        keyframe_at(1, Interpolation::Spline),
        keyframe_at(2, Interpolation::Spline)
    ], time(3)).unwrap()
}

#[test]
fn first_segment_uses_first_spline() {
    let mut animation   = spline_animation();
    let mut recorder    = Recorder::default();

    animation.update(RationalTime::new(1, 2).unwrap(), &mut recorder);

    match &recorder.calls[..] {
        [Call::FirstSpline(0, 1, 2, x)] => {
            assert!(x.x1 == 0.0 && x.x2 == 1.0 && x.x3 == 2.0);
            assert!(x.x > x.x1 && x.x < x.x2);
            assert!((x.t - 0.5).abs() < 1e-9);
        }
        other => panic!("Expected first_spline(0, 1, 2), got {:?}", other)
    }

    assert!(animation.is_interpolated());
    assert!(animation.edit_keyframe_index() == 0);
}

#[test]
fn middle_segment_needs_only_a_previous_neighbour() {
    let mut animation   = spline_animation();
    let mut recorder    = Recorder::default();

    animation.update(RationalTime::new(3, 2).unwrap(), &mut recorder);

    match &recorder.calls[..] {
        [Call::LastSpline(0, 1, 2, x)] => {
            assert!(x.x0 == 0.0 && x.x1 == 1.0 && x.x2 == 2.0);
            assert!(x.x > x.x1 && x.x < x.x2);
        }
        other => panic!("Expected last_spline(0, 1, 2), got {:?}", other)
    }
}

#[test]
fn four_keyframes_use_the_full_spline_in_the_middle() {
    let mut animation = Animation::new(vec![
        keyframe_at(0, Interpolation::Spline),
        keyframe_at(1, Interpolation::Spline),
        keyframe_at(2, Interpolation::Spline),
        keyframe_at(3, Interpolation::Spline)
    ], time(4)).unwrap();
    let mut recorder = Recorder::default();

    animation.update(RationalTime::new(3, 2).unwrap(), &mut recorder);

    match &recorder.calls[..] {
        [Call::Spline(0, 1, 2, 3, x)] => {
            assert!(x.x0 == 0.0 && x.x1 == 1.0 && x.x2 == 2.0 && x.x3 == 3.0);
        }
        other => panic!("Expected spline(0, 1, 2, 3), got {:?}", other)
    }
}

#[test]
fn query_at_duration_steps_on_the_last_keyframe() {
    let mut animation   = spline_animation();
    let mut recorder    = Recorder::default();

    animation.update(time(3), &mut recorder);

    assert!(recorder.calls == vec![Call::Step(2)]);
    assert!(!animation.is_interpolated());
    assert!(animation.edit_keyframe_index() == 2);
}

#[test]
fn last_segment_steps() {
    // The last loop frame has no following frame to blend towards
    let mut animation   = spline_animation();
    let mut recorder    = Recorder::default();

    animation.update(RationalTime::new(5, 2).unwrap(), &mut recorder);

    assert!(recorder.calls == vec![Call::Step(2)]);
}

#[test]
fn query_on_a_keyframe_steps() {
    let mut animation   = spline_animation();
    let mut recorder    = Recorder::default();

    animation.update(time(1), &mut recorder);

    assert!(recorder.calls == vec![Call::Step(1)]);
}

#[test]
fn step_interpolation_freezes_the_value() {
    let mut animation = Animation::new(vec![
        keyframe_at(0, Interpolation::Step),
        keyframe_at(1, Interpolation::Spline),
        keyframe_at(2, Interpolation::Spline)
    ], time(3)).unwrap();
    let mut recorder = Recorder::default();

    animation.update(RationalTime::new(1, 2).unwrap(), &mut recorder);

    assert!(recorder.calls == vec![Call::Step(0)]);
}

#[test]
fn two_keyframes_always_blend_linearly() {
    let mut animation = Animation::new(vec![
        keyframe_at(0, Interpolation::Spline),
        keyframe_at(2, Interpolation::Spline)
    ], time(4)).unwrap();
    let mut recorder = Recorder::default();

    animation.update(time(1), &mut recorder);

    assert!(recorder.calls == vec![Call::Linear(0, 1, 0.5)]);
}

#[test]
fn linear_interpolation_applies_the_easing() {
    let easing          = Easing::new((0.42, 0.0), (0.58, 1.0));
    let mut keyframe0   = keyframe_at(0, Interpolation::Linear);
    keyframe0.easing    = easing;

    let mut animation = Animation::new(vec![
        keyframe0,
        keyframe_at(2, Interpolation::Linear),
        keyframe_at(4, Interpolation::Linear)
    ], time(6)).unwrap();
    let mut recorder = Recorder::default();

    animation.update(RationalTime::new(1, 2).unwrap(), &mut recorder);

    match &recorder.calls[..] {
        [Call::Linear(0, 1, t)] => assert!((t - easing.convert(0.25)).abs() < 1e-9),
        other => panic!("Expected linear(0, 1), got {:?}", other)
    }
}

#[test]
fn bounded_next_keyframe_suppresses_the_following_neighbour() {
    // Bounded on keyframe 1 stops the spline reaching past it from the left
    let mut animation = Animation::new(vec![
        keyframe_at(0, Interpolation::Spline),
        keyframe_at(1, Interpolation::Bounded),
        keyframe_at(2, Interpolation::Spline)
    ], time(3)).unwrap();
    let mut recorder = Recorder::default();

    animation.update(RationalTime::new(1, 2).unwrap(), &mut recorder);

    // With neither neighbour eligible this degrades all the way to linear
    match &recorder.calls[..] {
        [Call::Linear(0, 1, _)] => (),
        other => panic!("Expected linear fallback, got {:?}", other)
    }
}

#[test]
fn bounded_current_keyframe_suppresses_the_preceding_neighbour() {
    let mut animation = Animation::new(vec![
        keyframe_at(0, Interpolation::Spline),
        keyframe_at(1, Interpolation::Bounded),
        keyframe_at(2, Interpolation::Spline),
        keyframe_at(3, Interpolation::Spline)
    ], time(4)).unwrap();
    let mut recorder = Recorder::default();

    animation.update(RationalTime::new(3, 2).unwrap(), &mut recorder);

    // The segment starts at the bounded keyframe, so only the next neighbour is used
    match &recorder.calls[..] {
        [Call::FirstSpline(1, 2, 3, _)] => (),
        other => panic!("Expected first_spline(1, 2, 3), got {:?}", other)
    }
}

#[test]
fn non_default_easing_maps_the_global_spline_time() {
    let easing          = Easing::new((0.42, 0.0), (0.58, 1.0));
    let mut keyframe1   = keyframe_at(1, Interpolation::Spline);
    keyframe1.easing    = easing;

    let mut animation = Animation::new(vec![
        keyframe_at(0, Interpolation::Spline),
        keyframe1,
        keyframe_at(3, Interpolation::Spline),
        keyframe_at(4, Interpolation::Spline)
    ], time(5)).unwrap();
    let mut recorder = Recorder::default();

    animation.update(time(2), &mut recorder);

    match &recorder.calls[..] {
        [Call::Spline(0, 1, 2, 3, x)] => {
            // x is the eased local fraction scaled back into the segment
            let expected = easing.convert(0.5)*2.0 + 1.0;
            assert!((x.x - expected).abs() < 1e-9);
            assert!((x.t - easing.convert(0.5)).abs() < 1e-9);
        }
        other => panic!("Expected spline(0, 1, 2, 3), got {:?}", other)
    }
}

#[test]
fn default_easing_keeps_the_global_time_continuous() {
    let mut animation = Animation::new(vec![
        keyframe_at(0, Interpolation::Spline),
        keyframe_at(1, Interpolation::Spline),
        keyframe_at(3, Interpolation::Spline),
        keyframe_at(4, Interpolation::Spline)
    ], time(5)).unwrap();
    let mut recorder = Recorder::default();

    animation.update(time(2), &mut recorder);

    match &recorder.calls[..] {
        [Call::Spline(0, 1, 2, 3, x)] => assert!((x.x - 2.0).abs() < 1e-9),
        other => panic!("Expected spline(0, 1, 2, 3), got {:?}", other)
    }
}

#[test]
fn update_is_idempotent_for_an_unmodified_animation() {
    let mut animation   = spline_animation();
    let query           = RationalTime::new(1, 2).unwrap();

    let mut first       = Recorder::default();
    let mut second      = Recorder::default();
    animation.update(query, &mut first);
    animation.update(query, &mut second);

    assert!(first.calls == second.calls);
}

#[test]
fn loop_seam_favours_the_later_frame() {
    // A replay lands exactly on the next source keyframe's time; a query
    // there resolves to the source keyframe, not the replay
    let mut animation = Animation::new(vec![
        Keyframe { time: time(0), loop_style: LoopStyle::Began, ..Keyframe::new() },
        Keyframe { time: time(1), loop_style: LoopStyle::None, ..Keyframe::new() },
        Keyframe { time: time(3), loop_style: LoopStyle::Ended, ..Keyframe::new() },
        Keyframe { time: time(9), loop_style: LoopStyle::None, ..Keyframe::new() }
    ], time(12)).unwrap();
    let mut recorder = Recorder::default();

    animation.update(time(9), &mut recorder);

    assert!(recorder.calls == vec![Call::Step(3)]);
    assert!(animation.edit_keyframe_index() == 3);
}

#[test]
fn looped_animation_interpolates_inside_a_replay() {
    let mut animation = Animation::new(vec![
        Keyframe { time: time(0), loop_style: LoopStyle::Began, ..Keyframe::new() },
        Keyframe { time: time(2), loop_style: LoopStyle::Ended, ..Keyframe::new() },
        Keyframe { time: time(9), loop_style: LoopStyle::None, ..Keyframe::new() }
    ], time(12)).unwrap();
    let mut recorder = Recorder::default();

    // t = 5 falls inside the replay segment 4..6 of keyframe 0
    animation.update(time(5), &mut recorder);

    assert!(animation.edit_keyframe_index() == 0);
    assert!(animation.is_interpolated());
}

#[test]
fn locate_finds_the_covering_frame() {
    let animation = spline_animation();

    let search = animation.locate(RationalTime::new(3, 2).unwrap());
    assert!(search.keyframe_index == 1);
    assert!(search.inter_time == RationalTime::new(1, 2).unwrap());
    assert!(search.segment_duration == time(1));

    // The final segment runs to the duration
    let search = animation.locate(RationalTime::new(5, 2).unwrap());
    assert!(search.keyframe_index == 2);
    assert!(search.segment_duration == time(1));
}
