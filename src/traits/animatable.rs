///
/// Knot times and blend parameters handed to the spline callbacks
///
/// `x0..x3` are the (unevenly spaced) times of the keyframes taking part in
/// the blend, `x` is the eased global time being evaluated and `t` is the
/// eased fraction of the current interval. For the boundary variants the
/// missing outer knot is set to its nearest inner knot (`x0 = x1` for a
/// first spline, `x3 = x2` for a last spline).
///
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SplineX {
    pub x0: f64,
    pub x1: f64,
    pub x2: f64,
    pub x3: f64,
    pub x:  f64,
    pub t:  f64
}

impl SplineX {
    ///
    /// Knots for a 4-point blend with neighbours on both sides
    ///
    pub fn middle(x0: f64, x1: f64, x2: f64, x3: f64, x: f64, t: f64) -> SplineX {
        SplineX { x0, x1, x2, x3, x, t }
    }

    ///
    /// Knots for a 3-point blend at the start of a track (no earlier neighbour)
    ///
    pub fn first(x1: f64, x2: f64, x3: f64, x: f64, t: f64) -> SplineX {
        SplineX { x0: x1, x1, x2, x3, x, t }
    }

    ///
    /// Knots for a 3-point blend at the end of a track (no later neighbour)
    ///
    pub fn last(x0: f64, x1: f64, x2: f64, x: f64, t: f64) -> SplineX {
        SplineX { x0, x1, x2, x3: x2, x, t }
    }
}

///
/// Capability implemented by anything a timeline can animate
///
/// The timeline resolves a query time to keyframe indices and blend
/// parameters and then calls exactly one of these methods; the implementor
/// looks up the values its keyframes stand for and performs the actual
/// interpolation. The engine never reads a result back, so one timeline can
/// drive any value type.
///
/// The spline methods correspond to a C1-continuous monospline through 3 or
/// 4 samples; the 3-point variants are used at track boundaries and at
/// `Bounded` cuts where one flanking sample is unavailable.
///
pub trait Animatable {
    /// Freezes the value at keyframe `f0`
    fn step(&mut self, f0: usize);

    /// Blends linearly from keyframe `f0` to keyframe `f1` by the eased fraction `t`
    fn linear(&mut self, f0: usize, f1: usize, t: f64);

    /// Blends from `f1` to `f2` with only a following neighbour `f3`
    fn first_spline(&mut self, f1: usize, f2: usize, f3: usize, x: SplineX);

    /// Blends from `f1` to `f2` with neighbours on both sides
    fn spline(&mut self, f0: usize, f1: usize, f2: usize, f3: usize, x: SplineX);

    /// Blends from `f1` to `f2` with only a preceding neighbour `f0`
    fn last_spline(&mut self, f0: usize, f1: usize, f2: usize, x: SplineX);
}
