use roots::{find_roots_cubic, Roots};

/// Tolerance used when comparing easing parameters
const PARAM_EPSILON: f64 = 1e-9;

///
/// The cubic bezier weighted basis function
///
#[inline]
fn basis(t: f64, w1: f64, w2: f64, w3: f64, w4: f64) -> f64 {
    let t_squared           = t*t;
    let t_cubed             = t_squared*t;

    let one_minus_t         = 1.0-t;
    let one_minus_t_squared = one_minus_t*one_minus_t;
    let one_minus_t_cubed   = one_minus_t_squared*one_minus_t;

    w1*one_minus_t_cubed
        + 3.0*w2*one_minus_t_squared*t
        + 3.0*w3*one_minus_t*t_squared
        + w4*t_cubed
}

///
/// Subdivides the weights of a cubic bezier at a particular parameter,
/// returning the weights of the two component curves (de Casteljau)
///
fn subdivide4(t: f64, w1: f64, w2: f64, w3: f64, w4: f64) ->
    ((f64, f64, f64, f64),
    (f64, f64, f64, f64)) {
    // Weights (from de casteljau)
    let wn1 = (1.0-t)*w1 + t*w2;
    let wn2 = (1.0-t)*w2 + t*w3;
    let wn3 = (1.0-t)*w3 + t*w4;

    // Further refine the weights
    let wnn1 = (1.0-t)*wn1 + t*wn2;
    let wnn2 = (1.0-t)*wn2 + t*wn3;

    // The point at which the two curves join
    let p = (1.0-t)*wnn1 + t*wnn2;

    ((w1, wn1, wnn1, p), (p, wnn2, wn3, w4))
}

///
/// Solves for the parameter where a single-dimension bezier with unit
/// endpoint weights evaluates to `p`
///
fn solve_unit_basis_for_t(w2: f64, w3: f64, p: f64) -> Option<f64> {
    // Compute the coefficients for the cubic bezier function (w1 = 0, w4 = 1)
    let d = -p;
    let c = 3.0*w2;
    let b = 3.0*(w3-w2)-c;
    let a = 1.0-c-b;

    let roots = find_roots_cubic(a, b, c, d);
    let roots = match roots {
        Roots::No(_)    => vec![],
        Roots::One(r)   => r.to_vec(),
        Roots::Two(r)   => r.to_vec(),
        Roots::Three(r) => r.to_vec(),
        Roots::Four(r)  => r.to_vec()
    };

    // Clip to 0/1 for small ranges outside, then pick the first root inside the range
    let mut nearest: Option<(f64, f64)> = None;

    for root in roots {
        let root = if root < 0.0 && root > -0.001 { 0.0 }
            else if root > 1.0 && root < 1.001 { 1.0 }
            else { root };

        if root >= 0.0 && root <= 1.0 {
            return Some(root);
        }

        // Remember the nearest out-of-range root in case none lands inside
        let distance = if root < 0.0 { -root } else { root-1.0 };
        if nearest.map(|(_, best)| distance < best).unwrap_or(true) {
            nearest = Some((root.max(0.0).min(1.0), distance));
        }
    }

    nearest.map(|(root, _)| root)
}

///
/// A timing curve for a single keyframe interval
///
/// The curve is the cubic bezier from (0,0) to (1,1) through two interior
/// control points: x is the fraction of the interval that has elapsed and y
/// is the fraction of the value change that should have been applied. The
/// constructor keeps the x coordinates of the control points in [0,1] so a
/// curve built from user input always has exactly one y for any elapsed
/// fraction; curves produced by `split` can carry interior x weights just
/// outside that range (the rescaled half of a single-valued curve is still
/// single-valued).
///
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct Easing {
    cp0: (f64, f64),
    cp1: (f64, f64)
}

impl Default for Easing {
    fn default() -> Easing {
        Easing {
            cp0: (0.0, 0.0),
            cp1: (1.0, 1.0)
        }
    }
}

impl Easing {
    ///
    /// Creates an easing curve with the specified interior control points
    ///
    pub fn new(cp0: (f64, f64), cp1: (f64, f64)) -> Easing {
        Easing {
            cp0: (cp0.0.max(0.0).min(1.0), cp0.1),
            cp1: (cp1.0.max(0.0).min(1.0), cp1.1)
        }
    }

    ///
    /// The two interior control points of this curve
    ///
    pub fn control_points(&self) -> ((f64, f64), (f64, f64)) {
        (self.cp0, self.cp1)
    }

    ///
    /// True if this is the default curve (both control points at the curve endpoints)
    ///
    pub fn is_default(&self) -> bool {
        *self == Easing::default()
    }

    ///
    /// True if this curve leaves its input unchanged
    ///
    pub fn is_linear(&self) -> bool {
        (self.cp0.0-self.cp0.1).abs() < PARAM_EPSILON
            && (self.cp1.0-self.cp1.1).abs() < PARAM_EPSILON
    }

    ///
    /// Finds the bezier parameter where the curve reaches the elapsed fraction `t`
    ///
    fn parameter_for(&self, t: f64) -> f64 {
        solve_unit_basis_for_t(self.cp0.0, self.cp1.0, t).unwrap_or(t)
    }

    ///
    /// Maps a linear progress fraction in [0,1] to its eased progress
    ///
    pub fn convert(&self, t: f64) -> f64 {
        let t = t.max(0.0).min(1.0);

        if self.is_linear() {
            t
        } else {
            let u = self.parameter_for(t);
            basis(u, 0.0, self.cp0.1, self.cp1.1, 1.0)
        }
    }

    ///
    /// Splits this curve at the elapsed fraction `at`, producing two curves
    /// whose concatenation reproduces the shape of the original
    ///
    /// The first curve covers the original's [0, at] and the second covers
    /// [at, 1], each renormalized so both map [0,1] to [0,1]. Splitting at
    /// (or outside) either end leaves the curve on one side and the default
    /// curve on the other.
    ///
    pub fn split(&self, at: f64) -> (Easing, Easing) {
        if at <= 0.0 {
            return (Easing::default(), *self);
        } else if at >= 1.0 {
            return (*self, Easing::default());
        }

        // Subdivide the x and y weights at the parameter where x reaches `at`
        let u                   = self.parameter_for(at);
        let ((_, xa2, xa3, x_mid), (_, xb2, xb3, _)) = subdivide4(u, 0.0, self.cp0.0, self.cp1.0, 1.0);
        let ((_, ya2, ya3, y_mid), (_, yb2, yb3, _)) = subdivide4(u, 0.0, self.cp0.1, self.cp1.1, 1.0);

        // A join at either extreme leaves one side with no room to vary
        if y_mid.abs() < PARAM_EPSILON {
            return (Easing::default(), *self);
        } else if (1.0-y_mid).abs() < PARAM_EPSILON {
            return (*self, Easing::default());
        }

        // Rescale each half back into the unit square. The rescaled control
        // points are used as-is: clamping them would distort the halves
        let before = Easing {
            cp0: (xa2/x_mid, ya2/y_mid),
            cp1: (xa3/x_mid, ya3/y_mid)
        };
        let after  = Easing {
            cp0: ((xb2-x_mid)/(1.0-x_mid), (yb2-y_mid)/(1.0-y_mid)),
            cp1: ((xb3-x_mid)/(1.0-x_mid), (yb3-y_mid)/(1.0-y_mid))
        };

        (before, after)
    }
}
