use super::error::*;

use serde::{Serialize, Serializer, Deserialize, Deserializer};
use serde::de::{Error as DeError};

use std::cmp::{Ordering};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign, Mul, Div, Neg};

/// Largest denominator produced when approximating a scalar as a rational time
const MAX_DENOMINATOR: i64 = 10_000_000;

/// Tolerance used when deciding a scalar is close enough to a whole number
const SCALAR_TOLERANCE: f64 = 0.000001;

///
/// An exact point in time, stored as the fraction `numerator/denominator`
///
/// Times are always kept in lowest terms with a positive denominator, so two
/// equal times always have identical representations. Using exact fractions
/// rather than floats means that repeatedly adding frame intervals never
/// drifts, which matters when a timeline is queried at the exact time of a
/// keyframe.
///
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct RationalTime {
    numerator:      i64,
    denominator:    i64
}

///
/// Reduces p/q to lowest terms with a positive denominator
///
/// Arithmetic is carried out at i128 precision so that intermediate products
/// cannot overflow before the reduction brings them back into range.
///
fn reduce(p: i128, q: i128) -> RationalTime {
    debug_assert!(q != 0);

    let sign        = if q < 0 { -1 } else { 1 };
    let divisor     = gcd(p.abs(), q.abs()).max(1);
    let numerator   = sign * p / divisor;
    let denominator = sign * q / divisor;

    debug_assert!(numerator >= i64::MIN as i128 && numerator <= i64::MAX as i128);
    debug_assert!(denominator > 0 && denominator <= i64::MAX as i128);

    RationalTime {
        numerator:      numerator as i64,
        denominator:    denominator as i64
    }
}

///
/// The greatest common divisor of two non-negative numbers
///
fn gcd(mut a: i128, mut b: i128) -> i128 {
    while b != 0 {
        let remainder = a % b;
        a = b;
        b = remainder;
    }
    a
}

impl RationalTime {
    ///
    /// Creates a time from a fraction, reducing it to lowest terms
    ///
    pub fn new(numerator: i64, denominator: i64) -> Result<RationalTime, TimelineError> {
        if denominator == 0 {
            Err(TimelineError::ZeroDenominator)
        } else {
            Ok(reduce(numerator as i128, denominator as i128))
        }
    }

    ///
    /// Approximates a scalar value as a rational time using continued fractions
    ///
    /// The expansion stops once the denominator would exceed an internal limit,
    /// so pathological scalars produce a nearby representable time rather than
    /// an enormous fraction. Non-finite values have no rational counterpart
    /// and map to 0.
    ///
    pub fn from_scalar(value: f64) -> RationalTime {
        if !value.is_finite() {
            return RationalTime::from(0);
        }

        let mut x = value;
        let mut a = x.floor();

        let (mut p1, mut q1) = (a as i64, 1i64);
        if (x-a).abs() < SCALAR_TOLERANCE {
            return reduce(p1 as i128, q1 as i128);
        }

        x = 1.0 / (x-a);
        a = x.floor();

        let (mut p0, mut q0) = (1i64, 0i64);
        loop {
            let ia = a as i64;
            let pn = ia.saturating_mul(p1).saturating_add(p0);
            let qn = ia.saturating_mul(q1).saturating_add(q0);

            if qn > MAX_DENOMINATOR || (x-a).abs() < SCALAR_TOLERANCE {
                return reduce(pn as i128, qn as i128);
            }

            p0 = p1; q0 = q1;
            p1 = pn; q1 = qn;

            x = 1.0 / (x-a);
            a = x.floor();
        }
    }

    /// The numerator of this time, in lowest terms
    pub fn numerator(&self) -> i64 { self.numerator }

    /// The denominator of this time (always positive)
    pub fn denominator(&self) -> i64 { self.denominator }

    /// True if this time is a whole number
    pub fn is_integer(&self) -> bool { self.denominator == 1 }

    ///
    /// The whole-number part of this time, truncated towards zero
    ///
    pub fn integral_part(&self) -> i64 {
        self.numerator / self.denominator
    }

    ///
    /// The part left over after removing the whole-number part
    ///
    pub fn fractional_part(&self) -> RationalTime {
        *self - RationalTime::from(self.integral_part())
    }

    ///
    /// The largest whole number that is not later than this time
    ///
    pub fn floor(&self) -> RationalTime {
        RationalTime::from(self.numerator.div_euclid(self.denominator))
    }

    ///
    /// The smallest whole number that is not earlier than this time
    ///
    pub fn ceil(&self) -> RationalTime {
        RationalTime::from(-(-self.numerator).div_euclid(self.denominator))
    }

    ///
    /// The distance of this time from 0
    ///
    pub fn abs(&self) -> RationalTime {
        RationalTime {
            numerator:      self.numerator.abs(),
            denominator:    self.denominator
        }
    }

    ///
    /// This time as a continuous value, for easing and spline arithmetic
    ///
    pub fn to_scalar(&self) -> f64 {
        (self.numerator as f64) / (self.denominator as f64)
    }
}

impl From<i64> for RationalTime {
    fn from(value: i64) -> RationalTime {
        RationalTime {
            numerator:      value,
            denominator:    1
        }
    }
}

impl Default for RationalTime {
    fn default() -> RationalTime {
        RationalTime::from(0)
    }
}

impl Add for RationalTime {
    type Output = RationalTime;

    fn add(self, rhs: RationalTime) -> RationalTime {
        let (p1, q1) = (self.numerator as i128, self.denominator as i128);
        let (p2, q2) = (rhs.numerator as i128, rhs.denominator as i128);

        reduce(p1*q2 + p2*q1, q1*q2)
    }
}

impl Sub for RationalTime {
    type Output = RationalTime;

    fn sub(self, rhs: RationalTime) -> RationalTime {
        self + (-rhs)
    }
}

impl Mul for RationalTime {
    type Output = RationalTime;

    fn mul(self, rhs: RationalTime) -> RationalTime {
        let (p1, q1) = (self.numerator as i128, self.denominator as i128);
        let (p2, q2) = (rhs.numerator as i128, rhs.denominator as i128);

        reduce(p1*p2, q1*q2)
    }
}

impl Div for RationalTime {
    type Output = RationalTime;

    fn div(self, rhs: RationalTime) -> RationalTime {
        debug_assert!(rhs.numerator != 0);

        let (p1, q1) = (self.numerator as i128, self.denominator as i128);
        let (p2, q2) = (rhs.numerator as i128, rhs.denominator as i128);

        reduce(p1*q2, q1*p2)
    }
}

impl Neg for RationalTime {
    type Output = RationalTime;

    fn neg(self) -> RationalTime {
        RationalTime {
            numerator:      -self.numerator,
            denominator:    self.denominator
        }
    }
}

impl AddAssign for RationalTime {
    fn add_assign(&mut self, rhs: RationalTime) {
        *self = *self + rhs;
    }
}

impl SubAssign for RationalTime {
    fn sub_assign(&mut self, rhs: RationalTime) {
        *self = *self - rhs;
    }
}

impl PartialOrd for RationalTime {
    fn partial_cmp(&self, other: &RationalTime) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RationalTime {
    fn cmp(&self, other: &RationalTime) -> Ordering {
        let lhs = (self.numerator as i128) * (other.denominator as i128);
        let rhs = (other.numerator as i128) * (self.denominator as i128);

        lhs.cmp(&rhs)
    }
}

impl fmt::Display for RationalTime {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self.denominator {
            1 => write!(formatter, "{}", self.numerator),
            _ => write!(formatter, "{}/{}", self.numerator, self.denominator)
        }
    }
}

impl Serialize for RationalTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer {
        (self.numerator, self.denominator).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RationalTime {
    fn deserialize<D>(deserializer: D) -> Result<RationalTime, D::Error>
    where D: Deserializer<'de> {
        let (numerator, denominator) = <(i64, i64)>::deserialize(deserializer)?;

        RationalTime::new(numerator, denominator)
            .map_err(|_| D::Error::custom("rational time denominator cannot be 0"))
    }
}
