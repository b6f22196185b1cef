//!
//! Library implementing the keyframe timeline for FlowBetween animations
//!
//! A timeline is a sparse list of keyframes plus a duration. Keyframes can
//! be annotated with loop markers, which the timeline flattens into an
//! explicit sequence of 'loop frames' so that time queries never need to be
//! loop-aware. Evaluating a time produces a call into the `Animatable`
//! capability, which decides how to blend the values the keyframes stand
//! for: the engine itself only ever deals in keyframe indices and blend
//! parameters, so one timeline can drive colours, points, transforms and so
//! on without knowing their types.
//!
#![warn(bare_trait_objects)]

#[macro_use]
extern crate serde_derive;
extern crate serde;
extern crate itertools;
extern crate smallvec;
extern crate roots;

mod error;
mod rational;
mod easing;
mod traits;
mod timeline;

pub use self::error::*;
pub use self::rational::*;
pub use self::easing::*;
pub use self::traits::*;
pub use self::timeline::*;
