mod keyframe;
mod animatable;

pub use self::keyframe::*;
pub use self::animatable::*;
