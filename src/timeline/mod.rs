mod loop_frames;
mod animation;
mod editor;
mod drag_session;

pub use self::loop_frames::*;
pub use self::animation::*;
pub use self::drag_session::*;
