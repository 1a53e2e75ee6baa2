pub mod rect;
pub mod rotation;
pub mod vec2;

pub use rect::Rect;
pub use rotation::Rotation;
pub use vec2::{Dir, Vec2};
