mod rect;
mod shape;
mod transform;

pub use rect::Rect;
pub use shape::Shape;
pub use transform::Transform2D;
pub use glam::Vec2;
