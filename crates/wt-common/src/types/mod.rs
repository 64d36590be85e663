mod color;
mod geometry;

pub use color::Color;
pub use geometry::Point;
