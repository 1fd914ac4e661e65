pub mod area;
pub mod color;
pub mod function;
pub mod segment;

// Re-export commonly used types at the model level.
pub use area::Area;
pub use color::{Color, Hsl};
pub use function::{Function, FunctionName};
pub use segment::Segment;
