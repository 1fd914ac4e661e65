pub mod frame;
pub mod renderer;
pub mod zbuffer;

pub use frame::Frame;
pub use renderer::{render, RenderOptions, Sampling, ZOrder};
