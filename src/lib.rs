pub mod engine;
pub mod error;
pub mod expr;
pub mod model;
pub mod plot;
pub mod settings;
