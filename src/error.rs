use std::fmt;

use serde::Serialize;

use crate::expr::error::ParseError;
use crate::engine::renderer::{MAX_MESH_COUNT, MAX_RASTER_SIDE, MAX_SAMPLES_PER_AXIS};

/// Structured error type for the crate. Construction errors, parse errors and
/// I/O failures all surface through this enum so the CLI can report them
/// uniformly (plain text or JSON).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "code", content = "detail")]
pub enum GraphError {
    /// Top-right corner is not strictly above and to the right of bottom-left.
    InvalidArea { left_bottom: (f64, f64), right_top: (f64, f64) },
    InvalidSegment { min: f64, max: f64 },
    ColorOutOfRange { component: &'static str, value: f64 },
    InvalidName { pattern: String },
    InvalidRaster { width: usize, height: usize },
    InvalidSampling { real: usize, imaginary: usize },
    InvalidMesh { count: usize, thickness: f64 },
    Parse { message: String, start: usize, end: usize },
    Io { message: String },
    Settings { message: String },
    Image { message: String },
    ThreadPool { message: String },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::InvalidArea { left_bottom, right_top } => write!(
                f,
                "Invalid area: right-top ({}, {}) should have greater real and imaginary \
                 parts than left-bottom ({}, {})",
                right_top.0, right_top.1, left_bottom.0, left_bottom.1
            ),
            GraphError::InvalidSegment { min, max } => {
                write!(f, "Invalid segment [{min}; {max}]: bounds must be finite and min <= max")
            }
            GraphError::ColorOutOfRange { component, value } => {
                write!(f, "{component} = {value} should be in range [0; 1]")
            }
            GraphError::InvalidName { pattern } => write!(
                f,
                "Name pattern \"{pattern}\" should contain \"{}\" as argument placeholder",
                crate::model::function::ARGUMENT_PLACEHOLDER
            ),
            GraphError::InvalidRaster { width, height } => {
                write!(
                    f,
                    "Invalid raster size {width}x{height}: sides must be in [1; {MAX_RASTER_SIDE}]"
                )
            }
            GraphError::InvalidSampling { real, imaginary } => write!(
                f,
                "Invalid sample grid {real}x{imaginary}: counts must be in [1; {MAX_SAMPLES_PER_AXIS}]"
            ),
            GraphError::InvalidMesh { count, thickness } => write!(
                f,
                "Invalid mesh ({count} lines, thickness {thickness}): at most {MAX_MESH_COUNT} lines \
                 of finite non-negative thickness"
            ),
            GraphError::Parse { message, start, .. } => {
                write!(f, "Invalid expression at {start}: {message}")
            }
            GraphError::Io { message } => write!(f, "I/O error: {message}"),
            GraphError::Settings { message } => write!(f, "Settings error: {message}"),
            GraphError::Image { message } => write!(f, "Image error: {message}"),
            GraphError::ThreadPool { message } => write!(f, "Thread pool error: {message}"),
        }
    }
}

impl std::error::Error for GraphError {}

impl From<ParseError> for GraphError {
    fn from(e: ParseError) -> Self {
        GraphError::Parse {
            message: e.message,
            start: e.span.start,
            end: e.span.end,
        }
    }
}

impl From<std::io::Error> for GraphError {
    fn from(e: std::io::Error) -> Self {
        GraphError::Io {
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for GraphError {
    fn from(e: serde_json::Error) -> Self {
        GraphError::Settings {
            message: e.to_string(),
        }
    }
}

impl From<image::ImageError> for GraphError {
    fn from(e: image::ImageError) -> Self {
        GraphError::Image {
            message: e.to_string(),
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for GraphError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        GraphError::ThreadPool {
            message: e.to_string(),
        }
    }
}
