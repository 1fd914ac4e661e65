use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// RGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };
    /// Canvas background.
    pub const LIGHT_GRAY: Color = Color { r: 211, g: 211, b: 211 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::LIGHT_GRAY
    }
}

/// Hue, saturation and lightness, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    hue: f64,
    saturation: f64,
    lightness: f64,
}

impl Hsl {
    pub fn new(hue: f64, saturation: f64, lightness: f64) -> Result<Self, GraphError> {
        check_unit("hue", hue)?;
        check_unit("saturation", saturation)?;
        check_unit("lightness", lightness)?;
        Ok(Self {
            hue,
            saturation,
            lightness,
        })
    }

    /// Clamp each component into `[0, 1]` instead of failing. Non-finite
    /// components become 0.
    pub fn clamped(hue: f64, saturation: f64, lightness: f64) -> Self {
        let unit = |v: f64| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        Self {
            hue: unit(hue),
            saturation: unit(saturation),
            lightness: unit(lightness),
        }
    }

    pub fn hue(&self) -> f64 {
        self.hue
    }

    pub fn saturation(&self) -> f64 {
        self.saturation
    }

    pub fn lightness(&self) -> f64 {
        self.lightness
    }

    /// Convert to RGB. Channels are clamped to `[0, 1]` and truncated to
    /// `0..=255`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_color(&self) -> Color {
        let (h, s, l) = (self.hue, self.saturation, self.lightness);
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        let channel = |t: f64| {
            let t = if t > 1.0 {
                t - 1.0
            } else if t < 0.0 {
                t + 1.0
            } else {
                t
            };
            let v = if t < 1.0 / 6.0 {
                p + (q - p) * 6.0 * t
            } else if t < 0.5 {
                q
            } else if t < 2.0 / 3.0 {
                p + (q - p) * (2.0 / 3.0 - t) * 6.0
            } else {
                p
            };
            (v.clamp(0.0, 1.0) * 255.0) as u8
        };

        Color::rgb(
            channel(h + 1.0 / 3.0),
            channel(h),
            channel(h - 1.0 / 3.0),
        )
    }
}

fn check_unit(component: &'static str, value: f64) -> Result<(), GraphError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GraphError::ColorOutOfRange { component, value })
    }
}
