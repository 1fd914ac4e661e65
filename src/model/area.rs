use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// Axis-aligned rectangle of the complex plane.
///
/// Constructed via `Area::new`, which requires the top-right corner to lie
/// strictly above and to the right of the bottom-left one, so `width` and
/// `height` are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AreaRaw")]
pub struct Area {
    #[serde(with = "pair")]
    left_bottom: Complex64,
    #[serde(with = "pair")]
    right_top: Complex64,
}

#[derive(Deserialize)]
struct AreaRaw {
    #[serde(with = "pair")]
    left_bottom: Complex64,
    #[serde(with = "pair")]
    right_top: Complex64,
}

impl TryFrom<AreaRaw> for Area {
    type Error = GraphError;
    fn try_from(raw: AreaRaw) -> Result<Self, GraphError> {
        Area::new(raw.left_bottom, raw.right_top)
    }
}

impl Area {
    pub fn new(left_bottom: Complex64, right_top: Complex64) -> Result<Self, GraphError> {
        // Negated comparisons so NaN corners are rejected too.
        if !(right_top.re > left_bottom.re && right_top.im > left_bottom.im) {
            return Err(GraphError::InvalidArea {
                left_bottom: (left_bottom.re, left_bottom.im),
                right_top: (right_top.re, right_top.im),
            });
        }
        Ok(Self {
            left_bottom,
            right_top,
        })
    }

    /// Square `[-size/2, size/2]` on both axes.
    pub fn centered(size: f64) -> Result<Self, GraphError> {
        let half = size / 2.0;
        Area::new(Complex64::new(-half, -half), Complex64::new(half, half))
    }

    pub fn left_bottom(&self) -> Complex64 {
        self.left_bottom
    }

    pub fn width(&self) -> f64 {
        self.right_top.re - self.left_bottom.re
    }

    pub fn height(&self) -> f64 {
        self.right_top.im - self.left_bottom.im
    }

    /// Map `c` onto a `width × height` raster with the origin in the top-left
    /// corner. Returns `None` for non-finite points and points that fall
    /// outside the raster.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn to_pixel(&self, c: Complex64, width: usize, height: usize) -> Option<(usize, usize)> {
        if !c.is_finite() {
            return None;
        }
        let x = ((c.re - self.left_bottom.re) / self.width() * width as f64).floor();
        let y = ((c.im - self.left_bottom.im) / self.height() * height as f64).floor();
        let in_range = |v: f64, size: usize| v >= 0.0 && v < size as f64;
        if !in_range(x, width) || !in_range(y, height) {
            return None;
        }
        // Both values are integral and inside [0, size), so the casts are exact.
        let (x, y) = (x as usize, y as usize);
        Some((x, height - 1 - y))
    }
}

/// Complex numbers as `[re, im]` in settings files.
mod pair {
    use num_complex::Complex64;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(c: &Complex64, serializer: S) -> Result<S::Ok, S::Error> {
        [c.re, c.im].serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Complex64, D::Error> {
        let [re, im] = <[f64; 2]>::deserialize(deserializer)?;
        Ok(Complex64::new(re, im))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn dimensions_are_positive() {
        let area = Area::new(c(-1.0, -2.0), c(3.0, 1.0)).unwrap();
        assert_eq!(area.width(), 4.0);
        assert_eq!(area.height(), 3.0);
    }

    #[test]
    fn rejects_degenerate_corners() {
        assert!(Area::new(c(0.0, 0.0), c(0.0, 1.0)).is_err());
        assert!(Area::new(c(0.0, 0.0), c(1.0, 0.0)).is_err());
        assert!(Area::new(c(1.0, 1.0), c(0.0, 0.0)).is_err());
        assert!(Area::new(c(f64::NAN, 0.0), c(1.0, 1.0)).is_err());
        assert!(Area::centered(0.0).is_err());
        assert!(Area::centered(-2.0).is_err());
    }

    #[test]
    fn centered_square() {
        let area = Area::centered(6.0).unwrap();
        assert_eq!(area.left_bottom(), c(-3.0, -3.0));
        assert_eq!(area.width(), 6.0);
        assert_eq!(area.height(), 6.0);
    }

    #[test]
    fn pixel_origin_is_top_left() {
        let area = Area::new(c(-1.0, -1.0), c(1.0, 1.0)).unwrap();
        assert_eq!(area.to_pixel(c(-1.0, -1.0), 4, 4), Some((0, 3)));
        assert_eq!(area.to_pixel(c(-1.0, 0.99), 4, 4), Some((0, 0)));
        assert_eq!(area.to_pixel(c(0.0, 0.0), 4, 4), Some((2, 1)));
        assert_eq!(area.to_pixel(c(0.99, -0.99), 4, 4), Some((3, 3)));
    }

    #[test]
    fn out_of_raster_points_are_dropped() {
        let area = Area::new(c(-1.0, -1.0), c(1.0, 1.0)).unwrap();
        // Right and top edges map one past the last pixel.
        assert_eq!(area.to_pixel(c(1.0, 0.0), 4, 4), None);
        assert_eq!(area.to_pixel(c(0.0, 1.0), 4, 4), None);
        // (1+i)^2 = 2i, well outside the preimage.
        assert_eq!(area.to_pixel(c(0.0, 2.0), 4, 4), None);
        // Small negative offsets floor to -1, not 0.
        assert_eq!(area.to_pixel(c(-1.0001, 0.0), 4, 4), None);
        assert_eq!(area.to_pixel(c(f64::NAN, 0.0), 4, 4), None);
        assert_eq!(area.to_pixel(c(f64::INFINITY, 0.0), 4, 4), None);
    }

    #[test]
    fn serde_validates() {
        let area = Area::centered(2.0).unwrap();
        let json = serde_json::to_string(&area).unwrap();
        assert_eq!(json, r#"{"left_bottom":[-1.0,-1.0],"right_top":[1.0,1.0]}"#);
        let back: Area = serde_json::from_str(&json).unwrap();
        assert_eq!(back, area);

        let bad = r#"{"left_bottom":[1.0,1.0],"right_top":[0.0,0.0]}"#;
        assert!(serde_json::from_str::<Area>(bad).is_err());
    }
}
