use crate::model::Color;

/// A rendered raster: `width × height` colors in row-major order, origin at
/// the top-left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl Frame {
    /// A frame filled with one color.
    pub fn filled(width: usize, height: usize, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
        }
    }

    /// Wrap row-major pixels. Returns `None` if the length does not match.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Color>) -> Option<Self> {
        (pixels.len() == width * height).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// Copy `other` into this frame with its top-left corner at `(left, top)`.
    /// Parts that fall outside are clipped.
    pub fn blit(&mut self, other: &Frame, left: usize, top: usize) {
        if left >= self.width {
            return;
        }
        let visible = other.width.min(self.width - left);
        for (row, src) in other.pixels.chunks(other.width.max(1)).enumerate() {
            let y = top + row;
            if y >= self.height {
                break;
            }
            let start = y * self.width + left;
            if let (Some(dst), Some(src)) = (
                self.pixels.get_mut(start..start + visible),
                src.get(..visible),
            ) {
                dst.copy_from_slice(src);
            }
        }
    }

    /// Packed `RGBRGB...` bytes, ready for an image encoder.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| [c.r, c.g, c.b]).collect()
    }

    /// Number of pixels that differ from `color`.
    pub fn count_not(&self, color: Color) -> usize {
        self.pixels.iter().filter(|&&c| c != color).count()
    }
}
