//! Two-panel plot: the colored preimage on the left, the function's image of
//! it on the right, both drawn over the same area of the complex plane.

use std::path::Path;

use serde::Serialize;

use crate::engine::renderer::{check_raster, Sampling};
use crate::engine::{render, Frame, RenderOptions};
use crate::error::GraphError;
use crate::model::{Area, Color, Function};

/// Gap between the canvas border and a panel.
pub const MARGIN: usize = 10;
/// Extra gap between the two panels.
pub const SPACE_BETWEEN: usize = 100;

/// Where a panel sits on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Panel {
    pub left: usize,
    pub top: usize,
    pub width: usize,
    pub height: usize,
}

/// Canvas with a preimage panel and an image panel.
pub struct Plot {
    canvas: Frame,
    preimage: Panel,
    image: Panel,
}

impl Plot {
    /// An empty plot whose panels are `width × height` each.
    pub fn new(width: usize, height: usize, background: Color) -> Result<Self, GraphError> {
        check_raster(width, height)?;
        let canvas_width = width
            .checked_mul(2)
            .and_then(|w| w.checked_add(4 * MARGIN + SPACE_BETWEEN));
        let canvas_height = height.checked_add(2 * MARGIN);
        let (Some(canvas_width), Some(canvas_height)) = (canvas_width, canvas_height) else {
            return Err(GraphError::InvalidRaster { width, height });
        };
        let canvas = Frame::filled(canvas_width, canvas_height, background);
        Ok(Self {
            canvas,
            preimage: Panel {
                left: MARGIN,
                top: MARGIN,
                width,
                height,
            },
            image: Panel {
                left: 3 * MARGIN + SPACE_BETWEEN + width,
                top: MARGIN,
                width,
                height,
            },
        })
    }

    pub fn canvas(&self) -> &Frame {
        &self.canvas
    }

    pub fn preimage_panel(&self) -> Panel {
        self.preimage
    }

    pub fn image_panel(&self) -> Panel {
        self.image
    }

    /// Draw the identity over `area` into the preimage panel (one sample per
    /// pixel) and `function` into the image panel with `quality` samples
    /// per axis.
    pub fn draw(
        &mut self,
        function: &Function,
        area: &Area,
        quality: usize,
        options: &RenderOptions,
    ) -> Result<(), GraphError> {
        let preimage = render(
            &Function::identity(),
            area,
            self.preimage.width,
            self.preimage.height,
            &options.clone().with_sampling(None),
        )?;
        self.canvas.blit(&preimage, self.preimage.left, self.preimage.top);

        let image = render(
            function,
            area,
            self.image.width,
            self.image.height,
            &options.clone().with_sampling(Some(Sampling::square(quality))),
        )?;
        self.canvas.blit(&image, self.image.left, self.image.top);
        Ok(())
    }

    /// Encode the canvas as PNG.
    pub fn save_png(&self, path: &Path) -> Result<(), GraphError> {
        save_png(&self.canvas, path)
    }
}

/// Write a frame to `path` as an 8-bit RGB PNG.
pub fn save_png(frame: &Frame, path: &Path) -> Result<(), GraphError> {
    let (width, height) = (to_u32(frame.width())?, to_u32(frame.height())?);
    let image = image::RgbImage::from_raw(width, height, frame.to_rgb_bytes()).ok_or(
        GraphError::InvalidRaster {
            width: frame.width(),
            height: frame.height(),
        },
    )?;
    image.save_with_format(path, image::ImageFormat::Png)?;
    log::info!("saved {}", path.display());
    Ok(())
}

fn to_u32(size: usize) -> Result<u32, GraphError> {
    u32::try_from(size).map_err(|_| GraphError::Image {
        message: format!("{size} pixels is too large for an image side"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::expr::parse_function;

    #[test]
    fn layout_matches_panel_size() {
        let plot = Plot::new(30, 20, Color::LIGHT_GRAY).unwrap();
        assert_eq!(plot.canvas().width(), 4 * 10 + 100 + 60);
        assert_eq!(plot.canvas().height(), 2 * 10 + 20);
        assert_eq!(plot.preimage_panel(), Panel { left: 10, top: 10, width: 30, height: 20 });
        assert_eq!(plot.image_panel(), Panel { left: 160, top: 10, width: 30, height: 20 });
        assert!(Plot::new(0, 10, Color::LIGHT_GRAY).is_err());
        assert!(matches!(
            Plot::new(usize::MAX, 10, Color::LIGHT_GRAY),
            Err(GraphError::InvalidRaster { .. })
        ));
    }

    #[test]
    fn draw_fills_the_preimage_panel() {
        let mut plot = Plot::new(12, 12, Color::LIGHT_GRAY).unwrap();
        let area = Area::centered(2.0).unwrap();
        let f = parse_function("z^2").unwrap();
        plot.draw(&f, &area, 48, &RenderOptions::default()).unwrap();

        let canvas = plot.canvas();
        // Margins stay background.
        assert_eq!(canvas.get(0, 0), Some(Color::LIGHT_GRAY));
        assert_eq!(canvas.get(MARGIN + 12 + 5, MARGIN), Some(Color::LIGHT_GRAY));
        // The bottom-left pixel of the preimage panel is drawn.
        assert_ne!(canvas.get(MARGIN, MARGIN + 11), Some(Color::LIGHT_GRAY));
        // Something lands in the image panel.
        let image = plot.image_panel();
        let drawn = (0..image.height)
            .flat_map(|y| (0..image.width).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.get(image.left + x, image.top + y) != Some(Color::LIGHT_GRAY))
            .count();
        assert!(drawn > 0);
    }

    #[test]
    fn png_is_written() {
        let dir = std::env::temp_dir().join("complex_graph_test_png");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("frame.png");

        let frame = Frame::filled(5, 3, Color::rgb(10, 20, 30));
        save_png(&frame, &path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (5, 3));
        assert_eq!(decoded.get_pixel(4, 2).0, [10, 20, 30]);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
