use std::time::Instant;

use num_complex::Complex64;
use rayon::prelude::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::frame::Frame;
use super::zbuffer::{SampleId, ZBuffer};
use crate::error::GraphError;
use crate::model::{Area, Color, Function, Hsl, Segment};

/// Hue changes along the real axis of the preimage.
pub const DEFAULT_HUE: Segment = Segment::from_const(0.0, 0.95);
/// Lightness changes along the imaginary axis of the preimage.
pub const DEFAULT_LIGHTNESS: Segment = Segment::from_const(0.05, 0.9);
pub const DEFAULT_MESH_COUNT: usize = 11;
/// Mesh line thickness relative to the larger side of the preimage.
pub const DEFAULT_MESH_THICKNESS: f64 = 4e-3;
pub const DEFAULT_SATURATION: f64 = 0.5;
pub const MESH_SATURATION: f64 = 1.0;

/// Largest accepted raster side, in pixels.
pub const MAX_RASTER_SIDE: usize = 1 << 14;
/// Largest accepted sample count along one axis.
pub const MAX_SAMPLES_PER_AXIS: usize = 1 << 20;
pub const MAX_MESH_COUNT: usize = 10_000;

/// Which component of the *source* point decides a pixel when several
/// samples land on it. The larger value is drawn on top.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ZOrder {
    #[default]
    Real,
    Imaginary,
    Magnitude,
}

impl ZOrder {
    #[inline]
    pub fn key(self, point: Complex64) -> f64 {
        match self {
            ZOrder::Real => point.re,
            ZOrder::Imaginary => point.im,
            ZOrder::Magnitude => point.norm(),
        }
    }
}

/// Sample counts along each axis of the preimage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Sampling {
    pub real: usize,
    pub imaginary: usize,
}

impl Sampling {
    /// The same count along both axes.
    pub fn square(count: usize) -> Self {
        Self {
            real: count,
            imaginary: count,
        }
    }
}

/// How a function is sampled and colored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RenderOptions {
    pub hue: Segment,
    pub lightness: Segment,
    pub z_order: ZOrder,
    /// `None` samples once per output pixel.
    pub sampling: Option<Sampling>,
    pub mesh_count: usize,
    pub mesh_thickness: f64,
    pub saturation: f64,
    pub mesh_saturation: f64,
    pub background: Color,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            hue: DEFAULT_HUE,
            lightness: DEFAULT_LIGHTNESS,
            z_order: ZOrder::default(),
            sampling: None,
            mesh_count: DEFAULT_MESH_COUNT,
            mesh_thickness: DEFAULT_MESH_THICKNESS,
            saturation: DEFAULT_SATURATION,
            mesh_saturation: MESH_SATURATION,
            background: Color::LIGHT_GRAY,
        }
    }
}

impl RenderOptions {
    pub fn with_sampling(mut self, sampling: Option<Sampling>) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_z_order(mut self, z_order: ZOrder) -> Self {
        self.z_order = z_order;
        self
    }

    /// Check color ranges, mesh parameters and sample counts.
    pub fn validate(&self) -> Result<(), GraphError> {
        for (component, segment) in [("hue", self.hue), ("lightness", self.lightness)] {
            for value in [segment.min(), segment.max()] {
                if !Segment::UNIT.contains(value) {
                    return Err(GraphError::ColorOutOfRange { component, value });
                }
            }
        }
        for (component, value) in [
            ("saturation", self.saturation),
            ("mesh saturation", self.mesh_saturation),
        ] {
            if !Segment::UNIT.contains(value) {
                return Err(GraphError::ColorOutOfRange { component, value });
            }
        }
        if self.mesh_count > MAX_MESH_COUNT
            || !(self.mesh_thickness.is_finite() && self.mesh_thickness >= 0.0)
        {
            return Err(GraphError::InvalidMesh {
                count: self.mesh_count,
                thickness: self.mesh_thickness,
            });
        }
        if let Some(s) = self.sampling {
            check_sampling(s.real, s.imaginary)?;
        }
        Ok(())
    }
}

/// Both sides in `[1, MAX_RASTER_SIDE]`.
pub fn check_raster(width: usize, height: usize) -> Result<(), GraphError> {
    let side = 1..=MAX_RASTER_SIDE;
    if side.contains(&width) && side.contains(&height) {
        Ok(())
    } else {
        Err(GraphError::InvalidRaster { width, height })
    }
}

/// Both counts in `[1, MAX_SAMPLES_PER_AXIS]`. Sample ids must also fit the
/// grid size in a `usize`.
pub fn check_sampling(real: usize, imaginary: usize) -> Result<(), GraphError> {
    let axis = 1..=MAX_SAMPLES_PER_AXIS;
    if axis.contains(&real) && axis.contains(&imaginary) && real.checked_mul(imaginary).is_some() {
        Ok(())
    } else {
        Err(GraphError::InvalidSampling { real, imaginary })
    }
}

/// Everything derivable from a sample's grid position: its source point,
/// ordering key and color.
struct SampleGrid {
    origin: Complex64,
    n_re: usize,
    n_im: usize,
    real_step: f64,
    imag_step: f64,
    hue_min: f64,
    hue_step: f64,
    light_min: f64,
    light_step: f64,
    mesh_step_re: f64,
    mesh_step_im: f64,
    mesh_thickness: f64,
    saturation: f64,
    mesh_saturation: f64,
    z_order: ZOrder,
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
impl SampleGrid {
    fn new(area: &Area, sampling: Sampling, options: &RenderOptions) -> Self {
        let (n_re, n_im) = (sampling.real, sampling.imaginary);
        let mesh_cells = (options.mesh_count + 1) as f64;
        Self {
            origin: area.left_bottom(),
            n_re,
            n_im,
            real_step: area.width() / (n_re + 1) as f64,
            imag_step: area.height() / (n_im + 1) as f64,
            hue_min: options.hue.min(),
            hue_step: options.hue.length() / (n_re + 1) as f64,
            light_min: options.lightness.min(),
            light_step: options.lightness.length() / (n_im + 1) as f64,
            mesh_step_re: area.width() / mesh_cells,
            mesh_step_im: area.height() / mesh_cells,
            mesh_thickness: area.width().max(area.height()) * options.mesh_thickness,
            saturation: options.saturation,
            mesh_saturation: options.mesh_saturation,
            z_order: options.z_order,
        }
    }

    fn id(&self, i: usize, j: usize) -> SampleId {
        (j * self.n_re + i) as SampleId
    }

    fn position(&self, id: SampleId) -> (usize, usize) {
        let id = id as usize;
        (id % self.n_re, id / self.n_re)
    }

    fn point(&self, i: usize, j: usize) -> Complex64 {
        Complex64::new(
            self.origin.re + i as f64 * self.real_step,
            self.origin.im + j as f64 * self.imag_step,
        )
    }

    fn key(&self, id: SampleId) -> f64 {
        let (i, j) = self.position(id);
        self.z_order.key(self.point(i, j))
    }

    fn color(&self, id: SampleId) -> Color {
        let (i, j) = self.position(id);
        let point = self.point(i, j);
        let on_mesh = on_mesh(point.re, self.mesh_step_re, self.mesh_thickness)
            || on_mesh(point.im, self.mesh_step_im, self.mesh_thickness);
        let saturation = if on_mesh {
            self.mesh_saturation
        } else {
            self.saturation
        };
        Hsl::clamped(
            self.hue_min + i as f64 * self.hue_step,
            saturation,
            self.light_min + j as f64 * self.light_step,
        )
        .to_color()
    }
}

/// A coordinate is on a mesh line when its offset inside the current mesh
/// cell lies just past the middle of the cell.
fn on_mesh(coordinate: f64, step: f64, thickness: f64) -> bool {
    let t = coordinate.rem_euclid(step);
    t > step / 2.0 && t <= step / 2.0 + thickness
}

/// Sample `function` over `area` and draw the image points into a
/// `width × height` frame covering the same area.
///
/// Rows of samples are processed in parallel on the current rayon pool (call
/// it inside `ThreadPool::install` to pick the pool). Image points outside the
/// area, or non-finite ones, are skipped. When several samples hit one pixel
/// the one with the largest `z_order` key wins, the lowest sample index on
/// ties, so the result does not depend on scheduling.
pub fn render(
    function: &Function,
    area: &Area,
    width: usize,
    height: usize,
    options: &RenderOptions,
) -> Result<Frame, GraphError> {
    check_raster(width, height)?;
    options.validate()?;
    let sampling = options.sampling.unwrap_or(Sampling {
        real: width,
        imaginary: height,
    });

    let started = Instant::now();
    let grid = SampleGrid::new(area, sampling, options);
    let zbuffer = ZBuffer::new(width, height);

    (0..grid.n_im).into_par_iter().for_each(|j| {
        for i in 0..grid.n_re {
            let value = function.eval(grid.point(i, j));
            if let Some((x, y)) = area.to_pixel(value, width, height) {
                zbuffer.offer(x, y, grid.id(i, j), |id| grid.key(id));
            }
        }
    });

    let background = options.background;
    let pixels: Vec<Color> = zbuffer
        .into_winners()
        .into_par_iter()
        .map(|winner| winner.map_or(background, |id| grid.color(id)))
        .collect();

    log::debug!(
        "rendered {} on {width}x{height} from {}x{} samples in {:?}",
        function.name(),
        grid.n_re,
        grid.n_im,
        started.elapsed()
    );

    Frame::from_pixels(width, height, pixels).ok_or(GraphError::InvalidRaster { width, height })
}
