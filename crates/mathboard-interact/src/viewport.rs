//! Mapping between host screen pixels and the fixed 1000x1000 scene frame.

use kurbo::{Affine, Point};
use thiserror::Error;

use mathboard_core::FRAME;

#[derive(Debug, Error, PartialEq)]
pub enum ViewportError {
    #[error("viewport surface is empty ({width}x{height})")]
    EmptySurface { width: f64, height: f64 },
}

/// Uniform-scale viewport: the scene frame is fit into the surface at
/// `min(width, height) / FRAME` and centered along the longer axis, so
/// widget geometry keeps its aspect ratio on any screen.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    width: f64,
    height: f64,
    scale: f64,
    offset: Point,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Result<Self, ViewportError> {
        if width <= 0.0 || height <= 0.0 {
            return Err(ViewportError::EmptySurface { width, height });
        }
        let scale = width.min(height) / FRAME;
        let offset = Point::new(
            (width - FRAME * scale) / 2.0,
            (height - FRAME * scale) / 2.0,
        );
        Ok(Self {
            width,
            height,
            scale,
            offset,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Scene-to-screen transform, for hosts that draw the scene themselves.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset.to_vec2()) * Affine::scale(self.scale)
    }

    pub fn screen_from_scene(&self, point: Point) -> Point {
        self.transform() * point
    }

    pub fn scene_from_screen(&self, point: Point) -> Point {
        self.transform().inverse() * point
    }
}
