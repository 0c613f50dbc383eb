//! Riemann sum: left-rule rectangles under y = x²/10 with a slider
//! controlling the partition count N.

use kurbo::{Point, Rect};

use super::palette;
use crate::config::{WidgetConfig, or_fallback};
use crate::scene::{ElementKind, InteractiveElement, Scene, SceneShape, ShapeStyle, WidgetKind};

/// Screen position of math (0, 0).
pub const ORIGIN: Point = Point::new(100.0, 850.0);
/// Pixels per math unit in x.
pub const X_SCALE: f64 = 80.0;
/// Pixels per math unit in y.
pub const Y_SCALE: f64 = 60.0;
/// Curve domain.
pub const DOMAIN: (f64, f64) = (0.0, 10.0);

/// Slider track geometry and N range.
pub const TRACK_Y: f64 = 930.0;
pub const MIN_PX: f64 = 300.0;
pub const MAX_PX: f64 = 700.0;
pub const MIN_N: u32 = 2;
pub const MAX_N: u32 = 50;

pub const N_READOUT: Point = Point::new(500.0, 120.0);
pub const AREA_READOUT: Point = Point::new(500.0, 160.0);

/// The curve being summed.
pub fn f(x: f64) -> f64 {
    x * x / 10.0
}

/// Screen position for a math point under this widget's scales.
pub fn screen_from_math(x: f64, y: f64) -> Point {
    Point::new(ORIGIN.x + x * X_SCALE, ORIGIN.y - y * Y_SCALE)
}

/// Partition count for a slider pixel position: linear over the track,
/// rounded to the nearest integer, clamped to [MIN_N, MAX_N].
pub fn n_for_px(x: f64) -> u32 {
    let t = ((x - MIN_PX) / (MAX_PX - MIN_PX)).clamp(0.0, 1.0);
    (MIN_N as f64 + t * (MAX_N - MIN_N) as f64).round() as u32
}

/// Knob pixel position for a partition count.
pub fn px_for_n(n: u32) -> f64 {
    let n = n.clamp(MIN_N, MAX_N);
    MIN_PX + (n - MIN_N) as f64 / (MAX_N - MIN_N) as f64 * (MAX_PX - MIN_PX)
}

/// Left-Riemann rectangles over the full domain for a partition count.
pub fn rectangles(n: u32) -> Vec<SceneShape> {
    let n = n.max(1);
    let width = (DOMAIN.1 - DOMAIN.0) / n as f64;
    let style = ShapeStyle::filled(palette::ACCENT_FILL, palette::ACCENT, 1.0);
    (0..n)
        .map(|i| {
            let x = DOMAIN.0 + i as f64 * width;
            let top = screen_from_math(x, f(x));
            let bottom_right = screen_from_math(x + width, 0.0);
            SceneShape::Rect {
                rect: Rect::new(top.x, top.y, bottom_right.x, bottom_right.y),
                style,
            }
        })
        .collect()
}

/// The left-rule sum the rectangles represent.
pub fn left_sum(n: u32) -> f64 {
    let n = n.max(1);
    let width = (DOMAIN.1 - DOMAIN.0) / n as f64;
    (0..n).map(|i| width * f(DOMAIN.0 + i as f64 * width)).sum()
}

pub fn n_text(n: u32) -> String {
    format!("N = {n}")
}

pub fn area_text(n: u32) -> String {
    format!("area \u{2248} {:.2}", left_sum(n))
}

pub fn build(config: &WidgetConfig) -> Scene {
    let mut scene = Scene::new(WidgetKind::RiemannSum);

    let axis_style = ShapeStyle::stroke(palette::AXIS, 2.0);
    scene.push_shape(SceneShape::Segment {
        from: screen_from_math(0.0, 0.0),
        to: screen_from_math(10.0, 0.0),
        style: axis_style,
    });
    scene.push_shape(SceneShape::Segment {
        from: screen_from_math(0.0, 0.0),
        to: screen_from_math(0.0, 10.0),
        style: axis_style,
    });

    let samples = 100;
    let points = (0..=samples)
        .map(|i| {
            let x = DOMAIN.0 + (DOMAIN.1 - DOMAIN.0) * i as f64 / samples as f64;
            screen_from_math(x, f(x))
        })
        .collect();
    scene.push_shape(SceneShape::Polyline {
        points,
        style: ShapeStyle::stroke(palette::INK, 2.5),
    });

    // Slider track with end labels.
    scene.push_shape(SceneShape::Segment {
        from: Point::new(MIN_PX, TRACK_Y),
        to: Point::new(MAX_PX, TRACK_Y),
        style: ShapeStyle::stroke(palette::AXIS, 4.0),
    });
    scene.push_shape(SceneShape::Label {
        position: Point::new(MIN_PX - 30.0, TRACK_Y),
        text: MIN_N.to_string(),
        size: 22.0,
        color: palette::AXIS,
    });
    scene.push_shape(SceneShape::Label {
        position: Point::new(MAX_PX + 30.0, TRACK_Y),
        text: MAX_N.to_string(),
        size: 22.0,
        color: palette::AXIS,
    });

    // The missing-config fallback 0 lands on MIN_N via the clamp.
    let n0 = (or_fallback(config.initial_n).round() as i64).clamp(MIN_N as i64, MAX_N as i64) as u32;

    scene.push_element(
        InteractiveElement::new(
            "slider",
            ElementKind::Slider {
                track_y: TRACK_Y,
                min_px: MIN_PX,
                max_px: MAX_PX,
                min_n: MIN_N,
                max_n: MAX_N,
            },
            Point::new(px_for_n(n0), TRACK_Y),
        )
        .with_payload(n0 as f64)
        .with_radius(16.0)
        .with_style(ShapeStyle::filled(palette::INK, palette::INK, 1.0)),
    );

    scene.set_overlay("rectangles", rectangles(n0));
    scene.set_readout("n", N_READOUT, n_text(n0));
    scene.set_readout("area", AREA_READOUT, area_text(n0));

    scene
}
