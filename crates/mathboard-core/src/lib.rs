//! Mathboard Core Library
//!
//! Platform-agnostic scene model and widget builders for the mathboard
//! lesson visuals. A `Scene` is the full drawable output for one widget
//! instance; builders are pure functions from (widget kind, config) to a
//! scene, and the interaction engine in `mathboard-interact` mutates the
//! scene during drag sessions.

pub mod config;
pub mod error;
pub mod scene;
pub mod widgets;

pub use config::{NUMERIC_FALLBACK, WidgetConfig, or_fallback};
pub use error::{ConfigError, UnknownWidgetKind};
pub use scene::{
    DropZone, ElementId, ElementKind, InteractiveElement, Overlay, Readout, Scene, SceneColor,
    SceneShape, ShapeStyle, StrokeStyle, WidgetKind, ZoneKind,
};
pub use widgets::{FRAME, build};
