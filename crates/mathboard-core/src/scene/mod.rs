//! Scene graph types for a single widget instance.
//!
//! A scene is fully rebuilt on every render call; drop zones and elements
//! are never carried over between renders.

use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::UnknownWidgetKind;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SceneColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }
}

impl From<Color> for SceneColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SceneColor> for Color {
    fn from(color: SceneColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Stroke style for outlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
}

/// Style properties for scene shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color.
    pub stroke_color: SceneColor,
    /// Stroke width.
    pub stroke_width: f64,
    /// Fill color (None = no fill).
    pub fill_color: Option<SceneColor>,
    /// Stroke style.
    pub stroke_style: StrokeStyle,
}

impl ShapeStyle {
    /// Plain solid stroke of the given color and width.
    pub const fn stroke(color: SceneColor, width: f64) -> Self {
        Self {
            stroke_color: color,
            stroke_width: width,
            fill_color: None,
            stroke_style: StrokeStyle::Solid,
        }
    }

    /// Filled shape with a matching outline.
    pub const fn filled(fill: SceneColor, stroke: SceneColor, width: f64) -> Self {
        Self {
            stroke_color: stroke,
            stroke_width: width,
            fill_color: Some(fill),
            stroke_style: StrokeStyle::Solid,
        }
    }

    /// Switch the stroke to dashed.
    pub const fn dashed(mut self) -> Self {
        self.stroke_style = StrokeStyle::Dashed;
        self
    }

    /// Get the stroke color as a peniko Color.
    pub fn stroke_peniko(&self) -> Color {
        self.stroke_color.into()
    }

    /// Get the fill color as a peniko Color.
    pub fn fill_peniko(&self) -> Option<Color> {
        self.fill_color.map(|c| c.into())
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self::stroke(SceneColor::black(), 2.0)
    }
}

/// The six supported widget kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WidgetKind {
    BalanceScale,
    FunctionMachine,
    CoordinateGrid,
    UnitCircle,
    SlopeScanner,
    RiemannSum,
}

impl WidgetKind {
    /// The kebab-case name used in lesson data (`visualType`).
    pub fn as_str(self) -> &'static str {
        match self {
            WidgetKind::BalanceScale => "balance-scale",
            WidgetKind::FunctionMachine => "function-machine",
            WidgetKind::CoordinateGrid => "coordinate-grid",
            WidgetKind::UnitCircle => "unit-circle",
            WidgetKind::SlopeScanner => "slope-scanner",
            WidgetKind::RiemannSum => "riemann-sum",
        }
    }
}

impl FromStr for WidgetKind {
    type Err = UnknownWidgetKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "balance-scale" => Ok(WidgetKind::BalanceScale),
            "function-machine" => Ok(WidgetKind::FunctionMachine),
            "coordinate-grid" => Ok(WidgetKind::CoordinateGrid),
            "unit-circle" => Ok(WidgetKind::UnitCircle),
            "slope-scanner" => Ok(WidgetKind::SlopeScanner),
            "riemann-sum" => Ok(WidgetKind::RiemannSum),
            other => Err(UnknownWidgetKind(other.to_string())),
        }
    }
}

impl std::fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A drawable primitive in scene coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneShape {
    Segment {
        from: Point,
        to: Point,
        style: ShapeStyle,
    },
    Circle {
        center: Point,
        radius: f64,
        style: ShapeStyle,
    },
    Rect {
        rect: Rect,
        style: ShapeStyle,
    },
    Polyline {
        points: Vec<Point>,
        style: ShapeStyle,
    },
    Label {
        position: Point,
        text: String,
        size: f64,
        color: SceneColor,
    },
}

impl SceneShape {
    /// Get the path representation for rendering (None for labels).
    pub fn to_path(&self) -> Option<BezPath> {
        match self {
            SceneShape::Segment { from, to, .. } => {
                let mut path = BezPath::new();
                path.move_to(*from);
                path.line_to(*to);
                Some(path)
            }
            SceneShape::Circle { center, radius, .. } => {
                Some(kurbo::Circle::new(*center, *radius).to_path(0.1))
            }
            SceneShape::Rect { rect, .. } => Some(rect.to_path(0.1)),
            SceneShape::Polyline { points, .. } => {
                let mut path = BezPath::new();
                let mut iter = points.iter();
                if let Some(first) = iter.next() {
                    path.move_to(*first);
                    for p in iter {
                        path.line_to(*p);
                    }
                }
                Some(path)
            }
            SceneShape::Label { .. } => None,
        }
    }

    /// Get the style (labels report a stroke of their text color).
    pub fn style(&self) -> ShapeStyle {
        match self {
            SceneShape::Segment { style, .. }
            | SceneShape::Circle { style, .. }
            | SceneShape::Rect { style, .. }
            | SceneShape::Polyline { style, .. } => *style,
            SceneShape::Label { color, .. } => ShapeStyle::stroke(*color, 1.0),
        }
    }
}

/// Unique identifier for interactive elements.
pub type ElementId = Uuid;

/// The constraint kind of an interactive element, fixed at creation time.
///
/// Each variant carries the geometric parameters its drag strategy needs,
/// so dispatch is a match on this tag rather than a lookup keyed by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementKind {
    /// Free drag with drop-zone resolution on release.
    Token {
        /// Bank position the token returns to when dropped outside any zone.
        home: Point,
    },
    /// Free drag, snapped to the nearest grid intersection on release.
    GridPoint {
        origin: Point,
        unit: f64,
        /// Snappable half-extent in grid units each side of the origin.
        extent: i64,
        /// Lesson target pair in math coordinates, if any.
        target: Option<(i64, i64)>,
    },
    /// Position projected onto a circle boundary via atan2.
    CircleHandle {
        center: Point,
        radius: f64,
        show_sine: bool,
        show_cosine: bool,
    },
    /// Position projected onto the parabola y = x², domain-clamped.
    CurveFollower {
        origin: Point,
        scale: f64,
        min_x: f64,
        max_x: f64,
    },
    /// Horizontal slider mapped linearly to an integer partition count.
    Slider {
        track_y: f64,
        min_px: f64,
        max_px: f64,
        min_n: u32,
        max_n: u32,
    },
}

/// A named, positioned, draggable entity owned by the scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractiveElement {
    /// Stable identity for the lifetime of the scene.
    pub id: ElementId,
    /// Semantic name used for highlight/alias lookup, never for dispatch.
    pub name: String,
    /// Constraint kind with its geometric parameters.
    pub kind: ElementKind,
    /// Current position in scene coordinates.
    pub position: Point,
    /// Opaque numeric payload (weight, input value, partition count).
    pub payload: f64,
    /// Visual radius, also part of the hit area.
    pub radius: f64,
    /// Drawing style; strategies recolor this for feedback.
    pub style: ShapeStyle,
    /// Text drawn on the element, if any.
    pub label: Option<String>,
    /// The zone this element currently rests in, if constrained.
    pub placed_in: Option<ZoneKind>,
}

impl InteractiveElement {
    pub fn new(name: impl Into<String>, kind: ElementKind, position: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            position,
            payload: 0.0,
            radius: 18.0,
            style: ShapeStyle::default(),
            label: None,
            placed_in: None,
        }
    }

    pub fn with_payload(mut self, payload: f64) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn placed(mut self, zone: ZoneKind) -> Self {
        self.placed_in = Some(zone);
        self
    }

    /// Check if a point (in scene coordinates) hits this element.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        let reach = self.radius + tolerance;
        dx * dx + dy * dy <= reach * reach
    }
}

/// Semantic type of a drop zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    PlateLeft,
    PlateRight,
    MachineInput,
}

/// An axis-aligned rectangular drop target, rebuilt fresh per render.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropZone {
    pub rect: Rect,
    pub kind: ZoneKind,
    /// Position an accepted element snaps to.
    pub anchor: Point,
}

impl DropZone {
    pub fn new(rect: Rect, kind: ZoneKind, anchor: Point) -> Self {
        Self { rect, kind, anchor }
    }

    pub fn contains(&self, point: Point) -> bool {
        self.rect.contains(point)
    }
}

/// A named group of shapes replaced wholesale while interacting
/// (beam at rotation, tangent segment, projection segments, rectangles).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub name: String,
    pub shapes: Vec<SceneShape>,
}

/// A live numeric readout drawn near a widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Readout {
    pub name: String,
    pub position: Point,
    pub text: String,
}

/// The full drawable output for one render call of one widget instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    /// The widget kind this scene was built for (None = empty scene).
    pub kind: Option<WidgetKind>,
    /// Static shapes, drawn back to front.
    pub shapes: Vec<SceneShape>,
    /// Draggable elements, drawn above static shapes (last is topmost).
    pub elements: Vec<InteractiveElement>,
    /// Drop zones, tested in registration order (first match wins).
    pub zones: Vec<DropZone>,
    /// Dynamic shape groups replaced during interaction.
    pub overlays: Vec<Overlay>,
    /// Live readouts keyed by name.
    pub readouts: Vec<Readout>,
    /// Machine rule string, if this is a function-machine scene.
    pub rule: Option<String>,
    /// Current beam rotation in degrees, if this is a balance scene.
    pub beam_degrees: f64,
}

impl Scene {
    /// An empty scene (rendered for unknown widget kinds).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(kind: WidgetKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn push_shape(&mut self, shape: SceneShape) {
        self.shapes.push(shape);
    }

    pub fn push_element(&mut self, element: InteractiveElement) -> ElementId {
        let id = element.id;
        self.elements.push(element);
        id
    }

    pub fn push_zone(&mut self, zone: DropZone) {
        self.zones.push(zone);
    }

    /// Replace (or insert) a named overlay.
    pub fn set_overlay(&mut self, name: &str, shapes: Vec<SceneShape>) {
        if let Some(overlay) = self.overlays.iter_mut().find(|o| o.name == name) {
            overlay.shapes = shapes;
        } else {
            self.overlays.push(Overlay {
                name: name.to_string(),
                shapes,
            });
        }
    }

    pub fn overlay(&self, name: &str) -> Option<&[SceneShape]> {
        self.overlays
            .iter()
            .find(|o| o.name == name)
            .map(|o| o.shapes.as_slice())
    }

    /// Update (or create at the given position) a named readout.
    pub fn set_readout(&mut self, name: &str, position: Point, text: impl Into<String>) {
        if let Some(readout) = self.readouts.iter_mut().find(|r| r.name == name) {
            readout.text = text.into();
        } else {
            self.readouts.push(Readout {
                name: name.to_string(),
                position,
                text: text.into(),
            });
        }
    }

    /// Update an existing readout's text. Returns false if no readout with
    /// that name was registered by the builder.
    pub fn update_readout(&mut self, name: &str, text: impl Into<String>) -> bool {
        if let Some(readout) = self.readouts.iter_mut().find(|r| r.name == name) {
            readout.text = text.into();
            true
        } else {
            false
        }
    }

    pub fn readout(&self, name: &str) -> Option<&str> {
        self.readouts
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.text.as_str())
    }

    pub fn element(&self, id: ElementId) -> Option<&InteractiveElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut InteractiveElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn element_by_name(&self, name: &str) -> Option<&InteractiveElement> {
        self.elements.iter().find(|e| e.name == name)
    }

    /// Find the topmost element at a point, if any.
    pub fn element_at(&self, point: Point, tolerance: f64) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|e| e.hit_test(point, tolerance))
            .map(|e| e.id)
    }

    /// Find the first zone (in registration order) containing a point.
    pub fn zone_at(&self, point: Point) -> Option<&DropZone> {
        self.zones.iter().find(|z| z.contains(point))
    }
}
