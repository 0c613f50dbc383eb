//! The widget-session façade consumed by lesson progression: build a
//! scene, feed it pointer events and clock ticks, and get interaction
//! outcomes back through a callback.

use std::time::{Duration, Instant};

use log::{debug, warn};

use mathboard_core::widgets::machine::MachineRule;
use mathboard_core::widgets::{self, balance, palette};
use mathboard_core::{ElementId, Scene, SceneColor, WidgetConfig, WidgetKind};

use crate::animate::{AnimEvent, Animator, Easing};
use crate::constraints::{FinalizeResult, InteractionOutcome};
use crate::input::{DragDispatcher, PointerEvent};
use crate::viewport::Viewport;

/// How long a highlight flash lasts.
pub const HIGHLIGHT_DURATION: Duration = Duration::from_millis(1000);

/// Beam sweep duration for canned scenarios.
const SCENARIO_SWEEP: Duration = Duration::from_millis(600);

/// Fixed right-plate load a scenario value is weighed against.
const SCENARIO_RIGHT_BASELINE: f64 = 2.0;

pub type OutcomeHandler = Box<dyn FnMut(InteractionOutcome)>;

struct HighlightState {
    element: ElementId,
    original_color: SceneColor,
    original_width: f64,
    until: Instant,
}

/// One widget instance: scene, drag dispatcher and animator behind the
/// render / show-scenario / highlight contract. Sessions are plain values
/// owned by the caller; several can coexist.
pub struct WidgetSession {
    viewport: Viewport,
    scene: Scene,
    dispatcher: DragDispatcher,
    animator: Animator,
    highlight: Option<HighlightState>,
    on_outcome: Option<OutcomeHandler>,
    /// Left-plate total as rendered; canned scenarios weigh against this,
    /// not against whatever has been dragged since.
    scenario_left: f64,
}

impl WidgetSession {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            scene: Scene::empty(),
            dispatcher: DragDispatcher::new(),
            animator: Animator::new(),
            highlight: None,
            on_outcome: None,
            scenario_left: 0.0,
        }
    }

    /// Register the callback that receives interaction outcomes.
    pub fn set_outcome_handler(&mut self, handler: impl FnMut(InteractionOutcome) + 'static) {
        self.on_outcome = Some(Box::new(handler));
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// True while a drag session is active; hosts should suppress their
    /// default scroll gesture while this holds.
    pub fn is_dragging(&self) -> bool {
        self.dispatcher.is_dragging()
    }

    /// Build the scene for a widget from scratch. Calling this again for
    /// the same kind and config yields the same scene; any in-flight drag,
    /// animation or highlight is dropped with the old scene.
    pub fn render(&mut self, kind: WidgetKind, config: &WidgetConfig) {
        debug!("render {kind}");
        self.scene = widgets::build(kind, config);
        self.reset_transient_state();
        self.scenario_left = balance::plate_tally(&self.scene).0;
    }

    /// Entry point for raw lesson data: an unrecognized kind name logs a
    /// warning and leaves the scene empty instead of failing.
    pub fn render_named(&mut self, kind: &str, config: &WidgetConfig) {
        match kind.parse::<WidgetKind>() {
            Ok(kind) => self.render(kind, config),
            Err(err) => {
                warn!("{err}; leaving the scene empty");
                self.scene = Scene::empty();
                self.reset_transient_state();
            }
        }
    }

    /// Feed one pointer event, given in screen coordinates.
    pub fn pointer(&mut self, event: PointerEvent, now: Instant) {
        let position = self.viewport.scene_from_screen(event.position());
        match event {
            PointerEvent::Down { .. } => {
                if let Some(id) = self.dispatcher.press(&self.scene, position) {
                    // A press takes over from any tween still moving the
                    // element.
                    self.animator.cancel_element(id);
                }
            }
            PointerEvent::Move { .. } => {
                let outcomes = self.dispatcher.motion(&mut self.scene, position);
                self.emit_all(outcomes);
            }
            PointerEvent::Up { .. } => {
                let FinalizeResult {
                    outcomes,
                    machine_start,
                } = self.dispatcher.release(&mut self.scene);
                self.emit_all(outcomes);
                if let Some(start) = machine_start {
                    let rule = self.scene.rule.as_deref().and_then(MachineRule::parse);
                    self.animator.start_machine(start, rule, now);
                }
            }
        }
    }

    /// Advance animations and expire highlights. Call once per frame.
    pub fn tick(&mut self, now: Instant) {
        let events = self.animator.tick(now, &mut self.scene);
        for event in events {
            if let AnimEvent::MachineCompleted { input, output, .. } = event {
                self.emit(InteractionOutcome::MachineCompleted { input, output });
            }
        }
        let expired = self.highlight.as_ref().is_some_and(|state| now >= state.until);
        if expired {
            self.restore_highlight();
        }
    }

    /// Replay a canned outcome on the current scene without rebuilding
    /// it. Only defined for the balance scale: the beam sweeps to where
    /// the rendered left total lands against the scenario value.
    pub fn show_scenario(&mut self, kind: WidgetKind, value: f64, now: Instant) {
        if kind != WidgetKind::BalanceScale || self.scene.kind != Some(WidgetKind::BalanceScale) {
            warn!("show_scenario is only defined for {}", WidgetKind::BalanceScale);
            return;
        }
        let left = self.scenario_left;
        let right = SCENARIO_RIGHT_BASELINE + value;
        let target = balance::beam_rotation(left, right);
        self.animator.start_beam_sweep(
            self.scene.beam_degrees,
            target,
            SCENARIO_SWEEP,
            Easing::InOutQuad,
            now,
        );
    }

    /// Flash an element's outline for `HIGHLIGHT_DURATION`. The identifier
    /// may be a lesson alias or a concrete element name; an unknown one
    /// logs a warning and does nothing.
    pub fn highlight_element(&mut self, identifier: &str, now: Instant) {
        self.restore_highlight();
        let name = resolve_alias(identifier);
        let Some(id) = self.scene.element_by_name(name).map(|el| el.id) else {
            warn!("highlight target {identifier:?} not found in the current scene");
            return;
        };
        let element = self.scene.element_mut(id).unwrap();
        let original_color = element.style.stroke_color;
        let original_width = element.style.stroke_width;
        element.style.stroke_color = palette::HIGHLIGHT;
        element.style.stroke_width = original_width + 2.0;
        self.highlight = Some(HighlightState {
            element: id,
            original_color,
            original_width,
            until: now + HIGHLIGHT_DURATION,
        });
    }

    fn restore_highlight(&mut self) {
        if let Some(state) = self.highlight.take() {
            if let Some(element) = self.scene.element_mut(state.element) {
                element.style.stroke_color = state.original_color;
                element.style.stroke_width = state.original_width;
            }
        }
    }

    fn reset_transient_state(&mut self) {
        // Element ids from the old scene are gone; drop everything that
        // refers to them.
        self.dispatcher = DragDispatcher::new();
        self.animator = Animator::new();
        self.highlight = None;
        self.scenario_left = 0.0;
    }

    fn emit(&mut self, outcome: InteractionOutcome) {
        if let Some(handler) = &mut self.on_outcome {
            handler(outcome);
        }
    }

    fn emit_all(&mut self, outcomes: Vec<InteractionOutcome>) {
        for outcome in outcomes {
            self.emit(outcome);
        }
    }
}

/// Lesson scripts refer to elements by a handful of historical aliases.
fn resolve_alias(identifier: &str) -> &str {
    match identifier {
        "point" | "marker" => "grid-point",
        "handle" | "angle-handle" => "circle-handle",
        "n-slider" => "slider",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn session() -> WidgetSession {
        WidgetSession::new(Viewport::new(1000.0, 1000.0).unwrap())
    }

    #[test]
    fn test_unknown_kind_leaves_scene_empty() {
        let mut s = session();
        s.render_named("number-line", &WidgetConfig::default());
        assert!(s.scene().elements.is_empty());
        assert!(s.scene().shapes.is_empty());
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut s = session();
        let config = WidgetConfig::default();
        s.render(WidgetKind::UnitCircle, &config);
        let first = s.scene().clone();
        s.render(WidgetKind::UnitCircle, &config);
        assert_eq!(s.scene().shapes, first.shapes);
        assert_eq!(s.scene().elements.len(), first.elements.len());
    }

    #[test]
    fn test_highlight_restores_after_duration() {
        let mut s = session();
        s.render(WidgetKind::CoordinateGrid, &WidgetConfig::default());
        let original = s.scene().element_by_name("grid-point").unwrap().style;

        let t0 = Instant::now();
        s.highlight_element("marker", t0);
        let lit = s.scene().element_by_name("grid-point").unwrap().style;
        assert_eq!(lit.stroke_color, palette::HIGHLIGHT);

        s.tick(t0 + Duration::from_millis(500));
        assert_eq!(
            s.scene().element_by_name("grid-point").unwrap().style.stroke_color,
            palette::HIGHLIGHT
        );

        s.tick(t0 + HIGHLIGHT_DURATION);
        let restored = s.scene().element_by_name("grid-point").unwrap().style;
        assert_eq!(restored.stroke_color, original.stroke_color);
        assert!((restored.stroke_width - original.stroke_width).abs() < f64::EPSILON);
    }

    #[test]
    fn test_highlight_unknown_name_is_harmless() {
        let mut s = session();
        s.render(WidgetKind::UnitCircle, &WidgetConfig::default());
        s.highlight_element("no-such-element", Instant::now());
        // Nothing to restore later.
        s.tick(Instant::now() + HIGHLIGHT_DURATION);
    }

    #[test]
    fn test_scenario_rejected_for_wrong_widget() {
        let mut s = session();
        s.render(WidgetKind::UnitCircle, &WidgetConfig::default());
        s.show_scenario(WidgetKind::BalanceScale, 3.0, Instant::now());
        // No sweep was scheduled against the circle scene.
        assert!(s.scene().beam_degrees.abs() < f64::EPSILON);
        s.tick(Instant::now() + Duration::from_secs(1));
        assert!(s.scene().beam_degrees.abs() < f64::EPSILON);
    }

    #[test]
    fn test_scenario_sweeps_beam() {
        let mut s = session();
        s.render(WidgetKind::BalanceScale, &WidgetConfig::default());
        let t0 = Instant::now();
        // Empty left plate against baseline + 3: right side wins.
        s.show_scenario(WidgetKind::BalanceScale, 3.0, t0);
        s.tick(t0 + SCENARIO_SWEEP);
        assert!((s.scene().beam_degrees - balance::TIP_DEGREES).abs() < 1e-9);
    }

    #[test]
    fn test_scenario_baseline_is_pinned_at_render() {
        let mut s = session();
        s.render(
            WidgetKind::BalanceScale,
            &WidgetConfig {
                left_weight: Some(5.0),
                inputs: vec![4.0],
                ..WidgetConfig::default()
            },
        );
        let t0 = Instant::now();

        // Pile an extra 4 onto the left plate mid-lesson.
        let from = s.scene().element_by_name("weight-0").unwrap().position;
        s.pointer(PointerEvent::Down { position: from }, t0);
        s.pointer(
            PointerEvent::Move {
                position: Point::new(250.0, 450.0),
            },
            t0,
        );
        s.pointer(
            PointerEvent::Up {
                position: Point::new(250.0, 450.0),
            },
            t0,
        );
        assert!((s.scene().beam_degrees - (-balance::TIP_DEGREES)).abs() < f64::EPSILON);

        // The replay weighs the rendered left total (5) against 2 + 3,
        // ignoring the mid-lesson drag.
        s.show_scenario(WidgetKind::BalanceScale, 3.0, t0);
        s.tick(t0 + SCENARIO_SWEEP);
        assert!(s.scene().beam_degrees.abs() < 1e-9);
    }

    #[test]
    fn test_press_is_reported_through_drag_state() {
        let mut s = session();
        s.render(WidgetKind::CoordinateGrid, &WidgetConfig::default());
        let t0 = Instant::now();
        s.pointer(
            PointerEvent::Down {
                position: Point::new(500.0, 500.0),
            },
            t0,
        );
        assert!(s.is_dragging());
        s.pointer(
            PointerEvent::Up {
                position: Point::new(500.0, 500.0),
            },
            t0,
        );
        assert!(!s.is_dragging());
    }
}
