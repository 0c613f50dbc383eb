//! Pointer events unified over mouse and touch, and the drag-session
//! state machine.

use kurbo::{Point, Vec2};
use log::debug;
use serde::{Deserialize, Serialize};

use mathboard_core::{ElementId, Scene};

use crate::constraints::{self, FinalizeResult, InteractionOutcome};

/// Extra slack around an element's visual radius when hit testing, in
/// scene pixels. Generous so finger input works.
pub const HIT_TOLERANCE: f64 = 12.0;

/// A pointer event in screen coordinates, already unified over input
/// devices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up { position: Point },
}

/// Phase of a touch gesture, as reported by the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position } => position,
        }
    }

    /// Build an event from the changed touches of a gesture, using the
    /// first touch point when several fingers are down. Returns `None`
    /// when the list is empty.
    pub fn from_touches(phase: TouchPhase, touches: &[Point]) -> Option<Self> {
        let position = *touches.first()?;
        Some(match phase {
            TouchPhase::Start => PointerEvent::Down { position },
            TouchPhase::Move => PointerEvent::Move { position },
            TouchPhase::End => PointerEvent::Up { position },
        })
    }
}

#[derive(Debug, Default)]
enum DragPhase {
    #[default]
    Idle,
    Dragging {
        element: ElementId,
        grab_offset: Vec2,
    },
}

/// Press-move-release state machine. At most one drag session exists at
/// a time; a second press while a session is active is rejected rather
/// than restarting the session.
#[derive(Debug, Default)]
pub struct DragDispatcher {
    phase: DragPhase,
}

impl DragDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a drag session is active. Hosts should suppress their
    /// default scroll/pan gesture while this holds.
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    pub fn active_element(&self) -> Option<ElementId> {
        match self.phase {
            DragPhase::Dragging { element, .. } => Some(element),
            DragPhase::Idle => None,
        }
    }

    /// Try to start a drag session at `position` (scene coordinates).
    /// Returns the grabbed element, if any. The topmost element wins when
    /// several overlap.
    pub fn press(&mut self, scene: &Scene, position: Point) -> Option<ElementId> {
        if self.is_dragging() {
            debug!("press ignored: a drag session is already active");
            return None;
        }
        let id = scene.element_at(position, HIT_TOLERANCE)?;
        let element = scene.element(id)?;
        let grab_offset = element.position - position;
        debug!("drag session started on {:?}", element.name);
        self.phase = DragPhase::Dragging {
            element: id,
            grab_offset,
        };
        Some(id)
    }

    /// Forward a pointer move to the active element's constraint strategy.
    /// The grab offset is preserved so the element does not jump under the
    /// pointer.
    pub fn motion(&mut self, scene: &mut Scene, position: Point) -> Vec<InteractionOutcome> {
        match self.phase {
            DragPhase::Dragging {
                element,
                grab_offset,
            } => constraints::apply_move(scene, element, position + grab_offset),
            DragPhase::Idle => Vec::new(),
        }
    }

    /// End the drag session and run the element's finalize step.
    pub fn release(&mut self, scene: &mut Scene) -> FinalizeResult {
        match std::mem::take(&mut self.phase) {
            DragPhase::Dragging { element, .. } => {
                let result = constraints::finalize(scene, element);
                debug!("drag session finished");
                result
            }
            DragPhase::Idle => FinalizeResult::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathboard_core::{WidgetConfig, WidgetKind, widgets};

    fn grid_scene() -> Scene {
        widgets::build(WidgetKind::CoordinateGrid, &WidgetConfig::default())
    }

    #[test]
    fn test_press_misses_empty_space() {
        let scene = grid_scene();
        let mut dispatcher = DragDispatcher::new();
        assert!(dispatcher.press(&scene, Point::new(50.0, 50.0)).is_none());
        assert!(!dispatcher.is_dragging());
    }

    #[test]
    fn test_press_grabs_marker() {
        let scene = grid_scene();
        let mut dispatcher = DragDispatcher::new();
        // The grid marker starts at the origin (500, 500).
        let id = dispatcher.press(&scene, Point::new(505.0, 498.0));
        assert!(id.is_some());
        assert_eq!(dispatcher.active_element(), id);
    }

    #[test]
    fn test_reentrant_press_is_rejected() {
        let mut scene = grid_scene();
        let mut dispatcher = DragDispatcher::new();
        let first = dispatcher.press(&scene, Point::new(500.0, 500.0));
        assert!(first.is_some());
        assert!(dispatcher.press(&scene, Point::new(500.0, 500.0)).is_none());
        // The original session is untouched.
        assert_eq!(dispatcher.active_element(), first);
        dispatcher.release(&mut scene);
        assert!(!dispatcher.is_dragging());
    }

    #[test]
    fn test_grab_offset_prevents_jump() {
        let mut scene = grid_scene();
        let mut dispatcher = DragDispatcher::new();
        // Grab 5 px to the right of the marker center.
        dispatcher.press(&scene, Point::new(505.0, 500.0)).unwrap();
        dispatcher.motion(&mut scene, Point::new(605.0, 500.0));
        let marker = scene.element_by_name("grid-point").unwrap();
        assert!((marker.position.x - 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_touch_events_map_to_pointer_events() {
        let touches = [Point::new(10.0, 20.0), Point::new(90.0, 90.0)];
        let event = PointerEvent::from_touches(TouchPhase::Start, &touches).unwrap();
        assert_eq!(
            event,
            PointerEvent::Down {
                position: Point::new(10.0, 20.0)
            }
        );
        assert!(PointerEvent::from_touches(TouchPhase::End, &[]).is_none());
    }
}
