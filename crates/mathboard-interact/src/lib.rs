//! Mathboard Interaction Engine
//!
//! Everything between raw pointer events and a finished lesson step:
//! viewport mapping, the drag-session state machine, per-kind constraint
//! strategies, the tween animator, and the `WidgetSession` façade that
//! lesson progression talks to.

pub mod animate;
pub mod constraints;
pub mod input;
pub mod session;
pub mod viewport;

pub use animate::{AnimEvent, AnimationId, Animator, Easing, STAGE};
pub use constraints::{FinalizeResult, InteractionOutcome, MachineStart};
pub use input::{DragDispatcher, HIT_TOLERANCE, PointerEvent, TouchPhase};
pub use session::{HIGHLIGHT_DURATION, WidgetSession};
pub use viewport::{Viewport, ViewportError};
