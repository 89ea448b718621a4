use crate::foundation::core::{OverlayTransform, Point, Vec2};

/// Multiplier applied to the overlay size per backward scroll step.
pub const ZOOM_IN_FACTOR: f64 = 1.1;
/// Multiplier applied to the overlay size per forward scroll step.
pub const ZOOM_OUT_FACTOR: f64 = 0.9;

/// Scroll direction of a zoom gesture.
///
/// `Forward` is the direction that scrolls page content down (positive
/// wheel delta) and shrinks the overlay; `Backward` grows it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Positive wheel delta; zooms out.
    Forward,
    /// Negative wheel delta; zooms in.
    Backward,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum DragState {
    Idle,
    Dragging { grab_offset: Vec2 },
}

/// Interactive state machine for positioning and scaling the route overlay.
///
/// Pointer positions are in the background viewport's pixel space. A drag
/// grabs the overlay at a fixed offset from its origin and preserves that
/// offset for every subsequent move, so the overlay never jumps under the
/// pointer.
#[derive(Clone, Debug)]
pub struct OverlayController {
    transform: OverlayTransform,
    drag: DragState,
}

impl Default for OverlayController {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayController {
    /// Create a controller with the default overlay placement.
    pub fn new() -> Self {
        Self {
            transform: OverlayTransform::default(),
            drag: DragState::Idle,
        }
    }

    /// Current overlay transform.
    pub fn transform(&self) -> OverlayTransform {
        self.transform
    }

    /// Replace the transform wholesale, e.g. from a saved or scripted state.
    pub fn set_transform(&mut self, transform: OverlayTransform) {
        self.transform = transform;
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Begin a drag at `pointer`, grabbing the overlay where it sits now.
    pub fn pointer_down(&mut self, pointer: Point) {
        self.drag = DragState::Dragging {
            grab_offset: pointer.to_vec2() - self.transform.position,
        };
    }

    /// Move the pointer. Outside a drag this is a no-op.
    pub fn pointer_move(&mut self, pointer: Point) {
        if let DragState::Dragging { grab_offset } = self.drag {
            self.transform.position = pointer.to_vec2() - grab_offset;
        }
    }

    /// End the drag, keeping the overlay where it was released.
    pub fn pointer_up(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Pointer left the viewport; treated the same as releasing it.
    pub fn pointer_leave(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Apply one zoom step, scaling both overlay dimensions uniformly.
    pub fn wheel(&mut self, direction: ScrollDirection) {
        let factor = match direction {
            ScrollDirection::Forward => ZOOM_OUT_FACTOR,
            ScrollDirection::Backward => ZOOM_IN_FACTOR,
        };
        self.transform.size.width *= factor;
        self.transform.size.height *= factor;
    }

    /// Set the overlay opacity, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f64) {
        self.transform.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Restore the default transform and cancel any drag.
    pub fn reset(&mut self) {
        self.transform = OverlayTransform::default();
        self.drag = DragState::Idle;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/controller.rs"]
mod tests;
