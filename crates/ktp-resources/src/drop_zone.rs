//! Drag-and-drop admission state.
//!
//! `Idle -> Dragging` on drag-enter, back to `Idle` on drag-leave or drop. The state
//! only drives the drop target's highlight; it never gates ingestion.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropState {
    #[default]
    Idle,
    Dragging,
}

#[derive(Debug, Default)]
pub struct DropZone {
    state: DropState,
}

impl DropZone {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DropState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state == DropState::Dragging
    }

    pub fn drag_enter(&mut self) {
        self.transition(DropState::Dragging, "drag-enter");
    }

    pub fn drag_leave(&mut self) {
        self.transition(DropState::Idle, "drag-leave");
    }

    /// Files were dropped on the target. Returns the state the drop arrived in.
    pub fn drop_received(&mut self) -> DropState {
        let previous = self.state;
        self.transition(DropState::Idle, "drop");
        previous
    }

    fn transition(&mut self, next: DropState, event: &'static str) {
        if self.state != next {
            tracing::trace!(from = ?self.state, to = ?next, event, "Drop zone transition");
        }
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_leave_returns_to_idle() {
        let mut zone = DropZone::new();
        assert_eq!(zone.state(), DropState::Idle);

        zone.drag_enter();
        assert!(zone.is_dragging());

        zone.drag_leave();
        assert_eq!(zone.state(), DropState::Idle);
    }

    #[test]
    fn test_drop_resets_to_idle() {
        let mut zone = DropZone::new();
        zone.drag_enter();
        assert_eq!(zone.drop_received(), DropState::Dragging);
        assert!(!zone.is_dragging());
    }

    #[test]
    fn test_repeated_events_are_idempotent() {
        let mut zone = DropZone::new();
        zone.drag_enter();
        zone.drag_enter();
        assert!(zone.is_dragging());

        zone.drag_leave();
        zone.drag_leave();
        assert_eq!(zone.state(), DropState::Idle);
        assert_eq!(zone.drop_received(), DropState::Idle);
    }
}
