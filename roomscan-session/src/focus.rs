//! Placement cursor state machine
//!
//! The focus cursor anchors object placement: it is `Detecting` while the
//! camera tracks normally and a hit-test against the scene succeeds, and
//! falls back to `Initializing` otherwise. Evaluated once per rendered
//! frame.

use crate::{CameraPose, RaycastHit, TrackingQuality};

/// Cursor state.
#[derive(Debug, Clone)]
pub enum FocusState {
    Initializing,
    Detecting {
        hit: RaycastHit,
        camera: CameraPose,
    },
}

/// The placement cursor.
#[derive(Debug, Clone)]
pub struct FocusCursor {
    state: FocusState,
    hidden: bool,
}

impl FocusCursor {
    pub fn new() -> Self {
        Self {
            state: FocusState::Initializing,
            hidden: false,
        }
    }

    /// Per-frame transition. The cursor is hidden whenever a placed object
    /// is visible in the viewport or a coaching overlay is active,
    /// independent of the state transition.
    pub fn update(
        &mut self,
        tracking: TrackingQuality,
        hit: Option<(RaycastHit, CameraPose)>,
        object_visible: bool,
        overlay_active: bool,
    ) {
        self.hidden = object_visible || overlay_active;

        self.state = match (tracking, hit) {
            (TrackingQuality::Normal, Some((hit, camera))) => FocusState::Detecting { hit, camera },
            _ => FocusState::Initializing,
        };
    }

    pub fn state(&self) -> &FocusState {
        &self.state
    }

    pub fn is_initializing(&self) -> bool {
        matches!(self.state, FocusState::Initializing)
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// The hit the cursor currently rests on, if any.
    pub fn current_hit(&self) -> Option<&RaycastHit> {
        match &self.state {
            FocusState::Detecting { hit, .. } => Some(hit),
            FocusState::Initializing => None,
        }
    }
}

impl Default for FocusCursor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomscan_core::Matrix4;

    fn some_hit() -> (RaycastHit, CameraPose) {
        (
            RaycastHit {
                world_transform: Matrix4::identity(),
            },
            CameraPose {
                transform: Matrix4::identity(),
            },
        )
    }

    #[test]
    fn detects_on_normal_tracking_with_hit() {
        let mut cursor = FocusCursor::new();
        cursor.update(TrackingQuality::Normal, Some(some_hit()), false, false);
        assert!(!cursor.is_initializing());
        assert!(cursor.current_hit().is_some());
    }

    #[test]
    fn limited_tracking_resets_regardless_of_hit() {
        let mut cursor = FocusCursor::new();
        cursor.update(TrackingQuality::Normal, Some(some_hit()), false, false);

        cursor.update(TrackingQuality::Limited, Some(some_hit()), false, false);
        assert!(cursor.is_initializing());

        cursor.update(TrackingQuality::Normal, None, false, false);
        assert!(cursor.is_initializing());
    }

    #[test]
    fn hidden_while_object_visible_or_overlay_active() {
        let mut cursor = FocusCursor::new();
        cursor.update(TrackingQuality::Normal, Some(some_hit()), true, false);
        assert!(cursor.is_hidden());
        assert!(!cursor.is_initializing());

        cursor.update(TrackingQuality::Normal, Some(some_hit()), false, true);
        assert!(cursor.is_hidden());

        cursor.update(TrackingQuality::Normal, Some(some_hit()), false, false);
        assert!(!cursor.is_hidden());
    }
}
