//! Virtual object placement state
//!
//! Objects are placed at the focus cursor and kept aligned by a tracked
//! raycast until tracking is explicitly stopped. All object mutations from
//! asynchronous session callbacks are funneled through a single command
//! queue drained by the frame owner, so the render thread never races a
//! callback.

use crate::{FocusCursor, RaycastHit, RaycastQuery, SessionEvent, TargetAlignment, TrackingQuality};
use roomscan_core::{Matrix4, Vector3f};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A continuous hit-test keeping a placed object glued to the scene.
/// Stopping is the only supported cancellation in the pipeline.
#[derive(Debug, Clone)]
pub struct TrackedRaycast {
    query: RaycastQuery,
    active: Arc<AtomicBool>,
}

impl TrackedRaycast {
    pub fn new(query: RaycastQuery) -> Self {
        Self {
            query,
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn query(&self) -> &RaycastQuery {
        &self.query
    }

    pub fn is_tracking(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Stops tracking the object's position and orientation.
    pub fn stop_tracking(&self) {
        self.active.store(false, Ordering::Release);
    }
}

/// A placeable virtual object.
#[derive(Debug, Clone, Default)]
pub struct VirtualObject {
    /// Model name; also determines the allowed raycast alignment.
    pub name: String,
    /// Transform of the anchor the object is attached to, once placed.
    pub anchor_transform: Option<Matrix4<f32>>,
    /// The raycast query used when placing this object.
    pub raycast_query: Option<RaycastQuery>,
    /// The associated tracked raycast, while placement tracking runs.
    pub tracked_raycast: Option<TrackedRaycast>,
    /// The most recent raycast result used for initial placement.
    pub most_recent_hit: Option<RaycastHit>,
    /// Set when the anchor should be refreshed at the end of a drag.
    pub should_update_anchor: bool,
    pub hidden: bool,
}

impl VirtualObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Which surface alignments this object may be placed on.
    pub fn allowed_alignment(&self) -> TargetAlignment {
        if self.name == "sticky note" {
            TargetAlignment::Any
        } else if self.name == "painting" {
            TargetAlignment::Vertical
        } else {
            TargetAlignment::Horizontal
        }
    }

    /// Stop and drop the tracked raycast, if any.
    pub fn stop_tracked_raycast(&mut self) {
        if let Some(raycast) = self.tracked_raycast.take() {
            raycast.stop_tracking();
        }
    }
}

/// Attempt to place `object` at the cursor. A no-op unless the cursor has
/// left `Initializing` and the object carries a raycast query.
pub fn try_place(object: &mut VirtualObject, cursor: &FocusCursor) -> bool {
    if cursor.is_initializing() {
        return false;
    }
    let Some(query) = object.raycast_query else {
        return false;
    };

    object.most_recent_hit = cursor.current_hit().copied();
    object.tracked_raycast = Some(TrackedRaycast::new(query));
    object.hidden = false;
    true
}

/// React to a session lifecycle event: interruption hides all placed
/// content, a return to normal tracking shows it again.
pub fn apply_session_event(objects: &mut [VirtualObject], event: &SessionEvent) {
    match event {
        SessionEvent::Interrupted => {
            for object in objects.iter_mut() {
                object.hidden = true;
            }
        }
        SessionEvent::TrackingChanged(TrackingQuality::Normal) => {
            for object in objects.iter_mut() {
                object.hidden = false;
            }
        }
        _ => {}
    }
}

/// A single object mutation, posted from a session callback.
#[derive(Debug, Clone)]
pub enum ObjectUpdate {
    /// The object's anchor moved; follow its translation.
    MoveToAnchor {
        object: usize,
        translation: Vector3f,
    },
    /// Attach the object to a new anchor transform.
    SetAnchor {
        object: usize,
        transform: Matrix4<f32>,
    },
}

/// Serialized mutation queue: callbacks post updates from any thread, the
/// frame owner drains them in order before each update pass.
pub struct UpdateQueue {
    tx: flume::Sender<ObjectUpdate>,
    rx: flume::Receiver<ObjectUpdate>,
}

impl UpdateQueue {
    pub fn new() -> Self {
        let (tx, rx) = flume::unbounded();
        Self { tx, rx }
    }

    /// A cloneable handle for posting updates.
    pub fn sender(&self) -> flume::Sender<ObjectUpdate> {
        self.tx.clone()
    }

    /// Apply all pending updates in send order. Updates referring to
    /// unknown objects are dropped.
    pub fn drain(&self, objects: &mut [VirtualObject]) -> usize {
        let mut applied = 0;
        for update in self.rx.try_iter() {
            match update {
                ObjectUpdate::MoveToAnchor {
                    object,
                    translation,
                } => {
                    if let Some(object) = objects.get_mut(object) {
                        let mut transform = object.anchor_transform.unwrap_or_else(Matrix4::identity);
                        transform[(0, 3)] = translation.x;
                        transform[(1, 3)] = translation.y;
                        transform[(2, 3)] = translation.z;
                        object.anchor_transform = Some(transform);
                        applied += 1;
                    }
                }
                ObjectUpdate::SetAnchor { object, transform } => {
                    if let Some(object) = objects.get_mut(object) {
                        object.anchor_transform = Some(transform);
                        object.should_update_anchor = false;
                        applied += 1;
                    }
                }
            }
        }
        applied
    }
}

impl Default for UpdateQueue {
    fn default() -> Self {
        Self::new()
    }
}
