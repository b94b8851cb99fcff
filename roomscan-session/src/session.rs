//! The session trait and its out-of-band events

use crate::{ArFrame, TrackingQuality};
use roomscan_core::{Matrix4, Point3f};

/// Surface alignments a raycast may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetAlignment {
    Any,
    Horizontal,
    Vertical,
}

/// A hit-test query against the physical scene.
#[derive(Debug, Clone, Copy)]
pub struct RaycastQuery {
    pub alignment: TargetAlignment,
}

/// A world-space hit returned by the session.
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    pub world_transform: Matrix4<f32>,
}

impl RaycastHit {
    pub fn position(&self) -> Point3f {
        Point3f::new(
            self.world_transform[(0, 3)],
            self.world_transform[(1, 3)],
            self.world_transform[(2, 3)],
        )
    }
}

/// The external AR collaborator: supplies the current frame and answers
/// hit-test queries. Pausing the session simply stops frames from arriving;
/// no in-flight work needs flushing.
pub trait ArSessionSource {
    fn current_frame(&self) -> Option<ArFrame>;
    fn raycast(&self, query: &RaycastQuery) -> Vec<RaycastHit>;
}

/// Out-of-band session notifications. Failures arrive with a
/// human-readable message and are surfaced to the caller instead of being
/// swallowed.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Failure { message: String },
    Interrupted,
    InterruptionEnded,
    TrackingChanged(TrackingQuality),
}

/// Channel carrying session events from callback context to whoever owns
/// the frame loop.
pub struct EventChannel {
    tx: flume::Sender<SessionEvent>,
    rx: flume::Receiver<SessionEvent>,
}

impl EventChannel {
    pub fn new() -> Self {
        let (tx, rx) = flume::unbounded();
        Self { tx, rx }
    }

    /// A cloneable sender for session callbacks.
    pub fn reporter(&self) -> EventReporter {
        EventReporter {
            tx: self.tx.clone(),
        }
    }

    /// Drain all events received since the last call.
    pub fn drain(&self) -> Vec<SessionEvent> {
        self.rx.try_iter().collect()
    }
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Posts session events; safe to call from any thread.
#[derive(Clone)]
pub struct EventReporter {
    tx: flume::Sender<SessionEvent>,
}

impl EventReporter {
    pub fn report(&self, event: SessionEvent) {
        if let SessionEvent::Failure { message } = &event {
            tracing::warn!(%message, "AR session failed");
        }
        let _ = self.tx.send(event);
    }

    pub fn report_failure(&self, message: impl Into<String>) {
        self.report(SessionEvent::Failure {
            message: message.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_events_reach_the_owner() {
        let channel = EventChannel::new();
        let reporter = channel.reporter();

        reporter.report_failure("tracking lost");
        reporter.report(SessionEvent::Interrupted);

        let events = channel.drain();
        assert_eq!(
            events,
            vec![
                SessionEvent::Failure {
                    message: "tracking lost".into()
                },
                SessionEvent::Interrupted,
            ]
        );
        assert!(channel.drain().is_empty());
    }
}
