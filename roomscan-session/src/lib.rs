//! AR session collaborator seam for roomscan
//!
//! The tracking subsystem itself (pose estimation, plane detection,
//! raycasting) is an external collaborator. This crate defines the data it
//! delivers per frame, classifies incoming mesh anchors against the capture
//! volume, caches capture frames, and tracks the placement cursor and
//! virtual-object state driven by that data.

pub mod capture;
pub mod focus;
pub mod frame;
pub mod ingest;
pub mod object;
pub mod session;

pub use capture::*;
pub use focus::*;
pub use frame::*;
pub use ingest::*;
pub use object::*;
pub use session::*;
