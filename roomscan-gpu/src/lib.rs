//! # roomscan GPU
//!
//! The rendering half of the scanning pipeline: a wgpu device context, the
//! triple-buffered uniform ring with its admission gate, the camera YCbCr
//! texture bridge, and the renderer that composites the camera passthrough
//! with the classified reconstruction meshes and their wireframe outlines.

pub mod camera;
pub mod device;
pub mod renderer;
pub mod ring;

pub use camera::{CameraTextureBridge, PlaneView};
pub use device::GpuContext;
pub use renderer::{FrameInput, RenderConfig, ScanRenderer};
pub use ring::{
    AdmissionGate, FrameUniforms, GateReleaser, GateToken, InstanceUniforms, UniformRing,
    ALIGNED_FRAME_UNIFORMS_SIZE, ALIGNED_INSTANCE_UNIFORMS_SIZE, MAX_ANCHOR_INSTANCES,
    MAX_FRAMES_IN_FLIGHT,
};
