//! diorama
//!
//! A collection of small showcase scenes built on a declarative
//! scene-assembly layer: ordered construction of camera, environment,
//! materials and lights, with asynchronous glTF imports interleaved with the
//! synchronous setup. The scene itself is pure data; a thin wgpu viewer
//! presents it so the showcases have something on screen.
//!
//! High-level modules
//! - `scene`: the scene model (nodes, materials, lights, shadows, gizmos,
//!   patches)
//! - `resources`: asset paths, async loading and the glTF importer
//! - `stage`: the builder trait, the run loop and the headless driver
//! - `scenes`: the bundled showcase scenes
//! - `camera`, `context`, `geometry`, `pipelines`, `render`: the stand-in
//!   presenter
//!

pub mod camera;
pub mod context;
pub mod geometry;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;
pub mod scenes;
pub mod stage;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;
