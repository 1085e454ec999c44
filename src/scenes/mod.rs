//! The bundled showcase scenes.
//!
//! Each showcase is one [`SceneBuilder`](crate::stage::SceneBuilder) that
//! assembles its scene synchronously and hands any model import plus the
//! configuration depending on it to the stage as a patch future:
//!
//! - [`PhysicalMaterials`] puts PBR texture sets on a ground and a sphere
//! - [`CustomModel`] imports a single barrel model
//! - [`CompositeModel`] imports a multi-mesh campfire and moves it as one
//!   group through its root
//! - [`LightsAndShadows`] wires a spot light, a shadow generator, glow and
//!   an editor gizmo onto an imported room

mod campfire;
mod custom_models;
mod light_shadow;
mod pbr;

pub use campfire::CompositeModel;
pub use custom_models::CustomModel;
pub use light_shadow::LightsAndShadows;
pub use pbr::PhysicalMaterials;
