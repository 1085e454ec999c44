//! Render pipeline construction.
//!
//! - `scene` builds the single forward pipeline the viewer draws every
//!   node with

pub mod scene;
