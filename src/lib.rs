//! Outliner - tree-model projection of a 3D scene graph
//!
//! `scene` holds the scene graph and the port the outliner talks to,
//! `outline` the projected item model with its drag-and-drop reparenting.

pub mod core;
pub mod scene;
pub mod outline;
