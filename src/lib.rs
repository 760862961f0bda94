//! Maquette - a 3D retail floor-plan editor built with the Bevy game engine.
//!
//! The crate is split by concern: `geometry` owns the plan/render coordinate
//! mapping, `editing` owns the model, selection, undo history and transform
//! sessions, `tools` owns the active-tool framework, `systems` holds shared
//! ray-casting helpers, `rendering` presents the scene and `data` loads
//! plans and catalogs. `core` wires everything into an application.

pub mod core;
pub mod data;
pub mod editing;
pub mod geometry;
pub mod logger;
pub mod rendering;
pub mod systems;
pub mod tools;

#[cfg(test)]
mod tests;
