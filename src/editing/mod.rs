//! Plan editing: the model, selection, commands and transform sessions.

pub mod commands;
pub mod entity;
pub mod selection;
pub mod transform;

pub use commands::{CommandStack, EditCommand};
pub use entity::{
    ArchId, ArchKind, ArchObject, ArchShape, EntityKey, Fixture, FixtureKey, PlanModel,
};
pub use selection::{SelectionPlugin, SelectionSet};
pub use transform::TransformSession;
