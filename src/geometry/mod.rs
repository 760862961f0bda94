//! Geometric Primitives and Operations

pub mod plan_space;

// Re-export commonly used items
pub use plan_space::{PlanPoint, PlanRotation, PlanVec3};
