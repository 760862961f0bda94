//! Cross-cutting editor systems.

pub mod hit_testing;
