//! Input/output handling for the editor.

pub mod input;
pub mod keyboard;
pub mod pointer;
