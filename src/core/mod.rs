//! Application infrastructure: session, CLI, settings, errors and raw input.

pub mod app;
pub mod cli;
pub mod errors;
pub mod io;
pub mod session;
pub mod settings;

pub use app::create_app;
pub use session::EditorSession;
