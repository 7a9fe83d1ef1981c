//! GSS Diagnostic - error collection and reporting.
//!
//! Compilation problems are structured [`GssError`] values reported to an
//! [`ErrorManager`] as passes run. Nothing unwinds for a user-level
//! mistake; the driver inspects the accumulated set once all passes have
//! finished and renders it with [`render::format_error`] or a
//! [`render::TerminalEmitter`].

mod diagnostic;
mod manager;
pub mod render;

pub use diagnostic::{ErrorKind, GssError};
pub use manager::{AccumulatingErrorManager, ErrorManager, ErrorManagerConfig};
pub use render::{format_error, TerminalEmitter};
