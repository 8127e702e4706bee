//! Exit code constants for the CLI application.
//!
//! Commands never call `process::exit` themselves; [`crate::run`] maps each
//! handler result onto one of these.

/// Success exit code (standard Unix convention).
pub const SUCCESS: i32 = 0;

/// General error exit code.
pub const ERROR: i32 = 2;
