//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the command pipeline so route handlers can stay
//! focused on protocol translation and status mapping.

pub mod command;
pub mod prompt;
