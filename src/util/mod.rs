//! # Utility Modules
//!
//! Common helpers used throughout the si4703-rs crate.

pub mod logging;

pub use logging::{log_registers, LogThrottle};
