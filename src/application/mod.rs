//! # Application Layer
//!
//! The chat session use case and the responder interface it consumes.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
