//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Responders (Gemini, Anthropic-compatible, offline mock)
//! - Configuration (credential store, persona files) and the DI container
//! - Presentation (CLI controllers, single-page web server)

pub mod adapter;
pub mod api;
pub mod web;

pub use adapter::*;
