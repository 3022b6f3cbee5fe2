//! # ChatRelay Core
//!
//! Domain types, traits, and error definitions for the ChatRelay service.
//! This crate has **zero framework dependencies** — it defines the domain model
//! that all other crates implement against.
//!
//! The inference backend is defined as a trait here; the HTTP implementation
//! lives in `chatrelay-providers`, and tests swap in scripted mocks.

pub mod error;
pub mod message;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result};
pub use message::{ConversationId, Message, Role};
pub use provider::{GenerateRequest, GenerateResponse, MAX_LENGTH, Provider};
