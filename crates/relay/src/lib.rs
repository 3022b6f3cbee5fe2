//! The relay — the heart of ChatRelay.
//!
//! One exchange follows a fixed sequence:
//!
//! 1. **Validate** the user input (empty input never reaches the backend)
//! 2. **Lock** the conversation, creating it on first use
//! 3. **Assemble** the prompt, optionally framed with recent history
//! 4. **Generate** a reply via the configured provider
//! 5. **Record** the user/assistant pair and trim history to its cap
//!
//! A failed backend call leaves the conversation exactly as it was.

pub mod assembler;
pub mod service;

pub use assembler::{HISTORY_WINDOW, assemble_prompt};
pub use service::{ChatOutcome, ChatRequest, RelayService};
