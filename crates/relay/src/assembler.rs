//! Prompt assembly.
//!
//! The backend accepts a single prompt string, so prior turns are folded in
//! as plain `"User: ..."` / `"Assistant: ..."` lines:
//!
//! ```text
//! User: What is Rust?
//! Assistant: A systems programming language.
//! User: Who made it?
//! ```
//!
//! Only the most recent [`HISTORY_WINDOW`] messages are used. This window is
//! independent of the storage cap in `chatrelay-memory`.

use chatrelay_core::message::Message;

/// Number of most recent messages folded into the prompt.
pub const HISTORY_WINDOW: usize = 5;

/// Build the prompt for `input` given the conversation's stored `history`.
///
/// With `include_history` off, or with no history yet, the prompt is the raw
/// input with no framing.
pub fn assemble_prompt(history: &[Message], input: &str, include_history: bool) -> String {
    if !include_history || history.is_empty() {
        return input.to_string();
    }

    let start = history.len().saturating_sub(HISTORY_WINDOW);
    let mut lines: Vec<String> = history[start..].iter().map(Message::prompt_line).collect();
    lines.push(Message::user(input).prompt_line());
    lines.join("\n")
}
