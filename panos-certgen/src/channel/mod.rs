//! Channel layer for prompt synchronization.
//!
//! This module reads the interactive shell until a prompt marker shows up
//! at the end of the output, with a hard deadline per wait.

mod buffer;
mod prompt;

pub use buffer::PromptBuffer;
pub use prompt::{DEFAULT_PROMPT_TIMEOUT, PromptWaiter, wait_for_prompt};
