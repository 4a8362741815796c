//! Prompt synchronization over an interactive shell stream.

use std::time::Duration;

use log::{debug, trace};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::Instant;

use super::buffer::PromptBuffer;
use crate::error::{ChannelError, Result};

/// Default time to wait for a prompt.
pub const DEFAULT_PROMPT_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum bytes taken from the shell per read.
const READ_CHUNK: usize = 4096;

/// Waits for a shell prompt character at the end of the output.
///
/// The deadline is fixed when [`wait`](Self::wait) is called; reads are
/// awaited rather than polled, so an idle shell costs nothing until either
/// data arrives or the deadline passes.
#[derive(Debug, Clone)]
pub struct PromptWaiter {
    prompt: char,
    timeout: Duration,
    search_depth: usize,
}

impl PromptWaiter {
    /// Create a waiter for `prompt` with the given timeout.
    pub fn new(prompt: char, timeout: Duration) -> Self {
        Self {
            prompt,
            timeout,
            search_depth: 1000,
        }
    }

    /// Set how many trailing bytes are inspected for the prompt.
    pub fn with_search_depth(mut self, search_depth: usize) -> Self {
        self.search_depth = search_depth;
        self
    }

    /// The prompt marker this waiter looks for.
    pub fn prompt(&self) -> char {
        self.prompt
    }

    /// The timeout applied to each wait.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Read from `shell` until the prompt appears, returning everything read.
    ///
    /// # Errors
    ///
    /// - [`ChannelError::PromptTimeout`] if the deadline passes first. Output
    ///   read so far is discarded.
    /// - [`ChannelError::Closed`] if the stream ends before the prompt.
    /// - [`ChannelError::Io`] on a read error.
    pub async fn wait<S>(&self, shell: &mut S) -> Result<String>
    where
        S: AsyncRead + Unpin + ?Sized,
    {
        // A timeout too large to represent as an instant never expires.
        let deadline = Instant::now().checked_add(self.timeout);
        let mut buffer = PromptBuffer::new(self.search_depth);
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            let read = match deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, shell.read(&mut chunk)).await,
                None => Ok(shell.read(&mut chunk).await),
            };
            let n = match read {
                Ok(read) => read.map_err(ChannelError::Io)?,
                Err(_) => {
                    debug!(
                        "no '{}' prompt after {:?} ({} bytes received)",
                        self.prompt,
                        self.timeout,
                        buffer.len()
                    );
                    return Err(ChannelError::PromptTimeout(self.timeout).into());
                }
            };

            if n == 0 {
                debug!("shell closed while waiting for '{}' prompt", self.prompt);
                return Err(ChannelError::Closed.into());
            }

            buffer.extend(&chunk[..n]);
            trace!("read {} bytes, buffer: {} bytes", n, buffer.len());

            if buffer.ends_with_prompt(self.prompt) {
                return Ok(buffer.into_string());
            }
        }
    }
}

/// Wait for `prompt` at the end of the shell output, or fail after `timeout`.
///
/// Shorthand for `PromptWaiter::new(prompt, timeout).wait(shell)`.
pub async fn wait_for_prompt<S>(shell: &mut S, prompt: char, timeout: Duration) -> Result<String>
where
    S: AsyncRead + Unpin + ?Sized,
{
    PromptWaiter::new(prompt, timeout).wait(shell).await
}
