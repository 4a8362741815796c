//! Response type for a certificate generation run.

use std::time::Duration;

use memchr::memmem;

/// Token the device prints when the certificate was generated.
pub const SUCCESS_TOKEN: &str = "Success";

/// Output captured while generating a certificate.
#[derive(Debug, Clone)]
pub struct Response {
    /// The command line that was sent.
    pub command: String,

    /// Output up to and including the first prompt (login banner).
    pub banner: String,

    /// Output after the command, up to and including the next prompt.
    pub output: String,

    /// Time from opening the shell to the completion prompt.
    pub elapsed: Duration,
}

impl Response {
    /// Create a new response.
    pub fn new(
        command: impl Into<String>,
        banner: impl Into<String>,
        output: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            command: command.into(),
            banner: banner.into(),
            output: output.into(),
            elapsed,
        }
    }

    /// Whether the command output carries the success token.
    ///
    /// The banner is not considered.
    pub fn is_success(&self) -> bool {
        memmem::find(self.output.as_bytes(), SUCCESS_TOKEN.as_bytes()).is_some()
    }

    /// Banner and command output, concatenated.
    pub fn transcript(&self) -> String {
        let mut transcript = String::with_capacity(self.banner.len() + self.output.len());
        transcript.push_str(&self.banner);
        transcript.push_str(&self.output);
        transcript
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.banner, self.output)
    }
}
