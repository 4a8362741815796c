//! Error types for panos-certgen.

use std::io;
use thiserror::Error;

/// Main error type for certificate generation.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or missing invocation parameters
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Shell channel errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Driver-level errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),
}

/// Coarse classification of an [`Error`], used when reporting a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Parameters were rejected before any connection attempt.
    Configuration,
    /// Network or authentication failure while opening the session.
    Connection,
    /// No prompt arrived within the wait window.
    Timeout,
    /// The device answered, but without the success token.
    CertificateGeneration,
    /// Anything else.
    Unexpected,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Configuration,
            Error::Transport(_) => ErrorKind::Connection,
            Error::Channel(ChannelError::PromptTimeout(_)) => ErrorKind::Timeout,
            Error::Channel(_) => ErrorKind::Unexpected,
            Error::Driver(DriverError::CertificateGeneration { .. }) => {
                ErrorKind::CertificateGeneration
            }
        }
    }

    /// The failure text without the layer prefix, as reported to the caller.
    pub fn message(&self) -> String {
        match self {
            Error::Config(e) => e.to_string(),
            Error::Transport(e) => e.to_string(),
            Error::Channel(e) => e.to_string(),
            Error::Driver(e) => e.to_string(),
        }
    }

    /// Shell transcript carried by the error, if the session got that far.
    pub fn transcript(&self) -> Option<&str> {
        match self {
            Error::Driver(DriverError::CertificateGeneration { transcript }) => Some(transcript),
            _ => None,
        }
    }
}

/// Invocation parameter errors, raised before connecting.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required parameter was absent or empty
    #[error("missing required parameter '{name}'")]
    MissingParameter { name: &'static str },

    /// Neither key file nor password was supplied
    #[error("one of the following is required: key_filename, password")]
    NoCredential,

    /// Both key file and password were supplied
    #[error("parameters are mutually exclusive: key_filename, password")]
    ConflictingCredentials,

    /// A parameter had an unusable value
    #[error("invalid value for '{name}': {message}")]
    InvalidParameter { name: &'static str, message: String },

    /// The arguments file could not be read or parsed
    #[error("failed to load arguments from {path}: {message}")]
    ArgsFile { path: String, message: String },
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// The server presented a key that differs from known_hosts
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// Strict checking is on and the host is not in known_hosts
    #[error("Host key for {host}:{port} is not in known_hosts")]
    HostKeyUnknown { host: String, port: u16 },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Connection attempt timed out
    #[error("Connection timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Shell channel errors (prompt synchronization, reads and writes).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// No prompt was seen before the deadline
    #[error("Timeout waiting for prompt")]
    PromptTimeout(std::time::Duration),

    /// Shell closed before the prompt appeared
    #[error("Channel closed")]
    Closed,

    /// SSH protocol error on the channel
    #[error("Channel SSH error: {0}")]
    Ssh(russh::Error),

    /// I/O error while reading or writing the shell stream
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Driver layer errors (command execution and classification).
#[derive(Error, Debug)]
pub enum DriverError {
    /// The device did not report success; carries the full transcript
    #[error("Error generating self signed certificate: {transcript}")]
    CertificateGeneration { transcript: String },
}

/// Result type alias using panos-certgen's Error.
pub type Result<T> = std::result::Result<T, Error>;
