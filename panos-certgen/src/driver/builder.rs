//! Builder for creating certificate generators.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use super::generator::CertificateGenerator;
use crate::channel::{DEFAULT_PROMPT_TIMEOUT, PromptWaiter};
use crate::error::{ConfigError, Result};
use crate::transport::{AuthMethod, DEFAULT_USERNAME, HostKeyVerification, SshConfig};

/// Prompt marker printed by the PAN-OS operational CLI.
pub const PANOS_PROMPT: char = '>';

/// Builder for constructing a [`CertificateGenerator`].
///
/// # Example
///
/// ```rust,no_run
/// use panos_certgen::driver::{CertificateRequest, GeneratorBuilder};
///
/// # async fn example() -> Result<(), panos_certgen::Error> {
/// let generator = GeneratorBuilder::new("192.168.1.1")
///     .password("paloalto")
///     .build()?;
///
/// let request = CertificateRequest::new("root-ca", "test123", "1.1.1.1");
/// let response = generator.generate(&request).await?;
/// println!("{}", response.transcript());
/// # Ok(())
/// # }
/// ```
pub struct GeneratorBuilder {
    host: String,
    port: u16,
    username: String,
    auth: Option<AuthMethod>,
    timeout: Duration,
    prompt_timeout: Duration,
    terminal_width: u32,
    terminal_height: u32,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
}

impl GeneratorBuilder {
    /// Create a new builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: DEFAULT_USERNAME.to_string(),
            auth: None,
            timeout: Duration::from_secs(30),
            prompt_timeout: DEFAULT_PROMPT_TIMEOUT,
            terminal_width: 511,
            terminal_height: 24,
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
        }
    }

    /// Set the SSH port (default: 22).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Override the login user (default: `admin`).
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Set password authentication.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.auth = Some(AuthMethod::Password(SecretString::from(password.into())));
        self
    }

    /// Set private key authentication.
    pub fn private_key(mut self, key_path: impl Into<PathBuf>) -> Self {
        self.auth = Some(AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: None,
        });
        self
    }

    /// Set private key authentication with passphrase.
    pub fn private_key_with_passphrase(
        mut self,
        key_path: impl Into<PathBuf>,
        passphrase: impl Into<String>,
    ) -> Self {
        self.auth = Some(AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: Some(SecretString::from(passphrase.into())),
        });
        self
    }

    /// Set an already built authentication method.
    pub fn auth(mut self, auth: AuthMethod) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Set the connection timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set how long each prompt wait may take (default: 60s).
    pub fn prompt_timeout(mut self, timeout: Duration) -> Self {
        self.prompt_timeout = timeout;
        self
    }

    /// Set terminal dimensions.
    pub fn terminal_size(mut self, width: u32, height: u32) -> Self {
        self.terminal_width = width;
        self.terminal_height = height;
        self
    }

    /// Set the host key verification mode.
    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.host_key_verification = mode;
        self
    }

    /// Use a specific known_hosts file instead of `~/.ssh/known_hosts`.
    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    /// Build the generator.
    ///
    /// This does not connect; [`CertificateGenerator::generate`] does.
    pub fn build(self) -> Result<CertificateGenerator> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::MissingParameter { name: "ip_address" }.into());
        }

        let auth = self.auth.ok_or(ConfigError::NoCredential)?;

        let ssh_config = SshConfig {
            host: self.host,
            port: self.port,
            username: self.username,
            auth,
            timeout: self.timeout,
            terminal_width: self.terminal_width,
            terminal_height: self.terminal_height,
            host_key_verification: self.host_key_verification,
            known_hosts_path: self.known_hosts_path,
        };

        Ok(CertificateGenerator::new(
            ssh_config,
            PromptWaiter::new(PANOS_PROMPT, self.prompt_timeout),
        ))
    }
}
