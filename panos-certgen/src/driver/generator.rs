//! SSH-backed certificate generator.

use log::{debug, warn};

use super::request::CertificateRequest;
use super::response::Response;
use super::session::run_certificate_request;
use crate::channel::PromptWaiter;
use crate::error::Result;
use crate::transport::{SshConfig, SshTransport};

/// Generates certificates on one device.
///
/// Each call to [`generate`](Self::generate) opens its own SSH session and
/// issues exactly one generate command. Nothing is retried.
#[derive(Debug)]
pub struct CertificateGenerator {
    ssh_config: SshConfig,
    waiter: PromptWaiter,
}

impl CertificateGenerator {
    /// Create a generator from an SSH configuration and prompt settings.
    pub fn new(ssh_config: SshConfig, waiter: PromptWaiter) -> Self {
        Self { ssh_config, waiter }
    }

    /// Get the SSH configuration.
    pub fn ssh_config(&self) -> &SshConfig {
        &self.ssh_config
    }

    /// Get the prompt waiter settings.
    pub fn waiter(&self) -> &PromptWaiter {
        &self.waiter
    }

    /// Connect, generate the certificate and disconnect.
    ///
    /// On any failure the session is dropped without a clean disconnect.
    pub async fn generate(self, request: &CertificateRequest) -> Result<Response> {
        let transport = SshTransport::connect(self.ssh_config).await?;
        let mut shell = transport.open_shell().await?;

        let response = run_certificate_request(&mut shell, request, &self.waiter).await?;

        drop(shell);
        // The certificate exists at this point; a failed goodbye does not undo it
        if let Err(e) = transport.close().await {
            warn!("failed to close session cleanly: {}", e);
        } else {
            debug!("session closed");
        }

        Ok(response)
    }
}
