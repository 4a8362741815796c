//! Validated parameters for one certificate generation.

use std::time::Duration;

use super::builder::GeneratorBuilder;
use super::generator::CertificateGenerator;
use super::request::CertificateRequest;
use crate::error::Result;
use crate::transport::{AuthMethod, HostKeyVerification};

/// Everything needed to generate one certificate on one device.
///
/// Built once from caller input and read-only afterwards. Holding a single
/// [`AuthMethod`] means exactly one credential mechanism is ever in play.
#[derive(Debug)]
pub struct CertificateParams {
    /// Device hostname or IP address.
    pub host: String,

    /// SSH port.
    pub port: u16,

    /// Key file or password.
    pub credential: AuthMethod,

    /// What to generate.
    pub request: CertificateRequest,

    /// Timeout for each prompt wait.
    pub prompt_timeout: Duration,

    /// Host key verification mode.
    pub host_key_verification: HostKeyVerification,
}

impl CertificateParams {
    /// Split into a ready generator and the request it should run.
    pub fn into_parts(self) -> Result<(CertificateGenerator, CertificateRequest)> {
        let generator = GeneratorBuilder::new(self.host)
            .port(self.port)
            .auth(self.credential)
            .prompt_timeout(self.prompt_timeout)
            .host_key_verification(self.host_key_verification)
            .build()?;
        Ok((generator, self.request))
    }
}
