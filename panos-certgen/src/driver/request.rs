//! Certificate generation request and its CLI command line.

use std::fmt;

/// RSA key size used when the caller does not pick one.
pub const DEFAULT_RSA_NBITS: u32 = 2048;

/// Parameters of one `request certificate generate` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRequest {
    /// Certificate authority already present on the device.
    pub signed_by: String,

    /// Certificate name as shown on the device (not the CN).
    pub friendly_name: String,

    /// Certificate common name.
    pub common_name: String,

    /// RSA key size in bits.
    pub rsa_nbits: u32,
}

impl CertificateRequest {
    /// Create a request with the default RSA key size.
    pub fn new(
        signed_by: impl Into<String>,
        friendly_name: impl Into<String>,
        common_name: impl Into<String>,
    ) -> Self {
        Self {
            signed_by: signed_by.into(),
            friendly_name: friendly_name.into(),
            common_name: common_name.into(),
            rsa_nbits: DEFAULT_RSA_NBITS,
        }
    }

    /// Set the RSA key size.
    pub fn with_rsa_nbits(mut self, rsa_nbits: u32) -> Self {
        self.rsa_nbits = rsa_nbits;
        self
    }

    /// The operational command that generates the certificate, without newline.
    pub fn command_line(&self) -> String {
        format!(
            "request certificate generate signed-by {} certificate-name {} name {} algorithm RSA rsa-nbits {}",
            self.signed_by, self.friendly_name, self.common_name, self.rsa_nbits
        )
    }
}

impl fmt::Display for CertificateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (CN={}, signed by {}, RSA {})",
            self.friendly_name, self.common_name, self.signed_by, self.rsa_nbits
        )
    }
}
