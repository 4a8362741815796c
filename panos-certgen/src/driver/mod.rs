//! Certificate generation driver.
//!
//! The driver opens the device shell, synchronizes on the `>` prompt,
//! sends one `request certificate generate` line, synchronizes again and
//! checks the output for the success token.

mod builder;
mod generator;
mod params;
mod request;
mod response;
mod session;

pub use builder::{GeneratorBuilder, PANOS_PROMPT};
pub use generator::CertificateGenerator;
pub use params::CertificateParams;
pub use request::{CertificateRequest, DEFAULT_RSA_NBITS};
pub use response::{Response, SUCCESS_TOKEN};
pub use session::{EXIT_COMMAND, run_certificate_request};

use crate::error::Result;

/// Generate a self-signed certificate on the device described by `params`.
///
/// Not idempotent: every call issues a new generate command.
pub async fn generate_certificate(params: CertificateParams) -> Result<Response> {
    let (generator, request) = params.into_parts()?;
    generator.generate(&request).await
}
