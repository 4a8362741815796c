//! # panos-certgen
//!
//! Generate self-signed certificates on PAN-OS devices by driving the
//! operational CLI over an interactive SSH shell.
//!
//! ## Flow
//!
//! 1. Connect as `admin` with a password or a private key
//! 2. Wait for the `>` prompt
//! 3. Send `request certificate generate ...`
//! 4. Wait for the `>` prompt again and look for `Success`
//! 5. Send `exit` and disconnect
//!
//! Every failure (configuration, connection, timeout, missing success
//! token) ends the run. Nothing is retried.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use panos_certgen::{CertificateRequest, GeneratorBuilder};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), panos_certgen::Error> {
//!     let generator = GeneratorBuilder::new("192.168.1.1")
//!         .private_key("/home/me/.ssh/panos_admin")
//!         .build()?;
//!
//!     let request = CertificateRequest::new("root-ca", "gp-portal", "vpn.example.com")
//!         .with_rsa_nbits(2048);
//!
//!     let response = generator.generate(&request).await?;
//!     println!("{}", response.transcript());
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod cli;
pub mod driver;
pub mod error;
pub mod module;
pub mod transport;

// Re-export main types for convenience
pub use channel::{PromptWaiter, wait_for_prompt};
pub use driver::{
    CertificateGenerator, CertificateParams, CertificateRequest, GeneratorBuilder, Response,
    generate_certificate, run_certificate_request,
};
pub use error::{Error, ErrorKind};
pub use module::{ModuleArgs, ModuleResult};
pub use transport::{AuthMethod, HostKeyVerification, SshConfig};
