//! Invocation layer: parameter intake and outcome reporting.
//!
//! Parameters arrive as [`ModuleArgs`] (from flags or a JSON arguments
//! file), are validated into [`CertificateParams`](crate::driver::CertificateParams)
//! before any connection is made, and every run ends in exactly one
//! [`ModuleResult`].

mod args;
mod result;

pub use args::{CommonName, IntParam, MAX_TIMEOUT_SECS, ModuleArgs};
pub use result::{ModuleResult, SUCCESS_MESSAGE};

use log::error;

use crate::driver::generate_certificate;

/// Validate `args`, generate the certificate and report the outcome.
pub async fn run(args: ModuleArgs) -> ModuleResult {
    let result = match args.validate() {
        Ok(params) => generate_certificate(params).await,
        Err(e) => Err(e),
    };

    if let Err(ref e) = result {
        error!("{}", e);
    }
    ModuleResult::from(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args() -> ModuleArgs {
        ModuleArgs {
            // TEST-NET-1; never contacted because validation fails first
            ip_address: Some("192.0.2.1".to_string()),
            cert_cn: Some(CommonName::One("1.1.1.1".to_string())),
            cert_friendly_name: Some("test123".to_string()),
            signed_by: Some("root-ca".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_run_without_credential() {
        let result = run(args()).await;
        assert!(result.failed);
        assert_eq!(result.error_kind, Some("configuration"));
        assert!(result.stdout.is_none());
    }

    #[tokio::test]
    async fn test_run_with_both_credentials() {
        let result = run(ModuleArgs {
            password: Some("paloalto".to_string()),
            key_filename: Some(PathBuf::from("/home/admin/.ssh/id_rsa")),
            ..args()
        })
        .await;
        assert!(result.failed);
        assert_eq!(result.error_kind, Some("configuration"));
    }
}
