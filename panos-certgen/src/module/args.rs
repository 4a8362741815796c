//! Invocation parameters and their validation.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use serde_json::Value;

use crate::channel::DEFAULT_PROMPT_TIMEOUT;
use crate::driver::{CertificateParams, CertificateRequest, DEFAULT_RSA_NBITS};
use crate::error::{ConfigError, Result};
use crate::transport::{AuthMethod, HostKeyVerification};

/// Longest accepted prompt timeout, in seconds (one day).
pub const MAX_TIMEOUT_SECS: u64 = 86_400;

/// Key Ansible uses when it wraps module arguments.
const WRAPPED_ARGS_KEY: &str = "ANSIBLE_MODULE_ARGS";

/// A common name given either as one string or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CommonName {
    /// A single common name.
    One(String),
    /// Several names; only the first is used.
    Many(Vec<String>),
}

impl CommonName {
    /// The common name that goes into the request.
    pub fn first(&self) -> Option<&str> {
        match self {
            CommonName::One(name) => Some(name.as_str()),
            CommonName::Many(names) => names.first().map(String::as_str),
        }
    }
}

/// An integer that may arrive as a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IntParam {
    /// `2048`
    Number(u64),
    /// `"2048"`
    Text(String),
}

impl IntParam {
    fn parse(&self, name: &'static str) -> std::result::Result<u64, ConfigError> {
        match self {
            IntParam::Number(n) => Ok(*n),
            IntParam::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidParameter {
                    name,
                    message: format!("'{s}' is not an integer"),
                }),
        }
    }
}

impl From<u64> for IntParam {
    fn from(n: u64) -> Self {
        IntParam::Number(n)
    }
}

/// Raw invocation parameters, as given on the command line or in an
/// arguments file.
///
/// Nothing is checked until [`validate`](Self::validate). Unknown keys in
/// an arguments file are ignored.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct ModuleArgs {
    /// Device hostname or IP address.
    pub ip_address: Option<String>,
    /// SSH port.
    pub port: Option<IntParam>,
    /// Private key file for authentication.
    pub key_filename: Option<PathBuf>,
    /// Passphrase for an encrypted private key.
    pub key_passphrase: Option<String>,
    /// Password for authentication.
    pub password: Option<String>,
    /// Certificate common name.
    pub cert_cn: Option<CommonName>,
    /// Certificate name on the device.
    pub cert_friendly_name: Option<String>,
    /// Signing certificate authority.
    pub signed_by: Option<String>,
    /// RSA key size in bits.
    pub rsa_nbits: Option<IntParam>,
    /// Prompt timeout in seconds.
    pub timeout: Option<IntParam>,
    /// Host key checking mode.
    pub host_key_checking: Option<String>,
}

impl ModuleArgs {
    /// Parse arguments from JSON, accepting both bare and
    /// `ANSIBLE_MODULE_ARGS`-wrapped objects.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let mut value: Value = serde_json::from_str(json)?;
        if let Some(inner) = value.get_mut(WRAPPED_ARGS_KEY) {
            value = inner.take();
        }
        serde_json::from_value(value)
    }

    /// Load arguments from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let args_file_error = |message: String| ConfigError::ArgsFile {
            path: path.display().to_string(),
            message,
        };

        let json = fs::read_to_string(path).map_err(|e| args_file_error(e.to_string()))?;
        let args = Self::from_json(&json).map_err(|e| args_file_error(e.to_string()))?;
        Ok(args)
    }

    /// Fill every field that is unset here from `other`.
    pub fn or(self, other: ModuleArgs) -> Self {
        Self {
            ip_address: self.ip_address.or(other.ip_address),
            port: self.port.or(other.port),
            key_filename: self.key_filename.or(other.key_filename),
            key_passphrase: self.key_passphrase.or(other.key_passphrase),
            password: self.password.or(other.password),
            cert_cn: self.cert_cn.or(other.cert_cn),
            cert_friendly_name: self.cert_friendly_name.or(other.cert_friendly_name),
            signed_by: self.signed_by.or(other.signed_by),
            rsa_nbits: self.rsa_nbits.or(other.rsa_nbits),
            timeout: self.timeout.or(other.timeout),
            host_key_checking: self.host_key_checking.or(other.host_key_checking),
        }
    }

    /// Check the arguments and build the generation parameters.
    ///
    /// Runs entirely offline; nothing here touches the network. A key file
    /// is checked for existence so a bad path fails before connecting.
    pub fn validate(self) -> Result<CertificateParams> {
        let host = required(self.ip_address, "ip_address")?;

        let credential = match (non_empty(self.key_filename), non_empty(self.password)) {
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingCredentials.into()),
            (None, None) => return Err(ConfigError::NoCredential.into()),
            (None, Some(password)) => AuthMethod::Password(SecretString::from(password)),
            (Some(path), None) => {
                if !path.is_file() {
                    return Err(ConfigError::InvalidParameter {
                        name: "key_filename",
                        message: format!("{} is not a readable file", path.display()),
                    }
                    .into());
                }
                AuthMethod::PrivateKey {
                    path,
                    passphrase: non_empty(self.key_passphrase).map(SecretString::from),
                }
            }
        };

        let common_name = self
            .cert_cn
            .as_ref()
            .and_then(CommonName::first)
            .map(str::to_string);
        let common_name = required(common_name, "cert_cn")?;
        let friendly_name = required(self.cert_friendly_name, "cert_friendly_name")?;
        let signed_by = required(self.signed_by, "signed_by")?;

        let rsa_nbits = match self.rsa_nbits {
            Some(bits) => positive::<u32>(&bits, "rsa_nbits")?,
            None => DEFAULT_RSA_NBITS,
        };

        let port = match self.port {
            Some(port) => positive::<u16>(&port, "port")?,
            None => 22,
        };

        let prompt_timeout = match self.timeout {
            Some(secs) => {
                let secs = positive::<u64>(&secs, "timeout")?;
                if secs > MAX_TIMEOUT_SECS {
                    return Err(ConfigError::InvalidParameter {
                        name: "timeout",
                        message: format!("{secs} is above the {MAX_TIMEOUT_SECS} second limit"),
                    }
                    .into());
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_PROMPT_TIMEOUT,
        };

        let host_key_verification = match non_empty(self.host_key_checking) {
            Some(mode) => mode
                .parse::<HostKeyVerification>()
                .map_err(|message| ConfigError::InvalidParameter {
                    name: "host_key_checking",
                    message,
                })?,
            None => HostKeyVerification::default(),
        };

        Ok(CertificateParams {
            host,
            port,
            credential,
            request: CertificateRequest::new(signed_by, friendly_name, common_name)
                .with_rsa_nbits(rsa_nbits),
            prompt_timeout,
            host_key_verification,
        })
    }
}

/// Treat empty strings and paths as absent.
fn non_empty<T: AsRef<std::ffi::OsStr>>(value: Option<T>) -> Option<T> {
    value.filter(|v| !v.as_ref().is_empty())
}

fn required(value: Option<String>, name: &'static str) -> std::result::Result<String, ConfigError> {
    non_empty(value).ok_or(ConfigError::MissingParameter { name })
}

fn positive<T: TryFrom<u64>>(
    value: &IntParam,
    name: &'static str,
) -> std::result::Result<T, ConfigError> {
    let n = value.parse(name)?;
    if n == 0 {
        return Err(ConfigError::InvalidParameter {
            name,
            message: "must be greater than zero".to_string(),
        });
    }
    T::try_from(n).map_err(|_| ConfigError::InvalidParameter {
        name,
        message: format!("{n} is out of range"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorKind};

    fn base_args() -> ModuleArgs {
        ModuleArgs {
            ip_address: Some("192.168.1.1".to_string()),
            password: Some("paloalto".to_string()),
            cert_cn: Some(CommonName::One("1.1.1.1".to_string())),
            cert_friendly_name: Some("test123".to_string()),
            signed_by: Some("root-ca".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_defaults() {
        let params = base_args().validate().unwrap();
        assert_eq!(params.host, "192.168.1.1");
        assert_eq!(params.port, 22);
        assert_eq!(params.request.rsa_nbits, 2048);
        assert_eq!(params.prompt_timeout, Duration::from_secs(60));
        assert_eq!(params.host_key_verification, HostKeyVerification::AcceptNew);
        assert!(matches!(params.credential, AuthMethod::Password(_)));
        assert_eq!(
            params.request.command_line(),
            "request certificate generate signed-by root-ca certificate-name test123 name 1.1.1.1 algorithm RSA rsa-nbits 2048"
        );
    }

    #[test]
    fn test_no_credential() {
        let args = ModuleArgs {
            password: None,
            ..base_args()
        };
        let err = args.validate().unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::NoCredential)));
    }

    #[test]
    fn test_both_credentials() {
        let args = ModuleArgs {
            key_filename: Some(PathBuf::from("/tmp/id_rsa")),
            ..base_args()
        };
        let err = args.validate().unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ConflictingCredentials)));
    }

    #[test]
    fn test_empty_password_counts_as_absent() {
        let args = ModuleArgs {
            password: Some(String::new()),
            ..base_args()
        };
        let err = args.validate().unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::NoCredential)));
    }

    #[test]
    fn test_missing_key_file() {
        let args = ModuleArgs {
            password: None,
            key_filename: Some(PathBuf::from("/nonexistent/panos-certgen/id_rsa")),
            ..base_args()
        };
        let err = args.validate().unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidParameter { name: "key_filename", .. })
        ));
    }

    #[test]
    fn test_key_file_credential() {
        let path = std::env::temp_dir().join(format!("panos-certgen-key-{}", std::process::id()));
        fs::write(&path, "not really a key").unwrap();

        let args = ModuleArgs {
            password: None,
            key_filename: Some(path.clone()),
            key_passphrase: Some("pass".to_string()),
            ..base_args()
        };
        let params = args.validate().unwrap();
        fs::remove_file(&path).unwrap();

        match params.credential {
            AuthMethod::PrivateKey { path: key, passphrase } => {
                assert_eq!(key, path);
                assert!(passphrase.is_some());
            }
            other => panic!("unexpected credential: {other:?}"),
        }
    }

    #[test]
    fn test_missing_required() {
        for (args, expected) in [
            (
                ModuleArgs {
                    ip_address: None,
                    ..base_args()
                },
                "ip_address",
            ),
            (
                ModuleArgs {
                    cert_cn: None,
                    ..base_args()
                },
                "cert_cn",
            ),
            (
                ModuleArgs {
                    cert_friendly_name: Some(String::new()),
                    ..base_args()
                },
                "cert_friendly_name",
            ),
            (
                ModuleArgs {
                    signed_by: None,
                    ..base_args()
                },
                "signed_by",
            ),
        ] {
            match args.validate().unwrap_err() {
                Error::Config(ConfigError::MissingParameter { name }) => assert_eq!(name, expected),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn test_common_name_list_uses_first() {
        let args = ModuleArgs {
            cert_cn: Some(CommonName::Many(vec![
                "vpn.example.com".to_string(),
                "10.0.0.1".to_string(),
            ])),
            ..base_args()
        };
        let params = args.validate().unwrap();
        assert_eq!(params.request.common_name, "vpn.example.com");
        assert!(params.request.command_line().contains(" name vpn.example.com "));
        assert!(!params.request.command_line().contains("10.0.0.1"));
    }

    #[test]
    fn test_empty_common_name_list() {
        let args = ModuleArgs {
            cert_cn: Some(CommonName::Many(vec![])),
            ..base_args()
        };
        let err = args.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_from_json() {
        let args = ModuleArgs::from_json(
            r#"{
                "ip_address": "192.168.1.1",
                "password": "paloalto",
                "cert_cn": ["1.1.1.1", "2.2.2.2"],
                "cert_friendly_name": "test123",
                "signed_by": "root-ca",
                "rsa_nbits": "4096",
                "port": 2222,
                "_ansible_check_mode": false
            }"#,
        )
        .unwrap();

        let params = args.validate().unwrap();
        assert_eq!(params.port, 2222);
        assert_eq!(params.request.common_name, "1.1.1.1");
        assert_eq!(params.request.rsa_nbits, 4096);
    }

    #[test]
    fn test_from_wrapped_json() {
        let args = ModuleArgs::from_json(
            r#"{"ANSIBLE_MODULE_ARGS": {"ip_address": "fw1", "key_filename": "/k", "cert_cn": "x"}}"#,
        )
        .unwrap();
        assert_eq!(args.ip_address.as_deref(), Some("fw1"));
        assert_eq!(args.cert_cn, Some(CommonName::One("x".to_string())));
    }

    #[test]
    fn test_timeout_limit() {
        let args = ModuleArgs {
            timeout: Some(IntParam::Number(u64::MAX)),
            ..base_args()
        };
        assert!(matches!(
            args.validate().unwrap_err(),
            Error::Config(ConfigError::InvalidParameter { name: "timeout", .. })
        ));

        let args = ModuleArgs {
            timeout: Some(IntParam::Number(MAX_TIMEOUT_SECS)),
            ..base_args()
        };
        let params = args.validate().unwrap();
        assert_eq!(params.prompt_timeout, Duration::from_secs(MAX_TIMEOUT_SECS));
    }

    #[test]
    fn test_invalid_numbers() {
        let args = ModuleArgs {
            rsa_nbits: Some(IntParam::Text("lots".to_string())),
            ..base_args()
        };
        assert!(matches!(
            args.validate().unwrap_err(),
            Error::Config(ConfigError::InvalidParameter { name: "rsa_nbits", .. })
        ));

        let args = ModuleArgs {
            port: Some(IntParam::Number(70000)),
            ..base_args()
        };
        assert!(matches!(
            args.validate().unwrap_err(),
            Error::Config(ConfigError::InvalidParameter { name: "port", .. })
        ));

        let args = ModuleArgs {
            timeout: Some(IntParam::Number(0)),
            ..base_args()
        };
        assert!(matches!(
            args.validate().unwrap_err(),
            Error::Config(ConfigError::InvalidParameter { name: "timeout", .. })
        ));
    }

    #[test]
    fn test_or_prefers_self() {
        let cli = ModuleArgs {
            ip_address: Some("cli-host".to_string()),
            ..Default::default()
        };
        let merged = cli.or(base_args());
        assert_eq!(merged.ip_address.as_deref(), Some("cli-host"));
        assert_eq!(merged.signed_by.as_deref(), Some("root-ca"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = ModuleArgs::from_file(Path::new("/nonexistent/args.json"))
            .err()
            .unwrap();
        assert!(matches!(err, Error::Config(ConfigError::ArgsFile { .. })));
    }
}
