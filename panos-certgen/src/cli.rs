//! CLI argument definitions.

use std::path::PathBuf;

use clap::error::ErrorKind as ClapErrorKind;
use clap::{ArgAction, Parser};

use crate::error::{ConfigError, Error, Result};
use crate::module::{CommonName, IntParam, ModuleArgs};
use crate::transport::HostKeyVerification;

/// Top-level CLI parser for `panos-certgen`.
///
/// Parameters come either from flags or from a JSON arguments file. When
/// both are given, flags win.
#[derive(Debug, Parser)]
#[command(
    name = "panos-certgen",
    version,
    about = "Generate a self-signed certificate on a PAN-OS device over SSH"
)]
pub struct Cli {
    /// JSON file holding the parameters (Ansible binary module convention).
    pub args_file: Option<PathBuf>,

    /// IP address or hostname of the device.
    #[arg(long)]
    pub ip_address: Option<String>,

    /// SSH port.
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Private key file for the admin user.
    #[arg(long, short = 'k')]
    pub key_filename: Option<PathBuf>,

    /// Passphrase for an encrypted private key.
    #[arg(long, env = "PANOS_KEY_PASSPHRASE", hide_env_values = true)]
    pub key_passphrase: Option<String>,

    /// Password for the admin user.
    #[arg(long, env = "PANOS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Certificate common name; when repeated, only the first is used.
    #[arg(long, action = ArgAction::Append)]
    pub cert_cn: Vec<String>,

    /// Certificate name on the device (not the CN).
    #[arg(long)]
    pub cert_friendly_name: Option<String>,

    /// Certificate authority already present on the device.
    #[arg(long)]
    pub signed_by: Option<String>,

    /// RSA key size in bits [default: 2048].
    #[arg(long)]
    pub rsa_nbits: Option<u32>,

    /// Seconds to wait for each prompt [default: 60].
    #[arg(long, short = 't')]
    pub timeout: Option<u64>,

    /// Host key checking: strict, accept-new or disabled [default: accept-new].
    #[arg(long)]
    pub host_key_checking: Option<HostKeyVerification>,
}

impl Cli {
    /// Merge flags and the arguments file into one set of parameters.
    pub fn into_module_args(self) -> Result<ModuleArgs> {
        let from_file = match &self.args_file {
            Some(path) => ModuleArgs::from_file(path)?,
            None => ModuleArgs::default(),
        };

        let cert_cn = match self.cert_cn.len() {
            0 => None,
            1 => self.cert_cn.into_iter().next().map(CommonName::One),
            _ => Some(CommonName::Many(self.cert_cn)),
        };

        let from_flags = ModuleArgs {
            ip_address: self.ip_address,
            port: self.port.map(|p| IntParam::from(u64::from(p))),
            key_filename: self.key_filename,
            key_passphrase: self.key_passphrase,
            password: self.password,
            cert_cn,
            cert_friendly_name: self.cert_friendly_name,
            signed_by: self.signed_by,
            rsa_nbits: self.rsa_nbits.map(|n| IntParam::from(u64::from(n))),
            timeout: self.timeout.map(IntParam::from),
            host_key_checking: self.host_key_checking.map(|m| m.to_string()),
        };

        Ok(from_flags.or(from_file))
    }
}

/// Map a command-line parse failure onto a configuration error.
///
/// Returns `None` for `--help` and `--version`, which clap should print
/// and exit on as usual.
pub fn usage_error(err: &clap::Error) -> Option<Error> {
    match err.kind() {
        ClapErrorKind::DisplayHelp
        | ClapErrorKind::DisplayVersion
        | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => None,
        _ => {
            let rendered = err.to_string();
            let message = rendered
                .lines()
                .next()
                .unwrap_or_default()
                .trim_start_matches("error: ")
                .to_string();
            Some(
                ConfigError::InvalidParameter {
                    name: "arguments",
                    message,
                }
                .into(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::module::ModuleResult;
    use std::fs;

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from([
            "panos-certgen",
            "--ip-address",
            "192.168.1.1",
            "--password",
            "paloalto",
            "--cert-cn",
            "1.1.1.1",
            "--cert-friendly-name",
            "test123",
            "--signed-by",
            "root-ca",
        ])
        .unwrap();

        let params = cli.into_module_args().unwrap().validate().unwrap();
        assert_eq!(
            params.request.command_line(),
            "request certificate generate signed-by root-ca certificate-name test123 name 1.1.1.1 algorithm RSA rsa-nbits 2048"
        );
    }

    #[test]
    fn parses_multiple_common_names() {
        let cli = Cli::try_parse_from([
            "panos-certgen",
            "--cert-cn",
            "first.example.com",
            "--cert-cn",
            "second.example.com",
        ])
        .unwrap();
        assert_eq!(cli.cert_cn.len(), 2);
        let args = cli.into_module_args().unwrap();
        assert_eq!(
            args.cert_cn.as_ref().and_then(CommonName::first),
            Some("first.example.com")
        );
    }

    #[test]
    fn common_name_takes_one_value() {
        let cli = Cli::try_parse_from(["panos-certgen", "--cert-cn", "a", "args.json"]).unwrap();
        assert_eq!(cli.cert_cn, vec!["a".to_string()]);
        assert_eq!(cli.args_file, Some(PathBuf::from("args.json")));
    }

    #[test]
    fn rejects_bad_host_key_mode() {
        let err = Cli::try_parse_from(["panos-certgen", "--host-key-checking", "sometimes"]);
        assert!(err.is_err());
    }

    #[test]
    fn bad_flag_values_become_configuration_errors() {
        for args in [
            ["panos-certgen", "--port", "70000"],
            ["panos-certgen", "--rsa-nbits", "abc"],
            ["panos-certgen", "--host-key-checking", "sometimes"],
        ] {
            let err = Cli::try_parse_from(args).unwrap_err();
            let error = usage_error(&err).unwrap();
            assert_eq!(error.kind(), ErrorKind::Configuration);
            assert!(error.message().contains(args[1]), "{}", error.message());

            let result = ModuleResult::failure(&error);
            assert!(result.failed);
            assert_eq!(result.error_kind, Some("configuration"));
        }
    }

    #[test]
    fn help_and_version_are_not_errors() {
        for flag in ["--help", "--version"] {
            let err = Cli::try_parse_from(["panos-certgen", flag]).unwrap_err();
            assert!(usage_error(&err).is_none());
        }
    }

    #[test]
    fn flags_override_args_file() {
        let path = std::env::temp_dir()
            .join(format!("panos-certgen-args-{}.json", std::process::id()));
        let contents = r#"{
            "ip_address": "10.0.0.1",
            "password": "x",
            "cert_cn": "a",
            "cert_friendly_name": "b",
            "signed_by": "c",
            "rsa_nbits": "1024"
        }"#;
        fs::write(&path, contents).unwrap();

        let cli = Cli::try_parse_from([
            "panos-certgen",
            path.to_str().unwrap(),
            "--rsa-nbits",
            "4096",
        ])
        .unwrap();
        let args = cli.into_module_args();
        fs::remove_file(&path).unwrap();

        let params = args.unwrap().validate().unwrap();
        assert_eq!(params.host, "10.0.0.1");
        assert_eq!(params.request.rsa_nbits, 4096);
    }
}
