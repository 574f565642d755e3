//! The validated configuration passed into every command

use std::{
    fmt::{self, Debug, Formatter},
    path::PathBuf,
    time::Duration,
};

use url::Url;

use crate::{cli::ConfigArgs, errors::ScriptError};

/// The secret from which the deployer's signing key is built
#[derive(Clone)]
pub enum Credential {
    /// A hex-encoded secp256k1 private key
    PrivateKey(String),
    /// A BIP-39 mnemonic and the index of the account derived from it
    Mnemonic {
        /// The mnemonic phrase
        phrase: String,
        /// The account index along the default derivation path
        index: u32,
    },
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Credential::PrivateKey(_) => f.write_str("PrivateKey(<redacted>)"),
            Credential::Mnemonic { index, .. } => f
                .debug_struct("Mnemonic")
                .field("phrase", &"<redacted>")
                .field("index", index)
                .finish(),
        }
    }
}

/// Configuration for the deploy scripts, built once at startup from CLI
/// arguments and the environment
#[derive(Clone, Debug)]
pub struct DeployConfig {
    /// The RPC endpoint of the target chain
    pub rpc_url: Url,
    /// The deployer's credential, absent only for commands that never sign
    pub credential: Option<Credential>,
    /// How long to wait before broadcasting a deployment
    pub deploy_delay: Duration,
    /// How many confirmations to wait for on deployment transactions
    pub confirmations: u64,
    /// The file in which deployed addresses are recorded
    pub deployments_path: PathBuf,
}

impl DeployConfig {
    /// Validate the raw arguments.
    ///
    /// A missing credential is a fatal error whenever the selected command
    /// needs a signer.
    pub fn from_args(args: ConfigArgs, requires_signer: bool) -> Result<Self, ScriptError> {
        let rpc_url = Url::parse(&args.rpc_url)
            .map_err(|e| ScriptError::Config(format!("RPC URL {:?}: {}", args.rpc_url, e)))?;

        let credential = match (non_empty(args.priv_key), non_empty(args.mnemonic)) {
            (Some(_), Some(_)) => {
                return Err(ScriptError::Config(
                    "a private key and a mnemonic are mutually exclusive".to_string(),
                ))
            }
            (Some(key), None) => Some(Credential::PrivateKey(key)),
            (None, Some(phrase)) => Some(Credential::Mnemonic {
                phrase,
                index: args.mnemonic_index,
            }),
            (None, None) => None,
        };

        if requires_signer && credential.is_none() {
            return Err(ScriptError::MissingCredential);
        }

        Ok(DeployConfig {
            rpc_url,
            credential,
            deploy_delay: Duration::from_secs(args.delay_secs),
            confirmations: args.confirmations,
            deployments_path: args.deployments_path,
        })
    }

    /// The deployer's credential
    pub fn credential(&self) -> Result<&Credential, ScriptError> {
        self.credential.as_ref().ok_or(ScriptError::MissingCredential)
    }
}

/// Treat blank values, e.g. `PKEY=` in a `.env` file, as unset
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
