//! Definitions of errors that can occur during the execution of the deploy scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use deploy_common::errors::DerivationError;

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug)]
pub enum ScriptError {
    /// A configuration value is malformed or inconsistent
    Config(String),
    /// The selected command needs a signer, but neither a private key nor a
    /// mnemonic was configured
    MissingCredential,
    /// Error initializing the signer or RPC client
    ClientInitialization(String),
    /// An address is not 20 bytes of hex, or fails its checksum
    InvalidAddress(String),
    /// A nonce is negative, fractional, or out of range
    InvalidNonce(String),
    /// The RPC provider failed to answer a query, surfaced verbatim
    ProviderUnavailable(String),
    /// Error parsing a compilation artifact
    ArtifactParsing(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error reading the deployments file
    ReadDeployments(String),
    /// Error writing the deployments file
    WriteDeployments(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Config(s) => write!(f, "invalid configuration: {}", s),
            ScriptError::MissingCredential => write!(
                f,
                "no deployer credential configured, set a private key or a mnemonic"
            ),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::InvalidAddress(s) => write!(f, "invalid address: {}", s),
            ScriptError::InvalidNonce(s) => write!(f, "invalid nonce: {}", s),
            ScriptError::ProviderUnavailable(s) => write!(f, "provider error: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ReadDeployments(s) => write!(f, "error reading deployments: {}", s),
            ScriptError::WriteDeployments(s) => write!(f, "error writing deployments: {}", s),
        }
    }
}

impl Error for ScriptError {}

impl From<DerivationError> for ScriptError {
    fn from(value: DerivationError) -> Self {
        match value {
            DerivationError::InvalidAddress(s) => ScriptError::InvalidAddress(s),
            DerivationError::InvalidNonce(s) => ScriptError::InvalidNonce(s),
        }
    }
}
