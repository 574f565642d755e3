//! Read-only chain queries used around a deployment: whether code lives at an
//! address, and which nonce a deployer will send next

use std::future::Future;

use alloy::{
    primitives::{Address, Bytes},
    providers::Provider,
};
use deploy_common::types::{DeployerIdentity, Nonce};
use tracing::debug;

use crate::errors::ScriptError;

/// A source of the code stored at an address
pub trait CodeReader {
    /// The code stored at `address`, empty if no contract lives there
    fn code_at(&self, address: Address) -> impl Future<Output = Result<Bytes, ScriptError>>;
}

/// A source of account nonces
pub trait NonceReader {
    /// The number of transactions `address` has sent, i.e. the nonce of its
    /// next transaction
    fn nonce_of(&self, address: Address) -> impl Future<Output = Result<Nonce, ScriptError>>;
}

impl<P: Provider> CodeReader for P {
    async fn code_at(&self, address: Address) -> Result<Bytes, ScriptError> {
        self.get_code_at(address)
            .await
            .map_err(|e| ScriptError::ProviderUnavailable(e.to_string()))
    }
}

impl<P: Provider> NonceReader for P {
    async fn nonce_of(&self, address: Address) -> Result<Nonce, ScriptError> {
        self.get_transaction_count(address)
            .await
            .map(Nonce::new)
            .map_err(|e| ScriptError::ProviderUnavailable(e.to_string()))
    }
}

/// Returns `address` if code is stored there, `None` if nothing has been
/// deployed to it yet.
///
/// Provider errors are returned as-is, without retrying.
pub async fn deployed_at(
    reader: &impl CodeReader,
    address: Address,
) -> Result<Option<Address>, ScriptError> {
    let code = reader.code_at(address).await?;
    debug!("Found {} bytes of code at {:#x}", code.len(), address);

    Ok((!code.is_empty()).then_some(address))
}

/// The address a deployer's next contract will occupy, and whether code
/// already lives there
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PredictedDeployment {
    /// The derived contract address
    pub address: Address,
    /// Whether code is already stored at the derived address
    pub deployed: bool,
}

/// Derive the contract address for `identity` and check for code at it
pub async fn predict_deployment(
    reader: &impl CodeReader,
    identity: &DeployerIdentity,
) -> Result<PredictedDeployment, ScriptError> {
    let address = identity.contract_address();
    let deployed = deployed_at(reader, address).await?.is_some();

    Ok(PredictedDeployment { address, deployed })
}
