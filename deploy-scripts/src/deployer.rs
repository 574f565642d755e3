//! The deployment capability invoked by the deploy workflow, and its
//! implementation for compiled contract artifacts

use std::{fs, future::Future, path::Path};

use alloy::{
    hex,
    network::{ReceiptResponse, TransactionBuilder},
    primitives::{Address, Bytes, TxHash},
    providers::Provider,
    rpc::types::TransactionRequest,
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::ScriptError;

/// The outcome of a successful deployment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeploymentReceipt {
    /// The address of the deployed contract
    pub address: Address,
    /// The hash of the contract-creating transaction
    pub tx_hash: TxHash,
}

/// A deployment target: given a funded signing client, deploys its contract
/// and reports where it landed
pub trait ContractDeployer<C> {
    /// Broadcast the deployment and wait for it to be confirmed
    fn deploy(&self, client: &C) -> impl Future<Output = Result<DeploymentReceipt, ScriptError>>;
}

/// Deploys the init code of a compiled contract artifact
#[derive(Clone, Debug)]
pub struct ArtifactDeployer {
    /// The contract's init code, with constructor arguments appended
    init_code: Bytes,
    /// The number of confirmations to wait for
    confirmations: u64,
}

impl ArtifactDeployer {
    pub fn new(init_code: Bytes, confirmations: u64) -> Self {
        ArtifactDeployer {
            init_code,
            confirmations,
        }
    }

    /// Load the init code from an artifact file, appending the hex-encoded
    /// constructor arguments if given
    pub fn from_artifact(
        path: &Path,
        constructor_args: Option<&str>,
        confirmations: u64,
    ) -> Result<Self, ScriptError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", path.display(), e)))?;
        let mut init_code = parse_artifact_bytecode(&contents)?;

        if let Some(args) = constructor_args {
            let args = hex::decode(args.trim()).map_err(|e| {
                ScriptError::ArtifactParsing(format!("constructor arguments: {}", e))
            })?;
            init_code.extend_from_slice(&args);
        }

        debug!(
            "Loaded {} bytes of init code from {}",
            init_code.len(),
            path.display()
        );
        Ok(Self::new(init_code.into(), confirmations))
    }
}

impl<P: Provider> ContractDeployer<P> for ArtifactDeployer {
    async fn deploy(&self, client: &P) -> Result<DeploymentReceipt, ScriptError> {
        let tx = TransactionRequest::default().with_deploy_code(self.init_code.clone());

        let pending = client
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;
        let tx_hash = *pending.tx_hash();
        info!("Deployment transaction sent: {:#x}", tx_hash);

        let receipt = pending
            .with_required_confirmations(self.confirmations)
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

        if !ReceiptResponse::status(&receipt) {
            return Err(ScriptError::ContractDeployment(format!(
                "transaction {:#x} reverted",
                tx_hash
            )));
        }

        let address = receipt.contract_address.ok_or_else(|| {
            ScriptError::ContractDeployment(format!(
                "receipt for {:#x} has no contract address",
                tx_hash
            ))
        })?;

        Ok(DeploymentReceipt { address, tx_hash })
    }
}

/// The subset of a Hardhat or Foundry artifact holding the init code
#[derive(Deserialize)]
struct ArtifactJson {
    /// The init code
    bytecode: ArtifactBytecode,
}

/// Hardhat stores the init code as a hex string, Foundry nests it in an object
#[derive(Deserialize)]
#[serde(untagged)]
enum ArtifactBytecode {
    /// `"bytecode": "0x..."`
    Hex(String),
    /// `"bytecode": { "object": "0x...", ... }`
    Object {
        /// The init code in hex
        object: String,
    },
}

/// Extract the init code from the contents of an artifact file, either a JSON
/// artifact or bare hex
pub fn parse_artifact_bytecode(contents: &str) -> Result<Vec<u8>, ScriptError> {
    let contents = contents.trim();
    let bytecode_hex = if contents.starts_with('{') {
        let artifact: ArtifactJson = serde_json::from_str(contents)
            .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;
        match artifact.bytecode {
            ArtifactBytecode::Hex(s) | ArtifactBytecode::Object { object: s } => s,
        }
    } else {
        contents.to_string()
    };

    // Unlinked library references leave `__$...$__` placeholders, which fail to decode here
    let bytecode = hex::decode(bytecode_hex.trim())
        .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;
    if bytecode.is_empty() {
        return Err(ScriptError::ArtifactParsing(
            "artifact contains no bytecode, is the contract abstract?".to_string(),
        ));
    }

    Ok(bytecode)
}
