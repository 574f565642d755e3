//! Utilities for the deploy scripts.

use std::{fs, path::Path, str::FromStr};

use alloy::{
    network::EthereumWallet,
    primitives::Address,
    providers::{Provider, ProviderBuilder, WalletProvider},
    signers::local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner},
};
use deploy_common::address::{parse_address, to_checksummed};
use serde_json::{Map, Value};
use tracing::info;

use crate::{
    config::{Credential, DeployConfig},
    constants::DEPLOYMENTS_KEY,
    errors::ScriptError,
};

/// Build the deployer's signing key from the configured credential
pub fn build_signer(credential: &Credential) -> Result<PrivateKeySigner, ScriptError> {
    match credential {
        Credential::PrivateKey(key) => PrivateKeySigner::from_str(key)
            .map_err(|e| ScriptError::ClientInitialization(e.to_string())),
        Credential::Mnemonic { phrase, index } => MnemonicBuilder::<English>::default()
            .phrase(phrase.as_str())
            .index(*index)
            .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?
            .build()
            .map_err(|e| ScriptError::ClientInitialization(e.to_string())),
    }
}

/// Sets up a client that signs transactions with the deployer's key,
/// checking connectivity by fetching the chain ID
pub async fn setup_client(
    config: &DeployConfig,
) -> Result<impl Provider + WalletProvider, ScriptError> {
    let signer = build_signer(config.credential()?)?;
    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .on_http(config.rpc_url.clone());

    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    info!("Connected to chain {} at {}", chain_id, config.rpc_url);

    Ok(provider)
}

/// Sets up a client for read-only queries, which needs no credential.
///
/// No request is made until the client is first queried.
pub fn setup_read_client(config: &DeployConfig) -> impl Provider {
    ProviderBuilder::new().on_http(config.rpc_url.clone())
}

/// Read the address recorded under `contract_key` in the deployments file
pub fn read_deployment(file_path: &Path, contract_key: &str) -> Result<Address, ScriptError> {
    let parsed_json = read_deployments_json(file_path)?;

    let address = parsed_json
        .get(DEPLOYMENTS_KEY)
        .and_then(|deployments| deployments.get(contract_key))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            ScriptError::ReadDeployments(format!(
                "no address recorded for {} in {}",
                contract_key,
                file_path.display()
            ))
        })?;

    parse_address(address).map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

/// Record a deployed address under `contract_key` in the deployments file,
/// creating the file if it doesn't exist and preserving all other entries
pub fn write_deployment(
    file_path: &Path,
    contract_key: &str,
    address: Address,
) -> Result<(), ScriptError> {
    let mut parsed_json = if file_path.exists() {
        read_deployments_json(file_path)?
    } else {
        Value::Object(Map::new())
    };

    let root = parsed_json.as_object_mut().ok_or_else(|| {
        ScriptError::WriteDeployments(format!("{} is not a JSON object", file_path.display()))
    })?;
    let deployments = root
        .entry(DEPLOYMENTS_KEY)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| {
            ScriptError::WriteDeployments(format!("`{}` is not a JSON object", DEPLOYMENTS_KEY))
        })?;
    deployments.insert(
        contract_key.to_string(),
        Value::String(to_checksummed(&address)),
    );

    let contents = serde_json::to_string_pretty(&parsed_json)
        .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
    fs::write(file_path, contents).map_err(|e| ScriptError::WriteDeployments(e.to_string()))
}

/// Read and parse the deployments file
fn read_deployments_json(file_path: &Path) -> Result<Value, ScriptError> {
    let contents = fs::read_to_string(file_path).map_err(|e| {
        ScriptError::ReadDeployments(format!("{}: {}", file_path.display(), e))
    })?;

    serde_json::from_str(&contents).map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::{env, fs, path::PathBuf};

    use alloy::primitives::{address, Address};
    use rand::{thread_rng, Rng};
    use serde_json::Value;

    use crate::{config::Credential, constants::DEPLOYMENTS_KEY, errors::ScriptError};

    use super::{build_signer, read_deployment, write_deployment};

    /// A path in the temp directory that no other test uses
    fn temp_deployments_path() -> PathBuf {
        env::temp_dir().join(format!("deployments-{}.json", thread_rng().gen::<u64>()))
    }

    #[test]
    fn test_signer_from_private_key() {
        // The first default Anvil account
        let credential = Credential::PrivateKey(
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80".to_string(),
        );
        let signer = build_signer(&credential).unwrap();
        assert_eq!(
            signer.address(),
            address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
    }

    #[test]
    fn test_signer_from_mnemonic() {
        // The second default Anvil account
        let credential = Credential::Mnemonic {
            phrase: "test test test test test test test test test test test junk".to_string(),
            index: 1,
        };
        let signer = build_signer(&credential).unwrap();
        assert_eq!(
            signer.address(),
            address!("70997970C51812dc3A010C7d01b50e0d17dc79C8")
        );
    }

    #[test]
    fn test_invalid_private_key() {
        let credential = Credential::PrivateKey("0x1234".to_string());
        assert!(matches!(
            build_signer(&credential),
            Err(ScriptError::ClientInitialization(_))
        ));
    }

    #[test]
    fn test_deployments_file_round_trip() {
        let path = temp_deployments_path();
        let counter = Address::repeat_byte(0xaa);
        let token = Address::repeat_byte(0xbb);

        write_deployment(&path, "counter", counter).unwrap();
        write_deployment(&path, "token", token).unwrap();

        assert_eq!(read_deployment(&path, "counter").unwrap(), counter);
        assert_eq!(read_deployment(&path, "token").unwrap(), token);
        assert!(matches!(
            read_deployment(&path, "missing"),
            Err(ScriptError::ReadDeployments(_))
        ));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_preserves_other_entries() {
        let path = temp_deployments_path();
        fs::write(
            &path,
            r#"{ "network": "devnet", "deployments": { "old": "0x0000000000000000000000000000000000000001" } }"#,
        )
        .unwrap();

        write_deployment(&path, "new", Address::repeat_byte(0x22)).unwrap();

        let json: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["network"], "devnet");
        assert_eq!(
            json[DEPLOYMENTS_KEY]["old"],
            "0x0000000000000000000000000000000000000001"
        );
        assert_eq!(
            json[DEPLOYMENTS_KEY]["new"],
            "0x2222222222222222222222222222222222222222"
        );

        fs::remove_file(&path).unwrap();
    }
}
