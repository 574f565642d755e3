//! Implementations of the various deploy scripts

use std::time::Duration;

use alloy::{primitives::Address, providers::WalletProvider};
use deploy_common::{
    address::{parse_address, to_checksummed},
    types::{DeployerIdentity, Nonce},
};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::{
    chain::{deployed_at, predict_deployment, CodeReader, NonceReader},
    cli::{DeployArgs, IsDeployedArgs, PredictAddressArgs},
    config::DeployConfig,
    deployer::{ArtifactDeployer, ContractDeployer, DeploymentReceipt},
    errors::ScriptError,
    utils::{build_signer, read_deployment, setup_client, setup_read_client, write_deployment},
};

pub async fn deploy(args: DeployArgs, config: &DeployConfig) -> Result<(), ScriptError> {
    let deployer = ArtifactDeployer::from_artifact(
        &args.artifact,
        args.constructor_args.as_deref(),
        config.confirmations,
    )?;

    let client = setup_client(config).await?;
    let sender = client.default_signer_address();

    let receipt = run_deployment(&client, sender, &deployer, config.deploy_delay).await?;

    if let Some(key) = args.key {
        write_deployment(&config.deployments_path, &key, receipt.address)?;
        info!(
            "Recorded `{}` in {}",
            key,
            config.deployments_path.display()
        );
    }

    println!("{}", to_checksummed(&receipt.address));
    Ok(())
}

/// Deploy a contract from `sender`, logging the address it is expected to
/// occupy before broadcasting.
///
/// Waits `delay` between the prediction and the broadcast so the operator can
/// abort, and fails if no code is found at the deployed address afterwards.
pub async fn run_deployment<C, D>(
    client: &C,
    sender: Address,
    deployer: &D,
    delay: Duration,
) -> Result<DeploymentReceipt, ScriptError>
where
    C: CodeReader + NonceReader,
    D: ContractDeployer<C>,
{
    let nonce = client.nonce_of(sender).await?;
    let predicted = DeployerIdentity::new(sender, nonce).contract_address();
    info!("Deployer: {}", to_checksummed(&sender));
    info!("Deployer nonce: {}", nonce);
    info!("Predicted contract address: {}", to_checksummed(&predicted));

    if !delay.is_zero() {
        info!("Deploying in {:?}, interrupt to abort", delay);
        sleep(delay).await;
    }

    let receipt = deployer.deploy(client).await?;
    info!(
        "Contract deployed at {} in transaction {:#x}",
        to_checksummed(&receipt.address),
        receipt.tx_hash
    );

    // Another transaction from the same account landing first shifts the nonce
    if receipt.address != predicted {
        warn!(
            "Deployed address {} differs from predicted address {}",
            to_checksummed(&receipt.address),
            to_checksummed(&predicted)
        );
    }

    if deployed_at(client, receipt.address).await?.is_none() {
        return Err(ScriptError::ContractDeployment(format!(
            "no code found at {} after deployment",
            to_checksummed(&receipt.address)
        )));
    }

    Ok(receipt)
}

pub async fn predict_address(
    args: PredictAddressArgs,
    config: &DeployConfig,
) -> Result<(), ScriptError> {
    let client = setup_read_client(config);

    let deployer = match &args.deployer {
        Some(address) => parse_address(address)?,
        None => build_signer(config.credential()?)?.address(),
    };
    let nonce = match &args.nonce {
        Some(nonce) => nonce.parse::<Nonce>()?,
        None => client.nonce_of(deployer).await?,
    };

    let identity = DeployerIdentity::new(deployer, nonce);
    info!(
        "Predicting address for deployer {} at nonce {}",
        to_checksummed(&deployer),
        nonce
    );

    let address = if args.check {
        let predicted = predict_deployment(&client, &identity).await?;
        if predicted.deployed {
            warn!(
                "Code is already deployed at {}",
                to_checksummed(&predicted.address)
            );
        } else {
            info!("Nothing is deployed at the predicted address yet");
        }
        predicted.address
    } else {
        identity.contract_address()
    };

    println!("{}", to_checksummed(&address));
    Ok(())
}

pub async fn is_deployed(args: IsDeployedArgs, config: &DeployConfig) -> Result<(), ScriptError> {
    let address = resolve_target(&args, config)?;
    let client = setup_read_client(config);

    match deployed_at(&client, address).await? {
        Some(address) => {
            info!("Contract code found at {}", to_checksummed(&address));
            println!("{}", to_checksummed(&address));
        }
        None => info!("Nothing is deployed at {}", to_checksummed(&address)),
    }

    Ok(())
}

/// The address to check for code, given directly or by the key it was
/// recorded under in the deployments file
fn resolve_target(args: &IsDeployedArgs, config: &DeployConfig) -> Result<Address, ScriptError> {
    match (&args.address, &args.key) {
        (Some(address), _) => Ok(parse_address(address)?),
        (None, Some(key)) => {
            let address = read_deployment(&config.deployments_path, key)?;
            debug!("Resolved `{}` to {}", key, to_checksummed(&address));
            Ok(address)
        }
        (None, None) => Err(ScriptError::Config(
            "either an address or a deployment key is required".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::{env, fs, path::PathBuf, time::Duration};

    use alloy::primitives::{Address, Bytes, TxHash};
    use deploy_common::types::DeployerIdentity;
    use rand::{thread_rng, Rng};
    use url::Url;

    use crate::{
        chain::test_helpers::MockChain,
        cli::IsDeployedArgs,
        config::DeployConfig,
        constants::DEFAULT_RPC_URL,
        deployer::{ContractDeployer, DeploymentReceipt},
        errors::ScriptError,
        utils::write_deployment,
    };

    use super::{resolve_target, run_deployment};

    /// A read-only config recording deployments at `deployments_path`
    fn read_only_config(deployments_path: PathBuf) -> DeployConfig {
        DeployConfig {
            rpc_url: Url::parse(DEFAULT_RPC_URL).unwrap(),
            credential: None,
            deploy_delay: Duration::ZERO,
            confirmations: 1,
            deployments_path,
        }
    }

    /// Deploys to a mock chain the way the ledger would: at the address derived
    /// from the sender's current nonce, bumping the nonce
    struct MockDeployer {
        /// The account sending the deployment
        sender: Address,
        /// The runtime code left at the contract address
        code: Bytes,
        /// Transactions sent from the sender before the deployment lands
        interleaved_txs: u64,
    }

    impl ContractDeployer<MockChain> for MockDeployer {
        async fn deploy(&self, client: &MockChain) -> Result<DeploymentReceipt, ScriptError> {
            let mut nonces = client.nonces.lock().unwrap();
            let nonce = nonces.entry(self.sender).or_default();
            *nonce += self.interleaved_txs;

            let address = DeployerIdentity::new(self.sender, *nonce).contract_address();
            *nonce += 1;
            client.set_code(address, self.code.clone());

            Ok(DeploymentReceipt {
                address,
                tx_hash: TxHash::repeat_byte(0xee),
            })
        }
    }

    #[tokio::test]
    async fn test_deployment_lands_at_predicted_address() {
        let chain = MockChain::default();
        let sender = Address::repeat_byte(0x42);
        chain.set_nonce(sender, 3);

        let deployer = MockDeployer {
            sender,
            code: Bytes::from_static(&[0x60, 0x80]),
            interleaved_txs: 0,
        };
        let receipt = run_deployment(&chain, sender, &deployer, Duration::ZERO)
            .await
            .unwrap();

        assert_eq!(
            receipt.address,
            DeployerIdentity::new(sender, 3u64).contract_address()
        );
        assert_eq!(*chain.nonces.lock().unwrap().get(&sender).unwrap(), 4);
    }

    #[tokio::test]
    async fn test_shifted_nonce_still_succeeds() {
        let chain = MockChain::default();
        let sender = Address::repeat_byte(0x43);

        let deployer = MockDeployer {
            sender,
            code: Bytes::from_static(&[0x60, 0x80]),
            interleaved_txs: 1,
        };
        let receipt = run_deployment(&chain, sender, &deployer, Duration::from_millis(10))
            .await
            .unwrap();

        // The deployment lands at the address for nonce 1, not the predicted nonce 0
        assert_eq!(
            receipt.address,
            DeployerIdentity::new(sender, 1u64).contract_address()
        );
    }

    #[tokio::test]
    async fn test_missing_code_after_deployment() {
        let chain = MockChain::default();
        let sender = Address::repeat_byte(0x44);

        let deployer = MockDeployer {
            sender,
            code: Bytes::new(),
            interleaved_txs: 0,
        };
        let res = run_deployment(&chain, sender, &deployer, Duration::ZERO).await;

        assert!(matches!(res, Err(ScriptError::ContractDeployment(_))));
    }

    #[tokio::test]
    async fn test_provider_failure_aborts_before_deploying() {
        let chain = MockChain::unavailable("rate limited");
        let sender = Address::repeat_byte(0x45);

        let deployer = MockDeployer {
            sender,
            code: Bytes::from_static(&[0x00]),
            interleaved_txs: 0,
        };
        let res = run_deployment(&chain, sender, &deployer, Duration::ZERO).await;

        assert!(matches!(res, Err(ScriptError::ProviderUnavailable(_))));
        assert!(chain.code.lock().unwrap().is_empty());
    }

    #[test]
    fn test_resolve_target_by_address() {
        let config = read_only_config(PathBuf::from("unused.json"));
        let args = IsDeployedArgs {
            address: Some("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".to_string()),
            key: None,
        };

        let address = resolve_target(&args, &config).unwrap();
        assert_eq!(
            address,
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
                .parse::<Address>()
                .unwrap()
        );
    }

    #[test]
    fn test_resolve_target_by_deployment_key() {
        let path = env::temp_dir().join(format!("deployments-{}.json", thread_rng().gen::<u64>()));
        let counter = Address::repeat_byte(0xcc);
        write_deployment(&path, "counter", counter).unwrap();
        let config = read_only_config(path.clone());

        let args = IsDeployedArgs {
            address: None,
            key: Some("counter".to_string()),
        };
        assert_eq!(resolve_target(&args, &config).unwrap(), counter);

        let args = IsDeployedArgs {
            address: None,
            key: Some("missing".to_string()),
        };
        assert!(matches!(
            resolve_target(&args, &config),
            Err(ScriptError::ReadDeployments(_))
        ));

        fs::remove_file(&path).unwrap();
    }
}
