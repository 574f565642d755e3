//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::{
    commands::{deploy, is_deployed, predict_address},
    config::DeployConfig,
    constants::{
        DEFAULT_DEPLOYMENTS_PATH, DEFAULT_DEPLOY_DELAY_SECS, DEFAULT_NUM_DEPLOY_CONFIRMATIONS,
        DEFAULT_RPC_URL,
    },
    errors::ScriptError,
};

/// Deploy contracts to an EVM chain and predict the addresses they will occupy
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Log verbosity, repeat for more detail (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Connection & credential settings, each of which may also be set through the
/// environment or a `.env` file
#[derive(Args, Clone)]
pub struct ConfigArgs {
    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Private key of the deployer
    #[arg(short, long = "pkey", env = "PKEY", hide_env_values = true)]
    pub priv_key: Option<String>,

    /// BIP-39 mnemonic from which the deployer's key is derived
    #[arg(short, long, env = "MNEMONIC", hide_env_values = true)]
    pub mnemonic: Option<String>,

    /// Index of the account derived from the mnemonic
    #[arg(long, env = "MNEMONIC_INDEX", default_value_t = 0)]
    pub mnemonic_index: u32,

    /// Seconds to wait before broadcasting a deployment, 0 to disable
    #[arg(long, env = "DEPLOY_DELAY_SECS", default_value_t = DEFAULT_DEPLOY_DELAY_SECS)]
    pub delay_secs: u64,

    /// Number of confirmations to wait for on deployment transactions
    #[arg(long, env = "DEPLOY_CONFIRMATIONS", default_value_t = DEFAULT_NUM_DEPLOY_CONFIRMATIONS)]
    pub confirmations: u64,

    /// Path to the file in which deployed addresses are recorded
    #[arg(short, long, env = "DEPLOYMENTS_PATH", default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments_path: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    Deploy(DeployArgs),
    PredictAddress(PredictAddressArgs),
    IsDeployed(IsDeployedArgs),
}

impl Command {
    /// Whether the command signs transactions or otherwise needs the
    /// deployer's key
    pub fn requires_signer(&self) -> bool {
        match self {
            Command::Deploy(_) => true,
            Command::PredictAddress(args) => args.deployer.is_none(),
            Command::IsDeployed(_) => false,
        }
    }

    pub async fn run(self, config: &DeployConfig) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => deploy(args, config).await,
            Command::PredictAddress(args) => predict_address(args, config).await,
            Command::IsDeployed(args) => is_deployed(args, config).await,
        }
    }
}

/// Deploy a compiled contract from the configured deployer account.
///
/// The address the contract will occupy is derived from the deployer's current
/// nonce and logged before the transaction is broadcast.
#[derive(Args)]
pub struct DeployArgs {
    /// Path to the compiled artifact, either a Hardhat / Foundry JSON artifact
    /// or a file containing the init code in hex
    #[arg(short, long)]
    pub artifact: PathBuf,

    /// ABI-encoded constructor arguments in hex, appended to the init code
    #[arg(short, long)]
    pub constructor_args: Option<String>,

    /// Key under which to record the deployed address in the deployments file
    #[arg(short, long)]
    pub key: Option<String>,
}

/// Compute the address of the contract created by a deployer at a given nonce
#[derive(Args)]
pub struct PredictAddressArgs {
    /// Address of the deployer, defaults to the configured signer
    #[arg(long)]
    pub deployer: Option<String>,

    /// Nonce of the contract-creating transaction, defaults to the deployer's
    /// current transaction count
    #[arg(short, long)]
    pub nonce: Option<String>,

    /// Also check whether code is already stored at the predicted address
    #[arg(long)]
    pub check: bool,
}

/// Check whether a contract is deployed at an address
#[derive(Args)]
pub struct IsDeployedArgs {
    /// Address to check
    #[arg(short, long, required_unless_present = "key", conflicts_with = "key")]
    pub address: Option<String>,

    /// Key of a previous deployment, resolved to its address through the
    /// deployments file
    #[arg(short, long)]
    pub key: Option<String>,
}
