//! Constants used in the deploy scripts

/// The RPC URL used when none is configured, a local devnet node
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

/// The number of seconds to wait before broadcasting a deployment, giving the
/// operator a window in which to abort
pub const DEFAULT_DEPLOY_DELAY_SECS: u64 = 5;

/// The number of confirmations to wait for the contract deployment transaction
pub const DEFAULT_NUM_DEPLOY_CONFIRMATIONS: u64 = 1;

/// The file in which deployed addresses are recorded
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";

/// The deployments key in the deployments file
pub const DEPLOYMENTS_KEY: &str = "deployments";
