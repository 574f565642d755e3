//! Scripts for deploying contracts and predicting the addresses they will occupy.

pub mod chain;
pub mod cli;
mod commands;
pub mod config;
pub mod constants;
pub mod deployer;
pub mod errors;
pub mod utils;

pub use commands::run_deployment;
