//! Extract deployed contract addresses from the latest deployment run

use clap::Args;
use color_eyre::eyre::Result;
use console::style;
use soundkit_core::{AddressMap, DeploymentLog};

use crate::config::{Project, ReleaseEnv};

/// Merge addresses from `broadcast/` into the `SOUND_ENV` address file
#[derive(Args)]
pub struct ExtractAddressesCommand;

impl ExtractAddressesCommand {
    pub async fn run(self, project: &Project, env: ReleaseEnv) -> Result<()> {
        update_addresses(project, env)?;
        Ok(())
    }
}

/// Merge addresses from `broadcast/` into the `EVM_NETWORK` address file
#[derive(Args)]
pub struct BuildAddressesCommand;

impl BuildAddressesCommand {
    pub async fn run(self, project: &Project, env: ReleaseEnv) -> Result<()> {
        update_addresses(project, env)?;
        Ok(())
    }
}

/// Read the environment's deployment log and merge its creations into the
/// persisted address map. Creator addresses nest under the creator variant
/// only when one is given.
pub fn update_addresses(project: &Project, env: ReleaseEnv) -> Result<AddressMap> {
    let log_path = project.deployment_log(env.network);
    let out_path = project.address_file(env.network);

    println!(
        "{} Reading {} (chain ID: {})",
        style("->").blue(),
        style(log_path.display()).cyan(),
        env.network.chain_id()
    );

    let log = DeploymentLog::load(&log_path)?;
    let deployed = log.deployed_contracts(&log_path)?;

    if deployed.is_empty() {
        println!(
            "{} No contract creations found in deployment log",
            style("!").yellow()
        );
    }

    let mut addresses = AddressMap::load_or_default(&out_path)?;
    let table = project.config.merge_table_for(env.creator_type);
    addresses.merge(&deployed, &table, env.creator_type)?;
    addresses.save(&out_path)?;

    for contract in &deployed {
        println!(
            "   {} {} at {}",
            style("+").green(),
            style(&contract.key).cyan(),
            style(&contract.address).yellow()
        );
    }

    println!(
        "{} Wrote {} address(es) to {}",
        style("*").green().bold(),
        addresses.len(),
        out_path.display()
    );

    Ok(addresses)
}
