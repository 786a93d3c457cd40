//! CLI commands for soundkit

use clap::Subcommand;
use color_eyre::eyre::{eyre, Result};

use crate::config::{CreatorRequirement, EnvSelector, Project, ReleaseEnv};

pub mod addresses;
pub mod build;
pub mod interface_ids;
pub mod prep_release;
pub mod prune;
pub mod stage;

/// All available CLI commands
#[derive(Subcommand)]
pub enum Command {
    /// Merge deployed addresses into src/json/$SOUND_ENV.json
    ExtractAddresses(addresses::ExtractAddressesCommand),

    /// Merge deployed addresses into src/json/$EVM_NETWORK.json
    BuildAddresses(addresses::BuildAddressesCommand),

    /// Write the interface id constant module
    InterfaceIds(interface_ids::InterfaceIdsCommand),

    /// Extract addresses for $SOUND_ENV/$CREATOR_TYPE and write interface ids
    PrepRelease(prep_release::PrepReleaseCommand),

    /// Remove build artifacts unrelated to the protocol
    PruneArtifacts(prune::PruneArtifactsCommand),

    /// Remove generated bindings unrelated to the protocol
    PruneTypechain(prune::PruneTypechainCommand),

    /// Copy selected contract artifacts into a staging directory
    StageArtifacts(stage::StageArtifactsCommand),

    /// Assemble the npm package
    Build(build::BuildCommand),
}

impl Command {
    /// Environment variables the command reads, if any
    pub fn env_requirement(&self) -> Option<(EnvSelector, CreatorRequirement)> {
        match self {
            Command::ExtractAddresses(_) => Some((EnvSelector::Sound, CreatorRequirement::Optional)),
            Command::BuildAddresses(_) => Some((EnvSelector::Evm, CreatorRequirement::Optional)),
            Command::PrepRelease(_) => Some((EnvSelector::Sound, CreatorRequirement::Required)),
            _ => None,
        }
    }

    /// Validate the command's environment variables
    pub fn resolve_env<F>(&self, lookup: F) -> soundkit_core::Result<Option<ReleaseEnv>>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.env_requirement()
            .map(|(selector, creator)| ReleaseEnv::from_lookup(selector, creator, lookup))
            .transpose()
    }

    /// Execute the command with the environment from [`Command::resolve_env`]
    pub async fn run(self, project: &Project, env: Option<ReleaseEnv>) -> Result<()> {
        let required = || env.ok_or_else(|| eyre!("environment was not resolved"));
        match self {
            Command::ExtractAddresses(cmd) => cmd.run(project, required()?).await,
            Command::BuildAddresses(cmd) => cmd.run(project, required()?).await,
            Command::InterfaceIds(cmd) => cmd.run(project).await,
            Command::PrepRelease(cmd) => cmd.run(project, required()?).await,
            Command::PruneArtifacts(cmd) => cmd.run(project).await,
            Command::PruneTypechain(cmd) => cmd.run(project).await,
            Command::StageArtifacts(cmd) => cmd.run(project).await,
            Command::Build(cmd) => cmd.run(project).await,
        }
    }
}
