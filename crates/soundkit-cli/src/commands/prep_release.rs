//! Prepare address and interface id files for a release

use clap::Args;
use color_eyre::eyre::Result;
use console::style;

use super::addresses::update_addresses;
use super::interface_ids::freeze_interface_ids;
use crate::config::{Project, ReleaseEnv};

/// Merge deployed addresses for SOUND_ENV/CREATOR_TYPE and rebuild interface ids
#[derive(Args)]
pub struct PrepReleaseCommand;

impl PrepReleaseCommand {
    pub async fn run(self, project: &Project, env: ReleaseEnv) -> Result<()> {
        let addresses = update_addresses(project, env)?;
        println!("{} {} addresses:", style("->").blue(), env.network);
        println!("{}", addresses.to_json());

        freeze_interface_ids(project)?;
        Ok(())
    }
}
