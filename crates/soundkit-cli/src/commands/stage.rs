//! Stage selected contract artifacts for the binding generator

use clap::Args;
use color_eyre::eyre::Result;
use console::style;

use crate::config::Project;
use crate::package::{copy_all, remove_dir_if_exists};

/// Copy the configured contract artifacts into a clean staging directory
#[derive(Args)]
pub struct StageArtifactsCommand;

impl StageArtifactsCommand {
    pub async fn run(self, project: &Project) -> Result<()> {
        let stage = &project.config.stage;
        let source = project.path(&stage.source);
        let dest = project.path(&stage.dest);

        remove_dir_if_exists(&dest).await?;
        tokio::fs::create_dir_all(&dest).await?;

        let pairs = stage
            .contracts
            .iter()
            .map(|contract| (source.join(contract), dest.join(contract)))
            .collect();
        let copied = copy_all(pairs).await?;

        println!(
            "{} Staged {} artifact(s) in {}",
            style("*").green().bold(),
            copied,
            style(dest.display()).cyan()
        );

        Ok(())
    }
}
