//! Prune generated artifact trees down to the protocol's contracts

use clap::Args;
use color_eyre::eyre::Result;
use console::style;
use soundkit_core::{PruneReport, Pruner};

use crate::config::{Project, PruneTarget};

/// Prune forge build output (`out/` by default)
#[derive(Args)]
pub struct PruneArtifactsCommand;

impl PruneArtifactsCommand {
    pub async fn run(self, project: &Project) -> Result<()> {
        prune(project, &project.config.prune.artifacts)?;
        Ok(())
    }
}

/// Prune generated bindings (`dist/typechain/` by default)
#[derive(Args)]
pub struct PruneTypechainCommand;

impl PruneTypechainCommand {
    pub async fn run(self, project: &Project) -> Result<()> {
        prune(project, &project.config.prune.typechain)?;
        Ok(())
    }
}

fn prune(project: &Project, target: &PruneTarget) -> Result<PruneReport> {
    let pruner = Pruner::new(project.path(&target.root), target.rules.clone());

    println!(
        "{} Pruning {}...",
        style("->").blue(),
        style(pruner.root().display()).cyan()
    );

    let report = pruner.run()?;

    for file in &report.removed_files {
        println!("   {} Removing {}", style("-").dim(), file.display());
    }
    for dir in &report.removed_dirs {
        println!(
            "   {} Removing empty directory {}",
            style("-").dim(),
            dir.display()
        );
    }

    println!(
        "{} Kept {} file(s), removed {} file(s) and {} directory(ies)",
        style("*").green().bold(),
        report.kept_files,
        report.removed_files.len(),
        report.removed_dirs.len()
    );

    Ok(report)
}
