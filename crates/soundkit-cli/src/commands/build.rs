//! Assemble the publishable npm package

use clap::Args;
use color_eyre::eyre::Result;
use console::style;

use crate::config::Project;
use crate::package::PackageAssembler;

/// Build the npm package into the output directory
#[derive(Args)]
pub struct BuildCommand;

impl BuildCommand {
    pub async fn run(self, project: &Project) -> Result<()> {
        let assembler = PackageAssembler::new(&project.root, project.config.package.clone());

        println!(
            "{} Assembling package in {}...",
            style("->").blue(),
            style(assembler.out_dir().display()).cyan()
        );
        for compiler in assembler.compilers() {
            println!("   {} {}", style("*").dim(), compiler);
        }

        let report = assembler.assemble().await?;

        println!(
            "{} Package ready: {} asset(s) copied, {} compiler(s) run, manifest at {}",
            style("*").green().bold(),
            report.assets_copied,
            report.compilers_run,
            report.manifest.display()
        );

        Ok(())
    }
}
