//! Freeze interface ids into a typed constant module

use clap::Args;
use color_eyre::eyre::Result;
use console::style;
use soundkit_core::InterfaceIds;

use crate::config::Project;

/// Build the interface id constant module from its JSON source
#[derive(Args)]
pub struct InterfaceIdsCommand;

impl InterfaceIdsCommand {
    pub async fn run(self, project: &Project) -> Result<()> {
        freeze_interface_ids(project)?;
        Ok(())
    }
}

pub fn freeze_interface_ids(project: &Project) -> Result<InterfaceIds> {
    let paths = &project.config.paths;
    let source = project.path(&paths.interface_ids_json);
    let module = project.path(&paths.interface_ids_module);

    let ids = soundkit_core::freeze(&source, &module)?;

    println!(
        "{} Wrote {} interface id(s) to {}",
        style("*").green().bold(),
        ids.len(),
        style(module.display()).cyan()
    );

    Ok(ids)
}
