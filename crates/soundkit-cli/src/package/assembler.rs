//! Package assembly

use std::path::{Path, PathBuf};
use std::sync::Arc;

use soundkit_core::{Error, ProjectManifest, PublishManifest, Result};
use tokio::task::JoinSet;

use super::compiler::{CommandCompiler, ModuleCompiler};
use super::copy::{copy_all, copy_path, remove_dir_if_exists};
use crate::config::PackageConfig;

/// What an assembly run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyReport {
    pub manifest: PathBuf,
    pub assets_copied: usize,
    pub compilers_run: usize,
}

/// Stages a publishable package directory.
///
/// The output directory is wiped first, so a failed run only ever leaves
/// behind state that the next run discards.
pub struct PackageAssembler {
    root: PathBuf,
    config: PackageConfig,
    compilers: Vec<Arc<dyn ModuleCompiler>>,
}

impl PackageAssembler {
    /// Assembler using the compile commands from the configuration
    pub fn new(root: &Path, config: PackageConfig) -> Self {
        let compilers = config
            .compile
            .iter()
            .filter_map(|line| CommandCompiler::parse(line))
            .map(|c| Arc::new(c) as Arc<dyn ModuleCompiler>)
            .collect();
        Self::with_compilers(root, config, compilers)
    }

    /// Assembler with explicit compilers
    pub fn with_compilers(
        root: &Path,
        config: PackageConfig,
        compilers: Vec<Arc<dyn ModuleCompiler>>,
    ) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
            compilers,
        }
    }

    pub fn out_dir(&self) -> PathBuf {
        self.root.join(&self.config.out_dir)
    }

    pub fn compilers(&self) -> impl Iterator<Item = String> + '_ {
        self.compilers.iter().map(|c| c.describe())
    }

    pub async fn assemble(&self) -> Result<AssemblyReport> {
        let source = ProjectManifest::load(&self.root.join(&self.config.manifest))?;
        let publish = PublishManifest::project(&source, &self.config.bindings.subpath);

        let out_dir = self.out_dir();
        remove_dir_if_exists(&out_dir).await?;

        let staged = self.root.join(&self.config.bindings.to);
        copy_path(&self.root.join(&self.config.bindings.from), &staged).await?;

        let result = self.build(&out_dir, &publish).await;

        // the staged copy goes away even when the build failed
        let cleanup = remove_dir_if_exists(&staged).await;
        let report = result?;
        cleanup?;
        Ok(report)
    }

    async fn build(&self, out_dir: &Path, publish: &PublishManifest) -> Result<AssemblyReport> {
        let mut compiles = JoinSet::new();
        for compiler in &self.compilers {
            let compiler = Arc::clone(compiler);
            let root = self.root.clone();
            compiles.spawn(async move { compiler.compile(&root).await });
        }

        tokio::fs::create_dir_all(out_dir)
            .await
            .map_err(|e| Error::io(out_dir, e))?;

        let manifest_path = out_dir.join("package.json");
        let manifest_json = publish.to_json()?;

        let assets = self
            .config
            .assets
            .iter()
            .map(|asset| (self.root.join(asset), out_dir.join(asset)))
            .collect();

        let (assets_copied, ()) = tokio::try_join!(copy_all(assets), async {
            tokio::fs::write(&manifest_path, &manifest_json)
                .await
                .map_err(|e| Error::io(&manifest_path, e))
        })?;

        let mut compilers_run = 0;
        while let Some(joined) = compiles.join_next().await {
            joined.map_err(|e| Error::Command(format!("compiler task failed: {e}")))??;
            compilers_run += 1;
        }

        Ok(AssemblyReport {
            manifest: manifest_path,
            assets_copied,
            compilers_run,
        })
    }
}
