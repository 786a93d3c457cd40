use std::path::{Path, PathBuf};

use color_eyre::eyre::{eyre, Result};
use serde::Deserialize;
use soundkit_core::{select, CreatorType, MatchScope, MergeTable, Network, PruneRules};

pub const CONFIG_FILE: &str = "soundkit.toml";

pub const SOUND_ENV: &str = "SOUND_ENV";
pub const EVM_NETWORK: &str = "EVM_NETWORK";
pub const CREATOR_TYPE: &str = "CREATOR_TYPE";

// =============================================================================
// Project Configuration (soundkit.toml)
// =============================================================================

/// Project configuration. Every section is optional and falls back to the
/// layout of the sound-protocol repository.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SoundkitConfig {
    pub paths: PathsConfig,
    /// Extra merge strategies, layered over the built-in table
    pub merge: Option<MergeTable>,
    pub prune: PruneConfig,
    pub stage: StageConfig,
    pub package: PackageConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub broadcast_dir: PathBuf,
    pub deploy_script: String,
    pub addresses_dir: PathBuf,
    pub interface_ids_json: PathBuf,
    pub interface_ids_module: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            broadcast_dir: PathBuf::from("broadcast"),
            deploy_script: "Deploy.s.sol".to_string(),
            addresses_dir: PathBuf::from("src/json"),
            interface_ids_json: PathBuf::from("src/json/interfaceIds.json"),
            interface_ids_module: PathBuf::from("src/interfaceIds.ts"),
        }
    }
}

/// A pruned tree. A section given in soundkit.toml replaces the built-in one
/// entirely, keyword lists included.
#[derive(Debug, Clone, Deserialize)]
pub struct PruneTarget {
    pub root: PathBuf,
    #[serde(flatten)]
    pub rules: PruneRules,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PruneConfig {
    pub artifacts: PruneTarget,
    pub typechain: PruneTarget,
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            artifacts: PruneTarget {
                root: PathBuf::from("out"),
                rules: PruneRules::new(
                    ["sound", "minter", "goldenegg", "sam"],
                    [
                        "RangeEditionMinterUpdater",
                        "RangeEditionMinterInvariants",
                        ".t.sol",
                        "test",
                        "mock",
                    ],
                ),
            },
            typechain: PruneTarget {
                root: PathBuf::from("dist/typechain"),
                rules: PruneRules::new(
                    ["sound", "minter", "goldenegg"],
                    ["RangeEditionMinterUpdater", "RangeEditionMinterInvariants"],
                )
                .with_scope(MatchScope::FileName),
            },
        }
    }
}

/// Artifact directories copied into a clean staging directory for the
/// binding generator
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub contracts: Vec<String>,
}

impl Default for StageConfig {
    fn default() -> Self {
        let contracts = [
            "BaseMinter.sol",
            "GoldenEggMetadata.sol",
            "MerkleDropMinter.sol",
            "FixedPriceSignatureMinter.sol",
            "RangeEditionMinter.sol",
            "SoundCreatorV1.sol",
            "SoundEditionV1.sol",
            "IMinterModule.sol",
            "IMetadataModule.sol",
            "IMerkleDropMinter.sol",
            "IFixedPriceSignatureMinter.sol",
            "IRangeEditionMinter.sol",
            "ISoundEditionV1.sol",
        ];
        Self {
            source: PathBuf::from("out"),
            dest: PathBuf::from("out-sound"),
            contracts: contracts.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Authoring manifest the published one is projected from
    pub manifest: PathBuf,
    pub out_dir: PathBuf,
    /// Files and directories copied into `out_dir` as-is
    pub assets: Vec<PathBuf>,
    pub bindings: BindingsConfig,
    /// Commands run from the project root to compile sources into `out_dir`
    pub compile: Vec<String>,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("package.json"),
            out_dir: PathBuf::from("dist"),
            assets: vec![PathBuf::from("LICENSE"), PathBuf::from("contracts")],
            bindings: BindingsConfig::default(),
            compile: vec![
                "tsc -p tsconfig.build.json".to_string(),
                "bob-ts -i src -d dist -f interop -t node14".to_string(),
            ],
        }
    }
}

/// Generated bindings, copied into the source tree for the duration of the build
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BindingsConfig {
    pub from: PathBuf,
    pub to: PathBuf,
    /// Subpath the bindings are exported under
    pub subpath: String,
}

impl Default for BindingsConfig {
    fn default() -> Self {
        Self {
            from: PathBuf::from("typechain"),
            to: PathBuf::from("src/typechain"),
            subpath: "typechain".to_string(),
        }
    }
}

impl SoundkitConfig {
    /// Load configuration from a specific path; a missing file means defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| eyre!("Could not read {}: {}", path.display(), e))?;
        let config: SoundkitConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Built-in merge table with the configured overrides applied
    pub fn merge_table(&self) -> MergeTable {
        let mut table = MergeTable::default();
        if let Some(overrides) = &self.merge {
            table.extend(overrides);
        }
        table
    }

    /// Merge table for a run. Without a creator variant nothing can nest, so
    /// every key is replaced.
    pub fn merge_table_for(&self, creator_type: Option<CreatorType>) -> MergeTable {
        match creator_type {
            Some(_) => self.merge_table(),
            None => MergeTable::empty(),
        }
    }
}

// =============================================================================
// Project
// =============================================================================

/// Project root plus its configuration; every configured path is relative to
/// the root
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: SoundkitConfig,
}

impl Project {
    pub fn load(root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let config_path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.join(CONFIG_FILE));
        Ok(Self {
            root: root.to_path_buf(),
            config: SoundkitConfig::load_from(&config_path)?,
        })
    }

    pub fn path<P: AsRef<Path>>(&self, relative: P) -> PathBuf {
        self.root.join(relative)
    }

    /// Deployment log of the configured script on the environment's chain
    pub fn deployment_log(&self, network: Network) -> PathBuf {
        soundkit_core::DeploymentLog::path(
            &self.path(&self.config.paths.broadcast_dir),
            &self.config.paths.deploy_script,
            network.chain_id(),
        )
    }

    /// Persisted address map of an environment
    pub fn address_file(&self, network: Network) -> PathBuf {
        self.path(&self.config.paths.addresses_dir)
            .join(format!("{}.json", network))
    }
}

// =============================================================================
// Environment Variables
// =============================================================================

/// Which variable selects the deployment environment, and from which set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvSelector {
    /// `SOUND_ENV`: preview | staging | mainnet
    Sound,
    /// `EVM_NETWORK`: goerli | mainnet
    Evm,
}

impl EnvSelector {
    pub fn var(&self) -> &'static str {
        match self {
            EnvSelector::Sound => SOUND_ENV,
            EnvSelector::Evm => EVM_NETWORK,
        }
    }

    pub fn allowed(&self) -> &'static [Network] {
        match self {
            EnvSelector::Sound => &Network::SOUND,
            EnvSelector::Evm => &Network::EVM,
        }
    }
}

/// Whether `CREATOR_TYPE` must be set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatorRequirement {
    Required,
    /// Validated when set
    Optional,
}

/// Environment-driven settings, validated once before any file is touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseEnv {
    pub network: Network,
    pub creator_type: Option<CreatorType>,
}

impl ReleaseEnv {
    pub fn from_lookup<F>(
        selector: EnvSelector,
        creator: CreatorRequirement,
        lookup: F,
    ) -> soundkit_core::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let network = select(
            selector.var(),
            lookup(selector.var()).as_deref(),
            selector.allowed(),
        )?;

        let creator_value = lookup(CREATOR_TYPE);
        let creator_type = match (creator, creator_value.as_deref()) {
            (CreatorRequirement::Optional, None | Some("")) => None,
            (_, value) => Some(select(CREATOR_TYPE, value, &CreatorType::ALL)?),
        };

        Ok(Self {
            network,
            creator_type,
        })
    }
}
