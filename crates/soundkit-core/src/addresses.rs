//! Per-environment address maps and how new deployments merge into them

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::broadcast::DeployedContract;
use crate::error::{Error, Result};
use crate::files;
use crate::network::{CreatorType, Named};

/// Key of the creator contract, which is deployed once per creator variant
pub const CREATOR_KEY: &str = "soundCreatorV1";

// =============================================================================
// Merge Strategies
// =============================================================================

/// How a freshly deployed address is folded into an existing map entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStrategy {
    /// Overwrite the entry with the new address
    #[default]
    ReplaceByKey,
    /// Set `entry[variant]`, keeping the addresses of other variants
    MergeNestedByVariant,
}

/// Lookup from address-map key to the strategy used for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MergeTable {
    strategies: BTreeMap<String, MergeStrategy>,
}

impl MergeTable {
    /// A table where every key is replaced
    pub fn empty() -> Self {
        Self {
            strategies: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, strategy: MergeStrategy) -> Self {
        self.strategies.insert(key.into(), strategy);
        self
    }

    /// Overlay another table on top of this one
    pub fn extend(&mut self, other: &MergeTable) {
        self.strategies
            .extend(other.strategies.iter().map(|(k, v)| (k.clone(), *v)));
    }

    pub fn strategy_for(&self, key: &str) -> MergeStrategy {
        self.strategies.get(key).copied().unwrap_or_default()
    }
}

impl Default for MergeTable {
    fn default() -> Self {
        Self::empty().with(CREATOR_KEY, MergeStrategy::MergeNestedByVariant)
    }
}

// =============================================================================
// Address Map
// =============================================================================

/// Contract addresses of one environment, in first-insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressMap {
    entries: Map<String, Value>,
}

impl AddressMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the persisted map, or an empty one if the file does not exist yet
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let value: Value = files::read_json(path)?;
        Self::from_value(path, value)
    }

    fn from_value(path: &Path, value: Value) -> Result<Self> {
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(Error::parse(
                path,
                format!("expected an address map object, found {other}"),
            )),
        }
    }

    /// Write the map as pretty JSON, creating the parent directory if needed
    pub fn save(&self, path: &Path) -> Result<()> {
        files::write_ensuring_parent(path, &self.to_json())
    }

    pub fn to_json(&self) -> String {
        // A map of plain JSON values always serializes
        serde_json::to_string_pretty(&self.entries).unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fold newly deployed contracts into the map.
    ///
    /// Keys absent from `deployed` are left untouched. Keys whose strategy is
    /// [`MergeStrategy::MergeNestedByVariant`] require `variant`; callers
    /// without one should merge with [`MergeTable::empty`].
    pub fn merge(
        &mut self,
        deployed: &[DeployedContract],
        table: &MergeTable,
        variant: Option<CreatorType>,
    ) -> Result<()> {
        for contract in deployed {
            match table.strategy_for(&contract.key) {
                MergeStrategy::ReplaceByKey => self.replace(contract),
                MergeStrategy::MergeNestedByVariant => {
                    let variant = variant.ok_or_else(|| Error::MissingVariable {
                        var: "CREATOR_TYPE".to_string(),
                        allowed: CreatorType::ALL.iter().map(Named::as_str).collect(),
                    })?;
                    self.merge_nested(contract, variant.as_str())?;
                }
            }
        }
        Ok(())
    }

    fn replace(&mut self, contract: &DeployedContract) {
        self.entries
            .insert(contract.key.clone(), Value::String(contract.address.clone()));
    }

    fn merge_nested(&mut self, contract: &DeployedContract, variant: &str) -> Result<()> {
        let entry = self
            .entries
            .entry(contract.key.clone())
            .or_insert_with(|| Value::Object(Map::new()));

        match entry {
            Value::Object(variants) => {
                variants.insert(variant.to_string(), Value::String(contract.address.clone()));
                Ok(())
            }
            // a flat address written without a variant belongs to no variant
            Value::String(_) => {
                *entry = Value::Object(Map::from_iter([(
                    variant.to_string(),
                    Value::String(contract.address.clone()),
                )]));
                Ok(())
            }
            other => Err(Error::InvalidEntry {
                key: contract.key.clone(),
                reason: format!("expected an object keyed by variant, found {other}"),
            }),
        }
    }
}

impl From<&[DeployedContract]> for AddressMap {
    fn from(deployed: &[DeployedContract]) -> Self {
        let mut map = Self::new();
        for contract in deployed {
            map.replace(contract);
        }
        map
    }
}
