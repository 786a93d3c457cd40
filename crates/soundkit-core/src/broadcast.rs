//! Deployment log parsing
//!
//! A deployment log is the `run-latest.json` file the deployer writes under
//! `broadcast/<script>/<chainId>/`. Only contract creations are of interest:
//! records that name a contract without naming a function.

use std::path::{Path, PathBuf};

use alloy::primitives::Address;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::files;

// =============================================================================
// Log Types
// =============================================================================

/// The transaction log of one deployment run
#[derive(Debug, Deserialize)]
pub struct DeploymentLog {
    pub transactions: Vec<TransactionRecord>,
}

/// One transaction of a deployment run
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    #[serde(default)]
    pub contract_name: Option<String>,
    #[serde(default)]
    pub function: Option<Value>,
    #[serde(default)]
    pub contract_address: Option<String>,
}

impl TransactionRecord {
    /// Check if this record created a contract rather than calling one.
    ///
    /// A `function` of `null`, `false`, `0` or `""` names no function.
    pub fn is_creation(&self) -> bool {
        let named = self.contract_name.as_deref().is_some_and(|n| !n.is_empty());
        let called = match &self.function {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Number(n)) => n.as_f64() != Some(0.0),
            Some(_) => true,
        };
        named && !called
    }
}

/// A contract created by a deployment run, keyed for the address map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedContract {
    pub key: String,
    pub address: String,
}

impl DeploymentLog {
    /// Path of the latest run log for a script on a chain
    pub fn path(broadcast_dir: &Path, script: &str, chain_id: u64) -> PathBuf {
        broadcast_dir
            .join(script)
            .join(chain_id.to_string())
            .join("run-latest.json")
    }

    /// Load a deployment log from disk
    pub fn load(path: &Path) -> Result<Self> {
        files::read_json(path)
    }

    /// Parse a deployment log from a JSON string
    pub fn from_json(path: &Path, json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::parse(path, e))
    }

    /// Contracts created in this run, in log order.
    ///
    /// Duplicates are kept; merging applies them in order so the last one wins.
    pub fn deployed_contracts(&self, source: &Path) -> Result<Vec<DeployedContract>> {
        self.transactions
            .iter()
            .filter(|tx| tx.is_creation())
            .map(|tx| {
                let name = tx.contract_name.as_deref().unwrap_or_default();
                let address = tx.contract_address.as_deref().ok_or_else(|| {
                    Error::parse(source, format!("creation of {name} has no contractAddress"))
                })?;
                address.parse::<Address>().map_err(|e| {
                    Error::parse(source, format!("invalid address for {name}: {e}"))
                })?;

                Ok(DeployedContract {
                    key: camelize(name),
                    address: address.to_string(),
                })
            })
            .collect()
    }
}

/// Convert a contract name to the camelCase key used in address maps.
///
/// The first word character is lower-cased; every later upper-case letter or
/// character that starts a word is upper-cased; whitespace is dropped. Runs of
/// capitals are left alone, so `ABCFoo` becomes `aBCFoo`.
pub fn camelize(name: &str) -> String {
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';

    let mut out = String::with_capacity(name.len());
    let mut prev_word = false;

    for (index, ch) in name.char_indices() {
        let word = is_word(ch);
        let starts_token = word && (index == 0 || ch.is_ascii_uppercase() || !prev_word);
        prev_word = word;

        if ch.is_whitespace() {
            continue;
        }
        if !starts_token {
            out.push(ch);
        } else if index == 0 {
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch.to_ascii_uppercase());
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "broadcast/Deploy.s.sol/5/run-latest.json";

    fn log(json: &str) -> DeploymentLog {
        DeploymentLog::from_json(Path::new(SOURCE), json).unwrap()
    }

    #[test]
    fn test_camelize() {
        assert_eq!(camelize("SoundCreatorV1"), "soundCreatorV1");
        assert_eq!(camelize("ABCFoo"), "aBCFoo");
        assert_eq!(camelize("GoldenEggMetadata"), "goldenEggMetadata");
        assert_eq!(camelize("sound creator v1"), "soundCreatorV1");
        assert_eq!(camelize("Range-edition"), "range-Edition");
        assert_eq!(camelize("SAM"), "sAM");
        assert_eq!(camelize(""), "");
    }

    #[test]
    fn test_camelize_is_stable() {
        let once = camelize("MerkleDropMinterV2");
        assert_eq!(once, "merkleDropMinterV2");
        assert_eq!(camelize(&once), once);
    }

    #[test]
    fn test_deployment_log_path() {
        let path = DeploymentLog::path(Path::new("broadcast"), "Deploy.s.sol", 5);
        assert_eq!(path, PathBuf::from(SOURCE));
    }

    #[test]
    fn test_only_creations_are_extracted() {
        let log = log(r#"{
            "transactions": [
                {
                    "contractName": "SoundEditionV1",
                    "function": null,
                    "contractAddress": "0x1111111111111111111111111111111111111111"
                },
                {
                    "contractName": "SoundCreatorV1",
                    "function": "initialize(address)",
                    "contractAddress": "0x2222222222222222222222222222222222222222"
                },
                {
                    "contractName": null,
                    "function": null,
                    "contractAddress": "0x3333333333333333333333333333333333333333"
                },
                {
                    "contractName": "MerkleDropMinter",
                    "contractAddress": "0x4444444444444444444444444444444444444444"
                }
            ]
        }"#);

        let deployed = log.deployed_contracts(Path::new(SOURCE)).unwrap();
        assert_eq!(
            deployed,
            vec![
                DeployedContract {
                    key: "soundEditionV1".to_string(),
                    address: "0x1111111111111111111111111111111111111111".to_string(),
                },
                DeployedContract {
                    key: "merkleDropMinter".to_string(),
                    address: "0x4444444444444444444444444444444444444444".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_falsy_function_is_a_creation() {
        let log = log(r#"{
            "transactions": [
                { "contractName": "A", "function": false, "contractAddress": "0x1111111111111111111111111111111111111111" },
                { "contractName": "B", "function": 0, "contractAddress": "0x2222222222222222222222222222222222222222" },
                { "contractName": "C", "function": "", "contractAddress": "0x3333333333333333333333333333333333333333" },
                { "contractName": "D", "function": true, "contractAddress": "0x4444444444444444444444444444444444444444" },
                { "contractName": "E", "function": 1, "contractAddress": "0x5555555555555555555555555555555555555555" }
            ]
        }"#);

        let keys: Vec<_> = log
            .deployed_contracts(Path::new(SOURCE))
            .unwrap()
            .into_iter()
            .map(|c| c.key)
            .collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let log = log(r#"{
            "transactions": [
                {
                    "hash": "0xaaaa",
                    "transactionType": "CREATE",
                    "contractName": "SoundCreatorV1",
                    "function": null,
                    "contractAddress": "0x5FbDB2315678afecb367f032d93F642f64180aa3",
                    "arguments": null
                }
            ],
            "receipts": [],
            "chain": 5
        }"#);

        let deployed = log.deployed_contracts(Path::new(SOURCE)).unwrap();
        assert_eq!(deployed.len(), 1);
        // address string is kept exactly as logged
        assert_eq!(
            deployed[0].address,
            "0x5FbDB2315678afecb367f032d93F642f64180aa3"
        );
    }

    #[test]
    fn test_missing_transactions_is_parse_error() {
        let result = DeploymentLog::from_json(Path::new(SOURCE), r#"{ "receipts": [] }"#);
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn test_invalid_creation_address() {
        let log = log(r#"{
            "transactions": [
                { "contractName": "SoundEditionV1", "contractAddress": "0xnothex" }
            ]
        }"#);
        let result = log.deployed_contracts(Path::new(SOURCE));
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn test_missing_log_file() {
        let result = DeploymentLog::load(Path::new("/nonexistent/run-latest.json"));
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
