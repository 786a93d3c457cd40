pub mod addresses;
pub mod broadcast;
pub mod error;
pub mod files;
pub mod interface_ids;
pub mod manifest;
pub mod network;
pub mod prune;

pub use addresses::{AddressMap, MergeStrategy, MergeTable, CREATOR_KEY};
pub use broadcast::{camelize, DeployedContract, DeploymentLog, TransactionRecord};
pub use error::{Error, Result};
pub use interface_ids::{freeze, InterfaceIds};
pub use manifest::{ExportConditions, Exports, ProjectManifest, PublishManifest};
pub use network::{select, CreatorType, Named, Network};
pub use prune::{MatchScope, PruneReport, PruneRules, Pruner};
