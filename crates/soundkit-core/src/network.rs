//! Deployment environments and creator variants
//!
//! Both are selected from environment variables restricted to a fixed set of
//! values. [`select`] is the single validation path for all of them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// A value that can be chosen by name from a fixed set
pub trait Named: Copy {
    fn as_str(&self) -> &'static str;
}

/// Pick the value named by `value` out of `allowed`.
///
/// A missing value and a value outside `allowed` are both configuration
/// errors that carry the full list of allowed names.
pub fn select<T: Named>(var: &str, value: Option<&str>, allowed: &[T]) -> Result<T> {
    let names = || allowed.iter().map(Named::as_str).collect::<Vec<_>>();

    let value = match value {
        Some(v) if !v.is_empty() => v,
        _ => {
            return Err(Error::MissingVariable {
                var: var.to_string(),
                allowed: names(),
            })
        }
    };

    allowed
        .iter()
        .copied()
        .find(|candidate| candidate.as_str() == value)
        .ok_or_else(|| Error::InvalidVariable {
            var: var.to_string(),
            value: value.to_string(),
            allowed: names(),
        })
}

// =============================================================================
// Network
// =============================================================================

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Preview,
    Staging,
    Goerli,
    Mainnet,
}

impl Network {
    /// Environments selectable through `SOUND_ENV`
    pub const SOUND: [Network; 3] = [Network::Preview, Network::Staging, Network::Mainnet];

    /// Environments selectable through `EVM_NETWORK`
    pub const EVM: [Network; 2] = [Network::Goerli, Network::Mainnet];

    /// Chain the environment's contracts are deployed to
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Mainnet => 1,
            Network::Preview | Network::Staging | Network::Goerli => 5,
        }
    }
}

impl Named for Network {
    fn as_str(&self) -> &'static str {
        match self {
            Network::Preview => "preview",
            Network::Staging => "staging",
            Network::Goerli => "goerli",
            Network::Mainnet => "mainnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Creator variant
// =============================================================================

/// Which flavour of the creator contract a deployment run produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatorType {
    Single,
    Album,
}

impl CreatorType {
    pub const ALL: [CreatorType; 2] = [CreatorType::Single, CreatorType::Album];
}

impl Named for CreatorType {
    fn as_str(&self) -> &'static str {
        match self {
            CreatorType::Single => "single",
            CreatorType::Album => "album",
        }
    }
}

impl fmt::Display for CreatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
