//! Embedded Ethereum chain configuration and the hard fork gate.
//!
//! Fork activation is expressed in consensus block heights. A fork with no
//! height is never active on this chain.

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

use crate::error::ChainConfigError;

/// EIP-150 fork hash used by the default configuration: the zero hash.
pub const DEFAULT_EIP150_HASH: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000000";

/// Hard fork activation schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ChainConfig {
    pub homestead_block: Option<u64>,
    pub dao_fork_block: Option<u64>,
    /// Whether the nodes support or oppose the DAO hard fork.
    pub dao_fork_support: bool,
    pub eip150_block: Option<u64>,
    /// Canonical block hash at the EIP-150 fork; empty when unknown.
    pub eip150_hash: String,
    pub eip155_block: Option<u64>,
    pub eip158_block: Option<u64>,
    pub byzantium_block: Option<u64>,
    pub constantinople_block: Option<u64>,
    pub petersburg_block: Option<u64>,
    pub istanbul_block: Option<u64>,
    pub muir_glacier_block: Option<u64>,
    pub berlin_block: Option<u64>,
    pub london_block: Option<u64>,
    pub arrow_glacier_block: Option<u64>,
    pub gray_glacier_block: Option<u64>,
    pub merge_netsplit_block: Option<u64>,
}

impl Default for ChainConfig {
    /// Every fork active from genesis.
    fn default() -> Self {
        Self {
            homestead_block: Some(0),
            dao_fork_block: Some(0),
            dao_fork_support: true,
            eip150_block: Some(0),
            eip150_hash: DEFAULT_EIP150_HASH.to_string(),
            eip155_block: Some(0),
            eip158_block: Some(0),
            byzantium_block: Some(0),
            constantinople_block: Some(0),
            petersburg_block: Some(0),
            istanbul_block: Some(0),
            muir_glacier_block: Some(0),
            berlin_block: Some(0),
            london_block: Some(0),
            arrow_glacier_block: Some(0),
            gray_glacier_block: Some(0),
            merge_netsplit_block: Some(0),
        }
    }
}

/// Entry in the fork ordering check.
struct Fork {
    name: &'static str,
    block: Option<u64>,
    optional: bool,
}

fn is_forked(fork: Option<u64>, height: u64) -> bool {
    fork.is_some_and(|activation| height >= activation)
}

impl ChainConfig {
    /// Configuration with no fork scheduled at all.
    pub fn frontier() -> Self {
        Self {
            homestead_block: None,
            dao_fork_block: None,
            dao_fork_support: false,
            eip150_block: None,
            eip150_hash: String::new(),
            eip155_block: None,
            eip158_block: None,
            byzantium_block: None,
            constantinople_block: None,
            petersburg_block: None,
            istanbul_block: None,
            muir_glacier_block: None,
            berlin_block: None,
            london_block: None,
            arrow_glacier_block: None,
            gray_glacier_block: None,
            merge_netsplit_block: None,
        }
    }

    pub fn is_homestead(&self, height: u64) -> bool {
        is_forked(self.homestead_block, height)
    }

    pub fn is_eip155(&self, height: u64) -> bool {
        is_forked(self.eip155_block, height)
    }

    pub fn is_berlin(&self, height: u64) -> bool {
        is_forked(self.berlin_block, height)
    }

    /// Whether `height` is at or after the fee market (London) fork.
    pub fn is_london(&self, height: u64) -> bool {
        is_forked(self.london_block, height)
    }

    /// Check internal consistency: the EIP-150 hash format and the fork order.
    pub fn validate(&self) -> Result<(), ChainConfigError> {
        self.validate_eip150_hash()?;
        self.validate_fork_order()
    }

    fn validate_eip150_hash(&self) -> Result<(), ChainConfigError> {
        if self.eip150_hash.is_empty() {
            return Ok(());
        }
        self.eip150_hash
            .parse::<B256>()
            .map(|_| ())
            .map_err(|_| ChainConfigError::InvalidEip150Hash(self.eip150_hash.clone()))
    }

    fn schedule(&self) -> [Fork; 15] {
        let fork = |name, block, optional| Fork {
            name,
            block,
            optional,
        };
        [
            fork("homesteadBlock", self.homestead_block, false),
            fork("daoForkBlock", self.dao_fork_block, true),
            fork("eip150Block", self.eip150_block, false),
            fork("eip155Block", self.eip155_block, false),
            fork("eip158Block", self.eip158_block, false),
            fork("byzantiumBlock", self.byzantium_block, false),
            fork("constantinopleBlock", self.constantinople_block, false),
            fork("petersburgBlock", self.petersburg_block, false),
            fork("istanbulBlock", self.istanbul_block, false),
            fork("muirGlacierBlock", self.muir_glacier_block, true),
            fork("berlinBlock", self.berlin_block, false),
            fork("londonBlock", self.london_block, false),
            fork("arrowGlacierBlock", self.arrow_glacier_block, true),
            fork("grayGlacierBlock", self.gray_glacier_block, true),
            fork("mergeNetsplitBlock", self.merge_netsplit_block, true),
        ]
    }

    /// Mandatory forks must be enabled in order and at non-decreasing
    /// heights. Optional forks are ordered only when set.
    fn validate_fork_order(&self) -> Result<(), ChainConfigError> {
        let mut last: Option<Fork> = None;
        for current in self.schedule() {
            if let Some(previous) = &last {
                match (previous.block, current.block) {
                    (None, Some(at)) => {
                        return Err(ChainConfigError::MissingFork {
                            missing: previous.name,
                            enabled: current.name,
                            at,
                        });
                    }
                    (Some(earlier_at), Some(later_at)) if earlier_at > later_at => {
                        return Err(ChainConfigError::OutOfOrder {
                            earlier: previous.name,
                            earlier_at,
                            later: current.name,
                            later_at,
                        });
                    }
                    _ => {}
                }
            }
            if !current.optional || current.block.is_some() {
                last = Some(current);
            }
        }
        Ok(())
    }
}

/// Whether the London fee market upgrade is active at `height`.
pub fn is_london(config: &ChainConfig, height: u64) -> bool {
    config.is_london(height)
}
