use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Priority given to chains that have no entry in the table.
pub const SENTINEL_PRIORITY: i32 = -99;

fn default_sentinel() -> i32 {
    SENTINEL_PRIORITY
}

/// Display priority per chain; higher sorts first.
///
/// Chain names are matched exactly as written. A chain with no entry resolves
/// to the table's sentinel, so "configured lowest" and "not configured" can
/// end up with the same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityTable {
    #[serde(default = "default_sentinel")]
    sentinel: i32,
    #[serde(default)]
    chains: BTreeMap<String, i32>,
}

impl Default for PriorityTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PriorityTable {
    /// An empty table: every chain resolves to [`SENTINEL_PRIORITY`].
    pub fn new() -> Self {
        Self {
            sentinel: SENTINEL_PRIORITY,
            chains: BTreeMap::new(),
        }
    }

    /// The wallet's built-in chain policy.
    pub fn reference() -> Self {
        Self::new()
            .with_chain("Osmosis", 100)
            .with_chain("Ethereum", 50)
            .with_chain("Arbitrum", 30)
            .with_chain("Zilliqa", 20)
            .with_chain("Neo", 20)
    }

    pub fn with_chain(mut self, chain: impl Into<String>, priority: i32) -> Self {
        self.insert(chain, priority);
        self
    }

    pub fn with_sentinel(mut self, sentinel: i32) -> Self {
        self.sentinel = sentinel;
        self
    }

    pub fn insert(&mut self, chain: impl Into<String>, priority: i32) -> Option<i32> {
        self.chains.insert(chain.into(), priority)
    }

    /// Priority for `chain`, or the sentinel when the chain is not configured.
    pub fn resolve(&self, chain: &str) -> i32 {
        self.chains.get(chain).copied().unwrap_or(self.sentinel)
    }

    pub fn get(&self, chain: &str) -> Option<i32> {
        self.chains.get(chain).copied()
    }

    pub fn sentinel(&self) -> i32 {
        self.sentinel
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Configured chains in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.chains.iter().map(|(chain, p)| (chain.as_str(), *p))
    }
}
