use serde::{Deserialize, Serialize};
use tjv_gate::WhitelistConfig;
use tjv_render::RevealSettings;
use tjv_types::{CollectionId, LAYER_COUNT};

/// Per-address limit applied to whitelist claims.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WhitelistQuota {
    /// One whitelist claim call per address, of any valid amount.
    Once,
    /// Cumulative whitelist tokens per address.
    PerAddress(u32),
}

impl WhitelistQuota {
    /// Check a claim of `amount` against what the address already claimed.
    /// Returns the effective limit on failure.
    pub fn admits(&self, claimed: u32, amount: u32, max_per_tx: u32) -> Result<(), u32> {
        match *self {
            Self::Once if claimed > 0 => Err(max_per_tx),
            Self::Once => Ok(()),
            Self::PerAddress(limit) if claimed.saturating_add(amount) > limit => Err(limit),
            Self::PerAddress(_) => Ok(()),
        }
    }
}

/// Construction-time configuration of a [`ClaimMachine`](crate::ClaimMachine).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimConfig {
    /// Collection name; with `salt` it derives the collection id, which also
    /// seeds trait assignment.
    pub name: String,
    pub salt: u64,
    pub max_supply: u64,
    /// Largest amount a single claim call may request.
    pub max_per_tx: u32,
    pub whitelist_quota: WhitelistQuota,
    /// Items available per layer, in z-order.
    pub layer_sizes: [u16; LAYER_COUNT],
    pub whitelist: WhitelistConfig,
    pub reveal: RevealSettings,
}

impl Default for ClaimConfig {
    fn default() -> Self {
        let max_per_tx = 10;
        Self {
            name: "Tejiverse".into(),
            salt: 0,
            max_supply: 10_000,
            max_per_tx,
            whitelist_quota: WhitelistQuota::PerAddress(max_per_tx),
            layer_sizes: [1; LAYER_COUNT],
            whitelist: WhitelistConfig::default(),
            reveal: RevealSettings::default(),
        }
    }
}

impl ClaimConfig {
    pub fn collection_id(&self) -> CollectionId {
        CollectionId::derive(&self.name, self.salt)
    }
}
