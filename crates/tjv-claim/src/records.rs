use std::fmt;

use serde::{Deserialize, Serialize};
use tjv_types::{Address, TokenId};

/// Sale phase a claim was made in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimPhase {
    Whitelist,
    Public,
}

impl fmt::Display for ClaimPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Whitelist => f.write_str("whitelist"),
            Self::Public => f.write_str("public"),
        }
    }
}

/// Per-claimant tally. Created on first claim, only ever increases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub whitelist_claimed: u32,
    pub public_claimed: u32,
}

impl ClaimRecord {
    pub fn total(&self) -> u64 {
        u64::from(self.whitelist_claimed) + u64::from(self.public_claimed)
    }

    pub(crate) fn add(&mut self, phase: ClaimPhase, amount: u32) {
        match phase {
            ClaimPhase::Whitelist => {
                self.whitelist_claimed = self.whitelist_claimed.saturating_add(amount)
            }
            ClaimPhase::Public => self.public_claimed = self.public_claimed.saturating_add(amount),
        }
    }
}

/// Result of a successful claim: tokens `first_token..first_token + amount`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimReceipt {
    pub claimant: Address,
    pub phase: ClaimPhase,
    pub first_token: TokenId,
    pub amount: u32,
}

impl ClaimReceipt {
    /// Ids minted by this claim.
    pub fn tokens(&self) -> std::ops::Range<TokenId> {
        self.first_token..self.first_token + u64::from(self.amount)
    }
}
