//! Claim state machine for the Tejiverse collection engine.
//!
//! [`ClaimMachine`] holds the sale phase, the whitelist verifier, token
//! ownership, per-claimant tallies, and reveal settings. Claims are checked
//! in a fixed order (sale state, amount, proof, quota, supply) and nothing is
//! written until every check passes.
//!
//! # Quick Start
//!
//! ```rust
//! use tjv_claim::{ClaimConfig, ClaimMachine};
//! use tjv_types::{Address, SaleState};
//!
//! let operator = Address::derive("operator");
//! let mut machine = ClaimMachine::from_config(ClaimConfig::default(), operator).unwrap();
//! machine.set_sale_state(&operator, SaleState::Public).unwrap();
//!
//! let alice = Address::derive("alice");
//! let receipt = machine.claim_public(alice, 2).unwrap();
//! assert_eq!(receipt.first_token, 0);
//! assert_eq!(machine.balance_of(&alice), 2);
//! ```

pub mod config;
pub mod error;
pub mod machine;
pub mod records;

pub use config::{ClaimConfig, WhitelistQuota};
pub use error::{ClaimError, ClaimResult};
pub use machine::ClaimMachine;
pub use records::{ClaimPhase, ClaimReceipt, ClaimRecord};
