use tjv_gate::GateError;
use tjv_types::{Address, SaleState, TokenId};

use crate::records::ClaimPhase;

/// Errors produced by claim and operator calls.
///
/// Every error is terminal for its call and leaves the machine unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClaimError {
    #[error("the zero address cannot claim")]
    ZeroAddress,

    #[error("{phase} sale is not open (sale state: {state})")]
    SaleNotOpen { phase: ClaimPhase, state: SaleState },

    #[error("invalid claim amount {amount}: must be between 1 and {max}")]
    InvalidAmount { amount: u32, max: u32 },

    #[error("invalid proof")]
    InvalidProof,

    #[error("whitelist quota exceeded: {claimed} claimed, {requested} requested, limit {limit}")]
    QuotaExceeded {
        claimed: u32,
        requested: u32,
        limit: u32,
    },

    #[error("supply exhausted: {requested} requested, {remaining} remaining")]
    SupplyExhausted { requested: u32, remaining: u64 },

    #[error("caller {0} is not the operator")]
    Unauthorized(Address),

    #[error("token {0} does not exist")]
    TokenNotFound(TokenId),

    /// Layer sizes cannot change once tokens carry traits drawn from them.
    #[error("catalog is frozen after the first mint")]
    CatalogFrozen,

    #[error("whitelist configuration: {0}")]
    Gate(#[from] GateError),
}

pub type ClaimResult<T> = Result<T, ClaimError>;
