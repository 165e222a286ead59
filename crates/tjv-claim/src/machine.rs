use std::collections::HashMap;

use tjv_gate::{WhitelistProof, WhitelistVerifier};
use tjv_render::RevealSettings;
use tjv_types::{Address, CollectionId, SaleState, TokenId, TokenTraits, LAYER_COUNT};
use tracing::{debug, info};

use crate::config::ClaimConfig;
use crate::error::{ClaimError, ClaimResult};
use crate::records::{ClaimPhase, ClaimReceipt, ClaimRecord};

/// The collection's claim state: sale phase, whitelist, ownership, and reveal.
///
/// Every method takes `&mut self` or `&self`, so a claim's checks and its
/// effects happen in one step. A failing call changes nothing.
pub struct ClaimMachine {
    config: ClaimConfig,
    collection: CollectionId,
    operator: Address,
    sale_state: SaleState,
    verifier: Box<dyn WhitelistVerifier>,
    /// Owner of token `i` at index `i`.
    owners: Vec<Address>,
    traits: Vec<TokenTraits>,
    balances: HashMap<Address, u64>,
    records: HashMap<Address, ClaimRecord>,
    history: Vec<ClaimReceipt>,
}

impl ClaimMachine {
    /// Create a closed machine with an explicit verifier, which replaces
    /// `config.whitelist`.
    pub fn new(
        mut config: ClaimConfig,
        operator: Address,
        verifier: Box<dyn WhitelistVerifier>,
    ) -> Self {
        let collection = config.collection_id();
        config.whitelist = verifier.config();
        Self {
            config,
            collection,
            operator,
            sale_state: SaleState::Closed,
            verifier,
            owners: Vec::new(),
            traits: Vec::new(),
            balances: HashMap::new(),
            records: HashMap::new(),
            history: Vec::new(),
        }
    }

    /// Create a closed machine whose verifier is built from `config.whitelist`.
    pub fn from_config(config: ClaimConfig, operator: Address) -> ClaimResult<Self> {
        let verifier = config.whitelist.build(config.collection_id())?;
        Ok(Self::new(config, operator, verifier))
    }

    // -----------------------------------------------------------------------
    // Claims
    // -----------------------------------------------------------------------

    /// Mint `amount` tokens to `caller` during the public phase.
    pub fn claim_public(&mut self, caller: Address, amount: u32) -> ClaimResult<ClaimReceipt> {
        require_claimant(&caller)?;
        self.require_phase(ClaimPhase::Public)?;
        self.require_amount(amount)?;
        self.require_supply(amount)?;
        Ok(self.mint(caller, ClaimPhase::Public, amount))
    }

    /// Mint `amount` tokens to a whitelisted `caller`.
    pub fn claim_whitelist(
        &mut self,
        caller: Address,
        amount: u32,
        proof: &WhitelistProof,
    ) -> ClaimResult<ClaimReceipt> {
        require_claimant(&caller)?;
        self.require_phase(ClaimPhase::Whitelist)?;
        self.require_amount(amount)?;
        if !self.verifier.verify(&caller, amount, proof) {
            debug!(claimant = %caller, strategy = %proof.strategy(), "whitelist proof rejected");
            return Err(ClaimError::InvalidProof);
        }
        let claimed = self.claim_record(&caller).whitelist_claimed;
        self.config
            .whitelist_quota
            .admits(claimed, amount, self.config.max_per_tx)
            .map_err(|limit| ClaimError::QuotaExceeded {
                claimed,
                requested: amount,
                limit,
            })?;
        self.require_supply(amount)?;
        Ok(self.mint(caller, ClaimPhase::Whitelist, amount))
    }

    fn require_phase(&self, phase: ClaimPhase) -> ClaimResult<()> {
        let open = match phase {
            ClaimPhase::Whitelist => SaleState::WhitelistOnly,
            ClaimPhase::Public => SaleState::Public,
        };
        if self.sale_state != open {
            return Err(ClaimError::SaleNotOpen {
                phase,
                state: self.sale_state,
            });
        }
        Ok(())
    }

    fn require_amount(&self, amount: u32) -> ClaimResult<()> {
        if amount == 0 || amount > self.config.max_per_tx {
            return Err(ClaimError::InvalidAmount {
                amount,
                max: self.config.max_per_tx,
            });
        }
        Ok(())
    }

    fn require_supply(&self, amount: u32) -> ClaimResult<()> {
        let remaining = self.remaining_supply();
        if u64::from(amount) > remaining {
            return Err(ClaimError::SupplyExhausted {
                requested: amount,
                remaining,
            });
        }
        Ok(())
    }

    /// Apply a fully checked claim.
    fn mint(&mut self, claimant: Address, phase: ClaimPhase, amount: u32) -> ClaimReceipt {
        let first_token = self.total_supply();
        let seed = *self.collection.as_bytes();
        for token in first_token..first_token + u64::from(amount) {
            self.owners.push(claimant);
            self.traits
                .push(TokenTraits::derive(&seed, token, &self.config.layer_sizes));
        }
        *self.balances.entry(claimant).or_default() += u64::from(amount);
        self.records.entry(claimant).or_default().add(phase, amount);

        let receipt = ClaimReceipt {
            claimant,
            phase,
            first_token,
            amount,
        };
        self.history.push(receipt.clone());
        info!(
            claimant = %claimant,
            %phase,
            first_token,
            amount,
            total_supply = self.total_supply(),
            "tokens claimed"
        );
        receipt
    }

    // -----------------------------------------------------------------------
    // Operator surface
    // -----------------------------------------------------------------------

    fn require_operator(&self, caller: &Address) -> ClaimResult<()> {
        if *caller != self.operator {
            return Err(ClaimError::Unauthorized(*caller));
        }
        Ok(())
    }

    /// Move the sale to any state.
    pub fn set_sale_state(&mut self, caller: &Address, state: SaleState) -> ClaimResult<()> {
        self.require_operator(caller)?;
        let previous = std::mem::replace(&mut self.sale_state, state);
        info!(from = %previous, to = %state, "sale state changed");
        Ok(())
    }

    /// Replace the whitelist, e.g. a new Merkle root or signer key.
    pub fn set_verifier(
        &mut self,
        caller: &Address,
        verifier: Box<dyn WhitelistVerifier>,
    ) -> ClaimResult<()> {
        self.require_operator(caller)?;
        info!(strategy = %verifier.strategy(), "whitelist verifier replaced");
        self.config.whitelist = verifier.config();
        self.verifier = verifier;
        Ok(())
    }

    pub fn set_unrevealed_uri(
        &mut self,
        caller: &Address,
        uri: impl Into<String>,
    ) -> ClaimResult<()> {
        self.require_operator(caller)?;
        self.config.reveal.unrevealed_uri = uri.into();
        Ok(())
    }

    pub fn set_base_uri(&mut self, caller: &Address, uri: impl Into<String>) -> ClaimResult<()> {
        self.require_operator(caller)?;
        self.config.reveal.base_uri = uri.into();
        Ok(())
    }

    pub fn set_extension(&mut self, caller: &Address, ext: impl Into<String>) -> ClaimResult<()> {
        self.require_operator(caller)?;
        self.config.reveal.extension = ext.into();
        Ok(())
    }

    /// Switch token URIs from the placeholder to real metadata. Not reversible.
    pub fn reveal(&mut self, caller: &Address) -> ClaimResult<()> {
        self.require_operator(caller)?;
        if !self.config.reveal.revealed {
            self.config.reveal.revealed = true;
            info!(total_supply = self.total_supply(), "collection revealed");
        }
        Ok(())
    }

    /// Set the per-layer item counts traits are drawn from.
    ///
    /// Only allowed before the first mint.
    pub fn set_layer_sizes(
        &mut self,
        caller: &Address,
        sizes: [u16; LAYER_COUNT],
    ) -> ClaimResult<()> {
        self.require_operator(caller)?;
        if !self.owners.is_empty() {
            return Err(ClaimError::CatalogFrozen);
        }
        self.config.layer_sizes = sizes;
        debug!(?sizes, "layer sizes set");
        Ok(())
    }

    pub fn transfer_operator(
        &mut self,
        caller: &Address,
        new_operator: Address,
    ) -> ClaimResult<()> {
        self.require_operator(caller)?;
        info!(from = %self.operator, to = %new_operator, "operator transferred");
        self.operator = new_operator;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn total_supply(&self) -> u64 {
        self.owners.len() as u64
    }

    pub fn remaining_supply(&self) -> u64 {
        self.config.max_supply.saturating_sub(self.total_supply())
    }

    pub fn owner_of(&self, token: TokenId) -> ClaimResult<Address> {
        index(token)
            .and_then(|i| self.owners.get(i))
            .copied()
            .ok_or(ClaimError::TokenNotFound(token))
    }

    pub fn balance_of(&self, owner: &Address) -> u64 {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    /// The claimant's tally; all zeros if they never claimed.
    pub fn claim_record(&self, claimant: &Address) -> ClaimRecord {
        self.records.get(claimant).copied().unwrap_or_default()
    }

    pub fn token_traits(&self, token: TokenId) -> ClaimResult<TokenTraits> {
        index(token)
            .and_then(|i| self.traits.get(i))
            .copied()
            .ok_or(ClaimError::TokenNotFound(token))
    }

    pub fn sale_state(&self) -> SaleState {
        self.sale_state
    }

    pub fn operator(&self) -> &Address {
        &self.operator
    }

    pub fn collection(&self) -> &CollectionId {
        &self.collection
    }

    pub fn reveal_settings(&self) -> &RevealSettings {
        &self.config.reveal
    }

    pub fn verifier(&self) -> &dyn WhitelistVerifier {
        self.verifier.as_ref()
    }

    /// The current configuration, including operator changes since
    /// construction.
    pub fn config(&self) -> &ClaimConfig {
        &self.config
    }

    /// Every successful claim, in order.
    pub fn history(&self) -> &[ClaimReceipt] {
        &self.history
    }
}

impl std::fmt::Debug for ClaimMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimMachine")
            .field("collection", &self.collection)
            .field("operator", &self.operator)
            .field("sale_state", &self.sale_state)
            .field("total_supply", &self.total_supply())
            .field("revealed", &self.config.reveal.revealed)
            .finish()
    }
}

fn require_claimant(caller: &Address) -> ClaimResult<()> {
    if caller.is_zero() {
        return Err(ClaimError::ZeroAddress);
    }
    Ok(())
}

fn index(token: TokenId) -> Option<usize> {
    usize::try_from(token).ok()
}
