use std::path::Path;

use tjv_claim::{ClaimError, ClaimMachine, ClaimReceipt};
use tjv_gate::WhitelistProof;
use tjv_pack::{load_catalog, pack, PackError};
use tjv_render::{Composer, RenderConfig, TokenMetadata};
use tjv_store::{InMemoryTraitStore, LogTraitStore, TraitStore};
use tjv_types::{Address, Layer, TokenId, TraitItem, TraitKey, LAYER_COUNT};
use tracing::info;

use crate::config::CollectionConfig;
use crate::error::{SdkError, SdkResult};

/// Outcome of loading a trait catalog into the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngestReport {
    pub items: usize,
    pub chunks: usize,
    /// Item count per layer after the load, in z-order.
    pub layer_sizes: [u16; LAYER_COUNT],
}

/// A collection: its trait store, claim state, and rendering settings.
pub struct Collection<S: TraitStore = InMemoryTraitStore> {
    store: S,
    machine: ClaimMachine,
    render: RenderConfig,
    chunk_budget: usize,
}

impl Collection<InMemoryTraitStore> {
    /// A collection whose trait store lives in memory.
    pub fn in_memory(config: CollectionConfig, operator: Address) -> SdkResult<Self> {
        let store = InMemoryTraitStore::with_budget(config.store.max_chunk_bytes);
        Self::with_store(store, config, operator)
    }
}

impl Collection<LogTraitStore> {
    /// A collection whose trait store is the chunk log at `path`.
    ///
    /// Reopening an existing log restores the catalog and its layer sizes.
    /// Claim state is not persisted.
    pub fn open(path: &Path, config: CollectionConfig, operator: Address) -> SdkResult<Self> {
        let store = LogTraitStore::open(path, config.store.clone())?;
        Self::with_store(store, config, operator)
    }
}

impl<S: TraitStore> Collection<S> {
    pub fn with_store(store: S, config: CollectionConfig, operator: Address) -> SdkResult<Self> {
        let CollectionConfig {
            mut claim,
            render,
            store: store_config,
        } = config;
        if !store.is_empty()? {
            claim.layer_sizes = catalog_sizes(&store)?;
        }
        let machine = ClaimMachine::from_config(claim, operator)?;
        info!(
            collection = ?machine.collection(),
            items = store.len()?,
            "collection opened"
        );
        Ok(Self {
            store,
            machine,
            render,
            chunk_budget: store_config.max_chunk_bytes,
        })
    }

    // ---- Catalog ----

    /// Load `root/<Layer>/*` for every layer, pack it, and store it.
    pub fn ingest_assets(&mut self, caller: &Address, root: &Path) -> SdkResult<IngestReport> {
        self.require_operator(caller)?;
        let items = load_catalog(root, &Layer::ALL)?;
        self.ingest_items(caller, &items)
    }

    /// Pack and store already-loaded items, then size the trait draw from
    /// the stored catalog.
    ///
    /// Every layer must stay numbered from 0 without gaps, or nothing is
    /// written. Items must be new to the store; a duplicate key fails its
    /// whole chunk and the chunks before it stay applied.
    pub fn ingest_items(
        &mut self,
        caller: &Address,
        items: &[TraitItem],
    ) -> SdkResult<IngestReport> {
        self.require_operator(caller)?;
        if self.machine.total_supply() > 0 {
            return Err(ClaimError::CatalogFrozen.into());
        }

        tjv_pack::layer_sizes(self.store.layer_counts()?, items)?;
        let mut items = items.to_vec();
        items.sort_by_key(TraitItem::key);

        let chunks = pack(&items, self.chunk_budget)?;
        let inserted = self.store.insert_chunks(&chunks);
        // Resize even on failure: earlier chunks may have landed. Items go in
        // key order, so whatever landed is still contiguous per layer.
        let layer_sizes = self.store.layer_counts()?;
        self.machine.set_layer_sizes(caller, layer_sizes)?;
        let written = inserted?;

        info!(items = written, chunks = chunks.len(), ?layer_sizes, "catalog ingested");
        Ok(IngestReport {
            items: written,
            chunks: chunks.len(),
            layer_sizes,
        })
    }

    fn require_operator(&self, caller: &Address) -> SdkResult<()> {
        if caller != self.machine.operator() {
            return Err(ClaimError::Unauthorized(*caller).into());
        }
        Ok(())
    }

    // ---- Claims ----

    pub fn claim_public(&mut self, caller: Address, amount: u32) -> SdkResult<ClaimReceipt> {
        Ok(self.machine.claim_public(caller, amount)?)
    }

    pub fn claim_whitelist(
        &mut self,
        caller: Address,
        amount: u32,
        proof: &WhitelistProof,
    ) -> SdkResult<ClaimReceipt> {
        Ok(self.machine.claim_whitelist(caller, amount, proof)?)
    }

    // ---- Rendering ----

    /// The token's URI: placeholder before reveal, external link when a base
    /// URI is set, otherwise a composed `data:application/json` document.
    pub fn token_uri(&self, token: TokenId) -> SdkResult<String> {
        let traits = self.machine.token_traits(token)?;
        let uri = self
            .composer()
            .token_uri(token, &traits, self.machine.reveal_settings())?;
        Ok(uri)
    }

    /// The composed image of a revealed token.
    pub fn image_uri(&self, token: TokenId) -> SdkResult<String> {
        let traits = self.machine.token_traits(token)?;
        self.require_revealed(token)?;
        Ok(self.composer().image_uri(&traits)?)
    }

    /// The composed metadata of a revealed token.
    pub fn metadata(&self, token: TokenId) -> SdkResult<TokenMetadata> {
        let traits = self.machine.token_traits(token)?;
        self.require_revealed(token)?;
        Ok(self.composer().metadata(token, &traits)?)
    }

    fn require_revealed(&self, token: TokenId) -> SdkResult<()> {
        if !self.machine.reveal_settings().revealed {
            return Err(SdkError::NotRevealed(token));
        }
        Ok(())
    }

    fn composer(&self) -> Composer<'_, S> {
        Composer::new(&self.store, &self.render)
    }

    // ---- Accessors ----

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Claim state, for queries.
    pub fn machine(&self) -> &ClaimMachine {
        &self.machine
    }

    /// Claim state, for operator calls.
    pub fn machine_mut(&mut self) -> &mut ClaimMachine {
        &mut self.machine
    }

    pub fn render_config(&self) -> &RenderConfig {
        &self.render
    }
}

/// Layer sizes of a stored catalog, which must be numbered from 0 without
/// gaps in every layer.
fn catalog_sizes<S: TraitStore + ?Sized>(store: &S) -> SdkResult<[u16; LAYER_COUNT]> {
    let counts = store.layer_counts()?;
    for layer in Layer::ALL {
        for index in 0..counts[layer.index() as usize] {
            let key = TraitKey::new(layer.index(), index as u8);
            if !store.contains(key)? {
                return Err(PackError::GappedLayer {
                    layer,
                    missing: index,
                }
                .into());
            }
        }
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
    use tjv_crypto::MerkleTree;
    use tjv_gate::WhitelistConfig;
    use tjv_types::SaleState;

    /// Write `root/<Layer>/<name>.png` files, `per_layer` in each layer.
    fn write_assets(root: &Path, per_layer: usize) {
        for layer in Layer::ALL {
            let dir = root.join(layer.name());
            std::fs::create_dir_all(&dir).unwrap();
            for i in 0..per_layer {
                let bytes = vec![layer.index(), i as u8, 0x89, 0x50, 0x4E, 0x47];
                std::fs::write(dir.join(format!("{}-{i}.png", layer.name())), bytes).unwrap();
            }
        }
    }

    fn operator() -> Address {
        Address::derive("operator")
    }

    fn decode_data_uri(uri: &str, prefix: &str) -> Vec<u8> {
        BASE64.decode(uri.strip_prefix(prefix).unwrap()).unwrap()
    }

    #[test]
    fn ingest_then_claim_then_reveal() {
        let assets = tempfile::tempdir().unwrap();
        write_assets(assets.path(), 3);

        let mut config = CollectionConfig::default();
        config.claim.reveal.unrevealed_uri = "ipfs://placeholder".into();
        let mut collection = Collection::in_memory(config, operator()).unwrap();

        let report = collection.ingest_assets(&operator(), assets.path()).unwrap();
        assert_eq!(report.items, 18);
        assert_eq!(report.chunks, 1);
        assert_eq!(report.layer_sizes, [3; LAYER_COUNT]);

        let op = operator();
        collection
            .machine_mut()
            .set_sale_state(&op, SaleState::Public)
            .unwrap();
        let alice = Address::derive("alice");
        collection.claim_public(alice, 2).unwrap();

        assert_eq!(collection.token_uri(1).unwrap(), "ipfs://placeholder");
        assert!(matches!(
            collection.image_uri(1).unwrap_err(),
            SdkError::NotRevealed(1)
        ));

        collection.machine_mut().reveal(&op).unwrap();
        let uri = collection.token_uri(1).unwrap();
        let json = decode_data_uri(&uri, "data:application/json;base64,");
        let meta: TokenMetadata = serde_json::from_slice(&json).unwrap();
        assert_eq!(meta.name, "Tejiverse #1");
        assert_eq!(meta.attributes.len(), LAYER_COUNT);
        assert_eq!(meta.attributes[0].trait_type, "Background");
        assert!(meta.attributes[0].value.starts_with("Background-"));
        assert_eq!(meta.image, collection.image_uri(1).unwrap());
        assert_eq!(meta, collection.metadata(1).unwrap());
    }

    #[test]
    fn external_base_uri_after_reveal() {
        let mut collection = Collection::in_memory(CollectionConfig::default(), operator()).unwrap();
        let op = operator();
        let machine = collection.machine_mut();
        machine.set_sale_state(&op, SaleState::Public).unwrap();
        machine.set_base_uri(&op, "https://meta.example/").unwrap();
        machine.set_extension(&op, ".json").unwrap();
        machine.reveal(&op).unwrap();
        collection.claim_public(Address::derive("bob"), 1).unwrap();

        // No catalog is loaded, so this only works because nothing is composed.
        assert_eq!(
            collection.token_uri(0).unwrap(),
            "https://meta.example/0.json"
        );
    }

    #[test]
    fn unknown_token_is_an_error() {
        let collection = Collection::in_memory(CollectionConfig::default(), operator()).unwrap();
        assert!(matches!(
            collection.token_uri(0).unwrap_err(),
            SdkError::Claim(ClaimError::TokenNotFound(0))
        ));
    }

    #[test]
    fn only_operator_ingests() {
        let assets = tempfile::tempdir().unwrap();
        write_assets(assets.path(), 1);
        let mut collection = Collection::in_memory(CollectionConfig::default(), operator()).unwrap();

        let mallory = Address::derive("mallory");
        assert!(matches!(
            collection.ingest_assets(&mallory, assets.path()).unwrap_err(),
            SdkError::Claim(ClaimError::Unauthorized(_))
        ));
        assert!(collection.store().is_empty().unwrap());
    }

    #[test]
    fn re_ingesting_the_same_catalog_fails() {
        let assets = tempfile::tempdir().unwrap();
        write_assets(assets.path(), 2);
        let mut collection = Collection::in_memory(CollectionConfig::default(), operator()).unwrap();

        collection.ingest_assets(&operator(), assets.path()).unwrap();
        assert!(matches!(
            collection.ingest_assets(&operator(), assets.path()).unwrap_err(),
            SdkError::Store(tjv_store::StoreError::DuplicateKey(_))
        ));
        assert_eq!(collection.store().len().unwrap(), 12);
    }

    #[test]
    fn catalog_is_frozen_after_first_claim() {
        let assets = tempfile::tempdir().unwrap();
        write_assets(assets.path(), 1);
        let mut collection = Collection::in_memory(CollectionConfig::default(), operator()).unwrap();
        let op = operator();
        collection
            .machine_mut()
            .set_sale_state(&op, SaleState::Public)
            .unwrap();
        collection.claim_public(op, 1).unwrap();

        assert!(matches!(
            collection.ingest_assets(&op, assets.path()).unwrap_err(),
            SdkError::Claim(ClaimError::CatalogFrozen)
        ));
    }

    #[test]
    fn whitelist_claim_through_config() {
        let alice = Address::derive("alice");
        let bob = Address::derive("bob");
        let tree = MerkleTree::from_addresses(&[alice, bob]);

        let mut config = CollectionConfig::default();
        config.claim.whitelist = WhitelistConfig::merkle(&tree.root());
        let mut collection = Collection::in_memory(config, operator()).unwrap();
        collection
            .machine_mut()
            .set_sale_state(&operator(), SaleState::WhitelistOnly)
            .unwrap();

        let proof = WhitelistProof::Merkle(tree.proof(0).unwrap());
        collection.claim_whitelist(alice, 1, &proof).unwrap();
        assert_eq!(collection.machine().owner_of(0).unwrap(), alice);
        assert!(matches!(
            collection.claim_whitelist(bob, 1, &proof).unwrap_err(),
            SdkError::Claim(ClaimError::InvalidProof)
        ));
    }

    #[test]
    fn reopened_log_restores_catalog() {
        let assets = tempfile::tempdir().unwrap();
        write_assets(assets.path(), 4);
        let data = tempfile::tempdir().unwrap();
        let log = data.path().join("traits.log");

        {
            let mut collection =
                Collection::open(&log, CollectionConfig::default(), operator()).unwrap();
            collection.ingest_assets(&operator(), assets.path()).unwrap();
        }

        let mut collection = Collection::open(&log, CollectionConfig::default(), operator()).unwrap();
        assert_eq!(collection.store().len().unwrap(), 24);
        assert_eq!(collection.machine().config().layer_sizes, [4; LAYER_COUNT]);

        let op = operator();
        let machine = collection.machine_mut();
        machine.set_sale_state(&op, SaleState::Public).unwrap();
        machine.reveal(&op).unwrap();
        collection.claim_public(Address::derive("carol"), 1).unwrap();
        let meta = collection.metadata(0).unwrap();
        assert_eq!(meta.attributes.len(), LAYER_COUNT);
    }

    fn items_at(indices: &[u8]) -> Vec<TraitItem> {
        Layer::ALL
            .iter()
            .flat_map(|layer| {
                indices.iter().map(move |&i| {
                    TraitItem::from_raw(layer.index(), i, format!("{layer}-{i}"), &[i, 0x89])
                })
            })
            .collect()
    }

    #[test]
    fn gapped_catalog_is_rejected_before_writing() {
        let mut collection = Collection::in_memory(CollectionConfig::default(), operator()).unwrap();

        let err = collection
            .ingest_items(&operator(), &items_at(&[0, 5]))
            .unwrap_err();
        assert!(matches!(
            err,
            SdkError::Pack(PackError::GappedLayer {
                layer: Layer::Background,
                missing: 1
            })
        ));
        assert!(collection.store().is_empty().unwrap());
        assert_eq!(collection.machine().config().layer_sizes, [1; LAYER_COUNT]);
    }

    #[test]
    fn every_minted_token_renders() {
        let mut collection = Collection::in_memory(CollectionConfig::default(), operator()).unwrap();
        let op = operator();
        // Unordered input, extended by a second ingest.
        collection.ingest_items(&op, &items_at(&[1, 0])).unwrap();
        let report = collection.ingest_items(&op, &items_at(&[2])).unwrap();
        assert_eq!(report.layer_sizes, [3; LAYER_COUNT]);

        let machine = collection.machine_mut();
        machine.set_sale_state(&op, SaleState::Public).unwrap();
        machine.reveal(&op).unwrap();
        for _ in 0..3 {
            collection.claim_public(Address::derive("dana"), 10).unwrap();
        }
        for token in 0..30 {
            assert!(collection.metadata(token).is_ok(), "token {token} did not render");
        }
    }

    #[test]
    fn gapped_store_is_refused_on_open() {
        let store = InMemoryTraitStore::new();
        store
            .insert_chunk(&tjv_types::StorageChunk::new(vec![
                TraitItem::from_raw(3, 0, "a", b"x"),
                TraitItem::from_raw(3, 2, "c", b"x"),
            ]))
            .unwrap();

        let err = Collection::with_store(store, CollectionConfig::default(), operator())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            SdkError::Pack(PackError::GappedLayer {
                layer: Layer::Eyes,
                missing: 1
            })
        ));
    }

    #[test]
    fn small_budget_splits_catalog() {
        let assets = tempfile::tempdir().unwrap();
        write_assets(assets.path(), 5);
        let mut config = CollectionConfig::default();
        // Six raw bytes encode to eight base64 bytes: four items per chunk.
        config.store.max_chunk_bytes = 32;
        let mut collection = Collection::in_memory(config, operator()).unwrap();

        let report = collection.ingest_assets(&operator(), assets.path()).unwrap();
        assert_eq!(report.items, 30);
        assert_eq!(report.chunks, 8);
    }
}
