use std::path::Path;

use serde::{Deserialize, Serialize};
use tjv_claim::ClaimConfig;
use tjv_render::RenderConfig;
use tjv_store::LogStoreConfig;

use crate::error::{SdkError, SdkResult};

/// Everything needed to stand up a collection, loadable from one TOML file.
///
/// Every section is optional; missing values take their defaults.
///
/// ```toml
/// [claim]
/// name = "Tejiverse"
/// max_supply = 3000
/// max_per_tx = 10
/// whitelist_quota = { per_address = 2 }
///
/// [claim.whitelist]
/// strategy = "merkle"
/// root = "0x5f1c..."
///
/// [claim.reveal]
/// unrevealed_uri = "ipfs://placeholder"
///
/// [render]
/// description = "Fully on-chain generative collection."
///
/// [store]
/// max_chunk_bytes = 24000
/// sync_mode = "every_write"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    pub claim: ClaimConfig,
    pub render: RenderConfig,
    /// Store settings. `max_chunk_bytes` is also the packing budget.
    pub store: LogStoreConfig,
}

impl CollectionConfig {
    pub fn from_toml_str(s: &str) -> SdkResult<Self> {
        toml::from_str(s).map_err(|e| SdkError::Config(format!("failed to parse config: {e}")))
    }

    /// Read and parse a config file.
    pub fn from_file(path: &Path) -> SdkResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SdkError::Config(format!(
                "failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> SdkResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| SdkError::Config(format!("failed to serialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tjv_claim::WhitelistQuota;
    use tjv_gate::WhitelistConfig;
    use tjv_store::SyncMode;

    #[test]
    fn empty_document_is_default() {
        let config = CollectionConfig::from_toml_str("").unwrap();
        assert_eq!(config, CollectionConfig::default());
    }

    #[test]
    fn sections_override_defaults() {
        let config = CollectionConfig::from_toml_str(
            r#"
            [claim]
            max_supply = 3000
            whitelist_quota = "once"
            layer_sizes = [4, 3, 10, 7, 12, 5]

            [claim.whitelist]
            strategy = "signature"
            signer = "abcd"

            [claim.reveal]
            unrevealed_uri = "ipfs://placeholder"

            [store]
            sync_mode = "os_default"
            "#,
        )
        .unwrap();

        assert_eq!(config.claim.max_supply, 3000);
        assert_eq!(config.claim.max_per_tx, 10);
        assert_eq!(config.claim.whitelist_quota, WhitelistQuota::Once);
        assert_eq!(config.claim.layer_sizes, [4, 3, 10, 7, 12, 5]);
        assert_eq!(
            config.claim.whitelist,
            WhitelistConfig::Signature {
                signer: "abcd".into()
            }
        );
        assert_eq!(config.claim.reveal.unrevealed_uri, "ipfs://placeholder");
        assert!(!config.claim.reveal.revealed);
        assert_eq!(config.store.sync_mode, SyncMode::OsDefault);
        assert_eq!(config.store.max_chunk_bytes, 24_000);
        assert_eq!(config.render.name, "Tejiverse");
    }

    #[test]
    fn per_address_quota_parses_as_table() {
        let config =
            CollectionConfig::from_toml_str("[claim]\nwhitelist_quota = { per_address = 2 }\n")
                .unwrap();
        assert_eq!(config.claim.whitelist_quota, WhitelistQuota::PerAddress(2));
    }

    #[test]
    fn malformed_document_is_a_config_error() {
        let err = CollectionConfig::from_toml_str("[claim]\nmax_supply = \"many\"\n").unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collection.toml");
        let mut config = CollectionConfig::default();
        config.claim.max_supply = 77;
        config.render.canvas_size = 640;

        std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();
        assert_eq!(CollectionConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CollectionConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }
}
