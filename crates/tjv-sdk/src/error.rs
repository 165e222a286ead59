use thiserror::Error;
use tjv_types::TokenId;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("token {0} is not revealed")]
    NotRevealed(TokenId),

    #[error("pack error: {0}")]
    Pack(#[from] tjv_pack::PackError),

    #[error("store error: {0}")]
    Store(#[from] tjv_store::StoreError),

    #[error("render error: {0}")]
    Render(#[from] tjv_render::RenderError),

    #[error("claim error: {0}")]
    Claim(#[from] tjv_claim::ClaimError),

    #[error("whitelist error: {0}")]
    Gate(#[from] tjv_gate::GateError),
}

pub type SdkResult<T> = Result<T, SdkError>;
