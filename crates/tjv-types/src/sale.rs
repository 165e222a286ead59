use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Claim phase of the collection.
///
/// Only the operator changes it. Any state may be set directly from any
/// other state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SaleState {
    #[default]
    Closed = 0,
    WhitelistOnly = 1,
    Public = 2,
}

impl SaleState {
    /// Numeric code used by operator tooling.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for SaleState {
    type Error = TypeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Closed),
            1 => Ok(Self::WhitelistOnly),
            2 => Ok(Self::Public),
            other => Err(TypeError::UnknownSaleState(other)),
        }
    }
}

impl fmt::Display for SaleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "Closed"),
            Self::WhitelistOnly => write!(f, "WhitelistOnly"),
            Self::Public => write!(f, "Public"),
        }
    }
}
