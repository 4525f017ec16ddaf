//! Value objects for token ancestry validation
//!
//! Identifiers, token type discriminator and the tri-state validation verdict.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::errors::DagError;

/// Transaction identifier (32 bytes, displayed as lowercase hex).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TxId(pub [u8; 32]);

/// A token id is the txid of the token's genesis transaction.
pub type TokenId = TxId;

impl TxId {
    /// The all-zero id, used as "absent".
    pub const ZERO: TxId = TxId([0u8; 32]);

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Parse a 64-char hex string.
    pub fn parse(s: &str) -> Result<Self, DagError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DagError::InvalidArgument("empty transaction id".to_string()));
        }

        let mut bytes = [0u8; 32];
        hex::decode_to_slice(trimmed, &mut bytes).map_err(|e| {
            DagError::InvalidArgument(format!("malformed transaction id {trimmed}: {e}"))
        })?;
        Ok(Self(bytes))
    }

    /// Short form for log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxId({})", self.short())
    }
}

impl FromStr for TxId {
    type Err = DagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<[u8; 32]> for TxId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Serialize for TxId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TxId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        TxId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// SLP token type discriminator.
///
/// Must match across every parent/child edge of a lineage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum TokenType {
    /// Type 1 fungible token
    Fungible,
    /// NFT1 group token
    NftGroup,
    /// NFT1 child token
    NftChild,
    /// Any other protocol byte
    Unknown(u8),
}

impl From<u8> for TokenType {
    fn from(value: u8) -> Self {
        match value {
            0x01 => TokenType::Fungible,
            0x81 => TokenType::NftGroup,
            0x41 => TokenType::NftChild,
            other => TokenType::Unknown(other),
        }
    }
}

impl From<TokenType> for u8 {
    fn from(value: TokenType) -> Self {
        match value {
            TokenType::Fungible => 0x01,
            TokenType::NftGroup => 0x81,
            TokenType::NftChild => 0x41,
            TokenType::Unknown(other) => other,
        }
    }
}

/// Tri-state validation result.
///
/// On the wire this is the nullable `isValidSlp` flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Verdict {
    /// Lineage proven valid.
    Valid,
    /// Lineage proven invalid.
    Invalid,
    /// Not yet evaluated.
    #[default]
    Unresolved,
}

impl Verdict {
    /// True once the verdict is Valid or Invalid.
    pub fn is_decided(&self) -> bool {
        !matches!(self, Verdict::Unresolved)
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }

    /// Verdict of a frame that ran out of inputs: anything short of Valid
    /// counts as Invalid.
    pub fn settle(self) -> Verdict {
        match self {
            Verdict::Valid => Verdict::Valid,
            Verdict::Invalid | Verdict::Unresolved => Verdict::Invalid,
        }
    }
}

impl From<Option<bool>> for Verdict {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Verdict::Valid,
            Some(false) => Verdict::Invalid,
            None => Verdict::Unresolved,
        }
    }
}

impl From<Verdict> for Option<bool> {
    fn from(value: Verdict) -> Self {
        match value {
            Verdict::Valid => Some(true),
            Verdict::Invalid => Some(false),
            Verdict::Unresolved => None,
        }
    }
}
