// crates/tessera-core/src/identity.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::crypto::hash_bytes;
use crate::error::TesseraError;

/// Identity of an account on the ledger.
///
/// A 32-byte value: either an ed25519 public key (wallet accounts) or the
/// SHA-256 of a label (well-known system accounts such as the staking custody).
/// Serialized as a 64-character lowercase hex string so it can key JSON maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    /// Wrap raw bytes (e.g. a public key).
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive a deterministic account id from a human-readable label.
    pub fn from_label(label: &str) -> Self {
        Self(hash_bytes(label.as_bytes()))
    }

    /// Full lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First 8 hex characters, for tables and log lines.
    pub fn short(&self) -> String {
        self.to_hex()[..8].to_string()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for AccountId {
    type Err = TesseraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches("0x");
        let bytes = hex::decode(trimmed)
            .map_err(|e| TesseraError::Serialization(format!("Invalid account id hex: {}", e)))?;
        let array: [u8; 32] = bytes.try_into().map_err(|_| {
            TesseraError::Serialization("Account id must be exactly 32 bytes".to_string())
        })?;
        Ok(Self(array))
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Sequential identifier of a non-fungible credential. The first one issued is 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CredentialId(pub u64);

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_is_deterministic() {
        assert_eq!(AccountId::from_label("alice"), AccountId::from_label("alice"));
        assert_ne!(AccountId::from_label("alice"), AccountId::from_label("bob"));
    }

    #[test]
    fn test_hex_parse() {
        let id = AccountId::from_label("alice");
        let parsed: AccountId = id.to_hex().parse().unwrap();
        assert_eq!(parsed, id);

        let prefixed: AccountId = format!("0x{}", id.to_hex()).parse().unwrap();
        assert_eq!(prefixed, id);
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!("abcd".parse::<AccountId>().is_err());
        assert!("zz".repeat(32).parse::<AccountId>().is_err());
    }

    #[test]
    fn test_json_map_key() {
        let mut map = std::collections::HashMap::new();
        map.insert(AccountId::from_label("alice"), 7u64);
        let json = serde_json::to_string(&map).unwrap();
        let back: std::collections::HashMap<AccountId, u64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_short() {
        let id = AccountId::from_bytes([0xab; 32]);
        assert_eq!(id.short(), "abababab");
        assert_eq!(CredentialId(3).to_string(), "#3");
    }
}
