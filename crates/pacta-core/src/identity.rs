//! # Identity Newtypes
//!
//! Domain-primitive newtypes for identifiers throughout the engine. Each
//! identifier is a distinct type — you cannot pass a [`DisputeId`] where a
//! [`ContractId`] is expected.
//!
//! ## Validation
//!
//! UUID-based identifiers ([`PrincipalId`], [`DisputeId`]) are always valid
//! by construction, with the nil UUID reserved as the invalid sentinel (the
//! "zero address" of the source system). 32-byte identifiers
//! ([`ContractId`], [`DocumentHash`]) serialize as lowercase hex and
//! validate length and alphabet at deserialization time — invalid values
//! are rejected, not silently accepted.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::ValidationError;

/// Helper macro implementing hex-string serde for 32-byte newtypes.
/// Serializes via `to_hex()`, deserializes through `from_hex()` so that
/// malformed values fail at the boundary.
macro_rules! impl_hex_serde {
    ($ty:ident) => {
        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::from_hex(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// UUID-based identifiers
// ---------------------------------------------------------------------------

/// A principal acting on the engine: depositor, beneficiary, arbiter,
/// owner, or administrator.
///
/// The nil UUID is the invalid sentinel. Constructors in the domain crates
/// reject it wherever the source system rejected the zero address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrincipalId(Uuid);

impl PrincipalId {
    /// Create a new random principal identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a principal identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// The nil principal — the invalid "zero address" sentinel. Rejected
    /// by every constructor and reassignment operation in the engine.
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Whether this is the nil sentinel.
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PrincipalId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for PrincipalId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PrincipalId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::from_str(s).map(Self)
    }
}

/// A unique identifier for a dispute proceeding.
///
/// Supplied by the caller at filing time; the arbitration manager rejects
/// duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisputeId(Uuid);

impl DisputeId {
    /// Create a new random dispute identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a dispute identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DisputeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DisputeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "dispute:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// 32-byte identifiers
// ---------------------------------------------------------------------------

/// The opaque 32-byte identifier of a contract (agreement).
///
/// Assigned by the contract-management layer and immutable for the life of
/// the agreement. The all-zero value is the invalid sentinel, rejected at
/// escrow creation, dispute filing, and document registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContractId([u8; 32]);

impl ContractId {
    /// Create a contract identifier from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive a contract identifier by hashing arbitrary input bytes.
    ///
    /// Convenience for callers that key agreements by an external string
    /// or composite value.
    pub fn of(data: &[u8]) -> Self {
        Self(sha256_array(data))
    }

    /// Parse a contract identifier from 64 lowercase hex characters.
    pub fn from_hex(s: &str) -> Result<Self, ValidationError> {
        decode_hex_32(s).map(Self)
    }

    /// The lowercase hex encoding of this identifier.
    pub fn to_hex(&self) -> String {
        encode_hex(&self.0)
    }

    /// Access the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Whether this is the all-zero invalid sentinel.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl std::fmt::Display for ContractId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl_hex_serde!(ContractId);

/// A 32-byte content hash of a contract document.
///
/// Bound write-once to a [`ContractId`] by the document registry. The
/// all-zero hash is invalid and rejected at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentHash([u8; 32]);

impl DocumentHash {
    /// Create a document hash from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Compute the SHA-256 hash of a document's content bytes.
    ///
    /// This is the sanctioned path for producing document hashes; callers
    /// should never hand-roll digests with a different algorithm.
    pub fn of(content: &[u8]) -> Self {
        Self(sha256_array(content))
    }

    /// Parse a document hash from 64 lowercase hex characters.
    pub fn from_hex(s: &str) -> Result<Self, ValidationError> {
        decode_hex_32(s).map(Self)
    }

    /// The lowercase hex encoding of this hash.
    pub fn to_hex(&self) -> String {
        encode_hex(&self.0)
    }

    /// Access the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Whether this is the all-zero invalid sentinel.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl std::fmt::Display for DocumentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl_hex_serde!(DocumentHash);

// ---------------------------------------------------------------------------
// Hex helpers
// ---------------------------------------------------------------------------

fn sha256_array(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

fn encode_hex(bytes: &[u8; 32]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(64);
    for b in bytes {
        // Writing to a String cannot fail.
        let _ = write!(out, "{b:02x}");
    }
    out
}

fn decode_hex_32(s: &str) -> Result<[u8; 32], ValidationError> {
    if s.len() != 64 {
        return Err(ValidationError::InvalidLength {
            expected: 64,
            actual: s.len(),
        });
    }
    let mut out = [0u8; 32];
    for (i, chunk) in s.as_bytes().chunks_exact(2).enumerate() {
        let pair = std::str::from_utf8(chunk).map_err(|_| ValidationError::InvalidHex {
            value: s.to_string(),
        })?;
        out[i] = u8::from_str_radix(pair, 16).map_err(|_| ValidationError::InvalidHex {
            value: s.to_string(),
        })?;
    }
    Ok(out)
}
