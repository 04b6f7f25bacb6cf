//! Chain-specific types and error definitions.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest as _};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use thiserror::Error;

// Re-export NodeConfig from config module to avoid duplication
pub use crate::config::schema::NodeConfig;

type Blake2b256 = Blake2b<U32>;

/// Algorithm tag prefixed to Ed25519 keys and signatures.
pub const ED25519_TAG: u8 = 1;

/// Length of a blake2b-256 digest.
pub const DIGEST_LENGTH: usize = 32;

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// Key file could not be read.
    #[error("failed to read key file {path}: {source}")]
    KeyFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Transport failure talking to the node.
    #[error("RPC transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Node answered with a non-success HTTP status.
    #[error("node returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Node answered with a JSON-RPC error object.
    #[error("node rejected {method} (code {code}): {message}{}", format_error_data(.data))]
    RpcResponse {
        method: String,
        code: i64,
        message: String,
        data: Option<serde_json::Value>,
    },

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Response could not be interpreted.
    #[error("invalid RPC response: {0}")]
    InvalidResponse(String),

    /// Node acknowledged a deploy under a different hash than the one signed.
    #[error("deploy hash mismatch: signed {expected}, node returned {actual}")]
    HashMismatch {
        expected: DeployHash,
        actual: DeployHash,
    },
}

fn format_error_data(data: &Option<serde_json::Value>) -> String {
    match data {
        Some(serde_json::Value::Null) | None => String::new(),
        Some(serde_json::Value::String(s)) => format!(" ({})", s),
        Some(other) => format!(" ({})", other),
    }
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// A blake2b-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_LENGTH]);

impl Digest {
    /// Hash `data` with blake2b-256.
    pub fn hash(data: impl AsRef<[u8]>) -> Self {
        let mut hasher = Blake2b256::new();
        hasher.update(data.as_ref());
        Self(hasher.finalize().into())
    }

    pub fn from_bytes(bytes: [u8; DIGEST_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parse a 64-character hex string.
    pub fn from_hex(input: &str) -> BlockchainResult<Self> {
        let bytes = hex::decode(input).map_err(|e| {
            BlockchainError::InvalidResponse(format!("bad digest hex '{}': {}", input, e))
        })?;
        let array: [u8; DIGEST_LENGTH] = bytes.try_into().map_err(|v: Vec<u8>| {
            BlockchainError::InvalidResponse(format!(
                "digest must be {} bytes, got {}",
                DIGEST_LENGTH,
                v.len()
            ))
        })?;
        Ok(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Identifier of a deploy: the digest of its serialized header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DeployHash(pub Digest);

impl DeployHash {
    pub fn from_hex(input: &str) -> BlockchainResult<Self> {
        Digest::from_hex(input).map(Self)
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl fmt::Display for DeployHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Ed25519 account public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; 32]);

impl PublicKey {
    pub fn ed25519(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Tagged hex form used by the node and explorers (`01` + key).
    pub fn to_hex(&self) -> String {
        format!("{:02x}{}", ED25519_TAG, hex::encode(self.0))
    }

    /// Account hash: blake2b-256 over the lowercase algorithm name, a zero
    /// byte and the raw key.
    pub fn to_account_hash(&self) -> Digest {
        let mut preimage = b"ed25519\0".to_vec();
        preimage.extend_from_slice(&self.0);
        Digest::hash(preimage)
    }

    /// Global state key of the account, e.g. `account-hash-…`.
    pub fn account_key(&self) -> String {
        format!("account-hash-{}", self.to_account_hash())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; 64]);

impl Signature {
    pub fn ed25519(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format!("{:02x}{}", ED25519_TAG, hex::encode(self.0))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        Self(millis as u64)
    }

    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub fn millis(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::<Utc>::from_timestamp_millis(self.0 as i64) {
            Some(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => write!(f, "{}ms", self.0),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Render a duration the way the node prints TTLs, e.g. `30m` or `1h 30m`.
pub fn format_ttl(ttl: Duration) -> String {
    let mut millis = ttl.as_millis() as u64;
    if millis == 0 {
        return "0s".to_string();
    }

    let mut parts = Vec::new();
    let days = millis / 86_400_000;
    millis %= 86_400_000;
    if days > 0 {
        parts.push(if days == 1 { "1day".to_string() } else { format!("{}days", days) });
    }
    for (unit_ms, suffix) in [(3_600_000, "h"), (60_000, "m"), (1_000, "s"), (1, "ms")] {
        let count = millis / unit_ms;
        millis %= unit_ms;
        if count > 0 {
            parts.push(format!("{}{}", count, suffix));
        }
    }
    parts.join(" ")
}
