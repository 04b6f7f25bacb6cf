//! Wallet management and deploy signing.
//!
//! # Security
//! - Keys are decoded from PKCS#8 PEM with a real decoder, never sliced
//! - Keys are never logged or serialized
//! - `Debug` output only shows the public key

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use ed25519_dalek::pkcs8::DecodePrivateKey;
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use rustls_pemfile::Item;

use crate::blockchain::types::{BlockchainError, BlockchainResult, PublicKey, Signature};

/// Ed25519 signing wallet.
#[derive(Clone)]
pub struct Wallet {
    /// The underlying signer (private key).
    signing_key: SigningKey,
}

impl Wallet {
    /// Load a wallet from a PKCS#8 PEM file.
    pub fn from_pem_file(path: &Path) -> BlockchainResult<Self> {
        let file = File::open(path).map_err(|source| BlockchainError::KeyFile {
            path: path.display().to_string(),
            source,
        })?;
        let wallet = Self::from_pem_reader(&mut BufReader::new(file))?;

        tracing::info!(
            path = %path.display(),
            public_key = %wallet.public_key(),
            "Wallet initialized"
        );
        Ok(wallet)
    }

    /// Load a wallet from PEM text.
    pub fn from_pem(pem: &str) -> BlockchainResult<Self> {
        Self::from_pem_reader(&mut pem.as_bytes())
    }

    fn from_pem_reader(reader: &mut dyn std::io::BufRead) -> BlockchainResult<Self> {
        loop {
            let item = rustls_pemfile::read_one(reader)
                .map_err(|e| BlockchainError::Wallet(format!("Invalid PEM encoding: {}", e)))?;
            match item {
                Some(Item::Pkcs8Key(key)) => {
                    let signing_key = SigningKey::from_pkcs8_der(key.secret_pkcs8_der())
                        .map_err(|e| {
                            BlockchainError::Wallet(format!("Invalid Ed25519 PKCS#8 key: {}", e))
                        })?;
                    return Ok(Self { signing_key });
                }
                Some(Item::Pkcs1Key(_)) => {
                    return Err(BlockchainError::Wallet(
                        "RSA keys are not supported, expected an Ed25519 PRIVATE KEY".to_string(),
                    ));
                }
                Some(Item::Sec1Key(_)) => {
                    return Err(BlockchainError::Wallet(
                        "EC keys are not supported, expected an Ed25519 PRIVATE KEY".to_string(),
                    ));
                }
                // Certificates and other sections are skipped.
                Some(_) => continue,
                None => {
                    return Err(BlockchainError::Wallet(
                        "No PRIVATE KEY section found in PEM input".to_string(),
                    ));
                }
            }
        }
    }

    /// Build a wallet from a raw 32-byte Ed25519 seed.
    pub fn from_secret_bytes(seed: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    /// The raw 32-byte seed.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    /// Get the wallet's account public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::ed25519(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign arbitrary bytes.
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature::ed25519(self.signing_key.sign(message).to_bytes())
    }
}

/// Check `signature` over `message` against `public_key`.
pub fn verify(public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
    let Ok(key) = VerifyingKey::from_bytes(public_key.as_bytes()) else {
        return false;
    };
    let signature = ed25519_dalek::Signature::from_bytes(signature.as_bytes());
    key.verify(message, &signature).is_ok()
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("public_key", &self.public_key().to_hex())
            .finish_non_exhaustive()
    }
}
