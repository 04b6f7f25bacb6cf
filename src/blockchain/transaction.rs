//! Deploy building and signing.
//!
//! # Lifecycle
//! ```text
//! DeployParams + module bytes + args
//!     → DeployBuilder::build  → UnsignedDeploy
//!     → UnsignedDeploy::sign  → SignedDeploy
//!     → client::put_deploy    → DeployHash
//! ```
//!
//! Building is pure: the timestamp is part of [`DeployParams`], so the same
//! inputs always hash to the same deploy.

use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::blockchain::args::{CLValue, RuntimeArgs};
use crate::blockchain::bytesrepr::{write_length_prefixed, ToBytes};
use crate::blockchain::types::{
    format_ttl, DeployHash, Digest, PublicKey, Signature, Timestamp, ED25519_TAG,
};
use crate::blockchain::wallet::{self, Wallet};

/// Name of the payment argument read by the standard payment code.
pub const PAYMENT_AMOUNT_ARG: &str = "amount";

/// Network-level parameters of a deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployParams {
    /// Account paying for and authorizing the deploy.
    pub account: PublicKey,
    /// Network name, e.g. `casper-test`.
    pub chain_name: String,
    pub gas_price: u64,
    pub ttl: Duration,
    /// Payment in motes.
    pub payment_amount: u64,
    pub timestamp: Timestamp,
}

/// Code executed by a deploy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExecutableDeployItem {
    ModuleBytes {
        #[serde(with = "hex::serde")]
        module_bytes: Vec<u8>,
        args: RuntimeArgs,
    },
}

impl ExecutableDeployItem {
    /// Standard payment: empty module with an `amount` argument.
    pub fn standard_payment(amount: u64) -> Self {
        ExecutableDeployItem::ModuleBytes {
            module_bytes: Vec::new(),
            args: RuntimeArgs::new().with(PAYMENT_AMOUNT_ARG, CLValue::u512(amount)),
        }
    }

    pub fn args(&self) -> &RuntimeArgs {
        match self {
            ExecutableDeployItem::ModuleBytes { args, .. } => args,
        }
    }
}

impl ToBytes for ExecutableDeployItem {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        match self {
            ExecutableDeployItem::ModuleBytes { module_bytes, args } => {
                out.push(0);
                write_length_prefixed(module_bytes, out);
                args.write_bytes(out);
            }
        }
    }
}

/// Hashed deploy header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployHeader {
    pub account: PublicKey,
    pub timestamp: Timestamp,
    #[serde(serialize_with = "serialize_ttl")]
    pub ttl: Duration,
    pub gas_price: u64,
    pub body_hash: Digest,
    pub dependencies: Vec<DeployHash>,
    pub chain_name: String,
}

fn serialize_ttl<S: Serializer>(ttl: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_ttl(*ttl))
}

impl ToBytes for DeployHeader {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.push(ED25519_TAG);
        out.extend_from_slice(self.account.as_bytes());
        self.timestamp.millis().write_bytes(out);
        (self.ttl.as_millis() as u64).write_bytes(out);
        self.gas_price.write_bytes(out);
        out.extend_from_slice(self.body_hash.as_bytes());
        (self.dependencies.len() as u32).write_bytes(out);
        for dependency in &self.dependencies {
            out.extend_from_slice(dependency.0.as_bytes());
        }
        self.chain_name.write_bytes(out);
    }
}

/// Digest over the serialized payment followed by the serialized session.
pub fn body_hash(payment: &ExecutableDeployItem, session: &ExecutableDeployItem) -> Digest {
    let mut bytes = payment.to_bytes();
    session.write_bytes(&mut bytes);
    Digest::hash(bytes)
}

/// Signature of one key over the deploy hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Approval {
    pub signer: PublicKey,
    pub signature: Signature,
}

impl Approval {
    /// Check the signature against `hash`.
    pub fn verify(&self, hash: &DeployHash) -> bool {
        wallet::verify(&self.signer, hash.0.as_bytes(), &self.signature)
    }
}

/// A deploy that has been built but not approved.
#[derive(Debug, Clone, PartialEq)]
pub struct UnsignedDeploy {
    hash: DeployHash,
    header: DeployHeader,
    payment: ExecutableDeployItem,
    session: ExecutableDeployItem,
}

impl UnsignedDeploy {
    pub fn hash(&self) -> &DeployHash {
        &self.hash
    }

    pub fn header(&self) -> &DeployHeader {
        &self.header
    }

    pub fn payment(&self) -> &ExecutableDeployItem {
        &self.payment
    }

    pub fn session(&self) -> &ExecutableDeployItem {
        &self.session
    }

    /// Approve the deploy with `wallet`.
    pub fn sign(self, wallet: &Wallet) -> SignedDeploy {
        let approval = Approval {
            signer: wallet.public_key(),
            signature: wallet.sign(self.hash.0.as_bytes()),
        };

        if approval.signer != self.header.account {
            tracing::warn!(
                signer = %approval.signer,
                account = %self.header.account,
                "Signing key differs from deploy account"
            );
        }

        SignedDeploy {
            hash: self.hash,
            header: self.header,
            payment: self.payment,
            session: self.session,
            approvals: vec![approval],
        }
    }
}

/// A deploy ready for submission; serializes to the node's JSON form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignedDeploy {
    hash: DeployHash,
    header: DeployHeader,
    payment: ExecutableDeployItem,
    session: ExecutableDeployItem,
    approvals: Vec<Approval>,
}

impl SignedDeploy {
    pub fn hash(&self) -> &DeployHash {
        &self.hash
    }

    pub fn header(&self) -> &DeployHeader {
        &self.header
    }

    pub fn session(&self) -> &ExecutableDeployItem {
        &self.session
    }

    pub fn approvals(&self) -> &[Approval] {
        &self.approvals
    }

    /// True when every approval verifies against the deploy hash.
    pub fn has_valid_approvals(&self) -> bool {
        !self.approvals.is_empty() && self.approvals.iter().all(|a| a.verify(&self.hash))
    }
}

/// Deploy builder for module installation.
pub struct DeployBuilder {
    params: DeployParams,
}

impl DeployBuilder {
    /// Create a new deploy builder.
    pub fn new(params: DeployParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &DeployParams {
        &self.params
    }

    /// Build an unsigned deploy installing `module_bytes` with `args`.
    ///
    /// # Arguments
    /// * `module_bytes` - Compiled WASM to install
    /// * `args` - Runtime arguments for the module's `call` entry point
    pub fn build(&self, module_bytes: Vec<u8>, args: RuntimeArgs) -> UnsignedDeploy {
        let payment = ExecutableDeployItem::standard_payment(self.params.payment_amount);
        let session = ExecutableDeployItem::ModuleBytes { module_bytes, args };

        let header = DeployHeader {
            account: self.params.account,
            timestamp: self.params.timestamp,
            ttl: self.params.ttl,
            gas_price: self.params.gas_price,
            body_hash: body_hash(&payment, &session),
            dependencies: Vec::new(),
            chain_name: self.params.chain_name.clone(),
        };
        let hash = DeployHash(Digest::hash(header.to_bytes()));

        tracing::debug!(
            deploy_hash = %hash,
            body_hash = %header.body_hash,
            chain_name = %header.chain_name,
            "Deploy built"
        );

        UnsignedDeploy {
            hash,
            header,
            payment,
            session,
        }
    }
}
