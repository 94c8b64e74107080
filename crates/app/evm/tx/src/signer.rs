//! Signing capability and an in-memory keyring.

use std::collections::BTreeMap;

use alloy_primitives::{keccak256, Address, PrimitiveSignature, B256, U256};
use k256::ecdsa::{
    signature::hazmat::PrehashSigner, RecoveryId, Signature, SigningKey, VerifyingKey,
};
use rand::rngs::OsRng;

use crate::error::TxError;

/// Signs digests on behalf of the accounts it holds keys for.
pub trait Signer: Send + Sync {
    /// Sign `digest` with the key for `address`.
    ///
    /// Returns the recoverable signature and, when the signer exposes it, the
    /// public key that produced it.
    fn sign_by_address(
        &self,
        address: Address,
        digest: B256,
    ) -> Result<(PrimitiveSignature, Option<VerifyingKey>), TxError>;
}

/// Ethereum address of a public key: the last 20 bytes of the keccak256 of
/// its uncompressed encoding without the 0x04 tag.
pub fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let payload = point.as_bytes().get(1..).unwrap_or_default();
    Address::from_word(keccak256(payload))
}

/// Keyring holding secp256k1 keys in memory.
///
/// Signatures are deterministic (RFC 6979) and normalized to low `s`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyring {
    keys: BTreeMap<Address, SigningKey>,
}

impl InMemoryKeyring {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a fresh random key and return its address.
    pub fn generate(&mut self) -> Address {
        self.insert(SigningKey::random(&mut OsRng))
    }

    /// Add a key, returning its address.
    pub fn insert(&mut self, key: SigningKey) -> Address {
        let address = address_of(key.verifying_key());
        self.keys.insert(address, key);
        address
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.keys.contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Signer for InMemoryKeyring {
    fn sign_by_address(
        &self,
        address: Address,
        digest: B256,
    ) -> Result<(PrimitiveSignature, Option<VerifyingKey>), TxError> {
        let key = self.keys.get(&address).ok_or_else(|| TxError::Signing {
            address,
            reason: "no key for address".to_string(),
        })?;

        let (sig, recovery_id): (Signature, RecoveryId) =
            key.sign_prehash(digest.as_slice()).map_err(|e| TxError::Signing {
                address,
                reason: e.to_string(),
            })?;
        let r = U256::from_be_slice(&sig.r().to_bytes());
        let s = U256::from_be_slice(&sig.s().to_bytes());
        let signature = PrimitiveSignature::new(r, s, recovery_id.is_y_odd());

        Ok((signature, Some(VerifyingKey::from(key))))
    }
}
