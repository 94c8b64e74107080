//! Transaction builder: nonce stamping, digest, signing and attachment.

use alloy_consensus::{SignableTransaction, TxEip1559, TxEip2930, TxLegacy};
use alloy_primitives::{Address, PrimitiveSignature, TxKind, B256};

use crate::envelope::{tx_type, SignedTransaction};
use crate::error::TxError;
use crate::ethereum::{SignedEip1559Tx, SignedEip2930Tx, SignedLegacyTx};
use crate::scheme::SigningScheme;
use crate::signer::{address_of, Signer};
use crate::traits::TypedTransaction;
use crate::variant::TxVariant;

fn tx_kind(to: Option<Address>) -> TxKind {
    to.map_or(TxKind::Create, TxKind::Call)
}

/// A transaction bound to a nonce and chain id, awaiting its signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsignedTx {
    Legacy(TxLegacy),
    AccessList(TxEip2930),
    DynamicFee(TxEip1559),
}

impl UnsignedTx {
    pub fn tx_type(&self) -> u8 {
        match self {
            UnsignedTx::Legacy(_) => tx_type::LEGACY,
            UnsignedTx::AccessList(_) => tx_type::EIP2930,
            UnsignedTx::DynamicFee(_) => tx_type::EIP1559,
        }
    }

    pub fn chain_id(&self) -> Option<u64> {
        match self {
            UnsignedTx::Legacy(tx) => tx.chain_id,
            UnsignedTx::AccessList(tx) => Some(tx.chain_id),
            UnsignedTx::DynamicFee(tx) => Some(tx.chain_id),
        }
    }

    pub fn nonce(&self) -> u64 {
        match self {
            UnsignedTx::Legacy(tx) => tx.nonce,
            UnsignedTx::AccessList(tx) => tx.nonce,
            UnsignedTx::DynamicFee(tx) => tx.nonce,
        }
    }

    /// keccak256 of the canonical signing payload: the EIP-155 encoding for
    /// legacy, the type-prefixed RLP for typed transactions.
    pub fn signature_hash(&self) -> B256 {
        match self {
            UnsignedTx::Legacy(tx) => tx.signature_hash(),
            UnsignedTx::AccessList(tx) => tx.signature_hash(),
            UnsignedTx::DynamicFee(tx) => tx.signature_hash(),
        }
    }

    /// Attach a signature and recover the sender.
    pub fn into_signed(self, signature: PrimitiveSignature) -> Result<SignedTransaction, TxError> {
        Ok(match self {
            UnsignedTx::Legacy(tx) => SignedLegacyTx::from_alloy(tx.into_signed(signature))?.into(),
            UnsignedTx::AccessList(tx) => {
                SignedEip2930Tx::from_alloy(tx.into_signed(signature))?.into()
            }
            UnsignedTx::DynamicFee(tx) => {
                SignedEip1559Tx::from_alloy(tx.into_signed(signature))?.into()
            }
        })
    }
}

/// Builds and signs transactions for one chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxBuilder {
    chain_id: u64,
    replay_protected: bool,
}

impl TxBuilder {
    /// Builder producing replay-protected transactions for `chain_id`.
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            replay_protected: true,
        }
    }

    /// Build legacy transactions without EIP-155 protection.
    pub fn unprotected(self) -> Self {
        Self {
            replay_protected: false,
            ..self
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Stamp `nonce` onto the variant and bind it to this builder's chain.
    pub fn build(&self, variant: TxVariant, nonce: u64) -> UnsignedTx {
        match variant.with_nonce(nonce) {
            TxVariant::Legacy {
                nonce,
                gas_price,
                gas_limit,
                to,
                value,
                data,
            } => UnsignedTx::Legacy(TxLegacy {
                chain_id: self.replay_protected.then_some(self.chain_id),
                nonce,
                gas_price,
                gas_limit,
                to: tx_kind(to),
                value,
                input: data,
            }),
            TxVariant::AccessList {
                nonce,
                gas_price,
                gas_limit,
                to,
                value,
                data,
                access_list,
            } => UnsignedTx::AccessList(TxEip2930 {
                chain_id: self.chain_id,
                nonce,
                gas_price,
                gas_limit,
                to: tx_kind(to),
                value,
                access_list,
                input: data,
            }),
            TxVariant::DynamicFee {
                nonce,
                gas_fee_cap,
                gas_tip_cap,
                gas_limit,
                to,
                value,
                data,
                access_list,
            } => UnsignedTx::DynamicFee(TxEip1559 {
                chain_id: self.chain_id,
                nonce,
                gas_limit,
                max_fee_per_gas: gas_fee_cap,
                max_priority_fee_per_gas: gas_tip_cap,
                to: tx_kind(to),
                value,
                access_list,
                input: data,
            }),
        }
    }

    /// Digest to be signed for `unsigned`.
    pub fn digest(&self, unsigned: &UnsignedTx) -> B256 {
        unsigned.signature_hash()
    }

    /// Ask `signer` to sign the digest of `unsigned` as `address`.
    pub fn sign(
        &self,
        unsigned: &UnsignedTx,
        signer: &dyn Signer,
        address: Address,
    ) -> Result<PrimitiveSignature, TxError> {
        let (signature, verifying_key) = signer.sign_by_address(address, self.digest(unsigned))?;
        if let Some(key) = verifying_key {
            let key_address = address_of(&key);
            if key_address != address {
                return Err(TxError::Signing {
                    address,
                    reason: format!("signer used the key of {key_address}"),
                });
            }
        }
        Ok(signature)
    }

    /// Attach `signature`, checking the result is valid under `scheme`.
    pub fn attach(
        &self,
        unsigned: UnsignedTx,
        signature: PrimitiveSignature,
        scheme: &SigningScheme,
    ) -> Result<SignedTransaction, TxError> {
        scheme.ensure_accepts(unsigned.tx_type())?;
        let signed = unsigned.into_signed(signature)?;
        scheme.sender(&signed)?;
        Ok(signed)
    }

    /// Build, sign and attach in one step.
    ///
    /// The scheme is checked before the signer is invoked.
    pub fn build_signed(
        &self,
        variant: TxVariant,
        nonce: u64,
        signer: &dyn Signer,
        address: Address,
        scheme: &SigningScheme,
    ) -> Result<SignedTransaction, TxError> {
        let unsigned = self.build(variant, nonce);
        scheme.ensure_accepts(unsigned.tx_type())?;
        scheme.check_chain_id(unsigned.tx_type(), unsigned.chain_id())?;

        let signature = self.sign(&unsigned, signer, address)?;
        let signed = self.attach(unsigned, signature, scheme)?;
        tracing::debug!(
            tx_type = signed.tx_type(),
            nonce,
            sender = %signed.sender(),
            hash = %signed.tx_hash(),
            "built signed transaction"
        );
        Ok(signed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ethereum::SECP256K1N_HALF;
    use crate::signer::InMemoryKeyring;
    use alloy_primitives::U256;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const CHAIN_ID: u64 = 9000;

    /// Signer that records how often it was invoked.
    #[derive(Default)]
    struct CountingSigner {
        inner: InMemoryKeyring,
        calls: AtomicUsize,
    }

    impl Signer for CountingSigner {
        fn sign_by_address(
            &self,
            address: Address,
            digest: B256,
        ) -> Result<(PrimitiveSignature, Option<k256::ecdsa::VerifyingKey>), TxError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.sign_by_address(address, digest)
        }
    }

    #[test]
    fn test_build_only_sets_nonce_and_chain() {
        let builder = TxBuilder::new(CHAIN_ID);
        let UnsignedTx::DynamicFee(tx) = builder.build(TxVariant::dynamic_fee_template(0), 9)
        else {
            panic!("expected dynamic fee transaction");
        };
        assert_eq!(tx.nonce, 9);
        assert_eq!(tx.chain_id, CHAIN_ID);
        assert_eq!(tx.max_fee_per_gas, 10);
        assert_eq!(tx.max_priority_fee_per_gas, 2);
        assert_eq!(tx.gas_limit, 21_000);
        assert_eq!(tx.to, TxKind::Call(Address::ZERO));
    }

    #[test]
    fn test_unprotected_legacy_has_no_chain_id() {
        let unsigned = TxBuilder::new(CHAIN_ID)
            .unprotected()
            .build(TxVariant::legacy_template(0), 0);
        assert_eq!(unsigned.chain_id(), None);

        let typed = TxBuilder::new(CHAIN_ID)
            .unprotected()
            .build(TxVariant::access_list_template(0), 0);
        assert_eq!(typed.chain_id(), Some(CHAIN_ID));
    }

    #[test]
    fn test_digest_is_deterministic() {
        let builder = TxBuilder::new(CHAIN_ID);
        let a = builder.build(TxVariant::legacy_template(0), 5);
        let b = builder.build(TxVariant::legacy_template(0), 5);
        assert_eq!(builder.digest(&a), builder.digest(&b));

        let other_nonce = builder.build(TxVariant::legacy_template(0), 6);
        assert_ne!(builder.digest(&a), builder.digest(&other_nonce));
    }

    #[test]
    fn test_rejected_variant_never_reaches_signer() {
        let mut signer = CountingSigner::default();
        let address = signer.inner.generate();
        let berlin = SigningScheme::Berlin { chain_id: CHAIN_ID };

        let err = TxBuilder::new(CHAIN_ID)
            .build_signed(TxVariant::dynamic_fee_template(0), 0, &signer, address, &berlin)
            .unwrap_err();
        assert!(matches!(err, TxError::UnsupportedVariant { tx_type: 0x02, .. }));
        assert_eq!(signer.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_wrong_chain_never_reaches_signer() {
        let mut signer = CountingSigner::default();
        let address = signer.inner.generate();

        let err = TxBuilder::new(1)
            .build_signed(
                TxVariant::legacy_template(0),
                0,
                &signer,
                address,
                &SigningScheme::latest(CHAIN_ID),
            )
            .unwrap_err();
        assert!(matches!(err, TxError::InvalidSignature(_)));
        assert_eq!(signer.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_attach_rejects_chain_mismatch() {
        let mut keyring = InMemoryKeyring::new();
        let address = keyring.generate();
        let builder = TxBuilder::new(CHAIN_ID);

        let unsigned = builder.build(TxVariant::access_list_template(0), 0);
        let signature = builder.sign(&unsigned, &keyring, address).unwrap();
        let err = builder
            .attach(unsigned, signature, &SigningScheme::latest(CHAIN_ID + 1))
            .unwrap_err();
        assert!(matches!(err, TxError::InvalidSignature(_)));
    }

    #[test]
    fn test_high_s_rejected_after_frontier() {
        let mut keyring = InMemoryKeyring::new();
        let address = keyring.generate();
        let builder = TxBuilder::new(CHAIN_ID).unprotected();

        let unsigned = builder.build(TxVariant::legacy_template(0), 0);
        let low = builder.sign(&unsigned, &keyring, address).unwrap();
        let order = SECP256K1N_HALF * U256::from(2) + U256::from(1);
        let high = PrimitiveSignature::new(low.r(), order - low.s(), !low.v());

        let err = builder
            .attach(unsigned.clone(), high, &SigningScheme::Homestead)
            .unwrap_err();
        assert!(matches!(err, TxError::InvalidSignature(_)));

        let signed = builder
            .attach(unsigned, high, &SigningScheme::Frontier)
            .unwrap();
        assert_eq!(signed.sender(), address);
    }

    #[test]
    fn test_sign_rejects_mismatched_key() {
        let mut keyring = InMemoryKeyring::new();
        let address = keyring.generate();

        struct WrongKey<'a>(&'a InMemoryKeyring, Address);
        impl Signer for WrongKey<'_> {
            fn sign_by_address(
                &self,
                _address: Address,
                digest: B256,
            ) -> Result<(PrimitiveSignature, Option<k256::ecdsa::VerifyingKey>), TxError> {
                self.0.sign_by_address(self.1, digest)
            }
        }

        let builder = TxBuilder::new(CHAIN_ID);
        let unsigned = builder.build(TxVariant::legacy_template(0), 0);
        let err = builder
            .sign(&unsigned, &WrongKey(&keyring, address), Address::repeat_byte(0x22))
            .unwrap_err();
        assert!(matches!(err, TxError::Signing { .. }));
    }
}
