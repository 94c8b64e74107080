use alloy_primitives::{keccak256, Address, PrimitiveSignature, B256, U256};
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{All, Message, Secp256k1};
use std::sync::OnceLock;

use crate::error::TxError;

/// Half of the secp256k1 group order. Signatures with `s` above this are
/// malleable and rejected from Homestead onwards.
pub const SECP256K1N_HALF: U256 = U256::from_limbs([
    0xdfe9_2f46_681b_20a0,
    0x5d57_6e73_57a4_501d,
    0xffff_ffff_ffff_ffff,
    0x7fff_ffff_ffff_ffff,
]);

fn recovery_failed() -> TxError {
    TxError::InvalidSignature("failed to recover signer from signature".to_string())
}

pub fn recover_sender_from_signature_hash(
    signature_hash: B256,
    signature: &PrimitiveSignature,
) -> Result<Address, TxError> {
    let mut compact = [0u8; 64];
    let r = signature.r().to_be_bytes::<32>();
    let s = signature.s().to_be_bytes::<32>();
    compact[..32].copy_from_slice(&r);
    compact[32..].copy_from_slice(&s);

    let recid =
        RecoveryId::from_i32(if signature.v() { 1 } else { 0 }).map_err(|_| recovery_failed())?;
    let recoverable =
        RecoverableSignature::from_compact(&compact, recid).map_err(|_| recovery_failed())?;

    let msg =
        Message::from_digest_slice(signature_hash.as_slice()).map_err(|_| recovery_failed())?;
    let pubkey = secp()
        .recover_ecdsa(&msg, &recoverable)
        .map_err(|_| recovery_failed())?;
    let uncompressed = pubkey.serialize_uncompressed();
    let pubkey_payload = uncompressed.get(1..).ok_or_else(recovery_failed)?;
    let hash = keccak256(pubkey_payload);
    let address_bytes = hash.as_slice().get(12..).ok_or_else(recovery_failed)?;
    Ok(Address::from_slice(address_bytes))
}

/// Whether `s` lies in the lower half of the curve order.
pub fn is_low_s(signature: &PrimitiveSignature) -> bool {
    signature.s() <= SECP256K1N_HALF
}

fn secp() -> &'static Secp256k1<All> {
    static SECP: OnceLock<Secp256k1<All>> = OnceLock::new();
    SECP.get_or_init(Secp256k1::new)
}
