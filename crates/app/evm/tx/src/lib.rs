//! Ethereum transaction pipeline for the Evolve EVM module.
//!
//! Builds, signs and decodes the three supported transaction variants and
//! converts them into native execution messages under the fork rules of the
//! chain.
//!
//! # Transaction Types
//!
//! - **Legacy (0x00)**: optionally with EIP-155 replay protection
//! - **EIP-2930 (0x01)**: access list transactions, from Berlin
//! - **EIP-1559 (0x02)**: fee market transactions, from London
//!
//! # Usage
//!
//! ```text
//! use evolve_evm_tx::{InMemoryKeyring, SigningScheme, TxBuilder, TxVariant};
//!
//! let mut keyring = InMemoryKeyring::new();
//! let sender = keyring.generate();
//!
//! let builder = TxBuilder::new(9000);
//! let scheme = SigningScheme::latest(9000);
//! let variant = TxVariant::dynamic_fee_template(0);
//! let tx = builder.build_signed(variant, 0, &keyring, sender, &scheme)?;
//!
//! let converter = MessageConverter::new(&chain_config, 9000);
//! let msg = converter.to_message(&tx, height, Some(base_fee), None)?;
//! executor.apply_native_message(&msg)?;
//! ```

pub mod builder;
pub mod envelope;
pub mod error;
pub mod ethereum;
pub mod executor;
pub mod message;
pub mod scheme;
pub mod signer;
pub mod traits;
pub mod variant;

pub use builder::{TxBuilder, UnsignedTx};
pub use envelope::{tx_type, SignedTransaction};
pub use error::TxError;
pub use ethereum::{SignedEip1559Tx, SignedEip2930Tx, SignedLegacyTx};
pub use executor::{ExecutionResult, Executor};
pub use message::{effective_gas_price, MessageConverter, NativeMessage, SenderOverride};
pub use scheme::SigningScheme;
pub use signer::{address_of, InMemoryKeyring, Signer};
pub use traits::TypedTransaction;
pub use variant::TxVariant;
