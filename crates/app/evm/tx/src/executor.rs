//! Execution collaborator consumed by the pipeline.

use alloy_primitives::Address;

use crate::envelope::SignedTransaction;
use crate::message::NativeMessage;

/// Outcome of applying a transaction or message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    pub gas_used: u64,
    /// Revert or VM error message, if execution failed.
    pub vm_error: Option<String>,
}

impl ExecutionResult {
    pub fn success(gas_used: u64) -> Self {
        Self {
            gas_used,
            vm_error: None,
        }
    }

    pub fn failed(&self) -> bool {
        self.vm_error.is_some()
    }
}

/// State machine that executes transactions, provided by the host chain.
pub trait Executor {
    type Error: std::error::Error;

    /// Next expected nonce of `address`.
    fn nonce(&self, address: Address) -> Result<u64, Self::Error>;

    fn apply_transaction(&mut self, tx: &SignedTransaction) -> Result<ExecutionResult, Self::Error>;

    fn apply_native_message(&mut self, msg: &NativeMessage)
        -> Result<ExecutionResult, Self::Error>;
}
