//! `CallBuilder` — accumulates validated calls against one contract
//! for submission to the aggregation engine.

use chainmux_core::{error::EncodeError, AbiValue, Call};

use crate::binding::ContractBinding;

/// Accumulates named calls with parameters, validated on push.
///
/// The builder never touches the network: [`CallBuilder::into_calls`]
/// yields the batch for the aggregation engine, which owns submission.
pub struct CallBuilder<'a> {
    binding: &'a ContractBinding,
    calls: Vec<Call>,
}

impl<'a> CallBuilder<'a> {
    pub(crate) fn new(binding: &'a ContractBinding) -> Self {
        Self {
            binding,
            calls: Vec::new(),
        }
    }

    /// Queue a call to `function` with `args`.
    ///
    /// Unknown functions and arity mismatches surface here, before
    /// anything is queued.
    pub fn push(&mut self, function: &str, args: Vec<AbiValue>) -> Result<&mut Self, EncodeError> {
        let call = self
            .binding
            .abi()
            .call(self.binding.address(), function, args)?;
        self.calls.push(call);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Consume the builder, yielding the accumulated batch in push
    /// order.
    pub fn into_calls(self) -> Vec<Call> {
        self.calls
    }
}
