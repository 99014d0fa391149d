//! ERC-777 advanced fungible token wrapper: operator management plus
//! the `send`/`burn` flavored transfers.

use std::sync::Arc;

use chainmux_abi::AbiInterface;
use chainmux_contract::ContractBinding;
use chainmux_core::AbiValue;
use chainmux_rpc::{CallError, RpcTransport, Signer};

use crate::{abis, convert};

/// An ERC-777 token contract.
#[derive(Clone)]
pub struct Erc777 {
    binding: ContractBinding,
}

impl Erc777 {
    pub fn new(address: impl Into<String>, transport: Arc<dyn RpcTransport>) -> Self {
        let abi = AbiInterface::from_json(abis::ERC777).expect("bundled ERC-777 ABI is valid");
        Self {
            binding: ContractBinding::new(address, abi, transport),
        }
    }

    /// Attach a signer for write operations.
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.binding = self.binding.with_signer(signer);
        self
    }

    pub fn address(&self) -> &str {
        self.binding.address()
    }

    pub fn binding(&self) -> &ContractBinding {
        &self.binding
    }

    pub async fn name(&self) -> Result<String, CallError> {
        convert::as_string(self.binding.call("name", vec![]).await?)
    }

    pub async fn symbol(&self) -> Result<String, CallError> {
        convert::as_string(self.binding.call("symbol", vec![]).await?)
    }

    /// The smallest indivisible unit of the token.
    pub async fn granularity(&self) -> Result<String, CallError> {
        convert::as_decimal(self.binding.call("granularity", vec![]).await?)
    }

    pub async fn total_supply(&self) -> Result<String, CallError> {
        convert::as_decimal(self.binding.call("totalSupply", vec![]).await?)
    }

    pub async fn balance_of(&self, owner: &str) -> Result<String, CallError> {
        convert::as_decimal(
            self.binding
                .call("balanceOf", vec![AbiValue::Address(owner.into())])
                .await?,
        )
    }

    pub async fn default_operators(&self) -> Result<Vec<String>, CallError> {
        convert::as_address_array(self.binding.call("defaultOperators", vec![]).await?)
    }

    pub async fn is_operator_for(&self, operator: &str, holder: &str) -> Result<bool, CallError> {
        convert::as_bool(
            self.binding
                .call(
                    "isOperatorFor",
                    vec![
                        AbiValue::Address(operator.into()),
                        AbiValue::Address(holder.into()),
                    ],
                )
                .await?,
        )
    }

    pub async fn authorize_operator(&self, operator: &str) -> Result<String, CallError> {
        self.binding
            .send("authorizeOperator", vec![AbiValue::Address(operator.into())])
            .await
    }

    pub async fn revoke_operator(&self, operator: &str) -> Result<String, CallError> {
        self.binding
            .send("revokeOperator", vec![AbiValue::Address(operator.into())])
            .await
    }

    /// ERC-777 `send`: transfer with attached data, notifying hooks.
    pub async fn send(&self, to: &str, amount: &str, data: &[u8]) -> Result<String, CallError> {
        self.binding
            .send(
                "send",
                vec![
                    AbiValue::Address(to.into()),
                    convert::amount(amount),
                    AbiValue::Bytes(data.to_vec()),
                ],
            )
            .await
    }

    pub async fn burn(&self, amount: &str, data: &[u8]) -> Result<String, CallError> {
        self.binding
            .send(
                "burn",
                vec![convert::amount(amount), AbiValue::Bytes(data.to_vec())],
            )
            .await
    }
}
