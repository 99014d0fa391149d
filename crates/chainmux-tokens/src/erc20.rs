//! ERC-20 fungible token wrapper.

use std::sync::Arc;

use chainmux_abi::AbiInterface;
use chainmux_contract::ContractBinding;
use chainmux_core::AbiValue;
use chainmux_multicall::Multicall;
use chainmux_rpc::{CallError, RpcTransport, Signer};
use serde::{Deserialize, Serialize};

use crate::{abis, bulk, convert};

/// Name, symbol, decimals, and supply in one aggregate round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSummary {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: String,
}

/// An ERC-20 token contract.
///
/// Bulk operations prefer the aggregation engine when one is bound and
/// fall back to concurrent per-call reads otherwise. Amounts ride as
/// decimal strings so uint256 balances never truncate.
#[derive(Clone)]
pub struct Erc20 {
    binding: ContractBinding,
    multicall: Option<Multicall>,
}

impl Erc20 {
    pub fn new(address: impl Into<String>, transport: Arc<dyn RpcTransport>) -> Self {
        let abi = AbiInterface::from_json(abis::ERC20).expect("bundled ERC-20 ABI is valid");
        Self {
            binding: ContractBinding::new(address, abi, transport),
            multicall: None,
        }
    }

    /// Route bulk operations through an aggregation engine.
    pub fn with_multicall(mut self, multicall: Multicall) -> Self {
        self.multicall = Some(multicall);
        self
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

    pub async fn decimals(&self) -> Result<u8, CallError> {
        convert::as_u8(self.binding.call("decimals", vec![]).await?)
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

    pub async fn allowance(&self, owner: &str, spender: &str) -> Result<String, CallError> {
        convert::as_decimal(
            self.binding
                .call(
                    "allowance",
                    vec![
                        AbiValue::Address(owner.into()),
                        AbiValue::Address(spender.into()),
                    ],
                )
                .await?,
        )
    }

    /// Transfer `amount` (decimal string) to `to`; returns the tx hash.
    pub async fn transfer(&self, to: &str, amount: &str) -> Result<String, CallError> {
        self.binding
            .send(
                "transfer",
                vec![AbiValue::Address(to.into()), convert::amount(amount)],
            )
            .await
    }

    pub async fn approve(&self, spender: &str, amount: &str) -> Result<String, CallError> {
        self.binding
            .send(
                "approve",
                vec![AbiValue::Address(spender.into()), convert::amount(amount)],
            )
            .await
    }

    pub async fn transfer_from(
        &self,
        from: &str,
        to: &str,
        amount: &str,
    ) -> Result<String, CallError> {
        self.binding
            .send(
                "transferFrom",
                vec![
                    AbiValue::Address(from.into()),
                    AbiValue::Address(to.into()),
                    convert::amount(amount),
                ],
            )
            .await
    }

    /// Balances for many owners, index-aligned with the input.
    pub async fn balances_of(&self, owners: &[&str]) -> Result<Vec<(String, String)>, CallError> {
        let mut calls = Vec::with_capacity(owners.len());
        for owner in owners {
            calls.push(
                self.binding
                    .prepare("balanceOf", vec![AbiValue::Address((*owner).into())])?,
            );
        }
        let values = bulk::run_calls(&self.binding, self.multicall.as_ref(), calls).await?;
        owners
            .iter()
            .zip(values)
            .map(|(owner, value)| Ok(((*owner).to_string(), convert::as_decimal(value)?)))
            .collect()
    }

    /// Name, symbol, decimals, and total supply in one round trip when
    /// an aggregator is bound.
    pub async fn summary(&self) -> Result<TokenSummary, CallError> {
        let calls = vec![
            self.binding.prepare("name", vec![])?,
            self.binding.prepare("symbol", vec![])?,
            self.binding.prepare("decimals", vec![])?,
            self.binding.prepare("totalSupply", vec![])?,
        ];
        let mut values = bulk::run_calls(&self.binding, self.multicall.as_ref(), calls)
            .await?
            .into_iter();

        // Pops in call order; run_calls guarantees length == 4
        let take = |iter: &mut std::vec::IntoIter<AbiValue>| {
            iter.next().ok_or(chainmux_core::error::DecodeError::OutputArity {
                expected: 4,
                got: 0,
            })
        };
        Ok(TokenSummary {
            name: convert::as_string(take(&mut values)?)?,
            symbol: convert::as_string(take(&mut values)?)?,
            decimals: convert::as_u8(take(&mut values)?)?,
            total_supply: convert::as_decimal(take(&mut values)?)?,
        })
    }
}
