//! ERC-721 non-fungible token wrapper: ownership enumeration and
//! metadata retrieval on top of the standard reads and writes.

use std::sync::Arc;

use chainmux_abi::AbiInterface;
use chainmux_contract::ContractBinding;
use chainmux_core::AbiValue;
use chainmux_multicall::Multicall;
use chainmux_rpc::{CallError, RpcTransport, Signer};
use futures::future::try_join_all;
use tracing::debug;

use crate::metadata::{MetadataFetcher, TokenMetadata};
use crate::{abis, bulk, convert, TokenError};

/// An ERC-721 token contract.
#[derive(Clone)]
pub struct Erc721 {
    binding: ContractBinding,
    multicall: Option<Multicall>,
    fetcher: MetadataFetcher,
}

impl Erc721 {
    pub fn new(address: impl Into<String>, transport: Arc<dyn RpcTransport>) -> Self {
        let abi = AbiInterface::from_json(abis::ERC721).expect("bundled ERC-721 ABI is valid");
        Self {
            binding: ContractBinding::new(address, abi, transport),
            multicall: None,
            fetcher: MetadataFetcher::new(),
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

    /// Use a custom metadata fetcher (e.g. a different IPFS gateway).
    pub fn with_fetcher(mut self, fetcher: MetadataFetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn address(&self) -> &str {
        self.binding.address()
    }

    pub fn binding(&self) -> &ContractBinding {
        &self.binding
    }

    pub async fn balance_of(&self, owner: &str) -> Result<u64, CallError> {
        convert::as_u64(
            self.binding
                .call("balanceOf", vec![AbiValue::Address(owner.into())])
                .await?,
        )
    }

    pub async fn owner_of(&self, token_id: &str) -> Result<String, CallError> {
        convert::as_address(
            self.binding
                .call("ownerOf", vec![convert::amount(token_id)])
                .await?,
        )
    }

    pub async fn token_of_owner_by_index(
        &self,
        owner: &str,
        index: u64,
    ) -> Result<String, CallError> {
        convert::as_decimal(
            self.binding
                .call(
                    "tokenOfOwnerByIndex",
                    vec![
                        AbiValue::Address(owner.into()),
                        AbiValue::Uint(index as u128),
                    ],
                )
                .await?,
        )
    }

    pub async fn token_uri(&self, token_id: &str) -> Result<String, CallError> {
        convert::as_string(
            self.binding
                .call("tokenURI", vec![convert::amount(token_id)])
                .await?,
        )
    }

    pub async fn is_approved_for_all(
        &self,
        owner: &str,
        operator: &str,
    ) -> Result<bool, CallError> {
        convert::as_bool(
            self.binding
                .call(
                    "isApprovedForAll",
                    vec![
                        AbiValue::Address(owner.into()),
                        AbiValue::Address(operator.into()),
                    ],
                )
                .await?,
        )
    }

    pub async fn transfer_from(
        &self,
        from: &str,
        to: &str,
        token_id: &str,
    ) -> Result<String, CallError> {
        self.binding
            .send(
                "transferFrom",
                vec![
                    AbiValue::Address(from.into()),
                    AbiValue::Address(to.into()),
                    convert::amount(token_id),
                ],
            )
            .await
    }

    pub async fn approve(&self, to: &str, token_id: &str) -> Result<String, CallError> {
        self.binding
            .send(
                "approve",
                vec![AbiValue::Address(to.into()), convert::amount(token_id)],
            )
            .await
    }

    pub async fn set_approval_for_all(
        &self,
        operator: &str,
        approved: bool,
    ) -> Result<String, CallError> {
        self.binding
            .send(
                "setApprovalForAll",
                vec![AbiValue::Address(operator.into()), AbiValue::Bool(approved)],
            )
            .await
    }

    /// All token ids held by `owner`, via the enumeration extension.
    ///
    /// One `balanceOf` read, then a fan-out of `tokenOfOwnerByIndex`
    /// calls — batched when an aggregator is bound.
    pub async fn tokens_of_owner(&self, owner: &str) -> Result<Vec<String>, CallError> {
        let count = self.balance_of(owner).await?;
        debug!(owner, count, "enumerating owned tokens");
        if count == 0 {
            return Ok(Vec::new());
        }

        let mut calls = Vec::with_capacity(count as usize);
        for index in 0..count {
            calls.push(self.binding.prepare(
                "tokenOfOwnerByIndex",
                vec![
                    AbiValue::Address(owner.into()),
                    AbiValue::Uint(index as u128),
                ],
            )?);
        }
        let values = bulk::run_calls(&self.binding, self.multicall.as_ref(), calls).await?;
        values.into_iter().map(convert::as_decimal).collect()
    }

    /// Fetch and normalize the metadata document for one token.
    pub async fn metadata(&self, token_id: &str) -> Result<TokenMetadata, TokenError> {
        let uri = self.token_uri(token_id).await?;
        Ok(self.fetcher.fetch(self.address(), token_id, &uri).await?)
    }

    /// Metadata for every token `owner` holds, sorted ascending by
    /// numeric token id.
    pub async fn owned_metadata(&self, owner: &str) -> Result<Vec<TokenMetadata>, TokenError> {
        let ids = self.tokens_of_owner(owner).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut calls = Vec::with_capacity(ids.len());
        for id in &ids {
            calls.push(self.binding.prepare("tokenURI", vec![convert::amount(id)])?);
        }
        let uris = bulk::run_calls(&self.binding, self.multicall.as_ref(), calls).await?;

        let mut items = try_join_all(ids.iter().zip(uris).map(|(id, uri)| async move {
            let uri = convert::as_string(uri)?;
            Ok::<_, TokenError>(self.fetcher.fetch(self.address(), id, &uri).await?)
        }))
        .await?;

        items.sort_by(|a, b| {
            convert::decimal_key(&a.token_id).cmp(&convert::decimal_key(&b.token_id))
        });
        Ok(items)
    }
}
