//! ERC-1155 multi-token wrapper: positional batch balances, URI
//! resolution with `{id}` substitution, and the heuristic maximum-id
//! probe.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chainmux_abi::AbiInterface;
use chainmux_contract::ContractBinding;
use chainmux_core::{error::EncodeError, AbiValue};
use chainmux_multicall::Multicall;
use chainmux_rpc::{CallError, RpcTransport, Signer};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::metadata::{substitute_id, MetadataFetcher, TokenMetadata};
use crate::{abis, bulk, convert, TokenError};

/// One entry of a batch balance query, mapped positionally: entry `i`
/// belongs to `(owners[i], ids[i])`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerBalance {
    pub owner: String,
    pub token_id: String,
    pub balance: String,
}

/// An ERC-1155 multi-token contract.
#[derive(Clone)]
pub struct Erc1155 {
    binding: ContractBinding,
    multicall: Option<Multicall>,
    fetcher: MetadataFetcher,
    /// Highest token id the max-id probe has confirmed. Monotonically
    /// non-decreasing; shared across clones of this wrapper.
    max_id_floor: Arc<AtomicU64>,
}

impl Erc1155 {
    pub fn new(address: impl Into<String>, transport: Arc<dyn RpcTransport>) -> Self {
        let abi = AbiInterface::from_json(abis::ERC1155).expect("bundled ERC-1155 ABI is valid");
        Self {
            binding: ContractBinding::new(address, abi, transport),
            multicall: None,
            fetcher: MetadataFetcher::new(),
            max_id_floor: Arc::new(AtomicU64::new(0)),
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

    pub async fn balance_of(&self, owner: &str, token_id: &str) -> Result<String, CallError> {
        convert::as_decimal(
            self.binding
                .call(
                    "balanceOf",
                    vec![AbiValue::Address(owner.into()), convert::amount(token_id)],
                )
                .await?,
        )
    }

    /// Batch balances, mapped positionally — result `i` belongs to
    /// `(owners[i], ids[i])`. One contract call regardless of size.
    pub async fn balance_of_batch(
        &self,
        owners: &[&str],
        ids: &[&str],
    ) -> Result<Vec<OwnerBalance>, CallError> {
        if owners.len() != ids.len() {
            return Err(EncodeError::ArityMismatch {
                expected: owners.len(),
                got: ids.len(),
            }
            .into());
        }

        let value = self
            .binding
            .call(
                "balanceOfBatch",
                vec![
                    AbiValue::Array(
                        owners
                            .iter()
                            .map(|o| AbiValue::Address((*o).into()))
                            .collect(),
                    ),
                    AbiValue::Array(ids.iter().map(|id| convert::amount(id)).collect()),
                ],
            )
            .await?;

        let balances = convert::as_decimal_array(value)?;
        Ok(owners
            .iter()
            .zip(ids.iter())
            .zip(balances)
            .map(|((owner, id), balance)| OwnerBalance {
                owner: (*owner).to_string(),
                token_id: (*id).to_string(),
                balance,
            })
            .collect())
    }

    /// The raw metadata URI for a token id, `{id}` placeholder intact.
    pub async fn uri(&self, token_id: &str) -> Result<String, CallError> {
        convert::as_string(
            self.binding
                .call("uri", vec![convert::amount(token_id)])
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

    pub async fn safe_transfer_from(
        &self,
        from: &str,
        to: &str,
        token_id: &str,
        amount: &str,
        data: &[u8],
    ) -> Result<String, CallError> {
        self.binding
            .send(
                "safeTransferFrom",
                vec![
                    AbiValue::Address(from.into()),
                    AbiValue::Address(to.into()),
                    convert::amount(token_id),
                    convert::amount(amount),
                    AbiValue::Bytes(data.to_vec()),
                ],
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

    /// Heuristic maximum token id: probe ascending ids with `uri(id)`
    /// until the first revert, starting just past the cached floor.
    ///
    /// Best-effort by design — the cached bound never decreases, the
    /// first call is slow (one read per id), and ids gapped by burns
    /// are not detected. Contracts that answer `uri` for any id defeat
    /// the probe; impose an external bound for those.
    pub async fn max_token_id(&self) -> Result<u64, CallError> {
        let mut highest = self.max_id_floor.load(Ordering::SeqCst);
        let mut next = highest + 1;

        loop {
            match self.uri(&next.to_string()).await {
                Ok(_) => {
                    highest = next;
                    next += 1;
                }
                Err(e) if e.is_revert() => break,
                Err(e) => return Err(e),
            }
        }

        debug!(contract = %self.address(), highest, "max-id probe settled");
        self.max_id_floor.fetch_max(highest, Ordering::SeqCst);
        Ok(self.max_id_floor.load(Ordering::SeqCst))
    }

    /// Metadata for token ids `1..=max`, sorted ascending by numeric
    /// token id. `{id}` placeholders in URIs are substituted before the
    /// fetch.
    pub async fn collection_metadata(&self, max: u64) -> Result<Vec<TokenMetadata>, TokenError> {
        if max == 0 {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = (1..=max).map(|id| id.to_string()).collect();
        let mut calls = Vec::with_capacity(ids.len());
        for id in &ids {
            calls.push(self.binding.prepare("uri", vec![convert::amount(id)])?);
        }
        let uris = bulk::run_calls(&self.binding, self.multicall.as_ref(), calls).await?;

        let mut items = try_join_all(ids.iter().zip(uris).map(|(id, uri)| async move {
            let uri = substitute_id(&convert::as_string(uri)?, id);
            Ok::<_, TokenError>(self.fetcher.fetch(self.address(), id, &uri).await?)
        }))
        .await?;

        items.sort_by(|a, b| {
            convert::decimal_key(&a.token_id).cmp(&convert::decimal_key(&b.token_id))
        });
        Ok(items)
    }
}
