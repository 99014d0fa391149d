//! Wrapper behaviour against a scripted mock chain: a transport that
//! answers token reads directly and dispatches aggregate submissions to
//! the same per-call logic, so both fan-out policies are exercised.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chainmux_abi::codec;
use chainmux_core::AbiValue;
use chainmux_multicall::{Multicall, MULTICALL3_ADDRESS};
use chainmux_rpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcTransport, TransportError};
use chainmux_tokens::{Erc1155, Erc20, Erc721, OwnerBalance};
use serde_json::json;

const TOKEN: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
const OWNER_A: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";
const OWNER_B: &str = "0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B";

/// Highest token id the mock ERC-1155 answers `uri` for.
const MINTED_MAX_ID: u128 = 3;

fn encode_return(signature: &str, values: &[AbiValue]) -> Vec<u8> {
    codec::encode_call(signature, values).unwrap()[4..].to_vec()
}

/// Scripted node answering a fictional token contract. `eth_calls`
/// counts wire submissions (aggregate counts as one).
#[derive(Default)]
struct MockChain {
    eth_calls: AtomicUsize,
}

impl MockChain {
    /// Answer one contract call. `Err` means revert.
    fn answer(&self, data: &[u8]) -> Result<Vec<u8>, String> {
        let selector: [u8; 4] = data[..4].try_into().unwrap();
        let args = |types: &[&str]| {
            let types: Vec<String> = types.iter().map(|t| t.to_string()).collect();
            codec::decode_outputs(&types, &data[4..]).unwrap()
        };

        if selector == codec::selector("name()") {
            Ok(encode_return("r(string)", &[AbiValue::Str("Mux Token".into())]))
        } else if selector == codec::selector("symbol()") {
            Ok(encode_return("r(string)", &[AbiValue::Str("MUX".into())]))
        } else if selector == codec::selector("decimals()") {
            Ok(encode_return("r(uint8)", &[AbiValue::Uint(18)]))
        } else if selector == codec::selector("totalSupply()") {
            Ok(encode_return("r(uint256)", &[AbiValue::Uint(1_000_000)]))
        } else if selector == codec::selector("balanceOf(address)") {
            // Balance is the owner's last address byte
            let owner = match &args(&["address"])[0] {
                AbiValue::Address(a) => a.clone(),
                other => panic!("unexpected arg {other:?}"),
            };
            let last = u128::from_str_radix(&owner[owner.len() - 2..], 16).unwrap();
            Ok(encode_return("r(uint256)", &[AbiValue::Uint(last)]))
        } else if selector == codec::selector("balanceOfBatch(address[],uint256[])") {
            let decoded = args(&["address[]", "uint256[]"]);
            let count = match &decoded[0] {
                AbiValue::Array(owners) => owners.len(),
                other => panic!("unexpected arg {other:?}"),
            };
            // Positional: 5, 7, 9, ...
            let balances: Vec<AbiValue> = (0..count)
                .map(|i| AbiValue::Uint(5 + 2 * i as u128))
                .collect();
            Ok(encode_return("r(uint256[])", &[AbiValue::Array(balances)]))
        } else if selector == codec::selector("tokenOfOwnerByIndex(address,uint256)") {
            let index = args(&["address", "uint256"])[1].as_u128().unwrap();
            Ok(encode_return("r(uint256)", &[AbiValue::Uint(10 + index)]))
        } else if selector == codec::selector("uri(uint256)") {
            let id = args(&["uint256"])[0].as_u128().unwrap();
            if id <= MINTED_MAX_ID {
                Ok(encode_return(
                    "r(string)",
                    &[AbiValue::Str(format!("https://example.com/{id}.json"))],
                ))
            } else {
                Err("execution reverted: nonexistent token".into())
            }
        } else {
            Err(format!("execution reverted: unknown selector 0x{}", hex::encode(selector)))
        }
    }
}

#[async_trait]
impl RpcTransport for MockChain {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        assert_eq!(req.method, "eth_call");
        self.eth_calls.fetch_add(1, Ordering::SeqCst);

        let to = req.params[0]["to"].as_str().unwrap().to_string();
        let data =
            hex::decode(req.params[0]["data"].as_str().unwrap().trim_start_matches("0x")).unwrap();

        let result = if to.eq_ignore_ascii_case(MULTICALL3_ADDRESS) {
            // Dispatch each inner call, then wrap as (blockNumber, bytes[])
            let decoded =
                codec::decode_outputs(&["(address,bytes)[]".into()], &data[4..]).unwrap();
            let entries = match &decoded[0] {
                AbiValue::Array(items) => items.clone(),
                other => panic!("unexpected aggregate payload: {other:?}"),
            };
            let mut returned = Vec::with_capacity(entries.len());
            for entry in entries {
                let inner = match entry {
                    AbiValue::Tuple(fields) => match &fields[1] {
                        AbiValue::Bytes(b) => b.clone(),
                        other => panic!("unexpected calldata {other:?}"),
                    },
                    other => panic!("unexpected entry {other:?}"),
                };
                match self.answer(&inner) {
                    Ok(bytes) => returned.push(AbiValue::Bytes(bytes)),
                    // Multicall3 aggregate reverts the whole batch
                    Err(reason) => {
                        return Ok(revert_response(req.id, &reason));
                    }
                }
            }
            encode_return(
                "r(uint256,bytes[])",
                &[AbiValue::Uint(19_000_000), AbiValue::Array(returned)],
            )
        } else {
            match self.answer(&data) {
                Ok(bytes) => bytes,
                Err(reason) => return Ok(revert_response(req.id, &reason)),
            }
        };

        Ok(JsonRpcResponse::success(
            req.id,
            json!(format!("0x{}", hex::encode(result))),
        ))
    }

    fn url(&self) -> &str {
        "mock-chain"
    }
}

fn revert_response(id: chainmux_rpc::RpcId, reason: &str) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: "2.0".into(),
        id,
        result: None,
        error: Some(JsonRpcError {
            code: 3,
            message: reason.into(),
            data: None,
        }),
    }
}

fn multicall(transport: Arc<MockChain>) -> Multicall {
    Multicall::for_chain(transport, 1).unwrap()
}

#[tokio::test]
async fn erc1155_batch_balances_map_positionally() {
    let transport = Arc::new(MockChain::default());
    let token = Erc1155::new(TOKEN, transport);

    let result = token
        .balance_of_batch(&[OWNER_A, OWNER_B], &["1", "1"])
        .await
        .unwrap();

    assert_eq!(
        result,
        vec![
            OwnerBalance {
                owner: OWNER_A.into(),
                token_id: "1".into(),
                balance: "5".into(),
            },
            OwnerBalance {
                owner: OWNER_B.into(),
                token_id: "1".into(),
                balance: "7".into(),
            },
        ]
    );
}

#[tokio::test]
async fn erc1155_batch_rejects_mismatched_lengths() {
    let transport = Arc::new(MockChain::default());
    let token = Erc1155::new(TOKEN, transport.clone());

    let err = token
        .balance_of_batch(&[OWNER_A, OWNER_B], &["1"])
        .await
        .unwrap_err();
    assert!(matches!(err, chainmux_rpc::CallError::Encode(_)));
    assert_eq!(transport.eth_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn erc1155_max_id_probe_is_monotone_and_cached() {
    let transport = Arc::new(MockChain::default());
    let token = Erc1155::new(TOKEN, transport.clone());

    let first = token.max_token_id().await.unwrap();
    assert_eq!(first, MINTED_MAX_ID as u64);
    // ids 1..=3 answered plus the failing probe at 4
    assert_eq!(transport.eth_calls.load(Ordering::SeqCst), 4);

    let second = token.max_token_id().await.unwrap();
    assert!(second >= first);
    // Cached floor: only the probe at 4 goes out again
    assert_eq!(transport.eth_calls.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn erc20_bulk_balances_prefer_the_aggregator() {
    let transport = Arc::new(MockChain::default());
    let token = Erc20::new(TOKEN, transport.clone()).with_multicall(multicall(transport.clone()));

    let balances = token.balances_of(&[OWNER_A, OWNER_B]).await.unwrap();

    // One aggregate submission for both owners
    assert_eq!(transport.eth_calls.load(Ordering::SeqCst), 1);
    assert_eq!(balances.len(), 2);
    assert_eq!(balances[0].0, OWNER_A);
    assert_eq!(balances[0].1, 0x45.to_string());
    assert_eq!(balances[1].0, OWNER_B);
    assert_eq!(balances[1].1, 0x9B.to_string());
}

#[tokio::test]
async fn erc20_bulk_balances_fall_back_to_concurrent_reads() {
    let transport = Arc::new(MockChain::default());
    let token = Erc20::new(TOKEN, transport.clone());

    let balances = token.balances_of(&[OWNER_A, OWNER_B]).await.unwrap();

    // No aggregator: one submission per owner
    assert_eq!(transport.eth_calls.load(Ordering::SeqCst), 2);
    assert_eq!(balances[0].1, 0x45.to_string());
    assert_eq!(balances[1].1, 0x9B.to_string());
}

#[tokio::test]
async fn erc20_summary_is_one_aggregate_round() {
    let transport = Arc::new(MockChain::default());
    let token = Erc20::new(TOKEN, transport.clone()).with_multicall(multicall(transport.clone()));

    let summary = token.summary().await.unwrap();
    assert_eq!(transport.eth_calls.load(Ordering::SeqCst), 1);
    assert_eq!(summary.name, "Mux Token");
    assert_eq!(summary.symbol, "MUX");
    assert_eq!(summary.decimals, 18);
    assert_eq!(summary.total_supply, "1000000");
}

#[tokio::test]
async fn erc721_enumeration_fans_out_over_the_aggregator() {
    let transport = Arc::new(MockChain::default());
    let token = Erc721::new(TOKEN, transport.clone()).with_multicall(multicall(transport.clone()));

    // Last address byte 0x03 → the mock reports a balance of 3
    let owner = "0x0000000000000000000000000000000000000003";
    let ids = token.tokens_of_owner(owner).await.unwrap();

    assert_eq!(ids, vec!["10", "11", "12"]);
    // One direct balanceOf plus one aggregate round for the indices
    assert_eq!(transport.eth_calls.load(Ordering::SeqCst), 2);
}
