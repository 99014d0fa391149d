//! Integration tests for the aggregation engine, driven by a mock
//! transport that decodes each aggregate submission and answers every
//! inner call with a globally increasing counter value. Result ordering
//! bugs and chunking bugs both show up as wrong counter values.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chainmux_abi::codec;
use chainmux_core::{AbiValue, Call};
use chainmux_multicall::Multicall;
use chainmux_rpc::{
    CallError, JsonRpcRequest, JsonRpcResponse, RpcTransport, TransportError,
};
use serde_json::json;

const TOKEN: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
const OWNER: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

/// ABI-encode return values (no selector).
fn encode_return(signature: &str, values: &[AbiValue]) -> Vec<u8> {
    codec::encode_call(signature, values).unwrap()[4..].to_vec()
}

/// Mock aggregator node: counts `eth_call` submissions and returns one
/// 32-byte word per inner call, numbered in arrival order.
#[derive(Default)]
struct MockAggregator {
    submissions: AtomicUsize,
    counter: AtomicU64,
}

#[async_trait]
impl RpcTransport for MockAggregator {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        assert_eq!(req.method, "eth_call");
        self.submissions.fetch_add(1, Ordering::SeqCst);

        let data_hex = req.params[0]["data"].as_str().expect("calldata present");
        let calldata = hex::decode(data_hex.trim_start_matches("0x")).unwrap();

        // Strip the aggregate selector and pull out the inner call list.
        let decoded =
            codec::decode_outputs(&["(address,bytes)[]".into()], &calldata[4..]).unwrap();
        let inner = match &decoded[0] {
            AbiValue::Array(items) => items.len(),
            other => panic!("unexpected aggregate payload: {other:?}"),
        };

        let returned: Vec<AbiValue> = (0..inner)
            .map(|_| {
                let n = self.counter.fetch_add(1, Ordering::SeqCst);
                let mut word = [0u8; 32];
                word[24..].copy_from_slice(&n.to_be_bytes());
                AbiValue::Bytes(word.to_vec())
            })
            .collect();

        let payload = encode_return(
            "r(uint256,bytes[])",
            &[AbiValue::Uint(19_000_000), AbiValue::Array(returned)],
        );
        Ok(JsonRpcResponse::success(
            req.id,
            json!(format!("0x{}", hex::encode(payload))),
        ))
    }

    fn url(&self) -> &str {
        "mock-aggregator"
    }
}

fn balance_call() -> Call {
    Call::new(
        TOKEN,
        "balanceOf(address)",
        vec![AbiValue::Address(OWNER.into())],
        vec!["uint256".into()],
    )
}

#[tokio::test]
async fn results_preserve_call_order_across_chunks() {
    let transport = Arc::new(MockAggregator::default());
    let mc = Multicall::for_chain(transport.clone(), 1)
        .unwrap()
        .with_batch_size(3);

    let calls: Vec<Call> = (0..7).map(|_| balance_call()).collect();
    let results = mc.run(calls).await.unwrap();

    // 7 calls at batch size 3 → ceil(7/3) = 3 submissions
    assert_eq!(transport.submissions.load(Ordering::SeqCst), 3);
    assert_eq!(results.len(), 7);
    for (i, value) in results.iter().enumerate() {
        assert_eq!(value, &AbiValue::Uint(i as u128));
    }
}

#[tokio::test]
async fn exact_batch_size_is_one_submission() {
    let transport = Arc::new(MockAggregator::default());
    let mc = Multicall::for_chain(transport.clone(), 1)
        .unwrap()
        .with_batch_size(5);

    let results = mc.run((0..5).map(|_| balance_call()).collect()).await.unwrap();
    assert_eq!(results.len(), 5);
    assert_eq!(transport.submissions.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn one_over_batch_size_is_two_submissions() {
    let transport = Arc::new(MockAggregator::default());
    let mc = Multicall::for_chain(transport.clone(), 1)
        .unwrap()
        .with_batch_size(5);

    let results = mc.run((0..6).map(|_| balance_call()).collect()).await.unwrap();
    assert_eq!(results.len(), 6);
    assert_eq!(transport.submissions.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn empty_batch_makes_no_submissions() {
    let transport = Arc::new(MockAggregator::default());
    let mc = Multicall::for_chain(transport.clone(), 1).unwrap();

    let results = mc.run(vec![]).await.unwrap();
    assert!(results.is_empty());
    assert_eq!(transport.submissions.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_chain_fails_before_any_network_io() {
    let transport = Arc::new(MockAggregator::default());
    let err = match Multicall::for_chain(transport.clone(), 424242) {
        Err(err) => err,
        Ok(_) => panic!("expected ConfigError::UnknownMulticallAddress"),
    };
    assert!(matches!(
        err,
        chainmux_core::error::ConfigError::UnknownMulticallAddress { chain_id: 424242 }
    ));
    assert_eq!(transport.submissions.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn bad_call_aborts_batch_before_any_submission() {
    let transport = Arc::new(MockAggregator::default());
    let mc = Multicall::for_chain(transport.clone(), 1).unwrap();

    // Second call has a bool where an address belongs
    let calls = vec![
        balance_call(),
        Call::new(
            TOKEN,
            "balanceOf(address)",
            vec![AbiValue::Bool(true)],
            vec!["uint256".into()],
        ),
    ];

    let err = mc.run(calls).await.unwrap_err();
    assert!(matches!(err, CallError::Encode(_)));
    assert_eq!(transport.submissions.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn multi_output_call_stays_a_tuple() {
    // A transport answering a two-word return for a two-output call
    struct TwoOutputs;
    #[async_trait]
    impl RpcTransport for TwoOutputs {
        async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
            let inner_return = encode_return(
                "r(uint256,bool)",
                &[AbiValue::Uint(9), AbiValue::Bool(true)],
            );
            let payload = encode_return(
                "r(uint256,bytes[])",
                &[
                    AbiValue::Uint(1),
                    AbiValue::Array(vec![AbiValue::Bytes(inner_return)]),
                ],
            );
            Ok(JsonRpcResponse::success(
                req.id,
                json!(format!("0x{}", hex::encode(payload))),
            ))
        }
        fn url(&self) -> &str {
            "two-outputs"
        }
    }

    let mc = Multicall::new(Arc::new(TwoOutputs), chainmux_multicall::MULTICALL3_ADDRESS);
    let call = Call::new(
        TOKEN,
        "stats()",
        vec![],
        vec!["uint256".into(), "bool".into()],
    );
    let results = mc.run(vec![call]).await.unwrap();
    assert_eq!(
        results,
        vec![AbiValue::Tuple(vec![AbiValue::Uint(9), AbiValue::Bool(true)])]
    );
}
