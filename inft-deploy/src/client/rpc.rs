use super::{ChainClient, TxReceipt, TxRequest};
use crate::{
    constants::{RECEIPT_POLL_INTERVAL_MS, TX_RECEIPT_TIMEOUT_MS},
    error::DeployError,
    util::encode::{
        format_address, parse_address, parse_hash, parse_hex_data, parse_quantity, parse_uint,
        to_hex_data,
    },
};
use async_trait::async_trait;
use ethabi::{Address, Hash};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpcOptions {
    /// How long to wait for a submitted transaction to be mined.
    pub receipt_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for RpcOptions {
    fn default() -> Self {
        Self {
            receipt_timeout: Duration::from_millis(TX_RECEIPT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(RECEIPT_POLL_INTERVAL_MS),
        }
    }
}

/// [ChainClient] speaking Ethereum JSON-RPC 2.0 over HTTP.
///
/// Transactions go through `eth_sendTransaction`, so the signer must be an account the node
/// manages (Hardhat, Anvil and Ganache unlock their funded dev accounts).
#[derive(Debug)]
pub struct RpcClient {
    http: reqwest::Client,
    url: Url,
    options: RpcOptions,
    next_id: AtomicU64,
}

#[derive(Debug, Serialize)]
struct Request<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct Response<T> {
    result: Option<T>,
    #[serde(default)]
    error: Option<ErrorObject>,
}

#[derive(Debug, Deserialize)]
struct ErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

#[derive(Debug, Serialize)]
struct TransactionObject {
    from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<String>,
    data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReceiptObject {
    transaction_hash: String,
    block_number: Option<String>,
    /// Absent on pre-Byzantium chains.
    status: Option<String>,
    contract_address: Option<String>,
    gas_used: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BlockObject {
    timestamp: String,
}

impl RpcClient {
    pub fn new(url: &str, options: RpcOptions) -> Result<Self, DeployError> {
        Ok(Self {
            http: reqwest::Client::new(),
            url: Url::parse(url)?,
            options,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn request_opt<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<Option<T>, DeployError> {
        let request = Request {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        tracing::trace!("-> {method} {}", request.params);
        let body: Value = self
            .http
            .post(self.url.clone())
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        tracing::trace!("<- {method} {body}");
        decode_response(body)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, DeployError> {
        self.request_opt(method, params)
            .await?
            .ok_or_else(|| DeployError::Decode(format!("`{method}` returned no result")))
    }

    async fn poll_receipt(&self, tx_hash: Hash) -> Result<TxReceipt, DeployError> {
        let params = json!([format!("{tx_hash:#x}")]);
        loop {
            let receipt: Option<ReceiptObject> = self
                .request_opt("eth_getTransactionReceipt", params.clone())
                .await?;
            // Nodes report pending transactions either as `null` or without a block number.
            match receipt {
                Some(receipt) if receipt.block_number.is_some() => {
                    return TxReceipt::try_from(receipt)
                }
                _ => tokio::time::sleep(self.options.poll_interval).await,
            }
        }
    }

    async fn wait_for_receipt(&self, tx_hash: Hash) -> Result<TxReceipt, DeployError> {
        let waited = self.options.receipt_timeout;
        tokio::time::timeout(waited, self.poll_receipt(tx_hash))
            .await
            .unwrap_or(Err(DeployError::Timeout { tx_hash, waited }))
    }
}

#[async_trait]
impl ChainClient for RpcClient {
    async fn accounts(&self) -> Result<Vec<Address>, DeployError> {
        let accounts: Vec<String> = self.request("eth_accounts", json!([])).await?;
        accounts.iter().map(|a| parse_address(a)).collect()
    }

    async fn send_transaction(&self, tx: TxRequest) -> Result<TxReceipt, DeployError> {
        let tx_object = TransactionObject::from(&tx);
        let tx_hash: String = self
            .request("eth_sendTransaction", json!([tx_object]))
            .await?;
        let tx_hash = parse_hash(&tx_hash)?;
        tracing::debug!("submitted transaction {tx_hash:#x} from {:#x}", tx.from);
        self.wait_for_receipt(tx_hash).await
    }

    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, DeployError> {
        let call = json!({ "to": format_address(&to), "data": to_hex_data(&data) });
        let output: String = self.request("eth_call", json!([call, "latest"])).await?;
        parse_hex_data(&output)
    }

    async fn latest_block_timestamp(&self) -> Result<u64, DeployError> {
        let block: BlockObject = self
            .request("eth_getBlockByNumber", json!(["latest", false]))
            .await?;
        parse_quantity(&block.timestamp)
    }
}

impl From<&TxRequest> for TransactionObject {
    fn from(tx: &TxRequest) -> Self {
        Self {
            from: format_address(&tx.from),
            to: tx.to.as_ref().map(format_address),
            data: to_hex_data(&tx.data),
            value: (!tx.value.is_zero()).then(|| format!("{:#x}", tx.value)),
        }
    }
}

impl TryFrom<ReceiptObject> for TxReceipt {
    type Error = DeployError;

    fn try_from(receipt: ReceiptObject) -> Result<Self, Self::Error> {
        let block_number = receipt
            .block_number
            .as_deref()
            .map(parse_quantity)
            .transpose()?
            .unwrap_or_default();
        let status = match receipt.status.as_deref() {
            Some(status) => parse_quantity(status)? == 1,
            None => true,
        };
        Ok(TxReceipt {
            tx_hash: parse_hash(&receipt.transaction_hash)?,
            block_number,
            status,
            contract_address: receipt
                .contract_address
                .as_deref()
                .map(parse_address)
                .transpose()?,
            gas_used: receipt
                .gas_used
                .as_deref()
                .map(parse_uint)
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

/// Splits a JSON-RPC response into its result or its error object.
fn decode_response<T: DeserializeOwned>(body: Value) -> Result<Option<T>, DeployError> {
    let response: Response<T> = serde_json::from_value(body)
        .map_err(|e| DeployError::Decode(format!("unexpected JSON-RPC response: {e}")))?;
    match response.error {
        Some(error) => {
            let message = match error.data {
                // Hardhat and Ganache put the revert reason next to a generic message.
                Some(Value::String(data)) if !error.message.contains(&data) => {
                    format!("{} ({data})", error.message)
                }
                _ => error.message,
            };
            Err(DeployError::Rpc {
                code: error.code,
                message,
            })
        }
        None => Ok(response.result),
    }
}
