//! Request and response payloads of the transfer API.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::blockchain::SubmittedTransaction;

/// Amount as the client sent it: a JSON number or a decimal string.
///
/// Kept verbatim so responses echo exactly what was requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(serde_json::Number),
    Text(String),
}

impl Amount {
    /// Empty strings and a numeric zero count as absent.
    pub fn is_missing(&self) -> bool {
        match self {
            Amount::Number(n) => n.as_f64() == Some(0.0),
            Amount::Text(s) => s.trim().is_empty(),
        }
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(Amount::Number)
            .unwrap_or_else(|| Amount::Text(value.to_string()))
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Amount::Text(value.to_string())
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Amount::Number(n) => write!(f, "{}", n),
            Amount::Text(s) => write!(f, "{}", s),
        }
    }
}

/// `POST /transfer` body. Fields are optional so missing ones get a proper 400.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    #[serde(default)]
    pub amount: Option<Amount>,
    #[serde(default)]
    pub wallet_address: Option<String>,
}

impl TransferRequest {
    /// Read a request from an arbitrary JSON body.
    ///
    /// Never fails: `null`, `false` and missing fields become `None`, and
    /// values of the wrong JSON type are kept as text so validation rejects
    /// them with a field-specific message.
    pub fn from_json(body: &serde_json::Value) -> Self {
        Self {
            amount: present(body.get("amount")).map(|v| match v {
                serde_json::Value::Number(n) => Amount::Number(n.clone()),
                serde_json::Value::String(s) => Amount::Text(s.clone()),
                other => Amount::Text(other.to_string()),
            }),
            wallet_address: present(body.get("walletAddress")).map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
        }
    }
}

fn present(value: Option<&serde_json::Value>) -> Option<&serde_json::Value> {
    value.filter(|v| !matches!(v, serde_json::Value::Null | serde_json::Value::Bool(false)))
}

/// `GET /balance/{address}` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceReport {
    pub address: String,
    pub balance: f64,
    pub raw_balance: String,
    pub decimals: u8,
}

/// Token leg of a transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransferLeg {
    pub transaction_hash: String,
    pub amount: Amount,
    pub token_amount: String,
    pub gas_used: String,
    pub block_number: String,
    pub nonce: u64,
}

/// Native-currency leg of a transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeTransferLeg {
    pub transaction_hash: String,
    pub amount: String,
    pub amount_wei: String,
    pub gas_used: String,
    pub block_number: String,
    pub nonce: u64,
}

/// `POST /transfer` success response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferOutcome {
    pub success: bool,
    pub token_transfer: TokenTransferLeg,
    pub eth_transfer: NativeTransferLeg,
    pub from: String,
    pub to: String,
    pub network: String,
    pub total_transactions: u32,
}

impl TokenTransferLeg {
    pub fn new(tx: &SubmittedTransaction, amount: Amount, token_amount: U256) -> Self {
        Self {
            transaction_hash: tx.receipt.transaction_hash.to_string(),
            amount,
            token_amount: token_amount.to_string(),
            gas_used: tx.receipt.gas_used.to_string(),
            block_number: tx.receipt.block_number.to_string(),
            nonce: tx.nonce,
        }
    }
}

impl NativeTransferLeg {
    pub fn new(tx: &SubmittedTransaction, amount: &str, amount_wei: U256) -> Self {
        Self {
            transaction_hash: tx.receipt.transaction_hash.to_string(),
            amount: amount.to_string(),
            amount_wei: amount_wei.to_string(),
            gas_used: tx.receipt.gas_used.to_string(),
            block_number: tx.receipt.block_number.to_string(),
            nonce: tx.nonce,
        }
    }
}

/// EIP-55 checksummed form used in responses.
pub fn display_address(address: Address) -> String {
    address.to_checksum(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_accepts_number_or_string() {
        let req: TransferRequest =
            serde_json::from_value(json!({"amount": 0.01, "walletAddress": "0xabc"})).unwrap();
        assert_eq!(req.amount, Some(Amount::from(0.01)));
        assert_eq!(req.wallet_address.as_deref(), Some("0xabc"));

        let req: TransferRequest = serde_json::from_value(json!({"amount": "1.5"})).unwrap();
        assert_eq!(req.amount, Some(Amount::Text("1.5".into())));
        assert!(req.wallet_address.is_none());
    }

    #[test]
    fn test_amount_echo_is_verbatim() {
        assert_eq!(serde_json::to_value(Amount::from(0.01)).unwrap(), json!(0.01));
        assert_eq!(serde_json::to_value(Amount::from("0.10")).unwrap(), json!("0.10"));
    }

    #[test]
    fn test_balance_report_is_camel_case() {
        let report = BalanceReport {
            address: "0x1".into(),
            balance: 2.5,
            raw_balance: "250".into(),
            decimals: 2,
        };
        assert_eq!(
            serde_json::to_value(report).unwrap(),
            json!({"address": "0x1", "balance": 2.5, "rawBalance": "250", "decimals": 2})
        );
    }

    #[test]
    fn test_from_json_is_lenient() {
        let req = TransferRequest::from_json(&json!({"amount": true, "walletAddress": 42}));
        assert_eq!(req.amount, Some(Amount::Text("true".into())));
        assert_eq!(req.wallet_address.as_deref(), Some("42"));

        let req = TransferRequest::from_json(&json!({"amount": null, "walletAddress": false}));
        assert!(req.amount.is_none());
        assert!(req.wallet_address.is_none());

        let req = TransferRequest::from_json(&json!([1, 2]));
        assert!(req.amount.is_none());
    }
}
