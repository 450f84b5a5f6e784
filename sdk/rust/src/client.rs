use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub network: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub address: String,
    pub balance: f64,
    pub raw_balance: String,
    pub decimals: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransfer {
    pub transaction_hash: String,
    pub amount: Value, // echoed as sent: number or string
    pub token_amount: String,
    pub gas_used: String,
    pub block_number: String,
    pub nonce: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthTransfer {
    pub transaction_hash: String,
    pub amount: String,
    pub amount_wei: String,
    pub gas_used: String,
    pub block_number: String,
    pub nonce: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    pub success: bool,
    pub token_transfer: TokenTransfer,
    pub eth_transfer: EthTransfer,
    pub from: String,
    pub to: String,
    pub network: String,
    pub total_transactions: u32,
}

/// Error body returned by the API on any non-2xx status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
    pub message: Option<String>,
    pub available: Option<f64>,
    pub requested: Option<Value>,
    pub token_transaction_hash: Option<String>,
}

#[derive(Debug)]
pub enum ClientError {
    Http(reqwest::Error),
    Api { status: StatusCode, body: ErrorResponse },
    Decode(serde_json::Error),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Http(e) => write!(f, "request failed: {}", e),
            ClientError::Api { status, body } => match &body.details {
                Some(details) => write!(f, "API returned {}: {} ({})", status, body.error, details),
                None => write!(f, "API returned {}: {}", status, body.error),
            },
            ClientError::Decode(e) => write!(f, "unexpected response body: {}", e),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Http(e)
    }
}

pub struct TransferApiClient {
    client: Client,
    base_url: String,
}

impl TransferApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let resp = self.client.get(self.url("/health")).send().await?;
        decode(resp).await
    }

    pub async fn balance(&self, address: &str) -> Result<BalanceResponse, ClientError> {
        let resp = self
            .client
            .get(self.url(&format!("/balance/{}", address)))
            .send()
            .await?;
        decode(resp).await
    }

    /// Send `amount` tokens (number or decimal string) to `wallet_address`.
    pub async fn transfer(
        &self,
        amount: impl Into<Value>,
        wallet_address: &str,
    ) -> Result<TransferResponse, ClientError> {
        let body = serde_json::json!({
            "amount": amount.into(),
            "walletAddress": wallet_address,
        });
        let resp = self.client.post(self.url("/transfer")).json(&body).send().await?;
        decode(resp).await
    }

    /// GET `path` and return status plus raw JSON body.
    pub async fn get_raw(&self, path: &str) -> Result<(StatusCode, Value), ClientError> {
        let resp = self.client.get(self.url(path)).send().await?;
        raw(resp).await
    }

    /// POST a JSON body to `path` and return status plus raw JSON body.
    pub async fn post_raw(&self, path: &str, body: &Value) -> Result<(StatusCode, Value), ClientError> {
        let resp = self.client.post(self.url(path)).json(body).send().await?;
        raw(resp).await
    }

    /// Underlying reqwest response for header or body checks.
    pub async fn request(&self, method: reqwest::Method, path: &str) -> Result<Response, ClientError> {
        Ok(self.client.request(method, self.url(path)).send().await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn decode<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    let text = resp.text().await?;

    if !status.is_success() {
        let body = serde_json::from_str(&text).unwrap_or_else(|_| ErrorResponse {
            error: text,
            ..Default::default()
        });
        return Err(ClientError::Api { status, body });
    }

    serde_json::from_str(&text).map_err(ClientError::Decode)
}

async fn raw(resp: Response) -> Result<(StatusCode, Value), ClientError> {
    let status = resp.status();
    let text = resp.text().await?;
    let body = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).map_err(ClientError::Decode)?
    };
    Ok((status, body))
}
