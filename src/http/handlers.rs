//! Route handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use tracing::Instrument;

use crate::context::AppContext;
use crate::error::{ServiceError, ServiceResult};
use crate::http::response::{internal_error, not_found};
use crate::transfer::{
    BalanceQuery, BalanceReport, TransferOutcome, TransferPipeline, TransferPlan, TransferRequest,
};

/// `GET /health` response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub network: String,
    pub token: String,
}

/// `GET /debug` response. Never includes the key itself.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugResponse {
    pub private_key_exists: bool,
    pub private_key_length: usize,
    pub private_key_prefix: Option<String>,
    pub rpc_url: String,
}

/// Liveness. Does not touch the chain.
pub async fn health(State(ctx): State<Arc<AppContext>>) -> Json<HealthResponse> {
    let config = ctx.config();
    Json(HealthResponse {
        status: "OK",
        timestamp: chrono::Utc::now().to_rfc3339(),
        network: config.blockchain.network_name.clone(),
        token: config.token.address.clone(),
    })
}

pub async fn balance(
    State(ctx): State<Arc<AppContext>>,
    Path(address): Path<String>,
) -> ServiceResult<Json<BalanceReport>> {
    let query = BalanceQuery::parse(&address).inspect_err(log_failure)?;
    let chain = ctx.initialize().await.inspect_err(log_failure)?;
    query.execute(&chain).await.map(Json).inspect_err(log_failure)
}

pub async fn transfer(
    State(ctx): State<Arc<AppContext>>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(value)) => TransferRequest::from_json(&value),
        // Non-JSON bodies are treated as empty.
        Err(JsonRejection::MissingJsonContentType(_)) => TransferRequest::default(),
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Unreadable transfer body");
            return internal_error(rejection.body_text());
        }
    };

    // Detached so a dropped connection cannot stop the pipeline between
    // the two broadcasts.
    let task = tokio::spawn(
        async move { run_transfer(&ctx, request).await }.instrument(tracing::Span::current()),
    );

    match task.await {
        Ok(Ok(outcome)) => Json(outcome).into_response(),
        Ok(Err(e)) => {
            log_failure(&e);
            e.into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Transfer task aborted");
            internal_error(e.to_string())
        }
    }
}

async fn run_transfer(ctx: &AppContext, request: TransferRequest) -> ServiceResult<TransferOutcome> {
    let config = ctx.config();
    let plan = TransferPlan::validate(request, config.token.decimals)?;
    let chain = ctx.initialize().await?;
    TransferPipeline::new(&chain, &config.blockchain.network_name)
        .execute(plan)
        .await
}

/// Signer diagnostics. Only routed outside production.
pub async fn debug(State(ctx): State<Arc<AppContext>>) -> Json<DebugResponse> {
    let config = ctx.config();
    let masked = config.signer.masked();
    Json(DebugResponse {
        private_key_exists: masked.is_some(),
        private_key_length: masked.as_ref().map_or(0, |(_, len)| *len),
        private_key_prefix: masked.map(|(prefix, _)| prefix),
        rpc_url: config.blockchain.rpc_url.clone(),
    })
}

pub async fn fallback() -> Response {
    not_found()
}

fn log_failure(err: &ServiceError) {
    if err.is_client_error() {
        tracing::warn!(error = %err, "Request rejected");
    } else {
        tracing::error!(error = %err, details = ?err.details(), "Request failed");
    }
}
