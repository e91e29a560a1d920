//! Seam over the external payment processor.
//! Two operations matter to the engine: tokenize a card into a payment
//! method, and confirm a server-minted intent with that method. Everything
//! else the processor does is out of scope.

use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::AppError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("card declined: {0}")]
    CardDeclined(String),
    #[error("invalid card details: {0}")]
    InvalidCard(String),
    #[error("confirmation failed: {0}")]
    ConfirmFailed(String),
    #[error("gateway unreachable: {0}")]
    Unreachable(String),
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        let code = match &err {
            GatewayError::CardDeclined(_) => "card_declined",
            GatewayError::InvalidCard(_) => "invalid_card",
            GatewayError::ConfirmFailed(_) => "confirm_failed",
            GatewayError::Unreachable(_) => "gateway_unreachable",
        };
        AppError::Payment { code: code.into(), message: err.to_string() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CardDetails {
    pub number: String,
    pub exp_month: u32,
    pub exp_year: u32,
    pub cvc: String,
}

/// Billing identity attached at confirmation; derived from the signed-in
/// user with "anonymous" placeholders when fields are absent.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BillingDetails {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmStatus {
    Succeeded,
    Processing,
    RequiresPaymentMethod,
    Canceled,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmOutcome {
    pub status: ConfirmStatus,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Tokenize a card into a payment-method id. No server-side state is
    /// mutated by this call.
    async fn create_method(&self, card: &CardDetails) -> Result<String, GatewayError>;

    /// Confirm the intent behind `client_secret` with the tokenized method.
    async fn confirm(
        &self,
        client_secret: &str,
        method_id: &str,
        billing: &BillingDetails,
    ) -> Result<ConfirmOutcome, GatewayError>;
}

/// HTTP implementation against the hosted gateway.
pub struct HttpPaymentGateway {
    base: Url,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct MethodResponse {
    id: String,
}

impl HttpPaymentGateway {
    pub fn new(base: &str) -> Result<Self, GatewayError> {
        let base = Url::parse(base).map_err(|e| GatewayError::Unreachable(e.to_string()))?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;
        Ok(Self { base, client })
    }

    fn url(&self, path: &str) -> Result<Url, GatewayError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| GatewayError::Unreachable(e.to_string()))
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_method(&self, card: &CardDetails) -> Result<String, GatewayError> {
        let resp = self
            .client
            .post(self.url("/v1/payment_methods")?)
            .json(&serde_json::json!({ "type": "card", "card": card }))
            .send()
            .await
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;
        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(GatewayError::InvalidCard(text));
        }
        let method: MethodResponse =
            resp.json().await.map_err(|e| GatewayError::InvalidCard(e.to_string()))?;
        Ok(method.id)
    }

    async fn confirm(
        &self,
        client_secret: &str,
        method_id: &str,
        billing: &BillingDetails,
    ) -> Result<ConfirmOutcome, GatewayError> {
        let resp = self
            .client
            .post(self.url("/v1/payment_intents/confirm")?)
            .json(&serde_json::json!({
                "client_secret": client_secret,
                "payment_method": method_id,
                "billing_details": billing,
            }))
            .send()
            .await
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;
        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(GatewayError::ConfirmFailed(text));
        }
        resp.json::<ConfirmOutcome>()
            .await
            .map_err(|e| GatewayError::ConfirmFailed(e.to_string()))
    }
}
