//! Donation confirmation flow.
//! An explicit state machine per open donation modal: Idle until a positive
//! amount mints an intent, then ReadyToPay, then the card submission walks
//! MethodCreating -> Confirming -> Recording -> Done. Every failure path
//! lands back in Idle with a user-visible error and no server-side donation
//! state mutated; a new amount always mints a brand-new intent.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::api::donations;
use crate::error::{AppError, AppResult};
use crate::http::RestClient;
use crate::identity::Principal;
use crate::model::DonationCampaign;
use crate::notify::{NoticeLevel, Notifier};
use crate::query::QueryCache;
use crate::tprintln;

use super::gateway::{BillingDetails, CardDetails, ConfirmStatus, PaymentGateway};

/// Backend half of the payment handshake: mint an intent, record the result.
#[async_trait]
pub trait PaymentsBackend: Send + Sync {
    async fn create_intent(&self, amount: f64) -> AppResult<String>;
    async fn record_donation(
        &self,
        campaign_id: &str,
        amount: f64,
        donator_name: &str,
        donator_email: &str,
    ) -> AppResult<()>;
}

pub struct HttpPaymentsBackend {
    client: RestClient,
}

impl HttpPaymentsBackend {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PaymentsBackend for HttpPaymentsBackend {
    async fn create_intent(&self, amount: f64) -> AppResult<String> {
        Ok(donations::create_intent(&self.client, amount).await?.client_secret)
    }

    async fn record_donation(
        &self,
        campaign_id: &str,
        amount: f64,
        donator_name: &str,
        donator_email: &str,
    ) -> AppResult<()> {
        donations::record_donation(&self.client, campaign_id, amount, donator_name, donator_email)
            .await
            .map(|_| ())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    IntentRequested,
    ReadyToPay,
    MethodCreating,
    Confirming,
    Recording,
    Done,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Recorded { amount: f64 },
    /// The flow was not ready for a card submission; nothing was sent.
    Ignored,
}

struct FlowInner {
    state: FlowState,
    amount: f64,
    client_secret: Option<String>,
}

pub struct DonationFlow {
    backend: Arc<dyn PaymentsBackend>,
    gateway: Arc<dyn PaymentGateway>,
    cache: QueryCache,
    notifier: Arc<Notifier>,
    campaign: DonationCampaign,
    principal: Option<Principal>,
    inner: Mutex<FlowInner>,
}

impl DonationFlow {
    pub fn new(
        backend: Arc<dyn PaymentsBackend>,
        gateway: Arc<dyn PaymentGateway>,
        cache: QueryCache,
        notifier: Arc<Notifier>,
        campaign: DonationCampaign,
        principal: Option<Principal>,
    ) -> Self {
        Self {
            backend,
            gateway,
            cache,
            notifier,
            campaign,
            principal,
            inner: Mutex::new(FlowInner { state: FlowState::Idle, amount: 0.0, client_secret: None }),
        }
    }

    pub fn state(&self) -> FlowState {
        self.inner.lock().state
    }

    pub fn client_secret(&self) -> Option<String> {
        self.inner.lock().client_secret.clone()
    }

    fn billing(&self) -> BillingDetails {
        match &self.principal {
            Some(p) => BillingDetails { name: p.billing_name().into(), email: p.billing_email().into() },
            None => BillingDetails { name: "anonymous".into(), email: "anonymous".into() },
        }
    }

    /// Amount entry. A non-positive amount suppresses intent creation
    /// entirely; a positive one discards any previous secret and mints a
    /// brand-new intent. Returns whether an intent was requested.
    pub async fn enter_amount(&self, amount: f64) -> AppResult<bool> {
        {
            let mut inner = self.inner.lock();
            match inner.state {
                FlowState::Idle | FlowState::IntentRequested | FlowState::ReadyToPay | FlowState::Done => {}
                // A card submission is mid-sequence; ignore amount edits
                _ => return Ok(false),
            }
            if !(amount > 0.0) {
                // Clearing (or entering junk) drops the secret client-side;
                // the unconfirmed intent is left to expire server-side.
                inner.amount = 0.0;
                inner.client_secret = None;
                inner.state = FlowState::Idle;
                return Ok(false);
            }
            if self.campaign.is_paused {
                inner.state = FlowState::Idle;
                return Err(AppError::validation(
                    "campaign_paused",
                    "This campaign is paused and not accepting donations.",
                ));
            }
            inner.amount = amount;
            inner.client_secret = None;
            inner.state = FlowState::IntentRequested;
        }

        match self.backend.create_intent(amount).await {
            Ok(secret) => {
                let mut inner = self.inner.lock();
                inner.client_secret = Some(secret);
                inner.state = FlowState::ReadyToPay;
                tprintln!("payment.intent_ready amount={}", amount);
                Ok(true)
            }
            Err(e) => {
                let mut inner = self.inner.lock();
                inner.client_secret = None;
                inner.state = FlowState::Idle;
                drop(inner);
                self.notifier.push(e.notice_level(), e.message().to_string());
                Err(e)
            }
        }
    }

    /// Clearing the amount field discards the client secret; no server-side
    /// cancellation is attempted.
    pub fn clear_amount(&self) {
        let mut inner = self.inner.lock();
        if matches!(inner.state, FlowState::IntentRequested | FlowState::ReadyToPay) {
            inner.amount = 0.0;
            inner.client_secret = None;
            inner.state = FlowState::Idle;
        }
    }

    /// Card submission: tokenize, confirm, record. Only valid in ReadyToPay;
    /// re-entrant submissions while one runs are ignored.
    pub async fn submit_card(&self, card: &CardDetails) -> AppResult<SubmitOutcome> {
        let (amount, secret) = {
            let mut inner = self.inner.lock();
            if inner.state != FlowState::ReadyToPay {
                return Ok(SubmitOutcome::Ignored);
            }
            let Some(secret) = inner.client_secret.clone() else {
                return Ok(SubmitOutcome::Ignored);
            };
            inner.state = FlowState::MethodCreating;
            (inner.amount, secret)
        };

        let method_id = match self.gateway.create_method(card).await {
            Ok(id) => id,
            Err(e) => return Err(self.fail(e.into())),
        };

        self.set_state(FlowState::Confirming);
        let billing = self.billing();
        let outcome = match self.gateway.confirm(&secret, &method_id, &billing).await {
            Ok(outcome) => outcome,
            Err(e) => return Err(self.fail(e.into())),
        };
        if outcome.status != ConfirmStatus::Succeeded {
            return Err(self.fail(AppError::payment(
                "not_succeeded".to_string(),
                format!("payment finished in state {:?}", outcome.status),
            )));
        }

        self.set_state(FlowState::Recording);
        if let Err(e) = self
            .backend
            .record_donation(&self.campaign.id, amount, &billing.name, &billing.email)
            .await
        {
            return Err(self.fail(e));
        }

        {
            let mut inner = self.inner.lock();
            inner.state = FlowState::Done;
            inner.client_secret = None;
        }
        // The campaign detail and every donation list refetch the new totals
        self.cache.invalidate("donations");
        self.cache.invalidate("payments");
        self.notifier
            .push(NoticeLevel::Success, "Your donation has been processed successfully.");
        debug!(target: "pawhaven", "donation recorded: campaign={} amount={}", self.campaign.id, amount);
        Ok(SubmitOutcome::Recorded { amount })
    }

    fn set_state(&self, state: FlowState) {
        self.inner.lock().state = state;
    }

    /// Failure path shared by every step: back to Idle, secret discarded,
    /// error surfaced once.
    fn fail(&self, e: AppError) -> AppError {
        {
            let mut inner = self.inner.lock();
            inner.state = FlowState::Idle;
            inner.client_secret = None;
        }
        self.notifier.push(e.notice_level(), e.message().to_string());
        e
    }
}

#[cfg(test)]
#[path = "flow_tests.rs"]
mod flow_tests;
