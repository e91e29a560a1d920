//! Donation records and payment-intent endpoints.

use serde::Deserialize;

use crate::error::AppResult;
use crate::http::RestClient;
use crate::model::DonationRecord;

use super::{DeleteResult, UpdateResult};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentResponse {
    pub client_secret: String,
}

/// Ask the backend to mint a payment intent for the amount; the returned
/// client secret drives the gateway confirmation.
pub async fn create_intent(client: &RestClient, amount: f64) -> AppResult<IntentResponse> {
    client
        .post_json("/create-payment-intent", &serde_json::json!({ "amount": amount }))
        .await
}

/// Record a confirmed donation against its campaign. This is the only client
/// path that moves a campaign's donated amount.
pub async fn record_donation(
    client: &RestClient,
    campaign_id: &str,
    amount: f64,
    donator_name: &str,
    donator_email: &str,
) -> AppResult<UpdateResult> {
    client
        .patch_json(
            &format!("/donations/{}", campaign_id),
            &serde_json::json!({
                "donationAmount": amount,
                "donatorName": donator_name,
                "donatorEmail": donator_email,
            }),
        )
        .await
}

pub async fn by_donor(client: &RestClient, email: &str) -> AppResult<Vec<DonationRecord>> {
    client.get_json(&format!("/payments/{}", urlencoding::encode(email))).await
}

/// Ask for a refund: deletes the donor's record. The campaign total is the
/// backend's to adjust; the caller invalidates both collections.
pub async fn refund(client: &RestClient, donation_id: &str) -> AppResult<DeleteResult> {
    client.delete_json(&format!("/payments/{}", donation_id)).await
}
