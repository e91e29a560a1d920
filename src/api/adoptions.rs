//! Adoption request endpoints.

use crate::error::AppResult;
use crate::http::RestClient;
use crate::model::{AdoptionRequest, NewAdoptionRequest};

use super::{InsertResult, UpdateResult};

pub async fn create(client: &RestClient, request: &NewAdoptionRequest) -> AppResult<InsertResult> {
    client.post_json("/adoptions", request).await
}

/// Requests targeting pets owned by the given email.
pub async fn by_owner(client: &RestClient, owner_email: &str) -> AppResult<Vec<AdoptionRequest>> {
    client.get_json(&format!("/adoptions/{}", urlencoding::encode(owner_email))).await
}

/// Accept a request. Carries the pet id so the backend marks the pet adopted
/// and voids sibling requests in the same step.
pub async fn accept(client: &RestClient, request_id: &str, pet_id: &str) -> AppResult<UpdateResult> {
    client
        .patch_json(
            &format!("/adoptions/accept/{}", request_id),
            &serde_json::json!({ "petId": pet_id }),
        )
        .await
}

pub async fn reject(client: &RestClient, request_id: &str) -> AppResult<UpdateResult> {
    client
        .patch_json(&format!("/adoptions/reject/{}", request_id), &serde_json::json!({}))
        .await
}
