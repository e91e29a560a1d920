//! User directory and dashboard stats endpoints.

use crate::error::AppResult;
use crate::http::RestClient;
use crate::model::{AdminStats, UserAccount, UserStats};

use super::UpdateResult;

pub async fn all(client: &RestClient) -> AppResult<Vec<UserAccount>> {
    client.get_json("/users").await
}

/// Elevate a user to admin. Role elevation is monotonic and only ever
/// happens through this admin action.
pub async fn make_admin(client: &RestClient, user_id: &str) -> AppResult<UpdateResult> {
    client
        .patch_json(&format!("/users/admin/{}", user_id), &serde_json::json!({}))
        .await
}

pub async fn admin_stats(client: &RestClient) -> AppResult<AdminStats> {
    client.get_json("/admin/stats").await
}

pub async fn user_stats(client: &RestClient, email: &str) -> AppResult<UserStats> {
    client.get_json(&format!("/user/stats/{}", urlencoding::encode(email))).await
}
