//! Donation campaign endpoints.

use std::sync::Arc;

use crate::error::AppResult;
use crate::http::RestClient;
use crate::model::{DonationCampaign, DonationRecord, NewCampaign};
use crate::query::{DetailQuery, PageFetcher, PageRequest, PagedList};

use super::{DeleteResult, InsertResult, Page, UpdateResult};

/// Page-fetch function for the campaign marketplace. The campaign listing
/// pages by index only; filter/sort stay at their defaults.
pub fn paged_fetcher(client: RestClient) -> PageFetcher<DonationCampaign> {
    Arc::new(move |req: PageRequest| {
        let client = client.clone();
        Box::pin(async move {
            let page: Page<DonationCampaign> =
                client.get_json(&format!("/donations?page={}", req.page)).await?;
            Ok(page.into())
        })
    })
}

pub fn listing(client: RestClient) -> PagedList<DonationCampaign> {
    PagedList::new(paged_fetcher(client))
}

pub async fn by_id(client: &RestClient, id: &str) -> AppResult<DonationCampaign> {
    client.get_json(&format!("/donations/{}", id)).await
}

/// Detail query for one campaign, ready to subscribe under "donations/{id}".
pub fn detail(client: RestClient, id: String) -> DetailQuery<DonationCampaign> {
    DetailQuery::new(Arc::new(move || {
        let client = client.clone();
        let id = id.clone();
        Box::pin(async move { client.get_json(&format!("/donations/{}", id)).await })
    }))
}

pub async fn by_owner(client: &RestClient, email: &str) -> AppResult<Vec<DonationCampaign>> {
    client.get_json(&format!("/donations/user/{}", urlencoding::encode(email))).await
}

pub async fn admin_all(client: &RestClient) -> AppResult<Vec<DonationCampaign>> {
    client.get_json("/admin/donations").await
}

pub async fn create(client: &RestClient, campaign: &NewCampaign) -> AppResult<InsertResult> {
    client.post_json("/donations", campaign).await
}

pub async fn update(client: &RestClient, id: &str, campaign: &NewCampaign) -> AppResult<UpdateResult> {
    client.patch_json(&format!("/donations-edit/{}", id), campaign).await
}

/// Pause or resume a campaign (owner or admin).
pub async fn set_paused(client: &RestClient, id: &str, paused: bool) -> AppResult<UpdateResult> {
    client
        .patch_json(&format!("/donations/pause/{}", id), &serde_json::json!({ "isPaused": paused }))
        .await
}

/// Admin-only campaign deletion.
pub async fn admin_delete(client: &RestClient, id: &str) -> AppResult<DeleteResult> {
    client.delete_json(&format!("/admin/donations/{}", id)).await
}

/// Everyone who donated to a campaign (owner's donators modal).
pub async fn donators(client: &RestClient, id: &str) -> AppResult<Vec<DonationRecord>> {
    client.get_json(&format!("/donations/donators/{}", id)).await
}

/// Up to three active campaigns to recommend next to a campaign detail view,
/// never including the campaign itself.
pub async fn recommended(
    client: &RestClient,
    exclude_id: &str,
) -> AppResult<Vec<DonationCampaign>> {
    let all: Vec<DonationCampaign> = client.get_json("/donations?limit=4").await?;
    Ok(all.into_iter().filter(|c| c.id != exclude_id).take(3).collect())
}
