//! Pet catalog endpoints.

use std::sync::Arc;

use crate::error::AppResult;
use crate::http::RestClient;
use crate::model::{NewPet, Pet};
use crate::query::{DetailQuery, PageFetcher, PageRequest, PagedList};

use super::{list_query_string, DeleteResult, InsertResult, Page, UpdateResult};

/// Page-fetch function for the public pet listing; feeds a `PagedList`.
pub fn paged_fetcher(client: RestClient) -> PageFetcher<Pet> {
    Arc::new(move |req: PageRequest| {
        let client = client.clone();
        Box::pin(async move {
            let page: Page<Pet> =
                client.get_json(&format!("/pets?{}", list_query_string(&req))).await?;
            Ok(page.into())
        })
    })
}

/// The pet listing, ready to subscribe under the "pets" cache key.
pub fn listing(client: RestClient) -> PagedList<Pet> {
    PagedList::new(paged_fetcher(client))
}

pub async fn by_id(client: &RestClient, id: &str) -> AppResult<Pet> {
    client.get_json(&format!("/pets/{}", id)).await
}

/// Detail query for one pet, ready to subscribe under "pets/{id}".
pub fn detail(client: RestClient, id: String) -> DetailQuery<Pet> {
    DetailQuery::new(Arc::new(move || {
        let client = client.clone();
        let id = id.clone();
        Box::pin(async move { client.get_json(&format!("/pets/{}", id)).await })
    }))
}

pub async fn by_owner(client: &RestClient, email: &str) -> AppResult<Vec<Pet>> {
    client.get_json(&format!("/pets/user/{}", urlencoding::encode(email))).await
}

pub async fn admin_all(client: &RestClient) -> AppResult<Vec<Pet>> {
    client.get_json("/admin/pets").await
}

pub async fn create(client: &RestClient, pet: &NewPet) -> AppResult<InsertResult> {
    client.post_json("/pets", pet).await
}

pub async fn update(client: &RestClient, id: &str, pet: &NewPet) -> AppResult<UpdateResult> {
    client.patch_json(&format!("/pets/{}", id), pet).await
}

pub async fn delete(client: &RestClient, id: &str) -> AppResult<DeleteResult> {
    client.delete_json(&format!("/pets/{}", id)).await
}

/// Toggle the adopted flag. Owners use this to mark a pet adopted by hand;
/// admins may flip it in both directions.
pub async fn set_adopted(client: &RestClient, id: &str, adopted: bool) -> AppResult<UpdateResult> {
    client
        .patch_json(&format!("/pets/adopt/{}", id), &serde_json::json!({ "adopted": adopted }))
        .await
}
