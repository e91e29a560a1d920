//! Typed, thin wrappers over the backend's REST endpoints, one module per
//! collection. Everything returns `AppResult`; pagination goes through the
//! shared `Page` envelope.

pub mod adoptions;
pub mod campaigns;
pub mod donations;
pub mod images;
pub mod pets;
pub mod users;

use serde::Deserialize;

use crate::query::{PageData, PageRequest};

/// Paged wire envelope. The backend names the items array after the
/// collection ("pets", "campaigns"); the aliases accept either.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(alias = "pets", alias = "campaigns")]
    pub items: Vec<T>,
    pub current_page: u32,
    pub total_pages: u32,
}

impl<T> From<Page<T>> for PageData<T> {
    fn from(p: Page<T>) -> Self {
        PageData { items: p.items, current_page: p.current_page, total_pages: p.total_pages }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    #[serde(default)]
    pub inserted_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    #[serde(default)]
    pub modified_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    #[serde(default)]
    pub deleted_count: u64,
}

/// Render the filter/sort parameters plus page index as the backend's list
/// query string.
pub fn list_query_string(req: &PageRequest) -> String {
    format!(
        "search={}&category={}&page={}&sortBy={}&sortOrder={}",
        urlencoding::encode(&req.params.search),
        urlencoding::encode(&req.params.category),
        req.page,
        urlencoding::encode(&req.params.sort_by),
        req.params.sort_order.as_str(),
    )
}
