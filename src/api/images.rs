//! Image-host upload.
//! Multipart upload returning a public display URL. The host signals some
//! failures as HTTP 200 with `success: false`; that is a recoverable error
//! and the enclosing submission aborts with no partial side effects.

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::error::{AppError, AppResult};

#[derive(Deserialize)]
struct UploadData {
    display_url: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<UploadData>,
}

pub async fn upload(
    http: &reqwest::Client,
    api_url: &str,
    api_key: &str,
    filename: &str,
    bytes: Vec<u8>,
) -> AppResult<String> {
    let part = Part::bytes(bytes).file_name(filename.to_string());
    let form = Form::new().part("image", part);
    let url = format!("{}?key={}", api_url, urlencoding::encode(api_key));

    let resp = http.post(&url).multipart(form).send().await.map_err(AppError::from)?;
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        return Err(AppError::Upload { code: format!("upload_{}", status.as_u16()), message: text });
    }

    let body: UploadResponse = resp.json().await.map_err(AppError::from)?;
    if !body.success {
        return Err(AppError::upload("upload_failed", "Image upload failed. Please try again."));
    }
    body.data
        .map(|d| d.display_url)
        .ok_or_else(|| AppError::upload("upload_failed", "image host returned no URL"))
}
