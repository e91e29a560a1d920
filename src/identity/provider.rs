use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::tprintln;

/// What the external auth service knows about a signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderUser {
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialProvider {
    Google,
    GitHub,
}

impl SocialProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            SocialProvider::Google => "google",
            SocialProvider::GitHub => "github",
        }
    }
}

/// Seam over the external identity service. The service's internals are
/// opaque; the engine only needs these five operations.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<ProviderUser>;
    async fn sign_up(&self, email: &str, password: &str) -> AppResult<ProviderUser>;
    async fn sign_in_social(&self, provider: SocialProvider) -> AppResult<ProviderUser>;
    async fn sign_out(&self) -> AppResult<()>;
    async fn update_profile(&self, name: &str, photo: Option<&str>) -> AppResult<()>;
}

/// HTTP implementation against the hosted identity service.
pub struct HttpIdentityProvider {
    base: Url,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

impl HttpIdentityProvider {
    pub fn new(base: &str) -> AppResult<Self> {
        let base = Url::parse(base)
            .map_err(|e| AppError::internal("bad_auth_url".into(), e.to_string()))?;
        let client = reqwest::Client::builder().build().map_err(AppError::from)?;
        Ok(Self { base, client })
    }

    fn url(&self, path: &str) -> AppResult<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| AppError::internal("bad_url".into(), e.to_string()))
    }

    async fn post_user(&self, path: &str, body: &impl Serialize) -> AppResult<ProviderUser> {
        let resp = self
            .client
            .post(self.url(path)?)
            .json(body)
            .send()
            .await
            .map_err(AppError::from)?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            // Auth service rejections are auth errors regardless of code
            return Err(AppError::Auth { code: format!("auth_{}", status.as_u16()), message: text });
        }
        resp.json::<ProviderUser>().await.map_err(AppError::from)
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<ProviderUser> {
        tprintln!("identity.sign_in email={}", email);
        self.post_user("/signin", &Credentials { email, password }).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> AppResult<ProviderUser> {
        tprintln!("identity.sign_up email={}", email);
        self.post_user("/signup", &Credentials { email, password }).await
    }

    async fn sign_in_social(&self, provider: SocialProvider) -> AppResult<ProviderUser> {
        tprintln!("identity.sign_in_social provider={}", provider.as_str());
        self.post_user(&format!("/social/{}", provider.as_str()), &serde_json::json!({})).await
    }

    async fn sign_out(&self) -> AppResult<()> {
        let resp = self
            .client
            .post(self.url("/signout")?)
            .send()
            .await
            .map_err(AppError::from)?;
        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(AppError::Auth { code: "signout_failed".into(), message: text });
        }
        Ok(())
    }

    async fn update_profile(&self, name: &str, photo: Option<&str>) -> AppResult<()> {
        let body = serde_json::json!({ "displayName": name, "photoUrl": photo });
        let resp = self
            .client
            .post(self.url("/profile")?)
            .json(&body)
            .send()
            .await
            .map_err(AppError::from)?;
        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(AppError::Auth { code: "profile_update_failed".into(), message: text });
        }
        Ok(())
    }
}
