//! Environment-driven configuration for the client engine.
//! Every external collaborator is reached through a base URL configured here;
//! defaults target a local development stack.

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// REST backend base URL.
    pub api_url: String,
    /// Identity provider base URL.
    pub auth_url: String,
    /// Payment gateway base URL.
    pub gateway_url: String,
    /// Image host upload endpoint.
    pub image_api_url: String,
    /// Image host API key, appended as a query parameter on upload.
    pub image_api_key: String,
    /// Directory for durable client state (session token, theme).
    pub data_dir: String,
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: env_or("PAWHAVEN_API_URL", "http://localhost:5000"),
            auth_url: env_or("PAWHAVEN_AUTH_URL", "http://localhost:9099"),
            gateway_url: env_or("PAWHAVEN_GATEWAY_URL", "http://localhost:4242"),
            image_api_url: env_or("PAWHAVEN_IMAGE_API_URL", "https://api.imgbb.com/1/upload"),
            image_api_key: env_or("PAWHAVEN_IMAGE_API_KEY", ""),
            data_dir: env_or("PAWHAVEN_DATA_DIR", ".pawhaven"),
        }
    }

    /// Configuration for tests: everything pointed at the given backend URL.
    pub fn for_tests(base: &str, data_dir: &str) -> Self {
        Self {
            api_url: base.to_string(),
            auth_url: base.to_string(),
            gateway_url: base.to_string(),
            image_api_url: format!("{}/image-upload", base),
            image_api_key: "test-key".to_string(),
            data_dir: data_dir.to_string(),
        }
    }
}
