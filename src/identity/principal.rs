use serde::{Deserialize, Serialize};

/// The signed-in identity as the engine sees it: provider display fields
/// plus the backend profile extras (phone/address).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl Principal {
    /// Billing name/email for the payment gateway; placeholder strings when
    /// the display fields are absent.
    pub fn billing_name(&self) -> &str {
        if self.name.is_empty() { "anonymous" } else { &self.name }
    }

    pub fn billing_email(&self) -> &str {
        if self.email.is_empty() { "anonymous" } else { &self.email }
    }
}
