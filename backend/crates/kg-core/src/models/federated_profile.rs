use serde::{Deserialize, Serialize};

/// Verified identity tuple handed over by an external identity provider
/// after its own handshake has completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FederatedProfile {
    /// Provider-side subject identifier
    pub provider_id: String,
    /// Providers may withhold the email; such logins are rejected
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub picture_url: Option<String>,
}

impl FederatedProfile {
    /// The email, if the provider supplied a non-blank one
    pub fn usable_email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}
