use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogoutRequest {
    /// Session to retire; omitted means none is removed
    pub refresh_token: Option<String>,
}
