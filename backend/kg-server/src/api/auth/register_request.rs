use serde::Deserialize;

/// Missing fields deserialize as empty so validation can name them
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}
