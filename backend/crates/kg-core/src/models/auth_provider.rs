use crate::{CoreError, Result as CoreErrorResult};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Which credential paths an identity can sign in with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthProvider {
    /// Email and password only
    #[default]
    Local,
    /// External identity provider only (no usable password)
    Federated,
    /// Local identity that has been linked to a federated login
    Both,
}

impl AuthProvider {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Federated => "federated",
            Self::Both => "both",
        }
    }

    /// True once a federated login has been attached to the identity
    pub fn has_federated_login(&self) -> bool {
        matches!(self, Self::Federated | Self::Both)
    }
}

impl FromStr for AuthProvider {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreErrorResult<Self> {
        match s {
            "local" => Ok(Self::Local),
            "federated" => Ok(Self::Federated),
            "both" => Ok(Self::Both),
            _ => Err(CoreError::InvalidAuthProvider {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

impl std::fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
