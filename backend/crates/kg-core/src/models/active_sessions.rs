//! Per-identity list of refresh tokens that may still be redeemed.
//!
//! The list is the single source of truth for session validity: a refresh
//! token whose signature is still good but which is no longer listed here
//! is dead. Entries are kept in admission order so that eviction always
//! drops the oldest session first.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveSessions(Vec<String>);

impl ActiveSessions {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a newly issued refresh token, then drop the oldest entries until
    /// at most `max_active` remain.
    ///
    /// Returns the evicted tokens, oldest first. A `max_active` of zero is
    /// treated as one so the session being admitted always survives.
    pub fn admit(&mut self, token: String, max_active: usize) -> Vec<String> {
        let limit = max_active.max(1);
        self.0.push(token);

        if self.0.len() <= limit {
            return Vec::new();
        }

        let overflow = self.0.len() - limit;
        self.0.drain(..overflow).collect()
    }

    /// Replace `presented` with `replacement`, moving the session to the back
    /// of the list. Returns false (and leaves the list untouched) when
    /// `presented` is not an active token.
    pub fn rotate(&mut self, presented: &str, replacement: String) -> bool {
        if !self.remove(presented) {
            return false;
        }
        self.0.push(replacement);
        true
    }

    /// Remove one token. Idempotent: returns false when it was not present.
    pub fn remove(&mut self, token: &str) -> bool {
        match self.0.iter().position(|t| t == token) {
            Some(index) => {
                self.0.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.iter().any(|t| t == token)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for ActiveSessions {
    fn from(tokens: Vec<String>) -> Self {
        Self(tokens)
    }
}
