use metrics::counter;

/// Counters for the session lifecycle
#[derive(Debug, Clone, Copy)]
pub struct AuthMetrics {
    prefix: &'static str,
}

impl Default for AuthMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthMetrics {
    pub fn new() -> Self {
        Self { prefix: "kg_auth" }
    }

    pub fn session_admitted(&self) {
        counter!(format!("{}.sessions.admitted", self.prefix)).increment(1);
    }

    pub fn sessions_evicted(&self, count: usize) {
        if count > 0 {
            counter!(format!("{}.sessions.evicted", self.prefix)).increment(count as u64);
        }
    }

    pub fn session_rotated(&self) {
        counter!(format!("{}.sessions.rotated", self.prefix)).increment(1);
    }

    /// A signed refresh token was presented that is no longer active
    pub fn replay_rejected(&self) {
        counter!(format!("{}.sessions.replay_rejected", self.prefix)).increment(1);
    }

    pub fn session_revoked(&self) {
        counter!(format!("{}.sessions.revoked", self.prefix)).increment(1);
    }

    pub fn conflict_retry(&self, operation: &str) {
        counter!(format!("{}.store.conflict_retries", self.prefix)).increment(1);
        counter!(format!("{}.store.conflict_retries.{}", self.prefix, operation)).increment(1);
    }

    pub fn federated_login(&self, outcome: &str) {
        counter!(format!("{}.federated.{}", self.prefix, outcome)).increment(1);
    }
}
