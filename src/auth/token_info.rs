use std::time::Duration;
use tokio::time::Instant;

/// Validity of the cached login token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    /// No login has succeeded yet.
    NeverFetched,
    /// Token lease ends at the given instant.
    ValidUntil(Instant),
    /// Login returned no lease duration; valid until explicitly refreshed.
    ValidIndefinitely,
}

impl TokenStatus {
    /// Status for a token obtained at `now` with the given lease (seconds).
    ///
    /// A lease of zero or less, or one too long to represent, never expires.
    pub fn from_lease(lease_duration: i64, now: Instant) -> Self {
        u64::try_from(lease_duration)
            .ok()
            .filter(|secs| *secs > 0)
            .and_then(|secs| now.checked_add(Duration::from_secs(secs)))
            .map_or(TokenStatus::ValidIndefinitely, TokenStatus::ValidUntil)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        match self {
            TokenStatus::ValidUntil(valid_until) => now > *valid_until,
            _ => false,
        }
    }

    /// Whether a login is needed before a token can be handed out.
    pub fn needs_login(&self, now: Instant) -> bool {
        matches!(self, TokenStatus::NeverFetched) || self.is_expired(now)
    }
}
