//! Challenges between lobby users.
//!
//! ```text
//! PENDING ──accept──▶ ACCEPTED
//!    │ ├──decline──▶ DECLINED
//!    │ └──cancel───▶ CANCELLED
//!    └────ttl─────▶ EXPIRED
//! ```

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChallengeId(pub u64);

impl std::fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChallengeStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
    Cancelled,
    Expired,
}

/// One user's invitation to another.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: ChallengeId,
    pub from: String,
    pub to: String,
    pub status: ChallengeStatus,
    /// Unix milliseconds after which the challenge expires.
    pub expires_at: u64,
}

impl Challenge {
    #[must_use]
    pub fn new(id: ChallengeId, from: impl Into<String>, to: impl Into<String>, ttl: Duration) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self {
            id,
            from: from.into(),
            to: to.into(),
            status: ChallengeStatus::Pending,
            expires_at: u64::try_from((now + ttl).as_millis()).unwrap_or(u64::MAX),
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == ChallengeStatus::Pending
    }

    #[must_use]
    pub fn involves(&self, identity: &str) -> bool {
        self.from == identity || self.to == identity
    }

    /// The party that is not `identity`.
    #[must_use]
    pub fn counterpart(&self, identity: &str) -> &str {
        if self.from == identity {
            &self.to
        } else {
            &self.from
        }
    }

    /// Move out of `Pending`. Returns false if already resolved.
    pub fn resolve(&mut self, status: ChallengeStatus) -> bool {
        if !self.is_pending() || status == ChallengeStatus::Pending {
            return false;
        }
        self.status = status;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_once() {
        let mut challenge = Challenge::new(ChallengeId(1), "alice", "bob", Duration::from_secs(30));
        assert!(challenge.is_pending());
        assert!(challenge.resolve(ChallengeStatus::Declined));
        assert!(!challenge.resolve(ChallengeStatus::Accepted));
        assert_eq!(challenge.status, ChallengeStatus::Declined);
    }

    #[test]
    fn test_parties() {
        let challenge = Challenge::new(ChallengeId(1), "alice", "bob", Duration::from_secs(30));
        assert!(challenge.involves("alice"));
        assert!(!challenge.involves("carol"));
        assert_eq!(challenge.counterpart("alice"), "bob");
        assert_eq!(challenge.counterpart("bob"), "alice");
    }

    #[test]
    fn test_json_shape() {
        let challenge = Challenge::new(ChallengeId(4), "alice", "bob", Duration::from_secs(30));
        let json: serde_json::Value = serde_json::to_value(&challenge).unwrap();
        assert_eq!(json["id"], 4);
        assert_eq!(json["status"], "PENDING");
        assert!(json["expiresAt"].as_u64().unwrap() > 0);
    }
}
