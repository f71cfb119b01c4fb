use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Stored state of an issued refresh token.
///
/// `used` and `invalid` only ever go from false to true, and `expires_at`
/// is fixed when the record is created.
#[derive(Debug, Clone)]
pub struct RefreshTokenRecord {
    pub token: String,
    /// Signing-session identifier recorded alongside the token.
    pub jwt_id: String,
    pub administrator_id: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub invalid: bool,
}

impl RefreshTokenRecord {
    /// Fresh, unused record expiring `ttl` from now.
    pub fn issue(token: String, administrator_id: i64, ttl: Duration) -> Self {
        let created_at = Utc::now();
        Self {
            token,
            jwt_id: Uuid::new_v4().to_string(),
            administrator_id,
            created_at,
            expires_at: created_at + ttl,
            used: false,
            invalid: false,
        }
    }

    /// Redeemable iff neither flag is set and expiry is strictly in the future.
    pub fn is_redeemable_at(&self, now: DateTime<Utc>) -> bool {
        !self.used && !self.invalid && self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_sets_fixed_expiry() {
        let record = RefreshTokenRecord::issue("tok".into(), 1, Duration::days(7));
        assert_eq!(record.expires_at - record.created_at, Duration::days(7));
        assert!(!record.used);
        assert!(!record.invalid);
        assert!(record.is_redeemable_at(Utc::now()));
    }

    #[test]
    fn test_not_redeemable_when_flagged_or_expired() {
        let now = Utc::now();
        let record = RefreshTokenRecord::issue("tok".into(), 1, Duration::days(7));

        let mut used = record.clone();
        used.used = true;
        assert!(!used.is_redeemable_at(now));

        let mut invalid = record.clone();
        invalid.invalid = true;
        assert!(!invalid.is_redeemable_at(now));

        assert!(!record.is_redeemable_at(record.expires_at));
        assert!(!record.is_redeemable_at(record.expires_at + Duration::seconds(1)));
    }
}
