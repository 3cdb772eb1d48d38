use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{BASE_AD_LIMIT, ELEVATED_AD_LIMIT};

/// The session account as the ads backend reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Discord user id; also the filename prefix of submitted ads.
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub banned: bool,
}

impl Account {
    /// Verified, staff and admin accounts get the raised ceiling.
    pub fn ad_limit(&self) -> usize {
        if self.verified || self.is_staff || self.is_admin {
            ELEVATED_AD_LIMIT
        } else {
            BASE_AD_LIMIT
        }
    }
}

/// One advertisement row as returned by the ads backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdRecord {
    pub ad_id: i64,
    pub user_id: String,
    pub level_id: i64,
    #[serde(rename = "type")]
    pub slot_code: u8,
    pub image_url: String,
    /// Unix time of expiration.
    pub expiry: i64,
    #[serde(default)]
    pub pending: bool,
}

impl AdRecord {
    /// Pending and approved ads both count as active until they expire.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expiry > now.timestamp()
    }
}

/// Read-only snapshot of how many ads an owner has active vs allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdQuota {
    pub active_count: usize,
    pub max: usize,
}

impl AdQuota {
    pub fn evaluate(account: &Account, ads: &[AdRecord], now: DateTime<Utc>) -> Self {
        let active_count = ads.iter().filter(|ad| ad.is_active(now)).count();
        AdQuota { active_count, max: account.ad_limit() }
    }

    pub fn exhausted(&self) -> bool {
        self.active_count >= self.max
    }
}

impl Default for AdQuota {
    fn default() -> Self {
        AdQuota { active_count: 0, max: BASE_AD_LIMIT }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account {
            id: "123".to_string(),
            username: "tester".to_string(),
            is_admin: false,
            is_staff: false,
            verified: false,
            banned: false,
        }
    }

    fn ad(expiry: i64) -> AdRecord {
        AdRecord {
            ad_id: 1,
            user_id: "123".to_string(),
            level_id: 500,
            slot_code: 1,
            image_url: "https://cdn.example/banner/123.webp".to_string(),
            expiry,
            pending: true,
        }
    }

    #[test]
    fn expired_ads_do_not_count() {
        let now = Utc::now();
        let ads = vec![ad(now.timestamp() + 3600), ad(now.timestamp() - 3600)];

        let quota = AdQuota::evaluate(&account(), &ads, now);

        assert_eq!(quota.active_count, 1);
        assert_eq!(quota.max, BASE_AD_LIMIT);
        assert!(!quota.exhausted());
    }

    #[test]
    fn elevated_accounts_get_the_raised_ceiling() {
        let patches: [fn(&mut Account); 3] = [
            |a| a.verified = true,
            |a| a.is_staff = true,
            |a| a.is_admin = true,
        ];
        for patch in patches {
            let mut account = account();
            patch(&mut account);
            assert_eq!(account.ad_limit(), ELEVATED_AD_LIMIT);
        }
        assert_eq!(account().ad_limit(), BASE_AD_LIMIT);
    }

    #[test]
    fn quota_is_exhausted_at_the_ceiling() {
        let now = Utc::now();
        let ads: Vec<_> = (0..BASE_AD_LIMIT as i64)
            .map(|_| ad(now.timestamp() + 60))
            .collect();

        let quota = AdQuota::evaluate(&account(), &ads, now);

        assert!(quota.exhausted());
    }
}
