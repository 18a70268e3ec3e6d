//! Subscriber account records and feature gating.

use serde::Deserialize;

/// Access level of a subscriber account. New accounts start FREE; an admin
/// (or a separate expiry job) moves them between tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserStatus {
    #[default]
    Free,
    Active,
    Blocked,
}

impl UserStatus {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_uppercase().as_str() {
            "FREE" => Some(UserStatus::Free),
            "ACTIVE" => Some(UserStatus::Active),
            "BLOCKED" => Some(UserStatus::Blocked),
            _ => None,
        }
    }

    /// Live trades are visible to ACTIVE subscribers only. The subscription
    /// end date is advisory and never gates access by itself.
    pub fn can_view_live_trades(self) -> bool {
        self == UserStatus::Active
    }

    pub fn can_receive_push(self) -> bool {
        self == UserStatus::Active
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Free => f.write_str("FREE"),
            UserStatus::Active => f.write_str("ACTIVE"),
            UserStatus::Blocked => f.write_str("BLOCKED"),
        }
    }
}

/// A subscriber account as stored. `fcmToken` is the legacy name for the
/// push token field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub phone: String,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default, alias = "fcmToken")]
    pub push_token: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// ISO date; meaningful only while `status` is ACTIVE.
    #[serde(default)]
    pub subscription_end_date: Option<String>,
}

/// Account counts by status, as shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserDistribution {
    pub total: usize,
    pub free: usize,
    pub active: usize,
    pub blocked: usize,
}

impl UserDistribution {
    pub fn compute(users: &[UserRecord]) -> Self {
        let mut dist = UserDistribution {
            total: users.len(),
            ..UserDistribution::default()
        };
        for user in users {
            match user.status {
                UserStatus::Free => dist.free += 1,
                UserStatus::Active => dist.active += 1,
                UserStatus::Blocked => dist.blocked += 1,
            }
        }
        dist
    }
}
