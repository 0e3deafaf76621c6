use chrono::{DateTime, Utc};
use serde::Serialize;
use std::str::FromStr;

/// Role a member holds in a club.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipRole {
    Owner,
    Admin,
    Member,
}

impl MembershipRole {
    /// Owners and admins see club-wide reporting.
    pub fn can_manage(&self) -> bool {
        matches!(self, MembershipRole::Owner | MembershipRole::Admin)
    }
}

impl FromStr for MembershipRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(MembershipRole::Owner),
            "admin" => Ok(MembershipRole::Admin),
            "member" => Ok(MembershipRole::Member),
            other => Err(format!("unknown membership role: {other}")),
        }
    }
}

impl TryFrom<String> for MembershipRole {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A member's membership in a club, with the club name joined in for display.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Membership {
    pub club_id: i64,
    pub club_name: String,
    pub member_id: i64,
    #[sqlx(try_from = "String")]
    pub role: MembershipRole,
    pub joined_at: DateTime<Utc>,
}
