//! Read-only query port over the club database.
//!
//! Services only see [`ClubStore`]; [`PgStore`] answers it from Postgres.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::{
    attendance, event, member, membership, registration, Attendance, Event, Member, Membership,
    Registration,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClubStore: Send + Sync {
    async fn member(&self, member_id: i64) -> Result<Option<Member>, sqlx::Error>;

    async fn members_of_club(&self, club_id: i64) -> Result<Vec<Member>, sqlx::Error>;

    async fn memberships_of_member(&self, member_id: i64) -> Result<Vec<Membership>, sqlx::Error>;

    async fn memberships_of_club(&self, club_id: i64) -> Result<Vec<Membership>, sqlx::Error>;

    /// Events of the given clubs, ordered by date then time.
    async fn events_of_clubs(&self, club_ids: &[i64]) -> Result<Vec<Event>, sqlx::Error>;

    /// Events the member registered for, ordered by date then time.
    async fn registered_events(&self, member_id: i64) -> Result<Vec<Event>, sqlx::Error>;

    async fn registrations_of_member(&self, member_id: i64) -> Result<Vec<Registration>, sqlx::Error>;

    async fn attendances_of_member(&self, member_id: i64) -> Result<Vec<Attendance>, sqlx::Error>;

    async fn registrations_of_club(&self, club_id: i64) -> Result<Vec<Registration>, sqlx::Error>;

    async fn attendances_of_club(&self, club_id: i64) -> Result<Vec<Attendance>, sqlx::Error>;
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }
}

#[async_trait]
impl ClubStore for PgStore {
    async fn member(&self, member_id: i64) -> Result<Option<Member>, sqlx::Error> {
        member::find_by_id(&self.pool, member_id).await
    }

    async fn members_of_club(&self, club_id: i64) -> Result<Vec<Member>, sqlx::Error> {
        member::find_by_club(&self.pool, club_id).await
    }

    async fn memberships_of_member(&self, member_id: i64) -> Result<Vec<Membership>, sqlx::Error> {
        membership::find_by_member(&self.pool, member_id).await
    }

    async fn memberships_of_club(&self, club_id: i64) -> Result<Vec<Membership>, sqlx::Error> {
        membership::find_by_club(&self.pool, club_id).await
    }

    async fn events_of_clubs(&self, club_ids: &[i64]) -> Result<Vec<Event>, sqlx::Error> {
        event::find_by_clubs(&self.pool, club_ids).await
    }

    async fn registered_events(&self, member_id: i64) -> Result<Vec<Event>, sqlx::Error> {
        event::find_registered_by_member(&self.pool, member_id).await
    }

    async fn registrations_of_member(&self, member_id: i64) -> Result<Vec<Registration>, sqlx::Error> {
        registration::find_by_member(&self.pool, member_id).await
    }

    async fn attendances_of_member(&self, member_id: i64) -> Result<Vec<Attendance>, sqlx::Error> {
        attendance::find_by_member(&self.pool, member_id).await
    }

    async fn registrations_of_club(&self, club_id: i64) -> Result<Vec<Registration>, sqlx::Error> {
        registration::find_by_club(&self.pool, club_id).await
    }

    async fn attendances_of_club(&self, club_id: i64) -> Result<Vec<Attendance>, sqlx::Error> {
        attendance::find_by_club(&self.pool, club_id).await
    }
}
