//! Shared test infrastructure.
//!
//! `MemoryStore` answers the `ClubStore` port from plain vectors so handlers
//! and services can be exercised without a database. Build one with the
//! `with_*` helpers, then hand it to `get` or call services directly.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use actix_session::{Session, SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::http::StatusCode;
use actix_web::http::header::HeaderMap;
use actix_web::web::Bytes;
use actix_web::{App, HttpResponse, test, web};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

use clubdash::auth::session::MEMBER_ID_KEY;
use clubdash::handlers;
use clubdash::models::{
    Attendance, AttendanceStatus, Event, Member, Membership, MembershipRole, Registration,
};
use clubdash::store::ClubStore;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const CLUB_ID: i64 = 1;
pub const CLUB_NAME: &str = "Riverside Rugby";
pub const OWNER_ID: i64 = 10;
pub const PLAYER_ID: i64 = 20;
pub const OTHER_PLAYER_ID: i64 = 30;

pub fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

#[derive(Default, Clone)]
pub struct MemoryStore {
    pub members: Vec<Member>,
    pub club_names: HashMap<i64, String>,
    pub memberships: Vec<(i64, i64, MembershipRole)>,
    pub events: Vec<Event>,
    pub registrations: Vec<Registration>,
    pub attendances: Vec<Attendance>,
    /// Every query fails with a pool timeout.
    pub failing: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_club(mut self, club_id: i64, name: &str) -> Self {
        self.club_names.insert(club_id, name.to_string());
        self
    }

    pub fn with_member(mut self, club_id: i64, member_id: i64, name: &str, role: MembershipRole) -> Self {
        if !self.members.iter().any(|m| m.id == member_id) {
            self.members.push(Member {
                id: member_id,
                display_name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                created_at: timestamp(),
            });
        }
        self.memberships.push((club_id, member_id, role));
        self
    }

    pub fn with_event(mut self, id: i64, club_id: i64, event_type: &str, date: NaiveDate, time: &str, duration: Option<i32>) -> Self {
        self.events.push(Event {
            id,
            club_id,
            title: format!("{event_type} #{id}"),
            event_type: event_type.to_string(),
            date,
            time: time.to_string(),
            duration_minutes: duration,
            location: "Home ground".to_string(),
            capacity: Some(40),
        });
        self
    }

    pub fn with_registration(mut self, event_id: i64, member_id: i64) -> Self {
        self.registrations.push(Registration {
            event_id,
            member_id,
            created_at: timestamp(),
        });
        self
    }

    pub fn with_attendance(mut self, event_id: i64, member_id: i64, status: AttendanceStatus) -> Self {
        self.attendances.push(Attendance {
            event_id,
            member_id,
            status,
            recorded_at: timestamp(),
        });
        self
    }

    /// Weekly events for `member_id`, oldest first, ending the day before `today`.
    /// `pattern` uses P (present), A (absent) and U (registered, unmarked).
    pub fn with_weekly_history(mut self, first_id: i64, member_id: i64, today: NaiveDate, pattern: &str) -> Self {
        let count = pattern.chars().count() as i64;
        for (i, c) in pattern.chars().enumerate() {
            let id = first_id + i as i64;
            let date = today - Duration::days(1 + 7 * (count - 1 - i as i64));
            self = self
                .with_event(id, CLUB_ID, "training", date, "18:00", Some(90))
                .with_registration(id, member_id);
            self = match c {
                'P' => self.with_attendance(id, member_id, AttendanceStatus::Present),
                'A' => self.with_attendance(id, member_id, AttendanceStatus::Absent),
                _ => self,
            };
        }
        self
    }

    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    fn check(&self) -> Result<(), sqlx::Error> {
        if self.failing {
            Err(sqlx::Error::PoolTimedOut)
        } else {
            Ok(())
        }
    }

    fn membership(&self, club_id: i64, member_id: i64, role: MembershipRole) -> Membership {
        Membership {
            club_id,
            club_name: self.club_names.get(&club_id).cloned().unwrap_or_default(),
            member_id,
            role,
            joined_at: timestamp(),
        }
    }

    fn club_event_ids(&self, club_id: i64) -> Vec<i64> {
        self.events
            .iter()
            .filter(|e| e.club_id == club_id)
            .map(|e| e.id)
            .collect()
    }

    fn sorted(mut events: Vec<Event>) -> Vec<Event> {
        events.sort_by(|a, b| (a.date, &a.time, a.id).cmp(&(b.date, &b.time, b.id)));
        events
    }
}

#[async_trait]
impl ClubStore for MemoryStore {
    async fn member(&self, member_id: i64) -> Result<Option<Member>, sqlx::Error> {
        self.check()?;
        Ok(self.members.iter().find(|m| m.id == member_id).cloned())
    }

    async fn members_of_club(&self, club_id: i64) -> Result<Vec<Member>, sqlx::Error> {
        self.check()?;
        Ok(self
            .members
            .iter()
            .filter(|m| self.memberships.iter().any(|(c, id, _)| *c == club_id && *id == m.id))
            .cloned()
            .collect())
    }

    async fn memberships_of_member(&self, member_id: i64) -> Result<Vec<Membership>, sqlx::Error> {
        self.check()?;
        Ok(self
            .memberships
            .iter()
            .filter(|(_, id, _)| *id == member_id)
            .map(|(club, id, role)| self.membership(*club, *id, *role))
            .collect())
    }

    async fn memberships_of_club(&self, club_id: i64) -> Result<Vec<Membership>, sqlx::Error> {
        self.check()?;
        Ok(self
            .memberships
            .iter()
            .filter(|(club, _, _)| *club == club_id)
            .map(|(club, id, role)| self.membership(*club, *id, *role))
            .collect())
    }

    async fn events_of_clubs(&self, club_ids: &[i64]) -> Result<Vec<Event>, sqlx::Error> {
        self.check()?;
        Ok(Self::sorted(
            self.events
                .iter()
                .filter(|e| club_ids.contains(&e.club_id))
                .cloned()
                .collect(),
        ))
    }

    async fn registered_events(&self, member_id: i64) -> Result<Vec<Event>, sqlx::Error> {
        self.check()?;
        Ok(Self::sorted(
            self.events
                .iter()
                .filter(|e| {
                    self.registrations
                        .iter()
                        .any(|r| r.event_id == e.id && r.member_id == member_id)
                })
                .cloned()
                .collect(),
        ))
    }

    async fn registrations_of_member(&self, member_id: i64) -> Result<Vec<Registration>, sqlx::Error> {
        self.check()?;
        Ok(self
            .registrations
            .iter()
            .filter(|r| r.member_id == member_id)
            .cloned()
            .collect())
    }

    async fn attendances_of_member(&self, member_id: i64) -> Result<Vec<Attendance>, sqlx::Error> {
        self.check()?;
        Ok(self
            .attendances
            .iter()
            .filter(|a| a.member_id == member_id)
            .cloned()
            .collect())
    }

    async fn registrations_of_club(&self, club_id: i64) -> Result<Vec<Registration>, sqlx::Error> {
        self.check()?;
        let ids = self.club_event_ids(club_id);
        Ok(self
            .registrations
            .iter()
            .filter(|r| ids.contains(&r.event_id))
            .cloned()
            .collect())
    }

    async fn attendances_of_club(&self, club_id: i64) -> Result<Vec<Attendance>, sqlx::Error> {
        self.check()?;
        let ids = self.club_event_ids(club_id);
        Ok(self
            .attendances
            .iter()
            .filter(|a| ids.contains(&a.event_id))
            .cloned()
            .collect())
    }
}

// ============================================================================
// APP SETUP
// ============================================================================

/// Stand-in for the auth provider callback: puts `member_id` in the session.
async fn sign_in(session: Session, path: web::Path<i64>) -> HttpResponse {
    match session.insert(MEMBER_ID_KEY, path.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}

/// The production route table over `store`, plus `/test/sign-in/{id}`.
pub fn test_app(
    store: MemoryStore,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let store: Arc<dyn ClubStore> = Arc::new(store);
    App::new()
        .wrap(
            SessionMiddleware::builder(CookieSessionStore::default(), Key::from(&[7u8; 64]))
                .cookie_secure(false)
                .build(),
        )
        .app_data(web::Data::from(store))
        .route("/test/sign-in/{id}", web::post().to(sign_in))
        .service(web::scope("/api/v1").configure(handlers::api_v1::configure))
}

/// Response pieces a test asserts on.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("JSON body")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).expect("UTF-8 body")
    }
}

/// GET `uri` against a fresh app over `store`, signed in as `viewer` when given.
pub async fn get(store: MemoryStore, viewer: Option<i64>, uri: &str) -> TestResponse {
    let app = test::init_service(test_app(store)).await;

    let mut req = test::TestRequest::get().uri(uri);
    if let Some(member_id) = viewer {
        let sign_in = test::TestRequest::post()
            .uri(&format!("/test/sign-in/{member_id}"))
            .to_request();
        let resp = test::call_service(&app, sign_in).await;
        assert!(resp.status().is_success(), "sign-in failed");
        let cookie = resp
            .response()
            .cookies()
            .next()
            .expect("session cookie")
            .into_owned();
        req = req.cookie(cookie);
    }

    let resp = test::call_service(&app, req.to_request()).await;
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = test::read_body(resp).await;
    TestResponse { status, headers, body }
}
