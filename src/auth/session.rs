use actix_session::Session;

/// Session key the auth provider's callback stores the signed-in member under.
pub const MEMBER_ID_KEY: &str = "member_id";

/// The signed-in member, if any. Unreadable session state counts as signed out.
pub fn get_member_id(session: &Session) -> Option<i64> {
    match session.get::<i64>(MEMBER_ID_KEY) {
        Ok(id) => id,
        Err(e) => {
            log::warn!("Unreadable session state: {e}");
            None
        }
    }
}
