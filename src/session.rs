use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use dashmap::DashMap;
use uuid::Uuid;

/// Header the client echoes back to stay on the same session. Transport
/// (cookies vs. native clients) is the caller's business; the server only
/// needs a stable opaque id per session.
pub const SESSION_HEADER: &str = "x-session-id";

/// Per-session state. Lives in process memory only; the sign-in attempt
/// counter exists for anonymous sessions too and is never persisted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Session {
    pub user_id: Option<Uuid>,
    pub login_attempts: u32,
}

/// In-memory session store keyed by session id. Entries are created at zero
/// on first access. Shard locks in the map serialize concurrent mutations of
/// the same session.
#[derive(Default)]
pub struct SessionStore {
    inner: DashMap<Uuid, Session>,
}

impl SessionStore {
    pub fn login_attempts(&self, sid: Uuid) -> u32 {
        self.inner.entry(sid).or_default().login_attempts
    }

    /// Count one failed sign-in. Returns the new counter value.
    pub fn record_failed_login(&self, sid: Uuid) -> u32 {
        let mut session = self.inner.entry(sid).or_default();
        session.login_attempts += 1;
        session.login_attempts
    }

    /// Bind a user to the session and wipe the failure counter. The only
    /// ways the counter goes down are this and `sign_out` — no decay.
    pub fn sign_in(&self, sid: Uuid, user_id: Uuid) {
        let mut session = self.inner.entry(sid).or_default();
        session.user_id = Some(user_id);
        session.login_attempts = 0;
    }

    /// Clear auth state and the failure counter. Valid on sessions that
    /// never signed in.
    pub fn sign_out(&self, sid: Uuid) {
        let mut session = self.inner.entry(sid).or_default();
        session.user_id = None;
        session.login_attempts = 0;
    }

    pub fn current_user(&self, sid: Uuid) -> Option<Uuid> {
        self.inner.get(&sid).and_then(|s| s.user_id)
    }
}

/// Extracts the caller's session id from `X-Session-Id`, minting a fresh one
/// when the header is absent or unparsable. Handlers return the id in their
/// response so the client can echo it on the next request.
pub struct SessionId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let sid = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v).ok())
            .unwrap_or_else(Uuid::new_v4);
        Ok(SessionId(sid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_starts_at_zero_for_anonymous_sessions() {
        let store = SessionStore::default();
        let sid = Uuid::new_v4();
        assert_eq!(store.login_attempts(sid), 0);
        assert_eq!(store.current_user(sid), None);
    }

    #[test]
    fn failed_logins_accumulate_per_session() {
        let store = SessionStore::default();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(store.record_failed_login(a), 1);
        assert_eq!(store.record_failed_login(a), 2);
        assert_eq!(store.record_failed_login(a), 3);
        // another session is untouched
        assert_eq!(store.login_attempts(b), 0);
    }

    #[test]
    fn sign_in_resets_counter_from_any_value() {
        let store = SessionStore::default();
        let sid = Uuid::new_v4();
        for _ in 0..3 {
            store.record_failed_login(sid);
        }
        let user = Uuid::new_v4();
        store.sign_in(sid, user);
        assert_eq!(store.login_attempts(sid), 0);
        assert_eq!(store.current_user(sid), Some(user));
    }

    #[test]
    fn sign_out_works_without_prior_sign_in() {
        let store = SessionStore::default();
        let sid = Uuid::new_v4();
        store.record_failed_login(sid);
        store.sign_out(sid);
        assert_eq!(store.login_attempts(sid), 0);
        assert_eq!(store.current_user(sid), None);
    }

    #[test]
    fn sign_out_terminates_the_bound_user() {
        let store = SessionStore::default();
        let sid = Uuid::new_v4();
        store.sign_in(sid, Uuid::new_v4());
        store.sign_out(sid);
        assert_eq!(store.current_user(sid), None);
    }
}
