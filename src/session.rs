use crate::models::{User, UserId};
use crate::state::AppState;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::response::Redirect;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "water_session";

/// What the web layer knows about the signed-in user for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub token: String,
    pub user_id: UserId,
    pub username: String,
    pub goal: Option<f64>,
    pub current: Option<f64>,
}

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, SessionContext>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, user: &User) -> SessionContext {
        let context = SessionContext {
            token: Uuid::new_v4().simple().to_string(),
            user_id: user.id,
            username: user.username.clone(),
            goal: user.daily_goal,
            current: None,
        };
        self.sessions
            .lock()
            .await
            .insert(context.token.clone(), context.clone());
        context
    }

    pub async fn get(&self, token: &str) -> Option<SessionContext> {
        self.sessions.lock().await.get(token).cloned()
    }

    pub async fn remove(&self, token: &str) -> Option<SessionContext> {
        self.sessions.lock().await.remove(token)
    }

    pub async fn set_goal(&self, token: &str, goal: f64) {
        if let Some(context) = self.sessions.lock().await.get_mut(token) {
            context.goal = Some(goal);
        }
    }

    pub async fn set_current(&self, token: &str, current: f64) {
        if let Some(context) = self.sessions.lock().await.get_mut(token) {
            context.current = Some(current);
        }
    }
}

/// No `Max-Age`, so the browser drops it when closed.
pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.to_string())
        .filter(|token| !token.is_empty())
}

/// Guard for pages that need a signed-in user.
pub struct LoggedIn(pub SessionContext);

#[async_trait]
impl FromRequestParts<AppState> for LoggedIn {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers) else {
            return Err(Redirect::to("/login"));
        };
        match state.sessions.get(&token).await {
            Some(context) => Ok(Self(context)),
            None => Err(Redirect::to("/login")),
        }
    }
}

/// Guard for pages that also need a daily goal on file.
pub struct GoalSet {
    pub session: SessionContext,
    pub goal: f64,
}

#[async_trait]
impl FromRequestParts<AppState> for GoalSet {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let LoggedIn(session) = LoggedIn::from_request_parts(parts, state).await?;
        match session.goal {
            Some(goal) => Ok(Self { session, goal }),
            None => Err(Redirect::to("/goal")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn user() -> User {
        User {
            id: UserId(7),
            username: "ada".to_string(),
            password_hash: String::new(),
            daily_goal: None,
        }
    }

    #[test]
    fn token_is_read_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; water_session=abc123; other=1"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn missing_or_empty_cookie_has_no_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);
        headers.insert(COOKIE, HeaderValue::from_static("water_session="));
        assert_eq!(session_token(&headers), None);
    }

    #[tokio::test]
    async fn store_tracks_goal_and_current() {
        let store = SessionStore::new();
        let created = store.create(&user()).await;
        assert_eq!(created.goal, None);

        store.set_goal(&created.token, 2450.0).await;
        store.set_current(&created.token, 300.0).await;
        let fetched = store.get(&created.token).await.unwrap();
        assert_eq!(fetched.goal, Some(2450.0));
        assert_eq!(fetched.current, Some(300.0));
        assert_eq!(fetched.user_id, UserId(7));

        store.remove(&created.token).await;
        assert!(store.get(&created.token).await.is_none());
    }
}
