//! HTTP client for the hosted backend
//!
//! Speaks the hosted backend's PostgREST-style data surface
//! (`/rest/v1/{collection}` with `order=` / `field=eq.` parameters and
//! `id=eq.` row addressing) and its auth endpoints (`/auth/v1/token`,
//! `/auth/v1/signup`, `/auth/v1/logout`). Realtime notifications arrive over
//! a websocket whose text frames are JSON [`ChangeEnvelope`]s; a background
//! reader republishes them into the local [`ChangeFeed`] so pages subscribe
//! the same way regardless of backend.
//!
//! Non-2xx responses surface the backend's own `message` string verbatim —
//! the forms render it inline without rewording.

use crate::auth::{Session, UserRole};
use crate::backend::Backend;
use crate::config::{AppConfig, BackendConfig};
use crate::core::{
    AuthError, BackendError, ChangeEnvelope, ChangeFeed, ChangeSubscription, Query, SortDirection,
};
use async_trait::async_trait;
use futures_util::StreamExt;
use serde::Deserialize;
use serde_json::Value;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use uuid::Uuid;

/// Client for a hosted PostgREST-style backend
#[derive(Clone)]
pub struct RestBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    realtime_url: Option<String>,
    feed: ChangeFeed,
    session: Arc<RwLock<Option<Session>>>,
}

impl RestBackend {
    pub fn new(config: &BackendConfig, feed_capacity: usize) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            realtime_url: config.realtime_url.clone(),
            feed: ChangeFeed::new(feed_capacity),
            session: Arc::new(RwLock::new(None)),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.backend, config.feed.capacity)
    }

    /// Start the realtime reader, if a realtime URL is configured
    ///
    /// The reader reconnects with a fixed backoff; dropped frames are
    /// harmless because subscribers refetch the whole collection on any
    /// notification. Abort the returned handle to stop it.
    pub fn start_realtime(&self) -> Option<JoinHandle<()>> {
        let url = self.realtime_url.clone()?;
        let feed = self.feed.clone();
        Some(tokio::spawn(async move {
            loop {
                match connect_async(&url).await {
                    Ok((mut stream, _)) => {
                        tracing::info!(url = %url, "realtime change feed connected");
                        while let Some(frame) = stream.next().await {
                            match frame {
                                Ok(Message::Text(text)) => {
                                    match serde_json::from_str::<ChangeEnvelope>(text.as_str()) {
                                        Ok(envelope) => {
                                            feed.publish(envelope.event);
                                        }
                                        Err(e) => {
                                            tracing::warn!(error = %e, "unparseable change frame");
                                        }
                                    }
                                }
                                Ok(Message::Close(_)) => break,
                                Ok(_) => continue,
                                Err(e) => {
                                    tracing::warn!(error = %e, "realtime stream error");
                                    break;
                                }
                            }
                        }
                        tracing::info!("realtime change feed disconnected");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "realtime connection failed");
                    }
                }
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
        }))
    }

    fn rest_url(&self, collection: &str) -> String {
        format!("{}/rest/v1/{collection}", self.base_url)
    }

    fn auth_url(&self, endpoint: &str) -> String {
        format!("{}/auth/v1/{endpoint}", self.base_url)
    }

    fn access_token(&self) -> Option<String> {
        self.session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.header("apikey", &self.api_key);
        match self.access_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(BackendError::Api {
            status: status.as_u16(),
            message: extract_message(&body),
        })
    }

    fn store_session(&self, session: Option<Session>) {
        *self.session.write().unwrap_or_else(|e| e.into_inner()) = session;
    }
}

/// Render a query as PostgREST query-string parameters
fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    for filter in &query.filters {
        params.push((filter.field.clone(), format!("eq.{}", filter.value)));
    }
    if !query.order.is_empty() {
        let order = query
            .order
            .iter()
            .map(|key| {
                let direction = match key.direction {
                    SortDirection::Ascending => "asc",
                    SortDirection::Descending => "desc",
                };
                format!("{}.{direction}", key.field)
            })
            .collect::<Vec<_>>()
            .join(",");
        params.push(("order".to_string(), order));
    }
    params
}

/// Pull the backend's message string out of an error body
///
/// Falls back to the raw body when it isn't the usual `{"message": ...}`
/// shape, so the user still sees whatever the backend said.
fn extract_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error_description"))
                .or_else(|| v.get("msg"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    access_token: String,
    user: AuthUser,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: Uuid,
    email: String,
    #[serde(default)]
    user_metadata: AuthMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct AuthMetadata {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    role: Option<UserRole>,
}

impl AuthResponse {
    fn into_session(self) -> Session {
        Session {
            user_id: self.user.id,
            name: self.user.user_metadata.name.unwrap_or_default(),
            role: self.user.user_metadata.role.unwrap_or(UserRole::Employee),
            email: self.user.email,
            access_token: self.access_token,
        }
    }
}

async fn auth_response(response: reqwest::Response) -> Result<AuthResponse, AuthError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AuthError::Rejected(extract_message(&body)));
    }
    response
        .json::<AuthResponse>()
        .await
        .map_err(|e| AuthError::Transport(e.to_string()))
}

#[async_trait]
impl Backend for RestBackend {
    async fn fetch(&self, collection: &str, query: &Query) -> Result<Vec<Value>, BackendError> {
        let response = self
            .authed(self.http.get(self.rest_url(collection)))
            .query(&query_params(query))
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        let response = Self::ensure_success(response).await?;
        response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| BackendError::Decode {
                collection: collection.to_string(),
                message: e.to_string(),
            })
    }

    async fn insert(&self, collection: &str, rows: Vec<Value>) -> Result<(), BackendError> {
        let response = self
            .authed(self.http.post(self.rest_url(collection)))
            .header("Prefer", "return=minimal")
            .json(&rows)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn update(&self, collection: &str, id: Uuid, patch: Value) -> Result<(), BackendError> {
        let response = self
            .authed(self.http.patch(self.rest_url(collection)))
            .query(&[("id", format!("eq.{id}"))])
            .json(&patch)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<(), BackendError> {
        let response = self
            .authed(self.http.delete(self.rest_url(collection)))
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    fn subscribe(&self, collection: &str) -> ChangeSubscription {
        self.feed.subscribe_collection(collection)
    }

    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        Ok(self
            .session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let response = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({"email": email, "password": password}))
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        let session = auth_response(response).await?.into_session();
        self.store_session(Some(session.clone()));
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: UserRole,
    ) -> Result<Session, AuthError> {
        let response = self
            .http
            .post(self.auth_url("signup"))
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "data": {"name": name, "role": role},
            }))
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        let session = auth_response(response).await?.into_session();
        self.store_session(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let request = self.authed(self.http.post(self.auth_url("logout")));
        self.store_session(None);
        if let Err(e) = request.send().await {
            tracing::warn!(error = %e, "logout request failed; local session cleared");
        }
        Ok(())
    }
}
