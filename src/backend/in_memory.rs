//! In-memory backend for testing and development
//!
//! Implements the full [`Backend`] contract — ordered/filtered reads,
//! mutations that publish change notifications, and a small account registry
//! for the auth surface. Thread-safe via `RwLock`; cheap to clone, all clones
//! share the same store and change feed.

use crate::auth::{Session, UserRole};
use crate::backend::Backend;
use crate::core::{
    AuthError, BackendError, ChangeAction, ChangeEvent, ChangeFeed, ChangeSubscription, Query,
};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct StoredUser {
    id: Uuid,
    password: String,
    name: String,
    role: UserRole,
}

/// In-memory implementation of the hosted backend
#[derive(Clone)]
pub struct InMemoryBackend {
    collections: Arc<RwLock<HashMap<String, HashMap<Uuid, Value>>>>,
    users: Arc<RwLock<HashMap<String, StoredUser>>>,
    session: Arc<RwLock<Option<Session>>>,
    feed: ChangeFeed,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::with_feed(ChangeFeed::default())
    }

    /// Create a backend publishing into an existing feed
    pub fn with_feed(feed: ChangeFeed) -> Self {
        Self {
            collections: Arc::new(RwLock::new(HashMap::new())),
            users: Arc::new(RwLock::new(HashMap::new())),
            session: Arc::new(RwLock::new(None)),
            feed,
        }
    }

    /// The change feed mutations publish into
    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    /// Register an account directly (test/seed helper)
    ///
    /// Also materializes the matching `users` row so the roster query
    /// (`role = "employee"`, ordered by name) sees it.
    pub fn register_user(&self, email: &str, password: &str, name: &str, role: UserRole) -> Uuid {
        let id = Uuid::new_v4();
        self.users.write().unwrap_or_else(|e| e.into_inner()).insert(
            email.to_string(),
            StoredUser {
                id,
                password: password.to_string(),
                name: name.to_string(),
                role,
            },
        );
        let row = json!({
            "id": id,
            "name": name,
            "role": role,
        });
        self.put_row("users", id, row);
        id
    }

    fn put_row(&self, collection: &str, id: Uuid, row: Value) {
        self.collections
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entry(collection.to_string())
            .or_default()
            .insert(id, row.clone());
        self.feed.publish(ChangeEvent {
            collection: collection.to_string(),
            action: ChangeAction::Insert,
            row_id: id,
            row: Some(row),
        });
    }

    fn session_for(user: &StoredUser, email: &str) -> Session {
        Session {
            user_id: user.id,
            email: email.to_string(),
            name: user.name.clone(),
            role: user.role,
            access_token: Uuid::new_v4().simple().to_string(),
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn fetch(&self, collection: &str, query: &Query) -> Result<Vec<Value>, BackendError> {
        let collections = self
            .collections
            .read()
            .map_err(|e| BackendError::Store(format!("failed to acquire read lock: {e}")))?;

        let mut rows: Vec<Value> = collections
            .get(collection)
            .map(|rows| rows.values().filter(|r| query.matches(r)).cloned().collect())
            .unwrap_or_default();

        query.sort_rows(&mut rows);
        Ok(rows)
    }

    async fn insert(&self, collection: &str, rows: Vec<Value>) -> Result<(), BackendError> {
        let mut inserted = Vec::with_capacity(rows.len());
        {
            let mut collections = self
                .collections
                .write()
                .map_err(|e| BackendError::Store(format!("failed to acquire write lock: {e}")))?;
            let table = collections.entry(collection.to_string()).or_default();

            for mut row in rows {
                let Some(object) = row.as_object_mut() else {
                    return Err(BackendError::Store(
                        "insert payload must be a JSON object".to_string(),
                    ));
                };
                // Backend assigns the id when the client omits it
                let id = match object.get("id").and_then(Value::as_str) {
                    Some(s) => s.parse::<Uuid>().unwrap_or_else(|_| Uuid::new_v4()),
                    None => Uuid::new_v4(),
                };
                object.insert("id".to_string(), json!(id));
                table.insert(id, row.clone());
                inserted.push((id, row));
            }
        }

        for (id, row) in inserted {
            self.feed.publish(ChangeEvent {
                collection: collection.to_string(),
                action: ChangeAction::Insert,
                row_id: id,
                row: Some(row),
            });
        }
        Ok(())
    }

    async fn update(&self, collection: &str, id: Uuid, patch: Value) -> Result<(), BackendError> {
        let updated = {
            let mut collections = self
                .collections
                .write()
                .map_err(|e| BackendError::Store(format!("failed to acquire write lock: {e}")))?;

            let row = collections
                .get_mut(collection)
                .and_then(|table| table.get_mut(&id))
                .ok_or_else(|| BackendError::NotFound {
                    collection: collection.to_string(),
                    id,
                })?;

            if let (Some(target), Some(fields)) = (row.as_object_mut(), patch.as_object()) {
                for (key, value) in fields {
                    target.insert(key.clone(), value.clone());
                }
            }
            row.clone()
        };

        self.feed.publish(ChangeEvent {
            collection: collection.to_string(),
            action: ChangeAction::Update,
            row_id: id,
            row: Some(updated),
        });
        Ok(())
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<(), BackendError> {
        let removed = {
            let mut collections = self
                .collections
                .write()
                .map_err(|e| BackendError::Store(format!("failed to acquire write lock: {e}")))?;
            collections
                .get_mut(collection)
                .and_then(|table| table.remove(&id))
                .is_some()
        };

        // Deleting an absent row succeeds silently, like the hosted backend
        if removed {
            self.feed.publish(ChangeEvent {
                collection: collection.to_string(),
                action: ChangeAction::Delete,
                row_id: id,
                row: None,
            });
        }
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
        let session = {
            let users = self.users.read().unwrap_or_else(|e| e.into_inner());
            let user = users
                .get(email)
                .filter(|u| u.password == password)
                .ok_or_else(|| AuthError::Rejected("Invalid login credentials".to_string()))?;
            Self::session_for(user, email)
        };
        *self.session.write().unwrap_or_else(|e| e.into_inner()) = Some(session.clone());
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: UserRole,
    ) -> Result<Session, AuthError> {
        {
            let users = self.users.read().unwrap_or_else(|e| e.into_inner());
            if users.contains_key(email) {
                return Err(AuthError::Rejected("User already registered".to_string()));
            }
        }
        self.register_user(email, password, name, role);
        self.sign_in(email, password).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        *self.session.write().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}
