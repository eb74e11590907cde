//! In-memory implementation of UserRepository for tests
//!
//! Public so that the API crate's integration tests can wire it in place of
//! the MySQL repository.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entities::user::{NewUser, User, UserId};
use crate::errors::{AuthError, DomainError, StorageError};

use super::trait_::UserRepository;

/// Mock user repository with latency and failure injection
#[derive(Clone)]
pub struct MockUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    next_id: Arc<AtomicU64>,
    lookups: Arc<AtomicUsize>,
    delay: Option<Duration>,
    failure: Option<StorageError>,
}

impl MockUserRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            lookups: Arc::new(AtomicUsize::new(0)),
            delay: None,
            failure: None,
        }
    }

    /// Sleep before answering every call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail every call with `error`
    pub fn with_failure(mut self, error: StorageError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Insert a user with a fixed identifier
    pub async fn insert(&self, user: User) {
        let mut users = self.users.write().await;
        self.next_id.fetch_max(user.id.value() + 1, Ordering::SeqCst);
        users.insert(user.id, user);
    }

    /// Remove a user, as if deleted after tokens were issued
    pub async fn remove(&self, id: UserId) -> Option<User> {
        self.users.write().await.remove(&id)
    }

    /// Number of `find_by_id` calls served so far
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    async fn simulate(&self) -> Result<(), DomainError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(error) => Err(error.clone().into()),
            None => Ok(()),
        }
    }
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.simulate().await?;
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.simulate().await?;
        let email = email.to_lowercase();
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        self.simulate().await?;
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::UserAlreadyExists.into());
        }

        let id = UserId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let mut created = User::new(id, user.email, user.password_hash);
        created.role = user.role;
        users.insert(id, created.clone());
        Ok(created)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        self.simulate().await
    }
}
