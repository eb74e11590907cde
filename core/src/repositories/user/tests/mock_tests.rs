//! Unit tests for mock user repository

use std::time::Duration;

use crate::domain::entities::user::{NewUser, User, UserId};
use crate::errors::{AuthError, DomainError, StorageError};
use crate::repositories::user::{MockUserRepository, UserRepository};

#[tokio::test]
async fn test_mock_repository_create_and_find() {
    let repo = MockUserRepository::new();

    let created = repo
        .create(NewUser::new("Alice@Example.com", "hash"))
        .await
        .unwrap();
    assert_eq!(created.email, "alice@example.com");

    let found = repo.find_by_id(created.id).await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(created.id));

    let by_email = repo.find_by_email("ALICE@example.com").await.unwrap();
    assert_eq!(by_email.map(|u| u.id), Some(created.id));
    assert_eq!(repo.lookup_count(), 1);
}

#[tokio::test]
async fn test_mock_repository_duplicate_email() {
    let repo = MockUserRepository::new();
    repo.create(NewUser::new("bob@example.com", "hash")).await.unwrap();

    let result = repo.create(NewUser::new("bob@example.com", "other")).await;

    assert_eq!(result, Err(DomainError::Auth(AuthError::UserAlreadyExists)));
}

#[tokio::test]
async fn test_mock_repository_insert_keeps_ids_unique() {
    let repo = MockUserRepository::new();
    repo.insert(User::new(UserId(42), "fixed@example.com", "hash")).await;

    let created = repo.create(NewUser::new("next@example.com", "hash")).await.unwrap();

    assert_eq!(created.id, UserId(43));
    assert!(repo.remove(UserId(42)).await.is_some());
    assert_eq!(repo.find_by_id(UserId(42)).await.unwrap(), None);
}

#[tokio::test]
async fn test_mock_repository_failure_injection() {
    let repo = MockUserRepository::new().with_failure(StorageError::Unavailable {
        message: "connection refused".to_string(),
    });

    assert!(matches!(
        repo.find_by_id(UserId(1)).await,
        Err(DomainError::Storage(StorageError::Unavailable { .. }))
    ));
    assert!(repo.ping().await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_mock_repository_delay_injection() {
    let repo = MockUserRepository::new().with_delay(Duration::from_secs(5));
    repo.insert(User::new(UserId(1), "slow@example.com", "hash")).await;

    let start = tokio::time::Instant::now();
    let found = repo.find_by_id(UserId(1)).await.unwrap();

    assert!(found.is_some());
    assert!(start.elapsed() >= Duration::from_secs(5));
}
