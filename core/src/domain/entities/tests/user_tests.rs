//! Unit tests for the user entity

use crate::domain::entities::user::{NewUser, User, UserId};

#[test]
fn test_user_id_round_trips_through_string() {
    let id: UserId = "18446744073709551615".parse().unwrap();
    assert_eq!(id.value(), u64::MAX);
    assert_eq!(id.to_string(), "18446744073709551615");
    assert!("-1".parse::<UserId>().is_err());
    assert!("".parse::<UserId>().is_err());
}

#[test]
fn test_new_user_lowercases_email() {
    let user = NewUser::new("Alice@Example.COM", "$2b$04$hash");
    assert_eq!(user.email, "alice@example.com");
    assert!(user.role.is_none());
}

#[test]
fn test_user_serialization_skips_password_hash() {
    let user = User::new(UserId(7), "bob@example.com", "$2b$04$secret").with_role("admin");
    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["role"], "admin");
    assert!(json.get("password_hash").is_none());
}
