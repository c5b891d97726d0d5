// ABOUTME: Core data models for users, recipes, tags, and ingredients
// ABOUTME: Defines the domain structs shared by the database and HTTP layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

//! # Data Models
//!
//! This module contains the core data structures used throughout the Pantry
//! API server. Every recipe, tag, and ingredient carries the id of its
//! owning user; nothing in the system is shared across accounts.
//!
//! ## Design Principles
//!
//! - **Owner Scoped**: all cross-entity references resolve within one user
//! - **Serializable**: models support JSON serialization for the REST API
//! - **Type Safe**: strong typing prevents common data handling errors

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::limits;

/// A user account in the system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// User email address (used for identification, unique)
    pub email: String,
    /// Display name
    pub display_name: Option<String>,
    /// Hashed password for authentication
    pub password_hash: String,
    /// Whether the account may authenticate
    pub is_active: bool,
    /// Whether the user may access administrative surfaces
    pub is_staff: bool,
    /// Whether the user holds every permission implicitly
    pub is_superuser: bool,
    /// When the account was created
    pub created_at: DateTime<Utc>,
    /// Last time the user accessed the system
    pub last_active: DateTime<Utc>,
}

impl User {
    /// Create a new regular user with the given email and password hash
    #[must_use]
    pub fn new(email: String, password_hash: String, display_name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            display_name,
            password_hash,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            created_at: now,
            last_active: now,
        }
    }

    /// Create a new superuser with staff and superuser flags set
    #[must_use]
    pub fn new_superuser(
        email: String,
        password_hash: String,
        display_name: Option<String>,
    ) -> Self {
        Self {
            is_staff: true,
            is_superuser: true,
            ..Self::new(email, password_hash, display_name)
        }
    }

    /// Update last active timestamp
    pub fn update_last_active(&mut self) {
        self.last_active = Utc::now();
    }
}

/// Normalize an email address by lowercasing its domain part
///
/// The local part is preserved as given; only the text after the last `@`
/// is folded to lowercase.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_owned(),
    }
}

/// Check whether an email address is structurally valid
///
/// Accepts a non-empty local part and domain separated by a single `@`,
/// within the RFC 5321 length limit. Full RFC 5322 parsing is deliberately
/// out of scope.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.len() > limits::MAX_EMAIL_LENGTH {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && !domain.is_empty() && !domain.contains('@')
}

/// A tag owned by a single user
///
/// Tag names are unique per owner, not globally; two users may each have a
/// tag named "Dessert".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Tag name, unique within the owner's tags
    pub name: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// An ingredient owned by a single user
///
/// Same uniqueness scope as [`Tag`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Ingredient name, unique within the owner's ingredients
    pub name: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// A recipe owned by a single user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Recipe title
    pub title: String,
    /// Longer free-form description
    pub description: String,
    /// Preparation time in minutes
    pub time_minutes: u32,
    /// Price with two decimal places
    pub price: Decimal,
    /// Optional external link
    pub link: Option<String>,
    /// Tags attached to this recipe, all owned by the same user
    pub tags: Vec<Tag>,
    /// Ingredients attached to this recipe, all owned by the same user
    pub ingredients: Vec<Ingredient>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new("user@example.com".to_owned(), "hash".to_owned(), None);
        assert!(user.is_active);
        assert!(!user.is_staff);
        assert!(!user.is_superuser);
    }

    #[test]
    fn test_new_superuser_flags() {
        let user =
            User::new_superuser("admin@example.com".to_owned(), "hash".to_owned(), None);
        assert!(user.is_active);
        assert!(user.is_staff);
        assert!(user.is_superuser);
    }

    #[test]
    fn test_normalize_email_lowercases_domain() {
        assert_eq!(
            normalize_email("Test1@EXAMPLE.com"),
            "Test1@example.com"
        );
        assert_eq!(
            normalize_email("test2@Example.COM"),
            "test2@example.com"
        );
    }

    #[test]
    fn test_normalize_email_preserves_local_part() {
        assert_eq!(
            normalize_email("TEST3@EXAMPLE.COM"),
            "TEST3@example.com"
        );
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("user.name+tag@sub.example.co.uk"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-symbol"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@@example.com"));
    }
}
