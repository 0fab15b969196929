//! Listing test utilities.
//!
//! Helpers for integration testing: request parameter builders, row
//! fixtures and assertion utilities for generated SQL.

use std::collections::HashMap;

use serde_json::Value as JsonValue;

/// Build a flat parameter map from key/value pairs.
pub fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Parameters submitting one filter field.
pub fn filter_params(field: &str, operator: &str, v1: &str, v2: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    map.insert(format!("{field}_op"), operator.to_string());
    map.insert(format!("{field}_v1"), v1.to_string());
    if !v2.is_empty() {
        map.insert(format!("{field}_v2"), v2.to_string());
    }
    map
}

/// Create a test user row with default values.
pub fn test_user(id: i64, name: &str) -> TestUser {
    TestUser {
        id,
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        age: 30,
        active: true,
        created_at: "2024-01-01".to_string(),
        profile: serde_json::json!({}),
    }
}

/// A test row builder for creating table fixtures.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i64,
    pub active: bool,
    pub created_at: String,
    pub profile: JsonValue,
}

impl TestUser {
    /// Set the age.
    pub fn with_age(mut self, age: i64) -> Self {
        self.age = age;
        self
    }

    /// Set as inactive.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Set the creation date.
    pub fn created(mut self, created_at: &str) -> Self {
        self.created_at = created_at.to_string();
        self
    }

    /// Add a single profile entry.
    pub fn with_profile(mut self, name: &str, value: JsonValue) -> Self {
        if let Some(obj) = self.profile.as_object_mut() {
            obj.insert(name.to_string(), value);
        }
        self
    }

    /// Row as fetched from the database.
    pub fn to_row(&self) -> JsonValue {
        serde_json::json!({
            "id": self.id,
            "name": self.name,
            "email": self.email,
            "age": self.age,
            "active": self.active,
            "created_at": self.created_at,
            "profile": self.profile,
        })
    }
}

/// `count` numbered users, ids starting at 1.
pub fn user_rows(count: i64) -> Vec<JsonValue> {
    (1..=count)
        .map(|id| test_user(id, &format!("User{id}")).to_row())
        .collect()
}

/// Assertion helpers for generated SQL and JSON.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{}', got: {}",
            key,
            value
        );
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{}'\nActual: {}",
            needle,
            haystack
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string to NOT contain '{}'\nActual: {}",
            needle,
            haystack
        );
    }
}
