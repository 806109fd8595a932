//! In-memory user store.
//!
//! The store is owned by `AppState` and injected into handlers; it is never
//! persisted and resets on restart.

use serde::{Serialize, Serializer};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A user's age as a JavaScript-style number.
///
/// Integral finite values serialize without a fractional part and non-finite
/// values serialize as `null`, matching how the age renders in the list
/// response:
///
/// ```
/// # use roster_server::store::Age;
/// assert_eq!(serde_json::to_string(&Age::new(31.0)).unwrap(), "31");
/// assert_eq!(serde_json::to_string(&Age::new(31.5)).unwrap(), "31.5");
/// assert_eq!(serde_json::to_string(&Age::new(f64::NAN)).unwrap(), "null");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Age(f64);

// Largest f64 with integer precision; integral ages beyond it keep the
// float representation.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl Age {
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn is_nan(self) -> bool {
        self.0.is_nan()
    }
}

impl Serialize for Age {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !self.0.is_finite() {
            serializer.serialize_unit()
        } else if self.0.fract() == 0.0 && self.0.abs() <= MAX_SAFE_INTEGER {
            #[allow(clippy::cast_possible_truncation)]
            let integral = self.0 as i64;
            serializer.serialize_i64(integral)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

/// A single user record. The name doubles as the store key.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub name: String,
    pub age: Age,
}

/// Result of an upsert, used to pick the response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Map of user name to record, keyed uniquely by trimmed name.
#[derive(Debug, Default)]
pub struct UserStore {
    users: RwLock<HashMap<String, User>>,
}

impl UserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new record or overwrite the age of an existing one.
    ///
    /// The check-then-write happens under a single write-lock acquisition,
    /// so concurrent upserts for the same name are last-write-wins.
    pub async fn upsert(&self, name: &str, age: Age) -> UpsertOutcome {
        let mut users = self.users.write().await;
        match users.get_mut(name) {
            Some(user) => {
                user.age = age;
                UpsertOutcome::Updated
            }
            None => {
                users.insert(
                    name.to_string(),
                    User {
                        name: name.to_string(),
                        age,
                    },
                );
                UpsertOutcome::Created
            }
        }
    }

    /// Clone the current mapping for the list response.
    pub async fn snapshot(&self) -> HashMap<String, User> {
        self.users.read().await.clone()
    }
}
