//! User roster handlers
//!
//! `/getUsers` (GET/HEAD) and `/addUser` (POST). The create/update path
//! decodes the body, validates it into a typed payload at the boundary, and
//! upserts into the injected store.

use crate::http;
use crate::http::body::{read_body, BodyMap};
use crate::logger;
use crate::store::{Age, UpsertOutcome, User, UserStore};
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::{Request, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

const MISSING_PARAMS_MESSAGE: &str = "Name and age are both required.";
const CREATED_MESSAGE: &str = "User created successfully.";
const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error.";

/// Body shape of the list response: `{users: <entire mapping>}`.
#[derive(Serialize)]
struct UserList {
    users: HashMap<String, User>,
}

/// GET /getUsers: the entire mapping, 200 even when empty
pub async fn list_users(users: &UserStore) -> Response<Full<Bytes>> {
    let body = UserList {
        users: users.snapshot().await,
    };
    http::build_json_response(StatusCode::OK, &body)
}

/// HEAD /getUsers: headers only
pub fn list_users_head() -> Response<Full<Bytes>> {
    http::build_head_response(StatusCode::OK)
}

/// POST /addUser: create a user or overwrite an existing user's age
pub async fn add_user(req: Request<Incoming>, users: &UserStore) -> Response<Full<Bytes>> {
    match read_body(req).await {
        Ok(body) => apply_upsert(&body, users).await,
        Err(e) => {
            logger::log_error(&format!("Failed to decode request body: {e}"));
            http::build_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_MESSAGE,
                http::ErrorId::InternalError,
            )
        }
    }
}

async fn apply_upsert(body: &BodyMap, users: &UserStore) -> Response<Full<Bytes>> {
    let Ok(new_user) = NewUser::validate(body) else {
        return http::build_error_response(
            StatusCode::BAD_REQUEST,
            MISSING_PARAMS_MESSAGE,
            http::ErrorId::MissingParams,
        );
    };

    match users.upsert(&new_user.name, new_user.age).await {
        UpsertOutcome::Updated => http::build_no_content_response(),
        UpsertOutcome::Created => http::build_json_response(
            StatusCode::CREATED,
            &serde_json::json!({ "message": CREATED_MESSAGE }),
        ),
    }
}

/// Validated create/update payload.
#[derive(Debug, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub age: Age,
}

/// Rejection carrying no detail: every validation failure maps to the same
/// 400 response.
#[derive(Debug, PartialEq, Eq)]
pub struct MissingParams;

impl NewUser {
    /// Validate a decoded body into a typed payload.
    ///
    /// `name` must be a string and non-empty after trimming. `age` must be
    /// present, non-null, and render to a non-empty string; its value is
    /// otherwise unconstrained (see `coerce_age`).
    pub fn validate(body: &BodyMap) -> Result<Self, MissingParams> {
        let name = match body.get("name") {
            Some(Value::String(s)) => s.trim(),
            _ => "",
        };
        if name.is_empty() {
            return Err(MissingParams);
        }

        let age = body.get("age").ok_or(MissingParams)?;
        if !age_is_present(age) {
            return Err(MissingParams);
        }

        Ok(Self {
            name: name.to_string(),
            age: coerce_age(age),
        })
    }
}

/// An age value counts as present unless it is null or blank once trimmed.
fn age_is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// Number()-style coercion: numbers pass through, strings parse as floats
/// with unparseable input becoming NaN, booleans become 1/0. Anything else
/// is NaN. NaN survives into the store and serializes as null.
fn coerce_age(value: &Value) -> Age {
    match value {
        Value::Number(n) => Age::new(n.as_f64().unwrap_or(f64::NAN)),
        Value::String(s) => Age::new(s.trim().parse().unwrap_or(f64::NAN)),
        Value::Bool(b) => Age::new(if *b { 1.0 } else { 0.0 }),
        _ => Age::new(f64::NAN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn body_map(json: Value) -> BodyMap {
        match json {
            Value::Object(map) => map,
            _ => panic!("test body must be a JSON object"),
        }
    }

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_validate_accepts_form_style_strings() {
        let body = body_map(serde_json::json!({"name": "Alice", "age": "30"}));
        let user = NewUser::validate(&body).unwrap();
        assert_eq!(user.name, "Alice");
        assert_eq!(user.age, Age::new(30.0));
    }

    #[test]
    fn test_validate_accepts_json_numbers() {
        let body = body_map(serde_json::json!({"name": "Alice", "age": 31}));
        assert_eq!(NewUser::validate(&body).unwrap().age, Age::new(31.0));
    }

    #[test]
    fn test_validate_trims_the_name() {
        let body = body_map(serde_json::json!({"name": "  Alice  ", "age": 30}));
        assert_eq!(NewUser::validate(&body).unwrap().name, "Alice");
    }

    #[test]
    fn test_validate_rejects_missing_or_blank_name() {
        for body in [
            serde_json::json!({"age": 30}),
            serde_json::json!({"name": "", "age": 30}),
            serde_json::json!({"name": "   ", "age": 30}),
            serde_json::json!({"name": 42, "age": 30}),
            serde_json::json!({"name": null, "age": 30}),
        ] {
            assert_eq!(NewUser::validate(&body_map(body)), Err(MissingParams));
        }
    }

    #[test]
    fn test_validate_rejects_missing_or_blank_age() {
        for body in [
            serde_json::json!({"name": "Alice"}),
            serde_json::json!({"name": "Alice", "age": null}),
            serde_json::json!({"name": "Alice", "age": ""}),
            serde_json::json!({"name": "Alice", "age": "   "}),
        ] {
            assert_eq!(NewUser::validate(&body_map(body)), Err(MissingParams));
        }
    }

    #[test]
    fn test_unparseable_age_coerces_to_nan() {
        let body = body_map(serde_json::json!({"name": "Alice", "age": "abc"}));
        let user = NewUser::validate(&body).unwrap();
        assert!(user.age.is_nan());
    }

    #[test]
    fn test_boolean_age_coerces_like_a_number() {
        let body = body_map(serde_json::json!({"name": "Alice", "age": true}));
        assert_eq!(NewUser::validate(&body).unwrap().age, Age::new(1.0));
    }

    #[tokio::test]
    async fn test_create_then_update_then_list() {
        let users = UserStore::new();

        // Form-encoded create
        let body = crate::http::body::decode_body(b"name=Alice&age=30", "").unwrap();
        let resp = apply_upsert(&body, &users).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(
            body_string(resp).await,
            r#"{"message":"User created successfully."}"#
        );

        // JSON update of the same name
        let body =
            crate::http::body::decode_body(br#"{"name":"Alice","age":31}"#, "application/json")
                .unwrap();
        let resp = apply_upsert(&body, &users).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(body_string(resp).await.is_empty());

        // List reflects the update with no duplicate
        let resp = list_users(&users).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_string(resp).await,
            r#"{"users":{"Alice":{"name":"Alice","age":31}}}"#
        );
    }

    #[tokio::test]
    async fn test_rejection_does_not_mutate_the_store() {
        let users = UserStore::new();
        let body = body_map(serde_json::json!({"name": "Alice"}));

        let resp = apply_upsert(&body, &users).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_string(resp).await,
            r#"{"message":"Name and age are both required.","id":"missingParams"}"#
        );
        assert!(users.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_fresh_store_lists_empty_mapping() {
        let users = UserStore::new();
        let resp = list_users(&users).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_string(resp).await, r#"{"users":{}}"#);
    }

    #[tokio::test]
    async fn test_list_users_head_is_bodyless() {
        let resp = list_users_head();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_string(resp).await.is_empty());
    }
}
