//! HTTP response building module
//!
//! Provides builders for the JSON, asset, and bodyless responses the server
//! emits, decoupled from specific business logic.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

/// Machine-readable error identifiers carried in JSON error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorId {
    MissingParams,
    NotFound,
    InternalError,
}

/// JSON error body shape: `{message, id}`.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    id: ErrorId,
}

/// Build a JSON response with an explicit Content-Length.
pub fn build_json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = match serde_json::to_string(body) {
        Ok(j) => j,
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response body: {e}"));
            return build_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error.",
                ErrorId::InternalError,
            );
        }
    };

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Content-Length", json.len())
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            log_build_error("JSON", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a JSON error response with the `{message, id}` shape.
pub fn build_error_response(
    status: StatusCode,
    message: &str,
    id: ErrorId,
) -> Response<Full<Bytes>> {
    let body = ErrorBody { message, id };
    let json = serde_json::to_string(&body)
        .unwrap_or_else(|_| r#"{"message":"Internal Server Error.","id":"internalError"}"#.into());

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Content-Length", json.len())
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            log_build_error("error", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a headers-only response for HEAD requests: the JSON content type
/// without a body and without a Content-Length.
pub fn build_head_response(status: StatusCode) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("HEAD", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 204 No Content response
pub fn build_no_content_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("204", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a 200 response carrying static asset bytes.
pub fn build_asset_response(data: Vec<u8>, content_type: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", data.len())
        .body(Full::new(Bytes::from(data)))
        .unwrap_or_else(|e| {
            log_build_error("asset", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::PAYLOAD_TOO_LARGE)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("413 Payload Too Large")))
        .unwrap_or_else(|e| {
            log_build_error("413", &e);
            Response::new(Full::new(Bytes::from("413 Payload Too Large")))
        })
}

/// Log response build error
fn log_build_error(kind: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {kind} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_error_response_shape() {
        let resp = build_error_response(
            StatusCode::NOT_FOUND,
            "The page you are looking for was not found.",
            ErrorId::NotFound,
        );
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()["content-type"], "application/json");
        assert_eq!(
            body_string(resp).await,
            r#"{"message":"The page you are looking for was not found.","id":"notFound"}"#
        );
    }

    #[test]
    fn test_error_ids_are_camel_case() {
        assert_eq!(
            serde_json::to_string(&ErrorId::MissingParams).unwrap(),
            r#""missingParams""#
        );
        assert_eq!(serde_json::to_string(&ErrorId::NotFound).unwrap(), r#""notFound""#);
        assert_eq!(
            serde_json::to_string(&ErrorId::InternalError).unwrap(),
            r#""internalError""#
        );
    }

    #[tokio::test]
    async fn test_head_response_has_no_body() {
        let resp = build_head_response(StatusCode::OK);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "application/json");
        assert!(body_string(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_no_content_response_is_bare() {
        let resp = build_no_content_response();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(resp.headers().get("content-type").is_none());
        assert!(body_string(resp).await.is_empty());
    }
}
