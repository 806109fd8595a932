//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for resolving the
//! (method, pathname) pair against the fixed route table and dispatching.

use crate::config::AppState;
use crate::handler::{static_files, users};
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::sync::Arc;

const NOT_FOUND_MESSAGE: &str = "The page you are looking for was not found.";

/// Every route the server declares, plus the catch-all pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Client,
    Stylesheet,
    UserListGet,
    UserListHead,
    NotRealGet,
    NotRealHead,
    AddUser,
    NotFoundGet,
    NotFoundHead,
}

/// Resolve a request against the route table.
///
/// Matching uses the exact pathname and method; callers pass `uri.path()`,
/// so query strings never participate.
pub fn resolve(method: &Method, path: &str) -> Route {
    match (method, path) {
        (&Method::GET, "/") => Route::Client,
        (&Method::GET, "/style.css") => Route::Stylesheet,
        (&Method::GET, "/getUsers") => Route::UserListGet,
        (&Method::HEAD, "/getUsers") => Route::UserListHead,
        (&Method::GET, "/notReal") => Route::NotRealGet,
        (&Method::HEAD, "/notReal") => Route::NotRealHead,
        (&Method::POST, "/addUser") => Route::AddUser,
        (&Method::HEAD, _) => Route::NotFoundHead,
        _ => Route::NotFoundGet,
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let access_log = state.config.logging.access_log;
    if access_log {
        logger::log_request(req.method(), req.uri(), req.version());
    }

    if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        return Ok(resp);
    }

    let route = resolve(req.method(), req.uri().path());
    let response = dispatch(route, req, &state).await;

    if access_log {
        logger::log_response(response.status().as_u16(), body_len(&response));
    }

    Ok(response)
}

/// Dispatch to the handler the route table names
async fn dispatch(route: Route, req: Request<Incoming>, state: &AppState) -> Response<Full<Bytes>> {
    match route {
        Route::Client => static_files::serve_client(&state.config.assets).await,
        Route::Stylesheet => static_files::serve_stylesheet(&state.config.assets).await,
        Route::UserListGet => users::list_users(&state.users).await,
        Route::UserListHead => users::list_users_head(),
        Route::NotRealGet => not_real_get(),
        Route::NotRealHead => not_real_head(),
        Route::AddUser => users::add_user(req, &state.users).await,
        Route::NotFoundGet => not_found_get(),
        Route::NotFoundHead => not_found_head(),
    }
}

// The /notReal pair and the catch-all pair are behaviorally identical;
// they stay separate so the route table reads one handler per row.

/// GET /notReal: declared route that always reports 404
fn not_real_get() -> Response<Full<Bytes>> {
    http::build_error_response(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE, http::ErrorId::NotFound)
}

/// HEAD /notReal: 404 without a body
fn not_real_head() -> Response<Full<Bytes>> {
    http::build_head_response(StatusCode::NOT_FOUND)
}

/// GET catch-all: 404 with a JSON body
fn not_found_get() -> Response<Full<Bytes>> {
    http::build_error_response(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE, http::ErrorId::NotFound)
}

/// HEAD catch-all: 404 without a body
fn not_found_head() -> Response<Full<Bytes>> {
    http::build_head_response(StatusCode::NOT_FOUND)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(req: &Request<Incoming>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

fn body_len(response: &Response<Full<Bytes>>) -> usize {
    use hyper::body::Body as _;
    usize::try_from(response.body().size_hint().exact().unwrap_or(0)).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_routes() {
        assert_eq!(resolve(&Method::GET, "/"), Route::Client);
        assert_eq!(resolve(&Method::GET, "/style.css"), Route::Stylesheet);
        assert_eq!(resolve(&Method::GET, "/getUsers"), Route::UserListGet);
        assert_eq!(resolve(&Method::HEAD, "/getUsers"), Route::UserListHead);
        assert_eq!(resolve(&Method::GET, "/notReal"), Route::NotRealGet);
        assert_eq!(resolve(&Method::HEAD, "/notReal"), Route::NotRealHead);
        assert_eq!(resolve(&Method::POST, "/addUser"), Route::AddUser);
    }

    #[test]
    fn test_unmatched_paths_fall_through() {
        assert_eq!(resolve(&Method::GET, "/missing"), Route::NotFoundGet);
        assert_eq!(resolve(&Method::HEAD, "/missing"), Route::NotFoundHead);
        assert_eq!(resolve(&Method::DELETE, "/getUsers"), Route::NotFoundGet);
    }

    #[test]
    fn test_method_must_match_the_table_row() {
        // Declared paths with the wrong method are unmatched, not 405s.
        assert_eq!(resolve(&Method::POST, "/getUsers"), Route::NotFoundGet);
        assert_eq!(resolve(&Method::GET, "/addUser"), Route::NotFoundGet);
        assert_eq!(resolve(&Method::HEAD, "/"), Route::NotFoundHead);
        assert_eq!(resolve(&Method::HEAD, "/style.css"), Route::NotFoundHead);
    }
}
